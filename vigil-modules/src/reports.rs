//! Reports Module
//!
//! A static catalogue of reports with type and text filtering, JSON
//! download and report templates.

use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use vigil_core::{export_date, export_filename, Exporter};

use crate::{ModuleError, Notice};

/// Body written into downloaded reports
const REPORT_CONTENT: &str = "Detailed report content...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ReportType {
    Profile,
    Network,
    Synthesis,
    Geolocation,
    Assessment,
}

impl ReportType {
    pub const ALL: [ReportType; 5] = [
        ReportType::Profile,
        ReportType::Network,
        ReportType::Synthesis,
        ReportType::Geolocation,
        ReportType::Assessment,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReportType::Profile => "Profile",
            ReportType::Network => "Network",
            ReportType::Synthesis => "Synthesis",
            ReportType::Geolocation => "Geolocation",
            ReportType::Assessment => "Assessment",
        }
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("unknown report type: {}", s))
    }
}

/// Creation-date window offered by the filter bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    Day,
    #[default]
    Week,
    Month,
    Quarter,
}

impl DateRange {
    pub fn label(&self) -> &'static str {
        match self {
            DateRange::Day => "Last 24h",
            DateRange::Week => "Last 7 days",
            DateRange::Month => "Last 30 days",
            DateRange::Quarter => "Last 90 days",
        }
    }

    pub fn next(self) -> Self {
        match self {
            DateRange::Day => DateRange::Week,
            DateRange::Week => DateRange::Month,
            DateRange::Month => DateRange::Quarter,
            DateRange::Quarter => DateRange::Day,
        }
    }
}

/// A catalogue entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub id: &'static str,
    pub title: &'static str,
    #[serde(rename = "type")]
    pub kind: ReportType,
    pub date: &'static str,
    pub author: &'static str,
    pub status: &'static str,
    pub pages: u32,
    pub priority: &'static str,
    pub targets: Vec<&'static str>,
    pub summary: &'static str,
}

impl Report {
    /// Case-insensitive match against the title and every target name
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&query)
            || self.targets.iter().any(|t| t.to_lowercase().contains(&query))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportDocument<'a> {
    #[serde(flatten)]
    report: &'a Report,
    generated_at: String,
    content: &'static str,
}

/// A template offered for new reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub fn templates() -> Vec<ReportTemplate> {
    vec![
        ReportTemplate { id: "profile", name: "Profile report", description: "Detailed analysis of an individual" },
        ReportTemplate { id: "network", name: "Network analysis", description: "Mapping of connections" },
        ReportTemplate { id: "surveillance", name: "Surveillance report", description: "Realtime activity tracking" },
        ReportTemplate { id: "synthesis", name: "Synthesis report", description: "Periodic overview" },
    ]
}

pub fn catalogue() -> Vec<Report> {
    vec![
        Report {
            id: "RPT-001",
            title: "Behavioural Analysis - Alexandre Dubois",
            kind: ReportType::Profile,
            date: "2024-01-15",
            author: "OSINT System",
            status: "Completed",
            pages: 24,
            priority: "High",
            targets: vec!["Alexandre Dubois"],
            summary: "Full analysis of digital behaviour and social connections.",
        },
        Report {
            id: "RPT-002",
            title: "Network Surveillance - Tech Corp Group",
            kind: ReportType::Network,
            date: "2024-01-14",
            author: "Agent OSINT-01",
            status: "In progress",
            pages: 18,
            priority: "Critical",
            targets: vec!["Marie Leclerc", "Jean Martin"],
            summary: "Mapping of professional connections and risk analysis.",
        },
        Report {
            id: "RPT-003",
            title: "Weekly Report - Suspicious Activity",
            kind: ReportType::Synthesis,
            date: "2024-01-13",
            author: "OSINT System",
            status: "Completed",
            pages: 12,
            priority: "Medium",
            targets: vec!["Multiple"],
            summary: "Summary of suspicious activity detected this week.",
        },
        Report {
            id: "RPT-004",
            title: "Geospatial Analysis - Paris 15th District",
            kind: ReportType::Geolocation,
            date: "2024-01-12",
            author: "Agent OSINT-02",
            status: "Validated",
            pages: 31,
            priority: "High",
            targets: vec!["Sophie Bernard"],
            summary: "Analysis of movements and geographic points of interest.",
        },
        Report {
            id: "RPT-005",
            title: "Risk Assessment - Q1 2024",
            kind: ReportType::Assessment,
            date: "2024-01-10",
            author: "Senior Analyst",
            status: "Archived",
            pages: 45,
            priority: "Critical",
            targets: vec!["Multiple"],
            summary: "Quarterly risk assessment and strategic recommendations.",
        },
    ]
}

/// Catalogue-wide counters shown under the report list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportStats {
    pub total: usize,
    pub in_progress: usize,
    pub completed: usize,
    /// Rounded to the nearest page
    pub avg_pages: u32,
}

impl ReportStats {
    pub fn from_reports(reports: &[Report]) -> Self {
        let count = |status: &str| reports.iter().filter(|r| r.status == status).count();
        let pages: u32 = reports.iter().map(|r| r.pages).sum();
        let total = reports.len();
        let avg_pages = match total as u32 {
            0 => 0,
            n => (pages + n / 2) / n,
        };

        Self {
            total,
            in_progress: count("In progress"),
            completed: count("Completed"),
            avg_pages,
        }
    }
}

/// Filter bar state, selection and the template picker
#[derive(Debug, Default)]
pub struct ReportsModule {
    pub type_filter: Option<ReportType>,
    pub date_range: DateRange,
    pub query: String,
    selected: Option<&'static str>,
    cursor: usize,
    picking_template: bool,
    template_cursor: usize,
}

impl ReportsModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports matching the type filter and the text query
    pub fn filtered(&self) -> Vec<Report> {
        catalogue()
            .into_iter()
            .filter(|r| self.type_filter.map_or(true, |t| r.kind == t))
            .filter(|r| r.matches(&self.query))
            .collect()
    }

    /// Statistics over the whole catalogue, independent of the filters
    pub fn stats(&self) -> ReportStats {
        ReportStats::from_reports(&catalogue())
    }

    /// Cycle all -> each type -> all
    pub fn cycle_type_filter(&mut self) {
        self.type_filter = match self.type_filter {
            None => Some(ReportType::ALL[0]),
            Some(current) => {
                let idx = ReportType::ALL.iter().position(|t| *t == current).unwrap_or(0);
                ReportType::ALL.get(idx + 1).copied()
            }
        };
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: isize) {
        self.cursor = crate::step_cursor(self.cursor, delta, self.filtered().len());
    }

    /// Report under the cursor in the filtered list
    pub fn highlighted(&self) -> Option<Report> {
        self.filtered().into_iter().nth(self.cursor)
    }

    pub fn selected(&self) -> Option<Report> {
        let id = self.selected?;
        catalogue().into_iter().find(|r| r.id == id)
    }

    /// Open a report
    pub fn view(&mut self, id: &str) -> Result<Notice, ModuleError> {
        let report = find(id)?;
        self.selected = Some(report.id);
        Ok(Notice::info(format!("Opening report {}", report.id)))
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    /// Write the report with its content as `<id>-<slug(title)>.json`
    pub fn download(&self, id: &str, exporter: &Exporter) -> Result<PathBuf, ModuleError> {
        let report = find(id)?;
        let document = ReportDocument {
            report: &report,
            generated_at: export_date(),
            content: REPORT_CONTENT,
        };
        let path = exporter.write(&export_filename(report.id, report.title, None), &document)?;
        info!("Report {} downloaded", report.id);
        Ok(path)
    }

    /// Shareable text: title, then summary
    pub fn share_text(&self, id: &str) -> Result<String, ModuleError> {
        let report = find(id)?;
        Ok(format!("{}\n{}", report.title, report.summary))
    }

    pub fn is_picking_template(&self) -> bool {
        self.picking_template
    }

    pub fn template_cursor(&self) -> usize {
        self.template_cursor
    }

    pub fn open_template_picker(&mut self) {
        self.picking_template = true;
        self.template_cursor = 0;
    }

    pub fn close_template_picker(&mut self) {
        self.picking_template = false;
    }

    pub fn move_template_cursor(&mut self, delta: isize) {
        self.template_cursor = crate::step_cursor(self.template_cursor, delta, templates().len());
    }

    /// Start a report from a template; report authoring is not implemented
    pub fn create_from_template(&mut self, template_id: &str) -> Result<Notice, ModuleError> {
        let template = templates()
            .into_iter()
            .find(|t| t.id == template_id)
            .ok_or_else(|| ModuleError::UnknownRecord(format!("template {}", template_id)))?;
        self.picking_template = false;
        info!("New report requested from template {}", template.id);
        Ok(Notice::info(format!("Creating new report: {}", template.name)))
    }
}

fn find(id: &str) -> Result<Report, ModuleError> {
    catalogue()
        .into_iter()
        .find(|r| r.id == id)
        .ok_or_else(|| ModuleError::UnknownRecord(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_by_type_and_query() {
        let mut module = ReportsModule::new();
        assert_eq!(module.filtered().len(), 5);

        module.query = "MARIE".to_string();
        let hits = module.filtered();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "RPT-002");

        module.query = "analysis".to_string();
        assert_eq!(module.filtered().len(), 2);

        module.type_filter = Some(ReportType::Geolocation);
        let hits = module.filtered();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "RPT-004");
    }

    #[test]
    fn test_stats() {
        let mut module = ReportsModule::new();
        module.query = "marie".to_string();

        let stats = module.stats();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.avg_pages, 26);

        assert_eq!(ReportStats::from_reports(&[]).avg_pages, 0);
    }

    #[test]
    fn test_date_range_does_not_filter() {
        let mut module = ReportsModule::new();
        module.date_range = DateRange::Day;
        assert_eq!(module.filtered().len(), 5);
    }

    #[test]
    fn test_type_parse_is_case_insensitive() {
        assert_eq!("network".parse::<ReportType>(), Ok(ReportType::Network));
        assert!("memo".parse::<ReportType>().is_err());
    }

    #[test]
    fn test_cycle_type_filter_returns_to_all() {
        let mut module = ReportsModule::new();
        for _ in 0..ReportType::ALL.len() {
            module.cycle_type_filter();
            assert!(module.type_filter.is_some());
        }
        module.cycle_type_filter();
        assert_eq!(module.type_filter, None);
    }

    #[test]
    fn test_download_writes_report_document() {
        let dir = std::env::temp_dir().join(format!("vigil-reports-{}", std::process::id()));
        let exporter = Exporter::new(&dir);
        let module = ReportsModule::new();

        let path = module.download("RPT-005", &exporter).unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("RPT-005-risk-assessment-q1-2024.json")
        );

        let doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["type"], "Assessment");
        assert_eq!(doc["pages"], 45);
        assert_eq!(doc["content"], REPORT_CONTENT);
        assert!(doc["generatedAt"].is_string());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_view_and_share() {
        let mut module = ReportsModule::new();
        module.view("RPT-003").unwrap();
        assert_eq!(module.selected().map(|r| r.pages), Some(12));
        assert!(module.share_text("RPT-003").unwrap().starts_with("Weekly Report"));
        assert!(module.view("RPT-999").is_err());
    }

    #[test]
    fn test_create_from_template_closes_picker() {
        let mut module = ReportsModule::new();
        module.open_template_picker();
        assert!(module.create_from_template("network").is_ok());
        assert!(!module.is_picking_template());
        assert!(module.create_from_template("memo").is_err());
    }
}
