//! Analysis Module
//!
//! Read-only analysis views over static series. Only the live risk
//! breakdown is computed from the shared target list.

use serde::Serialize;

use vigil_core::{RiskLevel, Target};

use crate::Tab;

/// Analysis views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisTab {
    #[default]
    Trends,
    Risks,
    Networks,
    Signals,
}

impl Tab for AnalysisTab {
    const ALL: &'static [Self] = &[
        AnalysisTab::Trends,
        AnalysisTab::Risks,
        AnalysisTab::Networks,
        AnalysisTab::Signals,
    ];

    fn label(&self) -> &'static str {
        match self {
            AnalysisTab::Trends => "Trend analysis",
            AnalysisTab::Risks => "Risk assessment",
            AnalysisTab::Networks => "Network analysis",
            AnalysisTab::Signals => "Weak signals",
        }
    }
}

/// One day of the weekly trend series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub day: &'static str,
    pub mentions: u32,
    pub sentiment: u32,
    pub activity: u32,
}

/// A labelled count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Share {
    pub label: &'static str,
    pub value: u32,
}

/// A weak signal picked up by the analysts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeakSignal {
    pub id: u32,
    pub kind: &'static str,
    pub description: &'static str,
    pub importance: &'static str,
    pub date: &'static str,
    pub status: &'static str,
}

/// A highly connected node in the relationship graph
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InfluentialNode {
    pub name: &'static str,
    pub centrality: f64,
}

impl InfluentialNode {
    /// Initials shown in the node badge
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|w| w.chars().next())
            .collect()
    }
}

/// Summary figures of the relationship graph
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetworkSummary {
    pub nodes: u32,
    pub edges: u32,
    pub clusters: u32,
    pub density: f64,
}

pub fn trend_series() -> Vec<TrendPoint> {
    [
        ("Mon", 45, 65, 78),
        ("Tue", 78, 72, 65),
        ("Wed", 123, 58, 89),
        ("Thu", 156, 45, 94),
        ("Fri", 189, 38, 67),
        ("Sat", 234, 52, 45),
        ("Sun", 198, 68, 56),
    ]
    .into_iter()
    .map(|(day, mentions, sentiment, activity)| TrendPoint {
        day,
        mentions,
        sentiment,
        activity,
    })
    .collect()
}

pub fn risk_distribution() -> Vec<Share> {
    vec![
        Share { label: "Critical", value: 12 },
        Share { label: "High", value: 34 },
        Share { label: "Medium", value: 89 },
        Share { label: "Low", value: 156 },
    ]
}

pub fn source_distribution() -> Vec<Share> {
    vec![
        Share { label: "Facebook", value: 145 },
        Share { label: "LinkedIn", value: 98 },
        Share { label: "Twitter", value: 76 },
        Share { label: "Instagram", value: 54 },
        Share { label: "Web", value: 123 },
        Share { label: "Forums", value: 32 },
    ]
}

pub fn network_summary() -> NetworkSummary {
    NetworkSummary {
        nodes: 2847,
        edges: 8429,
        clusters: 23,
        density: 0.67,
    }
}

pub fn influential_nodes() -> Vec<InfluentialNode> {
    vec![
        InfluentialNode { name: "Alexandre Dubois", centrality: 0.89 },
        InfluentialNode { name: "Marie Leclerc", centrality: 0.76 },
    ]
}

pub fn weak_signals() -> Vec<WeakSignal> {
    vec![
        WeakSignal {
            id: 1,
            kind: "Trend",
            description: "Mentions of \"cybersecurity\" up 45%",
            importance: "High",
            date: "2024-01-15",
            status: "New",
        },
        WeakSignal {
            id: 2,
            kind: "Anomaly",
            description: "Suspicious activity detected on profile TARGET_001",
            importance: "Critical",
            date: "2024-01-15",
            status: "In progress",
        },
        WeakSignal {
            id: 3,
            kind: "Network",
            description: "New connection between monitored targets",
            importance: "Medium",
            date: "2024-01-14",
            status: "Validated",
        },
        WeakSignal {
            id: 4,
            kind: "Geolocation",
            description: "Unusual concentration of activity - Paris 15th district",
            importance: "Medium",
            date: "2024-01-14",
            status: "Analyzed",
        },
    ]
}

/// Count live targets per risk level, highest risk first
pub fn live_risk_breakdown(targets: &[Target]) -> Vec<(RiskLevel, usize)> {
    RiskLevel::ALL
        .iter()
        .rev()
        .map(|&risk| (risk, targets.iter().filter(|t| t.risk == risk).count()))
        .collect()
}

/// Selected analysis view
#[derive(Debug, Default)]
pub struct AnalysisModule {
    pub tab: AnalysisTab,
}

impl AnalysisModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn prev_tab(&mut self) {
        self.tab = self.tab.prev();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::seed_targets;

    #[test]
    fn test_tab_cycle() {
        let mut module = AnalysisModule::new();
        module.prev_tab();
        assert_eq!(module.tab, AnalysisTab::Signals);
        module.next_tab();
        assert_eq!(module.tab, AnalysisTab::Trends);
    }

    #[test]
    fn test_live_risk_breakdown() {
        let breakdown = live_risk_breakdown(&seed_targets());
        assert_eq!(breakdown[0], (RiskLevel::Critical, 1));
        assert_eq!(breakdown.iter().map(|(_, n)| n).sum::<usize>(), 4);
    }

    #[test]
    fn test_initials() {
        assert_eq!(influential_nodes()[0].initials(), "AD");
    }

    #[test]
    fn test_static_series_shapes() {
        assert_eq!(trend_series().len(), 7);
        assert_eq!(source_distribution().len(), 6);
        assert_eq!(weak_signals().iter().filter(|s| s.importance == "Critical").count(), 1);
    }
}
