//! Search Module
//!
//! Holds the search form and the last applied result set.
//! - `begin_search` validates the query and issues a sequenced request
//! - `complete` applies a finished request only if it is still the latest
//! - Results can be promoted to profiles or exported as JSON

use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use vigil_core::{
    export_date, export_filename, export_timestamp, Alert, AlertKind, Exporter, RiskLevel,
    SessionStore, Target, TargetDraft, TargetStatus,
};

use crate::{step_cursor, ModuleError, Notice, SearchKind, SearchRequest, SearchResult, SourceFilter};

/// Errors from search operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Please enter a search term")]
    EmptyQuery,

    #[error("Source error: {0}")]
    Source(String),
}

/// Facebook-specific collection criteria offered by the form
pub const FACEBOOK_CRITERIA: [&str; 15] = [
    "Public profile",
    "Posts",
    "Photos",
    "Videos",
    "Check-ins",
    "Visible friends",
    "Personal information",
    "Employment",
    "Education",
    "Places",
    "Events",
    "Liked pages",
    "Groups",
    "Reviews",
    "Likes",
];

/// Tips shown before the first search
pub const SEARCH_TIPS: [&str; 6] = [
    "Use the full name for better results",
    "Add the city or company when known",
    "Try several spellings of the name",
    "Start with \"All sources\"",
    "Then narrow down to a specific source",
    "Check the Facebook criteria for more detail",
];

/// What happened to a completed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Results were applied; carries the record count
    Applied(usize),
    /// A newer request was issued (or the search was cancelled)
    Stale,
    /// The source failed; the result set was cleared
    Failed(SearchError),
}

/// Search form and result state
#[derive(Debug, Default)]
pub struct SearchModule {
    pub query: String,
    pub source: SourceFilter,
    pub kind: SearchKind,
    selected_criteria: Vec<&'static str>,
    is_searching: bool,
    has_searched: bool,
    results: Vec<SearchResult>,
    latest_seq: u64,
    cursor: usize,
}

impl SearchModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_searching(&self) -> bool {
        self.is_searching
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    /// Tips are shown until a search starts
    pub fn show_tips(&self) -> bool {
        !self.has_searched && !self.is_searching
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: isize) {
        self.cursor = step_cursor(self.cursor, delta, self.results.len());
    }

    pub fn selected_result(&self) -> Option<&SearchResult> {
        self.results.get(self.cursor)
    }

    /// Sequence number of the most recently issued request
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Validate the form and issue a new request.
    ///
    /// A blank query fails fast and leaves the module untouched.
    pub fn begin_search(&mut self) -> Result<SearchRequest, SearchError> {
        let query = self.query.trim();
        if query.is_empty() {
            warn!("Search rejected: empty query");
            return Err(SearchError::EmptyQuery);
        }

        self.latest_seq += 1;
        self.is_searching = true;
        self.has_searched = false;

        let request = SearchRequest {
            seq: self.latest_seq,
            query: query.to_string(),
            source: self.source,
            kind: self.kind,
        };
        info!(
            "Search #{} started: '{}' ({}, {})",
            request.seq,
            request.query,
            request.source.as_str(),
            request.kind.as_str()
        );
        Ok(request)
    }

    /// Apply the outcome of request `seq` if it is still the latest
    pub fn complete(
        &mut self,
        seq: u64,
        outcome: Result<Vec<SearchResult>, SearchError>,
    ) -> Completion {
        if seq != self.latest_seq || !self.is_searching {
            debug!("Dropping stale search #{} (latest #{})", seq, self.latest_seq);
            return Completion::Stale;
        }

        self.is_searching = false;
        self.has_searched = true;
        self.cursor = 0;

        match outcome {
            Ok(results) => {
                let count = results.len();
                self.results = results;
                info!("Search #{} completed: {} results", seq, count);
                Completion::Applied(count)
            }
            Err(e) => {
                self.results.clear();
                warn!("Search #{} failed: {}", seq, e);
                Completion::Failed(e)
            }
        }
    }

    /// Abandon the in-flight request, if any
    pub fn cancel(&mut self) -> bool {
        if !self.is_searching {
            return false;
        }
        // bumping the sequence turns the pending completion stale
        self.latest_seq += 1;
        self.is_searching = false;
        debug!("Search cancelled");
        true
    }

    pub fn criteria(&self) -> &[&'static str] {
        &self.selected_criteria
    }

    pub fn is_criterion_selected(&self, criterion: &str) -> bool {
        self.selected_criteria.contains(&criterion)
    }

    /// Toggle the Facebook criterion at `index`
    pub fn toggle_criterion(&mut self, index: usize) {
        let Some(&criterion) = FACEBOOK_CRITERIA.get(index) else {
            return;
        };
        if let Some(pos) = self.selected_criteria.iter().position(|c| *c == criterion) {
            self.selected_criteria.remove(pos);
        } else {
            self.selected_criteria.push(criterion);
        }
    }

    /// Draft a new profile from a result; risk follows confidence
    pub fn profile_draft(result: &SearchResult) -> TargetDraft {
        TargetDraft::new(
            &result.name,
            TargetStatus::Profiling,
            RiskLevel::from_confidence(result.confidence),
        )
    }

    /// Promote the selected result to a target
    pub fn create_profile(&self, store: &SessionStore) -> Result<Target, ModuleError> {
        let result = self.selected_result().ok_or(ModuleError::NothingSelected)?;
        Ok(store.add_target(Self::profile_draft(result))?)
    }

    /// Promote every result to a target and raise an alert summarising it
    pub fn create_all_profiles(&self, store: &SessionStore) -> Result<Vec<Target>, ModuleError> {
        if self.results.is_empty() {
            return Err(ModuleError::NothingSelected);
        }

        let created = self
            .results
            .iter()
            .map(|r| store.add_target(Self::profile_draft(r)))
            .collect::<Result<Vec<_>, _>>()?;

        store.push_alert(Alert::new(
            AlertKind::Success,
            "Profiles created",
            &format!("{} profiles created from search '{}'", created.len(), self.query.trim()),
        ));
        Ok(created)
    }

    /// Acknowledge a surveillance request for the selected result
    pub fn start_surveillance(&self) -> Result<Notice, ModuleError> {
        let result = self.selected_result().ok_or(ModuleError::NothingSelected)?;
        Ok(Notice::info(format!("Surveillance enabled for {}", result.name)))
    }

    /// Export the selected result
    pub fn export_selected(&self, exporter: &Exporter) -> Result<PathBuf, ModuleError> {
        let result = self.selected_result().ok_or(ModuleError::NothingSelected)?;
        let document = json!({
            "target": result.name,
            "source": result.source,
            "confidence": result.confidence,
            "data": result.data,
            "exportDate": export_date(),
        });

        let filename = export_filename("osint", &result.name, Some(export_timestamp()));
        Ok(exporter.write(&filename, &document)?)
    }

    /// Export the query, filters and the whole result set
    pub fn export_all(&self, exporter: &Exporter) -> Result<PathBuf, ModuleError> {
        if !self.has_searched {
            return Err(ModuleError::NothingSelected);
        }
        let document = json!({
            "searchQuery": self.query.trim(),
            "searchType": self.kind,
            "selectedSource": self.source,
            "results": self.results,
            "exportDate": export_date(),
        });

        let filename = export_filename("osint", "search", Some(export_timestamp()));
        Ok(exporter.write(&filename, &document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{filter_by_source, synthetic_results, DataSource};
    use std::sync::Arc;
    use vigil_core::SystemClock;

    fn searched(query: &str, source: SourceFilter) -> SearchModule {
        let mut module = SearchModule::new();
        module.query = query.to_string();
        module.source = source;
        let request = module.begin_search().unwrap();
        let results = filter_by_source(synthetic_results(&request.query), request.source);
        module.complete(request.seq, Ok(results));
        module
    }

    fn result_with_confidence(confidence: u8) -> SearchResult {
        let mut result = synthetic_results("Target")[0].clone();
        result.confidence = confidence;
        result
    }

    #[test]
    fn test_empty_query_never_searches() {
        let mut module = SearchModule::new();
        module.query = "   ".to_string();

        assert_eq!(module.begin_search(), Err(SearchError::EmptyQuery));
        assert!(!module.is_searching());
        assert!(!module.has_searched());
        assert!(module.results().is_empty());
        assert_eq!(module.latest_seq(), 0);
    }

    #[test]
    fn test_begin_search_enters_searching() {
        let mut module = SearchModule::new();
        module.query = "  Marie Leclerc ".to_string();

        let request = module.begin_search().unwrap();
        assert_eq!(request.query, "Marie Leclerc");
        assert!(module.is_searching());
        assert!(!module.show_tips());
    }

    #[test]
    fn test_only_latest_request_is_applied() {
        let mut module = SearchModule::new();
        module.query = "first".to_string();
        let first = module.begin_search().unwrap();
        module.query = "second".to_string();
        let second = module.begin_search().unwrap();

        // the later request finishes first, the earlier one arrives late
        let applied = module.complete(second.seq, Ok(synthetic_results("second")));
        let stale = module.complete(first.seq, Ok(synthetic_results("first")));

        assert_eq!(applied, Completion::Applied(5));
        assert_eq!(stale, Completion::Stale);
        assert!(module.results().iter().all(|r| r.name == "second"));
    }

    #[test]
    fn test_cancel_makes_pending_request_stale() {
        let mut module = SearchModule::new();
        module.query = "x".to_string();
        let request = module.begin_search().unwrap();

        assert!(module.cancel());
        assert_eq!(module.complete(request.seq, Ok(synthetic_results("x"))), Completion::Stale);
        assert!(!module.has_searched());
        assert!(!module.cancel());
    }

    #[test]
    fn test_failed_search_clears_results() {
        let mut module = searched("x", SourceFilter::All);
        module.query = "y".to_string();
        let request = module.begin_search().unwrap();

        let outcome = module.complete(request.seq, Err(SearchError::Source("down".to_string())));
        assert!(matches!(outcome, Completion::Failed(_)));
        assert!(module.results().is_empty());
        assert!(!module.is_searching());
    }

    #[test]
    fn test_social_filter_results() {
        let module = searched("x", SourceFilter::Social);
        assert_eq!(module.results().len(), 3);
        assert!(module.results().iter().all(|r| matches!(
            r.source,
            DataSource::Facebook | DataSource::LinkedIn | DataSource::Twitter
        )));
    }

    #[test]
    fn test_profile_risk_thresholds() {
        let risk = |c| SearchModule::profile_draft(&result_with_confidence(c)).risk;
        assert_eq!(risk(95), RiskLevel::High);
        assert_eq!(risk(80), RiskLevel::Medium);
        assert_eq!(risk(50), RiskLevel::Low);

        let draft = SearchModule::profile_draft(&result_with_confidence(95));
        assert_eq!(draft.status, TargetStatus::Profiling);
        assert_eq!(draft.name, "Target");
    }

    #[test]
    fn test_create_profile_appends_target() {
        let store = SessionStore::seeded(Arc::new(SystemClock));
        let mut module = searched("Claire Petit", SourceFilter::All);
        module.move_cursor(1);

        let target = module.create_profile(&store).unwrap();
        assert_eq!(target.name, "Claire Petit");
        // LinkedIn record, confidence 96
        assert_eq!(target.risk, RiskLevel::High);
        assert_eq!(store.target_count(), 5);
    }

    #[test]
    fn test_create_all_profiles_raises_alert() {
        let store = SessionStore::new(Arc::new(SystemClock));
        let module = searched("Claire Petit", SourceFilter::Social);

        let created = module.create_all_profiles(&store).unwrap();
        assert_eq!(created.len(), 3);
        assert_eq!(store.alert_count(), 1);
    }

    #[test]
    fn test_toggle_criterion() {
        let mut module = SearchModule::new();
        module.toggle_criterion(2);
        assert!(module.is_criterion_selected("Photos"));
        module.toggle_criterion(2);
        assert!(!module.is_criterion_selected("Photos"));
        module.toggle_criterion(99);
        assert!(module.criteria().is_empty());
    }

    #[test]
    fn test_export_all_document() {
        let dir = std::env::temp_dir().join(format!("vigil-search-{}", std::process::id()));
        let exporter = Exporter::new(&dir);
        let module = searched("Marie Leclerc", SourceFilter::Social);

        let path = module.export_all(&exporter).unwrap();
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("osint-search-"));

        let doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["searchQuery"], "Marie Leclerc");
        assert_eq!(doc["selectedSource"], "social");
        assert_eq!(doc["results"].as_array().unwrap().len(), 3);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_export_selected_with_separator_in_name() {
        let dir = std::env::temp_dir().join(format!("vigil-search-sep-{}", std::process::id()));
        let exporter = Exporter::new(&dir);

        for query in ["AC/DC", "../escaped"] {
            let module = searched(query, SourceFilter::All);
            let path = module.export_selected(&exporter).unwrap();

            assert_eq!(path.parent(), Some(dir.as_path()));
            let doc: serde_json::Value =
                serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(doc["target"], query);
        }
        assert!(std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .any(|e| e.file_name().to_string_lossy().starts_with("osint-ac-dc-")));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
