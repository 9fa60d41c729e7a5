//! Search source integration
//!
//! A [`SearchSource`] turns a query and a source filter into result
//! records. Real integrations (social APIs, public records, scraping) would
//! implement this trait; the console ships with [`MockSearchSource`], which
//! waits a fixed latency and returns five synthetic records.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::SearchError;

/// Default simulated latency of the mock source
pub const DEFAULT_SEARCH_LATENCY: Duration = Duration::from_millis(2000);

/// Where a result record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSource {
    Facebook,
    LinkedIn,
    Twitter,
    #[serde(rename = "Press article")]
    PressArticle,
    #[serde(rename = "Public database")]
    PublicDatabase,
}

impl DataSource {
    pub fn label(&self) -> &'static str {
        match self {
            DataSource::Facebook => "Facebook",
            DataSource::LinkedIn => "LinkedIn",
            DataSource::Twitter => "Twitter",
            DataSource::PressArticle => "Press article",
            DataSource::PublicDatabase => "Public database",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Source category chosen in the search form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceFilter {
    #[default]
    All,
    Social,
    Web,
    Databases,
    News,
    Forums,
}

impl SourceFilter {
    pub const ALL: [SourceFilter; 6] = [
        SourceFilter::All,
        SourceFilter::Social,
        SourceFilter::Web,
        SourceFilter::Databases,
        SourceFilter::News,
        SourceFilter::Forums,
    ];

    /// Sources belonging to this category; `None` means unrestricted
    pub fn sources(&self) -> Option<&'static [DataSource]> {
        match self {
            SourceFilter::All => None,
            SourceFilter::Social => Some(&[
                DataSource::Facebook,
                DataSource::LinkedIn,
                DataSource::Twitter,
            ]),
            SourceFilter::Web => Some(&[DataSource::PressArticle]),
            SourceFilter::Databases => Some(&[DataSource::PublicDatabase]),
            SourceFilter::News => Some(&[DataSource::PressArticle]),
            SourceFilter::Forums => Some(&[]),
        }
    }

    pub fn admits(&self, source: DataSource) -> bool {
        self.sources().map_or(true, |allowed| allowed.contains(&source))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFilter::All => "all",
            SourceFilter::Social => "social",
            SourceFilter::Web => "web",
            SourceFilter::Databases => "databases",
            SourceFilter::News => "news",
            SourceFilter::Forums => "forums",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SourceFilter::All => "All sources",
            SourceFilter::Social => "Social networks",
            SourceFilter::Web => "Public web",
            SourceFilter::Databases => "Databases",
            SourceFilter::News => "News",
            SourceFilter::Forums => "Forums",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl std::str::FromStr for SourceFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|f| f.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown source filter: {}", s))
    }
}

/// What kind of entity is being searched for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    #[default]
    Person,
    Organization,
    Event,
    Location,
}

impl SearchKind {
    pub const ALL: [SearchKind; 4] = [
        SearchKind::Person,
        SearchKind::Organization,
        SearchKind::Event,
        SearchKind::Location,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Person => "person",
            SearchKind::Organization => "organization",
            SearchKind::Event => "event",
            SearchKind::Location => "location",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl std::str::FromStr for SearchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|k| k.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown search kind: {}", s))
    }
}

/// Reliability label attached to a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reliability {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl Reliability {
    pub fn label(&self) -> &'static str {
        match self {
            Reliability::Low => "Low",
            Reliability::Medium => "Medium",
            Reliability::High => "High",
            Reliability::VeryHigh => "Very high",
        }
    }
}

/// A single search request, identified by its sequence number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    pub seq: u64,
    pub query: String,
    pub source: SourceFilter,
    pub kind: SearchKind,
}

/// A result record as returned by a search source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub source: DataSource,
    pub reliability: Reliability,
    pub last_update: String,
    /// Percentage, 0-100
    pub confidence: u8,
    pub data: BTreeMap<String, String>,
}

/// Integration point for OSINT data sources
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// Run a lookup and return matching records
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, SearchError>;

    /// Human readable source name
    fn name(&self) -> &str;
}

/// Shared source handle
pub type SharedSource = Arc<dyn SearchSource>;

/// Keep only records whose source belongs to the filter's category
pub fn filter_by_source(results: Vec<SearchResult>, filter: SourceFilter) -> Vec<SearchResult> {
    results.into_iter().filter(|r| filter.admits(r.source)).collect()
}

#[allow(clippy::too_many_arguments)]
fn record(
    id: u32,
    name: &str,
    kind: &str,
    source: DataSource,
    reliability: Reliability,
    last_update: &str,
    confidence: u8,
    data: &[(&str, &str)],
) -> SearchResult {
    SearchResult {
        id,
        name: name.to_string(),
        kind: kind.to_string(),
        source,
        reliability,
        last_update: last_update.to_string(),
        confidence,
        data: data
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

/// The five synthetic records, named after the query
pub fn synthetic_results(query: &str) -> Vec<SearchResult> {
    vec![
        record(1, query, "Person", DataSource::Facebook, Reliability::High, "2024-01-15", 92, &[
            ("age", "34"),
            ("location", "Paris, France"),
            ("job", "Software engineer"),
            ("connections", "247 friends"),
            ("activity", "Active 2h ago"),
        ]),
        record(2, query, "Person", DataSource::LinkedIn, Reliability::VeryHigh, "2024-01-14", 96, &[
            ("company", "Tech Corp"),
            ("position", "Senior Developer"),
            ("connections", "500+ connections"),
            ("activity", "Posted 1 day ago"),
        ]),
        record(3, query, "Mention", DataSource::PressArticle, Reliability::Medium, "2024-01-10", 78, &[
            ("title", "Technology conference"),
            ("context", "Speaker on AI"),
            ("publication", "Tech News"),
            ("sentiment", "Positive"),
        ]),
        record(4, query, "Profile", DataSource::Twitter, Reliability::Medium, "2024-01-12", 84, &[
            ("handle", "@alexdubois_dev"),
            ("followers", "1.2K followers"),
            ("tweets", "456 tweets"),
            ("activity", "Active daily"),
        ]),
        record(5, query, "Reference", DataSource::PublicDatabase, Reliability::VeryHigh, "2024-01-08", 98, &[
            ("registry", "Trade register"),
            ("role", "Director"),
            ("company", "Tech Innovation SARL"),
            ("status", "Active"),
        ]),
    ]
}

/// Simulated source: fixed latency, fixed records
#[derive(Debug, Clone)]
pub struct MockSearchSource {
    latency: Duration,
}

impl MockSearchSource {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for MockSearchSource {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_LATENCY)
    }
}

#[async_trait]
impl SearchSource for MockSearchSource {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchResult>, SearchError> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let results = filter_by_source(synthetic_results(query), request.source);
        debug!(
            "Mock search #{} '{}' ({}): {} records",
            request.seq,
            query,
            request.source.as_str(),
            results.len()
        );
        Ok(results)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Create the default shared source
pub fn create_mock_source(latency: Duration) -> SharedSource {
    Arc::new(MockSearchSource::new(latency))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(query: &str, source: SourceFilter) -> SearchRequest {
        SearchRequest {
            seq: 1,
            query: query.to_string(),
            source,
            kind: SearchKind::Person,
        }
    }

    #[test]
    fn test_synthetic_results_use_query_as_name() {
        let results = synthetic_results("Marie Leclerc");
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.name == "Marie Leclerc"));
        assert!(results.iter().all(|r| r.confidence <= 100));
    }

    #[test]
    fn test_social_filter() {
        let results = filter_by_source(synthetic_results("x"), SourceFilter::Social);
        let sources: Vec<DataSource> = results.iter().map(|r| r.source).collect();
        assert_eq!(
            sources,
            vec![DataSource::Facebook, DataSource::LinkedIn, DataSource::Twitter]
        );
    }

    #[test]
    fn test_all_filter_is_unrestricted() {
        let results = filter_by_source(synthetic_results("x"), SourceFilter::All);
        assert_eq!(results.len(), 5);
    }

    #[test]
    fn test_forums_filter_is_empty() {
        let results = filter_by_source(synthetic_results("x"), SourceFilter::Forums);
        assert!(results.is_empty());
    }

    #[test]
    fn test_result_serializes_type_field() {
        let json = serde_json::to_value(&synthetic_results("x")[2]).unwrap();
        assert_eq!(json["type"], "Mention");
        assert_eq!(json["source"], "Press article");
        assert_eq!(json["reliability"], "medium");
    }

    #[tokio::test]
    async fn test_mock_source_filters() {
        let source = MockSearchSource::new(Duration::ZERO);
        let results = source
            .search(&request("Jean Martin", SourceFilter::Databases))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].source, DataSource::PublicDatabase);
    }

    #[tokio::test]
    async fn test_mock_source_rejects_blank_query() {
        let source = MockSearchSource::new(Duration::ZERO);
        let err = source.search(&request("   ", SourceFilter::All)).await;
        assert!(matches!(err, Err(SearchError::EmptyQuery)));
    }
}
