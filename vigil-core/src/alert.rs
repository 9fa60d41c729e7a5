//! Analyst alerts
//!
//! Alerts are passive notifications shown on the dashboard. The kind only
//! selects presentation; it carries no behavior.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Presentation category of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Success,
    Warning,
    Error,
    Info,
}

impl AlertKind {
    pub fn label(&self) -> &'static str {
        match self {
            AlertKind::Success => "success",
            AlertKind::Warning => "warning",
            AlertKind::Error => "error",
            AlertKind::Info => "info",
        }
    }
}

/// A notification surfaced to the analyst
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Identifier assigned by the creator
    pub id: String,
    pub kind: AlertKind,
    pub title: String,
    pub message: String,
    /// Creation time, display only
    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// Create an alert with a fresh random identifier, stamped now
    pub fn new(kind: AlertKind, title: &str, message: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            title: title.to_string(),
            message: message.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Human readable age such as "5 min ago"
    pub fn age_label(&self, now: DateTime<Utc>) -> String {
        let minutes = (now - self.created_at).num_minutes().max(0);
        match minutes {
            0 => "just now".to_string(),
            m if m < 60 => format!("{} min ago", m),
            m => format!("{} h ago", m / 60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_ids_are_unique() {
        let a = Alert::new(AlertKind::Info, "a", "first");
        let b = Alert::new(AlertKind::Info, "b", "second");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_age_label() {
        let now = Utc::now();
        let alert = Alert::new(AlertKind::Warning, "t", "m")
            .created_at(now - chrono::Duration::minutes(13));
        assert_eq!(alert.age_label(now), "13 min ago");

        let old = alert.clone().created_at(now - chrono::Duration::minutes(130));
        assert_eq!(old.age_label(now), "2 h ago");
    }
}
