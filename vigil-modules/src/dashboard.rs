//! Dashboard Module

use serde::Serialize;
use tracing::debug;

use vigil_core::{Alert, SessionStore, Target};

use crate::ModuleError;

/// A headline metric card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub title: &'static str,
    pub value: &'static str,
    pub change: &'static str,
}

impl Metric {
    pub fn is_increase(&self) -> bool {
        self.change.starts_with('+')
    }
}

/// One hour of the activity chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivityPoint {
    pub time: &'static str,
    pub searches: u64,
    pub profiles: u64,
    pub alerts: u64,
}

pub fn metrics() -> [Metric; 4] {
    [
        Metric { title: "Active profiles", value: "2,847", change: "+12%" },
        Metric { title: "Searches today", value: "1,234", change: "+8%" },
        Metric { title: "Critical alerts", value: "23", change: "-5%" },
        Metric { title: "Sources analyzed", value: "156,789", change: "+15%" },
    ]
}

pub fn activity_series() -> Vec<ActivityPoint> {
    [
        ("09:00", 45, 12, 3),
        ("10:00", 78, 23, 5),
        ("11:00", 123, 34, 8),
        ("12:00", 156, 45, 12),
        ("13:00", 189, 56, 15),
        ("14:00", 234, 67, 18),
        ("15:00", 198, 54, 14),
    ]
    .into_iter()
    .map(|(time, searches, profiles, alerts)| ActivityPoint {
        time,
        searches,
        profiles,
        alerts,
    })
    .collect()
}

/// Rows of the recent-targets table, in list order
pub fn recent_targets(targets: &[Target]) -> Vec<Target> {
    targets.to_vec()
}

/// Alert panel cursor
#[derive(Debug, Default)]
pub struct DashboardModule {
    cursor: usize,
}

impl DashboardModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: isize, alerts: usize) {
        self.cursor = crate::step_cursor(self.cursor, delta, alerts);
    }

    pub fn selected_alert(&self, alerts: &[Alert]) -> Option<Alert> {
        alerts.get(self.cursor).cloned()
    }

    /// Dismiss the alert under the cursor
    pub fn dismiss_selected(&mut self, store: &SessionStore) -> Result<Alert, ModuleError> {
        let alert = self
            .selected_alert(&store.alerts())
            .ok_or(ModuleError::NothingSelected)?;
        store.dismiss_alert(&alert.id);
        self.cursor = crate::step_cursor(self.cursor, 0, store.alert_count());
        debug!("Dismissed alert {}", alert.id);
        Ok(alert)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vigil_core::{seed_targets, SystemClock};

    #[test]
    fn test_dismiss_selected_clamps_cursor() {
        let store = SessionStore::seeded(Arc::new(SystemClock));
        let mut module = DashboardModule::new();
        module.move_cursor(5, store.alert_count());
        assert_eq!(module.cursor(), 2);

        let dismissed = module.dismiss_selected(&store).unwrap();
        assert_eq!(dismissed.id, "3");
        assert_eq!(store.alert_count(), 2);
        assert_eq!(module.cursor(), 1);
    }

    #[test]
    fn test_dismiss_with_no_alerts() {
        let store = SessionStore::new(Arc::new(SystemClock));
        let mut module = DashboardModule::new();
        assert!(matches!(
            module.dismiss_selected(&store),
            Err(ModuleError::NothingSelected)
        ));
    }

    #[test]
    fn test_recent_targets_follow_list_order() {
        let recent = recent_targets(&seed_targets());
        assert_eq!(recent.len(), 4);
        assert_eq!(recent[0].name, "Alexandre Dubois");
    }

    #[test]
    fn test_static_data() {
        assert!(!metrics()[2].is_increase());
        assert_eq!(activity_series().len(), 7);
    }
}
