//! Session Store - the single source of truth for durable session state
//!
//! The store owns the two collections that live for a whole session:
//! - Alerts, in insertion order
//! - Targets, addressed by their immutable [`TargetId`]
//!
//! Views read cloned snapshots and request mutations through the store's
//! operations. Every mutation is broadcast as a [`StoreEvent`] so that
//! independent views can react without polling.

use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::{
    seed_alerts, seed_targets, Alert, RiskLevel, SharedClock, Target, TargetDraft, TargetId,
    STORE_EVENT_CAPACITY,
};

/// Errors from store operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Target not found: {0}")]
    TargetNotFound(String),

    #[error("Name '{0}' matches {1} targets")]
    AmbiguousName(String, usize),

    #[error("Invalid target: {0}")]
    InvalidDraft(String),

    #[error("Invalid target id: {0}")]
    InvalidId(String),
}

/// Change notifications emitted after each mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    AlertAdded(String),
    AlertDismissed(String),
    TargetAdded(TargetId),
    TargetUpdated(TargetId),
    TargetRemoved(TargetId),
}

#[derive(Debug, Default)]
struct SessionState {
    alerts: Vec<Alert>,
    targets: Vec<Target>,
    /// Next target sequence number, never decremented
    next_seq: u32,
}

/// Shared, consistently observed session state
pub struct SessionStore {
    state: RwLock<SessionState>,
    clock: SharedClock,
    events: broadcast::Sender<StoreEvent>,
}

impl SessionStore {
    /// Create an empty store
    pub fn new(clock: SharedClock) -> Self {
        Self::with_data(clock, Vec::new(), Vec::new())
    }

    /// Create a store holding the startup seed data
    pub fn seeded(clock: SharedClock) -> Self {
        let alerts = seed_alerts(chrono::Utc::now());
        Self::with_data(clock, alerts, seed_targets())
    }

    /// Create a store from existing collections.
    ///
    /// The id counter resumes after the highest sequence present.
    pub fn with_data(clock: SharedClock, alerts: Vec<Alert>, targets: Vec<Target>) -> Self {
        let next_seq = targets.iter().map(|t| t.id.seq()).max().unwrap_or(0) + 1;
        let (events, _) = broadcast::channel(STORE_EVENT_CAPACITY);

        Self {
            state: RwLock::new(SessionState {
                alerts,
                targets,
                next_seq,
            }),
            clock,
            events,
        }
    }

    /// Subscribe to change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Current `HH:MM` according to the store clock
    pub fn clock_hhmm(&self) -> String {
        self.clock.hhmm()
    }

    // ---- alerts ----

    /// Snapshot of all alerts in insertion order
    pub fn alerts(&self) -> Vec<Alert> {
        self.state.read().alerts.clone()
    }

    pub fn alert_count(&self) -> usize {
        self.state.read().alerts.len()
    }

    /// Append an alert
    pub fn push_alert(&self, alert: Alert) {
        let id = alert.id.clone();
        self.state.write().alerts.push(alert);
        debug!("Alert added: {}", id);
        self.notify(StoreEvent::AlertAdded(id));
    }

    /// Remove the alert with a matching id.
    ///
    /// Returns `false` when no alert carries that id; that is not an error.
    pub fn dismiss_alert(&self, id: &str) -> bool {
        let removed = {
            let mut state = self.state.write();
            let before = state.alerts.len();
            state.alerts.retain(|a| a.id != id);
            state.alerts.len() != before
        };

        if removed {
            debug!("Alert dismissed: {}", id);
            self.notify(StoreEvent::AlertDismissed(id.to_string()));
        }
        removed
    }

    // ---- targets ----

    /// Snapshot of all targets in insertion order
    pub fn targets(&self) -> Vec<Target> {
        self.state.read().targets.clone()
    }

    pub fn target_count(&self) -> usize {
        self.state.read().targets.len()
    }

    /// Look up a target by id
    pub fn target(&self, id: TargetId) -> Option<Target> {
        self.state.read().targets.iter().find(|t| t.id == id).cloned()
    }

    /// The identifier the next created target will receive
    pub fn next_target_id(&self) -> TargetId {
        TargetId::new(self.state.read().next_seq)
    }

    /// Resolve a display name to exactly one target
    pub fn find_by_name(&self, name: &str) -> Result<Target, StoreError> {
        let state = self.state.read();
        let mut matches = state.targets.iter().filter(|t| t.name == name);

        match (matches.next(), matches.count()) {
            (None, _) => Err(StoreError::TargetNotFound(name.to_string())),
            (Some(target), 0) => Ok(target.clone()),
            (Some(_), rest) => Err(StoreError::AmbiguousName(name.to_string(), rest + 1)),
        }
    }

    /// Create a target from a draft and append it
    pub fn add_target(&self, draft: TargetDraft) -> Result<Target, StoreError> {
        draft.validate()?;
        let last_update = self.clock.hhmm();

        let target = {
            let mut state = self.state.write();
            let id = TargetId::new(state.next_seq);
            state.next_seq += 1;

            let target = Target {
                id,
                name: draft.name.trim().to_string(),
                status: draft.status,
                risk: draft.risk,
                last_update,
            };
            state.targets.push(target.clone());
            target
        };

        info!("Target created: {} ({})", target.id, target.name);
        self.notify(StoreEvent::TargetAdded(target.id));
        Ok(target)
    }

    /// Replace name, status and risk of the addressed target
    pub fn update_target(&self, id: TargetId, draft: TargetDraft) -> Result<Target, StoreError> {
        draft.validate()?;
        let last_update = self.clock.hhmm();

        let updated = {
            let mut state = self.state.write();
            let target = state
                .targets
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| StoreError::TargetNotFound(id.to_string()))?;

            target.name = draft.name.trim().to_string();
            target.status = draft.status;
            target.risk = draft.risk;
            target.last_update = last_update;
            target.clone()
        };

        info!("Target updated: {} ({})", updated.id, updated.name);
        self.notify(StoreEvent::TargetUpdated(id));
        Ok(updated)
    }

    /// Remove the addressed target
    pub fn remove_target(&self, id: TargetId) -> Result<Target, StoreError> {
        let removed = {
            let mut state = self.state.write();
            let idx = state
                .targets
                .iter()
                .position(|t| t.id == id)
                .ok_or_else(|| StoreError::TargetNotFound(id.to_string()))?;
            state.targets.remove(idx)
        };

        info!("Target removed: {} ({})", removed.id, removed.name);
        self.notify(StoreEvent::TargetRemoved(id));
        Ok(removed)
    }

    /// Get store statistics
    pub fn stats(&self) -> StoreStats {
        let state = self.state.read();
        let count_risk = |risk: RiskLevel| state.targets.iter().filter(|t| t.risk == risk).count();

        StoreStats {
            alerts: state.alerts.len(),
            targets: state.targets.len(),
            critical_targets: count_risk(RiskLevel::Critical),
            high_risk_targets: count_risk(RiskLevel::High),
        }
    }

    fn notify(&self, event: StoreEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }
}

/// Store statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub alerts: usize,
    pub targets: usize,
    pub critical_targets: usize,
    pub high_risk_targets: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AlertKind, FixedClock, TargetStatus};
    use chrono::{Local, TimeZone};
    use std::sync::Arc;

    fn fixed_clock() -> SharedClock {
        let at = Local.with_ymd_and_hms(2024, 1, 15, 16, 7, 0).single().unwrap();
        Arc::new(FixedClock(at))
    }

    fn draft(name: &str) -> TargetDraft {
        TargetDraft::new(name, TargetStatus::Profiling, RiskLevel::Low)
    }

    #[test]
    fn test_dismiss_alert_preserves_order() {
        let store = SessionStore::seeded(fixed_clock());
        let before: Vec<String> = store.alerts().iter().map(|a| a.id.clone()).collect();
        assert_eq!(before, vec!["1", "2", "3"]);

        assert!(store.dismiss_alert("2"));
        let after: Vec<String> = store.alerts().iter().map(|a| a.id.clone()).collect();
        assert_eq!(after, vec!["1", "3"]);
    }

    #[test]
    fn test_dismiss_missing_alert_is_noop() {
        let store = SessionStore::seeded(fixed_clock());
        let before = store.alerts();
        assert!(!store.dismiss_alert("does-not-exist"));
        assert_eq!(store.alerts(), before);
    }

    #[test]
    fn test_add_target_assigns_padded_id_and_time() {
        let store = SessionStore::seeded(fixed_clock());
        let count = store.target_count();

        let target = store.add_target(draft("Claire Petit")).unwrap();
        assert_eq!(store.target_count(), count + 1);
        assert_eq!(target.id.to_string(), format!("TGT-{:03}", count + 1));
        assert_eq!(target.last_update, "16:07");
        assert_eq!(store.targets().last().unwrap(), &target);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let store = SessionStore::new(fixed_clock());
        let a = store.add_target(draft("A")).unwrap();
        let b = store.add_target(draft("B")).unwrap();
        store.remove_target(a.id).unwrap();

        let c = store.add_target(draft("C")).unwrap();
        assert_ne!(c.id, b.id);
        assert_eq!(c.id.to_string(), "TGT-003");
    }

    #[test]
    fn test_add_target_rejects_blank_name() {
        let store = SessionStore::new(fixed_clock());
        let err = store.add_target(draft("  ")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidDraft(_)));
        assert_eq!(store.target_count(), 0);
    }

    #[test]
    fn test_update_by_id_leaves_namesakes_alone() {
        let store = SessionStore::new(fixed_clock());
        let first = store.add_target(draft("Jean Martin")).unwrap();
        let second = store.add_target(draft("Jean Martin")).unwrap();

        let updated = store
            .update_target(
                first.id,
                TargetDraft::new("Jean Martin", TargetStatus::Validated, RiskLevel::Critical),
            )
            .unwrap();

        assert_eq!(updated.risk, RiskLevel::Critical);
        assert_eq!(store.target(second.id).unwrap().risk, RiskLevel::Low);
    }

    // Edits and deletes used to match on the display name, so editing one
    // "Jean Martin" rewrote every namesake and a delete removed them all.
    // They are keyed by id now; namesakes keep their own state.
    #[test]
    fn test_namesakes_no_longer_edited_or_removed_together() {
        let store = SessionStore::new(fixed_clock());
        let first = store.add_target(draft("Jean Martin")).unwrap();
        let second = store.add_target(draft("Jean Martin")).unwrap();

        store
            .update_target(
                first.id,
                TargetDraft::new("Jean Martin", TargetStatus::UnderAnalysis, RiskLevel::High),
            )
            .unwrap();
        let untouched = store.target(second.id).unwrap();
        assert_eq!(untouched.status, TargetStatus::Profiling);
        assert_eq!(untouched.risk, RiskLevel::Low);

        store.remove_target(first.id).unwrap();
        assert_eq!(store.targets(), vec![untouched]);
    }

    #[test]
    fn test_find_by_name_reports_ambiguity() {
        let store = SessionStore::new(fixed_clock());
        store.add_target(draft("Jean Martin")).unwrap();
        store.add_target(draft("Jean Martin")).unwrap();
        store.add_target(draft("Sophie Bernard")).unwrap();

        assert_eq!(
            store.find_by_name("Jean Martin"),
            Err(StoreError::AmbiguousName("Jean Martin".to_string(), 2))
        );
        assert!(store.find_by_name("Sophie Bernard").is_ok());
        assert!(matches!(
            store.find_by_name("Nobody"),
            Err(StoreError::TargetNotFound(_))
        ));
    }

    #[test]
    fn test_remove_unknown_target() {
        let store = SessionStore::seeded(fixed_clock());
        assert!(store.remove_target(TargetId::new(99)).is_err());
        assert_eq!(store.target_count(), 4);
    }

    #[test]
    fn test_seeded_counter_continues_after_seed() {
        let store = SessionStore::seeded(fixed_clock());
        assert_eq!(store.next_target_id().to_string(), "TGT-005");
    }

    #[test]
    fn test_mutations_are_broadcast() {
        let store = SessionStore::new(fixed_clock());
        let mut rx = store.subscribe();

        let target = store.add_target(draft("A")).unwrap();
        store.push_alert(Alert::new(AlertKind::Info, "t", "m").with_id("x"));
        store.dismiss_alert("x");

        assert_eq!(rx.try_recv().unwrap(), StoreEvent::TargetAdded(target.id));
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::AlertAdded("x".to_string()));
        assert_eq!(rx.try_recv().unwrap(), StoreEvent::AlertDismissed("x".to_string()));
    }

    #[test]
    fn test_stats() {
        let store = SessionStore::seeded(fixed_clock());
        let stats = store.stats();
        assert_eq!(stats.alerts, 3);
        assert_eq!(stats.targets, 4);
        assert_eq!(stats.critical_targets, 1);
        assert_eq!(stats.high_risk_targets, 1);
    }
}
