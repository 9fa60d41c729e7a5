//! Surveillance Module
//!
//! Realtime events, the active-target table and surveillance zones.
//! Activity counts fluctuate, but only when [`SurveillanceModule::refresh`]
//! runs on the runtime tick; rendering reads the last generated values.

use rand::Rng;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

use vigil_core::{Alert, AlertKind, RiskLevel, SessionStore, Target, TargetId};

use crate::{ModuleError, Notice, Tab};

/// Names used for events when the target list is shorter than the feed
const FALLBACK_NAMES: [&str; 4] = ["Alexandre Dubois", "Marie Leclerc", "Jean Martin", "Sophie Bernard"];

const LOCATIONS: [&str; 4] = ["Paris 15th", "Lyon 3rd", "Marseille", "Nice"];

/// Upper bound of generated activity counts
pub const MAX_ACTIVITY: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurveillanceTab {
    #[default]
    Realtime,
    Targets,
    Zones,
}

impl Tab for SurveillanceTab {
    const ALL: &'static [Self] = &[
        SurveillanceTab::Realtime,
        SurveillanceTab::Targets,
        SurveillanceTab::Zones,
    ];

    fn label(&self) -> &'static str {
        match self {
            SurveillanceTab::Realtime => "Realtime",
            SurveillanceTab::Targets => "Active targets",
            SurveillanceTab::Zones => "Zones",
        }
    }
}

/// An event in the realtime feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveillanceEvent {
    pub id: u32,
    pub time: &'static str,
    pub kind: &'static str,
    pub target: String,
    pub event: &'static str,
    pub location: &'static str,
    pub priority: &'static str,
    pub status: &'static str,
}

/// Presence state shown for a monitored target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Presence {
    Online,
    Active,
    Inactive,
}

impl Presence {
    pub fn label(&self) -> &'static str {
        match self {
            Presence::Online => "Online",
            Presence::Active => "Active",
            Presence::Inactive => "Inactive",
        }
    }
}

/// A row of the active-target table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveTarget {
    pub id: TargetId,
    pub name: String,
    pub presence: Presence,
    pub last_seen: &'static str,
    pub location: &'static str,
    pub risk: RiskLevel,
    pub activities: u32,
}

/// A monitored geographic zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Zone {
    pub id: u32,
    pub name: &'static str,
    pub location: &'static str,
    pub targets: u32,
    pub alerts: u32,
    pub status: &'static str,
}

pub fn zones() -> Vec<Zone> {
    vec![
        Zone { id: 1, name: "Zone Alpha", location: "Paris Centre", targets: 12, alerts: 3, status: "Active" },
        Zone { id: 2, name: "Zone Beta", location: "Lyon Confluence", targets: 8, alerts: 1, status: "Active" },
        Zone { id: 3, name: "Zone Gamma", location: "Marseille Vieux-Port", targets: 5, alerts: 0, status: "Watch" },
    ]
}

/// The realtime feed, attributed to the first four targets
pub fn realtime_events(targets: &[Target]) -> Vec<SurveillanceEvent> {
    let name = |i: usize| {
        targets
            .get(i)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| FALLBACK_NAMES[i].to_string())
    };

    vec![
        SurveillanceEvent {
            id: 1,
            time: "14:23:45",
            kind: "Social",
            target: name(0),
            event: "New LinkedIn post",
            location: "Paris, France",
            priority: "Medium",
            status: "New",
        },
        SurveillanceEvent {
            id: 2,
            time: "14:22:12",
            kind: "Location",
            target: name(1),
            event: "Restaurant check-in",
            location: "Lyon, France",
            priority: "Low",
            status: "Analyzed",
        },
        SurveillanceEvent {
            id: 3,
            time: "14:20:33",
            kind: "Communication",
            target: name(2),
            event: "Messaging account activated",
            location: "Marseille, France",
            priority: "High",
            status: "In progress",
        },
        SurveillanceEvent {
            id: 4,
            time: "14:18:56",
            kind: "Network",
            target: name(3),
            event: "New suspicious connection",
            location: "Nice, France",
            priority: "Critical",
            status: "Alerted",
        },
    ]
}

/// Tab selection, zone selection and the latest activity sample
#[derive(Debug, Default)]
pub struct SurveillanceModule {
    pub tab: SurveillanceTab,
    selected_zone: Option<u32>,
    activity: HashMap<TargetId, u32>,
    cursor: usize,
}

impl SurveillanceModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: isize, len: usize) {
        self.cursor = crate::step_cursor(self.cursor, delta, len);
    }

    pub fn set_tab(&mut self, tab: SurveillanceTab) {
        self.tab = tab;
        self.cursor = 0;
    }

    /// Draw a new activity sample for every target
    pub fn refresh<R: Rng + ?Sized>(&mut self, targets: &[Target], rng: &mut R) {
        self.activity = targets
            .iter()
            .map(|t| (t.id, rng.gen_range(1..=MAX_ACTIVITY)))
            .collect();
        debug!("Surveillance activity refreshed for {} targets", targets.len());
    }

    pub fn activity(&self, id: TargetId) -> u32 {
        self.activity.get(&id).copied().unwrap_or(0)
    }

    /// Project the target list into the active-target table
    pub fn active_targets(&self, targets: &[Target]) -> Vec<ActiveTarget> {
        targets
            .iter()
            .enumerate()
            .map(|(index, t)| {
                let (presence, last_seen) = match index {
                    0 => (Presence::Online, "2 min"),
                    1 => (Presence::Active, "5 min"),
                    _ => (Presence::Inactive, "1h"),
                };
                ActiveTarget {
                    id: t.id,
                    name: t.name.clone(),
                    presence,
                    last_seen,
                    location: LOCATIONS.get(index).copied().unwrap_or("Unknown"),
                    risk: t.risk,
                    activities: self.activity(t.id),
                }
            })
            .collect()
    }

    pub fn selected_zone(&self) -> Option<u32> {
        self.selected_zone
    }

    /// Select a zone for management
    pub fn manage_zone(&mut self, zone_id: u32) -> Result<Notice, ModuleError> {
        let zone = zones()
            .into_iter()
            .find(|z| z.id == zone_id)
            .ok_or_else(|| ModuleError::UnknownRecord(format!("zone {}", zone_id)))?;
        self.selected_zone = Some(zone.id);
        Ok(Notice::info(format!("Managing {} - {}", zone.name, zone.location)))
    }

    /// Start analysis of a feed event; critical events raise an alert
    pub fn analyze_event(&self, store: &SessionStore, event_id: u32) -> Result<Notice, ModuleError> {
        let event = realtime_events(&store.targets())
            .into_iter()
            .find(|e| e.id == event_id)
            .ok_or_else(|| ModuleError::UnknownRecord(format!("event {}", event_id)))?;

        if event.priority == "Critical" {
            info!("Critical event escalated: {}", event.event);
            store.push_alert(Alert::new(
                AlertKind::Warning,
                "Critical event",
                &format!("{} - {}", event.event, event.target),
            ));
        }
        Ok(Notice::info(format!("Analysis started for event: {}", event.event)))
    }

    pub fn start_surveillance(&self, target: &ActiveTarget) -> Notice {
        Notice::info(format!("Surveillance enabled for {}", target.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;
    use vigil_core::{seed_targets, SystemClock};

    #[test]
    fn test_render_is_stable_between_refreshes() {
        let targets = seed_targets();
        let mut module = SurveillanceModule::new();
        module.refresh(&targets, &mut StdRng::seed_from_u64(7));

        let first = module.active_targets(&targets);
        let second = module.active_targets(&targets);
        assert_eq!(first, second);
        assert!(first.iter().all(|t| (1..=MAX_ACTIVITY).contains(&t.activities)));
    }

    #[test]
    fn test_active_target_projection() {
        let targets = seed_targets();
        let rows = SurveillanceModule::new().active_targets(&targets);
        assert_eq!(rows[0].presence, Presence::Online);
        assert_eq!(rows[1].last_seen, "5 min");
        assert_eq!(rows[3].presence, Presence::Inactive);
        assert_eq!(rows[3].location, "Nice");
        assert_eq!(rows[0].activities, 0);
    }

    #[test]
    fn test_events_fall_back_to_seed_names() {
        let events = realtime_events(&seed_targets()[..1]);
        assert_eq!(events[0].target, "Alexandre Dubois");
        assert_eq!(events[3].target, "Sophie Bernard");
    }

    #[test]
    fn test_manage_zone() {
        let mut module = SurveillanceModule::new();
        assert!(module.manage_zone(2).is_ok());
        assert_eq!(module.selected_zone(), Some(2));
        assert!(module.manage_zone(9).is_err());
    }

    #[test]
    fn test_critical_event_raises_alert() {
        let store = SessionStore::new(Arc::new(SystemClock));
        let module = SurveillanceModule::new();

        module.analyze_event(&store, 1).unwrap();
        assert_eq!(store.alert_count(), 0);
        module.analyze_event(&store, 4).unwrap();
        assert_eq!(store.alert_count(), 1);
    }
}
