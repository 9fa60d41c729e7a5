//! Profile Module
//!
//! A one-to-one projection of the shared target list, with an edit form and
//! a confirmed delete. Both are addressed by [`TargetId`], never by name.

use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tracing::{debug, info};

use vigil_core::{
    export_date, export_filename, Exporter, RiskLevel, SessionStore, Target, TargetDraft, TargetId,
    TargetStatus,
};

use crate::ModuleError;

/// A target as shown in the profile list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileCard {
    pub id: TargetId,
    pub name: String,
    pub status: TargetStatus,
    pub risk: RiskLevel,
    pub last_update: String,
    /// Picture placeholder derived from list position
    pub avatar: String,
}

/// Project the target list into profile cards
pub fn profile_cards(targets: &[Target]) -> Vec<ProfileCard> {
    targets
        .iter()
        .enumerate()
        .map(|(index, t)| ProfileCard {
            id: t.id,
            name: t.name.clone(),
            status: t.status,
            risk: t.risk,
            last_update: t.last_update.clone(),
            avatar: format!("avatar-{}", index + 1),
        })
        .collect()
}

/// Field focused in the edit form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditField {
    #[default]
    Name,
    Status,
    Risk,
}

impl EditField {
    pub fn next(self) -> Self {
        match self {
            EditField::Name => EditField::Status,
            EditField::Status => EditField::Risk,
            EditField::Risk => EditField::Name,
        }
    }
}

/// Edit form pre-filled from a target snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    pub target_id: TargetId,
    pub name: String,
    pub status: TargetStatus,
    pub risk: RiskLevel,
    pub focus: EditField,
}

impl EditForm {
    pub fn from_target(target: &Target) -> Self {
        Self {
            target_id: target.id,
            name: target.name.clone(),
            status: target.status,
            risk: target.risk,
            focus: EditField::default(),
        }
    }

    pub fn to_draft(&self) -> TargetDraft {
        TargetDraft::new(&self.name, self.status, self.risk)
    }
}

/// Static detail block attached to profile reports
#[derive(Debug, Clone)]
pub struct ProfileDetail {
    pub personal: Vec<(&'static str, &'static str)>,
    pub professional: Vec<(&'static str, &'static str)>,
    pub social: Vec<(&'static str, &'static str)>,
    pub interests: Vec<&'static str>,
    pub connections: Vec<Connection>,
    pub timeline: Vec<TimelineEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Connection {
    pub name: &'static str,
    pub relation: &'static str,
    pub platform: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    pub date: &'static str,
    pub event: &'static str,
    pub importance: &'static str,
}

impl ProfileDetail {
    /// The synthetic detail block; not derived from the profile
    pub fn synthetic() -> Self {
        Self {
            personal: vec![
                ("age", "34"),
                ("location", "Paris, France"),
                ("phone", "+33 1 23 45 67 89"),
                ("email", "alexandre.dubois@email.com"),
                ("nationality", "French"),
            ],
            professional: vec![
                ("company", "Tech Innovation Corp"),
                ("position", "Senior Software Engineer"),
                ("industry", "Technology"),
                ("experience", "12 years"),
                ("salary", "65,000 EUR/year (estimated)"),
            ],
            social: vec![
                ("facebook", "Public profile - 247 friends"),
                ("linkedin", "500+ connections"),
                ("twitter", "@alexdubois_dev"),
                ("instagram", "Private profile"),
                ("activity", "Active daily"),
            ],
            interests: vec![
                "Artificial intelligence",
                "Web development",
                "Cybersecurity",
                "Entrepreneurship",
                "Travel",
                "Photography",
            ],
            connections: vec![
                Connection { name: "Sophie Martin", relation: "Colleague", platform: "LinkedIn" },
                Connection { name: "Thomas Bernard", relation: "Close friend", platform: "Facebook" },
                Connection { name: "Julie Moreau", relation: "Former colleague", platform: "LinkedIn" },
                Connection { name: "Pierre Durand", relation: "Business contact", platform: "Twitter" },
            ],
            timeline: vec![
                TimelineEntry { date: "2024-01-15", event: "LinkedIn post about AI", importance: "Medium" },
                TimelineEntry { date: "2024-01-14", event: "Check-in at a Paris restaurant", importance: "Low" },
                TimelineEntry { date: "2024-01-12", event: "Technology conference", importance: "High" },
                TimelineEntry { date: "2024-01-10", event: "Job change", importance: "Critical" },
            ],
        }
    }

    fn section(pairs: &[(&str, &str)]) -> serde_json::Value {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), json!(v)))
            .collect::<serde_json::Map<_, _>>()
            .into()
    }

    /// JSON form with each section as an object
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "personal": Self::section(&self.personal),
            "professional": Self::section(&self.professional),
            "social": Self::section(&self.social),
            "interests": self.interests,
            "connections": self.connections,
            "timeline": self.timeline,
        })
    }
}

/// Profile list selection, edit form and pending delete
#[derive(Debug, Default)]
pub struct ProfilesModule {
    selected: Option<TargetId>,
    edit: Option<EditForm>,
    pending_delete: Option<TargetId>,
}

impl ProfilesModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// The displayed profile: the selection if still present, else the first
    pub fn current(&self, targets: &[Target]) -> Option<Target> {
        self.selected
            .and_then(|id| targets.iter().find(|t| t.id == id))
            .or_else(|| targets.first())
            .cloned()
    }

    pub fn select(&mut self, id: TargetId) {
        self.selected = Some(id);
    }

    /// Move the selection up or down the list
    pub fn select_step(&mut self, targets: &[Target], delta: isize) {
        let Some(current) = self.current(targets) else {
            self.selected = None;
            return;
        };
        let idx = targets.iter().position(|t| t.id == current.id).unwrap_or(0);
        let next = crate::step_cursor(idx, delta, targets.len());
        self.selected = targets.get(next).map(|t| t.id);
    }

    // ---- edit ----

    pub fn edit_form(&self) -> Option<&EditForm> {
        self.edit.as_ref()
    }

    pub fn edit_form_mut(&mut self) -> Option<&mut EditForm> {
        self.edit.as_mut()
    }

    /// Open the edit form for a target
    pub fn begin_edit(&mut self, store: &SessionStore, id: TargetId) -> Result<(), ModuleError> {
        let target = store
            .target(id)
            .ok_or_else(|| ModuleError::UnknownRecord(id.to_string()))?;
        debug!("Editing profile {}", id);
        self.edit = Some(EditForm::from_target(&target));
        Ok(())
    }

    /// Write the form back to the addressed target and close the form
    pub fn save_edit(&mut self, store: &SessionStore) -> Result<Target, ModuleError> {
        let form = self.edit.as_ref().ok_or(ModuleError::NothingSelected)?;
        let updated = store.update_target(form.target_id, form.to_draft())?;
        self.edit = None;
        Ok(updated)
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    // ---- delete ----

    pub fn pending_delete(&self) -> Option<TargetId> {
        self.pending_delete
    }

    /// Ask for confirmation before deleting
    pub fn request_delete(&mut self, id: TargetId) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the target awaiting confirmation.
    ///
    /// If it was the displayed profile, the selection falls back to the
    /// first remaining profile (or none).
    pub fn confirm_delete(&mut self, store: &SessionStore) -> Result<Target, ModuleError> {
        let id = self.pending_delete.take().ok_or(ModuleError::NothingSelected)?;
        let removed = store.remove_target(id)?;

        if self.selected.map_or(true, |selected| selected == id) {
            self.selected = store.targets().first().map(|t| t.id);
        }
        info!("Profile {} deleted", id);
        Ok(removed)
    }

    /// Export the displayed profile with the synthetic detail block
    pub fn export_report(&self, store: &SessionStore, exporter: &Exporter) -> Result<PathBuf, ModuleError> {
        let targets = store.targets();
        let profile = self.current(&targets).ok_or(ModuleError::NothingSelected)?;
        let index = targets.iter().position(|t| t.id == profile.id).unwrap_or(0);
        let card = profile_cards(&targets).swap_remove(index);

        let document = json!({
            "profile": card,
            "data": ProfileDetail::synthetic().to_json(),
            "generatedAt": export_date(),
        });

        let filename = export_filename("report", &profile.name, None);
        Ok(exporter.write(&filename, &document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use std::sync::Arc;
    use vigil_core::FixedClock;

    fn store() -> SessionStore {
        let at = Local.with_ymd_and_hms(2024, 1, 15, 18, 30, 0).single().unwrap();
        SessionStore::seeded(Arc::new(FixedClock(at)))
    }

    fn id(s: &str) -> TargetId {
        s.parse().unwrap()
    }

    #[test]
    fn test_cards_project_targets() {
        let store = store();
        let cards = profile_cards(&store.targets());
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].avatar, "avatar-1");
        assert_eq!(cards[3].name, "Sophie Bernard");
    }

    #[test]
    fn test_current_defaults_to_first() {
        let store = store();
        let module = ProfilesModule::new();
        assert_eq!(module.current(&store.targets()).unwrap().id, id("TGT-001"));
    }

    #[test]
    fn test_edit_updates_addressed_target() {
        let store = store();
        let mut module = ProfilesModule::new();
        module.begin_edit(&store, id("TGT-002")).unwrap();

        let form = module.edit_form_mut().unwrap();
        form.name = "Marie Leclerc-Roy".to_string();
        form.status = TargetStatus::ActiveSurveillance;
        form.risk = RiskLevel::Critical;

        let updated = module.save_edit(&store).unwrap();
        assert_eq!(updated.name, "Marie Leclerc-Roy");
        assert_eq!(updated.risk, RiskLevel::Critical);
        assert_eq!(updated.last_update, "18:30");
        assert!(module.edit_form().is_none());
    }

    #[test]
    fn test_edit_with_duplicate_names_touches_one_target() {
        let store = store();
        let twin = store
            .add_target(TargetDraft::new("Jean Martin", TargetStatus::Profiling, RiskLevel::Low))
            .unwrap();

        let mut module = ProfilesModule::new();
        module.begin_edit(&store, id("TGT-003")).unwrap();
        module.edit_form_mut().unwrap().risk = RiskLevel::High;
        module.save_edit(&store).unwrap();

        assert_eq!(store.target(id("TGT-003")).unwrap().risk, RiskLevel::High);
        assert_eq!(store.target(twin.id).unwrap().risk, RiskLevel::Low);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let store = store();
        let mut module = ProfilesModule::new();
        module.request_delete(id("TGT-004"));
        module.cancel_delete();

        assert!(module.confirm_delete(&store).is_err());
        assert_eq!(store.target_count(), 4);
    }

    #[test]
    fn test_delete_selected_falls_back_to_first() {
        let store = store();
        let mut module = ProfilesModule::new();
        module.select(id("TGT-002"));
        module.request_delete(id("TGT-002"));

        let removed = module.confirm_delete(&store).unwrap();
        assert_eq!(removed.name, "Marie Leclerc");
        assert_eq!(module.current(&store.targets()).unwrap().id, id("TGT-001"));
    }

    #[test]
    fn test_delete_last_profile_leaves_none() {
        let store = store();
        let mut module = ProfilesModule::new();
        for target in store.targets() {
            module.request_delete(target.id);
            module.confirm_delete(&store).unwrap();
        }
        assert!(module.current(&store.targets()).is_none());
    }

    #[test]
    fn test_select_step() {
        let store = store();
        let targets = store.targets();
        let mut module = ProfilesModule::new();
        module.select_step(&targets, 1);
        module.select_step(&targets, 1);
        assert_eq!(module.current(&targets).unwrap().id, id("TGT-003"));
        module.select_step(&targets, 10);
        assert_eq!(module.current(&targets).unwrap().id, id("TGT-004"));
    }

    #[test]
    fn test_export_report() {
        let dir = std::env::temp_dir().join(format!("vigil-profile-{}", std::process::id()));
        let store = store();
        let module = ProfilesModule::new();

        let path = module.export_report(&store, &Exporter::new(&dir)).unwrap();
        assert_eq!(path.file_name().unwrap(), "report-alexandre-dubois.json");

        let doc: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["profile"]["id"], "TGT-001");
        assert_eq!(doc["data"]["personal"]["location"], "Paris, France");

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
