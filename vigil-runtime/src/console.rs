//! Console Shell
//!
//! The root of the analyst console:
//! - Owns the shared session store and every module's local state
//! - Tracks the active module and the new-target modal
//! - Dispatches searches to the source on spawned tasks and applies only
//!   the latest completion
//! - Refreshes surveillance activity on a fixed tick

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

use vigil_core::{
    system_clock, Exporter, RiskLevel, SessionStore, StoreError, StoreEvent, Target, TargetDraft,
    TargetStatus,
};
use vigil_modules::{
    create_mock_source, AnalysisModule, Completion, DashboardModule, EditField, ModuleId, Notice,
    ProfilesModule, ReportsModule, SearchError, SearchModule, SearchResult, SettingsModule,
    SharedSource, SurveillanceModule,
};

use crate::ConsoleConfig;

type SearchOutcome = (u64, Result<Vec<SearchResult>, SearchError>);

/// Fields of the new-target modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTargetForm {
    pub name: String,
    pub status: TargetStatus,
    pub risk: RiskLevel,
    pub focus: EditField,
}

impl Default for NewTargetForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            status: TargetStatus::Profiling,
            risk: RiskLevel::Low,
            focus: EditField::Name,
        }
    }
}

impl NewTargetForm {
    pub fn to_draft(&self) -> TargetDraft {
        TargetDraft::new(&self.name, self.status, self.risk)
    }
}

/// The analyst console
pub struct Console {
    store: Arc<SessionStore>,
    exporter: Exporter,
    source: SharedSource,
    active: ModuleId,
    new_target: Option<NewTargetForm>,
    flash: Option<Notice>,
    tick_interval: Duration,
    last_tick: Option<Instant>,
    completions_tx: mpsc::UnboundedSender<SearchOutcome>,
    completions_rx: mpsc::UnboundedReceiver<SearchOutcome>,
    store_events: broadcast::Receiver<StoreEvent>,

    pub dashboard: DashboardModule,
    pub search: SearchModule,
    pub profiles: ProfilesModule,
    pub analysis: AnalysisModule,
    pub surveillance: SurveillanceModule,
    pub reports: ReportsModule,
    pub settings: SettingsModule,
}

impl Console {
    /// Build a console from configuration, using the mock search source
    pub fn new(config: &ConsoleConfig) -> Self {
        let store = if config.seed {
            SessionStore::seeded(system_clock())
        } else {
            SessionStore::new(system_clock())
        };

        Self::with_parts(
            Arc::new(store),
            create_mock_source(config.search_latency()),
            Exporter::new(&config.export_dir),
        )
        .with_tick_interval(config.tick_interval())
    }

    /// Build a console around an existing store and source
    pub fn with_parts(store: Arc<SessionStore>, source: SharedSource, exporter: Exporter) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let store_events = store.subscribe();

        let mut surveillance = SurveillanceModule::new();
        surveillance.refresh(&store.targets(), &mut rand::thread_rng());

        info!("Console ready with source '{}'", source.name());

        Self {
            store,
            exporter,
            source,
            active: ModuleId::default(),
            new_target: None,
            flash: None,
            tick_interval: Duration::from_secs(1),
            last_tick: None,
            completions_tx,
            completions_rx,
            store_events,
            dashboard: DashboardModule::new(),
            search: SearchModule::new(),
            profiles: ProfilesModule::new(),
            analysis: AnalysisModule::new(),
            surveillance,
            reports: ReportsModule::new(),
            settings: SettingsModule::new(),
        }
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn exporter(&self) -> &Exporter {
        &self.exporter
    }

    // ---- header ----

    pub fn alert_count(&self) -> usize {
        self.store.alert_count()
    }

    pub fn clock(&self) -> String {
        self.store.clock_hhmm()
    }

    // ---- flash messages ----

    pub fn flash(&self) -> Option<&Notice> {
        self.flash.as_ref()
    }

    pub fn set_flash(&mut self, notice: Notice) {
        self.flash = Some(notice);
    }

    pub fn clear_flash(&mut self) {
        self.flash = None;
    }

    // ---- shared state ----

    /// Remove the alert with `id`; unknown ids are a no-op
    pub fn dismiss_alert(&mut self, id: &str) -> bool {
        self.store.dismiss_alert(id)
    }

    /// Create a target and close the new-target modal
    pub fn add_target(&mut self, draft: TargetDraft) -> Result<Target, StoreError> {
        let target = self.store.add_target(draft)?;
        self.new_target = None;
        Ok(target)
    }

    // ---- navigation ----

    pub fn active_module(&self) -> ModuleId {
        self.active
    }

    /// Switch module by id; unknown ids open the dashboard
    pub fn set_active_module(&mut self, id: &str) {
        let module = ModuleId::parse_or_dashboard(id);
        if module.as_str() != id {
            debug!("Unknown module '{}', showing dashboard", id);
        }
        self.navigate(module);
    }

    pub fn navigate(&mut self, module: ModuleId) {
        if self.active == ModuleId::Search && module != ModuleId::Search && self.search.cancel() {
            debug!("Search cancelled by navigation");
        }
        if self.active != module {
            debug!("Navigate {} -> {}", self.active, module);
        }
        self.active = module;
    }

    pub fn new_search(&mut self) {
        self.navigate(ModuleId::Search);
    }

    pub fn active_surveillance(&mut self) {
        self.navigate(ModuleId::Surveillance);
    }

    /// Open the reports module with its template picker
    pub fn open_new_report(&mut self) {
        self.navigate(ModuleId::Reports);
        self.reports.open_template_picker();
    }

    /// Open the profile of a target known only by its display name
    ///
    /// Fails when no target, or more than one, carries `name`.
    pub fn open_profile_by_name(&mut self, name: &str) -> Result<Target, StoreError> {
        let target = self.store.find_by_name(name)?;
        self.profiles.select(target.id);
        self.navigate(ModuleId::Profiles);
        Ok(target)
    }

    // ---- new-target modal ----

    pub fn new_target_form(&self) -> Option<&NewTargetForm> {
        self.new_target.as_ref()
    }

    pub fn new_target_form_mut(&mut self) -> Option<&mut NewTargetForm> {
        self.new_target.as_mut()
    }

    pub fn open_new_target(&mut self) {
        self.new_target = Some(NewTargetForm::default());
    }

    pub fn close_new_target(&mut self) {
        self.new_target = None;
    }

    /// Submit the modal; on a validation error the modal stays open
    pub fn submit_new_target(&mut self) -> Result<Target, StoreError> {
        let draft = self
            .new_target
            .as_ref()
            .map(NewTargetForm::to_draft)
            .ok_or_else(|| StoreError::InvalidDraft("no form open".to_string()))?;
        match self.add_target(draft) {
            Ok(target) => Ok(target),
            Err(e) => {
                warn!("New target rejected: {}", e);
                Err(e)
            }
        }
    }

    // ---- search ----

    /// Validate the search form and run the request on a spawned task
    pub fn start_search(&mut self) -> Result<u64, SearchError> {
        let request = self.search.begin_search()?;
        let seq = request.seq;
        let source = self.source.clone();
        let tx = self.completions_tx.clone();

        tokio::spawn(async move {
            let outcome = source.search(&request).await;
            // receiver gone means the console was dropped
            let _ = tx.send((request.seq, outcome));
        });
        Ok(seq)
    }

    pub fn cancel_search(&mut self) -> bool {
        self.search.cancel()
    }

    /// Wait for the next search completion and apply it
    pub async fn next_completion(&mut self) -> Option<Completion> {
        let (seq, outcome) = self.completions_rx.recv().await?;
        Some(self.apply_completion(seq, outcome))
    }

    fn apply_completion(
        &mut self,
        seq: u64,
        outcome: Result<Vec<SearchResult>, SearchError>,
    ) -> Completion {
        let completion = self.search.complete(seq, outcome);
        match &completion {
            Completion::Applied(count) => {
                self.flash = Some(Notice::success(format!("{} results found", count)));
            }
            Completion::Failed(e) => {
                self.flash = Some(Notice::error(format!("Search failed: {}", e)));
            }
            Completion::Stale => {}
        }
        completion
    }

    /// Drain pending search completions and store events without blocking.
    ///
    /// Returns the number of completions applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok((seq, outcome)) = self.completions_rx.try_recv() {
            if self.apply_completion(seq, outcome) != Completion::Stale {
                applied += 1;
            }
        }

        loop {
            match self.store_events.try_recv() {
                Ok(event) => self.on_store_event(event),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    warn!("Skipped {} store events", skipped);
                }
                Err(_) => break,
            }
        }
        applied
    }

    fn on_store_event(&mut self, event: StoreEvent) {
        match event {
            StoreEvent::TargetRemoved(id) => {
                if self.profiles.edit_form().map(|f| f.target_id) == Some(id) {
                    debug!("Closing edit form of removed target {}", id);
                    self.profiles.cancel_edit();
                }
            }
            StoreEvent::AlertDismissed(_) => {
                let alerts = self.store.alert_count();
                self.dashboard.move_cursor(0, alerts);
            }
            StoreEvent::AlertAdded(_) | StoreEvent::TargetAdded(_) | StoreEvent::TargetUpdated(_) => {}
        }
    }

    // ---- tick ----

    /// Regenerate surveillance activity counts
    pub fn tick(&mut self) {
        self.surveillance
            .refresh(&self.store.targets(), &mut rand::thread_rng());
        self.last_tick = Some(Instant::now());
    }

    /// Run `tick` if the interval elapsed since the last one
    pub fn tick_if_due(&mut self, now: Instant) -> bool {
        let due = self
            .last_tick
            .map_or(true, |last| now.duration_since(last) >= self.tick_interval);
        if due {
            self.tick();
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use vigil_core::FixedClock;

    fn test_console() -> Console {
        let at = chrono::Utc.with_ymd_and_hms(2024, 1, 15, 14, 30, 0).unwrap();
        let store = SessionStore::seeded(Arc::new(FixedClock::from_utc(at)));
        Console::with_parts(
            Arc::new(store),
            create_mock_source(Duration::ZERO),
            Exporter::new(std::env::temp_dir()),
        )
    }

    #[test]
    fn test_dismiss_alert() {
        let mut console = test_console();
        assert!(console.dismiss_alert("2"));
        let ids: Vec<_> = console.store().alerts().into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["1", "3"]);

        assert!(!console.dismiss_alert("42"));
        assert_eq!(console.alert_count(), 2);
    }

    #[test]
    fn test_new_target_modal() {
        let mut console = test_console();
        console.open_new_target();

        assert!(console.submit_new_target().is_err());
        assert!(console.new_target_form().is_some());

        if let Some(form) = console.new_target_form_mut() {
            form.name = "Nadia Roux".to_string();
            form.risk = RiskLevel::High;
        }
        let target = console.submit_new_target().unwrap();
        assert_eq!(target.id.to_string(), "TGT-005");
        assert_eq!(target.last_update, console.clock());
        assert!(console.new_target_form().is_none());
        assert_eq!(console.store().target_count(), 5);
    }

    #[test]
    fn test_unknown_module_shows_dashboard() {
        let mut console = test_console();
        console.set_active_module("reports");
        assert_eq!(console.active_module(), ModuleId::Reports);
        console.set_active_module("mystery");
        assert_eq!(console.active_module(), ModuleId::Dashboard);
    }

    #[test]
    fn test_open_profile_by_name() {
        let mut console = test_console();
        console.navigate(ModuleId::Surveillance);

        let target = console.open_profile_by_name("Marie Leclerc").unwrap();
        assert_eq!(target.id.to_string(), "TGT-002");
        assert_eq!(console.active_module(), ModuleId::Profiles);
        let targets = console.store().targets();
        assert_eq!(console.profiles.current(&targets).map(|t| t.id), Some(target.id));

        console.navigate(ModuleId::Surveillance);
        console
            .add_target(TargetDraft::new("Marie Leclerc", TargetStatus::Profiling, RiskLevel::Low))
            .unwrap();
        assert!(matches!(
            console.open_profile_by_name("Marie Leclerc"),
            Err(StoreError::AmbiguousName(_, 2))
        ));
        assert!(matches!(
            console.open_profile_by_name("Nobody"),
            Err(StoreError::TargetNotFound(_))
        ));
        assert_eq!(console.active_module(), ModuleId::Surveillance);
    }

    #[test]
    fn test_open_new_report_focuses_templates() {
        let mut console = test_console();
        console.open_new_report();
        assert_eq!(console.active_module(), ModuleId::Reports);
        assert!(console.reports.is_picking_template());
    }

    #[tokio::test]
    async fn test_empty_query_never_searches() {
        let mut console = test_console();
        console.new_search();
        console.search.query = "   ".to_string();

        assert_eq!(console.start_search(), Err(SearchError::EmptyQuery));
        assert!(!console.search.is_searching());
        assert!(console.search.results().is_empty());
    }

    #[tokio::test]
    async fn test_search_applies_results() {
        let mut console = test_console();
        console.new_search();
        console.search.query = "dubois".to_string();

        console.start_search().unwrap();
        assert!(console.search.is_searching());

        assert_eq!(console.next_completion().await, Some(Completion::Applied(5)));
        assert!(!console.search.is_searching());
        assert!(console.search.has_searched());
        assert!(console.flash().is_some());
    }

    #[tokio::test]
    async fn test_only_latest_search_is_applied() {
        let mut console = test_console();
        console.new_search();
        console.search.query = "first".to_string();
        console.start_search().unwrap();
        console.search.query = "second".to_string();
        let latest = console.start_search().unwrap();

        let mut completions = vec![
            console.next_completion().await.unwrap(),
            console.next_completion().await.unwrap(),
        ];
        completions.sort_by_key(|c| matches!(c, Completion::Applied(_)));
        assert_eq!(completions[0], Completion::Stale);
        assert!(matches!(completions[1], Completion::Applied(_)));
        assert_eq!(console.search.latest_seq(), latest);
    }

    #[tokio::test]
    async fn test_navigating_away_cancels_search() {
        let mut console = test_console();
        console.new_search();
        console.search.query = "martin".to_string();
        console.start_search().unwrap();

        console.navigate(ModuleId::Profiles);
        assert!(!console.search.is_searching());
        assert_eq!(console.next_completion().await, Some(Completion::Stale));
        assert!(console.search.results().is_empty());
    }

    #[tokio::test]
    async fn test_pump_drains_completions() {
        let mut console = test_console();
        console.search.query = "leclerc".to_string();
        console.start_search().unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(console.pump(), 1);
        assert_eq!(console.search.results().len(), 5);
        assert_eq!(console.pump(), 0);
    }

    #[test]
    fn test_pump_closes_edit_of_removed_target() {
        let mut console = test_console();
        let id = console.store().targets()[1].id;
        let store = console.store().clone();
        console.profiles.begin_edit(&store, id).unwrap();

        store.remove_target(id).unwrap();
        console.pump();
        assert!(console.profiles.edit_form().is_none());
    }

    #[test]
    fn test_tick_if_due() {
        let mut console = test_console().with_tick_interval(Duration::from_secs(60));
        let now = Instant::now();
        assert!(console.tick_if_due(now));
        assert!(!console.tick_if_due(now));

        let id = console.store().targets()[0].id;
        assert!(console.surveillance.activity(id) >= 1);
    }
}
