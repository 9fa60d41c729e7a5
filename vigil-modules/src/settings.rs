//! Settings Module
//!
//! Typed console preferences. Fields are addressed by dotted keys such as
//! `security.session_timeout`. Nothing is persisted: `save` only confirms
//! and `reset` restores the defaults in memory.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::{Notice, Tab};

pub const LANGUAGES: &[&str] = &["fr", "en", "es"];
pub const TIMEZONES: &[&str] = &["Europe/Paris", "America/New_York", "Asia/Tokyo"];
pub const THEMES: &[&str] = &["dark", "light", "auto"];

/// Errors from settings edits
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Unknown setting: {0}")]
    UnknownField(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralSettings {
    pub language: String,
    pub timezone: String,
    pub theme: String,
    pub auto_save: bool,
    pub notifications: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            language: "fr".to_string(),
            timezone: "Europe/Paris".to_string(),
            theme: "dark".to_string(),
            auto_save: true,
            notifications: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuritySettings {
    pub two_factor: bool,
    /// Minutes
    pub session_timeout: u32,
    pub ip_whitelist: String,
    pub audit_log: bool,
    pub encrypt_data: bool,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            two_factor: false,
            session_timeout: 30,
            ip_whitelist: String::new(),
            audit_log: true,
            encrypt_data: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeys {
    pub facebook: String,
    pub linkedin: String,
    pub twitter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSettings {
    pub facebook: bool,
    pub linkedin: bool,
    pub twitter: bool,
    pub instagram: bool,
    pub web_scraping: bool,
    pub databases: bool,
    pub api_keys: ApiKeys,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            facebook: true,
            linkedin: true,
            twitter: true,
            instagram: false,
            web_scraping: true,
            databases: true,
            api_keys: ApiKeys::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSettings {
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub critical_alerts: bool,
    pub daily_reports: bool,
    pub weekly_reports: bool,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            email_notifications: true,
            push_notifications: false,
            critical_alerts: true,
            daily_reports: true,
            weekly_reports: false,
        }
    }
}

/// All editable preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub general: GeneralSettings,
    pub security: SecuritySettings,
    pub sources: SourceSettings,
    pub alerts: AlertSettings,
}

/// Current value of a field, as shown in the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Bool(bool),
    Text(String),
    Number(u32),
    Choice(String, &'static [&'static str]),
}

impl SettingValue {
    pub fn display(&self) -> String {
        match self {
            SettingValue::Bool(true) => "[x]".to_string(),
            SettingValue::Bool(false) => "[ ]".to_string(),
            SettingValue::Text(s) | SettingValue::Choice(s, _) => s.clone(),
            SettingValue::Number(n) => n.to_string(),
        }
    }

    /// Whether the field is edited through a text prompt
    pub fn takes_text(&self) -> bool {
        matches!(self, SettingValue::Text(_) | SettingValue::Number(_))
    }
}

/// One row of a settings tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingField {
    pub key: &'static str,
    pub label: &'static str,
    pub value: SettingValue,
}

fn field(key: &'static str, label: &'static str, value: SettingValue) -> SettingField {
    SettingField { key, label, value }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsTab {
    #[default]
    General,
    Security,
    Sources,
    Alerts,
    System,
}

impl Tab for SettingsTab {
    const ALL: &'static [Self] = &[
        SettingsTab::General,
        SettingsTab::Security,
        SettingsTab::Sources,
        SettingsTab::Alerts,
        SettingsTab::System,
    ];

    fn label(&self) -> &'static str {
        match self {
            SettingsTab::General => "General",
            SettingsTab::Security => "Security",
            SettingsTab::Sources => "Sources",
            SettingsTab::Alerts => "Alerts",
            SettingsTab::System => "System",
        }
    }
}

/// Read-only system status lines
pub fn system_status() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Data collection", "Active"),
        ("AI analysis", "Operational"),
        ("Database", "Connected"),
        ("CPU", "23%"),
        ("Memory", "67%"),
        ("Storage", "45%"),
    ]
}

impl Settings {
    /// Fields shown on `tab`; the system tab has none
    pub fn fields(&self, tab: SettingsTab) -> Vec<SettingField> {
        use SettingValue::*;

        let g = &self.general;
        let s = &self.security;
        let src = &self.sources;
        let a = &self.alerts;
        match tab {
            SettingsTab::General => vec![
                field("general.language", "Language", Choice(g.language.clone(), LANGUAGES)),
                field("general.timezone", "Timezone", Choice(g.timezone.clone(), TIMEZONES)),
                field("general.theme", "Theme", Choice(g.theme.clone(), THEMES)),
                field("general.auto_save", "Auto save", Bool(g.auto_save)),
                field("general.notifications", "Notifications", Bool(g.notifications)),
            ],
            SettingsTab::Security => vec![
                field("security.two_factor", "Two-factor authentication", Bool(s.two_factor)),
                field("security.audit_log", "Audit log", Bool(s.audit_log)),
                field("security.encrypt_data", "Encrypt data", Bool(s.encrypt_data)),
                field("security.session_timeout", "Session timeout (minutes)", Number(s.session_timeout)),
                field("security.ip_whitelist", "IP whitelist", Text(s.ip_whitelist.clone())),
            ],
            SettingsTab::Sources => vec![
                field("sources.facebook", "Facebook", Bool(src.facebook)),
                field("sources.linkedin", "LinkedIn", Bool(src.linkedin)),
                field("sources.twitter", "Twitter", Bool(src.twitter)),
                field("sources.instagram", "Instagram", Bool(src.instagram)),
                field("sources.web_scraping", "Web scraping", Bool(src.web_scraping)),
                field("sources.databases", "Public databases", Bool(src.databases)),
                field("sources.api_keys.facebook", "Facebook API key", Text(src.api_keys.facebook.clone())),
                field("sources.api_keys.linkedin", "LinkedIn API key", Text(src.api_keys.linkedin.clone())),
                field("sources.api_keys.twitter", "Twitter API key", Text(src.api_keys.twitter.clone())),
            ],
            SettingsTab::Alerts => vec![
                field("alerts.email_notifications", "Email notifications", Bool(a.email_notifications)),
                field("alerts.push_notifications", "Push notifications", Bool(a.push_notifications)),
                field("alerts.critical_alerts", "Critical alerts", Bool(a.critical_alerts)),
                field("alerts.daily_reports", "Daily reports", Bool(a.daily_reports)),
                field("alerts.weekly_reports", "Weekly reports", Bool(a.weekly_reports)),
            ],
            SettingsTab::System => Vec::new(),
        }
    }

    fn flag_mut(&mut self, key: &str) -> Option<&mut bool> {
        Some(match key {
            "general.auto_save" => &mut self.general.auto_save,
            "general.notifications" => &mut self.general.notifications,
            "security.two_factor" => &mut self.security.two_factor,
            "security.audit_log" => &mut self.security.audit_log,
            "security.encrypt_data" => &mut self.security.encrypt_data,
            "sources.facebook" => &mut self.sources.facebook,
            "sources.linkedin" => &mut self.sources.linkedin,
            "sources.twitter" => &mut self.sources.twitter,
            "sources.instagram" => &mut self.sources.instagram,
            "sources.web_scraping" => &mut self.sources.web_scraping,
            "sources.databases" => &mut self.sources.databases,
            "alerts.email_notifications" => &mut self.alerts.email_notifications,
            "alerts.push_notifications" => &mut self.alerts.push_notifications,
            "alerts.critical_alerts" => &mut self.alerts.critical_alerts,
            "alerts.daily_reports" => &mut self.alerts.daily_reports,
            "alerts.weekly_reports" => &mut self.alerts.weekly_reports,
            _ => return None,
        })
    }

    fn choice_mut(&mut self, key: &str) -> Option<(&mut String, &'static [&'static str])> {
        match key {
            "general.language" => Some((&mut self.general.language, LANGUAGES)),
            "general.timezone" => Some((&mut self.general.timezone, TIMEZONES)),
            "general.theme" => Some((&mut self.general.theme, THEMES)),
            _ => None,
        }
    }

    fn text_mut(&mut self, key: &str) -> Option<&mut String> {
        match key {
            "security.ip_whitelist" => Some(&mut self.security.ip_whitelist),
            "sources.api_keys.facebook" => Some(&mut self.sources.api_keys.facebook),
            "sources.api_keys.linkedin" => Some(&mut self.sources.api_keys.linkedin),
            "sources.api_keys.twitter" => Some(&mut self.sources.api_keys.twitter),
            _ => None,
        }
    }

    /// Flip a boolean field, or advance a choice field to its next option
    pub fn toggle(&mut self, key: &str) -> Result<(), SettingsError> {
        if let Some(flag) = self.flag_mut(key) {
            *flag = !*flag;
            return Ok(());
        }
        if let Some((current, options)) = self.choice_mut(key) {
            let idx = options.iter().position(|o| *o == current.as_str()).unwrap_or(0);
            *current = options[(idx + 1) % options.len()].to_string();
            return Ok(());
        }
        Err(SettingsError::UnknownField(key.to_string()))
    }

    /// Set a text, numeric or choice field from user input
    pub fn set_text(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        if key == "security.session_timeout" {
            self.security.session_timeout = value
                .trim()
                .parse()
                .map_err(|_| SettingsError::InvalidValue(format!("{}: {:?}", key, value)))?;
            return Ok(());
        }
        if let Some(text) = self.text_mut(key) {
            *text = value.to_string();
            return Ok(());
        }
        if let Some((current, options)) = self.choice_mut(key) {
            if !options.contains(&value) {
                return Err(SettingsError::InvalidValue(format!("{}: {:?}", key, value)));
            }
            *current = value.to_string();
            return Ok(());
        }
        Err(SettingsError::UnknownField(key.to_string()))
    }
}

/// Form state for the settings screen
#[derive(Debug, Default)]
pub struct SettingsModule {
    pub tab: SettingsTab,
    pub settings: Settings,
    cursor: usize,
    pending_reset: bool,
}

impl SettingsModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_tab(&mut self, tab: SettingsTab) {
        self.tab = tab;
        self.cursor = 0;
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.settings.fields(self.tab).len();
        self.cursor = crate::step_cursor(self.cursor, delta, len);
    }

    /// Field under the cursor on the current tab
    pub fn current_field(&self) -> Option<SettingField> {
        self.settings.fields(self.tab).into_iter().nth(self.cursor)
    }

    pub fn save(&self) -> Notice {
        info!("Settings saved");
        Notice::success("Settings saved successfully")
    }

    pub fn pending_reset(&self) -> bool {
        self.pending_reset
    }

    pub fn request_reset(&mut self) {
        self.pending_reset = true;
    }

    pub fn cancel_reset(&mut self) {
        self.pending_reset = false;
    }

    /// Restore defaults if a reset was requested
    pub fn confirm_reset(&mut self) -> Option<Notice> {
        if !std::mem::take(&mut self.pending_reset) {
            return None;
        }
        self.settings = Settings::default();
        self.cursor = 0;
        info!("Settings reset to defaults");
        Some(Notice::info("Settings reset"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.general.language, "fr");
        assert_eq!(settings.security.session_timeout, 30);
        assert!(!settings.sources.instagram);
        assert!(!settings.alerts.weekly_reports);
    }

    #[test]
    fn test_toggle_flag_and_choice() {
        let mut settings = Settings::default();
        settings.toggle("security.two_factor").unwrap();
        assert!(settings.security.two_factor);

        settings.toggle("general.theme").unwrap();
        assert_eq!(settings.general.theme, "light");

        assert_eq!(
            settings.toggle("security.ip_whitelist"),
            Err(SettingsError::UnknownField("security.ip_whitelist".to_string()))
        );
    }

    #[test]
    fn test_set_text_parses_numbers() {
        let mut settings = Settings::default();
        settings.set_text("security.session_timeout", " 45 ").unwrap();
        assert_eq!(settings.security.session_timeout, 45);

        assert!(matches!(
            settings.set_text("security.session_timeout", "soon"),
            Err(SettingsError::InvalidValue(_))
        ));
        assert_eq!(settings.security.session_timeout, 45);

        settings.set_text("sources.api_keys.twitter", "abc123").unwrap();
        assert_eq!(settings.sources.api_keys.twitter, "abc123");
    }

    #[test]
    fn test_every_field_is_editable() {
        let mut settings = Settings::default();
        for tab in SettingsTab::ALL {
            for f in settings.clone().fields(*tab) {
                let result = match f.value {
                    SettingValue::Bool(_) | SettingValue::Choice(..) => settings.toggle(f.key),
                    SettingValue::Number(_) => settings.set_text(f.key, "10"),
                    SettingValue::Text(_) => settings.set_text(f.key, "x"),
                };
                assert!(result.is_ok(), "{} not editable", f.key);
            }
        }
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let mut module = SettingsModule::new();
        module.settings.toggle("alerts.weekly_reports").unwrap();

        assert!(module.confirm_reset().is_none());
        assert!(module.settings.alerts.weekly_reports);

        module.request_reset();
        module.cancel_reset();
        assert!(module.confirm_reset().is_none());

        module.request_reset();
        assert!(module.confirm_reset().is_some());
        assert_eq!(module.settings, Settings::default());
        assert!(!module.pending_reset());
    }

    #[test]
    fn test_system_tab_is_read_only() {
        let mut module = SettingsModule::new();
        module.set_tab(SettingsTab::System);
        assert!(module.current_field().is_none());
        assert_eq!(system_status().len(), 6);
    }
}
