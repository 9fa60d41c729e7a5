//! Common types shared by all feature modules

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use vigil_core::{AlertKind, ExportError, StoreError};

use crate::{SearchError, SettingsError};

/// Errors from module actions
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Nothing selected")]
    NothingSelected,

    #[error("Unknown record: {0}")]
    UnknownRecord(String),
}

/// The mutually exclusive top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModuleId {
    #[default]
    Dashboard,
    Search,
    Profiles,
    Analysis,
    Surveillance,
    Reports,
    Settings,
}

impl ModuleId {
    /// Navigation order
    pub const ALL: [ModuleId; 7] = [
        ModuleId::Dashboard,
        ModuleId::Search,
        ModuleId::Profiles,
        ModuleId::Analysis,
        ModuleId::Surveillance,
        ModuleId::Reports,
        ModuleId::Settings,
    ];

    /// Parse a module id, falling back to the dashboard for unknown ids
    pub fn parse_or_dashboard(id: &str) -> Self {
        id.parse().unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleId::Dashboard => "dashboard",
            ModuleId::Search => "search",
            ModuleId::Profiles => "profiles",
            ModuleId::Analysis => "analysis",
            ModuleId::Surveillance => "surveillance",
            ModuleId::Reports => "reports",
            ModuleId::Settings => "settings",
        }
    }

    /// Navigation label
    pub fn title(&self) -> &'static str {
        match self {
            ModuleId::Dashboard => "Command Center",
            ModuleId::Search => "OSINT Search",
            ModuleId::Profiles => "Profiling",
            ModuleId::Analysis => "Analysis",
            ModuleId::Surveillance => "Surveillance",
            ModuleId::Reports => "Reports",
            ModuleId::Settings => "Settings",
        }
    }

    /// 1-based position used as navigation hotkey
    pub fn hotkey(&self) -> char {
        let idx = Self::ALL.iter().position(|m| m == self).unwrap_or(0);
        char::from(b'1' + idx as u8)
    }

    pub fn from_hotkey(key: char) -> Option<Self> {
        let idx = key.to_digit(10)?.checked_sub(1)? as usize;
        Self::ALL.get(idx).copied()
    }
}

impl FromStr for ModuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|m| m.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown module: {}", s))
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tab strip inside a module
pub trait Tab: Copy + PartialEq + Sized + 'static {
    /// All tabs in display order
    const ALL: &'static [Self];

    fn label(&self) -> &'static str;

    fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// A transient, user-facing message (status line flash)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: AlertKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            text: text.into(),
        }
    }
}

/// Move a list cursor by `delta`, clamped to `len`
pub fn step_cursor(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = cursor as isize + delta;
    next.clamp(0, len as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_module_falls_back_to_dashboard() {
        assert_eq!(ModuleId::parse_or_dashboard("nope"), ModuleId::Dashboard);
        assert_eq!(ModuleId::parse_or_dashboard(""), ModuleId::Dashboard);
        assert_eq!(ModuleId::parse_or_dashboard("reports"), ModuleId::Reports);
    }

    #[test]
    fn test_hotkeys_round_trip() {
        for module in ModuleId::ALL {
            assert_eq!(ModuleId::from_hotkey(module.hotkey()), Some(module));
        }
        assert_eq!(ModuleId::from_hotkey('0'), None);
        assert_eq!(ModuleId::from_hotkey('8'), None);
    }

    #[test]
    fn test_step_cursor_clamps() {
        assert_eq!(step_cursor(0, -1, 3), 0);
        assert_eq!(step_cursor(2, 1, 3), 2);
        assert_eq!(step_cursor(1, 1, 3), 2);
        assert_eq!(step_cursor(5, 1, 0), 0);
    }
}
