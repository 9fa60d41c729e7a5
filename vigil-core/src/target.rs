//! Targets (a.k.a. profiles) tracked by the analyst
//!
//! A target carries a workflow status and an ordinal risk level. Identifiers
//! are allocated by the [`SessionStore`](crate::SessionStore) and never change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{StoreError, TARGET_ID_PREFIX, TARGET_ID_WIDTH};

/// Stable target identifier, rendered as `TGT-NNN`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TargetId(u32);

impl TargetId {
    pub fn new(seq: u32) -> Self {
        Self(seq)
    }

    pub fn seq(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:0width$}", TARGET_ID_PREFIX, self.0, width = TARGET_ID_WIDTH)
    }
}

impl FromStr for TargetId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(TARGET_ID_PREFIX)
            .and_then(|digits| digits.parse::<u32>().ok())
            .map(TargetId)
            .ok_or_else(|| StoreError::InvalidId(s.to_string()))
    }
}

impl From<TargetId> for String {
    fn from(id: TargetId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for TargetId {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Workflow status of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    Profiling,
    UnderAnalysis,
    ActiveSurveillance,
    Validated,
}

impl TargetStatus {
    pub const ALL: [TargetStatus; 4] = [
        TargetStatus::Profiling,
        TargetStatus::UnderAnalysis,
        TargetStatus::ActiveSurveillance,
        TargetStatus::Validated,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TargetStatus::Profiling => "Profiling",
            TargetStatus::UnderAnalysis => "Under analysis",
            TargetStatus::ActiveSurveillance => "Active surveillance",
            TargetStatus::Validated => "Validated",
        }
    }

    /// Next status in form-selection order, wrapping around
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordinal risk classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    /// Default risk for a profile promoted from a search result.
    ///
    /// `> 90` is High, `> 75` is Medium, anything else Low. Critical is
    /// never derived; only an analyst assigns it.
    pub fn from_confidence(confidence: u8) -> Self {
        if confidence > 90 {
            RiskLevel::High
        } else if confidence > 75 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|r| *r == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A tracked individual or entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    pub id: TargetId,
    pub name: String,
    pub status: TargetStatus,
    pub risk: RiskLevel,
    /// Local time of the last mutation, formatted `HH:MM`
    pub last_update: String,
}

/// Caller-supplied fields for creating or editing a target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDraft {
    pub name: String,
    pub status: TargetStatus,
    pub risk: RiskLevel,
}

impl TargetDraft {
    pub fn new(name: &str, status: TargetStatus, risk: RiskLevel) -> Self {
        Self {
            name: name.to_string(),
            status,
            risk,
        }
    }

    /// The name is the only required field
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::InvalidDraft("name is required".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_id_format() {
        assert_eq!(TargetId::new(1).to_string(), "TGT-001");
        assert_eq!(TargetId::new(42).to_string(), "TGT-042");
        assert_eq!(TargetId::new(1234).to_string(), "TGT-1234");
    }

    #[test]
    fn test_target_id_parse() {
        let id: TargetId = "TGT-007".parse().unwrap();
        assert_eq!(id.seq(), 7);
        assert!("USR-007".parse::<TargetId>().is_err());
        assert!("TGT-abc".parse::<TargetId>().is_err());
    }

    #[test]
    fn test_risk_from_confidence() {
        assert_eq!(RiskLevel::from_confidence(95), RiskLevel::High);
        assert_eq!(RiskLevel::from_confidence(80), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_confidence(50), RiskLevel::Low);
        // thresholds are strict
        assert_eq!(RiskLevel::from_confidence(90), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_confidence(75), RiskLevel::Low);
    }

    #[test]
    fn test_risk_ordering() {
        assert!(RiskLevel::Critical > RiskLevel::High);
        assert!(RiskLevel::Low < RiskLevel::Medium);
    }

    #[test]
    fn test_status_cycle_wraps() {
        assert_eq!(TargetStatus::Validated.next(), TargetStatus::Profiling);
        assert_eq!(RiskLevel::Critical.next(), RiskLevel::Low);
    }

    #[test]
    fn test_draft_requires_name() {
        let draft = TargetDraft::new("   ", TargetStatus::Profiling, RiskLevel::Low);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_target_serializes_id_as_string() {
        let target = Target {
            id: TargetId::new(3),
            name: "Jean Martin".to_string(),
            status: TargetStatus::Profiling,
            risk: RiskLevel::Low,
            last_update: "14:15".to_string(),
        };
        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(json["id"], "TGT-003");
        assert_eq!(json["lastUpdate"], "14:15");
    }
}
