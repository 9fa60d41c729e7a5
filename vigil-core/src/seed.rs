//! Startup data for a fresh session

use chrono::{DateTime, Duration, Utc};

use crate::{Alert, AlertKind, RiskLevel, Target, TargetId, TargetStatus};

/// Alerts present when the console opens, aged relative to `now`
pub fn seed_alerts(now: DateTime<Utc>) -> Vec<Alert> {
    vec![
        Alert::new(
            AlertKind::Warning,
            "Suspicious activity",
            "Suspicious activity detected - Profile: TARGET_001",
        )
        .with_id("1")
        .created_at(now - Duration::minutes(5)),
        Alert::new(
            AlertKind::Info,
            "New profile",
            "New profile generated - Organisation: CORP_045",
        )
        .with_id("2")
        .created_at(now - Duration::minutes(10)),
        Alert::new(
            AlertKind::Error,
            "Priority alert",
            "Priority alert - Event in progress",
        )
        .with_id("3")
        .created_at(now - Duration::minutes(13)),
    ]
}

/// Targets present when the console opens
pub fn seed_targets() -> Vec<Target> {
    [
        (1, "Alexandre Dubois", TargetStatus::ActiveSurveillance, RiskLevel::High, "14:23"),
        (2, "Marie Leclerc", TargetStatus::UnderAnalysis, RiskLevel::Medium, "14:18"),
        (3, "Jean Martin", TargetStatus::Profiling, RiskLevel::Low, "14:15"),
        (4, "Sophie Bernard", TargetStatus::Validated, RiskLevel::Critical, "14:12"),
    ]
    .into_iter()
    .map(|(seq, name, status, risk, last_update)| Target {
        id: TargetId::new(seq),
        name: name.to_string(),
        status,
        risk,
        last_update: last_update.to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_alert_ages() {
        let now = Utc::now();
        let alerts = seed_alerts(now);
        let ages: Vec<i64> = alerts.iter().map(|a| (now - a.created_at).num_minutes()).collect();
        assert_eq!(ages, vec![5, 10, 13]);
    }

    #[test]
    fn test_seed_target_ids_are_sequential() {
        let ids: Vec<String> = seed_targets().iter().map(|t| t.id.to_string()).collect();
        assert_eq!(ids, vec!["TGT-001", "TGT-002", "TGT-003", "TGT-004"]);
    }
}
