//! Wall clock used to stamp mutations

use chrono::{DateTime, Local, Utc};
use std::sync::Arc;

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// Time of day as `HH:MM`
    fn hhmm(&self) -> String {
        format_hhmm(&self.now())
    }
}

/// Shared clock handle
pub type SharedClock = Arc<dyn Clock>;

/// Format a local time as `HH:MM`
pub fn format_hhmm(time: &DateTime<Local>) -> String {
    time.format("%H:%M").to_string()
}

/// The real system clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock frozen at a fixed instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl FixedClock {
    pub fn from_utc(at: DateTime<Utc>) -> Self {
        Self(at.with_timezone(&Local))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Create the default shared clock
pub fn system_clock() -> SharedClock {
    Arc::new(SystemClock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_clock_hhmm() {
        let at = Local.with_ymd_and_hms(2024, 1, 15, 9, 5, 42).single().unwrap();
        let clock = FixedClock(at);
        assert_eq!(clock.hhmm(), "09:05");
    }

    #[test]
    fn test_system_clock_format_shape() {
        let stamp = SystemClock.hhmm();
        assert_eq!(stamp.len(), 5);
        assert_eq!(&stamp[2..3], ":");
    }
}
