//! Cron utility functions for calculating next scheduled times
//!
//! Expressions use the six-field form with a leading seconds column
//! (`sec min hour day-of-month month day-of-week`).

use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;

/// Parse a cron expression, describing the failure on error
pub fn parse_schedule(cron_expression: &str) -> Result<Schedule, String> {
    Schedule::from_str(cron_expression)
        .map_err(|e| format!("Invalid cron expression '{cron_expression}': {e}"))
}

/// Next time the schedule fires strictly after `now`
///
/// # Returns
/// * `Some(DateTime<Utc>)` - The next scheduled time
/// * `None` - The schedule has no future occurrences
pub fn next_after(schedule: &Schedule, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    schedule.after(&now).next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_daily_midnight_schedule() {
        let schedule = parse_schedule("0 0 0 * * *").unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 15, 30, 0).unwrap();

        let next = next_after(&schedule, now).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_next_is_strictly_after_now() {
        let schedule = parse_schedule("0 0 0 * * *").unwrap();
        let midnight = Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap();

        let next = next_after(&schedule, midnight).unwrap();
        assert_eq!(next, Utc.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_invalid_cron_expression() {
        let result = parse_schedule("invalid");
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Invalid cron expression"));
    }
}
