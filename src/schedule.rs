use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Days, NaiveDateTime, NaiveTime};

/// `"HH:MM"`, 24-hour.
pub fn parse_run_time(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .with_context(|| format!("run time {raw:?} is not HH:MM"))
}

/// Time until the next `at`: later today if still ahead, otherwise tomorrow.
/// Exactly `now == at` waits a full day so a finished run never repeats.
pub fn next_run_delay(now: NaiveDateTime, at: NaiveTime) -> Duration {
    let today = now.date().and_time(at);
    let next = if today > now {
        today
    } else {
        now.date()
            .checked_add_days(Days::new(1))
            .map(|d| d.and_time(at))
            .unwrap_or(today)
    };
    (next - now).to_std().unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn now(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 8).unwrap().and_time(at(h, m))
    }

    #[test]
    fn later_today() {
        assert_eq!(
            next_run_delay(now(6, 0), at(9, 30)),
            Duration::from_secs(3 * 3600 + 1800)
        );
    }

    #[test]
    fn rolls_over_to_tomorrow() {
        assert_eq!(next_run_delay(now(10, 0), at(9, 0)), Duration::from_secs(23 * 3600));
        assert_eq!(next_run_delay(now(9, 0), at(9, 0)), Duration::from_secs(24 * 3600));
    }

    #[test]
    fn parses_clock_times() {
        assert_eq!(parse_run_time("09:30").unwrap(), at(9, 30));
        assert_eq!(parse_run_time(" 18:05 ").unwrap(), at(18, 5));
        assert!(parse_run_time("9am").is_err());
        assert!(parse_run_time("25:00").is_err());
    }
}
