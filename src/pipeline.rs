use chrono::{NaiveTime, Timelike};
use tracing::{info, warn};

use crate::feeds::GameFeeds;
use crate::game_record::{UNKNOWN_GAME_TIME, build_game_record};
use crate::models::{BettingGame, GameRecord, GameReport, UmpireRecord};

/// Sort key for games without a usable start time; sorts after any real time.
pub const UNSCHEDULED_SORT_KEY: u32 = 9999;

#[derive(Debug, Clone, Default)]
pub struct BuildSummary {
    pub records: Vec<GameRecord>,
    pub skipped: usize,
}

/// `"7/8, 06:40PM"` (or `"06:40 PM"`) to `1840`. `"TBD"`, blanks and
/// anything unparsable get `UNSCHEDULED_SORT_KEY`.
pub fn parse_game_time_for_sorting(raw: &str) -> u32 {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == UNKNOWN_GAME_TIME {
        return UNSCHEDULED_SORT_KEY;
    }

    let time_part = match trimmed.split_once(',') {
        Some((_, rest)) => rest,
        None => trimmed,
    };
    // The feed sometimes puts a space before the meridiem.
    let compact: String = time_part.split_whitespace().collect();

    match NaiveTime::parse_from_str(&compact, "%I:%M%p") {
        Ok(time) => time.hour() * 100 + time.minute(),
        Err(err) => {
            warn!(time = %raw, error = %err, "unparsable game time, sorting last");
            UNSCHEDULED_SORT_KEY
        }
    }
}

/// One record per usable report, earliest first. Reports that cannot become
/// a record are logged and counted, never fatal.
pub fn build_game_records(
    reports: &[GameReport],
    umpires: &[UmpireRecord],
    betting_games: &[BettingGame],
) -> BuildSummary {
    let mut summary = BuildSummary::default();

    for report in reports {
        match build_game_record(report, umpires, betting_games) {
            Ok(record) => summary.records.push(record),
            Err(err) => {
                warn!(error = %err, "skipping game");
                summary.skipped += 1;
            }
        }
    }

    // sort_by_cached_key is stable, so equal times keep feed order.
    summary
        .records
        .sort_by_cached_key(|record| parse_game_time_for_sorting(&record.game_time));

    for (idx, record) in summary.records.iter().enumerate() {
        info!("{}. {} - {}", idx + 1, record.topic, record.game_time);
    }
    summary
}

/// Reads every feed once, in order, and builds today's records.
pub fn collect_game_records(feeds: &impl GameFeeds) -> BuildSummary {
    let reports = feeds.mlb_reports().into_items();
    let umpires = feeds.umpires().into_items();
    let betting_games = feeds.betting_games().into_items();

    if reports.is_empty() {
        warn!("no game reports available");
        return BuildSummary::default();
    }

    let summary = build_game_records(&reports, &umpires, &betting_games);
    info!(
        games = summary.records.len(),
        skipped = summary.skipped,
        "built game records"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_twelve_hour_times() {
        assert_eq!(parse_game_time_for_sorting("7/8, 06:40PM"), 1840);
        assert_eq!(parse_game_time_for_sorting("7/8, 01:10PM"), 1310);
        assert_eq!(parse_game_time_for_sorting("11:05AM"), 1105);
        assert_eq!(parse_game_time_for_sorting("7/8, 12:05PM"), 1205);
        assert_eq!(parse_game_time_for_sorting("7/8, 12:15AM"), 15);
        assert_eq!(parse_game_time_for_sorting("7/8, 7:05PM"), 1905);
    }

    #[test]
    fn spaced_and_lowercase_meridiem() {
        assert_eq!(parse_game_time_for_sorting("7/8, 06:40 PM"), 1840);
        assert_eq!(parse_game_time_for_sorting("7/8, 7:05 pm"), 1905);
        assert_eq!(parse_game_time_for_sorting("06:40pm"), 1840);
        assert_eq!(parse_game_time_for_sorting(" 11:05  AM "), 1105);
    }

    #[test]
    fn unscheduled_and_garbage_sort_last() {
        assert_eq!(parse_game_time_for_sorting("TBD"), UNSCHEDULED_SORT_KEY);
        assert_eq!(parse_game_time_for_sorting(""), UNSCHEDULED_SORT_KEY);
        assert_eq!(parse_game_time_for_sorting("7/8, soon"), UNSCHEDULED_SORT_KEY);
        assert_eq!(parse_game_time_for_sorting("25:99PM"), UNSCHEDULED_SORT_KEY);
    }
}
