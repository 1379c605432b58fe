//! Lineup-vs-arsenal deltas.
//!
//! Every batter row in a game report carries a season baseline and a
//! projection against one specific pitcher's pitch mix. For the lineup facing
//! a pitcher we average both, and flag the batters whose projection moves
//! far enough from their baseline to be worth writing about.

use crate::models::{
    Advantage, BatterMatchup, DEFAULT_BA, DEFAULT_K_PCT, LineupStats, StandoutBatter,
};

/// A batter is a standout when |arsenal BA - season BA| exceeds this.
pub const STANDOUT_BA_DIFF: f64 = 0.020;
/// ...or when |arsenal K% - season K%| exceeds this (percentage points).
pub const STANDOUT_K_DIFF: f64 = 3.0;

/// Feed rates carry three decimals; `0.270 - 0.250` lands a hair above
/// `0.020` in binary, so a diff must clear the threshold by more than this.
const THRESHOLD_SLACK: f64 = 1e-9;

fn exceeds(diff: f64, threshold: f64) -> bool {
    diff > threshold + THRESHOLD_SLACK
}

/// `"Last, First"` to `"First Last"`. Names with fewer than two tokens come
/// back untouched.
pub fn display_name(raw: &str) -> String {
    let replaced = raw.replace(", ", " ");
    let tokens: Vec<&str> = replaced.split_whitespace().collect();
    if tokens.len() >= 2 {
        format!("{} {}", tokens[1], tokens[0])
    } else {
        raw.to_string()
    }
}

pub fn is_reliable(row: &BatterMatchup) -> bool {
    row.reliability
        .as_deref()
        .map(|r| {
            let r = r.trim();
            r.eq_ignore_ascii_case("MEDIUM") || r.eq_ignore_ascii_case("HIGH")
        })
        .unwrap_or(false)
}

pub fn classify(ba_diff: f64, k_diff: f64) -> Advantage {
    if exceeds(ba_diff, STANDOUT_BA_DIFF) {
        Advantage::StrongBa
    } else if exceeds(-ba_diff, STANDOUT_BA_DIFF) {
        Advantage::PoorBa
    } else if exceeds(-k_diff, STANDOUT_K_DIFF) {
        Advantage::LowK
    } else if exceeds(k_diff, STANDOUT_K_DIFF) {
        Advantage::HighK
    } else {
        Advantage::Moderate
    }
}

fn is_standout(ba_diff: f64, k_diff: f64) -> bool {
    exceeds(ba_diff.abs(), STANDOUT_BA_DIFF) || exceeds(k_diff.abs(), STANDOUT_K_DIFF)
}

struct RowRates {
    season_ba: f64,
    season_k: f64,
    arsenal_ba: f64,
    arsenal_k: f64,
}

fn row_rates(row: &BatterMatchup) -> RowRates {
    let baseline = row.baseline_stats.as_ref();
    RowRates {
        season_ba: baseline.and_then(|b| b.season_avg).unwrap_or(DEFAULT_BA),
        season_k: baseline.and_then(|b| b.season_k_pct).unwrap_or(DEFAULT_K_PCT),
        arsenal_ba: row.weighted_est_ba.unwrap_or(DEFAULT_BA),
        arsenal_k: row.weighted_k_rate.unwrap_or(DEFAULT_K_PCT),
    }
}

/// Aggregates the lineup facing `pitcher_name`.
///
/// Only rows computed against that pitcher with MEDIUM/HIGH reliability
/// count. With no usable rows the result is `LineupStats::default()`, which
/// downstream treats as "not enough data" rather than an error. Standouts
/// keep the input order.
pub fn calculate_lineup_advantage(key_matchups: &[BatterMatchup], pitcher_name: &str) -> LineupStats {
    let reliable: Vec<&BatterMatchup> = key_matchups
        .iter()
        .filter(|m| m.vs_pitcher.as_deref() == Some(pitcher_name))
        .filter(|m| is_reliable(m))
        .collect();

    if reliable.is_empty() {
        return LineupStats::default();
    }

    let mut sum_season_ba = 0.0;
    let mut sum_season_k = 0.0;
    let mut sum_arsenal_ba = 0.0;
    let mut sum_arsenal_k = 0.0;
    let mut top_performers = Vec::new();

    for row in &reliable {
        let rates = row_rates(row);
        sum_season_ba += rates.season_ba;
        sum_season_k += rates.season_k;
        sum_arsenal_ba += rates.arsenal_ba;
        sum_arsenal_k += rates.arsenal_k;

        let ba_diff = rates.arsenal_ba - rates.season_ba;
        // Positive means more strikeouts against this arsenal, bad for the batter.
        let k_diff = rates.arsenal_k - rates.season_k;
        if !is_standout(ba_diff, k_diff) {
            continue;
        }

        let batter = row.batter.as_deref().unwrap_or("Unknown");
        top_performers.push(StandoutBatter {
            name: display_name(batter),
            season_ba: rates.season_ba,
            arsenal_ba: rates.arsenal_ba,
            season_k: rates.season_k,
            arsenal_k: rates.arsenal_k,
            ba_diff,
            k_diff,
            advantage: classify(ba_diff, k_diff),
        });
    }

    let n = reliable.len() as f64;
    let season_ba = sum_season_ba / n;
    let season_k_pct = sum_season_k / n;
    let arsenal_ba = sum_arsenal_ba / n;
    let arsenal_k_pct = sum_arsenal_k / n;

    LineupStats {
        ba_advantage: arsenal_ba - season_ba,
        k_advantage: arsenal_k_pct - season_k_pct,
        season_ba,
        arsenal_ba,
        season_k_pct,
        arsenal_k_pct,
        top_performers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_precedence() {
        assert_eq!(classify(0.025, 4.0), Advantage::StrongBa);
        assert_eq!(classify(-0.025, -4.0), Advantage::PoorBa);
        assert_eq!(classify(0.0, -3.5), Advantage::LowK);
        assert_eq!(classify(0.0, 3.5), Advantage::HighK);
        assert_eq!(classify(0.01, 1.0), Advantage::Moderate);
    }

    #[test]
    fn classify_at_three_decimal_boundary() {
        assert_eq!(classify(0.270 - 0.250, 0.0), Advantage::Moderate);
        assert_eq!(classify(0.230 - 0.250, 0.0), Advantage::Moderate);
        assert_eq!(classify(0.0, 25.0 - 22.0), Advantage::Moderate);
        assert_eq!(classify(0.271 - 0.250, 0.0), Advantage::StrongBa);
    }

    #[test]
    fn reliability_is_case_insensitive() {
        let mut row = BatterMatchup {
            reliability: Some("medium".to_string()),
            ..Default::default()
        };
        assert!(is_reliable(&row));
        row.reliability = Some("High".to_string());
        assert!(is_reliable(&row));
        row.reliability = Some("LOW".to_string());
        assert!(!is_reliable(&row));
        row.reliability = None;
        assert!(!is_reliable(&row));
    }

    #[test]
    fn display_name_swaps_tokens() {
        assert_eq!(display_name("Soto, Juan"), "Juan Soto");
        assert_eq!(display_name("Ohtani"), "Ohtani");
        assert_eq!(display_name(""), "");
    }
}
