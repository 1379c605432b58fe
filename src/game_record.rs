use tracing::debug;

use crate::error::RecordError;
use crate::matching::{find_betting_game, find_game_umpire, split_matchup};
use crate::matchup_stats::{calculate_lineup_advantage, display_name};
use crate::models::{
    BettingGame, GameRecord, GameReport, LineupStats, PitcherProfile, PitcherSummary, TeamBet,
    UmpireRecord,
};

pub const NO_BETTING_INFO: &str = "Betting odds not available for this game.";
pub const MIXED_ARSENAL: &str = "Mixed arsenal";
pub const UNKNOWN_UMPIRE: &str = "TBA";
pub const NEUTRAL_BOOST: &str = "1.0x";
pub const UNKNOWN_GAME_TIME: &str = "TBD";

/// Lineup BA edge that earns the matchup-edge keywords.
pub const KEYWORD_BA_EDGE: f64 = 0.015;
/// Lineup K% edge that earns the strikeout keywords.
pub const KEYWORD_K_EDGE: f64 = 3.0;
pub const PITCHER_FRIENDLY_UMPIRE: f64 = 1.1;
pub const HITTER_FRIENDLY_UMPIRE: f64 = 0.9;

const BASE_KEYWORDS: &[&str] = &[
    "mlb betting",
    "baseball preview",
    "pitcher analysis",
    "lineup matchups",
    "umpire analysis",
];

/// `"Four-Seam Fastball (35% usage, 97.1 mph); Slider (...)"`, most used pitch first.
pub fn format_pitcher_arsenal(pitcher: &PitcherProfile) -> String {
    if pitcher.arsenal.is_empty() {
        return MIXED_ARSENAL.to_string();
    }

    let mut pitches: Vec<_> = pitcher.arsenal.iter().collect();
    // Stable: equal usage keeps feed order.
    pitches.sort_by(|a, b| b.1.usage_rate.total_cmp(&a.1.usage_rate));

    pitches
        .into_iter()
        .map(|(code, stat)| {
            let name = stat.name.as_deref().unwrap_or(code);
            format!(
                "{name} ({:.0}% usage, {:.1} mph)",
                stat.usage_rate * 100.0,
                stat.avg_speed
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn is_favorite_odds(odds: &str) -> bool {
    // DraftKings sometimes sends a typographic minus.
    odds.starts_with('-') || odds.starts_with('\u{2212}')
}

fn parse_handle_pct(raw: &str) -> Option<i64> {
    let digits = raw.trim().split('%').next()?.trim();
    digits.parse::<i64>().ok()
}

/// One-sentence moneyline summary, or the "not available" sentence whenever
/// the market is missing or malformed.
pub fn format_betting_info(game: Option<&BettingGame>) -> String {
    format_moneyline(game).unwrap_or_else(|| NO_BETTING_INFO.to_string())
}

fn format_moneyline(game: Option<&BettingGame>) -> Option<String> {
    let moneyline = game?.markets.as_ref()?.moneyline.as_deref()?;
    if moneyline.len() != 2 {
        return None;
    }

    let mut favorite: Option<&TeamBet> = None;
    let mut underdog: Option<&TeamBet> = None;
    for bet in moneyline {
        let odds = bet.odds.as_deref().unwrap_or("+100");
        if is_favorite_odds(odds) {
            favorite = Some(bet);
        } else {
            underdog = Some(bet);
        }
    }
    let (favorite, underdog) = (favorite?, underdog?);

    let fav_odds = favorite.odds.as_deref()?;
    let und_odds = underdog.odds.as_deref().unwrap_or("+100");
    let fav_pct_raw = favorite.handle_pct.as_deref()?;
    let und_pct_raw = underdog.handle_pct.as_deref()?;
    let fav_handle = parse_handle_pct(fav_pct_raw)?;
    let und_handle = parse_handle_pct(und_pct_raw)?;

    let (money_team, money_pct) = if fav_handle > und_handle {
        (&favorite.team, fav_pct_raw)
    } else {
        (&underdog.team, und_pct_raw)
    };

    Some(format!(
        "DraftKings has {} as a {} favorite and {} as a {} underdog, with {} of the money backing {}.",
        favorite.team, fav_odds, underdog.team, und_odds, money_pct, money_team
    ))
}

fn nickname<'a>(betting_name: &'a str, code: &'a str) -> &'a str {
    betting_name.split_whitespace().last().unwrap_or(code)
}

/// `"Rays at Yankees MLB Betting Preview"`, using betting-feed nicknames when
/// the game matched a betting line and raw codes otherwise.
pub fn derive_topic(away_code: &str, home_code: &str, betting: Option<&BettingGame>) -> String {
    let (away, home) = match betting {
        Some(game) => (
            nickname(&game.away_team, away_code),
            nickname(&game.home_team, home_code),
        ),
        None => (away_code, home_code),
    };
    format!("{away} at {home} MLB Betting Preview")
}

/// `"1.11x"` to `1.11`.
pub fn parse_multiplier(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let number = trimmed
        .strip_suffix('x')
        .or_else(|| trimmed.strip_suffix('X'))
        .unwrap_or(trimmed);
    number.trim().parse::<f64>().ok()
}

fn pitcher_slug(display: &str) -> String {
    display.to_lowercase().replace(' ', "-")
}

pub struct KeywordInputs<'a> {
    pub away_team: &'a str,
    pub home_team: &'a str,
    pub away_pitcher: &'a str,
    pub home_pitcher: &'a str,
    pub away_lineup: &'a LineupStats,
    pub home_lineup: &'a LineupStats,
    pub umpire: Option<&'a UmpireRecord>,
}

pub fn derive_keywords(input: &KeywordInputs<'_>) -> Vec<String> {
    let mut keywords = vec![input.away_team.to_lowercase(), input.home_team.to_lowercase()];
    keywords.extend(BASE_KEYWORDS.iter().map(|k| k.to_string()));
    keywords.push(pitcher_slug(input.away_pitcher));
    keywords.push(pitcher_slug(input.home_pitcher));

    let mut push_pair = |a: &str, b: &str| {
        keywords.push(a.to_string());
        keywords.push(b.to_string());
    };

    if input.away_lineup.ba_advantage.abs() > KEYWORD_BA_EDGE
        || input.home_lineup.ba_advantage.abs() > KEYWORD_BA_EDGE
    {
        push_pair("pitcher advantage", "matchup edge");
    }
    if input.away_lineup.k_advantage.abs() > KEYWORD_K_EDGE
        || input.home_lineup.k_advantage.abs() > KEYWORD_K_EDGE
    {
        push_pair("strikeout props", "contact advantage");
    }

    let umpire_multiplier = input
        .umpire
        .filter(|u| u.umpire.as_deref().is_some_and(|name| name != UNKNOWN_UMPIRE))
        .and_then(|u| u.k_boost.as_deref())
        .and_then(parse_multiplier);
    if let Some(k) = umpire_multiplier {
        if k > PITCHER_FRIENDLY_UMPIRE {
            push_pair("strikeout props", "pitcher friendly umpire");
        } else if k < HITTER_FRIENDLY_UMPIRE {
            push_pair("hitter friendly umpire", "contact plays");
        }
    }

    keywords
}

/// Builds the record for one report. Umpire and betting lookups that miss
/// fall back to neutral defaults; only a malformed matchup or a missing
/// pitcher block rejects the game.
pub fn build_game_record(
    report: &GameReport,
    umpires: &[UmpireRecord],
    betting_games: &[BettingGame],
) -> Result<GameRecord, RecordError> {
    let matchup = report.matchup.as_deref().unwrap_or("Unknown");
    let (away_team, home_team) =
        split_matchup(matchup).ok_or_else(|| RecordError::MalformedMatchup(matchup.to_string()))?;

    let pitchers = report.pitchers.as_ref();
    let away_pitcher = pitchers
        .and_then(|p| p.away.as_ref())
        .ok_or_else(|| RecordError::MissingPitcher {
            side: "away",
            matchup: matchup.to_string(),
        })?;
    let home_pitcher = pitchers
        .and_then(|p| p.home.as_ref())
        .ok_or_else(|| RecordError::MissingPitcher {
            side: "home",
            matchup: matchup.to_string(),
        })?;

    let away_display = display_name(away_pitcher.name_or_unknown());
    let home_display = display_name(home_pitcher.name_or_unknown());

    let away_lineup =
        calculate_lineup_advantage(&report.key_matchups, home_pitcher.name_or_unknown());
    let home_lineup =
        calculate_lineup_advantage(&report.key_matchups, away_pitcher.name_or_unknown());

    let umpire = find_game_umpire(umpires, matchup);
    let betting = find_betting_game(betting_games, matchup);
    debug!(
        %matchup,
        umpire = umpire.is_some(),
        betting = betting.is_some(),
        "resolved game sources"
    );

    let keywords = derive_keywords(&KeywordInputs {
        away_team,
        home_team,
        away_pitcher: &away_display,
        home_pitcher: &home_display,
        away_lineup: &away_lineup,
        home_lineup: &home_lineup,
        umpire,
    });

    let umpire_name = umpire
        .and_then(|u| u.umpire.clone())
        .unwrap_or_else(|| UNKNOWN_UMPIRE.to_string());
    let umpire_k_boost = umpire
        .and_then(|u| u.k_boost.clone())
        .unwrap_or_else(|| NEUTRAL_BOOST.to_string());
    let umpire_bb_boost = umpire
        .and_then(|u| u.bb_boost.clone())
        .unwrap_or_else(|| NEUTRAL_BOOST.to_string());

    Ok(GameRecord {
        matchup: matchup.to_string(),
        away_team: away_team.to_string(),
        home_team: home_team.to_string(),
        game_time: betting
            .and_then(|g| g.time.clone())
            .unwrap_or_else(|| UNKNOWN_GAME_TIME.to_string()),
        betting_info: format_betting_info(betting),
        away_pitcher: PitcherSummary {
            name: away_display,
            arsenal: format_pitcher_arsenal(away_pitcher),
        },
        home_pitcher: PitcherSummary {
            name: home_display,
            arsenal: format_pitcher_arsenal(home_pitcher),
        },
        away_lineup_advantage: away_lineup.ba_advantage,
        away_lineup_k_advantage: away_lineup.k_advantage,
        away_season_ba: away_lineup.season_ba,
        away_arsenal_ba: away_lineup.arsenal_ba,
        away_season_k_pct: away_lineup.season_k_pct,
        away_arsenal_k_pct: away_lineup.arsenal_k_pct,
        away_key_performers: away_lineup.top_performers,
        home_lineup_advantage: home_lineup.ba_advantage,
        home_lineup_k_advantage: home_lineup.k_advantage,
        home_season_ba: home_lineup.season_ba,
        home_arsenal_ba: home_lineup.arsenal_ba,
        home_season_k_pct: home_lineup.season_k_pct,
        home_arsenal_k_pct: home_lineup.arsenal_k_pct,
        home_key_performers: home_lineup.top_performers,
        umpire: umpire_name,
        umpire_k_boost,
        umpire_bb_boost,
        topic: derive_topic(away_team, home_team, betting),
        keywords,
    })
}
