use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BA: f64 = 0.250;
pub const DEFAULT_K_PCT: f64 = 22.5;

// ---------------------------------------------------------------------------
// MLB matchup feed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameReport {
    #[serde(default)]
    pub matchup: Option<String>,
    #[serde(default)]
    pub pitchers: Option<Pitchers>,
    #[serde(default)]
    pub key_matchups: Vec<BatterMatchup>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pitchers {
    #[serde(default)]
    pub away: Option<PitcherProfile>,
    #[serde(default)]
    pub home: Option<PitcherProfile>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PitcherProfile {
    #[serde(default)]
    pub name: Option<String>,
    /// Pitch-type code (e.g. "FF") to usage and velocity, in feed order.
    #[serde(default)]
    pub arsenal: IndexMap<String, PitchStat>,
}

impl PitcherProfile {
    pub fn name_or_unknown(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PitchStat {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub usage_rate: f64,
    #[serde(default)]
    pub avg_speed: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatterMatchup {
    #[serde(default)]
    pub batter: Option<String>,
    #[serde(default)]
    pub vs_pitcher: Option<String>,
    #[serde(default)]
    pub reliability: Option<String>,
    #[serde(default)]
    pub baseline_stats: Option<BaselineStats>,
    #[serde(default)]
    pub weighted_est_ba: Option<f64>,
    #[serde(default)]
    pub weighted_k_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaselineStats {
    #[serde(default)]
    pub season_avg: Option<f64>,
    #[serde(default)]
    pub season_k_pct: Option<f64>,
}

// ---------------------------------------------------------------------------
// Umpire feed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UmpireRecord {
    #[serde(default)]
    pub matchup: Option<String>,
    #[serde(default)]
    pub umpire: Option<String>,
    #[serde(default)]
    pub k_boost: Option<String>,
    #[serde(default)]
    pub bb_boost: Option<String>,
}

// ---------------------------------------------------------------------------
// Betting feed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BettingGame {
    #[serde(default)]
    pub away_team: String,
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub markets: Option<BettingMarkets>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BettingMarkets {
    #[serde(rename = "Moneyline", default)]
    pub moneyline: Option<Vec<TeamBet>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamBet {
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub odds: Option<String>,
    #[serde(default)]
    pub handle_pct: Option<String>,
}

// ---------------------------------------------------------------------------
// Derived output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Advantage {
    StrongBa,
    PoorBa,
    LowK,
    HighK,
    Moderate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandoutBatter {
    pub name: String,
    pub season_ba: f64,
    pub arsenal_ba: f64,
    pub season_k: f64,
    pub arsenal_k: f64,
    pub ba_diff: f64,
    pub k_diff: f64,
    pub advantage: Advantage,
}

/// Aggregate for one lineup facing one pitcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupStats {
    pub ba_advantage: f64,
    pub k_advantage: f64,
    pub season_ba: f64,
    pub arsenal_ba: f64,
    pub season_k_pct: f64,
    pub arsenal_k_pct: f64,
    pub top_performers: Vec<StandoutBatter>,
}

impl Default for LineupStats {
    fn default() -> Self {
        Self {
            ba_advantage: 0.0,
            k_advantage: 0.0,
            season_ba: DEFAULT_BA,
            arsenal_ba: DEFAULT_BA,
            season_k_pct: DEFAULT_K_PCT,
            arsenal_k_pct: DEFAULT_K_PCT,
            top_performers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitcherSummary {
    pub name: String,
    pub arsenal: String,
}

/// One game, fully assembled. Built once per run and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub matchup: String,
    pub away_team: String,
    pub home_team: String,
    pub game_time: String,
    pub betting_info: String,
    pub away_pitcher: PitcherSummary,
    pub home_pitcher: PitcherSummary,

    // Away lineup vs home pitcher.
    pub away_lineup_advantage: f64,
    pub away_lineup_k_advantage: f64,
    pub away_season_ba: f64,
    pub away_arsenal_ba: f64,
    pub away_season_k_pct: f64,
    pub away_arsenal_k_pct: f64,
    pub away_key_performers: Vec<StandoutBatter>,

    // Home lineup vs away pitcher.
    pub home_lineup_advantage: f64,
    pub home_lineup_k_advantage: f64,
    pub home_season_ba: f64,
    pub home_arsenal_ba: f64,
    pub home_season_k_pct: f64,
    pub home_arsenal_k_pct: f64,
    pub home_key_performers: Vec<StandoutBatter>,

    pub umpire: String,
    pub umpire_k_boost: String,
    pub umpire_bb_boost: String,

    pub topic: String,
    pub keywords: Vec<String>,
}
