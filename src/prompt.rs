use anyhow::{Context, Result};
use chrono::NaiveDate;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::GameRecord;

/// A batter only becomes a betting lean when projected xBA clears this...
pub const LEAN_MIN_ARSENAL_BA: f64 = 0.300;
/// ...and the projection beats the season average by more than this.
pub const LEAN_MIN_BA_BOOST: f64 = 0.020;
/// Pitcher strikeout OVER needs the lineup's arsenal K% above this...
pub const LEAN_MIN_ARSENAL_K: f64 = 25.0;
/// ...and a jump over the season K% larger than this.
pub const LEAN_MIN_K_INCREASE: f64 = 4.0;

pub const SYSTEM_PROMPT: &str = "You are a professional MLB betting analyst and blog writer who specializes in pitcher-batter matchups and umpire analysis. Write engaging, data-driven content for baseball fans and bettors. Always output in clean Markdown format with SEO enhancements.";

const INTRO_HEADERS: &[&str] = &[
    "Brief Intro",
    "Game Overview",
    "Matchup Setup",
    "Today's Setup",
    "Game Preview",
];
const PITCHER_HEADERS: &[&str] = &[
    "Pitcher Breakdown",
    "Rotation Report",
    "Starting Pitching Analysis",
    "Mound Matchup",
    "Pitching Preview",
];
const LINEUP_HEADERS: &[&str] = &[
    "Lineup Matchups",
    "Batting Edges vs Arsenal",
    "Offensive Breakdown",
    "Lineup Advantage vs Arsenal",
    "Hitting Matchups",
];
const STRIKEOUT_HEADERS: &[&str] = &[
    "Strikeout Trends",
    "K-Risk Analysis",
    "Whiff Outlook",
    "Lineup Strikeout Trends vs Arsenal",
    "Contact vs Strikeout Profile",
];
const UMPIRE_HEADERS: &[&str] = &[
    "Umpire Impact",
    "Behind the Plate",
    "Umpire Trends",
    "Umpire Influence",
    "Plate Umpire Analysis",
];
const LEAN_HEADERS: &[&str] = &[
    "Final Lean & Takeaway",
    "Betting Breakdown",
    "Where the Edge Is",
    "Betting Interpretation / Final Lean",
    "Our Betting Take",
];

/// Section headings, varied per post so a day's previews don't read as templated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogHeaders {
    pub intro: &'static str,
    pub pitchers: &'static str,
    pub lineups: &'static str,
    pub strikeouts: &'static str,
    pub umpire: &'static str,
    pub lean: &'static str,
}

impl BlogHeaders {
    pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut choose = |options: &[&'static str]| -> &'static str {
            options.choose(rng).copied().unwrap_or(options[0])
        };
        Self {
            intro: choose(INTRO_HEADERS),
            pitchers: choose(PITCHER_HEADERS),
            lineups: choose(LINEUP_HEADERS),
            strikeouts: choose(STRIKEOUT_HEADERS),
            umpire: choose(UMPIRE_HEADERS),
            lean: choose(LEAN_HEADERS),
        }
    }
}

/// `"Rays at Yankees MLB Betting Preview"` becomes
/// `"Rays vs Yankees: Betting Preview & Props (Jul 08)"`.
pub fn seo_title(topic: &str, today: NaiveDate) -> String {
    let teams = topic.replace(" MLB Betting Preview", "");
    match teams.split_once(" at ") {
        Some((away, home)) => format!(
            "{away} vs {home}: Betting Preview & Props ({})",
            today.format("%b %d")
        ),
        None => topic.replace("MLB Betting Preview", "Odds, Props & Analysis"),
    }
}

pub fn build_prompt(record: &GameRecord, headers: &BlogHeaders, today: NaiveDate) -> Result<String> {
    let title = seo_title(&record.topic, today);
    let updated = today.format("%B %d, %Y");
    let game_json = serde_json::to_string_pretty(record).context("serialize game record")?;
    let keywords = record.keywords.join(", ");
    let lean_ba_points = (LEAN_MIN_BA_BOOST * 1000.0).round();

    Ok(format!(
        r#"You're an expert MLB betting analyst and blog writer. You write sharp, stat-driven previews for baseball bettors.

Using only the JSON game data below, write a 500-800 word blog post with exactly this structure:

# {title}
*Last updated: {updated}*

**Game Time:** [game_time]

## {intro}
Two or three sentences setting up the matchup. Work in the line from betting_info.

## {pitchers}
**Pitching Matchup:** [away pitcher] vs [home pitcher]

### [Away pitcher] ([away team]):
Every pitch from away_pitcher.arsenal with its exact usage and velocity, e.g. "Four-Seam Fastball (35% usage, 97.1 mph)".
What kind of pitcher this is, then: "The [home team] lineup averages .XXX this season with a projected xBA of .XXX vs [away pitcher]'s arsenal".

### [Home pitcher] ([home team]):
Same treatment from home_pitcher.arsenal, comparing against the [away team] lineup.

## {lineups}
**Lineup Matchups & Batting Edges**
For each lineup compare season BA with projected xBA vs the opposing arsenal.
From away_key_performers and home_key_performers show only the biggest xBA increase and the biggest decrease:
Name: Season BA .XXX → xBA vs arsenal .XXX (+/- XX points), Season K% XX.X% → Arsenal K% XX.X% (+/- X.X%)
Skip batters whose change is under 15 points.

## {strikeouts}
**Strikeout Risks & Rewards**
Compare away_arsenal_k_pct with away_season_k_pct and home_arsenal_k_pct with home_season_k_pct:
"The [team]'s projected K-rate is X% vs [pitcher], up/down Y% from their Z% season average."
Higher means potential K prop value, lower means a potential contact play.

## {umpire}
**Behind the Plate:** [umpire]
If umpire is not "TBA": name the umpire, convert umpire_k_boost and umpire_bb_boost to percentages (1.11x = "+11% strikeouts", 1.03x = "+3% walks").
More strikeouts is pitcher-friendly, more walks is hitter-friendly; K up with BB up is "mixed tendencies".
If umpire is "TBA": "Umpire assignment has not been announced, which makes prop volatility a concern."

## {lean}
**Final Lean & Betting Takeaway**
1. Check every batter in away_key_performers and home_key_performers. A batter is a lean only when arsenal_ba > {lean_ba:.3} AND arsenal_ba - season_ba > {lean_boost:.3}. For each one write:
> 📢 **Prop Alert**: [Player] (.XXX → .XXX, +XX points) meets betting lean criteria!
2. For each lineup, lean the opposing pitcher's strikeout OVER only when arsenal K% > {lean_k:.0}% AND it rises more than {lean_k_jump:.0}% over the season K%:
> ⚡ **K Prop Alert**: [Pitcher] strikeout OVER - [team]'s K-rate jumps to XX.X% vs this arsenal!
3. If nothing qualifies: "No significant statistical edges meet our betting threshold in this matchup."

## 🔑 Key Takeaways
Three or four bullets: player edges, pitcher props (or none), umpire impact, overall recommendation.

## 🧠 FAQs
**Q: Who is the best betting prop for the [away team] vs [home team] game?**
**Q: Is [umpire] a pitcher-friendly umpire?**
**Q: What time is the [away team] vs [home team] game?**
Answer each from the data.

Rules:
- Use only the JSON below. If something is missing say "data not available".
- Convert every multiplier to a percentage.
- Always give exact pitch usage and velocity, and exact season BA vs projected xBA.
- Never suggest a batter lean unless xBA > {lean_ba:.3} and the boost is more than +{lean_points} points.
- Never suggest a strikeout prop unless K% > {lean_k:.0}% and the increase is more than {lean_k_jump:.0}%.
- Walks help hitters, strikeouts help pitchers.
- Output valid Markdown with # ## ### headers, never HTML.

Blog Title: {title}
Target Keywords: {keywords}

Game Data (JSON):
{game_json}
"#,
        intro = headers.intro,
        pitchers = headers.pitchers,
        lineups = headers.lineups,
        strikeouts = headers.strikeouts,
        umpire = headers.umpire,
        lean = headers.lean,
        lean_ba = LEAN_MIN_ARSENAL_BA,
        lean_boost = LEAN_MIN_BA_BOOST,
        lean_points = lean_ba_points,
        lean_k = LEAN_MIN_ARSENAL_K,
        lean_k_jump = LEAN_MIN_K_INCREASE,
    ))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    #[test]
    fn headers_come_from_option_lists() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let h = BlogHeaders::pick(&mut rng);
            assert!(INTRO_HEADERS.contains(&h.intro));
            assert!(PITCHER_HEADERS.contains(&h.pitchers));
            assert!(LINEUP_HEADERS.contains(&h.lineups));
            assert!(STRIKEOUT_HEADERS.contains(&h.strikeouts));
            assert!(UMPIRE_HEADERS.contains(&h.umpire));
            assert!(LEAN_HEADERS.contains(&h.lean));
        }
    }

    #[test]
    fn seo_title_from_topic() {
        let day = NaiveDate::from_ymd_opt(2025, 7, 8).unwrap();
        assert_eq!(
            seo_title("Rays at Yankees MLB Betting Preview", day),
            "Rays vs Yankees: Betting Preview & Props (Jul 08)"
        );
        assert_eq!(
            seo_title("Doubleheader MLB Betting Preview", day),
            "Doubleheader Odds, Props & Analysis"
        );
    }
}
