use tracing::debug;

use crate::models::{BettingGame, UmpireRecord};

pub const MATCHUP_SEPARATOR: &str = " @ ";

/// Feed team code to the substrings the betting feed uses for that club.
static TEAM_ALIASES: &[(&str, &[&str])] = &[
    ("LAA", &["LA Angels", "LAA Angels", "Angels"]),
    ("LAD", &["LA Dodgers", "LAD Dodgers", "Dodgers"]),
    ("NYM", &["NY Mets", "NYM Mets", "Mets"]),
    ("NYY", &["NY Yankees", "NYY Yankees", "Yankees"]),
    ("CWS", &["CHI White Sox", "CWS White Sox", "White Sox"]),
    ("CHC", &["CHI Cubs", "CHC Cubs", "Cubs"]),
    ("TB", &["TB Rays", "Rays"]),
    ("SF", &["SF Giants", "Giants"]),
    ("SD", &["SD Padres", "Padres"]),
    ("KC", &["KC Royals", "Royals"]),
    ("WSH", &["WSH Nationals", "WAS Nationals", "Nationals"]),
    ("WSN", &["WSH Nationals", "WAS Nationals", "Nationals"]),
    ("ARI", &["ARI Diamondbacks", "AZ Diamondbacks", "Diamondbacks"]),
    ("AZ", &["ARI Diamondbacks", "AZ Diamondbacks", "Diamondbacks"]),
    ("MIA", &["MIA Marlins", "Marlins"]),
    ("CIN", &["CIN Reds", "Reds"]),
    ("COL", &["COL Rockies", "Rockies"]),
    ("BOS", &["BOS Red Sox", "Red Sox"]),
    ("MIL", &["MIL Brewers", "Brewers"]),
    ("PIT", &["PIT Pirates", "Pirates"]),
    ("HOU", &["HOU Astros", "Astros"]),
    ("CLE", &["CLE Guardians", "Guardians"]),
    ("TEX", &["TEX Rangers", "Rangers"]),
    ("DET", &["DET Tigers", "Tigers"]),
    ("MIN", &["MIN Twins", "Twins"]),
    ("TOR", &["TOR Blue Jays", "Blue Jays"]),
    ("ATL", &["ATL Braves", "Braves"]),
    ("BAL", &["BAL Orioles", "Orioles"]),
    ("PHI", &["PHI Phillies", "Phillies"]),
    ("SEA", &["SEA Mariners", "Mariners"]),
    ("STL", &["STL Cardinals", "Cardinals"]),
    ("ATH", &["Athletics"]),
];

/// Splits `"AWAY @ HOME"` into its two codes.
pub fn split_matchup(matchup: &str) -> Option<(&str, &str)> {
    let (away, home) = matchup.split_once(MATCHUP_SEPARATOR)?;
    Some((away, home))
}

/// Substrings accepted for a team code. Unknown codes only match themselves.
pub fn resolve_team_aliases(code: &str) -> Vec<&str> {
    TEAM_ALIASES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, aliases)| aliases.to_vec())
        .unwrap_or_else(|| vec![code])
}

fn name_matches(name: &str, aliases: &[&str]) -> bool {
    aliases.iter().any(|alias| name.contains(alias))
}

/// First betting game whose away and home names both carry an alias of the
/// matchup's codes. Feed order decides between several candidates.
pub fn find_betting_game<'a>(games: &'a [BettingGame], matchup: &str) -> Option<&'a BettingGame> {
    let (away, home) = split_matchup(matchup)?;
    let away_aliases = resolve_team_aliases(away);
    let home_aliases = resolve_team_aliases(home);

    let found = games.iter().find(|game| {
        name_matches(&game.away_team, &away_aliases) && name_matches(&game.home_team, &home_aliases)
    });
    match found {
        Some(game) => debug!(
            %matchup,
            away = %game.away_team,
            home = %game.home_team,
            "betting game matched"
        ),
        None => debug!(%matchup, "no betting game matched"),
    }
    found
}

/// Exact matchup equality first, then any record mentioning both codes.
pub fn find_game_umpire<'a>(umpires: &'a [UmpireRecord], matchup: &str) -> Option<&'a UmpireRecord> {
    let exact = umpires
        .iter()
        .find(|ump| ump.matchup.as_deref() == Some(matchup));
    if exact.is_some() {
        return exact;
    }

    let (away, home) = split_matchup(matchup)?;
    umpires.iter().find(|ump| {
        ump.matchup
            .as_deref()
            .is_some_and(|m| m.contains(away) && m.contains(home))
    })
}
