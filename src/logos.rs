use anyhow::{Context, Result, bail};
use tracing::{debug, warn};

use crate::http_client::{body_snippet, feed_client};

pub const GENERIC_LOGO_URL: &str = "https://a.espncdn.com/i/teamlogos/mlb/500/mlb.png";

/// Feed codes and nicknames, as the feeds spell them.
#[rustfmt::skip]
static TEAM_LOGOS: &[(&str, &str)] = &[
    ("NYY", "nyy"), ("Yankees", "nyy"),
    ("TOR", "tor"), ("Blue Jays", "tor"),
    ("BOS", "bos"), ("Red Sox", "bos"),
    ("LAD", "lad"), ("Dodgers", "lad"),
    ("SF", "sf"), ("Giants", "sf"),
    ("HOU", "hou"), ("Astros", "hou"),
    ("ATL", "atl"), ("Braves", "atl"),
    ("NYM", "nym"), ("Mets", "nym"),
    ("PHI", "phi"), ("Phillies", "phi"),
    ("WSN", "wsh"), ("WSH", "wsh"), ("Nationals", "wsh"),
    ("MIA", "mia"), ("Marlins", "mia"),
    ("CHC", "chc"), ("Cubs", "chc"),
    ("MIL", "mil"), ("Brewers", "mil"),
    ("STL", "stl"), ("Cardinals", "stl"),
    ("CIN", "cin"), ("Reds", "cin"),
    ("PIT", "pit"), ("Pirates", "pit"),
    ("LAA", "laa"), ("Angels", "laa"),
    ("SEA", "sea"), ("Mariners", "sea"),
    ("TEX", "tex"), ("Rangers", "tex"),
    ("OAK", "oak"), ("ATH", "oak"), ("Athletics", "oak"),
    ("MIN", "min"), ("Twins", "min"),
    ("CWS", "chw"), ("White Sox", "chw"),
    ("CLE", "cle"), ("Guardians", "cle"),
    ("DET", "det"), ("Tigers", "det"),
    ("KC", "kc"), ("Royals", "kc"),
    ("TB", "tb"), ("Rays", "tb"),
    ("BAL", "bal"), ("Orioles", "bal"),
    ("COL", "col"), ("Rockies", "col"),
    ("ARI", "ari"), ("AZ", "ari"), ("Diamondbacks", "ari"),
    ("SD", "sd"), ("Padres", "sd"),
];

/// Upper-cased nicknames, cities and full names.
#[rustfmt::skip]
static TEAM_NAMES: &[(&str, &str)] = &[
    ("YANKEES", "nyy"), ("NEW YORK YANKEES", "nyy"),
    ("BLUE JAYS", "tor"), ("TORONTO BLUE JAYS", "tor"), ("TORONTO", "tor"),
    ("RED SOX", "bos"), ("BOSTON RED SOX", "bos"), ("BOSTON", "bos"),
    ("DODGERS", "lad"), ("LOS ANGELES DODGERS", "lad"),
    ("GIANTS", "sf"), ("SAN FRANCISCO GIANTS", "sf"),
    ("ASTROS", "hou"), ("HOUSTON ASTROS", "hou"),
    ("BRAVES", "atl"), ("ATLANTA BRAVES", "atl"),
    ("METS", "nym"), ("NEW YORK METS", "nym"),
    ("PHILLIES", "phi"), ("PHILADELPHIA PHILLIES", "phi"),
    ("NATIONALS", "wsh"), ("WASHINGTON NATIONALS", "wsh"),
    ("MARLINS", "mia"), ("MIAMI MARLINS", "mia"),
    ("CUBS", "chc"), ("CHICAGO CUBS", "chc"),
    ("BREWERS", "mil"), ("MILWAUKEE BREWERS", "mil"),
    ("CARDINALS", "stl"), ("ST LOUIS CARDINALS", "stl"),
    ("REDS", "cin"), ("CINCINNATI REDS", "cin"),
    ("PIRATES", "pit"), ("PITTSBURGH PIRATES", "pit"),
    ("ANGELS", "laa"), ("LOS ANGELES ANGELS", "laa"),
    ("MARINERS", "sea"), ("SEATTLE MARINERS", "sea"),
    ("RANGERS", "tex"), ("TEXAS RANGERS", "tex"),
    ("ATHLETICS", "oak"), ("OAKLAND ATHLETICS", "oak"),
    ("TWINS", "min"), ("MINNESOTA TWINS", "min"),
    ("WHITE SOX", "chw"), ("CHICAGO WHITE SOX", "chw"),
    ("GUARDIANS", "cle"), ("CLEVELAND GUARDIANS", "cle"),
    ("TIGERS", "det"), ("DETROIT TIGERS", "det"),
    ("ROYALS", "kc"), ("KANSAS CITY ROYALS", "kc"),
    ("RAYS", "tb"), ("TAMPA BAY RAYS", "tb"),
    ("ORIOLES", "bal"), ("BALTIMORE ORIOLES", "bal"),
    ("ROCKIES", "col"), ("COLORADO ROCKIES", "col"),
    ("DIAMONDBACKS", "ari"), ("ARIZONA DIAMONDBACKS", "ari"),
    ("PADRES", "sd"), ("SAN DIEGO PADRES", "sd"),
];

pub fn logo_url_for_code(code: &str) -> String {
    format!("https://a.espncdn.com/i/teamlogos/mlb/500/{code}.png")
}

fn logo_code(team: &str) -> Option<&'static str> {
    let trimmed = team.trim();
    if trimmed.is_empty() {
        return None;
    }
    let upper = trimmed.to_uppercase();

    let exact = TEAM_LOGOS
        .iter()
        .find(|(key, _)| *key == trimmed || *key == upper)
        .or_else(|| TEAM_NAMES.iter().find(|(name, _)| *name == upper));
    if let Some(&(_, code)) = exact {
        return Some(code);
    }

    // Substring either way, table order decides.
    TEAM_LOGOS
        .iter()
        .map(|(key, code)| (key.to_uppercase(), *code))
        .chain(TEAM_NAMES.iter().map(|(name, code)| (name.to_string(), *code)))
        .find(|(key, _)| upper.contains(key.as_str()) || key.contains(upper.as_str()))
        .map(|(_, code)| code)
}

/// ESPN logo for a team code, nickname or full name; the league logo when
/// nothing matches.
pub fn team_logo_url(team: &str) -> String {
    match logo_code(team) {
        Some(code) => logo_url_for_code(code),
        None => {
            warn!(team, "no logo match, using league logo");
            GENERIC_LOGO_URL.to_string()
        }
    }
}

/// Where logo image bytes come from.
pub trait LogoSource {
    fn logo_png(&self, url: &str) -> Result<Vec<u8>>;
}

/// Downloads logos over HTTP with the feed client.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpLogos;

impl LogoSource for HttpLogos {
    fn logo_png(&self, url: &str) -> Result<Vec<u8>> {
        let resp = feed_client()?
            .get(url)
            .send()
            .with_context(|| format!("fetch logo {url}"))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            bail!("logo http {}: {}", status, body_snippet(&body));
        }
        let bytes = resp.bytes().context("read logo body")?;
        debug!(url, size = bytes.len(), "fetched logo");
        Ok(bytes.to_vec())
    }
}
