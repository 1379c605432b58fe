use regex::{Regex, RegexBuilder};
use tracing::{debug, info, warn};

const STATS_URL: &str = "https://www.thebettinginsider.com/stats-about";
const GAME_STATS_URL: &str = "https://www.thebettinginsider.com/daily-mlb-game-stats";

/// Phrase to internal page. Longer phrases are tried first.
static INTERLINKS: &[(&str, &str)] = &[
    ("betting splits", STATS_URL),
    ("public money", STATS_URL),
    ("betting percentage", STATS_URL),
    ("sharp money", STATS_URL),
    ("betting trends", STATS_URL),
    ("stats dashboard", STATS_URL),
    ("pitcher arsenal data", GAME_STATS_URL),
    ("pitch mix", GAME_STATS_URL),
    ("arsenal-specific performance", GAME_STATS_URL),
    ("batter vs pitch type stats", GAME_STATS_URL),
    ("projected xBA", GAME_STATS_URL),
    ("expected batting average", GAME_STATS_URL),
    ("contact-adjusted xBA", GAME_STATS_URL),
    ("xBA vs arsenal", GAME_STATS_URL),
    ("strikeout percentage", GAME_STATS_URL),
    ("K-rate", GAME_STATS_URL),
    ("strikeout rate", GAME_STATS_URL),
    ("whiff rate", GAME_STATS_URL),
    ("swing and miss %", GAME_STATS_URL),
];

/// How far past a match we look for the `](` that closes a link label.
const LINK_LOOKAHEAD: usize = 10;

fn phrases_longest_first() -> Vec<(&'static str, &'static str)> {
    let mut phrases = INTERLINKS.to_vec();
    // Stable: equal lengths keep table order.
    phrases.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    phrases
}

fn phrase_pattern(phrase: &str) -> Option<Regex> {
    let built = RegexBuilder::new(&format!(r"\b{}\b", regex::escape(phrase)))
        .case_insensitive(true)
        .build();
    match built {
        Ok(re) => Some(re),
        Err(err) => {
            warn!(phrase, error = %err, "skipping interlink phrase");
            None
        }
    }
}

fn floor_boundary(text: &str, mut idx: usize) -> usize {
    idx = idx.min(text.len());
    while !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Whether the match at `start..end` sits inside a `[label](url)` label.
fn inside_link(text: &str, start: usize, end: usize) -> bool {
    let preceding = &text[..start];
    let Some(open) = preceding.rfind('[') else {
        return false;
    };
    if preceding.rfind(')').is_some_and(|close| close > open) {
        return false;
    }
    let window_end = floor_boundary(text, end + LINK_LOOKAHEAD);
    text[open..window_end].contains("](")
}

/// Links the first occurrence of known phrases to their internal pages.
///
/// Matching is case-insensitive and whole-word; the link label keeps the
/// text's own casing. A phrase whose first occurrence already sits inside a
/// link is skipped. At most `max_links` links are added.
pub fn auto_link(text: &str, max_links: usize) -> String {
    if text.is_empty() || max_links == 0 {
        return text.to_string();
    }

    let mut linked = text.to_string();
    let mut inserted = 0;

    for (phrase, url) in phrases_longest_first() {
        if inserted >= max_links {
            break;
        }
        let Some(pattern) = phrase_pattern(phrase) else {
            continue;
        };
        let Some(found) = pattern.find(&linked) else {
            continue;
        };
        if inside_link(&linked, found.start(), found.end()) {
            debug!(phrase, "already linked, skipping");
            continue;
        }

        let label = found.as_str().to_string();
        linked.replace_range(found.range(), &format!("[{label}]({url})"));
        inserted += 1;
        debug!(%label, url, "added internal link");
    }

    if inserted > 0 {
        info!(links = inserted, "added internal links");
    }
    linked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_first_occurrence_only() {
        let out = auto_link("Watch the whiff rate. The whiff rate matters.", 5);
        assert_eq!(
            out,
            format!("Watch the [whiff rate]({GAME_STATS_URL}). The whiff rate matters.")
        );
    }

    #[test]
    fn keeps_original_casing() {
        let out = auto_link("Public Money is on the Rays.", 5);
        assert_eq!(out, format!("[Public Money]({STATS_URL}) is on the Rays."));
    }

    #[test]
    fn whole_words_only() {
        let text = "Their k-rates are up.";
        assert_eq!(auto_link(text, 5), text);
    }

    #[test]
    fn longest_phrase_wins_overlap() {
        let out = auto_link("His projected xBA vs arsenal is .310", 5);
        assert_eq!(
            out,
            format!("His projected [xBA vs arsenal]({GAME_STATS_URL}) is .310")
        );
    }

    #[test]
    fn respects_max_links() {
        let text = "betting splits, public money, sharp money, pitch mix, whiff rate, K-rate";
        let out = auto_link(text, 2);
        assert_eq!(out.matches("](").count(), 2);
        assert_eq!(auto_link(text, 0), text);
        assert_eq!(auto_link("", 5), "");
    }

    #[test]
    fn skips_text_already_in_a_link() {
        let text = "See [sharp money](https://example.com) today.";
        assert_eq!(auto_link(text, 5), text);
    }

    #[test]
    fn inside_link_handles_multibyte_tail() {
        let text = "[whiff rate](u) 📢📢📢";
        assert!(inside_link(text, 1, 11));
        assert!(!inside_link("whiff rate 📢", 0, 10));
    }
}
