use once_cell::sync::Lazy;
use regex::Regex;

// Patterns are literals; a failure here is a programming error.
fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("static markdown pattern")
}

static H1: Lazy<Regex> = Lazy::new(|| re(r"(?m)^# (.*)$"));
static H2: Lazy<Regex> = Lazy::new(|| re(r"(?m)^## (.*)$"));
static H3: Lazy<Regex> = Lazy::new(|| re(r"(?m)^### (.*)$"));
static BOLD: Lazy<Regex> = Lazy::new(|| re(r"\*\*(.*?)\*\*"));
static ITALIC: Lazy<Regex> = Lazy::new(|| re(r"\*(.*?)\*"));
static LINK: Lazy<Regex> = Lazy::new(|| re(r"\[([^\]]+)\]\(([^)]+)\)"));
static PROP_ALERT: Lazy<Regex> = Lazy::new(|| re(r"(?m)^> 📢 (.*)$"));
static K_ALERT: Lazy<Regex> = Lazy::new(|| re(r"(?m)^> ⚡ (.*)$"));
static BULLET: Lazy<Regex> = Lazy::new(|| re(r"(?m)^- (.*)$"));
static LIST_ITEM: Lazy<Regex> = Lazy::new(|| re(r"(?s)(<li>.*?</li>)"));
static ADJACENT_LISTS: Lazy<Regex> = Lazy::new(|| re(r"</ul>\s*<ul>"));
static BLANK_LINE: Lazy<Regex> = Lazy::new(|| re(r"\n\n"));
static EMPTY_PARAGRAPH: Lazy<Regex> = Lazy::new(|| re(r"<p>\s*</p>"));

const PROP_ALERT_BOX: &str = r#"<div style="background:#f2f2f2; padding:12px; border-left:4px solid #4CAF50; margin:15px 0;"><strong>📢 ${1}</strong></div>"#;
const K_ALERT_BOX: &str = r#"<div style="background:#f2f2f2; padding:12px; border-left:4px solid #FF9800; margin:15px 0;"><strong>⚡ ${1}</strong></div>"#;

/// Converts generated post markdown into the CMS rich-text HTML subset.
///
/// Handles the constructs the post prompt asks for: `#`/`##`/`###` headers,
/// bold, italic, links, the two alert blockquotes, and `- ` bullets (runs of
/// bullets become a single `<ul>`). Blank lines split paragraphs.
pub fn markdown_to_rich_text(markdown: &str) -> String {
    let html = H1.replace_all(markdown, "<h1>${1}</h1>");
    let html = H2.replace_all(&html, "<h2>${1}</h2>");
    let html = H3.replace_all(&html, "<h3>${1}</h3>");

    let html = BOLD.replace_all(&html, "<strong>${1}</strong>");
    let html = ITALIC.replace_all(&html, "<em>${1}</em>");
    let html = LINK.replace_all(&html, r#"<a href="${2}">${1}</a>"#);

    let html = PROP_ALERT.replace_all(&html, PROP_ALERT_BOX);
    let html = K_ALERT.replace_all(&html, K_ALERT_BOX);

    let html = BULLET.replace_all(&html, "<li>${1}</li>");
    let html = LIST_ITEM.replace_all(&html, "<ul>${1}</ul>");
    let html = ADJACENT_LISTS.replace_all(&html, "");

    let html = BLANK_LINE.replace_all(&html, "</p><p>");
    let html = format!("<p>{html}</p>");
    EMPTY_PARAGRAPH.replace_all(&html, "").into_owned()
}
