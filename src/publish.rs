use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use md5::{Digest, Md5};
use reqwest::blocking::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::config::WebflowConfig;
use crate::http_client::{body_snippet, long_client};
use crate::markdown::markdown_to_rich_text;
use crate::models::GameRecord;

const SUMMARY_MAX: usize = 160;
const META_DESCRIPTION_MAX: usize = 250;
const WEBFLOW_API: &str = "https://api.webflow.com/v2";

/// Destination for generated posts.
pub trait Publisher {
    /// Fails when the destination cannot take posts at all.
    fn prepare(&mut self) -> Result<()>;
    /// Stores a cover PNG, returning its public URL when one is available.
    fn upload_cover(&mut self, png: &[u8], filename: &str) -> Result<Option<String>>;
    fn create_post(&mut self, draft: &PostDraft) -> Result<()>;
    /// Runs once after a run with at least one published post.
    fn finish(&mut self, published: usize) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostDraft {
    pub title: String,
    pub summary: String,
    pub meta_description: String,
    pub body_html: String,
    pub cover_url: String,
    pub slug: String,
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max - 3).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}

/// `"tb-vs-bos-20250708"`; also the cover file stem.
pub fn post_slug(record: &GameRecord, today: NaiveDate) -> String {
    format!(
        "{}-vs-{}-{}",
        record.away_team,
        record.home_team,
        today.format("%Y%m%d")
    )
    .to_lowercase()
}

impl PostDraft {
    pub fn from_blog(
        record: &GameRecord,
        markdown: &str,
        cover_url: &str,
        today: NaiveDate,
    ) -> Self {
        let lines: Vec<&str> = markdown.trim().lines().collect();

        let title = lines
            .first()
            .map(|line| line.replace('#', "").trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| format!("{} Preview", record.matchup));

        // Skip the title and the "last updated" line.
        let summary = lines
            .iter()
            .skip(2)
            .find(|line| {
                !line.trim().is_empty() && !line.starts_with('#') && !line.starts_with('*')
            })
            .map(|line| truncate_chars(line.trim(), SUMMARY_MAX))
            .unwrap_or_default();

        let meta_description = truncate_chars(
            &format!(
                "Expert {} vs {} betting preview with pitcher analysis, lineup matchups, and prop recommendations. {} MLB betting insights.",
                record.away_team,
                record.home_team,
                today.format("%B %d")
            ),
            META_DESCRIPTION_MAX,
        );

        Self {
            title,
            summary,
            meta_description,
            body_html: markdown_to_rich_text(markdown),
            cover_url: cover_url.to_string(),
            slug: post_slug(record, today),
        }
    }
}

pub fn md5_hex(bytes: &[u8]) -> String {
    format!("{:x}", Md5::digest(bytes))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AssetUploadTicket {
    upload_url: Option<String>,
    #[serde(default)]
    upload_details: Map<String, Value>,
    url: Option<String>,
    public_url: Option<String>,
}

/// Webflow CMS, v2 API.
pub struct WebflowPublisher {
    config: WebflowConfig,
}

impl WebflowPublisher {
    pub fn new(config: WebflowConfig) -> Self {
        Self { config }
    }

    fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<(u16, String)> {
        let url = format!("{WEBFLOW_API}/{path}");
        let mut req = long_client()?
            .request(method, &url)
            .bearer_auth(&self.config.api_token)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().with_context(|| format!("webflow request {path}"))?;
        let status = resp.status().as_u16();
        let text = resp.text().context("read webflow response")?;
        Ok((status, text))
    }
}

fn upload_details_form(details: &Map<String, Value>) -> Form {
    details.iter().fold(Form::new(), |form, (key, value)| {
        let text = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        form.text(key.clone(), text)
    })
}

impl Publisher for WebflowPublisher {
    fn prepare(&mut self) -> Result<()> {
        let path = format!("sites/{}", self.config.site_id);
        let (status, body) = self.send_json(reqwest::Method::GET, &path, None)?;
        if status != 200 {
            bail!("webflow site access failed: http {status}: {}", body_snippet(&body));
        }
        let site: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        let name = site
            .get("displayName")
            .and_then(Value::as_str)
            .unwrap_or("Unknown");
        info!(site = name, "webflow site access verified");
        Ok(())
    }

    fn upload_cover(&mut self, png: &[u8], filename: &str) -> Result<Option<String>> {
        let file_hash = md5_hex(png);
        let metadata = serde_json::json!({
            "fileName": filename,
            "fileHash": file_hash,
            "originUrl": Value::Null,
        });
        let path = format!("sites/{}/assets", self.config.site_id);
        let (status, body) = self.send_json(reqwest::Method::POST, &path, Some(&metadata))?;
        if status != 201 {
            bail!("webflow asset metadata failed: http {status}: {}", body_snippet(&body));
        }

        let ticket: AssetUploadTicket =
            serde_json::from_str(&body).context("invalid webflow asset response")?;
        let upload_url = ticket
            .upload_url
            .as_deref()
            .ok_or_else(|| anyhow!("webflow returned no upload url"))?;

        let part = Part::bytes(png.to_vec())
            .file_name(filename.to_string())
            .mime_str("image/png")?;
        let form = upload_details_form(&ticket.upload_details).part("file", part);
        let resp = long_client()?
            .post(upload_url)
            .multipart(form)
            .send()
            .context("asset upload failed")?;
        let upload_status = resp.status().as_u16();
        if !matches!(upload_status, 200 | 201 | 204) {
            let text = resp.text().unwrap_or_default();
            bail!("asset upload http {upload_status}: {}", body_snippet(&text));
        }

        let url = ticket
            .url
            .or(ticket.public_url)
            .unwrap_or_else(|| format!("https://uploads-ssl.webflow.com/{file_hash}/{filename}"));
        info!(%url, "uploaded cover");
        Ok(Some(url))
    }

    fn create_post(&mut self, draft: &PostDraft) -> Result<()> {
        let item = serde_json::json!({
            "isArchived": false,
            "isDraft": false,
            "fieldData": {
                "name": draft.title,
                "post-body": draft.body_html,
                "post-summary": draft.summary,
                "main-image": draft.cover_url,
                "url": self.config.post_url,
                "meta-title": draft.title,
                "meta-description": draft.meta_description,
            }
        });
        let path = format!("collections/{}/items", self.config.collection_id);
        let (status, body) = self.send_json(reqwest::Method::POST, &path, Some(&item))?;
        if !(200..300).contains(&status) {
            bail!("webflow create item failed: http {status}: {}", body_snippet(&body));
        }
        info!(title = %draft.title, "created webflow post");
        Ok(())
    }

    fn finish(&mut self, published: usize) -> Result<()> {
        let body = serde_json::json!({ "domains": self.config.publish_domains });
        let path = format!("sites/{}/publish", self.config.site_id);
        let (status, text) = self.send_json(reqwest::Method::POST, &path, Some(&body))?;
        if !(200..300).contains(&status) {
            bail!("webflow publish failed: http {status}: {}", body_snippet(&text));
        }
        info!(published, "webflow site published");
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct PageEntry {
    slug: String,
    title: String,
    summary: String,
}

/// Static HTML pages on disk: one page per post plus an index.
#[derive(Debug)]
pub struct LocalPagesPublisher {
    out_dir: PathBuf,
    pages: Vec<PageEntry>,
}

impl LocalPagesPublisher {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            pages: Vec::new(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    fn images_dir(&self) -> PathBuf {
        self.out_dir.join("images")
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("rename into {}", path.display()))?;
    Ok(())
}

fn render_post_page(draft: &PostDraft) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<meta name="description" content="{description}">
</head>
<body>
<p><a href="index.html">All previews</a></p>
<img src="{cover}" alt="{title}" width="1200" height="630">
{body}
</body>
</html>
"#,
        title = escape_html(&draft.title),
        description = escape_html(&draft.meta_description),
        cover = escape_html(&draft.cover_url),
        body = draft.body_html,
    )
}

fn render_index(pages: &[PageEntry]) -> String {
    let items: String = pages
        .iter()
        .map(|page| {
            format!(
                "<li><a href=\"{}.html\">{}</a><p>{}</p></li>\n",
                page.slug,
                escape_html(&page.title),
                escape_html(&page.summary)
            )
        })
        .collect();
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>MLB Betting Previews</title>\n</head>\n<body>\n<h1>MLB Betting Previews</h1>\n<ul>\n{items}</ul>\n</body>\n</html>\n"
    )
}

impl Publisher for LocalPagesPublisher {
    fn prepare(&mut self) -> Result<()> {
        fs::create_dir_all(self.images_dir())
            .with_context(|| format!("create {}", self.images_dir().display()))?;
        info!(dir = %self.out_dir.display(), "writing pages locally");
        Ok(())
    }

    fn upload_cover(&mut self, png: &[u8], filename: &str) -> Result<Option<String>> {
        write_atomic(&self.images_dir().join(filename), png)?;
        Ok(Some(format!("images/{filename}")))
    }

    fn create_post(&mut self, draft: &PostDraft) -> Result<()> {
        let path = self.out_dir.join(format!("{}.html", draft.slug));
        write_atomic(&path, render_post_page(draft).as_bytes())?;
        self.pages.push(PageEntry {
            slug: draft.slug.clone(),
            title: draft.title.clone(),
            summary: draft.summary.clone(),
        });
        info!(path = %path.display(), "wrote post page");
        Ok(())
    }

    fn finish(&mut self, published: usize) -> Result<()> {
        write_atomic(&self.out_dir.join("index.html"), render_index(&self.pages).as_bytes())?;
        info!(published, "wrote index page");
        Ok(())
    }
}
