use std::cell::RefCell;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use mlb_preview::daily::{RunContext, RunOptions, RunSummary, run_daily};
use mlb_preview::feeds::{
    FeedResult, GameFeeds, parse_betting_games_json, parse_mlb_reports_json, parse_umpires_json,
};
use mlb_preview::logos::{LogoSource, logo_url_for_code};
use mlb_preview::models::{BettingGame, GameReport, UmpireRecord};
use mlb_preview::publish::{PostDraft, Publisher};
use mlb_preview::text_gen::TextGenerator;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

struct FixtureFeeds {
    empty: bool,
}

impl GameFeeds for FixtureFeeds {
    fn mlb_reports(&self) -> FeedResult<GameReport> {
        if self.empty {
            return FeedResult::Loaded(Vec::new());
        }
        FeedResult::Loaded(parse_mlb_reports_json(&read_fixture("mlb_feed.json")).unwrap())
    }

    fn umpires(&self) -> FeedResult<UmpireRecord> {
        FeedResult::Loaded(parse_umpires_json(&read_fixture("umpires.json")).unwrap())
    }

    fn betting_games(&self) -> FeedResult<BettingGame> {
        FeedResult::Loaded(parse_betting_games_json(&read_fixture("betting.json")).unwrap())
    }
}

fn png(color: [u8; 4]) -> Vec<u8> {
    let mut out = Vec::new();
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(32, 32, Rgba(color)))
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}

/// Serves a PNG for every logo URL except the ones listed as missing.
struct StubLogos {
    missing: Vec<String>,
    requested: RefCell<Vec<String>>,
}

impl StubLogos {
    fn all() -> Self {
        Self {
            missing: Vec::new(),
            requested: RefCell::new(Vec::new()),
        }
    }
}

impl LogoSource for StubLogos {
    fn logo_png(&self, url: &str) -> Result<Vec<u8>> {
        self.requested.borrow_mut().push(url.to_string());
        if self.missing.iter().any(|m| m == url) {
            bail!("404 for {url}");
        }
        Ok(png([200, 30, 30, 255]))
    }
}

/// Echoes a post built from the prompt's title; fails for prompts naming `fail_on`.
struct StubGenerator {
    fail_on: Option<&'static str>,
}

impl TextGenerator for StubGenerator {
    fn generate(&self, system: &str, prompt: &str) -> Result<String> {
        assert!(!system.is_empty());
        if let Some(needle) = self.fail_on {
            if prompt.contains(needle) {
                return Err(anyhow!("rate limited"));
            }
        }
        let title = prompt
            .lines()
            .find_map(|line| line.strip_prefix("Blog Title: "))
            .unwrap_or("Untitled");
        Ok(format!(
            "# {title}\n*Last updated*\n\nPublic money and the whiff rate both matter here.\n"
        ))
    }
}

#[derive(Default)]
struct RecordingPublisher {
    fail_prepare: bool,
    fail_uploads: bool,
    fail_finish: bool,
    prepared: bool,
    covers: Vec<String>,
    posts: Vec<PostDraft>,
    finished: Option<usize>,
}

impl Publisher for RecordingPublisher {
    fn prepare(&mut self) -> Result<()> {
        if self.fail_prepare {
            bail!("site unreachable");
        }
        self.prepared = true;
        Ok(())
    }

    fn upload_cover(&mut self, png: &[u8], filename: &str) -> Result<Option<String>> {
        if self.fail_uploads {
            bail!("upload rejected");
        }
        assert!(!png.is_empty());
        self.covers.push(filename.to_string());
        Ok(Some(format!("https://cdn.test/{filename}")))
    }

    fn create_post(&mut self, draft: &PostDraft) -> Result<()> {
        self.posts.push(draft.clone());
        Ok(())
    }

    fn finish(&mut self, published: usize) -> Result<()> {
        self.finished = Some(published);
        if self.fail_finish {
            bail!("publish rejected");
        }
        Ok(())
    }
}

fn options() -> RunOptions {
    RunOptions {
        max_links: 5,
        post_delay: Duration::ZERO,
        today: NaiveDate::from_ymd_opt(2025, 7, 8).unwrap(),
    }
}

fn run(
    feeds: &FixtureFeeds,
    logos: &StubLogos,
    generator: &StubGenerator,
    publisher: &mut RecordingPublisher,
) -> Result<RunSummary> {
    run_daily(
        RunContext {
            feeds,
            logos,
            generator,
            publisher,
        },
        &options(),
    )
}

#[test]
fn publishes_every_game_in_time_order() {
    let mut publisher = RecordingPublisher::default();
    let summary = run(
        &FixtureFeeds { empty: false },
        &StubLogos::all(),
        &StubGenerator { fail_on: None },
        &mut publisher,
    )
    .unwrap();

    assert_eq!(
        summary,
        RunSummary {
            games: 3,
            published: 3,
            failed: 0
        }
    );
    assert!(publisher.prepared);
    assert_eq!(publisher.finished, Some(3));

    let slugs: Vec<_> = publisher.posts.iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(
        slugs,
        vec!["lad-vs-sd-20250708", "tb-vs-bos-20250708", "sea-vs-ath-20250708"]
    );
    assert_eq!(publisher.covers[0], "lad-vs-sd-20250708.png");
    assert_eq!(publisher.posts[0].cover_url, "https://cdn.test/lad-vs-sd-20250708.png");
    assert_eq!(
        publisher.posts[1].title,
        "Rays vs Sox: Betting Preview & Props (Jul 08)"
    );
    assert!(publisher.posts[1].body_html.contains("stats-about"));
}

#[test]
fn one_failed_generation_does_not_stop_the_run() {
    let mut publisher = RecordingPublisher::default();
    let summary = run(
        &FixtureFeeds { empty: false },
        &StubLogos::all(),
        &StubGenerator {
            fail_on: Some("Rays vs Sox"),
        },
        &mut publisher,
    )
    .unwrap();

    assert_eq!(summary.games, 3);
    assert_eq!(summary.published, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(publisher.finished, Some(2));
    assert!(publisher.posts.iter().all(|p| !p.slug.starts_with("tb-vs-bos")));
}

#[test]
fn cover_falls_back_to_home_logo_url() {
    let mut publisher = RecordingPublisher {
        fail_uploads: true,
        ..Default::default()
    };
    run(
        &FixtureFeeds { empty: false },
        &StubLogos::all(),
        &StubGenerator { fail_on: None },
        &mut publisher,
    )
    .unwrap();
    assert_eq!(publisher.posts[0].cover_url, logo_url_for_code("sd"));

    let away_missing = StubLogos {
        missing: vec![logo_url_for_code("lad")],
        requested: RefCell::new(Vec::new()),
    };
    let mut publisher = RecordingPublisher::default();
    run(
        &FixtureFeeds { empty: false },
        &away_missing,
        &StubGenerator { fail_on: None },
        &mut publisher,
    )
    .unwrap();
    assert_eq!(publisher.posts[0].cover_url, logo_url_for_code("sd"));
    assert!(!publisher.covers.contains(&"lad-vs-sd-20250708.png".to_string()));
}

#[test]
fn failed_composite_uploads_the_away_logo() {
    let home_missing = StubLogos {
        missing: vec![logo_url_for_code("sd")],
        requested: RefCell::new(Vec::new()),
    };
    let mut publisher = RecordingPublisher::default();
    run(
        &FixtureFeeds { empty: false },
        &home_missing,
        &StubGenerator { fail_on: None },
        &mut publisher,
    )
    .unwrap();
    assert_eq!(publisher.covers[0], "lad-vs-sd-20250708.png");
    assert!(
        home_missing
            .requested
            .borrow()
            .contains(&logo_url_for_code("lad"))
    );
}

#[test]
fn unreachable_destination_aborts_before_any_work() {
    let logos = StubLogos::all();
    let mut publisher = RecordingPublisher {
        fail_prepare: true,
        ..Default::default()
    };
    let result = run(
        &FixtureFeeds { empty: false },
        &logos,
        &StubGenerator { fail_on: None },
        &mut publisher,
    );
    assert!(result.is_err());
    assert!(publisher.posts.is_empty());
    assert!(logos.requested.borrow().is_empty());
}

#[test]
fn failed_site_publish_still_reports_posts() {
    let mut publisher = RecordingPublisher {
        fail_finish: true,
        ..Default::default()
    };
    let summary = run(
        &FixtureFeeds { empty: false },
        &StubLogos::all(),
        &StubGenerator { fail_on: None },
        &mut publisher,
    )
    .unwrap();
    assert_eq!(
        summary,
        RunSummary {
            games: 3,
            published: 3,
            failed: 0
        }
    );
    assert_eq!(publisher.posts.len(), 3);
    assert_eq!(publisher.finished, Some(3));
}

#[test]
fn empty_slate_skips_finish() {
    let mut publisher = RecordingPublisher::default();
    let summary = run(
        &FixtureFeeds { empty: true },
        &StubLogos::all(),
        &StubGenerator { fail_on: None },
        &mut publisher,
    )
    .unwrap();
    assert_eq!(summary, RunSummary::default());
    assert_eq!(publisher.finished, None);
}
