use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::cover_image::compose_cover;
use crate::feeds::GameFeeds;
use crate::interlink::auto_link;
use crate::logos::{LogoSource, team_logo_url};
use crate::models::GameRecord;
use crate::pipeline::collect_game_records;
use crate::prompt::{BlogHeaders, SYSTEM_PROMPT, build_prompt};
use crate::publish::{PostDraft, Publisher, post_slug};
use crate::text_gen::TextGenerator;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub max_links: usize,
    pub post_delay: Duration,
    pub today: NaiveDate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub games: usize,
    pub published: usize,
    pub failed: usize,
}

/// The collaborators one daily run talks to.
pub struct RunContext<'a, F, L, G, P> {
    pub feeds: &'a F,
    pub logos: &'a L,
    pub generator: &'a G,
    pub publisher: &'a mut P,
}

/// Cover bytes: the composite when both logos load and compose, else the
/// raw away logo, else nothing.
fn cover_png(
    logos: &impl LogoSource,
    record: &GameRecord,
    away_url: &str,
    home_url: &str,
) -> Option<Vec<u8>> {
    let away = match logos.logo_png(away_url) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(error = %format!("{err:#}"), "away logo unavailable, no cover");
            return None;
        }
    };
    let composed = logos
        .logo_png(home_url)
        .and_then(|home| compose_cover(&away, &home, &record.away_team, &record.home_team));
    match composed {
        Ok(png) => Some(png),
        Err(err) => {
            warn!(error = %format!("{err:#}"), "cover composite failed, using away logo");
            Some(away)
        }
    }
}

fn cover_url(
    logos: &impl LogoSource,
    publisher: &mut impl Publisher,
    record: &GameRecord,
    today: NaiveDate,
) -> String {
    let away_url = team_logo_url(&record.away_team);
    let home_url = team_logo_url(&record.home_team);

    let uploaded = cover_png(logos, record, &away_url, &home_url).and_then(|png| {
        let filename = format!("{}.png", post_slug(record, today));
        match publisher.upload_cover(&png, &filename) {
            Ok(url) => url,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "cover upload failed");
                None
            }
        }
    });

    uploaded.unwrap_or_else(|| {
        info!(url = %home_url, "using home logo as cover");
        home_url
    })
}

fn publish_game<F, L, G, P>(
    ctx: &mut RunContext<'_, F, L, G, P>,
    record: &GameRecord,
    options: &RunOptions,
) -> Result<()>
where
    L: LogoSource,
    G: TextGenerator,
    P: Publisher,
{
    let headers = BlogHeaders::pick(&mut rand::thread_rng());
    let prompt = build_prompt(record, &headers, options.today)?;
    let markdown = ctx
        .generator
        .generate(SYSTEM_PROMPT, &prompt)
        .context("text generation failed")?;
    let linked = auto_link(&markdown, options.max_links);

    let cover = cover_url(ctx.logos, &mut *ctx.publisher, record, options.today);
    let draft = PostDraft::from_blog(record, &linked, &cover, options.today);
    ctx.publisher.create_post(&draft).context("create post failed")?;
    Ok(())
}

/// One full run: collect today's games, write and publish a post for each.
///
/// Only a destination that fails `prepare` stops the run. Every per-game
/// failure is logged and counted, and a failed `finish` leaves the created
/// posts in the summary.
pub fn run_daily<F, L, G, P>(
    mut ctx: RunContext<'_, F, L, G, P>,
    options: &RunOptions,
) -> Result<RunSummary>
where
    F: GameFeeds,
    L: LogoSource,
    G: TextGenerator,
    P: Publisher,
{
    ctx.publisher.prepare().context("publisher not ready")?;

    let records = collect_game_records(ctx.feeds).records;
    let mut summary = RunSummary {
        games: records.len(),
        ..Default::default()
    };
    if records.is_empty() {
        warn!("no games to publish");
        return Ok(summary);
    }

    for (idx, record) in records.iter().enumerate() {
        info!(game = idx + 1, total = records.len(), topic = %record.topic, "writing post");
        match publish_game(&mut ctx, record, options) {
            Ok(()) => summary.published += 1,
            Err(err) => {
                warn!(topic = %record.topic, error = %format!("{err:#}"), "game failed");
                summary.failed += 1;
            }
        }
        if idx + 1 < records.len() && !options.post_delay.is_zero() {
            thread::sleep(options.post_delay);
        }
    }

    if summary.published > 0 {
        if let Err(err) = ctx.publisher.finish(summary.published) {
            warn!(
                published = summary.published,
                error = %format!("{err:#}"),
                "posts created but site publish failed"
            );
        }
    }
    info!(
        games = summary.games,
        published = summary.published,
        failed = summary.failed,
        "daily run complete"
    );
    Ok(summary)
}
