use anyhow::Result;

use mlb_preview::config::{AppConfig, load_dotenv};
use mlb_preview::feeds::{FeedResult, GameFeeds, HttpFeeds};
use mlb_preview::logging::init_logging;

fn report<T>(name: &str, url: &str, result: &FeedResult<T>) {
    match result.error() {
        None => println!("{name:<8} ok      items={:<4} {url}", result.items().len()),
        Some(err) => println!("{name:<8} FAILED  {err} ({url})"),
    }
}

fn main() -> Result<()> {
    load_dotenv();
    init_logging();

    let config = AppConfig::from_env()?;
    let feeds = HttpFeeds::new(config.feeds.clone());

    let reports = feeds.mlb_reports();
    report("mlb", &config.feeds.mlb, &reports);
    let umpires = feeds.umpires();
    report("umpire", &config.feeds.umpire, &umpires);
    let betting = feeds.betting_games();
    report("betting", &config.feeds.betting, &betting);

    let without_matchup = reports
        .items()
        .iter()
        .filter(|r| r.matchup.is_none())
        .count();
    if without_matchup > 0 {
        println!("mlb reports without a matchup: {without_matchup}");
    }
    Ok(())
}
