use std::path::PathBuf;
use std::thread;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use mlb_preview::config::{AppConfig, load_dotenv};
use mlb_preview::daily::{RunContext, RunOptions, RunSummary, run_daily};
use mlb_preview::feeds::HttpFeeds;
use mlb_preview::logging::init_logging;
use mlb_preview::logos::HttpLogos;
use mlb_preview::pipeline::collect_game_records;
use mlb_preview::publish::{LocalPagesPublisher, Publisher, WebflowPublisher};
use mlb_preview::schedule::{next_run_delay, parse_run_time};
use mlb_preview::text_gen::OpenAiGenerator;

#[derive(Parser)]
#[command(name = "mlb_preview")]
#[command(about = "Daily MLB betting previews from matchup, umpire and odds feeds")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PublisherKind {
    Webflow,
    Local,
}

#[derive(Subcommand)]
enum Commands {
    /// Write and publish today's previews once
    Run {
        #[arg(long, value_enum, default_value_t = PublisherKind::Webflow)]
        publisher: PublisherKind,
        /// Output directory for the local publisher (defaults to PREVIEW_OUT_DIR)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Run once a day at a local wall-clock time, forever
    Schedule {
        /// Local time as HH:MM
        #[arg(long)]
        at: String,
        #[arg(long, value_enum, default_value_t = PublisherKind::Webflow)]
        publisher: PublisherKind,
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Print today's game records as JSON without generating posts
    Records,
}

fn run_with<P: Publisher>(config: &AppConfig, publisher: &mut P) -> Result<RunSummary> {
    let generator = OpenAiGenerator::new(config.require_openai()?);
    let feeds = HttpFeeds::new(config.feeds.clone());
    let options = RunOptions {
        max_links: config.max_links,
        post_delay: config.post_delay,
        today: Local::now().date_naive(),
    };
    run_daily(
        RunContext {
            feeds: &feeds,
            logos: &HttpLogos,
            generator: &generator,
            publisher,
        },
        &options,
    )
}

fn run_once(
    config: &AppConfig,
    kind: PublisherKind,
    out_dir: Option<&PathBuf>,
) -> Result<RunSummary> {
    match kind {
        PublisherKind::Webflow => {
            let mut publisher = WebflowPublisher::new(config.require_webflow()?);
            run_with(config, &mut publisher)
        }
        PublisherKind::Local => {
            let dir = out_dir.cloned().unwrap_or_else(|| config.out_dir.clone());
            let mut publisher = LocalPagesPublisher::new(dir);
            run_with(config, &mut publisher)
        }
    }
}

fn print_summary(summary: &RunSummary) {
    println!("Games: {}", summary.games);
    println!("Published: {}", summary.published);
    println!("Failed: {}", summary.failed);
}

fn main() -> Result<()> {
    load_dotenv();
    init_logging();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command {
        Commands::Run { publisher, out_dir } => {
            let summary = run_once(&config, publisher, out_dir.as_ref())?;
            print_summary(&summary);
        }
        Commands::Schedule {
            at,
            publisher,
            out_dir,
        } => {
            let at = parse_run_time(&at)?;
            // Credentials are checked before the first wait.
            config.require_openai()?;
            if matches!(publisher, PublisherKind::Webflow) {
                config.require_webflow()?;
            }
            loop {
                let delay = next_run_delay(Local::now().naive_local(), at);
                info!(at = %at.format("%H:%M"), wait_secs = delay.as_secs(), "next run scheduled");
                thread::sleep(delay);
                match run_once(&config, publisher, out_dir.as_ref()) {
                    Ok(summary) => info!(
                        games = summary.games,
                        published = summary.published,
                        failed = summary.failed,
                        "scheduled run finished"
                    ),
                    Err(err) => error!(error = %format!("{err:#}"), "scheduled run failed"),
                }
            }
        }
        Commands::Records => {
            let summary = collect_game_records(&HttpFeeds::new(config.feeds.clone()));
            let json = serde_json::to_string_pretty(&summary.records)
                .context("serialize game records")?;
            println!("{json}");
            info!(skipped = summary.skipped, "records printed");
        }
    }
    Ok(())
}
