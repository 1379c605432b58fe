use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use mlb_preview::feeds::{parse_betting_games_json, parse_mlb_reports_json, parse_umpires_json};
use mlb_preview::interlink::auto_link;
use mlb_preview::markdown::markdown_to_rich_text;
use mlb_preview::matchup_stats::calculate_lineup_advantage;
use mlb_preview::models::{BaselineStats, BatterMatchup};
use mlb_preview::pipeline::build_game_records;

fn synthetic_lineup(pitcher: &str, rows: usize) -> Vec<BatterMatchup> {
    (0..rows)
        .map(|idx| {
            let step = idx as f64;
            BatterMatchup {
                batter: Some(format!("Batter{idx}, Test")),
                vs_pitcher: Some(pitcher.to_string()),
                reliability: Some(if idx % 4 == 0 { "LOW" } else { "HIGH" }.to_string()),
                baseline_stats: Some(BaselineStats {
                    season_avg: Some(0.220 + step * 0.004),
                    season_k_pct: Some(18.0 + step * 0.5),
                }),
                weighted_est_ba: Some(0.300 - step * 0.003),
                weighted_k_rate: Some(26.0 - step * 0.4),
            }
        })
        .collect()
}

fn bench_lineup_advantage(c: &mut Criterion) {
    let rows = synthetic_lineup("Cole, Gerrit", 27);
    c.bench_function("lineup_advantage", |b| {
        b.iter(|| {
            let stats = calculate_lineup_advantage(black_box(&rows), black_box("Cole, Gerrit"));
            black_box(stats.top_performers.len());
        })
    });
}

fn bench_feed_parse(c: &mut Criterion) {
    c.bench_function("mlb_feed_parse", |b| {
        b.iter(|| {
            let reports = parse_mlb_reports_json(black_box(MLB_FEED_JSON)).unwrap();
            black_box(reports.len());
        })
    });
}

fn bench_build_records(c: &mut Criterion) {
    let reports = parse_mlb_reports_json(MLB_FEED_JSON).unwrap();
    let umpires = parse_umpires_json(UMPIRES_JSON).unwrap();
    let games = parse_betting_games_json(BETTING_JSON).unwrap();
    c.bench_function("build_game_records", |b| {
        b.iter(|| {
            let summary =
                build_game_records(black_box(&reports), black_box(&umpires), black_box(&games));
            black_box(summary.records.len());
        })
    });
}

fn bench_post_processing(c: &mut Criterion) {
    let post = "## Lineup Matchups\nThe projected xBA vs arsenal beats the season line. \
                Public money sits on the favorite while the whiff rate climbs.\n\n\
                - K-rate up 4.1%\n- pitch mix leans on sliders\n"
        .repeat(12);
    c.bench_function("auto_link_and_render", |b| {
        b.iter(|| {
            let linked = auto_link(black_box(&post), 5);
            black_box(markdown_to_rich_text(&linked).len());
        })
    });
}

criterion_group!(
    perf,
    bench_lineup_advantage,
    bench_feed_parse,
    bench_build_records,
    bench_post_processing
);
criterion_main!(perf);

static MLB_FEED_JSON: &str = include_str!("../tests/fixtures/mlb_feed.json");
static UMPIRES_JSON: &str = include_str!("../tests/fixtures/umpires.json");
static BETTING_JSON: &str = include_str!("../tests/fixtures/betting.json");
