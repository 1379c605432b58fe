pub mod config;
pub mod cover_image;
pub mod daily;
pub mod error;
pub mod feeds;
pub mod game_record;
pub mod http_client;
pub mod interlink;
pub mod logging;
pub mod logos;
pub mod markdown;
pub mod matching;
pub mod matchup_stats;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod publish;
pub mod schedule;
pub mod text_gen;
