use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVE: &str = "mlb_preview=info";

/// Console logging, filtered by `RUST_LOG` when set. Safe to call twice.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
