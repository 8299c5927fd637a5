use anyhow::Context;
use tracing_subscriber::EnvFilter;

use short_url::config::{self, Config};
use short_url::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = config::load_from_env().context("Invalid configuration")?;
    init_tracing(&config);

    config.print_summary();

    server::run(config).await
}

/// Installs the global subscriber, honoring `RUST_LOG` and `LOG_FORMAT`.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if config.log_format == "json" {
        builder.json().with_current_span(true).init();
    } else {
        builder.with_target(false).init();
    }
}
