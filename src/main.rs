use anyhow::{Context, Result};
use painel::{Config, DashboardClient, Session};
use tokio::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) config ───────────────────────────────────────────────────
    let (config, origin) = Config::load().context("loading configuration")?;

    // ─── 2) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();
    info!(
        base_url = %config.base_url,
        config_file = ?origin.file,
        base_url_from_env = origin.base_url_from_env,
        "startup"
    );

    // ─── 3) load every dataset concurrently ──────────────────────────
    let client = DashboardClient::new(&config)?;
    let session = Session::new(client);
    let start = Instant::now();
    let outcomes = session.load_all().await;
    info!(elapsed = ?start.elapsed(), "loads settled");

    // ─── 4) print the snapshot ───────────────────────────────────────
    let snapshot = session.snapshot();
    let failed = snapshot.failed();
    if !failed.is_empty() {
        warn!(?failed, ?outcomes, "some panels could not be loaded");
    }
    let json = serde_json::to_string_pretty(&snapshot).context("serializing snapshot")?;
    println!("{json}");

    info!("all done");
    Ok(())
}
