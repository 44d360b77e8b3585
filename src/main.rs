use anyhow::{Context, Result};
use casefeed::{fetch::build_client, run_every, Config, Refresher};
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,casefeed=debug"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let cfg = Config::load().context("loading configuration")?;
    info!(
        url = %cfg.source_url,
        interval_secs = cfg.refresh_interval_secs,
        insecure = cfg.insecure_skip_verify,
        "configured"
    );

    // ─── 3) transport; no point scheduling anything without it ───────
    let client = build_client(&cfg.transport()).context("building HTTP client")?;
    let refresher = Arc::new(Refresher::new(client, cfg.source_url.clone()));
    info!(url = %refresher.source_url(), "refresher ready");

    // ─── 4) one-shot mode ────────────────────────────────────────────
    let once = env::var("CASEFEED_ONCE")
        .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
        .unwrap_or(false);
    if once {
        return match refresher.try_refresh().await {
            Ok(snapshot) => {
                println!("{}", serde_json::to_string_pretty(snapshot.as_ref())?);
                Ok(())
            }
            Err(e) => {
                error!(stage = %e.stage(), error = %e, "refresh failed");
                Err(e.into())
            }
        };
    }

    // ─── 5) recurring refresh until Ctrl-C ───────────────────────────
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    run_every(Arc::clone(&refresher), cfg.refresh_interval(), shutdown).await;

    let last = refresher.snapshot();
    info!(rows = last.len(), refreshed_at = ?last.refreshed_at, "exit");
    Ok(())
}
