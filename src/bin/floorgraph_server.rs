//! HTTP path service: loads the map once at start-up, then serves role-aware
//! path queries and reload triggers.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::{net::TcpListener, task, time};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use floorgraph::{
    NavService, SqliteSource,
    bootstrap::connect_with_retry,
    config::{ServiceArgs, ServiceConfig},
    http,
};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServiceConfig::from(ServiceArgs::parse());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let connect_config = config.clone();
    let source = task::spawn_blocking(move || connect_with_retry(&connect_config))
        .await
        .context("connect task")?
        .context("connect to map database")?;

    let service = Arc::new(NavService::new(source));
    let initial = Arc::clone(&service);
    if let Err(err) = task::spawn_blocking(move || initial.reload())
        .await
        .context("initial load task")?
    {
        warn!(error = %err, "initial graph load failed; serving an empty graph until refresh");
    }

    if let Some(interval) = config.poll_interval {
        info!(interval_secs = interval.as_secs(), "map version poller enabled");
        tokio::spawn(poll_map_version(Arc::clone(&service), interval));
    }

    let app = http::router(Arc::clone(&service));
    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("bind {}", config.listen))?;
    info!("path service listening on {}", config.listen);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("path service stopped");
    Ok(())
}

async fn poll_map_version(service: Arc<NavService<SqliteSource>>, interval: time::Duration) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(time::MissedTickBehavior::Delay);
    // first tick fires immediately and the initial load already ran
    ticker.tick().await;
    loop {
        ticker.tick().await;
        let svc = Arc::clone(&service);
        match task::spawn_blocking(move || svc.reload_if_stale()).await {
            Ok(Ok(_)) => {}
            Ok(Err(err)) => warn!(error = %err, "map version poll failed"),
            Err(err) => warn!(error = %err, "map version poll task aborted"),
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
