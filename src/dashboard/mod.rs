//! Terminal dashboard that polls `/api/metrics` and redraws a summary frame.

use crate::fixtures::MetricsSnapshot;
use anyhow::{Context, Result};
use reqwest::Client;
use std::{
    io::{IsTerminal, Write},
    time::Duration,
};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use url::Url;

mod render;

pub use render::{fmt_thousands, render};

const MAX_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

// ANSI: clear screen, cursor home
const CLEAR: &str = "\x1b[2J\x1b[H";

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub api_url: Url,
    pub interval: Duration,
    pub once: bool,
}

/// Request timeout for one poll, always shorter than the refresh interval.
#[must_use]
pub fn fetch_timeout(interval: Duration) -> Duration {
    (interval * 4 / 5).min(MAX_FETCH_TIMEOUT)
}

/// Resolve `api/metrics` below the base URL, keeping any path prefix.
///
/// # Errors
/// Returns an error if the base URL cannot carry a path.
pub fn metrics_url(api_url: &Url) -> Result<Url> {
    let mut base = api_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("api/metrics")
        .with_context(|| format!("Invalid API URL: {api_url}"))
}

/// Fetch one metrics snapshot from the API.
///
/// # Errors
/// Returns an error on transport failure, non-2xx status, or an undecodable body.
pub async fn fetch_metrics(client: &Client, api_url: &Url) -> Result<MetricsSnapshot> {
    let url = metrics_url(api_url)?;

    let metrics = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<MetricsSnapshot>()
        .await?;

    Ok(metrics)
}

/// Poll the API and redraw until interrupted, or draw a single frame with `once`.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built or stdout cannot be written.
pub async fn run(config: DashboardConfig) -> Result<()> {
    let client = Client::builder()
        .user_agent(crate::APP_USER_AGENT)
        .timeout(fetch_timeout(config.interval))
        .build()?;

    let mut latest: Option<MetricsSnapshot> = None;

    if config.once {
        latest = poll(&client, &config.api_url, latest).await;
        return draw(latest.as_ref(), false);
    }

    info!(
        "Polling {} every {}s",
        config.api_url,
        config.interval.as_secs()
    );

    let clear = std::io::stdout().is_terminal();
    let mut ticker = interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    // Ctrl-C wins both while waiting for a tick and while a fetch is in flight.
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }
        tokio::select! {
            _ = &mut shutdown => break,
            polled = poll(&client, &config.api_url, latest.clone()) => {
                latest = polled;
                draw(latest.as_ref(), clear)?;
            }
        }
    }

    debug!("dashboard interrupted");

    Ok(())
}

// Keep the previous snapshot when a poll fails.
async fn poll(
    client: &Client,
    api_url: &Url,
    previous: Option<MetricsSnapshot>,
) -> Option<MetricsSnapshot> {
    match fetch_metrics(client, api_url).await {
        Ok(metrics) => Some(metrics),
        Err(e) => {
            warn!("Failed to fetch metrics: {:#}", e);
            previous
        }
    }
}

fn draw(metrics: Option<&MetricsSnapshot>, clear: bool) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if clear {
        stdout.write_all(CLEAR.as_bytes())?;
    }
    stdout.write_all(render(metrics).as_bytes())?;
    stdout.flush()?;
    Ok(())
}
