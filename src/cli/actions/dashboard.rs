use crate::dashboard::{self, DashboardConfig};
use anyhow::Result;
use std::time::Duration;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub api_url: Url,
    pub interval: Duration,
    pub once: bool,
}

/// Execute the dashboard action.
/// # Errors
/// Returns an error if the dashboard cannot start or write to stdout.
pub async fn execute(args: Args) -> Result<()> {
    dashboard::run(DashboardConfig {
        api_url: args.api_url,
        interval: args.interval,
        once: args.once,
    })
    .await
}
