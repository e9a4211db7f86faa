use crate::cli::{
    actions::{dashboard, server, Action},
    telemetry,
};
use anyhow::Result;

/// Single dispatch point for all CLI actions. Flushes pending spans on the way out.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    let result = match action {
        Action::Server(args) => server::execute(args).await,
        Action::Dashboard(args) => dashboard::execute(args).await,
    };

    telemetry::shutdown_tracer();

    result
}
