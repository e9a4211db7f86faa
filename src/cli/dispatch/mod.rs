use crate::cli::{
    actions::{dashboard, server, Action},
    commands,
};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::time::Duration;
use url::Url;

/// # Errors
/// Returns an error if a subcommand is missing or an argument is invalid.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some((commands::server::NAME, sub)) => server_args(sub).map(Action::Server),
        Some((commands::dashboard::NAME, sub)) => dashboard_args(sub).map(Action::Dashboard),
        Some((other, _)) => Err(anyhow!("unknown subcommand: {other}")),
        None => Err(anyhow!("missing subcommand")),
    }
}

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

fn server_args(matches: &clap::ArgMatches) -> Result<server::Args> {
    // An empty key leaves the AI endpoint unconfigured.
    let openai_api_key = matches
        .get_one::<String>("openai-api-key")
        .map(|key| key.trim())
        .filter(|key| !key.is_empty())
        .map(|key| SecretString::from(key.to_string()));

    Ok(server::Args {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        frontend_url: required(matches, "frontend-url")?,
        database_url: required(matches, "database-url")?,
        redis_url: required(matches, "redis-url")?,
        openai_api_key,
        openai_base_url: required(matches, "openai-base-url")?,
        openai_model: required(matches, "openai-model")?,
        openai_timeout: Duration::from_secs(
            matches
                .get_one::<u64>("openai-timeout")
                .copied()
                .unwrap_or(60),
        ),
    })
}

fn dashboard_args(matches: &clap::ArgMatches) -> Result<dashboard::Args> {
    let api_url = required(matches, "api-url")?;
    let api_url = Url::parse(&api_url).with_context(|| format!("invalid API URL: {api_url}"))?;

    Ok(dashboard::Args {
        api_url,
        interval: Duration::from_secs(matches.get_one::<u64>("interval").copied().unwrap_or(5)),
        once: matches.get_flag("once"),
    })
}
