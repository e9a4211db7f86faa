use crate::{
    api::{self, Dependencies},
    sites::StubProvisioner,
    suggestions::SuggestionService,
    upstream::{ChatCompletions, OpenAiClient, OpenAiConfig},
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub frontend_url: String,
    pub database_url: String,
    pub redis_url: String,
    pub openai_api_key: Option<SecretString>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_timeout: Duration,
}

/// Execute the server action.
/// # Errors
/// Returns an error if a dependency cannot be configured or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let deps = dependencies(&args)?;

    api::new(args.port, &args.frontend_url, deps).await
}

fn dependencies(args: &Args) -> Result<Dependencies> {
    let suggestions = match &args.openai_api_key {
        Some(api_key) => {
            let client = OpenAiClient::new(OpenAiConfig {
                api_key: api_key.clone(),
                base_url: args.openai_base_url.clone(),
                model: args.openai_model.clone(),
                timeout: args.openai_timeout,
            })?;
            let upstream: Arc<dyn ChatCompletions> = Arc::new(client);
            SuggestionService::new(upstream)
        }
        None => {
            warn!("OPENAI_API_KEY is not set, /api/ai/suggest will answer 503");
            SuggestionService::unconfigured()
        }
    };

    // Nothing connects until the readiness probe asks for it.
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy(&args.database_url)
        .context("Invalid database URL")?;

    let cache = redis::Client::open(args.redis_url.as_str()).context("Invalid Redis URL")?;

    Ok(Dependencies {
        suggestions,
        provisioner: Arc::new(StubProvisioner),
        pool,
        cache,
    })
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("frontend_url", args.frontend_url.clone()),
        ("database_url", redact_url(&args.database_url)),
        ("redis_url", redact_url(&args.redis_url)),
        ("openai_api_key_set", args.openai_api_key.is_some().to_string()),
        ("openai_base_url", args.openai_base_url.clone()),
        ("openai_model", args.openai_model.clone()),
        (
            "openai_timeout",
            format!("{}s", args.openai_timeout.as_secs()),
        ),
    ];

    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!("{}\n\nStartup configuration:", banner());
    for (key, value) in &entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid-url".to_string(),
    }
}

fn banner() -> String {
    let hash = crate::GIT_COMMIT_HASH.trim();
    let short_hash = hash.get(..7).unwrap_or(hash);
    format!(
        "TechyPark Engine API - {} - {short_hash}",
        env!("CARGO_PKG_VERSION")
    )
}
