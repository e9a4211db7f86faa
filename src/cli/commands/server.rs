use crate::upstream::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use clap::{Arg, Command};

pub const NAME: &str = "server";

#[must_use]
pub fn subcommand() -> Command {
    Command::new(NAME)
        .about("Run the HTTP API")
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("frontend-url")
                .long("frontend-url")
                .help("Frontend URL, its origin is the only one allowed by CORS")
                .default_value("http://localhost:3000")
                .env("FRONTEND_URL"),
        )
        .arg(
            Arg::new("database-url")
                .long("database-url")
                .help("PostgreSQL connection string, used by the readiness probe")
                .default_value("postgresql://localhost/techypark")
                .env("DATABASE_URL"),
        )
        .arg(
            Arg::new("redis-url")
                .long("redis-url")
                .help("Redis connection string, used by the readiness probe")
                .default_value("redis://localhost:6379")
                .env("REDIS_URL"),
        )
        .arg(
            Arg::new("openai-api-key")
                .long("openai-api-key")
                .help("OpenAI API key, AI suggestions are disabled when unset or empty")
                .env("OPENAI_API_KEY")
                .hide_env_values(true),
        )
        .arg(
            Arg::new("openai-base-url")
                .long("openai-base-url")
                .help("Base URL of an OpenAI compatible API")
                .default_value(DEFAULT_BASE_URL)
                .env("OPENAI_BASE_URL"),
        )
        .arg(
            Arg::new("openai-model")
                .long("openai-model")
                .help("Chat completion model")
                .default_value(DEFAULT_MODEL)
                .env("OPENAI_MODEL"),
        )
        .arg(
            Arg::new("openai-timeout")
                .long("openai-timeout")
                .help("Upstream request timeout in seconds")
                .default_value("60")
                .env("OPENAI_TIMEOUT")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}
