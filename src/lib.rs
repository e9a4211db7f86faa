//! # TechyPark Engine
//!
//! HTTP backend for the TechyPark hosting dashboard plus a terminal client
//! that renders the same dashboard from the metrics endpoint.
//!
//! ## Endpoints
//!
//! - `GET /health` liveness, never touches dependencies.
//! - `GET /ready` probes `PostgreSQL` and Redis.
//! - `GET /api/metrics` fixture dashboard metrics.
//! - `POST /api/ai/suggest` forwards code to an OpenAI-compatible chat completion API.
//! - `POST /api/wordpress/sites` accepts a site definition and returns a provisioning record.
//! - `GET /api/builder/templates` featured visual builder templates.
//!
//! The AI endpoint degrades to `503` with an advisory message when no API key
//! is configured. Metrics and site records are placeholders; nothing is persisted.

pub mod api;
pub mod cli;
pub mod dashboard;
pub mod fixtures;
pub mod sites;
pub mod suggestions;
pub mod upstream;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(GIT_COMMIT_HASH.len() >= 7);
    }

    #[test]
    fn test_app_user_agent_format() {
        assert_eq!(
            APP_USER_AGENT,
            format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        );
    }
}
