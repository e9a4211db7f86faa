use crate::GIT_COMMIT_HASH;
use axum::{
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Json},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

pub const SERVICE_NAME: &str = "TechyPark Engine API";

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    status: String,
    version: String,
    timestamp: String,
    service: String,
}

#[utoipa::path(
    get,
    path= "/health",
    responses (
        (status = 200, description = "Service is up", body = Health),
    ),
    tag = "health",
)]
/// Liveness only: dependencies are checked by `/ready`.
pub async fn health() -> impl IntoResponse {
    let health = Health {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        service: SERVICE_NAME.to_string(),
    };

    let short_hash = if GIT_COMMIT_HASH.len() > 7 {
        &GIT_COMMIT_HASH[0..7]
    } else {
        ""
    };

    let headers = format!(
        "{}:{}:{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_hash
    )
    .parse::<HeaderValue>()
    .map(|x_app_header_value| {
        let mut headers = HeaderMap::new();
        headers.insert("X-App", x_app_header_value);
        headers
    })
    .unwrap_or_else(|err| {
        debug!("Failed to parse X-App header: {}", err);
        HeaderMap::new()
    });

    (headers, Json(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use axum::{body::to_bytes, http::StatusCode};

    #[tokio::test]
    async fn health_is_always_healthy() -> Result<()> {
        let response = health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("X-App"));

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let value: serde_json::Value = serde_json::from_slice(&body)?;
        assert_eq!(value["status"], "healthy");
        assert_eq!(value["service"], SERVICE_NAME);
        assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
        assert!(value["timestamp"].as_str().is_some());
        Ok(())
    }
}
