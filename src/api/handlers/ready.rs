//! Readiness probe for orchestrators.
//!
//! Neither the database nor the cache backs any endpoint yet, but both are
//! part of the deployment contract, so `/ready` reports whether they answer.

use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use sqlx::{Connection, PgPool};
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info_span, warn, Instrument};
use utoipa::ToSchema;

const PROBE_TIMEOUT_SECONDS: u64 = 2;

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Readiness {
    database: String,
    cache: String,
}

fn probe_label(healthy: bool) -> String {
    if healthy {
        "ok".to_string()
    } else {
        "error".to_string()
    }
}

#[utoipa::path(
    get,
    path= "/ready",
    responses (
        (status = 200, description = "Database and cache are reachable", body = Readiness),
        (status = 503, description = "Database or cache is unreachable", body = Readiness)
    ),
    tag = "health",
)]
pub async fn ready(
    Extension(pool): Extension<PgPool>,
    Extension(cache): Extension<redis::Client>,
) -> impl IntoResponse {
    let (db_healthy, cache_healthy) = tokio::join!(probe_database(&pool), probe_cache(&cache));

    let readiness = Readiness {
        database: probe_label(db_healthy),
        cache: probe_label(cache_healthy),
    };

    if db_healthy && cache_healthy {
        debug!("Dependencies are ready");
        (StatusCode::OK, Json(readiness))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(readiness))
    }
}

async fn probe_database(pool: &PgPool) -> bool {
    let span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
    let probe = async {
        let mut conn = pool.acquire().await?;
        conn.ping().await?;
        Ok::<_, sqlx::Error>(())
    };

    match timeout(
        Duration::from_secs(PROBE_TIMEOUT_SECONDS),
        probe.instrument(span),
    )
    .await
    {
        Ok(Ok(())) => true,
        Ok(Err(error)) => {
            error!("Failed to ping database: {}", error);
            false
        }
        Err(_) => {
            warn!("Database readiness check timed out");
            false
        }
    }
}

async fn probe_cache(client: &redis::Client) -> bool {
    let span = info_span!("cache.ping", db.system = "redis", db.operation = "PING");
    let probe = async {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok::<_, redis::RedisError>(pong)
    };

    match timeout(
        Duration::from_secs(PROBE_TIMEOUT_SECONDS),
        probe.instrument(span),
    )
    .await
    {
        Ok(Ok(pong)) => pong.eq_ignore_ascii_case("pong"),
        Ok(Err(error)) => {
            error!("Failed to ping cache: {}", error);
            false
        }
        Err(_) => {
            warn!("Cache readiness check timed out");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use axum::body::to_bytes;
    use sqlx::postgres::PgPoolOptions;

    #[tokio::test]
    async fn unreachable_dependencies_are_not_ready() -> Result<()> {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(1))
            .connect_lazy("postgres://techypark@127.0.0.1:1/techypark")?;
        let cache = redis::Client::open("redis://127.0.0.1:1")?;

        let response = ready(Extension(pool), Extension(cache))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let readiness: Readiness = serde_json::from_slice(&body)?;
        assert_eq!(
            readiness,
            Readiness {
                database: "error".to_string(),
                cache: "error".to_string(),
            }
        );
        Ok(())
    }

    #[test]
    fn probe_label_maps_state() {
        assert_eq!(probe_label(true), "ok");
        assert_eq!(probe_label(false), "error");
    }
}
