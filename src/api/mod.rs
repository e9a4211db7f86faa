use crate::{sites::Provisioner, suggestions::SuggestionService};
use anyhow::{anyhow, Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue, Method, Request},
    Extension, Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use ulid::Ulid;
use url::Url;
use utoipa_axum::router::OpenApiRouter;

pub mod error;
pub(crate) mod handlers;
mod openapi;

pub use openapi::openapi;

/// Everything the handlers need, built once at startup.
#[derive(Clone)]
pub struct Dependencies {
    pub suggestions: SuggestionService,
    pub provisioner: Arc<dyn Provisioner>,
    pub pool: PgPool,
    pub cache: redis::Client,
}

/// Build the API router with all documented routes registered.
#[must_use]
pub fn router() -> OpenApiRouter {
    openapi::api_router()
}

/// Wire the documented routes with middleware and injected dependencies.
#[must_use]
pub fn app(deps: Dependencies, frontend_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST])
        .allow_origin(AllowOrigin::exact(frontend_origin))
        .allow_credentials(true);

    let (router, _openapi) = router().split_for_parts();
    router.layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(cors)
            .layer(CompressionLayer::new())
            .layer(Extension(deps.suggestions))
            .layer(Extension(deps.provisioner))
            .layer(Extension(deps.cache))
            .layer(Extension(deps.pool)),
    )
}

/// Start the server
/// # Errors
/// Return error if the frontend origin is invalid or the listener fails
pub async fn new(port: u16, frontend_url: &str, deps: Dependencies) -> Result<()> {
    let app = app(deps, frontend_origin(frontend_url)?);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Gracefully shutdown");
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}

/// Reduce a frontend URL to the `scheme://host[:port]` form CORS compares against.
///
/// # Errors
/// Returns an error if the URL does not parse or has no host.
pub fn frontend_origin(frontend_url: &str) -> Result<HeaderValue> {
    let parsed =
        Url::parse(frontend_url).with_context(|| format!("Invalid frontend URL: {frontend_url}"))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| anyhow!("Frontend URL must include a valid host: {frontend_url}"))?;
    let port = parsed
        .port()
        .map_or_else(String::new, |port| format!(":{port}"));
    let origin = format!("{}://{}{}", parsed.scheme(), host, port);
    HeaderValue::from_str(&origin).context("Failed to build frontend origin header")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::StubProvisioner;
    use anyhow::Result;
    use axum::{
        body::to_bytes,
        http::{
            header::{ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN},
            StatusCode,
        },
    };
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;
    use tower::ServiceExt;

    fn test_app() -> Result<Router> {
        let deps = Dependencies {
            suggestions: SuggestionService::unconfigured(),
            provisioner: Arc::new(StubProvisioner),
            pool: PgPoolOptions::new()
                .acquire_timeout(Duration::from_secs(1))
                .connect_lazy("postgres://techypark@127.0.0.1:1/techypark")?,
            cache: redis::Client::open("redis://127.0.0.1:1")?,
        };
        Ok(app(deps, frontend_origin("http://localhost:3000")?))
    }

    async fn send(request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = test_app()?.oneshot(request).await?;
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await?;
        Ok((status, serde_json::from_slice(&body)?))
    }

    #[test]
    fn frontend_origin_strips_path_and_keeps_port() -> Result<()> {
        assert_eq!(
            frontend_origin("http://localhost:3000/dashboard?tab=1")?,
            "http://localhost:3000"
        );
        assert_eq!(
            frontend_origin("https://app.techypark.dev/")?,
            "https://app.techypark.dev"
        );
        Ok(())
    }

    #[test]
    fn frontend_origin_rejects_garbage() {
        assert!(frontend_origin("not a url").is_err());
        assert!(frontend_origin("mailto:someone@example.com").is_err());
    }

    #[tokio::test]
    async fn health_ignores_dependency_state() -> Result<()> {
        let (status, body) = send(Request::get("/health").body(Body::empty())?).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        Ok(())
    }

    #[tokio::test]
    async fn metrics_and_templates_are_served() -> Result<()> {
        let (status, metrics) = send(Request::get("/api/metrics").body(Body::empty())?).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(metrics["totalSites"], 1247);

        let (status, templates) =
            send(Request::get("/api/builder/templates").body(Body::empty())?).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(templates["total"], 500);
        assert_eq!(templates["templates"].as_array().map(Vec::len), Some(5));
        Ok(())
    }

    #[tokio::test]
    async fn suggest_without_key_is_unavailable() -> Result<()> {
        let request = Request::post("/api/ai/suggest")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({ "code": "puts 1", "language": "ruby" }).to_string(),
            ))?;
        let (status, body) = send(request).await?;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body["suggestions"],
            crate::suggestions::NOT_CONFIGURED_ADVISORY
        );
        assert!(body.get("tokens_used").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn site_creation_through_full_stack() -> Result<()> {
        let request = Request::post("/api/wordpress/sites")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({
                    "domain": "example.com",
                    "title": "Test",
                    "adminEmail": "a@b.com",
                    "plan": "pro"
                })
                .to_string(),
            ))?;
        let (status, body) = send(request).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["site"]["status"], "provisioning");
        Ok(())
    }

    #[tokio::test]
    async fn request_id_is_propagated() -> Result<()> {
        let response = test_app()?
            .oneshot(Request::get("/health").body(Body::empty())?)
            .await?;
        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        assert!(request_id.is_some_and(|id| Ulid::from_string(&id).is_ok()));
        Ok(())
    }

    #[tokio::test]
    async fn cors_allows_only_the_frontend_origin() -> Result<()> {
        let allowed = test_app()?
            .oneshot(
                Request::get("/api/metrics")
                    .header(ORIGIN, "http://localhost:3000")
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(
            allowed.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("http://localhost:3000"))
        );

        let denied = test_app()?
            .oneshot(
                Request::get("/api/metrics")
                    .header(ORIGIN, "https://evil.example")
                    .body(Body::empty())?,
            )
            .await?;
        assert_ne!(
            denied.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("https://evil.example"))
        );
        Ok(())
    }
}
