use crate::fixtures::MetricsSnapshot;
use axum::Json;

#[utoipa::path(
    get,
    path= "/api/metrics",
    responses (
        (status = 200, description = "Dashboard metrics (fixture values)", body = MetricsSnapshot),
    ),
    tag = "dashboard",
)]
pub async fn metrics() -> Json<MetricsSnapshot> {
    Json(MetricsSnapshot::sample())
}
