use crate::fixtures::{featured_templates, TemplateList};
use axum::Json;

#[utoipa::path(
    get,
    path= "/api/builder/templates",
    responses (
        (status = 200, description = "Featured builder templates", body = TemplateList),
    ),
    tag = "builder",
)]
pub async fn templates() -> Json<TemplateList> {
    Json(featured_templates())
}
