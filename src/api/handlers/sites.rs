use crate::{
    api::error::{ApiError, ErrorBody},
    sites::{Provisioner, SiteCreated, SiteCreationRequest},
};
use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

#[utoipa::path(
    post,
    path= "/api/wordpress/sites",
    request_body = SiteCreationRequest,
    responses (
        (status = 200, description = "Site accepted for provisioning", body = SiteCreated),
        (status = 400, description = "Invalid site definition", body = ErrorBody),
    ),
    tag = "wordpress",
)]
#[instrument(skip_all)]
pub async fn create_site(
    Extension(provisioner): Extension<Arc<dyn Provisioner>>,
    payload: Result<Json<SiteCreationRequest>, JsonRejection>,
) -> Result<Json<SiteCreated>, ApiError> {
    let Json(request) = payload?;

    let violations = request.violations();
    if !violations.is_empty() {
        return Err(ApiError::Validation(violations));
    }

    let site = provisioner.provision(request);
    info!(site_id = %site.id, domain = %site.request.domain, "site accepted");

    Ok(Json(SiteCreated {
        success: true,
        site,
    }))
}
