use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::policy::{authorize, Action, Resource};
use crate::features::faqs::dtos::FaqResponseDto;
use crate::features::files::dtos::FileResponseDto;
use crate::features::moderation::models::ModerationStatus;
use crate::features::offices::models::Office;
use crate::features::offices::routes::OfficeState;
use crate::shared::types::{ApiResponse, Meta};

/// The office workspace shows content in every status, so it needs the
/// right to read unapproved content of that office
fn authorize_workspace(user: &AuthenticatedUser, office: &str) -> Result<Office> {
    let office = Office::parse_param(office)?;
    authorize(
        Some(user),
        Action::Read,
        &Resource::new(office, ModerationStatus::Pending),
    )?;
    Ok(office)
}

/// List all offices
#[utoipa::path(
    get,
    path = "/api/offices",
    tag = "offices",
    responses(
        (status = 200, description = "Office names", body = ApiResponse<Vec<Office>>)
    )
)]
pub async fn list_offices() -> Json<ApiResponse<Vec<Office>>> {
    let offices = Office::ALL.to_vec();
    let total = offices.len() as i64;
    Json(ApiResponse::success(Some(offices), None, Some(Meta { total })))
}

/// Files of an office in every status, newest first
#[utoipa::path(
    get,
    path = "/api/offices/{office}/files",
    tag = "offices",
    params(("office" = String, Path, description = "Office name")),
    responses(
        (status = 200, description = "Files of the office", body = ApiResponse<Vec<FileResponseDto>>),
        (status = 400, description = "Unknown office"),
        (status = 403, description = "Not an admin of this office")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_office_workspace_files(
    State(state): State<OfficeState>,
    RequireAdmin(user): RequireAdmin,
    Path(office): Path<String>,
) -> Result<Json<ApiResponse<Vec<FileResponseDto>>>> {
    let office = authorize_workspace(&user, &office)?;

    let files = state.files.list_by_office(office, false).await?;
    let total = files.len() as i64;
    Ok(Json(ApiResponse::success(Some(files), None, Some(Meta { total }))))
}

/// FAQs of an office, newest first
#[utoipa::path(
    get,
    path = "/api/offices/{office}/faqs",
    tag = "offices",
    params(("office" = String, Path, description = "Office name")),
    responses(
        (status = 200, description = "FAQs of the office", body = ApiResponse<Vec<FaqResponseDto>>),
        (status = 400, description = "Unknown office"),
        (status = 403, description = "Not an admin of this office")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_office_workspace_faqs(
    State(state): State<OfficeState>,
    RequireAdmin(user): RequireAdmin,
    Path(office): Path<String>,
) -> Result<Json<ApiResponse<Vec<FaqResponseDto>>>> {
    let office = authorize_workspace(&user, &office)?;

    let faqs = state.faqs.list_by_office(office).await?;
    let total = faqs.len() as i64;
    Ok(Json(ApiResponse::success(Some(faqs), None, Some(Meta { total }))))
}
