use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::{RequireAdmin, RequireSuperAdmin};
use crate::features::moderation::dtos::RejectRequestDto;
use crate::features::moderation::models::ModerationAction;
use crate::features::quick_links::dtos::{
    CreateQuickLinkDto, QuickLinkResponseDto, UpdateQuickLinkDto,
};
use crate::features::quick_links::services::QuickLinkService;
use crate::shared::types::{ApiResponse, Meta};

type ListResponse = Json<ApiResponse<Vec<QuickLinkResponseDto>>>;

fn list_response(links: Vec<QuickLinkResponseDto>) -> ListResponse {
    let total = links.len() as i64;
    Json(ApiResponse::success(Some(links), None, Some(Meta { total })))
}

/// List approved quick links
#[utoipa::path(
    get,
    path = "/api/quicklinks",
    tag = "quicklinks",
    responses(
        (status = 200, description = "Approved quick links", body = ApiResponse<Vec<QuickLinkResponseDto>>)
    )
)]
pub async fn list_quick_links(
    State(service): State<Arc<QuickLinkService>>,
) -> Result<ListResponse> {
    Ok(list_response(service.list_approved().await?))
}

/// List approved and pinned quick links
#[utoipa::path(
    get,
    path = "/api/quicklinks/pinned",
    tag = "quicklinks",
    responses(
        (status = 200, description = "Pinned quick links", body = ApiResponse<Vec<QuickLinkResponseDto>>)
    )
)]
pub async fn list_pinned_quick_links(
    State(service): State<Arc<QuickLinkService>>,
) -> Result<ListResponse> {
    Ok(list_response(service.list_pinned().await?))
}

/// List quick links that are not approved
#[utoipa::path(
    get,
    path = "/api/quicklinks/unapproved",
    tag = "quicklinks",
    responses(
        (status = 200, description = "Pending and rejected quick links", body = ApiResponse<Vec<QuickLinkResponseDto>>),
        (status = 403, description = "Superadmin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_unapproved_quick_links(
    State(service): State<Arc<QuickLinkService>>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
) -> Result<ListResponse> {
    Ok(list_response(service.list_unapproved().await?))
}

/// List quick links created by the caller
#[utoipa::path(
    get,
    path = "/api/quicklinks/my-links",
    tag = "quicklinks",
    responses(
        (status = 200, description = "Quick links of the current user", body = ApiResponse<Vec<QuickLinkResponseDto>>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_my_quick_links(
    State(service): State<Arc<QuickLinkService>>,
    RequireAdmin(user): RequireAdmin,
) -> Result<ListResponse> {
    Ok(list_response(service.list_by_author(user.id).await?))
}

/// Create a quick link; it starts as pending
#[utoipa::path(
    post,
    path = "/api/quicklinks",
    tag = "quicklinks",
    request_body = CreateQuickLinkDto,
    responses(
        (status = 201, description = "Quick link created", body = ApiResponse<QuickLinkResponseDto>),
        (status = 400, description = "Invalid title or URL"),
        (status = 403, description = "Not allowed for this office")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_quick_link(
    State(service): State<Arc<QuickLinkService>>,
    RequireAdmin(user): RequireAdmin,
    AppJson(dto): AppJson<CreateQuickLinkDto>,
) -> Result<(StatusCode, Json<ApiResponse<QuickLinkResponseDto>>)> {
    dto.validate()?;

    let link = service.create(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(link), None, None)),
    ))
}

/// Edit a quick link
///
/// The link returns to pending and needs another review.
#[utoipa::path(
    put,
    path = "/api/quicklinks/{id}",
    tag = "quicklinks",
    params(("id" = Uuid, Path, description = "Quick link ID")),
    request_body = UpdateQuickLinkDto,
    responses(
        (status = 200, description = "Quick link updated", body = ApiResponse<QuickLinkResponseDto>),
        (status = 403, description = "Not allowed for this office"),
        (status = 404, description = "Quick link not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_quick_link(
    State(service): State<Arc<QuickLinkService>>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateQuickLinkDto>,
) -> Result<Json<ApiResponse<QuickLinkResponseDto>>> {
    dto.validate()?;

    let link = service.update(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(Some(link), None, None)))
}

/// Delete a quick link
#[utoipa::path(
    delete,
    path = "/api/quicklinks/{id}",
    tag = "quicklinks",
    params(("id" = Uuid, Path, description = "Quick link ID")),
    responses(
        (status = 200, description = "Quick link deleted"),
        (status = 403, description = "Not allowed for this office"),
        (status = 404, description = "Quick link not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_quick_link(
    State(service): State<Arc<QuickLinkService>>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Quick link deleted successfully".to_string()),
        None,
    )))
}

/// Pin a quick link
#[utoipa::path(
    put,
    path = "/api/quicklinks/{id}/pin",
    tag = "quicklinks",
    params(("id" = Uuid, Path, description = "Quick link ID")),
    responses(
        (status = 200, description = "Quick link pinned", body = ApiResponse<QuickLinkResponseDto>),
        (status = 403, description = "Not allowed for this office"),
        (status = 404, description = "Quick link not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn pin_quick_link(
    State(service): State<Arc<QuickLinkService>>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<QuickLinkResponseDto>>> {
    let link = service.set_pinned(&user, id, true).await?;
    Ok(Json(ApiResponse::success(Some(link), None, None)))
}

/// Unpin a quick link
#[utoipa::path(
    put,
    path = "/api/quicklinks/{id}/unpin",
    tag = "quicklinks",
    params(("id" = Uuid, Path, description = "Quick link ID")),
    responses(
        (status = 200, description = "Quick link unpinned", body = ApiResponse<QuickLinkResponseDto>),
        (status = 403, description = "Not allowed for this office"),
        (status = 404, description = "Quick link not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn unpin_quick_link(
    State(service): State<Arc<QuickLinkService>>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<QuickLinkResponseDto>>> {
    let link = service.set_pinned(&user, id, false).await?;
    Ok(Json(ApiResponse::success(Some(link), None, None)))
}

/// Approve a pending quick link
#[utoipa::path(
    put,
    path = "/api/quicklinks/{id}/approve",
    tag = "quicklinks",
    params(("id" = Uuid, Path, description = "Quick link ID")),
    responses(
        (status = 200, description = "Quick link approved", body = ApiResponse<QuickLinkResponseDto>),
        (status = 403, description = "Superadmin access required"),
        (status = 404, description = "Quick link not found"),
        (status = 409, description = "Quick link already reviewed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve_quick_link(
    State(service): State<Arc<QuickLinkService>>,
    RequireSuperAdmin(user): RequireSuperAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<QuickLinkResponseDto>>> {
    let link = service.review(&user, id, &ModerationAction::Approve).await?;
    Ok(Json(ApiResponse::success(Some(link), None, None)))
}

/// Reject a pending quick link with a comment
#[utoipa::path(
    put,
    path = "/api/quicklinks/{id}/reject",
    tag = "quicklinks",
    params(("id" = Uuid, Path, description = "Quick link ID")),
    request_body = RejectRequestDto,
    responses(
        (status = 200, description = "Quick link rejected", body = ApiResponse<QuickLinkResponseDto>),
        (status = 400, description = "Rejection comment required"),
        (status = 403, description = "Superadmin access required"),
        (status = 404, description = "Quick link not found"),
        (status = 409, description = "Quick link already reviewed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reject_quick_link(
    State(service): State<Arc<QuickLinkService>>,
    RequireSuperAdmin(user): RequireSuperAdmin,
    Path(id): Path<Uuid>,
    body: axum::body::Bytes,
) -> Result<Json<ApiResponse<QuickLinkResponseDto>>> {
    let action = RejectRequestDto::parse_action(&body)?;
    let link = service.review(&user, id, &action).await?;
    Ok(Json(ApiResponse::success(Some(link), None, None)))
}
