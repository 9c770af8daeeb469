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
use crate::features::portals::dtos::{CreatePortalDto, PortalResponseDto, UpdatePortalDto};
use crate::features::portals::services::PortalService;
use crate::shared::types::{ApiResponse, Meta};

type ListResponse = Json<ApiResponse<Vec<PortalResponseDto>>>;

fn list_response(portals: Vec<PortalResponseDto>) -> ListResponse {
    let total = portals.len() as i64;
    Json(ApiResponse::success(Some(portals), None, Some(Meta { total })))
}

/// List approved portals, newest first
#[utoipa::path(
    get,
    path = "/api/portals",
    tag = "portals",
    responses(
        (status = 200, description = "Approved portals", body = ApiResponse<Vec<PortalResponseDto>>)
    )
)]
pub async fn list_portals(State(service): State<Arc<PortalService>>) -> Result<ListResponse> {
    Ok(list_response(service.list_approved().await?))
}

/// List pinned portals
#[utoipa::path(
    get,
    path = "/api/portals/pinned",
    tag = "portals",
    responses(
        (status = 200, description = "Approved and pinned portals", body = ApiResponse<Vec<PortalResponseDto>>)
    )
)]
pub async fn list_pinned_portals(
    State(service): State<Arc<PortalService>>,
) -> Result<ListResponse> {
    Ok(list_response(service.list_pinned().await?))
}

#[utoipa::path(
    get,
    path = "/api/portals/unapproved",
    tag = "portals",
    responses(
        (status = 200, description = "Pending and rejected portals", body = ApiResponse<Vec<PortalResponseDto>>),
        (status = 403, description = "Superadmin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_unapproved_portals(
    State(service): State<Arc<PortalService>>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
) -> Result<ListResponse> {
    Ok(list_response(service.list_unapproved().await?))
}

/// Add a portal shortcut
#[utoipa::path(
    post,
    path = "/api/portals",
    tag = "portals",
    request_body = CreatePortalDto,
    responses(
        (status = 201, description = "Portal created", body = ApiResponse<PortalResponseDto>),
        (status = 400, description = "Invalid title or URL"),
        (status = 403, description = "Not allowed for this office")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_portal(
    State(service): State<Arc<PortalService>>,
    RequireAdmin(user): RequireAdmin,
    AppJson(dto): AppJson<CreatePortalDto>,
) -> Result<(StatusCode, Json<ApiResponse<PortalResponseDto>>)> {
    dto.validate()?;

    let portal = service.create(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(portal), None, None)),
    ))
}

/// Edit a portal; it returns to pending
#[utoipa::path(
    put,
    path = "/api/portals/{id}",
    tag = "portals",
    params(("id" = Uuid, Path, description = "Portal ID")),
    request_body = UpdatePortalDto,
    responses(
        (status = 200, description = "Portal updated", body = ApiResponse<PortalResponseDto>),
        (status = 403, description = "Not allowed for this office"),
        (status = 404, description = "No portal found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_portal(
    State(service): State<Arc<PortalService>>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdatePortalDto>,
) -> Result<Json<ApiResponse<PortalResponseDto>>> {
    dto.validate()?;

    let portal = service.update(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(Some(portal), None, None)))
}

#[utoipa::path(
    delete,
    path = "/api/portals/{id}",
    tag = "portals",
    params(("id" = Uuid, Path, description = "Portal ID")),
    responses(
        (status = 200, description = "Portal deleted"),
        (status = 403, description = "Not allowed for this office"),
        (status = 404, description = "No portal found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_portal(
    State(service): State<Arc<PortalService>>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Portal deleted successfully".to_string()),
        None,
    )))
}

/// Toggle the pinned flag of a portal
#[utoipa::path(
    put,
    path = "/api/portals/{id}/pin",
    tag = "portals",
    params(("id" = Uuid, Path, description = "Portal ID")),
    responses(
        (status = 200, description = "Pin toggled", body = ApiResponse<PortalResponseDto>),
        (status = 403, description = "Not allowed for this office"),
        (status = 404, description = "No portal found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn toggle_portal_pin(
    State(service): State<Arc<PortalService>>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PortalResponseDto>>> {
    let portal = service.toggle_pin(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(portal), None, None)))
}

#[utoipa::path(
    put,
    path = "/api/portals/{id}/approve",
    tag = "portals",
    params(("id" = Uuid, Path, description = "Portal ID")),
    responses(
        (status = 200, description = "Portal approved", body = ApiResponse<PortalResponseDto>),
        (status = 403, description = "Superadmin access required"),
        (status = 404, description = "No portal found"),
        (status = 409, description = "Portal already reviewed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve_portal(
    State(service): State<Arc<PortalService>>,
    RequireSuperAdmin(user): RequireSuperAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PortalResponseDto>>> {
    let portal = service.review(&user, id, &ModerationAction::Approve).await?;
    Ok(Json(ApiResponse::success(Some(portal), None, None)))
}

#[utoipa::path(
    put,
    path = "/api/portals/{id}/reject",
    tag = "portals",
    params(("id" = Uuid, Path, description = "Portal ID")),
    request_body = RejectRequestDto,
    responses(
        (status = 200, description = "Portal rejected", body = ApiResponse<PortalResponseDto>),
        (status = 400, description = "Rejection comment required"),
        (status = 403, description = "Superadmin access required"),
        (status = 404, description = "No portal found"),
        (status = 409, description = "Portal already reviewed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reject_portal(
    State(service): State<Arc<PortalService>>,
    RequireSuperAdmin(user): RequireSuperAdmin,
    Path(id): Path<Uuid>,
    body: axum::body::Bytes,
) -> Result<Json<ApiResponse<PortalResponseDto>>> {
    let action = RejectRequestDto::parse_action(&body)?;
    let portal = service.review(&user, id, &action).await?;
    Ok(Json(ApiResponse::success(Some(portal), None, None)))
}
