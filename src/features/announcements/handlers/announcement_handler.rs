use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::announcements::dtos::{
    check_image, AnnouncementResponseDto, CreateAnnouncementDto, UpdateAnnouncementDto,
};
use crate::features::announcements::services::{
    AnnouncementChanges, AnnouncementService, NewAnnouncement,
};
use crate::features::auth::guards::{RequireAdmin, RequireSuperAdmin};
use crate::features::moderation::dtos::RejectRequestDto;
use crate::features::moderation::models::ModerationAction;
use crate::features::offices::models::Office;
use crate::shared::constants::MAX_ANNOUNCEMENT_IMAGE_SIZE;
use crate::shared::multipart::MultipartForm;
use crate::shared::types::{ApiResponse, Meta};

type ListResponse = Json<ApiResponse<Vec<AnnouncementResponseDto>>>;

fn list_response(announcements: Vec<AnnouncementResponseDto>) -> ListResponse {
    let total = announcements.len() as i64;
    Json(ApiResponse::success(
        Some(announcements),
        None,
        Some(Meta { total }),
    ))
}

fn new_announcement_from_form(mut form: MultipartForm) -> Result<NewAnnouncement> {
    let title = form.text("title").ok_or_else(|| {
        AppError::Validation("Please add a title for the announcement".to_string())
    })?;
    let office = form.text("office").ok_or_else(|| {
        AppError::Validation("Please select an office for the announcement".to_string())
    })?;

    let image = form.take_file("image");
    if let Some(image) = &image {
        check_image(image)?;
    }

    Ok(NewAnnouncement {
        title,
        office: Office::parse_param(&office)?,
        link: form.text("link"),
        image,
    })
}

fn changes_from_form(mut form: MultipartForm) -> Result<AnnouncementChanges> {
    let image = form.take_file("image");
    if let Some(image) = &image {
        check_image(image)?;
    }

    Ok(AnnouncementChanges {
        title: form.text("title"),
        office: form.text("office").as_deref().map(Office::parse_param).transpose()?,
        link: form.text("link"),
        image,
    })
}

/// List approved announcements, newest first
#[utoipa::path(
    get,
    path = "/api/announcements",
    tag = "announcements",
    responses(
        (status = 200, description = "Approved announcements", body = ApiResponse<Vec<AnnouncementResponseDto>>)
    )
)]
pub async fn list_announcements(
    State(service): State<Arc<AnnouncementService>>,
) -> Result<ListResponse> {
    Ok(list_response(service.list_approved().await?))
}

/// Five newest approved announcements
#[utoipa::path(
    get,
    path = "/api/announcements/latest",
    tag = "announcements",
    responses(
        (status = 200, description = "Latest announcements", body = ApiResponse<Vec<AnnouncementResponseDto>>)
    )
)]
pub async fn latest_announcements(
    State(service): State<Arc<AnnouncementService>>,
) -> Result<ListResponse> {
    Ok(list_response(service.latest().await?))
}

/// Announcements awaiting review
#[utoipa::path(
    get,
    path = "/api/announcements/unapproved",
    tag = "announcements",
    responses(
        (status = 200, description = "Pending announcements", body = ApiResponse<Vec<AnnouncementResponseDto>>),
        (status = 403, description = "Superadmin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_unapproved_announcements(
    State(service): State<Arc<AnnouncementService>>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
) -> Result<ListResponse> {
    Ok(list_response(service.list_pending().await?))
}

#[utoipa::path(
    get,
    path = "/api/announcements/my-announcements",
    tag = "announcements",
    responses(
        (status = 200, description = "Announcements of the current user", body = ApiResponse<Vec<AnnouncementResponseDto>>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_my_announcements(
    State(service): State<Arc<AnnouncementService>>,
    RequireAdmin(user): RequireAdmin,
) -> Result<ListResponse> {
    Ok(list_response(service.list_by_author(user.id).await?))
}

/// Create an announcement
///
/// Without an image the stock background of the office is used.
#[utoipa::path(
    post,
    path = "/api/announcements",
    tag = "announcements",
    request_body(content = CreateAnnouncementDto, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Announcement created", body = ApiResponse<AnnouncementResponseDto>),
        (status = 400, description = "Missing fields or unsupported image"),
        (status = 403, description = "Not allowed for this office")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_announcement(
    State(service): State<Arc<AnnouncementService>>,
    RequireAdmin(user): RequireAdmin,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<AnnouncementResponseDto>>)> {
    let form = MultipartForm::read(multipart, MAX_ANNOUNCEMENT_IMAGE_SIZE).await?;
    let input = new_announcement_from_form(form)?;

    let announcement = service.create(&user, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(announcement), None, None)),
    ))
}

/// Edit an announcement; it returns to pending
#[utoipa::path(
    put,
    path = "/api/announcements/{id}",
    tag = "announcements",
    params(("id" = Uuid, Path, description = "Announcement ID")),
    request_body(content = UpdateAnnouncementDto, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Announcement updated", body = ApiResponse<AnnouncementResponseDto>),
        (status = 400, description = "Unsupported image"),
        (status = 403, description = "Not allowed for this office"),
        (status = 404, description = "Announcement not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_announcement(
    State(service): State<Arc<AnnouncementService>>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<AnnouncementResponseDto>>> {
    let form = MultipartForm::read(multipart, MAX_ANNOUNCEMENT_IMAGE_SIZE).await?;
    let changes = changes_from_form(form)?;

    let announcement = service.update(&user, id, changes).await?;
    Ok(Json(ApiResponse::success(Some(announcement), None, None)))
}

#[utoipa::path(
    delete,
    path = "/api/announcements/{id}",
    tag = "announcements",
    params(("id" = Uuid, Path, description = "Announcement ID")),
    responses(
        (status = 200, description = "Announcement deleted"),
        (status = 403, description = "Not allowed for this office"),
        (status = 404, description = "Announcement not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_announcement(
    State(service): State<Arc<AnnouncementService>>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Announcement deleted successfully".to_string()),
        None,
    )))
}

#[utoipa::path(
    put,
    path = "/api/announcements/{id}/approve",
    tag = "announcements",
    params(("id" = Uuid, Path, description = "Announcement ID")),
    responses(
        (status = 200, description = "Announcement approved", body = ApiResponse<AnnouncementResponseDto>),
        (status = 403, description = "Superadmin access required"),
        (status = 404, description = "Announcement not found"),
        (status = 409, description = "Announcement already reviewed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve_announcement(
    State(service): State<Arc<AnnouncementService>>,
    RequireSuperAdmin(user): RequireSuperAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AnnouncementResponseDto>>> {
    let announcement = service.review(&user, id, &ModerationAction::Approve).await?;
    Ok(Json(ApiResponse::success(Some(announcement), None, None)))
}

#[utoipa::path(
    put,
    path = "/api/announcements/{id}/reject",
    tag = "announcements",
    params(("id" = Uuid, Path, description = "Announcement ID")),
    request_body = RejectRequestDto,
    responses(
        (status = 200, description = "Announcement rejected", body = ApiResponse<AnnouncementResponseDto>),
        (status = 400, description = "Rejection comment required"),
        (status = 403, description = "Superadmin access required"),
        (status = 404, description = "Announcement not found"),
        (status = 409, description = "Announcement already reviewed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reject_announcement(
    State(service): State<Arc<AnnouncementService>>,
    RequireSuperAdmin(user): RequireSuperAdmin,
    Path(id): Path<Uuid>,
    body: axum::body::Bytes,
) -> Result<Json<ApiResponse<AnnouncementResponseDto>>> {
    let action = RejectRequestDto::parse_action(&body)?;
    let announcement = service.review(&user, id, &action).await?;
    Ok(Json(ApiResponse::success(Some(announcement), None, None)))
}
