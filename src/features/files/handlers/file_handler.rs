use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, MaybeUser};
use crate::features::auth::guards::{RequireAdmin, RequireSuperAdmin};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::{
    AddCategoryDto, AddVersionDto, FileResponseDto, OfficeCategoriesDto, UpdateFileDto,
    UploadFileDto,
};
use crate::features::files::services::{Download, FileService, NewFile};
use crate::features::moderation::dtos::RejectRequestDto;
use crate::features::moderation::models::ModerationAction;
use crate::features::offices::models::Office;
use crate::shared::multipart::MultipartForm;
use crate::shared::types::{ApiResponse, Meta};

fn list_response(files: Vec<FileResponseDto>) -> Json<ApiResponse<Vec<FileResponseDto>>> {
    let total = files.len() as i64;
    Json(ApiResponse::success(Some(files), None, Some(Meta { total })))
}

fn check_file_name(name: &str) -> Result<()> {
    if name.chars().count() < 2 {
        return Err(AppError::Validation(
            "File name must be at least 2 characters long".to_string(),
        ));
    }
    Ok(())
}

/// Turn an upload form into a validated [`NewFile`]
fn new_file_from_form(mut form: MultipartForm) -> Result<NewFile> {
    let upload = form.take_file("file");
    let url = form.text("url");

    if upload.is_none() && url.is_none() {
        return Err(AppError::BadRequest(
            "Please upload a file or provide a URL".to_string(),
        ));
    }

    let (Some(name), Some(office), Some(category)) =
        (form.text("name"), form.text("office"), form.text("category"))
    else {
        return Err(AppError::BadRequest(
            "Please provide all required fields".to_string(),
        ));
    };

    check_file_name(&name)?;

    Ok(NewFile {
        name,
        office: Office::parse_param(&office)?,
        category,
        url,
        upload,
    })
}

/// Upload a file or register an external link
///
/// Accepts multipart/form-data with `file` or `url`, plus `name`, `office`
/// and `category`. The file starts as pending.
#[utoipa::path(
    post,
    path = "/api/files/upload",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 201, description = "File uploaded successfully", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "Missing file, URL or required fields"),
        (status = 401, description = "Not authorized"),
        (status = 403, description = "Not allowed for this office")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_file(
    State(service): State<Arc<FileService>>,
    RequireAdmin(user): RequireAdmin,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileResponseDto>>)> {
    let form = MultipartForm::read(multipart, service.max_upload_size()).await?;
    let input = new_file_from_form(form)?;

    let file = service.upload(&user, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(file), None, None)),
    ))
}

/// List approved files
#[utoipa::path(
    get,
    path = "/api/files/approved",
    tag = "files",
    responses(
        (status = 200, description = "Approved files, newest first", body = ApiResponse<Vec<FileResponseDto>>)
    )
)]
pub async fn list_approved_files(
    State(service): State<Arc<FileService>>,
) -> Result<Json<ApiResponse<Vec<FileResponseDto>>>> {
    Ok(list_response(service.list_approved().await?))
}

/// List files that are not approved
///
/// Admins see their own office, superadmins see every office.
#[utoipa::path(
    get,
    path = "/api/files/unapproved",
    tag = "files",
    responses(
        (status = 200, description = "Pending and rejected files", body = ApiResponse<Vec<FileResponseDto>>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_unapproved_files(
    State(service): State<Arc<FileService>>,
    RequireAdmin(user): RequireAdmin,
) -> Result<Json<ApiResponse<Vec<FileResponseDto>>>> {
    Ok(list_response(service.list_unapproved(&user).await?))
}

/// List files awaiting review
#[utoipa::path(
    get,
    path = "/api/files/pending",
    tag = "files",
    responses(
        (status = 200, description = "Pending files", body = ApiResponse<Vec<FileResponseDto>>),
        (status = 403, description = "Superadmin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_pending_files(
    State(service): State<Arc<FileService>>,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
) -> Result<Json<ApiResponse<Vec<FileResponseDto>>>> {
    Ok(list_response(service.list_pending().await?))
}

/// List files uploaded by the caller
#[utoipa::path(
    get,
    path = "/api/files/my-files",
    tag = "files",
    responses(
        (status = 200, description = "Files of the current user", body = ApiResponse<Vec<FileResponseDto>>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_my_files(
    State(service): State<Arc<FileService>>,
    RequireAdmin(user): RequireAdmin,
) -> Result<Json<ApiResponse<Vec<FileResponseDto>>>> {
    Ok(list_response(service.list_by_author(user.id).await?))
}

/// List approved files of an office
#[utoipa::path(
    get,
    path = "/api/files/office/{office}",
    tag = "files",
    params(("office" = String, Path, description = "Office name, e.g. `Library Office`")),
    responses(
        (status = 200, description = "Approved files of the office", body = ApiResponse<Vec<FileResponseDto>>),
        (status = 400, description = "Unknown office")
    )
)]
pub async fn list_office_files(
    State(service): State<Arc<FileService>>,
    Path(office): Path<String>,
) -> Result<Json<ApiResponse<Vec<FileResponseDto>>>> {
    let office = Office::parse_param(&office)?;
    Ok(list_response(service.list_by_office(office, true).await?))
}

/// Get a file by id
///
/// Approved files are public; others follow the read policy.
#[utoipa::path(
    get,
    path = "/api/files/{id}",
    tag = "files",
    params(("id" = Uuid, Path, description = "File ID")),
    responses(
        (status = 200, description = "File found", body = ApiResponse<FileResponseDto>),
        (status = 401, description = "Login required for unapproved files"),
        (status = 404, description = "File not found")
    )
)]
pub async fn get_file(
    State(service): State<Arc<FileService>>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileResponseDto>>> {
    let file = service.get(user.as_ref(), id).await?;
    Ok(Json(ApiResponse::success(Some(file), None, None)))
}

/// Download a file
///
/// Redirects to the link of URL entries, otherwise sends the stored file as
/// an attachment.
#[utoipa::path(
    get,
    path = "/api/files/download/{id}",
    tag = "files",
    params(("id" = Uuid, Path, description = "File ID")),
    responses(
        (status = 200, description = "File content"),
        (status = 302, description = "Redirect to external URL"),
        (status = 404, description = "File not found")
    )
)]
pub async fn download_file(
    State(service): State<Arc<FileService>>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let response = match service.download(user.as_ref(), id).await? {
        Download::Redirect(url) => (StatusCode::FOUND, [(header::LOCATION, url)]).into_response(),
        Download::Content {
            file_name,
            content_type,
            data,
        } => (
            [
                (header::CONTENT_TYPE, content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file_name.replace('"', "")),
                ),
            ],
            Body::from(data),
        )
            .into_response(),
    };
    Ok(response)
}

/// Edit file name or category
#[utoipa::path(
    put,
    path = "/api/files/{id}",
    tag = "files",
    params(("id" = Uuid, Path, description = "File ID")),
    request_body = UpdateFileDto,
    responses(
        (status = 200, description = "File updated", body = ApiResponse<FileResponseDto>),
        (status = 403, description = "Not allowed for this office"),
        (status = 404, description = "File not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_file(
    State(service): State<Arc<FileService>>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateFileDto>,
) -> Result<Json<ApiResponse<FileResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let file = service.update(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(Some(file), None, None)))
}

/// Delete a file
///
/// Files of earlier versions are kept on disk.
#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    tag = "files",
    params(("id" = Uuid, Path, description = "File ID")),
    responses(
        (status = 200, description = "File deleted"),
        (status = 403, description = "Not allowed for this office"),
        (status = 404, description = "File not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_file(
    State(service): State<Arc<FileService>>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("File deleted successfully".to_string()),
        None,
    )))
}

/// Approve a pending file
#[utoipa::path(
    put,
    path = "/api/files/{id}/approve",
    tag = "files",
    params(("id" = Uuid, Path, description = "File ID")),
    responses(
        (status = 200, description = "File approved", body = ApiResponse<FileResponseDto>),
        (status = 403, description = "Superadmin access required"),
        (status = 404, description = "File not found"),
        (status = 409, description = "File already reviewed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn approve_file(
    State(service): State<Arc<FileService>>,
    RequireSuperAdmin(user): RequireSuperAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileResponseDto>>> {
    let file = service.review(&user, id, &ModerationAction::Approve).await?;
    Ok(Json(ApiResponse::success(Some(file), None, None)))
}

/// Reject a pending file with a comment
#[utoipa::path(
    put,
    path = "/api/files/{id}/reject",
    tag = "files",
    params(("id" = Uuid, Path, description = "File ID")),
    request_body = RejectRequestDto,
    responses(
        (status = 200, description = "File rejected", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "Rejection comment required"),
        (status = 403, description = "Superadmin access required"),
        (status = 404, description = "File not found"),
        (status = 409, description = "File already reviewed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn reject_file(
    State(service): State<Arc<FileService>>,
    RequireSuperAdmin(user): RequireSuperAdmin,
    Path(id): Path<Uuid>,
    body: axum::body::Bytes,
) -> Result<Json<ApiResponse<FileResponseDto>>> {
    let action = RejectRequestDto::parse_action(&body)?;
    let file = service.review(&user, id, &action).await?;
    Ok(Json(ApiResponse::success(Some(file), None, None)))
}

/// Add a new version to a file
///
/// The new version becomes current and the file returns to review.
#[utoipa::path(
    post,
    path = "/api/files/{id}/version",
    tag = "files",
    params(("id" = Uuid, Path, description = "File ID")),
    request_body(
        content = AddVersionDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 201, description = "Version added", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "Missing file or URL"),
        (status = 403, description = "Not allowed for this office"),
        (status = 404, description = "File not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_file_version(
    State(service): State<Arc<FileService>>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileResponseDto>>)> {
    let mut form = MultipartForm::read(multipart, service.max_upload_size()).await?;
    let upload = form.take_file("file");
    let url = form.text("url");

    if upload.is_none() && url.is_none() {
        return Err(AppError::BadRequest(
            "Please upload a file or provide a URL".to_string(),
        ));
    }

    let name = form.text("name");
    if let Some(name) = &name {
        check_file_name(name)?;
    }

    let file = service.add_version(&user, id, name, url, upload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(file), None, None)),
    ))
}

/// List categories of an office
#[utoipa::path(
    get,
    path = "/api/files/categories/{office}",
    tag = "files",
    params(("office" = String, Path, description = "Office name")),
    responses(
        (status = 200, description = "Categories of the office", body = ApiResponse<OfficeCategoriesDto>),
        (status = 400, description = "Unknown office")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_office_categories(
    State(service): State<Arc<FileService>>,
    _user: AuthenticatedUser,
    Path(office): Path<String>,
) -> Result<Json<ApiResponse<OfficeCategoriesDto>>> {
    let office = Office::parse_param(&office)?;
    let categories = service.categories(office).await?;
    Ok(Json(ApiResponse::success(
        Some(OfficeCategoriesDto { office, categories }),
        None,
        None,
    )))
}

/// Register a category for an office
#[utoipa::path(
    post,
    path = "/api/files/categories",
    tag = "files",
    request_body = AddCategoryDto,
    responses(
        (status = 201, description = "Category added", body = ApiResponse<OfficeCategoriesDto>),
        (status = 400, description = "Category already exists for this office"),
        (status = 403, description = "Not allowed for this office")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_office_category(
    State(service): State<Arc<FileService>>,
    RequireAdmin(user): RequireAdmin,
    AppJson(dto): AppJson<AddCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<OfficeCategoriesDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let categories = service.add_category(&user, dto.office, &dto.category).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(OfficeCategoriesDto {
                office: dto.office,
                categories,
            }),
            None,
            None,
        )),
    ))
}
