use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::RequireSuperAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::policy::{authorize, Action, Resource};
use crate::features::users::dtos::{
    CreateUserDto, RegisterUserDto, UpdateRoleDto, UpdateUserDto, UserResponseDto,
};
use crate::features::users::models::UserRole;
use crate::features::users::services::UserService;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// Register a new account with the default role
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterUserDto,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "User already exists")
    ),
    tag = "users"
)]
pub async fn register(
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<RegisterUserDto>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = service.create(dto.into()).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(user.into()), None, None)),
    ))
}

/// Create a user with any role
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Superadmin access required"),
        (status = 409, description = "User already exists")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    State(service): State<Arc<UserService>>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    AppJson(dto): AppJson<CreateUserDto>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponseDto>>)> {
    authorize(Some(&admin), Action::ManageUsers, &Resource::global())?;
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(user.into()), None, None)),
    ))
}

/// List users
#[utoipa::path(
    get,
    path = "/api/users",
    params(PaginationQuery),
    responses(
        (status = 200, description = "List of users", body = ApiResponse<Vec<UserResponseDto>>),
        (status = 401, description = "Not authorized")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(service): State<Arc<UserService>>,
    _user: AuthenticatedUser,
    AppQuery(pagination): AppQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<UserResponseDto>>>> {
    let (users, total) = service.list(&pagination).await?;
    let users = users.into_iter().map(UserResponseDto::from).collect();

    Ok(Json(ApiResponse::success(
        Some(users),
        None,
        Some(Meta { total }),
    )))
}

/// Get user by id or email
#[utoipa::path(
    get,
    path = "/api/users/{user}",
    params(("user" = String, Path, description = "User ID or email")),
    responses(
        (status = 200, description = "User found", body = ApiResponse<UserResponseDto>),
        (status = 404, description = "User not found")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(service): State<Arc<UserService>>,
    _user: AuthenticatedUser,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    let user = match key.parse::<Uuid>() {
        Ok(id) => service.find_by_id(id).await?,
        Err(_) => service.find_by_email(&key).await?,
    }
    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    Ok(Json(ApiResponse::success(Some(user.into()), None, None)))
}

/// Update name, role or office of a user
#[utoipa::path(
    put,
    path = "/api/users/{user}",
    params(("user" = String, Path, description = "User email")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserResponseDto>),
        (status = 403, description = "Superadmin access required"),
        (status = 404, description = "User not found")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(service): State<Arc<UserService>>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(email): Path<String>,
    AppJson(dto): AppJson<UpdateUserDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    authorize(Some(&admin), Action::ManageUsers, &Resource::global())?;
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = service.update_by_email(&email, dto).await?;
    Ok(Json(ApiResponse::success(Some(user.into()), None, None)))
}

/// Change the role of a user
#[utoipa::path(
    put,
    path = "/api/users/{user}/role",
    params(("user" = String, Path, description = "User email")),
    request_body = UpdateRoleDto,
    responses(
        (status = 200, description = "Role updated", body = ApiResponse<UserResponseDto>),
        (status = 400, description = "Invalid role"),
        (status = 403, description = "Superadmin access required"),
        (status = 404, description = "User not found")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn update_user_role(
    State(service): State<Arc<UserService>>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(email): Path<String>,
    AppJson(dto): AppJson<UpdateRoleDto>,
) -> Result<Json<ApiResponse<UserResponseDto>>> {
    authorize(Some(&admin), Action::ManageUsers, &Resource::global())?;
    let role: UserRole = dto
        .role
        .parse()
        .map_err(|_| AppError::BadRequest("Invalid role".to_string()))?;

    let user = service.update_role(&email, role).await?;
    Ok(Json(ApiResponse::success(Some(user.into()), None, None)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/users/{user}",
    params(("user" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 403, description = "Superadmin access required"),
        (status = 404, description = "User not found")
    ),
    tag = "users",
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(service): State<Arc<UserService>>,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    authorize(Some(&admin), Action::ManageUsers, &Resource::global())?;
    service.delete_by_email(&email).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("User deleted".to_string()),
        None,
    )))
}
