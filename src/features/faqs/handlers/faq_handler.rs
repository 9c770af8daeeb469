use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::auth::guards::RequireAdmin;
use crate::features::faqs::dtos::{
    CreateFaqDto, FaqResponseDto, ScoredFaqDto, SearchQuery, SimilarQuery, UpdateFaqDto,
};
use crate::features::faqs::services::FaqService;
use crate::features::offices::models::Office;
use crate::shared::types::{ApiResponse, Meta};

fn list_response<T>(items: Vec<T>) -> Json<ApiResponse<Vec<T>>> {
    let total = items.len() as i64;
    Json(ApiResponse::success(Some(items), None, Some(Meta { total })))
}

/// List every FAQ, newest first
#[utoipa::path(
    get,
    path = "/api/faqs",
    tag = "faqs",
    responses(
        (status = 200, description = "All FAQs", body = ApiResponse<Vec<FaqResponseDto>>)
    )
)]
pub async fn list_faqs(
    State(service): State<Arc<FaqService>>,
) -> Result<Json<ApiResponse<Vec<FaqResponseDto>>>> {
    Ok(list_response(service.list_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/faqs/office/{office}",
    tag = "faqs",
    params(("office" = String, Path, description = "Office name")),
    responses(
        (status = 200, description = "FAQs of the office", body = ApiResponse<Vec<FaqResponseDto>>),
        (status = 400, description = "Unknown office")
    )
)]
pub async fn list_office_faqs(
    State(service): State<Arc<FaqService>>,
    Path(office): Path<String>,
) -> Result<Json<ApiResponse<Vec<FaqResponseDto>>>> {
    let office = Office::parse_param(&office)?;
    Ok(list_response(service.list_by_office(office).await?))
}

/// Search FAQs by keyword
///
/// Matches on the stored keywords and on the question text.
#[utoipa::path(
    get,
    path = "/api/faqs/search",
    tag = "faqs",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching FAQs, best first", body = ApiResponse<Vec<ScoredFaqDto>>),
        (status = 400, description = "Keyword is required")
    )
)]
pub async fn search_faqs(
    State(service): State<Arc<FaqService>>,
    AppQuery(query): AppQuery<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<ScoredFaqDto>>>> {
    let keyword = query
        .keyword
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Keyword is required".to_string()))?;

    Ok(list_response(service.search(&keyword).await?))
}

/// Find FAQs of an office similar to a new question
#[utoipa::path(
    get,
    path = "/api/faqs/search-similar",
    tag = "faqs",
    params(SimilarQuery),
    responses(
        (status = 200, description = "Similar FAQs, most similar first", body = ApiResponse<Vec<ScoredFaqDto>>),
        (status = 400, description = "Question and office are required")
    )
)]
pub async fn search_similar_faqs(
    State(service): State<Arc<FaqService>>,
    AppQuery(query): AppQuery<SimilarQuery>,
) -> Result<Json<ApiResponse<Vec<ScoredFaqDto>>>> {
    let (Some(question), Some(office)) = (query.question, query.office) else {
        return Err(AppError::BadRequest(
            "Question and office are required".to_string(),
        ));
    };
    let office = Office::parse_param(&office)?;

    Ok(list_response(service.find_similar(&question, office).await?))
}

#[utoipa::path(
    post,
    path = "/api/faqs",
    tag = "faqs",
    request_body = CreateFaqDto,
    responses(
        (status = 201, description = "FAQ created", body = ApiResponse<FaqResponseDto>),
        (status = 400, description = "Missing question or answer"),
        (status = 403, description = "Not allowed for this office")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_faq(
    State(service): State<Arc<FaqService>>,
    RequireAdmin(user): RequireAdmin,
    AppJson(dto): AppJson<CreateFaqDto>,
) -> Result<(StatusCode, Json<ApiResponse<FaqResponseDto>>)> {
    dto.validate()?;

    let faq = service.create(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(faq), None, None)),
    ))
}

#[utoipa::path(
    put,
    path = "/api/faqs/{id}",
    tag = "faqs",
    params(("id" = Uuid, Path, description = "FAQ ID")),
    request_body = UpdateFaqDto,
    responses(
        (status = 200, description = "FAQ updated", body = ApiResponse<FaqResponseDto>),
        (status = 403, description = "Not allowed for this office"),
        (status = 404, description = "FAQ not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_faq(
    State(service): State<Arc<FaqService>>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateFaqDto>,
) -> Result<Json<ApiResponse<FaqResponseDto>>> {
    dto.validate()?;

    let faq = service.update(&user, id, dto).await?;
    Ok(Json(ApiResponse::success(Some(faq), None, None)))
}

#[utoipa::path(
    delete,
    path = "/api/faqs/{id}",
    tag = "faqs",
    params(("id" = Uuid, Path, description = "FAQ ID")),
    responses(
        (status = 200, description = "FAQ deleted"),
        (status = 403, description = "Not allowed for this office"),
        (status = 404, description = "FAQ not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_faq(
    State(service): State<Arc<FaqService>>,
    RequireAdmin(user): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(&user, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("FAQ deleted successfully".to_string()),
        None,
    )))
}
