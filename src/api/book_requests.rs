//! Book request endpoints

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{BookRequest, EnrichedRequest, SubmitBookRequest},
    AppState,
};

use super::{AdminUser, SessionUser};

#[derive(Serialize, ToSchema)]
pub struct SubmitResponse {
    pub success: bool,
    pub request: BookRequest,
}

#[derive(Serialize, ToSchema)]
pub struct ListResponse {
    pub success: bool,
    pub requests: Vec<EnrichedRequest>,
}

#[derive(Serialize, ToSchema)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
    /// Number of requests removed
    pub deleted: u64,
}

/// Request a book, or add the caller to an existing request
#[utoipa::path(
    post,
    path = "/book-requests",
    tag = "book-requests",
    security(("bearer_auth" = [])),
    request_body = SubmitBookRequest,
    responses(
        (status = 201, description = "Request recorded", body = SubmitResponse),
        (status = 400, description = "Title or author missing, or malformed body", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn submit_request(
    State(state): State<AppState>,
    SessionUser(claims): SessionUser,
    WithRejection(Json(data), _): WithRejection<Json<SubmitBookRequest>, AppError>,
) -> AppResult<(StatusCode, Json<SubmitResponse>)> {
    let request = state
        .services
        .book_requests
        .submit_request(claims.user_id, &data)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            success: true,
            request,
        }),
    ))
}

/// List book requests, most requested first
#[utoipa::path(
    get,
    path = "/book-requests",
    tag = "book-requests",
    responses(
        (status = 200, description = "Book requests with catalog data", body = ListResponse)
    )
)]
pub async fn list_requests(State(state): State<AppState>) -> AppResult<Json<ListResponse>> {
    let requests = state.services.book_requests.list_requests().await?;
    Ok(Json(ListResponse {
        success: true,
        requests,
    }))
}

/// Delete all book requests
#[utoipa::path(
    delete,
    path = "/book-requests",
    tag = "book-requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All requests deleted", body = ClearResponse),
        (status = 401, description = "Not authenticated", body = crate::error::ErrorResponse),
        (status = 403, description = "Not an administrator", body = crate::error::ErrorResponse)
    )
)]
pub async fn clear_requests(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> AppResult<Json<ClearResponse>> {
    tracing::info!(admin = %admin.sub, "Clearing book requests");
    let deleted = state.services.book_requests.clear_requests().await?;
    Ok(Json(ClearResponse {
        success: true,
        message: "All book requests deleted.".to_string(),
        deleted,
    }))
}
