//! Authentication endpoints

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::user::AdminLogin,
    AppState,
};

#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

/// Log in as administrator
#[utoipa::path(
    post,
    path = "/auth/admin/login",
    tag = "auth",
    request_body = AdminLogin,
    responses(
        (status = 200, description = "Admin token issued", body = TokenResponse),
        (status = 400, description = "Malformed body", body = crate::error::ErrorResponse),
        (status = 401, description = "Invalid credentials", body = crate::error::ErrorResponse)
    )
)]
pub async fn admin_login(
    State(state): State<AppState>,
    WithRejection(Json(data), _): WithRejection<Json<AdminLogin>, AppError>,
) -> AppResult<Json<TokenResponse>> {
    let token = state.services.auth.admin_login(&data.user_id, &data.password)?;
    Ok(Json(TokenResponse { success: true, token }))
}
