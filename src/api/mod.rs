//! API handlers for the Bookshelf REST endpoints

pub mod auth;
pub mod book_requests;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post},
    Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    models::{AdminClaims, SessionClaims},
    AppState,
};

/// Header used by older clients instead of `Authorization: Bearer`
const LEGACY_TOKEN_HEADER: &str = "token";

/// Extractor for a logged-in library user
pub struct SessionUser(pub SessionClaims);

/// Extractor for the administrator
pub struct AdminUser(pub AdminClaims);

async fn token_from_parts(parts: &mut Parts, state: &AppState) -> Option<String> {
    if let Ok(TypedHeader(Authorization(bearer))) =
        TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await
    {
        return Some(bearer.token().to_string());
    }
    parts
        .headers
        .get(LEGACY_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

#[async_trait]
impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts, state)
            .await
            .ok_or_else(|| AppError::Authentication("Missing authorization token".to_string()))?;

        let claims = state.services.auth.verify_session(&token)?;
        Ok(SessionUser(claims))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts, state)
            .await
            .ok_or_else(|| AppError::Authentication("Not authorized, login again".to_string()))?;

        let claims = state.services.auth.verify_admin(&token)?;
        Ok(AdminUser(claims))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/admin/login", post(auth::admin_login))
        // Book requests
        .route(
            "/book-requests",
            get(book_requests::list_requests)
                .post(book_requests::submit_request)
                .delete(book_requests::clear_requests),
        )
        .with_state(state);

    Router::new()
        .route("/", get(|| async { "API Working" }))
        .nest("/api", api)
        .merge(openapi::create_openapi_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors),
        )
}
