//! Token issuing and verification for library users and the administrator

use chrono::Utc;

use crate::{
    config::{AdminConfig, AuthConfig},
    error::{AppError, AppResult},
    models::user::{create_token, decode_token, AdminClaims, SessionClaims, ADMIN_ROLE},
};

#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
    admin: AdminConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig, admin: AdminConfig) -> Self {
        Self { config, admin }
    }

    /// Check the configured admin credential pair and issue an admin token
    pub fn admin_login(&self, user_id: &str, password: &str) -> AppResult<String> {
        if self.admin.password.is_empty() {
            tracing::warn!("Admin login attempted but no admin password is configured");
            return Err(AppError::Authentication("Invalid credentials".to_string()));
        }
        if user_id != self.admin.user_id || password != self.admin.password {
            tracing::warn!(user_id, "Rejected admin login");
            return Err(AppError::Authentication("Invalid credentials".to_string()));
        }

        let (iat, exp) = self.validity();
        let claims = AdminClaims {
            sub: self.admin.user_id.clone(),
            role: ADMIN_ROLE.to_string(),
            exp,
            iat,
        };
        create_token(&claims, &self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Issue a session token for a library user
    pub fn issue_session_token(&self, user_id: i32) -> AppResult<String> {
        let (iat, exp) = self.validity();
        let claims = SessionClaims { user_id, exp, iat };
        create_token(&claims, &self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    pub fn verify_session(&self, token: &str) -> AppResult<SessionClaims> {
        decode_token(token, &self.config.jwt_secret).map_err(|e| AppError::Authentication(e.to_string()))
    }

    pub fn verify_admin(&self, token: &str) -> AppResult<AdminClaims> {
        let claims: AdminClaims = decode_token(token, &self.config.jwt_secret)
            .map_err(|_| AppError::Authentication("Not authorized, login again".to_string()))?;
        if !claims.is_admin(&self.admin.user_id) {
            return Err(AppError::Authorization("Admin rights required".to_string()));
        }
        Ok(claims)
    }

    fn validity(&self) -> (i64, i64) {
        let now = Utc::now().timestamp();
        (now, now + self.config.jwt_expiration_hours as i64 * 3600)
    }
}
