//! Token claims for library users and the administrator

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role carried by administrator tokens
pub const ADMIN_ROLE: &str = "admin";

/// JWT claims of a logged-in library user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user_id: i32,
    pub exp: i64,
    pub iat: i64,
}

/// JWT claims of the administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Configured admin user id
    pub sub: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

impl AdminClaims {
    pub fn is_admin(&self, admin_user_id: &str) -> bool {
        self.role == ADMIN_ROLE && self.sub == admin_user_id
    }
}

/// Encode claims as an HS256 JWT
pub fn create_token<T: Serialize>(claims: &T, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
}

/// Decode and validate (signature and expiry) an HS256 JWT
pub fn decode_token<T: for<'de> Deserialize<'de>>(token: &str, secret: &str) -> Result<T, jsonwebtoken::errors::Error> {
    use jsonwebtoken::{decode, DecodingKey, Validation};
    let token_data = decode::<T>(token, &DecodingKey::from_secret(secret.as_bytes()), &Validation::default())?;
    Ok(token_data.claims)
}

/// Admin login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminLogin {
    pub user_id: String,
    pub password: String,
}
