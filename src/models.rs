use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub account_id: u64,
    /// Username.
    pub sub: String,
    /// Role id, see [`crate::model::role::Role::as_id`].
    pub role: u8,
    pub exp: usize,
    pub jti: String,
    pub token_type: TokenType,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub enum TokenType {
    Access,
    Refresh,
}

/// Server-side record of an issued refresh token; revoked on logout and on
/// every rotation.
#[derive(Debug, Clone)]
pub struct RefreshSession {
    pub jti: String,
    pub account_id: u64,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginReq {
    #[schema(example = "sarah")]
    pub username: String,
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "sarah")]
    pub username: String,
    #[schema(example = "password123")]
    pub password: String,
    #[schema(example = "Sarah Connor")]
    pub full_name: String,
    #[schema(example = "sarah@dayflow.com", format = "email", value_type = String)]
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangePasswordReq {
    pub current_password: String,
    pub new_password: String,
}
