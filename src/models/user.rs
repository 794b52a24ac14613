//! User models and session DTOs.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request-scoped identity resolved from a session cookie.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
}

/// Login request body.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    /// Wrapped in SecretString so the password never shows up in debug output.
    #[schema(value_type = String)]
    pub password: SecretString,
}
