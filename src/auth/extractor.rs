//! Actix-web extractor resolving the session cookie to a user identity.
//!
//! Handlers that require authentication take a `SessionAuth` argument; the
//! identity is request-scoped and sourced from the sessions table, never
//! from any shared mutable state.

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use futures_util::future::LocalBoxFuture;

use super::SESSION_COOKIE;
use crate::db::{DbPool, sessions};
use crate::error::ErrorResponse;
use crate::models::AuthenticatedUser;

/// Authentication error for the extractor.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl AuthError {
    fn required() -> Self {
        Self {
            message: "Authentication required".to_string(),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::UNAUTHORIZED).json(ErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: self.message.clone(),
        })
    }
}

/// Extractor that requires a valid session cookie.
///
/// ```ignore
/// async fn protected_handler(auth: SessionAuth) -> impl Responder {
///     // auth.user is the authenticated user
/// }
/// ```
pub struct SessionAuth {
    pub user: AuthenticatedUser,
}

impl FromRequest for SessionAuth {
    type Error = AuthError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let pool = req.app_data::<web::Data<DbPool>>().cloned();
        let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());

        Box::pin(async move {
            let pool = pool.ok_or_else(|| AuthError {
                message: "Internal configuration error".to_string(),
            })?;
            let token = token.ok_or_else(AuthError::required)?;

            let token_hash = sessions::hash_token(&token);
            let user = pool
                .find_session_user(&token_hash)
                .await
                .map_err(|_| AuthError::required())?
                .ok_or_else(AuthError::required)?;

            Ok(SessionAuth {
                user: AuthenticatedUser {
                    id: user.id,
                    username: user.username,
                },
            })
        })
    }
}
