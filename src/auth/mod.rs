//! Session-based authentication: password hashing and cookie helpers.

mod extractor;

use actix_web::cookie::{Cookie, SameSite};
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

pub use extractor::SessionAuth;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "simtrack_session";

/// Hash a password with SHA-256. Demo-grade hashing for the seeded accounts.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare a candidate password against a stored hash.
///
/// Uses `subtle::ConstantTimeEq` so the comparison does not leak where the
/// hashes first differ.
pub fn verify_password(password: &SecretString, stored_hash: &str) -> bool {
    let candidate = hash_password(password.expose_secret());
    candidate.as_bytes().ct_eq(stored_hash.as_bytes()).into()
}

/// Build the session cookie for a freshly issued token.
pub fn session_cookie(token: &str, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(secure);
    cookie
}

/// Build an empty cookie that clears the session on the client.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    session_cookie("", secure)
}
