//! Database operations for login sessions.
//!
//! Sessions store the SHA-256 hash of an opaque cookie token, following the
//! same approach used for any other secret material in this server.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use sha2::{Digest, Sha256};

use crate::entity::{session, user};
use crate::error::{AppError, AppResult};

use super::DbPool;

/// Hash a session token using SHA-256.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Generate a random session token string.
pub fn generate_token() -> String {
    let random_bytes: [u8; 32] = rand::random();
    format!("simtrack_sess_{}", hex::encode(random_bytes))
}

impl DbPool {
    /// Insert a new session (stores the hash, not the raw token).
    pub async fn insert_session(
        &self,
        user_id: i32,
        token_hash: &str,
        ttl_hours: u64,
    ) -> AppResult<()> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(ttl_hours as i64);

        let model = session::ActiveModel {
            user_id: Set(user_id),
            token_hash: Set(token_hash.to_string()),
            expires_at: Set(expires_at),
            revoked_at: Set(None),
            created_at: Set(now),
            ..Default::default()
        };

        model
            .insert(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to insert session: {}", e)))?;

        Ok(())
    }

    /// Resolve an active (non-revoked, non-expired) session to its user.
    pub async fn find_session_user(&self, token_hash: &str) -> AppResult<Option<user::Model>> {
        let session = session::Entity::find()
            .filter(session::Column::TokenHash.eq(token_hash))
            .filter(session::Column::RevokedAt.is_null())
            .filter(session::Column::ExpiresAt.gt(Utc::now()))
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to look up session: {}", e)))?;

        let Some(session) = session else {
            return Ok(None);
        };

        self.find_user_by_id(session.user_id).await
    }

    /// Revoke a session by its token hash. Returns false when no active
    /// session matched.
    pub async fn revoke_session(&self, token_hash: &str) -> AppResult<bool> {
        let result = session::Entity::find()
            .filter(session::Column::TokenHash.eq(token_hash))
            .filter(session::Column::RevokedAt.is_null())
            .one(self.connection())
            .await
            .map_err(|e| AppError::Database(format!("Failed to look up session: {}", e)))?;

        if let Some(m) = result {
            let mut active: session::ActiveModel = m.into();
            active.revoked_at = Set(Some(Utc::now()));
            active
                .update(self.connection())
                .await
                .map_err(|e| AppError::Database(format!("Failed to revoke session: {}", e)))?;
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_util::test_pool;

    #[test]
    fn test_hash_token_is_stable_and_hex() {
        let hash = hash_token("simtrack_sess_abc");
        assert_eq!(hash, hash_token("simtrack_sess_abc"));
        assert_eq!(hash.len(), 64);
        assert_ne!(hash, hash_token("simtrack_sess_abd"));
    }

    #[test]
    fn test_generate_token_is_prefixed_and_unique() {
        let a = generate_token();
        let b = generate_token();
        assert!(a.starts_with("simtrack_sess_"));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let pool = test_pool().await;
        let user = pool.insert_user("admin", "hash").await.unwrap();

        let token = generate_token();
        let token_hash = hash_token(&token);
        pool.insert_session(user.id, &token_hash, 24).await.unwrap();

        let resolved = pool.find_session_user(&token_hash).await.unwrap().unwrap();
        assert_eq!(resolved.id, user.id);

        // Unknown token resolves to nothing
        assert!(
            pool.find_session_user(&hash_token("other"))
                .await
                .unwrap()
                .is_none()
        );

        // Revocation is effective and idempotent
        assert!(pool.revoke_session(&token_hash).await.unwrap());
        assert!(pool.find_session_user(&token_hash).await.unwrap().is_none());
        assert!(!pool.revoke_session(&token_hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_expired_session_is_invalid() {
        let pool = test_pool().await;
        let user = pool.insert_user("admin", "hash").await.unwrap();

        let token_hash = hash_token(&generate_token());
        pool.insert_session(user.id, &token_hash, 0).await.unwrap();

        assert!(pool.find_session_user(&token_hash).await.unwrap().is_none());
    }
}
