//! Repositories for the one-time-token tables.
//!
//! Both tables share the same shape and lifecycle: a token lives for one
//! hour, at most one per user (enforced by a unique constraint). Expired
//! rows are purged before a replacement is issued, so the constraint only
//! ever rejects a genuinely live duplicate.

use reelbase_core::types::DbId;
use sqlx::PgPool;

use crate::models::token::OneTimeToken;

const COLUMNS: &str = "id, user_id, token_hash, created_at";

/// Token lifetime used in the SQL interval literal.
const TOKEN_TTL: &str = "1 hour";

/// One-time tokens for email verification.
pub struct EmailVerificationTokenRepo;

/// One-time tokens for password reset.
pub struct PasswordResetTokenRepo;

macro_rules! token_repo_impl {
    ($repo:ident, $table:literal) => {
        impl $repo {
            /// Insert a token for a user.
            ///
            /// Violates the per-user unique constraint while a row (live or
            /// expired) exists; call [`Self::purge_expired`] first.
            pub async fn create(
                pool: &PgPool,
                user_id: DbId,
                token_hash: &str,
            ) -> Result<OneTimeToken, sqlx::Error> {
                let query = format!(
                    "INSERT INTO {} (user_id, token_hash)
                     VALUES ($1, $2)
                     RETURNING {COLUMNS}",
                    $table
                );
                sqlx::query_as::<_, OneTimeToken>(&query)
                    .bind(user_id)
                    .bind(token_hash)
                    .fetch_one(pool)
                    .await
            }

            /// Find the user's token if it is still within its lifetime.
            pub async fn find_live(
                pool: &PgPool,
                user_id: DbId,
            ) -> Result<Option<OneTimeToken>, sqlx::Error> {
                let query = format!(
                    "SELECT {COLUMNS} FROM {}
                     WHERE user_id = $1 AND created_at > NOW() - INTERVAL '{}'",
                    $table, TOKEN_TTL
                );
                sqlx::query_as::<_, OneTimeToken>(&query)
                    .bind(user_id)
                    .fetch_optional(pool)
                    .await
            }

            /// Remove the user's expired token, if any.
            pub async fn purge_expired(pool: &PgPool, user_id: DbId) -> Result<(), sqlx::Error> {
                let query = format!(
                    "DELETE FROM {}
                     WHERE user_id = $1 AND created_at <= NOW() - INTERVAL '{}'",
                    $table, TOKEN_TTL
                );
                sqlx::query(&query).bind(user_id).execute(pool).await?;
                Ok(())
            }

            /// Remove the user's token unconditionally (after successful use).
            pub async fn delete_for_user(pool: &PgPool, user_id: DbId) -> Result<(), sqlx::Error> {
                let query = format!("DELETE FROM {} WHERE user_id = $1", $table);
                sqlx::query(&query).bind(user_id).execute(pool).await?;
                Ok(())
            }
        }
    };
}

token_repo_impl!(EmailVerificationTokenRepo, "email_verification_tokens");
token_repo_impl!(PasswordResetTokenRepo, "password_reset_tokens");
