//! One-time-token row model, shared by the email-verification and
//! password-reset tables (identical shape).

use reelbase_core::types::{DbId, Timestamp};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct OneTimeToken {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub created_at: Timestamp,
}
