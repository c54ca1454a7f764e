//! Writer entity model and DTOs.

use reelbase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `writers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Writer {
    pub id: DbId,
    pub name: String,
    pub avatar_url: Option<String>,
    pub avatar_asset_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateWriter {
    pub name: String,
    pub avatar_url: Option<String>,
    pub avatar_asset_id: Option<String>,
}

/// `None` fields keep their stored value.
#[derive(Debug, Default)]
pub struct UpdateWriter {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub avatar_asset_id: Option<String>,
}
