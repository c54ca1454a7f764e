//! Director entity model and DTOs.

use reelbase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `directors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Director {
    pub id: DbId,
    pub name: String,
    pub avatar_url: Option<String>,
    pub avatar_asset_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug)]
pub struct CreateDirector {
    pub name: String,
    pub avatar_url: Option<String>,
    pub avatar_asset_id: Option<String>,
}

/// `None` fields keep their stored value.
#[derive(Debug, Default)]
pub struct UpdateDirector {
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub avatar_asset_id: Option<String>,
}
