//! Actor entity model and DTOs.

use reelbase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `actors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Actor {
    pub id: DbId,
    pub name: String,
    pub about: String,
    pub gender: String,
    pub avatar_url: Option<String>,
    pub avatar_asset_id: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new actor. Avatar fields are set when an image was
/// uploaded alongside the form data.
#[derive(Debug)]
pub struct CreateActor {
    pub name: String,
    pub about: String,
    pub gender: String,
    pub avatar_url: Option<String>,
    pub avatar_asset_id: Option<String>,
}

/// DTO for updating an actor. `None` fields keep their stored value.
#[derive(Debug, Default)]
pub struct UpdateActor {
    pub name: Option<String>,
    pub about: Option<String>,
    pub gender: Option<String>,
    pub avatar_url: Option<String>,
    pub avatar_asset_id: Option<String>,
}
