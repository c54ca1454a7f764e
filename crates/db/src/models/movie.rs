//! Movie entity models and DTOs.
//!
//! A movie owns its ordered cast entries and writer references (stored in
//! `movie_cast` / `movie_writers`) and its poster/trailer asset metadata.

use chrono::NaiveDate;
use reelbase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::director::Director;

/// A row from the `movies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Movie {
    pub id: DbId,
    pub title: String,
    pub story_line: String,
    pub director_id: Option<DbId>,
    pub release_date: NaiveDate,
    pub status: String,
    pub kind: String,
    pub language: String,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub poster_url: String,
    pub poster_asset_id: String,
    pub poster_responsive: Vec<String>,
    pub trailer_url: String,
    pub trailer_asset_id: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cast row joined with the actor it references.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CastMember {
    pub id: DbId,
    pub actor_id: DbId,
    pub name: String,
    pub avatar_url: Option<String>,
    pub role_as: String,
    pub lead_actor: bool,
}

/// A writer reference joined with the writer it points at.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WriterRef {
    pub id: DbId,
    pub name: String,
    pub avatar_url: Option<String>,
}

/// A movie with its cast, writers, and director resolved.
#[derive(Debug, Clone, Serialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    pub cast: Vec<CastMember>,
    pub writers: Vec<WriterRef>,
    pub director: Option<Director>,
}

/// Lightweight projection used by related/top-rated listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MovieCard {
    pub id: DbId,
    pub title: String,
    pub poster: String,
    pub responsive_posters: Vec<String>,
}

/// Poster metadata written as one unit.
#[derive(Debug, Clone)]
pub struct PosterAsset {
    pub url: String,
    pub asset_id: String,
    pub responsive: Vec<String>,
}

/// One cast entry in a create/update payload.
#[derive(Debug, Clone)]
pub struct CastEntryInput {
    pub actor_id: DbId,
    pub role_as: String,
    pub lead_actor: bool,
}

/// DTO for creating a movie. Assets are already uploaded at this point.
#[derive(Debug)]
pub struct CreateMovie {
    pub title: String,
    pub story_line: String,
    pub director_id: Option<DbId>,
    pub release_date: NaiveDate,
    pub status: String,
    pub kind: String,
    pub language: String,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub poster: PosterAsset,
    pub trailer_url: String,
    pub trailer_asset_id: String,
    pub cast: Vec<CastEntryInput>,
    pub writer_ids: Vec<DbId>,
}

/// DTO for updating a movie. `None` fields keep their stored value;
/// `Some` cast/writer lists replace the stored lists wholesale.
#[derive(Debug, Default)]
pub struct UpdateMovie {
    pub title: Option<String>,
    pub story_line: Option<String>,
    pub director_id: Option<DbId>,
    pub release_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub kind: Option<String>,
    pub language: Option<String>,
    pub genres: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub trailer_url: Option<String>,
    pub trailer_asset_id: Option<String>,
    pub cast: Option<Vec<CastEntryInput>>,
    pub writer_ids: Option<Vec<DbId>>,
}
