//! Review entity models, DTOs, and the derived rating aggregate.

use reelbase_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `reviews` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Review {
    pub id: DbId,
    pub owner_id: DbId,
    pub movie_id: DbId,
    pub rating: i32,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A review joined with its owner's public identity.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewWithOwner {
    pub id: DbId,
    pub rating: i32,
    pub content: String,
    pub owner_id: DbId,
    pub owner_name: String,
}

/// DTO for creating a review.
#[derive(Debug)]
pub struct CreateReview {
    pub owner_id: DbId,
    pub movie_id: DbId,
    pub rating: i32,
    pub content: String,
}

/// DTO for updating a review. `None` fields keep their stored value.
#[derive(Debug, Default)]
pub struct UpdateReview {
    pub rating: Option<i32>,
    pub content: Option<String>,
}

/// Derived rating statistics for one movie.
///
/// `rating_average` is rendered with exactly one fractional digit (`"9.0"`).
/// A movie with no reviews has NO aggregate -- absence is distinct from a
/// zero average, so queries return `Option<RatingAggregate>`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RatingAggregate {
    pub rating_average: String,
    pub review_count: i64,
}
