//! Repository for the `reviews` table.

use reelbase_core::types::DbId;
use sqlx::PgPool;

use crate::models::review::{CreateReview, Review, ReviewWithOwner, UpdateReview};

const COLUMNS: &str = "id, owner_id, movie_id, rating, content, created_at, updated_at";

/// Provides CRUD operations for reviews.
pub struct ReviewRepo;

impl ReviewRepo {
    /// Insert a review.
    ///
    /// A second review by the same owner on the same movie violates
    /// `uq_reviews_owner_movie`; callers surface that as a conflict.
    pub async fn create(pool: &PgPool, input: &CreateReview) -> Result<Review, sqlx::Error> {
        let query = format!(
            "INSERT INTO reviews (owner_id, movie_id, rating, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(input.owner_id)
            .bind(input.movie_id)
            .bind(input.rating)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Find a review by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Review>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reviews WHERE id = $1");
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update rating/content. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateReview,
    ) -> Result<Option<Review>, sqlx::Error> {
        let query = format!(
            "UPDATE reviews SET
                rating = COALESCE($2, rating),
                content = COALESCE($3, content),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Review>(&query)
            .bind(id)
            .bind(input.rating)
            .bind(&input.content)
            .fetch_optional(pool)
            .await
    }

    /// Delete a review. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All reviews for a movie with each owner's public identity, newest
    /// first.
    pub async fn list_for_movie(
        pool: &PgPool,
        movie_id: DbId,
    ) -> Result<Vec<ReviewWithOwner>, sqlx::Error> {
        sqlx::query_as::<_, ReviewWithOwner>(
            "SELECT r.id, r.rating, r.content, u.id AS owner_id, u.name AS owner_name
             FROM reviews r
             JOIN users u ON u.id = r.owner_id
             WHERE r.movie_id = $1
             ORDER BY r.created_at DESC",
        )
        .bind(movie_id)
        .fetch_all(pool)
        .await
    }

    /// Number of reviews on one movie.
    pub async fn count_for_movie(pool: &PgPool, movie_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE movie_id = $1")
            .bind(movie_id)
            .fetch_one(pool)
            .await
    }

    /// Total number of reviews.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM reviews")
            .fetch_one(pool)
            .await
    }
}
