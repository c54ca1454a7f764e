//! Repository for the `actors` table.

use reelbase_core::types::DbId;
use sqlx::PgPool;

use crate::models::actor::{Actor, CreateActor, UpdateActor};

const COLUMNS: &str =
    "id, name, about, gender, avatar_url, avatar_asset_id, created_at, updated_at";

/// Provides CRUD operations for actors.
pub struct ActorRepo;

impl ActorRepo {
    /// Insert a new actor, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateActor) -> Result<Actor, sqlx::Error> {
        let query = format!(
            "INSERT INTO actors (name, about, gender, avatar_url, avatar_asset_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(&input.name)
            .bind(&input.about)
            .bind(&input.gender)
            .bind(&input.avatar_url)
            .bind(&input.avatar_asset_id)
            .fetch_one(pool)
            .await
    }

    /// Find an actor by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Actor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM actors WHERE id = $1");
        sqlx::query_as::<_, Actor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Paginated listing, newest first. `skip = page_no * limit`.
    pub async fn list(pool: &PgPool, limit: i64, skip: i64) -> Result<Vec<Actor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM actors
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(limit)
            .bind(skip)
            .fetch_all(pool)
            .await
    }

    /// The most recently added actors.
    pub async fn latest(pool: &PgPool, limit: i64) -> Result<Vec<Actor>, sqlx::Error> {
        Self::list(pool, limit, 0).await
    }

    /// Case-insensitive, unanchored substring search on name.
    pub async fn search(pool: &PgPool, name: &str) -> Result<Vec<Actor>, sqlx::Error> {
        let pattern = format!("%{}%", escape_like(name));
        let query = format!(
            "SELECT {COLUMNS} FROM actors
             WHERE name ILIKE $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(&pattern)
            .fetch_all(pool)
            .await
    }

    /// Update an actor. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateActor,
    ) -> Result<Option<Actor>, sqlx::Error> {
        let query = format!(
            "UPDATE actors SET
                name = COALESCE($2, name),
                about = COALESCE($3, about),
                gender = COALESCE($4, gender),
                avatar_url = COALESCE($5, avatar_url),
                avatar_asset_id = COALESCE($6, avatar_asset_id),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Actor>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.about)
            .bind(&input.gender)
            .bind(&input.avatar_url)
            .bind(&input.avatar_asset_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an actor. Cast entries referencing it cascade away.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM actors WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of actors.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM actors")
            .fetch_one(pool)
            .await
    }
}

/// Escape LIKE metacharacters so user input matches literally.
pub(crate) fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
