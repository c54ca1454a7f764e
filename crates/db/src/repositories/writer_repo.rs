//! Repository for the `writers` table.

use reelbase_core::types::DbId;
use sqlx::PgPool;

use crate::models::writer::{CreateWriter, UpdateWriter, Writer};
use crate::repositories::actor_repo::escape_like;

const COLUMNS: &str = "id, name, avatar_url, avatar_asset_id, created_at, updated_at";

/// Provides CRUD operations for writers.
pub struct WriterRepo;

impl WriterRepo {
    pub async fn create(pool: &PgPool, input: &CreateWriter) -> Result<Writer, sqlx::Error> {
        let query = format!(
            "INSERT INTO writers (name, avatar_url, avatar_asset_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Writer>(&query)
            .bind(&input.name)
            .bind(&input.avatar_url)
            .bind(&input.avatar_asset_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Writer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM writers WHERE id = $1");
        sqlx::query_as::<_, Writer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Paginated listing, newest first.
    pub async fn list(pool: &PgPool, limit: i64, skip: i64) -> Result<Vec<Writer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM writers
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Writer>(&query)
            .bind(limit)
            .bind(skip)
            .fetch_all(pool)
            .await
    }

    pub async fn latest(pool: &PgPool, limit: i64) -> Result<Vec<Writer>, sqlx::Error> {
        Self::list(pool, limit, 0).await
    }

    /// Case-insensitive, unanchored substring search on name.
    pub async fn search(pool: &PgPool, name: &str) -> Result<Vec<Writer>, sqlx::Error> {
        let pattern = format!("%{}%", escape_like(name));
        let query = format!(
            "SELECT {COLUMNS} FROM writers
             WHERE name ILIKE $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Writer>(&query)
            .bind(&pattern)
            .fetch_all(pool)
            .await
    }

    /// Update a writer. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWriter,
    ) -> Result<Option<Writer>, sqlx::Error> {
        let query = format!(
            "UPDATE writers SET
                name = COALESCE($2, name),
                avatar_url = COALESCE($3, avatar_url),
                avatar_asset_id = COALESCE($4, avatar_asset_id),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Writer>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.avatar_url)
            .bind(&input.avatar_asset_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a writer. Movie writer references cascade away.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM writers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM writers")
            .fetch_one(pool)
            .await
    }
}
