//! Repository for the `movies` table and its owned link tables
//! (`movie_cast`, `movie_writers`).
//!
//! Creating or updating a movie together with its cast/writer lists runs in
//! a single transaction, so a crash cannot leave a movie referencing half a
//! cast.

use reelbase_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::director::Director;
use crate::models::movie::{
    CastEntryInput, CastMember, CreateMovie, Movie, MovieDetail, PosterAsset, UpdateMovie,
    WriterRef,
};
use crate::repositories::actor_repo::escape_like;
use crate::repositories::director_repo::DirectorRepo;

const COLUMNS: &str = "\
    id, title, story_line, director_id, release_date, status, kind, language, \
    genres, tags, poster_url, poster_asset_id, poster_responsive, \
    trailer_url, trailer_asset_id, created_at, updated_at";

/// Provides CRUD operations for movies.
pub struct MovieRepo;

impl MovieRepo {
    /// Insert a movie with its cast and writer lists, in one transaction.
    ///
    /// A duplicate title violates `uq_movies_title`.
    pub async fn create(pool: &PgPool, input: &CreateMovie) -> Result<Movie, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO movies (title, story_line, director_id, release_date, status,
                                 kind, language, genres, tags,
                                 poster_url, poster_asset_id, poster_responsive,
                                 trailer_url, trailer_asset_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        let movie = sqlx::query_as::<_, Movie>(&query)
            .bind(&input.title)
            .bind(&input.story_line)
            .bind(input.director_id)
            .bind(input.release_date)
            .bind(&input.status)
            .bind(&input.kind)
            .bind(&input.language)
            .bind(&input.genres)
            .bind(&input.tags)
            .bind(&input.poster.url)
            .bind(&input.poster.asset_id)
            .bind(&input.poster.responsive)
            .bind(&input.trailer_url)
            .bind(&input.trailer_asset_id)
            .fetch_one(&mut *tx)
            .await?;

        insert_cast(&mut tx, movie.id, &input.cast).await?;
        insert_writers(&mut tx, movie.id, &input.writer_ids).await?;

        tx.commit().await?;
        Ok(movie)
    }

    /// Find a movie row by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM movies WHERE id = $1");
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a movie with cast, writers, and director resolved.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<MovieDetail>, sqlx::Error> {
        let Some(movie) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        Self::hydrate(pool, movie).await.map(Some)
    }

    /// Resolve cast, writers, and director for an already-fetched row.
    pub async fn hydrate(pool: &PgPool, movie: Movie) -> Result<MovieDetail, sqlx::Error> {
        let cast = Self::cast_for(pool, movie.id).await?;
        let writers = Self::writers_for(pool, movie.id).await?;
        let director: Option<Director> = match movie.director_id {
            Some(director_id) => DirectorRepo::find_by_id(pool, director_id).await?,
            None => None,
        };
        Ok(MovieDetail {
            movie,
            cast,
            writers,
            director,
        })
    }

    /// Ordered cast entries joined with their actors.
    pub async fn cast_for(pool: &PgPool, movie_id: DbId) -> Result<Vec<CastMember>, sqlx::Error> {
        sqlx::query_as::<_, CastMember>(
            "SELECT mc.id, mc.actor_id, a.name, a.avatar_url, mc.role_as, mc.lead_actor
             FROM movie_cast mc
             JOIN actors a ON a.id = mc.actor_id
             WHERE mc.movie_id = $1
             ORDER BY mc.position",
        )
        .bind(movie_id)
        .fetch_all(pool)
        .await
    }

    /// Ordered writer references joined with their writers.
    pub async fn writers_for(pool: &PgPool, movie_id: DbId) -> Result<Vec<WriterRef>, sqlx::Error> {
        sqlx::query_as::<_, WriterRef>(
            "SELECT w.id, w.name, w.avatar_url
             FROM movie_writers mw
             JOIN writers w ON w.id = mw.writer_id
             WHERE mw.movie_id = $1
             ORDER BY mw.position",
        )
        .bind(movie_id)
        .fetch_all(pool)
        .await
    }

    /// Paginated listing of all movies, newest first.
    pub async fn list(pool: &PgPool, limit: i64, skip: i64) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies
             ORDER BY created_at DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(limit)
            .bind(skip)
            .fetch_all(pool)
            .await
    }

    /// The most recently added movies, any status.
    pub async fn latest(pool: &PgPool, limit: i64) -> Result<Vec<Movie>, sqlx::Error> {
        Self::list(pool, limit, 0).await
    }

    /// The most recently added public movies.
    pub async fn latest_public(pool: &PgPool, limit: i64) -> Result<Vec<Movie>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM movies
             WHERE status = 'public'
             ORDER BY created_at DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Case-insensitive, unanchored substring search on title.
    pub async fn search(
        pool: &PgPool,
        title: &str,
        public_only: bool,
    ) -> Result<Vec<Movie>, sqlx::Error> {
        let pattern = format!("%{}%", escape_like(title));
        let query = if public_only {
            format!(
                "SELECT {COLUMNS} FROM movies
                 WHERE title ILIKE $1 AND status = 'public'
                 ORDER BY created_at DESC"
            )
        } else {
            format!(
                "SELECT {COLUMNS} FROM movies
                 WHERE title ILIKE $1
                 ORDER BY created_at DESC"
            )
        };
        sqlx::query_as::<_, Movie>(&query)
            .bind(&pattern)
            .fetch_all(pool)
            .await
    }

    /// Update a movie. Only non-`None` fields are applied; `Some` cast or
    /// writer lists replace the stored lists wholesale. Runs in one
    /// transaction.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateMovie,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE movies SET
                title = COALESCE($2, title),
                story_line = COALESCE($3, story_line),
                director_id = COALESCE($4, director_id),
                release_date = COALESCE($5, release_date),
                status = COALESCE($6, status),
                kind = COALESCE($7, kind),
                language = COALESCE($8, language),
                genres = COALESCE($9, genres),
                tags = COALESCE($10, tags),
                trailer_url = COALESCE($11, trailer_url),
                trailer_asset_id = COALESCE($12, trailer_asset_id),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let movie = sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.story_line)
            .bind(input.director_id)
            .bind(input.release_date)
            .bind(&input.status)
            .bind(&input.kind)
            .bind(&input.language)
            .bind(&input.genres)
            .bind(&input.tags)
            .bind(&input.trailer_url)
            .bind(&input.trailer_asset_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(movie) = movie else {
            tx.rollback().await?;
            return Ok(None);
        };

        if let Some(cast) = &input.cast {
            sqlx::query("DELETE FROM movie_cast WHERE movie_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_cast(&mut tx, id, cast).await?;
        }

        if let Some(writer_ids) = &input.writer_ids {
            sqlx::query("DELETE FROM movie_writers WHERE movie_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            insert_writers(&mut tx, id, writer_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(movie))
    }

    /// Replace the poster metadata as one unit.
    pub async fn set_poster(
        pool: &PgPool,
        id: DbId,
        poster: &PosterAsset,
    ) -> Result<Option<Movie>, sqlx::Error> {
        let query = format!(
            "UPDATE movies SET
                poster_url = $2,
                poster_asset_id = $3,
                poster_responsive = $4,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Movie>(&query)
            .bind(id)
            .bind(&poster.url)
            .bind(&poster.asset_id)
            .bind(&poster.responsive)
            .fetch_optional(pool)
            .await
    }

    /// Delete a movie. Cast entries, writer references, and reviews cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Total number of movies.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(pool)
            .await
    }
}

async fn insert_cast(
    tx: &mut Transaction<'_, Postgres>,
    movie_id: DbId,
    cast: &[CastEntryInput],
) -> Result<(), sqlx::Error> {
    for (position, entry) in cast.iter().enumerate() {
        sqlx::query(
            "INSERT INTO movie_cast (movie_id, actor_id, role_as, lead_actor, position)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(movie_id)
        .bind(entry.actor_id)
        .bind(&entry.role_as)
        .bind(entry.lead_actor)
        .bind(position as i32)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn insert_writers(
    tx: &mut Transaction<'_, Postgres>,
    movie_id: DbId,
    writer_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    for (position, writer_id) in writer_ids.iter().enumerate() {
        sqlx::query(
            "INSERT INTO movie_writers (movie_id, writer_id, position)
             VALUES ($1, $2, $3)",
        )
        .bind(movie_id)
        .bind(writer_id)
        .bind(position as i32)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
