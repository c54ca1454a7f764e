//! Read-only rating statistics derived from review data.
//!
//! Nothing here is stored on the movie: averages and counts are computed at
//! query time, which is fine at catalog scale and keeps reviews the single
//! source of truth.

use reelbase_core::types::DbId;
use sqlx::PgPool;

use crate::models::movie::MovieCard;
use crate::models::review::RatingAggregate;

/// Hard cap on related and top-rated listings.
const LISTING_CAP: i64 = 5;

/// Row shape for the aggregate query.
#[derive(sqlx::FromRow)]
struct AvgRow {
    avg: Option<f64>,
    cnt: i64,
}

/// Provides rating aggregation queries.
pub struct RatingRepo;

impl RatingRepo {
    /// Average rating and review count for one movie.
    ///
    /// Returns `None` when the movie has no reviews -- absence of an
    /// aggregate is distinct from an average of zero.
    pub async fn average_for_movie(
        pool: &PgPool,
        movie_id: DbId,
    ) -> Result<Option<RatingAggregate>, sqlx::Error> {
        let row = sqlx::query_as::<_, AvgRow>(
            "SELECT AVG(rating)::float8 AS avg, COUNT(*) AS cnt
             FROM reviews
             WHERE movie_id = $1",
        )
        .bind(movie_id)
        .fetch_one(pool)
        .await?;

        match row.avg {
            Some(avg) if row.cnt > 0 => Ok(Some(RatingAggregate {
                rating_average: format!("{avg:.1}"),
                review_count: row.cnt,
            })),
            _ => Ok(None),
        }
    }

    /// Up to five movies sharing at least one tag with the given movie,
    /// excluding the movie itself. Ordering beyond the cap is store-default.
    pub async fn related_by_tags(
        pool: &PgPool,
        movie_id: DbId,
        tags: &[String],
    ) -> Result<Vec<MovieCard>, sqlx::Error> {
        sqlx::query_as::<_, MovieCard>(
            "SELECT id, title, poster_url AS poster, poster_responsive AS responsive_posters
             FROM movies
             WHERE tags && $1 AND id <> $2
             LIMIT $3",
        )
        .bind(tags)
        .bind(movie_id)
        .bind(LISTING_CAP)
        .fetch_all(pool)
        .await
    }

    /// Up to five public movies that have at least one review, optionally
    /// filtered by kind, ordered by review count descending.
    pub async fn top_rated(
        pool: &PgPool,
        kind: Option<&str>,
    ) -> Result<Vec<MovieCard>, sqlx::Error> {
        match kind {
            Some(kind) => {
                sqlx::query_as::<_, MovieCard>(
                    "SELECT m.id, m.title, m.poster_url AS poster,
                            m.poster_responsive AS responsive_posters
                     FROM movies m
                     JOIN reviews r ON r.movie_id = m.id
                     WHERE m.status = 'public' AND m.kind = $1
                     GROUP BY m.id
                     ORDER BY COUNT(r.id) DESC
                     LIMIT $2",
                )
                .bind(kind)
                .bind(LISTING_CAP)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, MovieCard>(
                    "SELECT m.id, m.title, m.poster_url AS poster,
                            m.poster_responsive AS responsive_posters
                     FROM movies m
                     JOIN reviews r ON r.movie_id = m.id
                     WHERE m.status = 'public'
                     GROUP BY m.id
                     ORDER BY COUNT(r.id) DESC
                     LIMIT $1",
                )
                .bind(LISTING_CAP)
                .fetch_all(pool)
                .await
            }
        }
    }
}
