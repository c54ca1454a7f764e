//! Handlers for the `/movies` resource.
//!
//! Movie creation is a multipart form: scalar fields arrive as text parts,
//! list-shaped fields (`genres`, `tags`, `cast`, `writers`, `trailer`) as
//! JSON-encoded text parts, and the poster as the file part. The trailer is
//! uploaded separately beforehand via `upload_trailer` and referenced by
//! url + asset id.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use reelbase_cloud::AssetKind;
use reelbase_core::error::CoreError;
use reelbase_core::genres::is_valid_genre;
use reelbase_core::types::DbId;
use reelbase_db::models::movie::{
    CastEntryInput, CreateMovie, Movie, MovieCard, MovieDetail, PosterAsset, UpdateMovie,
};
use reelbase_db::models::review::RatingAggregate;
use reelbase_db::repositories::{MovieRepo, RatingRepo, ReviewRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::error::{conflict_on_unique, AppError, AppResult};
use crate::handlers::multipart::parse_form;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{LimitParams, PaginationParams, TitleSearchParams};
use crate::response::{MessageResponse, PageResponse};
use crate::state::AppState;

/// Number of entries returned by the admin latest-uploads listing.
const ADMIN_LATEST_LIMIT: i64 = 6;

/// Default number of entries on the public latest-uploads listing.
const PUBLIC_LATEST_DEFAULT: i64 = 6;

/// Accepted movie status values.
const STATUSES: &[&str] = &["public", "private"];

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// One cast entry as sent by clients.
#[derive(Debug, Clone, Deserialize)]
pub struct CastInput {
    pub actor_id: DbId,
    pub role_as: String,
    #[serde(default)]
    pub lead_actor: bool,
}

/// Trailer reference as sent by clients (already uploaded).
#[derive(Debug, Clone, Deserialize)]
pub struct TrailerInput {
    pub url: String,
    pub asset_id: String,
}

/// Request body for `PATCH /movies/{id}`. Absent fields keep their stored
/// value; present lists replace the stored lists wholesale.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateMovieRequest {
    pub title: Option<String>,
    pub story_line: Option<String>,
    pub director_id: Option<DbId>,
    pub release_date: Option<NaiveDate>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub language: Option<String>,
    pub genres: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub trailer: Option<TrailerInput>,
    pub cast: Option<Vec<CastInput>>,
    pub writers: Option<Vec<DbId>>,
}

/// Response for `POST /movies/upload-trailer`.
#[derive(Debug, Serialize)]
pub struct TrailerUploadResponse {
    pub url: String,
    pub asset_id: String,
}

/// Response for `POST /movies`.
#[derive(Debug, Serialize)]
pub struct CreateMovieResponse {
    pub id: DbId,
    pub title: String,
}

/// Response for movie updates: acknowledgement plus the stored row.
#[derive(Debug, Serialize)]
pub struct UpdateMovieResponse {
    pub message: String,
    pub movie: Movie,
}

/// Rating statistics embedded in movie responses.
///
/// Serializes to `{}` when the movie has no reviews; absence of an average
/// is not the same thing as an average of zero.
#[derive(Debug, Serialize)]
pub struct ReviewStats {
    #[serde(flatten)]
    pub aggregate: Option<RatingAggregate>,
}

/// Full movie detail returned by `GET /movies/{id}`.
#[derive(Debug, Serialize)]
pub struct MovieResponse {
    #[serde(flatten)]
    pub detail: MovieDetail,
    pub reviews: ReviewStats,
}

/// Related/top-rated listing entry with its rating aggregate.
#[derive(Debug, Serialize)]
pub struct MovieCardResponse {
    pub id: DbId,
    pub title: String,
    pub poster: String,
    pub responsive_posters: Vec<String>,
    pub reviews: ReviewStats,
}

/// Public latest-uploads entry.
#[derive(Debug, Serialize)]
pub struct LatestPublicItem {
    pub id: DbId,
    pub title: String,
    pub story_line: String,
    pub poster: String,
    pub responsive_posters: Vec<String>,
    pub trailer: String,
}

/// Public search result entry.
#[derive(Debug, Serialize)]
pub struct SearchPublicItem {
    pub id: DbId,
    pub title: String,
    pub poster: String,
}

/// Catalog-wide counters for the admin dashboard.
#[derive(Debug, Serialize)]
pub struct AppInfoResponse {
    pub movies: i64,
    pub reviews: i64,
    pub users: i64,
}

/// Most-rated listing entry (no poster projection).
#[derive(Debug, Serialize)]
pub struct MostRatedItem {
    pub id: DbId,
    pub title: String,
    pub reviews: ReviewStats,
}

/// Query parameters for `GET /movies/top-rated`.
#[derive(Debug, Deserialize)]
pub struct TopRatedParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

// ---------------------------------------------------------------------------
// Mutation handlers (admin only)
// ---------------------------------------------------------------------------

/// POST /api/v1/movies/upload-trailer
///
/// Upload the trailer video ahead of movie creation.
pub async fn upload_trailer(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<TrailerUploadResponse>)> {
    let form = parse_form(multipart, "video").await?;

    let Some(file) = form.file else {
        return Err(AppError::BadRequest("No file uploaded".into()));
    };

    let uploaded = state.assets.upload_video(file.data, &file.filename).await?;

    tracing::info!(
        asset_id = %uploaded.asset_id,
        user_id = admin.user_id,
        "Trailer uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(TrailerUploadResponse {
            url: uploaded.url,
            asset_id: uploaded.asset_id,
        }),
    ))
}

/// POST /api/v1/movies
///
/// Create a movie from a multipart form with a required poster file.
pub async fn create_movie(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<CreateMovieResponse>)> {
    let form = parse_form(multipart, "poster").await?;

    let mut errors = Vec::new();

    let title = form.text("title");
    if title.is_none() {
        errors.push("Please provide a title".to_string());
    }
    let story_line = form.text("story_line");
    if story_line.is_none() {
        errors.push("Please provide a story line".to_string());
    }
    let language = form.text("language");
    if language.is_none() {
        errors.push("Please provide a language".to_string());
    }
    let kind = form.text("type");
    if kind.is_none() {
        errors.push("Please provide a type".to_string());
    }

    let release_date = match form.text("release_date") {
        Some(raw) => match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.push("Please provide a valid release date (YYYY-MM-DD)".to_string());
                None
            }
        },
        None => {
            errors.push("Please provide a release date".to_string());
            None
        }
    };

    let status = form.text("status");
    match &status {
        Some(s) if STATUSES.contains(&s.as_str()) => {}
        _ => errors.push("Status must be 'public' or 'private'".to_string()),
    }

    let genres: Vec<String> = form.json("genres")?.unwrap_or_default();
    for genre in &genres {
        if !is_valid_genre(genre) {
            errors.push(format!("Invalid genre '{genre}'"));
        }
    }

    let tags: Vec<String> = form.json("tags")?.unwrap_or_default();
    if tags.is_empty() || tags.iter().any(|t| t.trim().is_empty()) {
        errors.push("Please provide at least one non-empty tag".to_string());
    }

    let cast: Vec<CastInput> = form.json("cast")?.unwrap_or_default();
    if cast.iter().any(|entry| entry.role_as.trim().is_empty()) {
        errors.push("Every cast entry needs a role".to_string());
    }

    let writers: Vec<DbId> = form.json("writers")?.unwrap_or_default();

    let trailer: Option<TrailerInput> = form.json("trailer")?;
    match &trailer {
        Some(t) if !t.url.trim().is_empty() && !t.asset_id.trim().is_empty() => {
            if !t.url.starts_with("http") {
                errors.push("Invalid trailer url".to_string());
            }
        }
        _ => errors.push("Please provide a trailer with url and asset id".to_string()),
    }

    if form.file.is_none() {
        errors.push("Please provide a poster".to_string());
    }

    if !errors.is_empty() {
        return Err(AppError::ValidationErrors(errors));
    }

    let director_id = form.text("director_id").and_then(|v| v.parse().ok());

    // The validation pass above guarantees every required piece is present.
    let (
        Some(title),
        Some(story_line),
        Some(release_date),
        Some(status),
        Some(kind),
        Some(language),
        Some(trailer),
        Some(file),
    ) = (
        title, story_line, release_date, status, kind, language, trailer, form.file,
    )
    else {
        return Err(AppError::InternalError(
            "Movie form validation let a missing field through".to_string(),
        ));
    };

    let poster = state.assets.upload_image(file.data, &file.filename).await?;

    let input = CreateMovie {
        title,
        story_line,
        director_id,
        release_date,
        status,
        kind,
        language,
        genres,
        tags,
        poster: PosterAsset {
            url: poster.url,
            asset_id: poster.asset_id,
            responsive: poster.responsive,
        },
        trailer_url: trailer.url,
        trailer_asset_id: trailer.asset_id,
        cast: cast.into_iter().map(cast_entry).collect(),
        writer_ids: writers,
    };

    let movie = MovieRepo::create(&state.pool, &input).await.map_err(|e| {
        conflict_on_unique(e, "uq_movies_title", "A movie with this title already exists")
    })?;

    tracing::info!(movie_id = movie.id, user_id = admin.user_id, "Movie created");

    Ok((
        StatusCode::CREATED,
        Json(CreateMovieResponse {
            id: movie.id,
            title: movie.title,
        }),
    ))
}

/// PATCH /api/v1/movies/{id}
///
/// Update movie fields without touching the poster.
pub async fn update_movie(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(movie_id): Path<DbId>,
    Json(input): Json<UpdateMovieRequest>,
) -> AppResult<Json<UpdateMovieResponse>> {
    let mut errors = Vec::new();

    if let Some(status) = &input.status {
        if !STATUSES.contains(&status.as_str()) {
            errors.push("Status must be 'public' or 'private'".to_string());
        }
    }
    if let Some(genres) = &input.genres {
        for genre in genres {
            if !is_valid_genre(genre) {
                errors.push(format!("Invalid genre '{genre}'"));
            }
        }
    }
    if let Some(tags) = &input.tags {
        if tags.is_empty() || tags.iter().any(|t| t.trim().is_empty()) {
            errors.push("Please provide at least one non-empty tag".to_string());
        }
    }
    if let Some(cast) = &input.cast {
        if cast.iter().any(|entry| entry.role_as.trim().is_empty()) {
            errors.push("Every cast entry needs a role".to_string());
        }
    }
    if !errors.is_empty() {
        return Err(AppError::ValidationErrors(errors));
    }

    let update = UpdateMovie {
        title: input.title,
        story_line: input.story_line,
        director_id: input.director_id,
        release_date: input.release_date,
        status: input.status,
        kind: input.kind,
        language: input.language,
        genres: input.genres,
        tags: input.tags,
        trailer_url: input.trailer.as_ref().map(|t| t.url.clone()),
        trailer_asset_id: input.trailer.as_ref().map(|t| t.asset_id.clone()),
        cast: input
            .cast
            .map(|cast| cast.into_iter().map(cast_entry).collect()),
        writer_ids: input.writers,
    };

    let movie = MovieRepo::update(&state.pool, movie_id, &update)
        .await
        .map_err(|e| {
            conflict_on_unique(e, "uq_movies_title", "A movie with this title already exists")
        })?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: movie_id,
        }))?;

    tracing::info!(movie_id, user_id = admin.user_id, "Movie updated");

    Ok(Json(UpdateMovieResponse {
        message: "Movie updated successfully".to_string(),
        movie,
    }))
}

/// PATCH /api/v1/movies/{id}/poster
///
/// Replace the poster. The old asset is destroyed only after the new file
/// has been received; a destroy the store does not acknowledge aborts the
/// update.
pub async fn update_movie_poster(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(movie_id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<UpdateMovieResponse>> {
    let movie = MovieRepo::find_by_id(&state.pool, movie_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: movie_id,
        }))?;

    let form = parse_form(multipart, "poster").await?;
    let Some(file) = form.file else {
        return Err(AppError::BadRequest("No file uploaded".into()));
    };

    state
        .assets
        .destroy(&movie.poster_asset_id, AssetKind::Image)
        .await?;

    let uploaded = state.assets.upload_image(file.data, &file.filename).await?;
    let poster = PosterAsset {
        url: uploaded.url,
        asset_id: uploaded.asset_id,
        responsive: uploaded.responsive,
    };

    let movie = MovieRepo::set_poster(&state.pool, movie_id, &poster)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: movie_id,
        }))?;

    tracing::info!(movie_id, user_id = admin.user_id, "Movie poster replaced");

    Ok(Json(UpdateMovieResponse {
        message: "Movie updated successfully".to_string(),
        movie,
    }))
}

/// DELETE /api/v1/movies/{id}
///
/// Destroy both assets, then delete the document. Reviews, cast entries,
/// and writer references go with it.
pub async fn delete_movie(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(movie_id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let movie = MovieRepo::find_by_id(&state.pool, movie_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: movie_id,
        }))?;

    state
        .assets
        .destroy(&movie.poster_asset_id, AssetKind::Image)
        .await?;
    state
        .assets
        .destroy(&movie.trailer_asset_id, AssetKind::Video)
        .await?;

    MovieRepo::delete(&state.pool, movie_id).await?;

    tracing::info!(movie_id, user_id = admin.user_id, "Movie deleted");

    Ok(Json(MessageResponse::new("Movie deleted successfully")))
}

// ---------------------------------------------------------------------------
// Read handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/movies?page_no=&limit=
///
/// Paginated admin listing with cast/writers/director resolved.
pub async fn list_movies(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<PageResponse<MovieDetail>>> {
    let rows = MovieRepo::list(&state.pool, params.limit(), params.skip()).await?;
    let count = MovieRepo::count(&state.pool).await?;

    let mut result = Vec::with_capacity(rows.len());
    for movie in rows {
        result.push(MovieRepo::hydrate(&state.pool, movie).await?);
    }

    Ok(Json(PageResponse { result, count }))
}

/// GET /api/v1/movies/latest
///
/// The six newest uploads, any status (admin dashboard).
pub async fn latest_movies(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<PageResponse<MovieDetail>>> {
    let rows = MovieRepo::latest(&state.pool, ADMIN_LATEST_LIMIT).await?;
    let count = MovieRepo::count(&state.pool).await?;

    let mut result = Vec::with_capacity(rows.len());
    for movie in rows {
        result.push(MovieRepo::hydrate(&state.pool, movie).await?);
    }

    Ok(Json(PageResponse { result, count }))
}

/// GET /api/v1/movies/latest-public?limit=
///
/// The newest public uploads, projected for the landing page.
pub async fn latest_public_movies(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<Vec<LatestPublicItem>>> {
    let limit = params.limit.unwrap_or(PUBLIC_LATEST_DEFAULT).clamp(1, 50);
    let rows = MovieRepo::latest_public(&state.pool, limit).await?;

    let movies = rows
        .into_iter()
        .map(|movie| LatestPublicItem {
            id: movie.id,
            title: movie.title,
            story_line: movie.story_line,
            poster: movie.poster_url,
            responsive_posters: movie.poster_responsive,
            trailer: movie.trailer_url,
        })
        .collect();

    Ok(Json(movies))
}

/// GET /api/v1/movies/search?title=
///
/// Admin substring search over all statuses.
pub async fn search_movies(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<TitleSearchParams>,
) -> AppResult<Json<Vec<Movie>>> {
    if params.title.trim().is_empty() {
        return Err(AppError::BadRequest("Invalid request".into()));
    }
    let result = MovieRepo::search(&state.pool, params.title.trim(), false).await?;
    Ok(Json(result))
}

/// GET /api/v1/movies/search-public?title=
///
/// Public substring search over public movies only.
pub async fn search_public_movies(
    State(state): State<AppState>,
    Query(params): Query<TitleSearchParams>,
) -> AppResult<Json<Vec<SearchPublicItem>>> {
    if params.title.trim().is_empty() {
        return Err(AppError::BadRequest("Invalid request".into()));
    }
    let result = MovieRepo::search(&state.pool, params.title.trim(), true).await?;

    let movies = result
        .into_iter()
        .map(|movie| SearchPublicItem {
            id: movie.id,
            title: movie.title,
            poster: movie.poster_url,
        })
        .collect();

    Ok(Json(movies))
}

/// GET /api/v1/movies/{id}
///
/// Full movie detail plus the rating aggregate (an empty object when no
/// reviews exist).
pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<DbId>,
) -> AppResult<Json<MovieResponse>> {
    let detail = MovieRepo::find_detail(&state.pool, movie_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: movie_id,
        }))?;

    let aggregate = RatingRepo::average_for_movie(&state.pool, movie_id).await?;

    Ok(Json(MovieResponse {
        detail,
        reviews: ReviewStats { aggregate },
    }))
}

/// GET /api/v1/movies/{id}/related
///
/// Up to five movies sharing a tag, each with its rating aggregate.
pub async fn related_movies(
    State(state): State<AppState>,
    Path(movie_id): Path<DbId>,
) -> AppResult<Json<Vec<MovieCardResponse>>> {
    let movie = MovieRepo::find_by_id(&state.pool, movie_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: movie_id,
        }))?;

    let cards = RatingRepo::related_by_tags(&state.pool, movie.id, &movie.tags).await?;
    let related = augment_with_ratings(&state, cards).await?;

    Ok(Json(related))
}

/// GET /api/v1/movies/top-rated?type=
///
/// Up to five public movies ranked by review count.
pub async fn top_rated_movies(
    State(state): State<AppState>,
    Query(params): Query<TopRatedParams>,
) -> AppResult<Json<Vec<MovieCardResponse>>> {
    let cards = RatingRepo::top_rated(&state.pool, params.kind.as_deref()).await?;
    let top = augment_with_ratings(&state, cards).await?;

    Ok(Json(top))
}

/// GET /api/v1/movies/app-info
///
/// Catalog-wide counters for the admin dashboard.
pub async fn app_info(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<AppInfoResponse>> {
    let movies = MovieRepo::count(&state.pool).await?;
    let reviews = ReviewRepo::count(&state.pool).await?;
    let users = UserRepo::count(&state.pool).await?;

    Ok(Json(AppInfoResponse {
        movies,
        reviews,
        users,
    }))
}

/// GET /api/v1/movies/most-rated
///
/// Top-rated listing without poster projection (admin dashboard).
pub async fn most_rated_movies(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<MostRatedItem>>> {
    let cards = RatingRepo::top_rated(&state.pool, None).await?;

    let mut result = Vec::with_capacity(cards.len());
    for card in cards {
        let aggregate = RatingRepo::average_for_movie(&state.pool, card.id).await?;
        result.push(MostRatedItem {
            id: card.id,
            title: card.title,
            reviews: ReviewStats { aggregate },
        });
    }

    Ok(Json(result))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn cast_entry(input: CastInput) -> CastEntryInput {
    CastEntryInput {
        actor_id: input.actor_id,
        role_as: input.role_as,
        lead_actor: input.lead_actor,
    }
}

/// Attach each card's rating aggregate.
async fn augment_with_ratings(
    state: &AppState,
    cards: Vec<MovieCard>,
) -> Result<Vec<MovieCardResponse>, AppError> {
    let mut result = Vec::with_capacity(cards.len());
    for card in cards {
        let aggregate = RatingRepo::average_for_movie(&state.pool, card.id).await?;
        result.push(MovieCardResponse {
            id: card.id,
            title: card.title,
            poster: card.poster,
            responsive_posters: card.responsive_posters,
            reviews: ReviewStats { aggregate },
        });
    }
    Ok(result)
}
