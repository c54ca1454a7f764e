//! Handlers for the `/reviews` resource.
//!
//! Creation is open to any authenticated user but capped at one review per
//! (owner, movie) pair by the store's unique constraint. Updates go through
//! the central access policy (owner only); deletes also admit admins. An
//! ownership mismatch answers 401, never 404.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use reelbase_core::error::CoreError;
use reelbase_core::policy::{authorize, Action};
use reelbase_core::types::DbId;
use reelbase_db::models::review::{CreateReview, Review, ReviewWithOwner, UpdateReview};
use reelbase_db::repositories::{MovieRepo, ReviewRepo};
use serde::{Deserialize, Serialize};

use crate::error::{conflict_on_unique, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Lowest accepted rating.
const RATING_MIN: i32 = 1;

/// Highest accepted rating.
const RATING_MAX: i32 = 10;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /reviews`.
#[derive(Debug, Deserialize)]
pub struct AddReviewRequest {
    pub movie_id: DbId,
    pub rating: i32,
    #[serde(default)]
    pub content: String,
}

/// Request body for `PATCH /reviews/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateReviewRequest {
    pub rating: Option<i32>,
    pub content: Option<String>,
}

/// Response for review deletion.
#[derive(Debug, Serialize)]
pub struct DeleteReviewResponse {
    pub message: String,
    /// Remaining review count on the parent movie.
    pub reviews_count: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/reviews
///
/// Add a review. A second review on the same movie by the same caller is a
/// conflict.
pub async fn add_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<AddReviewRequest>,
) -> AppResult<(StatusCode, Json<Review>)> {
    validate_rating(input.rating)?;

    // The movie must exist before a review can point at it.
    MovieRepo::find_by_id(&state.pool, input.movie_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: input.movie_id,
        }))?;

    let create = CreateReview {
        owner_id: auth.user_id,
        movie_id: input.movie_id,
        rating: input.rating,
        content: input.content,
    };
    let review = ReviewRepo::create(&state.pool, &create)
        .await
        .map_err(|e| {
            conflict_on_unique(
                e,
                "uq_reviews_owner_movie",
                "You have already reviewed this movie",
            )
        })?;

    tracing::info!(
        review_id = review.id,
        movie_id = review.movie_id,
        user_id = auth.user_id,
        "Review added"
    );

    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /api/v1/reviews/{id}
pub async fn get_review(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(review_id): Path<DbId>,
) -> AppResult<Json<Review>> {
    let review = ReviewRepo::find_by_id(&state.pool, review_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id: review_id,
        }))?;
    Ok(Json(review))
}

/// PATCH /api/v1/reviews/{id}
///
/// Update rating/content. Owner only.
pub async fn update_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(review_id): Path<DbId>,
    Json(input): Json<UpdateReviewRequest>,
) -> AppResult<Json<Review>> {
    if let Some(rating) = input.rating {
        validate_rating(rating)?;
    }

    let review = ReviewRepo::find_by_id(&state.pool, review_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id: review_id,
        }))?;

    authorize(
        &auth.caller(),
        Action::UpdateReview {
            owner_id: review.owner_id,
        },
    )?;

    let update = UpdateReview {
        rating: input.rating,
        content: input.content,
    };
    let review = ReviewRepo::update(&state.pool, review_id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id: review_id,
        }))?;

    tracing::info!(review_id, user_id = auth.user_id, "Review updated");

    Ok(Json(review))
}

/// DELETE /api/v1/reviews/{id}
///
/// Delete a review. Owner or admin.
pub async fn delete_review(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(review_id): Path<DbId>,
) -> AppResult<Json<DeleteReviewResponse>> {
    let review = ReviewRepo::find_by_id(&state.pool, review_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Review",
            id: review_id,
        }))?;

    authorize(
        &auth.caller(),
        Action::DeleteReview {
            owner_id: review.owner_id,
        },
    )?;

    ReviewRepo::delete(&state.pool, review_id).await?;

    let reviews_count = ReviewRepo::count_for_movie(&state.pool, review.movie_id).await?;

    tracing::info!(review_id, user_id = auth.user_id, "Review deleted");

    Ok(Json(DeleteReviewResponse {
        message: "Review deleted".to_string(),
        reviews_count,
    }))
}

/// GET /api/v1/movies/{movie_id}/reviews
///
/// All reviews for a movie with each owner's public identity.
pub async fn reviews_for_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<DbId>,
) -> AppResult<Json<Vec<ReviewWithOwner>>> {
    MovieRepo::find_by_id(&state.pool, movie_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Movie",
            id: movie_id,
        }))?;

    let reviews = ReviewRepo::list_for_movie(&state.pool, movie_id).await?;
    Ok(Json(reviews))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_rating(rating: i32) -> Result<(), AppError> {
    if !(RATING_MIN..=RATING_MAX).contains(&rating) {
        return Err(AppError::ValidationErrors(vec![format!(
            "Rating must be a number between {RATING_MIN} and {RATING_MAX}"
        )]));
    }
    Ok(())
}
