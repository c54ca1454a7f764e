//! Route definitions for the `/reviews` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reviews;
use crate::state::AppState;

/// Routes mounted at `/reviews`.
///
/// ```text
/// POST   /       -> add_review (auth)
/// GET    /{id}   -> get_review (auth)
/// PATCH  /{id}   -> update_review (owner)
/// DELETE /{id}   -> delete_review (owner or admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(reviews::add_review))
        .route(
            "/{id}",
            get(reviews::get_review)
                .patch(reviews::update_review)
                .delete(reviews::delete_review),
        )
}
