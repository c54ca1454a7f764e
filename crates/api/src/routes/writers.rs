//! Route definitions for the `/writers` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::writers;
use crate::state::AppState;

/// Routes mounted at `/writers`. Same shape as `/actors`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(writers::list_writers).post(writers::create_writer))
        .route("/search", get(writers::search_writers))
        .route("/latest", get(writers::latest_writers))
        .route(
            "/{id}",
            get(writers::get_writer)
                .patch(writers::update_writer)
                .delete(writers::delete_writer),
        )
}
