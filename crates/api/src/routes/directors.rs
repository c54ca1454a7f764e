//! Route definitions for the `/directors` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::directors;
use crate::state::AppState;

/// Routes mounted at `/directors`. Same shape as `/actors`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(directors::list_directors).post(directors::create_director),
        )
        .route("/search", get(directors::search_directors))
        .route("/latest", get(directors::latest_directors))
        .route(
            "/{id}",
            get(directors::get_director)
                .patch(directors::update_director)
                .delete(directors::delete_director),
        )
}
