//! Route definitions for the `/actors` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::actors;
use crate::state::AppState;

/// Routes mounted at `/actors`.
///
/// ```text
/// GET    /          -> list_actors (admin)
/// POST   /          -> create_actor (admin)
/// GET    /search    -> search_actors
/// GET    /latest    -> latest_actors
/// GET    /{id}      -> get_actor
/// PATCH  /{id}      -> update_actor (admin)
/// DELETE /{id}      -> delete_actor (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(actors::list_actors).post(actors::create_actor))
        .route("/search", get(actors::search_actors))
        .route("/latest", get(actors::latest_actors))
        .route(
            "/{id}",
            get(actors::get_actor)
                .patch(actors::update_actor)
                .delete(actors::delete_actor),
        )
}
