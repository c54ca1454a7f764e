//! Route definitions for the `/movies` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{movies, reviews};
use crate::state::AppState;

/// Routes mounted at `/movies`.
///
/// ```text
/// GET    /                 -> list_movies (admin)
/// POST   /                 -> create_movie (admin)
/// POST   /upload-trailer   -> upload_trailer (admin)
/// GET    /latest           -> latest_movies (admin)
/// GET    /latest-public    -> latest_public_movies
/// GET    /search           -> search_movies (admin)
/// GET    /search-public    -> search_public_movies
/// GET    /top-rated        -> top_rated_movies
/// GET    /app-info         -> app_info (admin)
/// GET    /most-rated       -> most_rated_movies (admin)
/// GET    /{id}             -> get_movie
/// PATCH  /{id}             -> update_movie (admin)
/// DELETE /{id}             -> delete_movie (admin)
/// PATCH  /{id}/poster      -> update_movie_poster (admin)
/// GET    /{id}/related     -> related_movies
/// GET    /{id}/reviews     -> reviews_for_movie
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(movies::list_movies).post(movies::create_movie))
        .route("/upload-trailer", post(movies::upload_trailer))
        .route("/latest", get(movies::latest_movies))
        .route("/latest-public", get(movies::latest_public_movies))
        .route("/search", get(movies::search_movies))
        .route("/search-public", get(movies::search_public_movies))
        .route("/top-rated", get(movies::top_rated_movies))
        .route("/app-info", get(movies::app_info))
        .route("/most-rated", get(movies::most_rated_movies))
        .route(
            "/{id}",
            get(movies::get_movie)
                .patch(movies::update_movie)
                .delete(movies::delete_movie),
        )
        .route("/{id}/poster", patch(movies::update_movie_poster))
        .route("/{id}/related", get(movies::related_movies))
        .route("/{id}/reviews", get(reviews::reviews_for_movie))
}
