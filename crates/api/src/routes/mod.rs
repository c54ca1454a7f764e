pub mod actors;
pub mod auth;
pub mod directors;
pub mod health;
pub mod movies;
pub mod reviews;
pub mod user;
pub mod writers;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                  register + email OTP (public)
/// /auth/signin                  login (public)
/// /auth/verify-email            consume OTP (public)
/// /auth/resend-verify-email     re-issue OTP (public)
/// /auth/forgot-password         email reset link (public)
/// /auth/is-valid-token          check reset token (public)
/// /auth/reset-password          consume reset token (public)
/// /auth/me                      profile + fresh token (auth)
///
/// /user/me                      profile (auth)
///
/// /actors                       list (admin), create (admin)
/// /actors/search                substring search (public)
/// /actors/latest                newest 12 (public)
/// /actors/{id}                  get (public), update/delete (admin)
///
/// /directors, /writers          same shape as /actors
///
/// /movies                       list (admin), create (admin)
/// /movies/upload-trailer        trailer upload (admin)
/// /movies/latest                newest 6 (admin)
/// /movies/latest-public         newest public uploads (public)
/// /movies/search                substring search (admin)
/// /movies/search-public         public substring search (public)
/// /movies/top-rated             top five by review count (public)
/// /movies/app-info              catalog counters (admin)
/// /movies/most-rated            top five, no posters (admin)
/// /movies/{id}                  get (public), update/delete (admin)
/// /movies/{id}/poster           replace poster (admin)
/// /movies/{id}/related          related by tag (public)
/// /movies/{id}/reviews          reviews with owners (public)
///
/// /reviews                      create (auth)
/// /reviews/{id}                 get (auth), update (owner), delete (owner|admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication and account lifecycle.
        .nest("/auth", auth::router())
        // Current-user profile.
        .nest("/user", user::router())
        // Catalog people.
        .nest("/actors", actors::router())
        .nest("/directors", directors::router())
        .nest("/writers", writers::router())
        // Movies (also hosts the per-movie review listing).
        .nest("/movies", movies::router())
        // Reviews.
        .nest("/reviews", reviews::router())
}
