//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /signup               -> signup
/// POST /signin               -> signin
/// POST /verify-email         -> verify_email
/// POST /resend-verify-email  -> resend_verify_email
/// POST /forgot-password      -> forgot_password
/// POST /is-valid-token       -> is_valid_token
/// POST /reset-password       -> reset_password
/// GET  /me                   -> me (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/signin", post(auth::signin))
        .route("/verify-email", post(auth::verify_email))
        .route("/resend-verify-email", post(auth::resend_verify_email))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/is-valid-token", post(auth::is_valid_token))
        .route("/reset-password", post(auth::reset_password))
        .route("/me", get(auth::me))
}
