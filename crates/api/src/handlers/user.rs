//! Handlers for the `/user` resource.

use axum::extract::State;
use axum::Json;
use reelbase_core::error::CoreError;
use reelbase_db::models::user::UserResponse;
use reelbase_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/user/me
///
/// Current user's public profile.
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    Ok(Json(UserResponse::from(&user)))
}
