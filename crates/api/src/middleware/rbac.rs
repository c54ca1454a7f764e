//! Role-gating extractor for catalog mutation routes.
//!
//! Wraps [`AuthUser`] and consults the central access policy. Rejections are
//! 401 Unauthorized: the service contract has no 403, and an insufficient
//! role is reported the same way as a missing credential.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use reelbase_core::policy::{authorize, Action};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role (catalog mutation).
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        authorize(&user.caller(), Action::MutateCatalog)?;
        Ok(RequireAdmin(user))
    }
}
