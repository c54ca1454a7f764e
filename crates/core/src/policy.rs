//! Central access policy.
//!
//! Every handler that mutates a resource consults [`authorize`] with the
//! resolved caller and the attempted action, instead of scattering role and
//! ownership checks per resource.
//!
//! All violations surface as [`CoreError::Unauthorized`] (HTTP 401). An
//! ownership mismatch is deliberately NOT reported as not-found; clients
//! must be able to distinguish "exists but not yours" from "does not exist".

use crate::error::CoreError;
use crate::roles::ROLE_ADMIN;
use crate::types::DbId;

/// The authenticated identity an action is evaluated against.
#[derive(Debug, Clone)]
pub struct Caller {
    pub id: DbId,
    pub role: String,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// An attempted mutation, carrying whatever ownership context it needs.
#[derive(Debug, Clone, Copy)]
pub enum Action {
    /// Create/update/delete a catalog resource (movie, actor, director,
    /// writer). Admin only.
    MutateCatalog,
    /// Update a review. Owner only; admins get no special treatment here.
    UpdateReview { owner_id: DbId },
    /// Delete a review. Owner, or any admin.
    DeleteReview { owner_id: DbId },
}

/// Decide whether `caller` may perform `action`.
pub fn authorize(caller: &Caller, action: Action) -> Result<(), CoreError> {
    match action {
        Action::MutateCatalog => {
            if caller.is_admin() {
                Ok(())
            } else {
                Err(CoreError::Unauthorized("Admin role required".into()))
            }
        }
        Action::UpdateReview { owner_id } => {
            if caller.id == owner_id {
                Ok(())
            } else {
                Err(CoreError::Unauthorized(
                    "Only the review owner may update it".into(),
                ))
            }
        }
        Action::DeleteReview { owner_id } => {
            if caller.id == owner_id || caller.is_admin() {
                Ok(())
            } else {
                Err(CoreError::Unauthorized(
                    "Only the review owner or an admin may delete it".into(),
                ))
            }
        }
    }
}
