//! Shared response envelope types for API handlers.

use serde::Serialize;

/// Paginated listing envelope: one page of results plus the total count.
#[derive(Debug, Serialize)]
pub struct PageResponse<T: Serialize> {
    pub result: Vec<T>,
    pub count: i64,
}

/// Simple `{ "message": ... }` acknowledgement for deletes and mail sends.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
