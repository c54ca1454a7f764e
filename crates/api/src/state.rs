use std::sync::Arc;

use reelbase_cloud::AssetStore;

use crate::config::ServerConfig;
use crate::mailer::Mailer;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: reelbase_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// External asset store for posters, trailers, and avatars.
    pub assets: Arc<dyn AssetStore>,
    /// SMTP mailer; `None` when email delivery is not configured.
    pub mailer: Option<Arc<Mailer>>,
}
