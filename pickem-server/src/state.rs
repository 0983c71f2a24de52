//! Application state shared across all request handlers.

use pickem_core::events::HeadlineRefreshSender;
use sqlx::PgPool;

/// Application state that is shared across all request handlers.
///
/// Cloneable and cheap to pass around.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: PgPool,
    /// Hands refresh requests to the headline importer.
    pub refresh_tx: HeadlineRefreshSender,
    /// Default row cap for headline listings.
    pub headline_limit: i64,
}

impl AppState {
    /// Create a new AppState.
    pub fn new(db: PgPool, refresh_tx: HeadlineRefreshSender, headline_limit: i64) -> Self {
        Self {
            db,
            refresh_tx,
            headline_limit,
        }
    }
}
