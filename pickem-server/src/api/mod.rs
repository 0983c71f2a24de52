//! HTTP API surface.

pub mod headlines;

use crate::state::AppState;
use axum::Router;

/// Build the API router.
pub fn router() -> Router<AppState> {
    headlines::router()
}
