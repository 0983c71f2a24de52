//! Headline API handlers.
//!
//! # Endpoints
//!
//! - `GET  /headlines/{league_id}` – up to N stored headlines for a league
//! - `POST /headlines/{sport_id}`  – trigger an RSS refresh for a sport

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use kanau::processor::Processor;
use pickem_core::entities::headline::{Headline, ListHeadlinesForLeague};
use pickem_core::entities::league::ListLeaguesBySport;
use pickem_core::events::HeadlineRefresh;
use pickem_core::framework::DatabaseProcessor;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::state::AppState;

/// Build the headlines router.
///
/// Both endpoints share the `/headlines/{id}` shape; the id is a league
/// for reads and a sport for refresh triggers.
pub fn router() -> Router<AppState> {
    Router::new().route("/headlines/{id}", get(list_headlines).post(refresh_headlines))
}

/// One stored headline in an API response.
#[derive(Debug, Serialize)]
struct HeadlineResponse {
    headline_id: i32,
    heading: String,
    story: String,
    link: String,
    #[serde(with = "time::serde::rfc3339")]
    pub_date: OffsetDateTime,
    league_id: i32,
}

/// Convert a `Headline` (DB model) into a `HeadlineResponse` (API model).
fn to_response(headline: &Headline) -> HeadlineResponse {
    HeadlineResponse {
        headline_id: headline.headline_id,
        heading: headline.heading.clone(),
        story: headline.story.clone(),
        link: headline.link.clone(),
        pub_date: headline.pub_date,
        league_id: headline.league_id,
    }
}

#[derive(Debug, Deserialize)]
struct ListParams {
    limit: Option<i64>,
}

/// `GET /headlines/{league_id}` – list stored headlines for a league.
///
/// Returns at most `limit` rows (defaulting from config), oldest
/// publication first; an empty result is a 404.
async fn list_headlines(
    State(state): State<AppState>,
    Path(league_id): Path<i32>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, HeadlinesApiError> {
    let processor = DatabaseProcessor {
        pool: state.db.clone(),
    };

    let limit = params.limit.unwrap_or(state.headline_limit).max(1);
    let headlines = processor
        .process(ListHeadlinesForLeague { league_id, limit })
        .await
        .map_err(HeadlinesApiError::Database)?;

    if headlines.is_empty() {
        return Err(HeadlinesApiError::NotFound);
    }

    let body: Vec<HeadlineResponse> = headlines.iter().map(to_response).collect();
    Ok(Json(body))
}

/// Refresh acknowledgment body.
#[derive(Debug, Serialize)]
struct RefreshAccepted {
    sport_id: i32,
    leagues: usize,
}

/// `POST /headlines/{sport_id}` – trigger an RSS refresh cycle.
///
/// Verifies the sport has leagues (404 otherwise), then hands the cycle
/// to the importer and returns 202; the import itself runs in the
/// background.
async fn refresh_headlines(
    State(state): State<AppState>,
    Path(sport_id): Path<i32>,
) -> Result<impl IntoResponse, HeadlinesApiError> {
    let processor = DatabaseProcessor {
        pool: state.db.clone(),
    };

    let leagues = processor
        .process(ListLeaguesBySport { sport_id })
        .await
        .map_err(HeadlinesApiError::Database)?;

    if leagues.is_empty() {
        return Err(HeadlinesApiError::NotFound);
    }

    state
        .refresh_tx
        .send(HeadlineRefresh { sport_id })
        .await
        .map_err(|_| HeadlinesApiError::RefreshUnavailable)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(RefreshAccepted {
            sport_id,
            leagues: leagues.len(),
        }),
    ))
}

/// Errors that can occur in headline API handlers.
#[derive(Debug)]
enum HeadlinesApiError {
    /// A database query failed.
    Database(sqlx::Error),
    /// Nothing stored for the requested id.
    NotFound,
    /// The importer is not accepting refresh requests.
    RefreshUnavailable,
}

impl IntoResponse for HeadlinesApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            HeadlinesApiError::Database(e) => {
                tracing::error!(error = %e, "Headline API database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
            HeadlinesApiError::NotFound => {
                (StatusCode::NOT_FOUND, "nothing found").into_response()
            }
            HeadlinesApiError::RefreshUnavailable => {
                tracing::error!("Headline refresh channel is closed");
                (StatusCode::INTERNAL_SERVER_ERROR, "refresh unavailable").into_response()
            }
        }
    }
}
