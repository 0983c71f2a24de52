use crate::objects::CreatedStatus;
use serde::{Deserialize, Serialize};
use url::Url;

/// League message published on the league exchange.
///
/// `event_date` stays a raw string on the wire; the consumer normalizes it
/// to a UTC instant before persisting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueMessage {
    pub league_id: i32,
    pub name: String,
    pub url: Url,
    pub sport_id: i32,
    pub status: CreatedStatus,
    pub event_date: String,
}
