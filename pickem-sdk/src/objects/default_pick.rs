use crate::objects::CreatedStatus;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Default-pick message published on the default-pick exchange.
///
/// Issued for user teams that missed the deadline; the favorite covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultPickMessage {
    pub game_id: i32,
    pub bet: i32,
    pub favorite_team_id: CompactString,
    pub favorite_team_name: String,
    pub spread: f64,
    pub week_id: i32,
    pub week_number: i32,
    pub status: CreatedStatus,
    pub event_date: String,
}
