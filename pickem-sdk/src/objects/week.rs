use crate::objects::CreatedStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Week message published on the week exchange.
///
/// All four dates travel as raw strings and are normalized by the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekMessage {
    pub week_id: i32,
    pub week_number: i32,
    pub start_date: String,
    pub end_date: String,
    pub deadline_date: String,
    pub season_id: Uuid,
    pub status: CreatedStatus,
    pub event_date: String,
}
