use crate::objects::CreatedStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User-team message published on the user-team exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTeamMessage {
    pub user_team_id: Uuid,
    pub name: String,
    pub starting_amount: i32,
    pub is_paid: bool,
    #[serde(default)]
    pub payment_reference: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub slogan: Option<String>,
    pub email: String,
    pub season_id: Uuid,
    pub user_id: Uuid,
    pub status: CreatedStatus,
    pub event_date: String,
}
