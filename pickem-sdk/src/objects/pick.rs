use crate::objects::{CreatedStatus, PickWin};
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pick message published on the pick exchange.
///
/// Carries its detail legs inline; the consumer links them to the parent
/// row only after the parent insert has produced a surrogate id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickMessage {
    pub pick_id: i32,
    pub bet: i32,
    pub amount_won: i32,
    pub week_id: i32,
    pub user_team_id: Uuid,
    #[serde(default)]
    pub pick_details: Vec<PickDetailMessage>,
    pub status: CreatedStatus,
    pub event_date: String,
}

/// One leg of a parlay pick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickDetailMessage {
    pub pick_detail_id: i32,
    pub game_id: i32,
    pub spread: f64,
    pub total: f64,
    pub is_correct: PickWin,
    pub pick_id: i32,
    pub football_team_id: CompactString,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_message_parses_nested_details() {
        let json = r#"{
            "pick_id": 1,
            "bet": 100,
            "amount_won": 0,
            "week_id": 1,
            "user_team_id": "550e8400-e29b-41d4-a716-446655440000",
            "status": 0,
            "event_date": "2024-10-10T12:00:00Z",
            "pick_details": [
                {
                    "pick_detail_id": 1,
                    "game_id": 101,
                    "spread": -3.5,
                    "total": 45.5,
                    "is_correct": 0,
                    "pick_id": 1,
                    "football_team_id": "KC"
                },
                {
                    "pick_detail_id": 2,
                    "game_id": 102,
                    "spread": 7.0,
                    "total": 52.0,
                    "is_correct": "NONE",
                    "pick_id": 1,
                    "football_team_id": "BUF"
                }
            ]
        }"#;
        let msg: PickMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.pick_details.len(), 2);
        assert_eq!(msg.pick_details[1].football_team_id, "BUF");
        assert_eq!(msg.pick_details[0].is_correct, PickWin::None);
    }

    #[test]
    fn missing_details_default_to_empty() {
        let json = r#"{
            "pick_id": 1,
            "bet": 100,
            "amount_won": 0,
            "week_id": 1,
            "user_team_id": "550e8400-e29b-41d4-a716-446655440000",
            "status": "DELETE",
            "event_date": "2024-10-10T12:00:00Z"
        }"#;
        let msg: PickMessage = serde_json::from_str(json).unwrap();
        assert!(msg.pick_details.is_empty());
    }
}
