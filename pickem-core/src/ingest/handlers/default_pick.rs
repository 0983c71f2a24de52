use crate::entities::default_pick::{DefaultPickKey, NewDefaultPick};
use crate::ingest::decode::NormalizedMessage;
use crate::ingest::error::{ProcessError, ValidationError};
use crate::ingest::handlers::MessageHandler;
use crate::repository::DefaultPickRepository;
use crate::utils::dates::normalize_event_date;
use async_trait::async_trait;
use pickem_sdk::objects::{CreatedStatus, DefaultPickMessage};
use tracing::debug;

/// Handles deliveries from the default-pick exchange.
pub struct DefaultPickHandler<R> {
    repo: R,
}

impl<R> DefaultPickHandler<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: DefaultPickRepository> MessageHandler for DefaultPickHandler<R> {
    fn entity(&self) -> &'static str {
        "default_pick"
    }

    fn lock_key(&self, message: &NormalizedMessage) -> Option<String> {
        let game_id = message.get_i64("game_id")?;
        let week_id = message.get_i64("week_id")?;
        Some(format!("{game_id}:{week_id}"))
    }

    async fn handle(&self, message: &NormalizedMessage) -> Result<bool, ProcessError> {
        let payload: DefaultPickMessage = message.to_payload()?;
        let key = DefaultPickKey {
            game_id: payload.game_id,
            week_id: payload.week_id,
        };

        self.repo.delete(&key).await?;

        if payload.status == CreatedStatus::Delete {
            debug!(game_id = key.game_id, week_id = key.week_id, "default pick removed");
            return Ok(true);
        }

        let event_date = normalize_event_date(&payload.event_date).map_err(ValidationError::Date)?;
        let id = self
            .repo
            .add(NewDefaultPick {
                game_id: payload.game_id,
                bet: payload.bet,
                favorite_team_id: payload.favorite_team_id,
                favorite_team_name: payload.favorite_team_name,
                spread: payload.spread,
                week_id: payload.week_id,
                week_number: payload.week_number,
                event_date,
            })
            .await?;

        Ok(id > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ingest::decode::decode;
    use crate::ingest::handlers::testing::FakeDefaultPickRepository;

    fn default_pick_payload(status: &str) -> Vec<u8> {
        format!(
            r#"{{
                "game_id": 101,
                "bet": 25,
                "favorite_team_id": "KC",
                "favorite_team_name": "Kansas City",
                "spread": -6.5,
                "week_id": 3,
                "week_number": 3,
                "status": "{status}",
                "event_date": "2024-09-18T16:00:00Z"
            }}"#
        )
        .into_bytes()
    }

    #[tokio::test]
    async fn new_message_deletes_then_inserts() {
        let repo = FakeDefaultPickRepository::new();
        let handler = DefaultPickHandler::new(repo.clone());
        let message = decode(&default_pick_payload("NEW")).unwrap();

        assert!(handler.handle(&message).await.unwrap());
        assert_eq!(
            repo.calls.entries(),
            vec!["delete game_id=101 week_id=3", "add"]
        );

        let added = repo.added.lock().unwrap();
        assert_eq!(added[0].favorite_team_id, "KC");
        assert_eq!(added[0].bet, 25);
    }

    #[tokio::test]
    async fn delete_message_never_inserts() {
        let repo = FakeDefaultPickRepository::new();
        let handler = DefaultPickHandler::new(repo.clone());
        let message = decode(&default_pick_payload("DELETE")).unwrap();

        assert!(handler.handle(&message).await.unwrap());
        assert_eq!(repo.calls.entries(), vec!["delete game_id=101 week_id=3"]);
    }
}
