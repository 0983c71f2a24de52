use crate::entities::league::{LeagueKey, NewLeague};
use crate::ingest::decode::NormalizedMessage;
use crate::ingest::error::{ProcessError, ValidationError};
use crate::ingest::handlers::MessageHandler;
use crate::repository::LeagueRepository;
use crate::utils::dates::normalize_event_date;
use async_trait::async_trait;
use pickem_sdk::objects::{CreatedStatus, LeagueMessage};
use tracing::debug;

/// Handles deliveries from the league exchange.
pub struct LeagueHandler<R> {
    repo: R,
}

impl<R> LeagueHandler<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: LeagueRepository> MessageHandler for LeagueHandler<R> {
    fn entity(&self) -> &'static str {
        "league"
    }

    fn lock_key(&self, message: &NormalizedMessage) -> Option<String> {
        let sport_id = message.get_i64("sport_id")?;
        let name = message.get_str("name")?;
        Some(format!("{sport_id}:{name}"))
    }

    async fn handle(&self, message: &NormalizedMessage) -> Result<bool, ProcessError> {
        let payload: LeagueMessage = message.to_payload()?;
        let key = LeagueKey {
            sport_id: payload.sport_id,
            name: payload.name.clone(),
        };

        self.repo.delete(&key).await?;

        if payload.status == CreatedStatus::Delete {
            debug!(sport_id = key.sport_id, name = %key.name, "league removed");
            return Ok(true);
        }

        let event_date = normalize_event_date(&payload.event_date).map_err(ValidationError::Date)?;
        let id = self
            .repo
            .add(NewLeague {
                league_id: payload.league_id,
                name: payload.name,
                url: payload.url.to_string(),
                sport_id: payload.sport_id,
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
    use crate::ingest::handlers::testing::FakeLeagueRepository;
    use time::macros::datetime;

    fn league_payload(status: &str) -> Vec<u8> {
        format!(
            r#"{{
                "league_id": 5,
                "sport_id": 2,
                "name": "AFC",
                "url": "http://feeds.example.com/afc",
                "status": "{status}",
                "event_date": "2024-10-10T00:00:00Z"
            }}"#
        )
        .into_bytes()
    }

    #[tokio::test]
    async fn new_message_deletes_then_inserts() {
        let repo = FakeLeagueRepository::new();
        let handler = LeagueHandler::new(repo.clone());
        let message = decode(&league_payload("NEW")).unwrap();

        assert!(handler.handle(&message).await.unwrap());
        assert_eq!(
            repo.calls.entries(),
            vec!["delete sport_id=2 name=AFC", "add"]
        );

        let added = repo.added.lock().unwrap();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].league_id, 5);
        assert_eq!(added[0].event_date, datetime!(2024-10-10 00:00:00 UTC));
    }

    #[tokio::test]
    async fn delete_message_never_inserts() {
        let repo = FakeLeagueRepository::new();
        let handler = LeagueHandler::new(repo.clone());
        let message = decode(&league_payload("DELETE")).unwrap();

        assert!(handler.handle(&message).await.unwrap());
        assert_eq!(repo.calls.entries(), vec!["delete sport_id=2 name=AFC"]);
        assert!(repo.added.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_field_is_a_validation_error() {
        let repo = FakeLeagueRepository::new();
        let handler = LeagueHandler::new(repo.clone());
        let message = decode(br#"{"name": "AFC", "status": "NEW"}"#).unwrap();

        let err = handler.handle(&message).await.unwrap_err();
        assert!(matches!(err, ProcessError::Validation(_)));
        assert!(repo.calls.entries().is_empty());
    }

    #[tokio::test]
    async fn delete_failure_propagates() {
        let repo = FakeLeagueRepository::new();
        repo.fail_delete
            .store(true, std::sync::atomic::Ordering::SeqCst);
        let handler = LeagueHandler::new(repo.clone());
        let message = decode(&league_payload("NEW")).unwrap();

        let err = handler.handle(&message).await.unwrap_err();
        assert!(matches!(err, ProcessError::Persistence(_)));
        assert!(repo.added.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn offset_free_event_date_is_rejected_after_delete() {
        let repo = FakeLeagueRepository::new();
        let handler = LeagueHandler::new(repo.clone());
        let message = decode(
            br#"{
                "league_id": 5,
                "sport_id": 2,
                "name": "AFC",
                "url": "http://feeds.example.com/afc",
                "status": "NEW",
                "event_date": "2024-10-10T00:00:00"
            }"#,
        )
        .unwrap();

        let err = handler.handle(&message).await.unwrap_err();
        assert!(matches!(
            err,
            ProcessError::Validation(ValidationError::Date(_))
        ));
        // The idempotency anchor already ran; only the insert is skipped.
        assert_eq!(repo.calls.entries(), vec!["delete sport_id=2 name=AFC"]);
    }

    #[tokio::test]
    async fn zero_surrogate_id_reports_write_failure() {
        let repo = FakeLeagueRepository::returning_zero();
        let handler = LeagueHandler::new(repo.clone());
        let message = decode(&league_payload("NEW")).unwrap();

        assert!(!handler.handle(&message).await.unwrap());
    }

    #[test]
    fn lock_key_uses_natural_identity() {
        let repo = FakeLeagueRepository::new();
        let handler = LeagueHandler::new(repo.clone());
        let message = decode(&league_payload("NEW")).unwrap();
        assert_eq!(handler.lock_key(&message), Some("2:AFC".to_owned()));
    }
}
