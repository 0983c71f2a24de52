use crate::entities::week::{NewWeek, WeekKey};
use crate::ingest::decode::NormalizedMessage;
use crate::ingest::error::{ProcessError, ValidationError};
use crate::ingest::handlers::MessageHandler;
use crate::repository::WeekRepository;
use crate::utils::dates::normalize_event_date;
use async_trait::async_trait;
use pickem_sdk::objects::{CreatedStatus, WeekMessage};
use tracing::debug;

/// Handles deliveries from the week exchange.
///
/// Weeks carry four date fields; all of them go through the same
/// normalization and any one of them failing rejects the message.
pub struct WeekHandler<R> {
    repo: R,
}

impl<R> WeekHandler<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: WeekRepository> MessageHandler for WeekHandler<R> {
    fn entity(&self) -> &'static str {
        "week"
    }

    fn lock_key(&self, message: &NormalizedMessage) -> Option<String> {
        let week_number = message.get_i64("week_number")?;
        let season_id = message.get_str("season_id")?;
        Some(format!("{week_number}:{season_id}"))
    }

    async fn handle(&self, message: &NormalizedMessage) -> Result<bool, ProcessError> {
        let payload: WeekMessage = message.to_payload()?;
        let key = WeekKey {
            week_number: payload.week_number,
            season_id: payload.season_id,
        };

        self.repo.delete(&key).await?;

        if payload.status == CreatedStatus::Delete {
            debug!(week_number = key.week_number, season_id = %key.season_id, "week removed");
            return Ok(true);
        }

        let start_date = normalize_event_date(&payload.start_date).map_err(ValidationError::Date)?;
        let end_date = normalize_event_date(&payload.end_date).map_err(ValidationError::Date)?;
        let deadline_date =
            normalize_event_date(&payload.deadline_date).map_err(ValidationError::Date)?;
        let event_date = normalize_event_date(&payload.event_date).map_err(ValidationError::Date)?;

        let id = self
            .repo
            .add(NewWeek {
                week_id: payload.week_id,
                week_number: payload.week_number,
                start_date,
                end_date,
                deadline_date,
                season_id: payload.season_id,
                event_date,
            })
            .await?;

        Ok(id > 0)
    }
}
