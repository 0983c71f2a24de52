use crate::entities::pick::{NewPick, NewPickDetail, PickKey};
use crate::ingest::decode::NormalizedMessage;
use crate::ingest::error::{ProcessError, ValidationError};
use crate::ingest::handlers::MessageHandler;
use crate::repository::PickRepository;
use crate::utils::dates::normalize_event_date;
use async_trait::async_trait;
use pickem_sdk::objects::{CreatedStatus, PickMessage};
use tracing::{debug, warn};

/// Handles deliveries from the pick exchange.
///
/// A pick owns its detail legs. Details can only be written once the
/// parent insert has returned a surrogate id, and a failing detail is
/// logged and skipped rather than rolling back the parent; the overall
/// result stays true as long as the parent row exists.
pub struct PickHandler<R> {
    repo: R,
}

impl<R> PickHandler<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: PickRepository> MessageHandler for PickHandler<R> {
    fn entity(&self) -> &'static str {
        "pick"
    }

    fn lock_key(&self, message: &NormalizedMessage) -> Option<String> {
        let pick_id = message.get_i64("pick_id")?;
        let user_team_id = message.get_str("user_team_id")?;
        Some(format!("{pick_id}:{user_team_id}"))
    }

    async fn handle(&self, message: &NormalizedMessage) -> Result<bool, ProcessError> {
        let payload: PickMessage = message.to_payload()?;
        let key = PickKey {
            pick_id: payload.pick_id,
            user_team_id: payload.user_team_id,
        };

        self.repo.delete(&key).await?;

        if payload.status == CreatedStatus::Delete {
            debug!(pick_id = key.pick_id, user_team_id = %key.user_team_id, "pick removed");
            return Ok(true);
        }

        let event_date = normalize_event_date(&payload.event_date).map_err(ValidationError::Date)?;
        let parlay_size = payload.pick_details.len() as i32;

        let created_pick_id = self
            .repo
            .add(NewPick {
                pick_id: payload.pick_id,
                bet: payload.bet,
                amount_won: payload.amount_won,
                week_id: payload.week_id,
                user_team_id: payload.user_team_id,
                parlay_size,
                event_date,
            })
            .await?;

        if created_pick_id <= 0 {
            return Ok(false);
        }

        for detail in &payload.pick_details {
            let record = NewPickDetail {
                pick_detail_id: detail.pick_detail_id,
                game_id: detail.game_id,
                spread: detail.spread,
                total: detail.total,
                is_correct: detail.is_correct.as_ordinal(),
                created_pick_id,
                football_team_id: detail.football_team_id.clone(),
                event_date,
            };
            if let Err(error) = self.repo.add_detail(record).await {
                warn!(
                    pick_detail_id = detail.pick_detail_id,
                    created_pick_id,
                    %error,
                    "pick detail insert failed, continuing with remaining details"
                );
            }
        }

        Ok(true)
    }
}
