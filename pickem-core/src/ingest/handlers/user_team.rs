use crate::entities::user_team::{NewUserTeam, UserTeamKey};
use crate::ingest::decode::NormalizedMessage;
use crate::ingest::error::{ProcessError, ValidationError};
use crate::ingest::handlers::MessageHandler;
use crate::repository::UserTeamRepository;
use crate::utils::dates::normalize_event_date;
use async_trait::async_trait;
use pickem_sdk::objects::{CreatedStatus, UserTeamMessage};
use tracing::debug;

/// Handles deliveries from the user-team exchange.
pub struct UserTeamHandler<R> {
    repo: R,
}

impl<R> UserTeamHandler<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: UserTeamRepository> MessageHandler for UserTeamHandler<R> {
    fn entity(&self) -> &'static str {
        "user_team"
    }

    fn lock_key(&self, message: &NormalizedMessage) -> Option<String> {
        let name = message.get_str("name")?;
        let season_id = message.get_str("season_id")?;
        Some(format!("{name}:{season_id}"))
    }

    async fn handle(&self, message: &NormalizedMessage) -> Result<bool, ProcessError> {
        let payload: UserTeamMessage = message.to_payload()?;
        let key = UserTeamKey {
            name: payload.name.clone(),
            season_id: payload.season_id,
        };

        self.repo.delete(&key).await?;

        if payload.status == CreatedStatus::Delete {
            debug!(name = %key.name, season_id = %key.season_id, "user team removed");
            return Ok(true);
        }

        let event_date = normalize_event_date(&payload.event_date).map_err(ValidationError::Date)?;
        let id = self
            .repo
            .add(NewUserTeam {
                user_team_id: payload.user_team_id,
                name: payload.name,
                starting_amount: payload.starting_amount,
                is_paid: payload.is_paid,
                payment_reference: payload.payment_reference,
                is_active: payload.is_active,
                slogan: payload.slogan,
                email: payload.email,
                season_id: payload.season_id,
                user_id: payload.user_id,
                event_date,
            })
            .await?;

        Ok(id > 0)
    }
}
