use crate::framework::DatabaseProcessor;
use compact_str::CompactString;
use kanau::processor::Processor;
use time::OffsetDateTime;

/// A default-pick row as persisted in `created_default_picks`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CreatedDefaultPick {
    pub created_default_pick_id: i32,
    pub game_id: i32,
    pub bet: i32,
    pub favorite_team_id: CompactString,
    pub favorite_team_name: String,
    pub spread: f64,
    pub week_id: i32,
    pub week_number: i32,
    pub event_date: OffsetDateTime,
}

/// Natural identity of a default pick: the game within a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefaultPickKey {
    pub game_id: i32,
    pub week_id: i32,
}

/// Insert payload for `created_default_picks`.
#[derive(Debug, Clone)]
pub struct NewDefaultPick {
    pub game_id: i32,
    pub bet: i32,
    pub favorite_team_id: CompactString,
    pub favorite_team_name: String,
    pub spread: f64,
    pub week_id: i32,
    pub week_number: i32,
    pub event_date: OffsetDateTime,
}

/// Insert a default pick and return the generated surrogate id.
#[derive(Debug, Clone)]
pub struct CreateDefaultPick {
    pub default_pick: NewDefaultPick,
}

impl Processor<CreateDefaultPick> for DatabaseProcessor {
    type Output = i32;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateDefaultPick")]
    async fn process(&self, command: CreateDefaultPick) -> Result<i32, sqlx::Error> {
        let pick = command.default_pick;
        let (created_default_pick_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO created_default_picks (
                game_id, bet, favorite_team_id, favorite_team_name, spread,
                week_id, week_number, event_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING created_default_pick_id
            "#,
        )
        .bind(pick.game_id)
        .bind(pick.bet)
        .bind(pick.favorite_team_id.as_str())
        .bind(&pick.favorite_team_name)
        .bind(pick.spread)
        .bind(pick.week_id)
        .bind(pick.week_number)
        .bind(pick.event_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(created_default_pick_id)
    }
}

/// Delete every default-pick row matching the natural identity.
#[derive(Debug, Clone)]
pub struct DeleteDefaultPick {
    pub key: DefaultPickKey,
}

impl Processor<DeleteDefaultPick> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteDefaultPick")]
    async fn process(&self, command: DeleteDefaultPick) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM created_default_picks WHERE game_id = $1 AND week_id = $2")
                .bind(command.key.game_id)
                .bind(command.key.week_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Fetch a default-pick row by its natural identity.
#[derive(Debug, Clone)]
pub struct GetDefaultPick {
    pub key: DefaultPickKey,
}

impl Processor<GetDefaultPick> for DatabaseProcessor {
    type Output = Option<CreatedDefaultPick>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetDefaultPick")]
    async fn process(
        &self,
        command: GetDefaultPick,
    ) -> Result<Option<CreatedDefaultPick>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT created_default_pick_id, game_id, bet, favorite_team_id,
                   favorite_team_name, spread, week_id, week_number, event_date
            FROM created_default_picks
            WHERE game_id = $1 AND week_id = $2
            "#,
        )
        .bind(command.key.game_id)
        .bind(command.key.week_id)
        .fetch_optional(&self.pool)
        .await
    }
}
