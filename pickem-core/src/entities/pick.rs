use crate::framework::DatabaseProcessor;
use compact_str::CompactString;
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;

/// A pick row as persisted in `created_picks`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CreatedPick {
    pub created_pick_id: i32,
    pub pick_id: i32,
    pub bet: i32,
    pub amount_won: i32,
    pub week_id: i32,
    pub user_team_id: Uuid,
    pub parlay_size: i32,
    pub event_date: OffsetDateTime,
}

/// Natural identity of a pick: the upstream pick id scoped to a user team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PickKey {
    pub pick_id: i32,
    pub user_team_id: Uuid,
}

/// Insert payload for `created_picks`.
#[derive(Debug, Clone)]
pub struct NewPick {
    pub pick_id: i32,
    pub bet: i32,
    pub amount_won: i32,
    pub week_id: i32,
    pub user_team_id: Uuid,
    pub parlay_size: i32,
    pub event_date: OffsetDateTime,
}

/// Insert payload for `created_pick_details`.
///
/// `created_pick_id` is the parent's surrogate id, so a detail can only be
/// built after the parent insert has returned.
#[derive(Debug, Clone)]
pub struct NewPickDetail {
    pub pick_detail_id: i32,
    pub game_id: i32,
    pub spread: f64,
    pub total: f64,
    pub is_correct: i32,
    pub created_pick_id: i32,
    pub football_team_id: CompactString,
    pub event_date: OffsetDateTime,
}

/// Insert a pick and return the generated surrogate id.
#[derive(Debug, Clone)]
pub struct CreatePick {
    pub pick: NewPick,
}

impl Processor<CreatePick> for DatabaseProcessor {
    type Output = i32;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreatePick")]
    async fn process(&self, command: CreatePick) -> Result<i32, sqlx::Error> {
        let pick = command.pick;
        let (created_pick_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO created_picks (
                pick_id, bet, amount_won, week_id, user_team_id, parlay_size, event_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING created_pick_id
            "#,
        )
        .bind(pick.pick_id)
        .bind(pick.bet)
        .bind(pick.amount_won)
        .bind(pick.week_id)
        .bind(pick.user_team_id)
        .bind(pick.parlay_size)
        .bind(pick.event_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(created_pick_id)
    }
}

/// Insert one pick detail and return the generated surrogate id.
#[derive(Debug, Clone)]
pub struct CreatePickDetail {
    pub detail: NewPickDetail,
}

impl Processor<CreatePickDetail> for DatabaseProcessor {
    type Output = i32;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreatePickDetail")]
    async fn process(&self, command: CreatePickDetail) -> Result<i32, sqlx::Error> {
        let detail = command.detail;
        let (created_pick_detail_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO created_pick_details (
                pick_detail_id, game_id, spread, total, is_correct,
                created_pick_id, football_team_id, event_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING created_pick_detail_id
            "#,
        )
        .bind(detail.pick_detail_id)
        .bind(detail.game_id)
        .bind(detail.spread)
        .bind(detail.total)
        .bind(detail.is_correct)
        .bind(detail.created_pick_id)
        .bind(detail.football_team_id.as_str())
        .bind(detail.event_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(created_pick_detail_id)
    }
}

/// Delete a pick and its details in one transaction.
///
/// Details go first so the subselect on the parent still resolves.
#[derive(Debug, Clone)]
pub struct DeletePick {
    pub key: PickKey,
}

impl Processor<DeletePick> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeletePick")]
    async fn process(&self, command: DeletePick) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM created_pick_details
            WHERE created_pick_id IN (
                SELECT created_pick_id FROM created_picks
                WHERE pick_id = $1 AND user_team_id = $2
            )
            "#,
        )
        .bind(command.key.pick_id)
        .bind(command.key.user_team_id)
        .execute(&mut *tx)
        .await?;

        let result =
            sqlx::query("DELETE FROM created_picks WHERE pick_id = $1 AND user_team_id = $2")
                .bind(command.key.pick_id)
                .bind(command.key.user_team_id)
                .execute(&mut *tx)
                .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Fetch a pick row by its natural identity.
#[derive(Debug, Clone)]
pub struct GetPick {
    pub key: PickKey,
}

impl Processor<GetPick> for DatabaseProcessor {
    type Output = Option<CreatedPick>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetPick")]
    async fn process(&self, command: GetPick) -> Result<Option<CreatedPick>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT created_pick_id, pick_id, bet, amount_won, week_id,
                   user_team_id, parlay_size, event_date
            FROM created_picks
            WHERE pick_id = $1 AND user_team_id = $2
            "#,
        )
        .bind(command.key.pick_id)
        .bind(command.key.user_team_id)
        .fetch_optional(&self.pool)
        .await
    }
}
