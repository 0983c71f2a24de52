use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;

/// A week row as persisted in `created_weeks`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CreatedWeek {
    pub created_week_id: i32,
    pub week_id: i32,
    pub week_number: i32,
    pub start_date: OffsetDateTime,
    pub end_date: OffsetDateTime,
    pub deadline_date: OffsetDateTime,
    pub season_id: Uuid,
    pub event_date: OffsetDateTime,
}

/// Natural identity of a week: its number within a season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekKey {
    pub week_number: i32,
    pub season_id: Uuid,
}

/// Insert payload for `created_weeks`.
#[derive(Debug, Clone)]
pub struct NewWeek {
    pub week_id: i32,
    pub week_number: i32,
    pub start_date: OffsetDateTime,
    pub end_date: OffsetDateTime,
    pub deadline_date: OffsetDateTime,
    pub season_id: Uuid,
    pub event_date: OffsetDateTime,
}

/// Insert a week and return the generated surrogate id.
#[derive(Debug, Clone)]
pub struct CreateWeek {
    pub week: NewWeek,
}

impl Processor<CreateWeek> for DatabaseProcessor {
    type Output = i32;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateWeek")]
    async fn process(&self, command: CreateWeek) -> Result<i32, sqlx::Error> {
        let week = command.week;
        let (created_week_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO created_weeks (
                week_id, week_number, start_date, end_date, deadline_date,
                season_id, event_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING created_week_id
            "#,
        )
        .bind(week.week_id)
        .bind(week.week_number)
        .bind(week.start_date)
        .bind(week.end_date)
        .bind(week.deadline_date)
        .bind(week.season_id)
        .bind(week.event_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(created_week_id)
    }
}

/// Delete every week row matching the natural identity.
#[derive(Debug, Clone)]
pub struct DeleteWeek {
    pub key: WeekKey,
}

impl Processor<DeleteWeek> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteWeek")]
    async fn process(&self, command: DeleteWeek) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM created_weeks WHERE week_number = $1 AND season_id = $2")
                .bind(command.key.week_number)
                .bind(command.key.season_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Fetch a week row by its natural identity.
#[derive(Debug, Clone)]
pub struct GetWeek {
    pub key: WeekKey,
}

impl Processor<GetWeek> for DatabaseProcessor {
    type Output = Option<CreatedWeek>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetWeek")]
    async fn process(&self, command: GetWeek) -> Result<Option<CreatedWeek>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT created_week_id, week_id, week_number, start_date, end_date,
                   deadline_date, season_id, event_date
            FROM created_weeks
            WHERE week_number = $1 AND season_id = $2
            "#,
        )
        .bind(command.key.week_number)
        .bind(command.key.season_id)
        .fetch_optional(&self.pool)
        .await
    }
}
