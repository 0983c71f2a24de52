use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use time::OffsetDateTime;
use uuid::Uuid;

/// A user-team row as persisted in `created_user_teams`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CreatedUserTeam {
    pub created_user_team_id: i32,
    pub user_team_id: Uuid,
    pub name: String,
    pub starting_amount: i32,
    pub is_paid: bool,
    pub payment_reference: Option<String>,
    pub is_active: bool,
    pub slogan: Option<String>,
    pub email: String,
    pub season_id: Uuid,
    pub user_id: Uuid,
    pub event_date: OffsetDateTime,
}

/// Natural identity of a user team: its name within a season.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserTeamKey {
    pub name: String,
    pub season_id: Uuid,
}

/// Insert payload for `created_user_teams`.
#[derive(Debug, Clone)]
pub struct NewUserTeam {
    pub user_team_id: Uuid,
    pub name: String,
    pub starting_amount: i32,
    pub is_paid: bool,
    pub payment_reference: Option<String>,
    pub is_active: bool,
    pub slogan: Option<String>,
    pub email: String,
    pub season_id: Uuid,
    pub user_id: Uuid,
    pub event_date: OffsetDateTime,
}

/// Insert a user team and return the generated surrogate id.
#[derive(Debug, Clone)]
pub struct CreateUserTeam {
    pub user_team: NewUserTeam,
}

impl Processor<CreateUserTeam> for DatabaseProcessor {
    type Output = i32;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateUserTeam")]
    async fn process(&self, command: CreateUserTeam) -> Result<i32, sqlx::Error> {
        let team = command.user_team;
        let (created_user_team_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO created_user_teams (
                user_team_id, name, starting_amount, is_paid, payment_reference,
                is_active, slogan, email, season_id, user_id, event_date
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING created_user_team_id
            "#,
        )
        .bind(team.user_team_id)
        .bind(&team.name)
        .bind(team.starting_amount)
        .bind(team.is_paid)
        .bind(&team.payment_reference)
        .bind(team.is_active)
        .bind(&team.slogan)
        .bind(&team.email)
        .bind(team.season_id)
        .bind(team.user_id)
        .bind(team.event_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(created_user_team_id)
    }
}

/// Delete every user-team row matching the natural identity.
#[derive(Debug, Clone)]
pub struct DeleteUserTeam {
    pub key: UserTeamKey,
}

impl Processor<DeleteUserTeam> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteUserTeam")]
    async fn process(&self, command: DeleteUserTeam) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM created_user_teams WHERE name = $1 AND season_id = $2")
                .bind(&command.key.name)
                .bind(command.key.season_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Fetch a user-team row by its natural identity.
#[derive(Debug, Clone)]
pub struct GetUserTeam {
    pub key: UserTeamKey,
}

impl Processor<GetUserTeam> for DatabaseProcessor {
    type Output = Option<CreatedUserTeam>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetUserTeam")]
    async fn process(&self, command: GetUserTeam) -> Result<Option<CreatedUserTeam>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT created_user_team_id, user_team_id, name, starting_amount, is_paid,
                   payment_reference, is_active, slogan, email, season_id, user_id, event_date
            FROM created_user_teams
            WHERE name = $1 AND season_id = $2
            "#,
        )
        .bind(&command.key.name)
        .bind(command.key.season_id)
        .fetch_optional(&self.pool)
        .await
    }
}
