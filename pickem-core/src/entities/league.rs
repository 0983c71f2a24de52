use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use time::OffsetDateTime;

/// A league row as persisted in `created_leagues`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CreatedLeague {
    pub created_league_id: i32,
    pub league_id: i32,
    pub name: String,
    pub url: String,
    pub sport_id: i32,
    pub event_date: OffsetDateTime,
}

/// Natural identity of a league: the sport it belongs to plus its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeagueKey {
    pub sport_id: i32,
    pub name: String,
}

/// Insert payload for `created_leagues`.
#[derive(Debug, Clone)]
pub struct NewLeague {
    pub league_id: i32,
    pub name: String,
    pub url: String,
    pub sport_id: i32,
    pub event_date: OffsetDateTime,
}

/// Insert a league and return the generated surrogate id.
#[derive(Debug, Clone)]
pub struct CreateLeague {
    pub league: NewLeague,
}

impl Processor<CreateLeague> for DatabaseProcessor {
    type Output = i32;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateLeague")]
    async fn process(&self, command: CreateLeague) -> Result<i32, sqlx::Error> {
        let (created_league_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO created_leagues (league_id, name, url, sport_id, event_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING created_league_id
            "#,
        )
        .bind(command.league.league_id)
        .bind(&command.league.name)
        .bind(&command.league.url)
        .bind(command.league.sport_id)
        .bind(command.league.event_date)
        .fetch_one(&self.pool)
        .await?;
        Ok(created_league_id)
    }
}

/// Delete every league row matching the natural identity.
#[derive(Debug, Clone)]
pub struct DeleteLeague {
    pub key: LeagueKey,
}

impl Processor<DeleteLeague> for DatabaseProcessor {
    type Output = bool;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteLeague")]
    async fn process(&self, command: DeleteLeague) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM created_leagues WHERE sport_id = $1 AND name = $2")
            .bind(command.key.sport_id)
            .bind(&command.key.name)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Fetch a league row by its natural identity.
#[derive(Debug, Clone)]
pub struct GetLeague {
    pub key: LeagueKey,
}

impl Processor<GetLeague> for DatabaseProcessor {
    type Output = Option<CreatedLeague>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:GetLeague")]
    async fn process(&self, command: GetLeague) -> Result<Option<CreatedLeague>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT created_league_id, league_id, name, url, sport_id, event_date
            FROM created_leagues
            WHERE sport_id = $1 AND name = $2
            "#,
        )
        .bind(command.key.sport_id)
        .bind(&command.key.name)
        .fetch_optional(&self.pool)
        .await
    }
}

/// List every league under one sport.
#[derive(Debug, Clone)]
pub struct ListLeaguesBySport {
    pub sport_id: i32,
}

impl Processor<ListLeaguesBySport> for DatabaseProcessor {
    type Output = Vec<CreatedLeague>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListLeaguesBySport")]
    async fn process(&self, command: ListLeaguesBySport) -> Result<Vec<CreatedLeague>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT created_league_id, league_id, name, url, sport_id, event_date
            FROM created_leagues
            WHERE sport_id = $1
            ORDER BY league_id
            "#,
        )
        .bind(command.sport_id)
        .fetch_all(&self.pool)
        .await
    }
}

/// List every stored league.
#[derive(Debug, Clone)]
pub struct ListLeagues;

impl Processor<ListLeagues> for DatabaseProcessor {
    type Output = Vec<CreatedLeague>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListLeagues")]
    async fn process(&self, _command: ListLeagues) -> Result<Vec<CreatedLeague>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT created_league_id, league_id, name, url, sport_id, event_date
            FROM created_leagues
            ORDER BY sport_id, league_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
