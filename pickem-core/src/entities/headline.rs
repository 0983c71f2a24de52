use crate::framework::DatabaseProcessor;
use kanau::processor::Processor;
use time::OffsetDateTime;

/// A headline row as persisted in `headlines`.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Headline {
    pub headline_id: i32,
    pub heading: String,
    pub story: String,
    pub link: String,
    pub pub_date: OffsetDateTime,
    pub league_id: i32,
}

/// Insert payload for `headlines`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHeadline {
    pub heading: String,
    pub story: String,
    pub link: String,
    pub pub_date: OffsetDateTime,
    pub league_id: i32,
}

/// Insert a headline and return the generated surrogate id.
#[derive(Debug, Clone)]
pub struct CreateHeadline {
    pub headline: NewHeadline,
}

impl Processor<CreateHeadline> for DatabaseProcessor {
    type Output = i32;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:CreateHeadline")]
    async fn process(&self, command: CreateHeadline) -> Result<i32, sqlx::Error> {
        let headline = command.headline;
        let (headline_id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO headlines (heading, story, link, pub_date, league_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING headline_id
            "#,
        )
        .bind(&headline.heading)
        .bind(&headline.story)
        .bind(&headline.link)
        .bind(headline.pub_date)
        .bind(headline.league_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(headline_id)
    }
}

/// Drop every stored headline for one league, ahead of a fresh import.
#[derive(Debug, Clone)]
pub struct DeleteHeadlinesForLeague {
    pub league_id: i32,
}

impl Processor<DeleteHeadlinesForLeague> for DatabaseProcessor {
    type Output = u64;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:DeleteHeadlinesForLeague")]
    async fn process(&self, command: DeleteHeadlinesForLeague) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM headlines WHERE league_id = $1")
            .bind(command.league_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// List up to `limit` headlines for a league, oldest publication first.
#[derive(Debug, Clone)]
pub struct ListHeadlinesForLeague {
    pub league_id: i32,
    pub limit: i64,
}

impl Processor<ListHeadlinesForLeague> for DatabaseProcessor {
    type Output = Vec<Headline>;
    type Error = sqlx::Error;
    #[tracing::instrument(skip_all, err, name = "SQL:ListHeadlinesForLeague")]
    async fn process(&self, command: ListHeadlinesForLeague) -> Result<Vec<Headline>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT headline_id, heading, story, link, pub_date, league_id
            FROM headlines
            WHERE league_id = $1
            ORDER BY pub_date
            LIMIT $2
            "#,
        )
        .bind(command.league_id)
        .bind(command.limit)
        .fetch_all(&self.pool)
        .await
    }
}
