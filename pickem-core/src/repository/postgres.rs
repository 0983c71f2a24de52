//! Postgres-backed repository implementations.

use crate::entities::default_pick::{
    CreateDefaultPick, CreatedDefaultPick, DefaultPickKey, DeleteDefaultPick, GetDefaultPick,
    NewDefaultPick,
};
use crate::entities::headline::{
    CreateHeadline, DeleteHeadlinesForLeague, Headline, ListHeadlinesForLeague, NewHeadline,
};
use crate::entities::league::{
    CreateLeague, CreatedLeague, DeleteLeague, GetLeague, LeagueKey, ListLeagues,
    ListLeaguesBySport, NewLeague,
};
use crate::entities::pick::{
    CreatePick, CreatePickDetail, CreatedPick, DeletePick, GetPick, NewPick, NewPickDetail, PickKey,
};
use crate::entities::user_team::{
    CreateUserTeam, CreatedUserTeam, DeleteUserTeam, GetUserTeam, NewUserTeam, UserTeamKey,
};
use crate::entities::week::{CreateWeek, CreatedWeek, DeleteWeek, GetWeek, NewWeek, WeekKey};
use crate::framework::DatabaseProcessor;
use crate::repository::{
    DefaultPickRepository, HeadlineRepository, LeagueRepository, PersistenceError, PickRepository,
    SurrogateId, UserTeamRepository, WeekRepository,
};
use async_trait::async_trait;
use kanau::processor::Processor;
use sqlx::PgPool;

/// Postgres-backed [`LeagueRepository`].
#[derive(Clone)]
pub struct PgLeagueRepository {
    processor: DatabaseProcessor,
}

impl PgLeagueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            processor: DatabaseProcessor::new(pool),
        }
    }
}

#[async_trait]
impl LeagueRepository for PgLeagueRepository {
    async fn add(&self, league: NewLeague) -> Result<SurrogateId, PersistenceError> {
        Ok(self.processor.process(CreateLeague { league }).await?)
    }

    async fn delete(&self, key: &LeagueKey) -> Result<bool, PersistenceError> {
        Ok(self
            .processor
            .process(DeleteLeague { key: key.clone() })
            .await?)
    }

    async fn get(&self, key: &LeagueKey) -> Result<Option<CreatedLeague>, PersistenceError> {
        Ok(self
            .processor
            .process(GetLeague { key: key.clone() })
            .await?)
    }

    async fn list_by_sport(&self, sport_id: i32) -> Result<Vec<CreatedLeague>, PersistenceError> {
        Ok(self
            .processor
            .process(ListLeaguesBySport { sport_id })
            .await?)
    }

    async fn list_all(&self) -> Result<Vec<CreatedLeague>, PersistenceError> {
        Ok(self.processor.process(ListLeagues).await?)
    }
}

/// Postgres-backed [`UserTeamRepository`].
#[derive(Clone)]
pub struct PgUserTeamRepository {
    processor: DatabaseProcessor,
}

impl PgUserTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            processor: DatabaseProcessor::new(pool),
        }
    }
}

#[async_trait]
impl UserTeamRepository for PgUserTeamRepository {
    async fn add(&self, user_team: NewUserTeam) -> Result<SurrogateId, PersistenceError> {
        Ok(self.processor.process(CreateUserTeam { user_team }).await?)
    }

    async fn delete(&self, key: &UserTeamKey) -> Result<bool, PersistenceError> {
        Ok(self
            .processor
            .process(DeleteUserTeam { key: key.clone() })
            .await?)
    }

    async fn get(&self, key: &UserTeamKey) -> Result<Option<CreatedUserTeam>, PersistenceError> {
        Ok(self
            .processor
            .process(GetUserTeam { key: key.clone() })
            .await?)
    }
}

/// Postgres-backed [`WeekRepository`].
#[derive(Clone)]
pub struct PgWeekRepository {
    processor: DatabaseProcessor,
}

impl PgWeekRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            processor: DatabaseProcessor::new(pool),
        }
    }
}

#[async_trait]
impl WeekRepository for PgWeekRepository {
    async fn add(&self, week: NewWeek) -> Result<SurrogateId, PersistenceError> {
        Ok(self.processor.process(CreateWeek { week }).await?)
    }

    async fn delete(&self, key: &WeekKey) -> Result<bool, PersistenceError> {
        Ok(self.processor.process(DeleteWeek { key: *key }).await?)
    }

    async fn get(&self, key: &WeekKey) -> Result<Option<CreatedWeek>, PersistenceError> {
        Ok(self.processor.process(GetWeek { key: *key }).await?)
    }
}

/// Postgres-backed [`PickRepository`].
#[derive(Clone)]
pub struct PgPickRepository {
    processor: DatabaseProcessor,
}

impl PgPickRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            processor: DatabaseProcessor::new(pool),
        }
    }
}

#[async_trait]
impl PickRepository for PgPickRepository {
    async fn add(&self, pick: NewPick) -> Result<SurrogateId, PersistenceError> {
        Ok(self.processor.process(CreatePick { pick }).await?)
    }

    async fn add_detail(&self, detail: NewPickDetail) -> Result<SurrogateId, PersistenceError> {
        Ok(self.processor.process(CreatePickDetail { detail }).await?)
    }

    async fn delete(&self, key: &PickKey) -> Result<bool, PersistenceError> {
        Ok(self.processor.process(DeletePick { key: *key }).await?)
    }

    async fn get(&self, key: &PickKey) -> Result<Option<CreatedPick>, PersistenceError> {
        Ok(self.processor.process(GetPick { key: *key }).await?)
    }
}

/// Postgres-backed [`DefaultPickRepository`].
#[derive(Clone)]
pub struct PgDefaultPickRepository {
    processor: DatabaseProcessor,
}

impl PgDefaultPickRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            processor: DatabaseProcessor::new(pool),
        }
    }
}

#[async_trait]
impl DefaultPickRepository for PgDefaultPickRepository {
    async fn add(&self, default_pick: NewDefaultPick) -> Result<SurrogateId, PersistenceError> {
        Ok(self
            .processor
            .process(CreateDefaultPick { default_pick })
            .await?)
    }

    async fn delete(&self, key: &DefaultPickKey) -> Result<bool, PersistenceError> {
        Ok(self
            .processor
            .process(DeleteDefaultPick { key: *key })
            .await?)
    }

    async fn get(
        &self,
        key: &DefaultPickKey,
    ) -> Result<Option<CreatedDefaultPick>, PersistenceError> {
        Ok(self.processor.process(GetDefaultPick { key: *key }).await?)
    }
}

/// Postgres-backed [`HeadlineRepository`].
#[derive(Clone)]
pub struct PgHeadlineRepository {
    processor: DatabaseProcessor,
}

impl PgHeadlineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            processor: DatabaseProcessor::new(pool),
        }
    }
}

#[async_trait]
impl HeadlineRepository for PgHeadlineRepository {
    async fn add(&self, headline: NewHeadline) -> Result<SurrogateId, PersistenceError> {
        Ok(self.processor.process(CreateHeadline { headline }).await?)
    }

    async fn delete_for_league(&self, league_id: i32) -> Result<u64, PersistenceError> {
        Ok(self
            .processor
            .process(DeleteHeadlinesForLeague { league_id })
            .await?)
    }

    async fn list_for_league(
        &self,
        league_id: i32,
        limit: i64,
    ) -> Result<Vec<Headline>, PersistenceError> {
        Ok(self
            .processor
            .process(ListHeadlinesForLeague { league_id, limit })
            .await?)
    }
}
