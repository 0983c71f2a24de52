//! Persistence contracts the ingest pipeline and importer depend on.
//!
//! One trait per entity keeps the handlers testable against in-memory
//! fakes; the Postgres implementations in [`postgres`] delegate to the
//! SQL command processors in [`crate::entities`].

use crate::entities::default_pick::{CreatedDefaultPick, DefaultPickKey, NewDefaultPick};
use crate::entities::headline::{Headline, NewHeadline};
use crate::entities::league::{CreatedLeague, LeagueKey, NewLeague};
use crate::entities::pick::{CreatedPick, NewPick, NewPickDetail, PickKey};
use crate::entities::user_team::{CreatedUserTeam, NewUserTeam, UserTeamKey};
use crate::entities::week::{CreatedWeek, NewWeek, WeekKey};
use async_trait::async_trait;
use thiserror::Error;

pub mod postgres;

pub use postgres::{
    PgDefaultPickRepository, PgHeadlineRepository, PgLeagueRepository, PgPickRepository,
    PgUserTeamRepository, PgWeekRepository,
};

/// Store-generated row id returned by every insert.
pub type SurrogateId = i32;

/// Failure talking to the store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Connectivity failure, rejected write, or a missing RETURNING row.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Store operations for leagues.
///
/// `add` raises rather than returning zero when the store yields no row.
/// `delete` reports whether at least one row was removed; a missing match
/// is not an error.
#[async_trait]
pub trait LeagueRepository: Send + Sync {
    async fn add(&self, league: NewLeague) -> Result<SurrogateId, PersistenceError>;
    async fn delete(&self, key: &LeagueKey) -> Result<bool, PersistenceError>;
    async fn get(&self, key: &LeagueKey) -> Result<Option<CreatedLeague>, PersistenceError>;
    async fn list_by_sport(&self, sport_id: i32) -> Result<Vec<CreatedLeague>, PersistenceError>;
    async fn list_all(&self) -> Result<Vec<CreatedLeague>, PersistenceError>;
}

/// Store operations for user teams.
#[async_trait]
pub trait UserTeamRepository: Send + Sync {
    async fn add(&self, user_team: NewUserTeam) -> Result<SurrogateId, PersistenceError>;
    async fn delete(&self, key: &UserTeamKey) -> Result<bool, PersistenceError>;
    async fn get(&self, key: &UserTeamKey) -> Result<Option<CreatedUserTeam>, PersistenceError>;
}

/// Store operations for weeks.
#[async_trait]
pub trait WeekRepository: Send + Sync {
    async fn add(&self, week: NewWeek) -> Result<SurrogateId, PersistenceError>;
    async fn delete(&self, key: &WeekKey) -> Result<bool, PersistenceError>;
    async fn get(&self, key: &WeekKey) -> Result<Option<CreatedWeek>, PersistenceError>;
}

/// Store operations for picks and their detail legs.
///
/// `delete` removes the pick and its details as one transaction; the
/// add/add_detail sequence is deliberately not transactional.
#[async_trait]
pub trait PickRepository: Send + Sync {
    async fn add(&self, pick: NewPick) -> Result<SurrogateId, PersistenceError>;
    async fn add_detail(&self, detail: NewPickDetail) -> Result<SurrogateId, PersistenceError>;
    async fn delete(&self, key: &PickKey) -> Result<bool, PersistenceError>;
    async fn get(&self, key: &PickKey) -> Result<Option<CreatedPick>, PersistenceError>;
}

/// Store operations for default picks.
#[async_trait]
pub trait DefaultPickRepository: Send + Sync {
    async fn add(&self, default_pick: NewDefaultPick) -> Result<SurrogateId, PersistenceError>;
    async fn delete(&self, key: &DefaultPickKey) -> Result<bool, PersistenceError>;
    async fn get(
        &self,
        key: &DefaultPickKey,
    ) -> Result<Option<CreatedDefaultPick>, PersistenceError>;
}

/// Store operations for imported headlines.
#[async_trait]
pub trait HeadlineRepository: Send + Sync {
    async fn add(&self, headline: NewHeadline) -> Result<SurrogateId, PersistenceError>;
    async fn delete_for_league(&self, league_id: i32) -> Result<u64, PersistenceError>;
    async fn list_for_league(
        &self,
        league_id: i32,
        limit: i64,
    ) -> Result<Vec<Headline>, PersistenceError>;
}
