//! Entity handlers, one per exchange.
//!
//! Every handler runs the same protocol: typed parse, unconditional delete
//! of the natural identity, DELETE short-circuit, date normalization,
//! insert. The delete-before-insert step is what makes redelivered
//! messages safe to repeat.

use crate::ingest::decode::NormalizedMessage;
use crate::ingest::error::ProcessError;
use async_trait::async_trait;

mod default_pick;
mod league;
mod pick;
mod ranking;
mod user_team;
mod week;

pub use default_pick::DefaultPickHandler;
pub use league::LeagueHandler;
pub use pick::PickHandler;
pub use ranking::RankingHandler;
pub use user_team::UserTeamHandler;
pub use week::WeekHandler;

/// A consumer of one entity type's deliveries.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Short entity tag used for log fields and lock namespacing.
    fn entity(&self) -> &'static str;

    /// Natural-identity key read straight off the normalized map, used to
    /// serialize concurrent deliveries for the same logical entity.
    ///
    /// `None` when the identity fields are absent (the typed parse will
    /// reject the message anyway) or when the entity has no identity to
    /// serialize on.
    fn lock_key(&self, message: &NormalizedMessage) -> Option<String>;

    /// Process one delivery.
    ///
    /// `Ok(true)` covers both a completed write and a deliberate DELETE
    /// no-op. `Ok(false)` means the write did not happen; it is surfaced
    /// as a failure without automatic retry.
    async fn handle(&self, message: &NormalizedMessage) -> Result<bool, ProcessError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod testing {
    //! Recording in-memory repositories shared by the handler, dispatcher
    //! and importer tests. Interiors are Arc-shared so a test can keep a
    //! handle after moving a clone into the code under test.

    use crate::entities::default_pick::{CreatedDefaultPick, DefaultPickKey, NewDefaultPick};
    use crate::entities::headline::{Headline, NewHeadline};
    use crate::entities::league::{CreatedLeague, LeagueKey, NewLeague};
    use crate::entities::pick::{CreatedPick, NewPick, NewPickDetail, PickKey};
    use crate::entities::user_team::{CreatedUserTeam, NewUserTeam, UserTeamKey};
    use crate::entities::week::{CreatedWeek, NewWeek, WeekKey};
    use crate::repository::{
        DefaultPickRepository, HeadlineRepository, LeagueRepository, PersistenceError,
        PickRepository, SurrogateId, UserTeamRepository, WeekRepository,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
    use std::sync::{Arc, Mutex};

    fn store_down() -> PersistenceError {
        PersistenceError::Database(sqlx::Error::PoolClosed)
    }

    /// Ordered call journal, asserted on by the protocol tests.
    #[derive(Default)]
    pub struct Journal {
        entries: Mutex<Vec<String>>,
    }

    impl Journal {
        pub fn push(&self, entry: impl Into<String>) {
            self.entries.lock().unwrap().push(entry.into());
        }

        pub fn entries(&self) -> Vec<String> {
            self.entries.lock().unwrap().clone()
        }
    }

    #[derive(Clone)]
    pub struct FakeLeagueRepository {
        pub calls: Arc<Journal>,
        pub added: Arc<Mutex<Vec<NewLeague>>>,
        pub rows: Arc<Mutex<Vec<CreatedLeague>>>,
        pub fail_delete: Arc<AtomicBool>,
        pub fail_add: Arc<AtomicBool>,
        pub next_id: Arc<AtomicI32>,
    }

    impl FakeLeagueRepository {
        pub fn new() -> Self {
            Self {
                calls: Arc::new(Journal::default()),
                added: Arc::new(Mutex::new(Vec::new())),
                rows: Arc::new(Mutex::new(Vec::new())),
                fail_delete: Arc::new(AtomicBool::new(false)),
                fail_add: Arc::new(AtomicBool::new(false)),
                next_id: Arc::new(AtomicI32::new(1)),
            }
        }

        /// Simulates a store that inserts but reports no usable id.
        pub fn returning_zero() -> Self {
            let repo = Self::new();
            repo.next_id.store(0, Ordering::SeqCst);
            repo
        }
    }

    #[async_trait]
    impl LeagueRepository for FakeLeagueRepository {
        async fn add(&self, league: NewLeague) -> Result<SurrogateId, PersistenceError> {
            if self.fail_add.load(Ordering::SeqCst) {
                return Err(store_down());
            }
            self.calls.push("add");
            self.added.lock().unwrap().push(league);
            Ok(self.next_id.load(Ordering::SeqCst))
        }

        async fn delete(&self, key: &LeagueKey) -> Result<bool, PersistenceError> {
            if self.fail_delete.load(Ordering::SeqCst) {
                return Err(store_down());
            }
            self.calls
                .push(format!("delete sport_id={} name={}", key.sport_id, key.name));
            Ok(false)
        }

        async fn get(&self, _key: &LeagueKey) -> Result<Option<CreatedLeague>, PersistenceError> {
            Ok(None)
        }

        async fn list_by_sport(
            &self,
            sport_id: i32,
        ) -> Result<Vec<CreatedLeague>, PersistenceError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .filter(|row| row.sport_id == sport_id)
                .cloned()
                .collect())
        }

        async fn list_all(&self) -> Result<Vec<CreatedLeague>, PersistenceError> {
            Ok(self.rows.lock().unwrap().clone())
        }
    }

    #[derive(Clone)]
    pub struct FakeUserTeamRepository {
        pub calls: Arc<Journal>,
        pub added: Arc<Mutex<Vec<NewUserTeam>>>,
    }

    impl FakeUserTeamRepository {
        pub fn new() -> Self {
            Self {
                calls: Arc::new(Journal::default()),
                added: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl UserTeamRepository for FakeUserTeamRepository {
        async fn add(&self, user_team: NewUserTeam) -> Result<SurrogateId, PersistenceError> {
            self.calls.push("add");
            self.added.lock().unwrap().push(user_team);
            Ok(1)
        }

        async fn delete(&self, key: &UserTeamKey) -> Result<bool, PersistenceError> {
            self.calls.push(format!(
                "delete name={} season_id={}",
                key.name, key.season_id
            ));
            Ok(false)
        }

        async fn get(
            &self,
            _key: &UserTeamKey,
        ) -> Result<Option<CreatedUserTeam>, PersistenceError> {
            Ok(None)
        }
    }

    #[derive(Clone)]
    pub struct FakeWeekRepository {
        pub calls: Arc<Journal>,
        pub added: Arc<Mutex<Vec<NewWeek>>>,
    }

    impl FakeWeekRepository {
        pub fn new() -> Self {
            Self {
                calls: Arc::new(Journal::default()),
                added: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl WeekRepository for FakeWeekRepository {
        async fn add(&self, week: NewWeek) -> Result<SurrogateId, PersistenceError> {
            self.calls.push("add");
            self.added.lock().unwrap().push(week);
            Ok(1)
        }

        async fn delete(&self, key: &WeekKey) -> Result<bool, PersistenceError> {
            self.calls.push(format!(
                "delete week_number={} season_id={}",
                key.week_number, key.season_id
            ));
            Ok(false)
        }

        async fn get(&self, _key: &WeekKey) -> Result<Option<CreatedWeek>, PersistenceError> {
            Ok(None)
        }
    }

    #[derive(Clone)]
    pub struct FakePickRepository {
        pub calls: Arc<Journal>,
        pub details: Arc<Mutex<Vec<NewPickDetail>>>,
        pub fail_detail_ids: Arc<Mutex<Vec<i32>>>,
        pub next_id: Arc<AtomicI32>,
    }

    impl FakePickRepository {
        pub fn new() -> Self {
            Self {
                calls: Arc::new(Journal::default()),
                details: Arc::new(Mutex::new(Vec::new())),
                fail_detail_ids: Arc::new(Mutex::new(Vec::new())),
                next_id: Arc::new(AtomicI32::new(7)),
            }
        }
    }

    #[async_trait]
    impl PickRepository for FakePickRepository {
        async fn add(&self, _pick: NewPick) -> Result<SurrogateId, PersistenceError> {
            self.calls.push("add");
            Ok(self.next_id.load(Ordering::SeqCst))
        }

        async fn add_detail(&self, detail: NewPickDetail) -> Result<SurrogateId, PersistenceError> {
            if self
                .fail_detail_ids
                .lock()
                .unwrap()
                .contains(&detail.pick_detail_id)
            {
                return Err(store_down());
            }
            self.calls
                .push(format!("add_detail pick_detail_id={}", detail.pick_detail_id));
            self.details.lock().unwrap().push(detail);
            Ok(1)
        }

        async fn delete(&self, key: &PickKey) -> Result<bool, PersistenceError> {
            self.calls.push(format!(
                "delete pick_id={} user_team_id={}",
                key.pick_id, key.user_team_id
            ));
            Ok(false)
        }

        async fn get(&self, _key: &PickKey) -> Result<Option<CreatedPick>, PersistenceError> {
            Ok(None)
        }
    }

    #[derive(Clone)]
    pub struct FakeDefaultPickRepository {
        pub calls: Arc<Journal>,
        pub added: Arc<Mutex<Vec<NewDefaultPick>>>,
    }

    impl FakeDefaultPickRepository {
        pub fn new() -> Self {
            Self {
                calls: Arc::new(Journal::default()),
                added: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl DefaultPickRepository for FakeDefaultPickRepository {
        async fn add(&self, default_pick: NewDefaultPick) -> Result<SurrogateId, PersistenceError> {
            self.calls.push("add");
            self.added.lock().unwrap().push(default_pick);
            Ok(1)
        }

        async fn delete(&self, key: &DefaultPickKey) -> Result<bool, PersistenceError> {
            self.calls.push(format!(
                "delete game_id={} week_id={}",
                key.game_id, key.week_id
            ));
            Ok(false)
        }

        async fn get(
            &self,
            _key: &DefaultPickKey,
        ) -> Result<Option<CreatedDefaultPick>, PersistenceError> {
            Ok(None)
        }
    }

    #[derive(Clone)]
    pub struct FakeHeadlineRepository {
        pub calls: Arc<Journal>,
        pub added: Arc<Mutex<Vec<NewHeadline>>>,
        pub fail_headings: Arc<Mutex<Vec<String>>>,
    }

    impl FakeHeadlineRepository {
        pub fn new() -> Self {
            Self {
                calls: Arc::new(Journal::default()),
                added: Arc::new(Mutex::new(Vec::new())),
                fail_headings: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl HeadlineRepository for FakeHeadlineRepository {
        async fn add(&self, headline: NewHeadline) -> Result<SurrogateId, PersistenceError> {
            if self
                .fail_headings
                .lock()
                .unwrap()
                .contains(&headline.heading)
            {
                return Err(store_down());
            }
            self.calls.push(format!("add heading={}", headline.heading));
            self.added.lock().unwrap().push(headline);
            Ok(1)
        }

        async fn delete_for_league(&self, league_id: i32) -> Result<u64, PersistenceError> {
            self.calls.push(format!("delete league_id={league_id}"));
            Ok(0)
        }

        async fn list_for_league(
            &self,
            _league_id: i32,
            _limit: i64,
        ) -> Result<Vec<Headline>, PersistenceError> {
            Ok(Vec::new())
        }
    }
}
