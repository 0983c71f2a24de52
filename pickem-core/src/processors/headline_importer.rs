//! HeadlineImporter processor.
//!
//! The importer is responsible for:
//! - Refreshing every league's headlines on a steady interval
//! - Reacting to `HeadlineRefresh` events from the HTTP surface
//! - Replacing a league's stored headlines with the current feed content
//!   (delete the old rows, then insert the new ones)
//!
//! A league whose feed is unreachable or unparseable is logged and
//! skipped; the cycle continues with the remaining leagues.

use crate::entities::league::CreatedLeague;
use crate::events::HeadlineRefreshReceiver;
use crate::feeds::{self, FeedError, FeedFetcher};
use crate::repository::{HeadlineRepository, LeagueRepository, PersistenceError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Errors that can fail a single league's import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Imports RSS headlines into the store.
pub struct HeadlineImporter<L, H, F> {
    leagues: L,
    headlines: H,
    fetcher: F,
    refresh_interval: Duration,
}

impl<L, H, F> HeadlineImporter<L, H, F>
where
    L: LeagueRepository,
    H: HeadlineRepository,
    F: FeedFetcher,
{
    pub fn new(leagues: L, headlines: H, fetcher: F, refresh_interval: Duration) -> Self {
        Self {
            leagues,
            headlines,
            fetcher,
            refresh_interval,
        }
    }

    /// Run the importer until shutdown is signaled.
    pub async fn run(
        self,
        mut shutdown_rx: watch::Receiver<bool>,
        mut refresh_rx: HeadlineRefreshReceiver,
    ) {
        info!("HeadlineImporter started");

        loop {
            tokio::select! {
                biased;

                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("HeadlineImporter received shutdown signal");
                        break;
                    }
                }

                Some(event) = refresh_rx.recv() => {
                    debug!(sport_id = event.sport_id, "Received HeadlineRefresh");
                    self.refresh_sport(event.sport_id).await;
                }

                _ = tokio::time::sleep(self.refresh_interval) => {
                    self.refresh_all().await;
                }
            }
        }

        info!("HeadlineImporter shutdown complete");
    }

    /// Refresh every league under one sport.
    pub async fn refresh_sport(&self, sport_id: i32) {
        match self.leagues.list_by_sport(sport_id).await {
            Ok(leagues) if leagues.is_empty() => {
                warn!(sport_id, "no leagues to refresh");
            }
            Ok(leagues) => self.refresh_leagues(&leagues).await,
            Err(err) => {
                error!(sport_id, error = %err, "failed to load leagues for refresh");
            }
        }
    }

    async fn refresh_all(&self) {
        match self.leagues.list_all().await {
            Ok(leagues) => {
                debug!(count = leagues.len(), "starting scheduled headline refresh");
                self.refresh_leagues(&leagues).await;
            }
            Err(err) => {
                error!(error = %err, "failed to load leagues for scheduled refresh");
            }
        }
    }

    async fn refresh_leagues(&self, leagues: &[CreatedLeague]) {
        for league in leagues {
            match self.import_league(league).await {
                Ok(stored) => {
                    info!(league_id = league.league_id, stored, "headline refresh complete");
                }
                Err(err) => {
                    error!(league_id = league.league_id, error = %err, "headline refresh failed");
                }
            }
        }
    }

    /// Replace one league's stored headlines with the current feed content.
    ///
    /// Old rows are dropped only after the feed has been fetched and
    /// parsed, so a dead feed never wipes what is already stored.
    /// Per-item insert failures are logged and skipped.
    pub async fn import_league(&self, league: &CreatedLeague) -> Result<u32, ImportError> {
        let body = self.fetcher.fetch(&league.url).await?;
        let items = feeds::parse_channel(&body)?;

        let mapped: Vec<_> = items
            .iter()
            .filter_map(|item| feeds::to_headline(item, league.league_id))
            .collect();
        if mapped.len() < items.len() {
            debug!(
                league_id = league.league_id,
                dropped = items.len() - mapped.len(),
                "skipped invalid feed items"
            );
        }

        self.headlines.delete_for_league(league.league_id).await?;

        let mut stored = 0u32;
        for headline in mapped {
            match self.headlines.add(headline).await {
                Ok(_) => stored += 1,
                Err(err) => {
                    warn!(
                        league_id = league.league_id,
                        error = %err,
                        "headline insert failed, continuing"
                    );
                }
            }
        }

        Ok(stored)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::league::CreatedLeague;
    use crate::ingest::handlers::testing::{FakeHeadlineRepository, FakeLeagueRepository};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use time::macros::datetime;

    const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0">
  <channel>
    <item>
      <title>Chiefs clinch the division</title>
      <description>A late field goal seals it.</description>
      <link>http://example.com/stories/1</link>
      <pubDate>Thu, 10 Oct 2024 14:30:00 GMT</pubDate>
    </item>
    <item>
      <title>Bills sign a kicker</title>
      <description>Special teams get a boost.</description>
      <link>http://example.com/stories/2</link>
      <pubDate>Thu, 10 Oct 2024 09:00:00 -0500</pubDate>
    </item>
  </channel>
</rss>"#;

    #[derive(Clone, Default)]
    struct FakeFetcher {
        bodies: Arc<Mutex<HashMap<String, String>>>,
    }

    impl FakeFetcher {
        fn with_feed(url: &str, body: &str) -> Self {
            let fetcher = Self::default();
            fetcher
                .bodies
                .lock()
                .unwrap()
                .insert(url.to_owned(), body.to_owned());
            fetcher
        }
    }

    #[async_trait]
    impl FeedFetcher for FakeFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FeedError> {
            self.bodies
                .lock()
                .unwrap()
                .get(url)
                .cloned()
                .ok_or(FeedError::Status { status: 404 })
        }
    }

    fn league(league_id: i32, sport_id: i32, url: &str) -> CreatedLeague {
        CreatedLeague {
            created_league_id: league_id,
            league_id,
            name: format!("league-{league_id}"),
            url: url.to_owned(),
            sport_id,
            event_date: datetime!(2024-10-01 00:00:00 UTC),
        }
    }

    fn importer(
        leagues: &FakeLeagueRepository,
        headlines: &FakeHeadlineRepository,
        fetcher: &FakeFetcher,
    ) -> HeadlineImporter<FakeLeagueRepository, FakeHeadlineRepository, FakeFetcher> {
        HeadlineImporter::new(
            leagues.clone(),
            headlines.clone(),
            fetcher.clone(),
            Duration::from_secs(900),
        )
    }

    #[tokio::test]
    async fn import_replaces_old_rows_with_feed_content() {
        let leagues = FakeLeagueRepository::new();
        let headlines = FakeHeadlineRepository::new();
        let fetcher = FakeFetcher::with_feed("http://feeds.example.com/afc", FEED);
        let target = league(5, 2, "http://feeds.example.com/afc");

        let stored = importer(&leagues, &headlines, &fetcher)
            .import_league(&target)
            .await
            .unwrap();

        assert_eq!(stored, 2);
        let calls = headlines.calls.entries();
        assert_eq!(calls[0], "delete league_id=5");
        assert_eq!(calls.len(), 3);
        assert_eq!(
            headlines.added.lock().unwrap()[0].pub_date,
            datetime!(2024-10-10 14:30:00 UTC)
        );
    }

    #[tokio::test]
    async fn dead_feed_keeps_stored_rows_untouched() {
        let leagues = FakeLeagueRepository::new();
        let headlines = FakeHeadlineRepository::new();
        let fetcher = FakeFetcher::default();
        let target = league(5, 2, "http://feeds.example.com/afc");

        let err = importer(&leagues, &headlines, &fetcher)
            .import_league(&target)
            .await
            .unwrap_err();

        assert!(matches!(err, ImportError::Feed(FeedError::Status { status: 404 })));
        assert!(headlines.calls.entries().is_empty());
    }

    #[tokio::test]
    async fn one_failing_insert_does_not_stop_the_rest() {
        let leagues = FakeLeagueRepository::new();
        let headlines = FakeHeadlineRepository::new();
        headlines
            .fail_headings
            .lock()
            .unwrap()
            .push("Chiefs clinch the division".to_owned());
        let fetcher = FakeFetcher::with_feed("http://feeds.example.com/afc", FEED);
        let target = league(5, 2, "http://feeds.example.com/afc");

        let stored = importer(&leagues, &headlines, &fetcher)
            .import_league(&target)
            .await
            .unwrap();

        assert_eq!(stored, 1);
        assert_eq!(headlines.added.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn refresh_sport_walks_every_league_under_the_sport() {
        let leagues = FakeLeagueRepository::new();
        leagues.rows.lock().unwrap().extend([
            league(5, 2, "http://feeds.example.com/afc"),
            league(6, 2, "http://feeds.example.com/nfc"),
            league(9, 3, "http://feeds.example.com/other"),
        ]);
        let headlines = FakeHeadlineRepository::new();
        let fetcher = FakeFetcher::with_feed("http://feeds.example.com/afc", FEED);
        fetcher
            .bodies
            .lock()
            .unwrap()
            .insert("http://feeds.example.com/nfc".to_owned(), FEED.to_owned());

        importer(&leagues, &headlines, &fetcher).refresh_sport(2).await;

        let calls = headlines.calls.entries();
        assert!(calls.contains(&"delete league_id=5".to_owned()));
        assert!(calls.contains(&"delete league_id=6".to_owned()));
        assert!(!calls.contains(&"delete league_id=9".to_owned()));
    }
}
