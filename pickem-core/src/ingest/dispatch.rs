//! Exchange-to-handler routing and the error-containment boundary.
//!
//! Every delivery ends in an acknowledgment regardless of outcome.
//! Decode, routing and validation failures are deterministic and would
//! loop forever on redelivery; persistence failures are acknowledged too
//! so a poison message can never wedge a queue. Redelivery is reserved
//! for process crashes, which the handlers' delete-before-insert protocol
//! makes safe to repeat.

use crate::ingest::decode;
use crate::ingest::error::ProcessError;
use crate::ingest::handlers::MessageHandler;
use crate::utils::keyed_lock::KeyedLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};

/// Outcome of routing a single delivery.
#[derive(Debug)]
pub enum ProcessingResult {
    /// Handler finished, including the deliberate DELETE no-op.
    Completed,
    /// Handler ran but reported that the write did not happen.
    WriteFailed,
    /// The message was dropped at this boundary; the error says why.
    Discarded(ProcessError),
}

impl ProcessingResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessingResult::Completed)
    }
}

/// Routes deliveries to entity handlers by exchange identity.
#[derive(Default)]
pub struct Dispatcher {
    routes: HashMap<String, Arc<dyn MessageHandler>>,
    identity_locks: KeyedLock,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an exchange to a handler. Later bindings win on conflict.
    pub fn register(mut self, exchange: impl Into<String>, handler: Arc<dyn MessageHandler>) -> Self {
        self.routes.insert(exchange.into(), handler);
        self
    }

    /// The exchanges this dispatcher has handlers for.
    pub fn exchanges(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    /// Decode and process one delivery.
    ///
    /// Never returns an error; every failure is logged here with the
    /// exchange identity and raw payload and folded into the result.
    pub async fn dispatch(&self, exchange: &str, payload: &[u8]) -> ProcessingResult {
        let message = match decode::decode(payload) {
            Ok(message) => message,
            Err(err) => {
                error!(
                    exchange,
                    payload = %String::from_utf8_lossy(payload),
                    error = %err,
                    "discarding undecodable delivery"
                );
                return ProcessingResult::Discarded(err.into());
            }
        };

        let Some(handler) = self.routes.get(exchange) else {
            error!(exchange, "discarding delivery for unbound exchange");
            return ProcessingResult::Discarded(ProcessError::Routing(exchange.to_owned()));
        };

        // Same-identity deliveries must not interleave their delete+insert
        // windows; the guard spans the whole handler call.
        let _identity_guard = match handler.lock_key(&message) {
            Some(key) => {
                let scoped = format!("{}:{key}", handler.entity());
                Some(self.identity_locks.acquire(&scoped).await)
            }
            None => None,
        };

        match handler.handle(&message).await {
            Ok(true) => {
                debug!(exchange, entity = handler.entity(), "delivery processed");
                ProcessingResult::Completed
            }
            Ok(false) => {
                error!(
                    exchange,
                    entity = handler.entity(),
                    payload = %String::from_utf8_lossy(payload),
                    "write did not complete"
                );
                ProcessingResult::WriteFailed
            }
            Err(err) => {
                error!(
                    exchange,
                    entity = handler.entity(),
                    payload = %String::from_utf8_lossy(payload),
                    error = %err,
                    "delivery failed"
                );
                ProcessingResult::Discarded(err)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ingest::error::DecodeError;
    use crate::ingest::handlers::testing::{FakeLeagueRepository, FakePickRepository};
    use crate::ingest::handlers::{LeagueHandler, PickHandler, RankingHandler};
    use std::sync::atomic::Ordering;
    use time::macros::datetime;

    const LEAGUE_NEW: &[u8] = br#"{
        "league_id": 5,
        "sport_id": 2,
        "name": "AFC",
        "url": "http://feeds.example.com/afc",
        "status": "NEW",
        "event_date": "2024-10-10T00:00:00Z"
    }"#;

    fn league_dispatcher(repo: &FakeLeagueRepository) -> Dispatcher {
        Dispatcher::new().register("league_exchange", Arc::new(LeagueHandler::new(repo.clone())))
    }

    #[tokio::test]
    async fn league_new_runs_delete_then_add_once_each() {
        let repo = FakeLeagueRepository::new();
        let dispatcher = league_dispatcher(&repo);

        let result = dispatcher.dispatch("league_exchange", LEAGUE_NEW).await;
        assert!(result.is_success());
        assert_eq!(
            repo.calls.entries(),
            vec!["delete sport_id=2 name=AFC", "add"]
        );
        assert_eq!(
            repo.added.lock().unwrap()[0].event_date,
            datetime!(2024-10-10 00:00:00 UTC)
        );
    }

    #[tokio::test]
    async fn redelivered_message_repeats_the_same_protocol() {
        let repo = FakeLeagueRepository::new();
        let dispatcher = league_dispatcher(&repo);

        assert!(dispatcher.dispatch("league_exchange", LEAGUE_NEW).await.is_success());
        assert!(dispatcher.dispatch("league_exchange", LEAGUE_NEW).await.is_success());

        // Each delivery deletes before it inserts, so a second delivery
        // can never leave two rows behind.
        assert_eq!(
            repo.calls.entries(),
            vec![
                "delete sport_id=2 name=AFC",
                "add",
                "delete sport_id=2 name=AFC",
                "add",
            ]
        );
    }

    #[tokio::test]
    async fn unknown_exchange_is_discarded_not_a_crash() {
        let repo = FakeLeagueRepository::new();
        let dispatcher = league_dispatcher(&repo);

        let result = dispatcher.dispatch("results_exchange", LEAGUE_NEW).await;
        assert!(matches!(
            result,
            ProcessingResult::Discarded(ProcessError::Routing(_))
        ));
        assert!(repo.calls.entries().is_empty());
    }

    #[tokio::test]
    async fn malformed_payload_is_discarded() {
        let repo = FakeLeagueRepository::new();
        let dispatcher = league_dispatcher(&repo);

        let result = dispatcher.dispatch("league_exchange", b"{oops").await;
        assert!(matches!(
            result,
            ProcessingResult::Discarded(ProcessError::Decode(DecodeError::Json(_)))
        ));
    }

    #[tokio::test]
    async fn handler_errors_are_contained() {
        let repo = FakeLeagueRepository::new();
        repo.fail_delete.store(true, Ordering::SeqCst);
        let dispatcher = league_dispatcher(&repo);

        let result = dispatcher.dispatch("league_exchange", LEAGUE_NEW).await;
        assert!(matches!(
            result,
            ProcessingResult::Discarded(ProcessError::Persistence(_))
        ));
    }

    #[tokio::test]
    async fn camel_cased_payload_routes_and_normalizes() {
        let repo = FakeLeagueRepository::new();
        let dispatcher = league_dispatcher(&repo);

        let payload = br#"{
            "leagueId": 5,
            "sportId": 2,
            "name": "AFC",
            "url": "http://feeds.example.com/afc",
            "status": "NEW",
            "eventDate": "2024-10-10T00:00:00Z"
        }"#;
        assert!(dispatcher.dispatch("league_exchange", payload).await.is_success());
        assert_eq!(repo.added.lock().unwrap()[0].league_id, 5);
    }

    #[tokio::test]
    async fn ranking_exchange_reports_write_failure() {
        let dispatcher = Dispatcher::new().register("ranking_exchange", Arc::new(RankingHandler));
        let result = dispatcher.dispatch("ranking_exchange", b"{}").await;
        assert!(matches!(result, ProcessingResult::WriteFailed));
    }

    #[tokio::test]
    async fn every_registered_exchange_is_listed() {
        let league_repo = FakeLeagueRepository::new();
        let pick_repo = FakePickRepository::new();
        let dispatcher = Dispatcher::new()
            .register(
                "league_exchange",
                Arc::new(LeagueHandler::new(league_repo.clone())),
            )
            .register("pick_exchange", Arc::new(PickHandler::new(pick_repo.clone())))
            .register("ranking_exchange", Arc::new(RankingHandler));

        let mut exchanges: Vec<&str> = dispatcher.exchanges().collect();
        exchanges.sort_unstable();
        assert_eq!(
            exchanges,
            vec!["league_exchange", "pick_exchange", "ranking_exchange"]
        );
    }
}
