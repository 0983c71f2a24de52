use crate::ingest::decode::NormalizedMessage;
use crate::ingest::error::ProcessError;
use crate::ingest::handlers::MessageHandler;
use async_trait::async_trait;
use tracing::warn;

/// Placeholder for the ranking exchange.
///
/// The exchange is declared and bound so producers do not error, but the
/// display schema has nowhere to put rankings yet; every delivery is
/// reported as an unprocessed write.
// TODO: persist rankings once the display schema grows a rankings table.
pub struct RankingHandler;

#[async_trait]
impl MessageHandler for RankingHandler {
    fn entity(&self) -> &'static str {
        "ranking"
    }

    fn lock_key(&self, _message: &NormalizedMessage) -> Option<String> {
        None
    }

    async fn handle(&self, _message: &NormalizedMessage) -> Result<bool, ProcessError> {
        warn!("ranking deliveries are not persisted");
        Ok(false)
    }
}
