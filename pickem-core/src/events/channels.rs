use super::types::HeadlineRefresh;
use tokio::sync::mpsc;

/// Default buffer size for event channels.
///
/// Enough to absorb bursts while keeping memory bounded.
pub const DEFAULT_CHANNEL_BUFFER: usize = 256;

/// Sender handle for HeadlineRefresh events.
pub type HeadlineRefreshSender = mpsc::Sender<HeadlineRefresh>;
/// Receiver handle for HeadlineRefresh events.
pub type HeadlineRefreshReceiver = mpsc::Receiver<HeadlineRefresh>;

/// Create a new HeadlineRefresh channel.
///
/// Multiple senders can be cloned from the returned sender.
pub fn headline_refresh_channel() -> (HeadlineRefreshSender, HeadlineRefreshReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_BUFFER)
}
