//! In-process event plumbing.
//!
//! The only event today is [`HeadlineRefresh`], emitted by the HTTP
//! surface and consumed by the headline importer. Events are idempotent
//! and ephemeral; they carry identifiers and the consumer re-reads
//! current state from the store.

pub mod channels;
pub mod types;

pub use channels::{
    DEFAULT_CHANNEL_BUFFER, HeadlineRefreshReceiver, HeadlineRefreshSender,
    headline_refresh_channel,
};
pub use types::HeadlineRefresh;
