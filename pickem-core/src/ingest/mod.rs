//! The message ingestion pipeline.
//!
//! Deliveries flow transport → [`decode`] → [`dispatch`] (keyed by
//! exchange) → entity handler → repository. Every failure class is
//! contained at the dispatcher boundary; the transport acknowledges after
//! the dispatcher returns, whatever the outcome.

pub mod decode;
pub mod dispatch;
pub mod error;
pub mod handlers;

pub use decode::{NormalizedMessage, decode};
pub use dispatch::{Dispatcher, ProcessingResult};
pub use error::{DecodeError, ProcessError, ValidationError};
