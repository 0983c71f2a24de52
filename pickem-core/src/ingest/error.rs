use crate::repository::PersistenceError;
use crate::utils::dates::DateError;
use thiserror::Error;

/// The payload could not be turned into a normalized mapping.
///
/// Unparseable payloads can never succeed on redelivery, so they are
/// acknowledged and dropped.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload root is not a JSON object")]
    NotAnObject,
}

/// A decodable message failed field-level validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("missing or malformed field: {0}")]
    Field(String),

    #[error("invalid date: {0}")]
    Date(#[from] DateError),
}

/// Everything that can stop a delivery from being processed.
///
/// All variants are acknowledged; see the dispatcher for the containment
/// policy per class.
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("no handler bound to exchange {0:?}")]
    Routing(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
