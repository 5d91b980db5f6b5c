use thiserror::Error;

use crate::schema::Direction;

/// Errors returned while building a frame.
///
/// # Examples
/// ```
/// use donp_core::{Direction, EngineError};
///
/// let err = EngineError::MissingSegments {
///     prototype: "read".to_string(),
///     direction: Direction::Receive,
/// };
/// assert!(err.to_string().contains("no receive segments"));
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("prototype '{prototype}' has no {direction} segments")]
    MissingSegments {
        prototype: String,
        direction: Direction,
    },
    #[error("no prototype named '{name}'")]
    UnknownPrototype { name: String },
    #[error("no message #{message} on device #{device}")]
    NoMessage { device: usize, message: usize },
}
