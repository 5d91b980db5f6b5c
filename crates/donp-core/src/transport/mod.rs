//! Transport boundary.
//!
//! The engine hands every transaction's transmit and receive frames to a
//! `Transport`. Timing, retries and the configured timeout belong to the
//! transport; the engine only needs a success or failure signal.

use thiserror::Error;

use crate::schema::Direction;

mod simulation;

pub use simulation::SimulatedTransport;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("cannot exchange an empty {direction} frame")]
    EmptyFrame { direction: Direction },
    #[error("transport failure: {0}")]
    Failed(String),
}

/// Carries one transmit/receive exchange.
pub trait Transport {
    fn exchange(&mut self, tx: &[u8], rx: &[u8]) -> Result<(), TransportError>;
}
