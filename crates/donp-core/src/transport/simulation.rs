use log::info;

use super::{Transport, TransportError};
use crate::schema::Direction;
use crate::transcode::{FrameMarkers, Transcoder};

/// Placeholder transport that logs both frames for visibility.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    transcoder: Transcoder,
    markers: FrameMarkers,
    exchanges: u64,
}

impl SimulatedTransport {
    pub fn new(transcoder: Transcoder, markers: FrameMarkers) -> Self {
        Self {
            transcoder,
            markers,
            exchanges: 0,
        }
    }

    /// Number of successful exchanges so far.
    pub fn exchanges(&self) -> u64 {
        self.exchanges
    }
}

impl Transport for SimulatedTransport {
    fn exchange(&mut self, tx: &[u8], rx: &[u8]) -> Result<(), TransportError> {
        if tx.is_empty() {
            return Err(TransportError::EmptyFrame {
                direction: Direction::Transmit,
            });
        }
        info!(
            "Simulated TX: {}",
            self.transcoder.to_display_hex(tx, &self.markers)
        );
        if rx.is_empty() {
            return Err(TransportError::EmptyFrame {
                direction: Direction::Receive,
            });
        }
        info!(
            "Simulated RX: {}",
            self.transcoder.to_display_hex(rx, &self.markers)
        );
        self.exchanges += 1;
        Ok(())
    }
}
