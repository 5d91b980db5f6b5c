//! Checksum engine.
//!
//! Stateless integrity algorithms over raw byte slices: CRC-16 (Modbus
//! flavour, 2-byte field stored high byte first so the frame carries the
//! canonical Modbus byte pair) and LRC (1-byte two's complement of the sum).
//! Leading prefix bytes are framing markers and are never part of the data.
//!
//! Validation always normalises a frame to binary through the transcoder
//! first, so it works the same in binary and text-hex transmission modes.

use std::fmt;

use log::{debug, warn};
use serde::{Serialize, Serializer};

use crate::transcode::{FrameMarkers, Transcoder};

pub mod crc16;
pub mod lrc;

/// Checksum algorithm selected by the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksumKind {
    Crc16,
    Lrc,
    /// Unrecognised identifier; no checksum is enforced.
    Unsupported(String),
}

impl ChecksumKind {
    /// Parse a schema identifier (case-insensitive).
    ///
    /// # Examples
    /// ```
    /// use donp_core::ChecksumKind;
    ///
    /// assert_eq!(ChecksumKind::from_name("crc16"), ChecksumKind::Crc16);
    /// assert_eq!(ChecksumKind::from_name("LRC"), ChecksumKind::Lrc);
    /// assert!(matches!(ChecksumKind::from_name("xor"), ChecksumKind::Unsupported(_)));
    /// ```
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "CRC16" | "CRC" | "CRC-16" => ChecksumKind::Crc16,
            "LRC" => ChecksumKind::Lrc,
            _ => {
                warn!("Checksum: unknown checksum calculation '{name}', no checksum enforced");
                ChecksumKind::Unsupported(name.to_string())
            }
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ChecksumKind::Crc16 => "CRC16",
            ChecksumKind::Lrc => "LRC",
            ChecksumKind::Unsupported(name) => name,
        }
    }

    /// Width of the trailing checksum field in bytes.
    pub fn field_len(&self) -> usize {
        match self {
            ChecksumKind::Crc16 => crc16::FIELD_LEN,
            ChecksumKind::Lrc => lrc::FIELD_LEN,
            ChecksumKind::Unsupported(_) => 0,
        }
    }
}

impl fmt::Display for ChecksumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ChecksumKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Checksum calculation and validation for one protocol.
#[derive(Debug, Clone)]
pub struct Checksum {
    kind: ChecksumKind,
    transcoder: Transcoder,
}

impl Checksum {
    pub fn new(kind: ChecksumKind, transcoder: Transcoder) -> Self {
        Self { kind, transcoder }
    }

    pub fn field_len(&self) -> usize {
        self.kind.field_len()
    }

    /// Checksum over `bytes` with the leading prefix bytes excluded.
    pub fn calculate(&self, bytes: &[u8], markers: &FrameMarkers) -> u16 {
        let data = bytes.get(markers.prefix_len()..).unwrap_or(&[]);
        match &self.kind {
            ChecksumKind::Crc16 => crc16::calculate(data),
            ChecksumKind::Lrc => u16::from(lrc::calculate(data)),
            ChecksumKind::Unsupported(name) => {
                warn!("Checksum: unknown checksum calculation '{name}', using 0");
                0
            }
        }
    }

    /// Checksum field bytes as they appear in a frame (big-endian).
    ///
    /// # Examples
    /// ```
    /// use donp_core::{Checksum, ChecksumKind, Transcoder, TransmissionMode};
    ///
    /// let checksum = Checksum::new(ChecksumKind::Crc16, Transcoder::new(TransmissionMode::Binary));
    /// assert_eq!(checksum.field_bytes(0xC5CD), vec![0xC5, 0xCD]);
    /// ```
    pub fn field_bytes(&self, value: u16) -> Vec<u8> {
        let bytes = value.to_be_bytes();
        bytes[bytes.len() - self.field_len().min(bytes.len())..].to_vec()
    }

    /// Recompute the checksum of a received frame and compare it with the
    /// trailing checksum field. Mismatches are reported, never raised.
    pub fn validate(&self, message: &[u8], markers: &FrameMarkers) -> bool {
        let field_len = self.field_len();
        if field_len == 0 {
            debug!("Checksum: no checksum enforced for '{}'", self.kind);
            return true;
        }

        let binary = self.transcoder.text_to_binary(message, markers);
        let trailer = markers.suffix_len() + field_len;
        if binary.len() < markers.prefix_len() + trailer {
            warn!(
                "Checksum: frame too short for validation ({} bytes, need at least {})",
                binary.len(),
                markers.prefix_len() + trailer
            );
            return false;
        }

        let end = binary.len() - trailer;
        let received = binary[end..end + field_len]
            .iter()
            .fold(0u16, |acc, byte| (acc << 8) | u16::from(*byte));
        let calculated = self.calculate(&binary[..end], markers);
        if calculated == received {
            debug!("Checksum: valid {received:04X}");
            true
        } else {
            warn!("Checksum: invalid {calculated:04X} instead of {received:04X}");
            false
        }
    }
}
