//! Wire transcoder.
//!
//! Converts frames between their binary form and the text-hex wire form used
//! by ASCII transmission modes, where each data byte travels as two ASCII hex
//! digits while framing markers stay literal. In binary mode every operation
//! is the identity.
//!
//! Decoding is lossy: a byte that is neither a hex digit nor an allowed
//! marker is dropped with a warning.

use std::borrow::Cow;

use log::warn;
use serde::Serialize;

mod markers;

pub use markers::FrameMarkers;

/// Representation of frames on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransmissionMode {
    /// Raw bytes (schema value `hex`).
    #[serde(rename = "hex")]
    Binary,
    /// Two ASCII hex digits per byte (schema value `ascii`).
    #[serde(rename = "ascii")]
    TextHex,
}

impl TransmissionMode {
    /// Parse a schema identifier (case-insensitive); unknown values fall back
    /// to binary.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "hex" | "binary" | "rtu" => TransmissionMode::Binary,
            "ascii" => TransmissionMode::TextHex,
            _ => {
                warn!("Conversion: unknown transmission mode '{name}', using hex");
                TransmissionMode::Binary
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TransmissionMode::Binary => "hex",
            TransmissionMode::TextHex => "ascii",
        }
    }
}

/// Mode-aware frame converter; configured once, stateless afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transcoder {
    mode: TransmissionMode,
}

impl Transcoder {
    pub fn new(mode: TransmissionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> TransmissionMode {
        self.mode
    }

    /// Encode a binary frame into its wire form.
    ///
    /// # Examples
    /// ```
    /// use donp_core::{FrameMarkers, Transcoder, TransmissionMode};
    ///
    /// let transcoder = Transcoder::new(TransmissionMode::TextHex);
    /// let markers = FrameMarkers::new(":", "\r\n");
    /// let wire = transcoder.binary_to_text(&[b':', 0x01, 0xFB, b'\r', b'\n'], &markers);
    /// assert_eq!(&wire[..], b":01FB\r\n");
    /// ```
    pub fn binary_to_text<'a>(&self, bytes: &'a [u8], markers: &FrameMarkers) -> Cow<'a, [u8]> {
        if self.mode == TransmissionMode::Binary {
            return Cow::Borrowed(bytes);
        }
        let len = bytes.len();
        let mut text = Vec::with_capacity(len * 2);
        for (index, byte) in bytes.iter().copied().enumerate() {
            if markers.is_allowed(byte, index, len) {
                text.push(byte);
            } else {
                text.extend_from_slice(hex::encode_upper([byte]).as_bytes());
            }
        }
        Cow::Owned(text)
    }

    /// Decode a wire frame back into binary.
    pub fn text_to_binary<'a>(&self, text: &'a [u8], markers: &FrameMarkers) -> Cow<'a, [u8]> {
        if self.mode == TransmissionMode::Binary {
            return Cow::Borrowed(text);
        }
        let len = text.len();
        let mut bytes = Vec::with_capacity(len / 2 + markers.prefix_len() + markers.suffix_len());
        let mut index = 0;
        while index < len {
            let byte = text[index];
            if markers.is_allowed(byte, index, len) {
                bytes.push(byte);
                index += 1;
                continue;
            }
            if let Some(pair) = text.get(index..index + 2) {
                let mut decoded = [0u8; 1];
                if hex::decode_to_slice(pair, &mut decoded).is_ok() {
                    bytes.push(decoded[0]);
                    index += 2;
                    continue;
                }
            }
            warn!("Conversion: dropping byte {byte:02X} at index {index}, not hex or framing");
            index += 1;
        }
        Cow::Owned(bytes)
    }

    /// Flat upper-case hex rendering of a frame for logs and reports.
    ///
    /// # Examples
    /// ```
    /// use donp_core::{FrameMarkers, Transcoder, TransmissionMode};
    ///
    /// let transcoder = Transcoder::new(TransmissionMode::Binary);
    /// let markers = FrameMarkers::default();
    /// assert_eq!(transcoder.to_display_hex(&[0x11, 0x03, 0x0a], &markers), "11030A");
    /// ```
    pub fn to_display_hex(&self, bytes: &[u8], markers: &FrameMarkers) -> String {
        hex::encode_upper(self.text_to_binary(bytes, markers))
    }
}
