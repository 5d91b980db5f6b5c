//! DONP core library: schema-driven protocol message encoding.
//!
//! A JSON schema describes frame layouts (prototypes), devices and their
//! messages. The engine resolves every segment of a layout by name, packs
//! the values big-endian at the segment's width, wraps the frame in its
//! prefix/suffix markers, computes the checksum over the bytes built so far
//! and finally transcodes the frame into its wire form (raw bytes or
//! ASCII-hex text). A simulated transport drives transmit/receive
//! transactions and the receive frame's checksum is validated.
//!
//! Layering follows the data flow: `schema` (layout/reader/parser) builds the
//! model, `engine` encodes, `checksum` and `transcode` are stateless helpers,
//! `transport` is the exchange boundary.
//!
//! Invariants:
//! - A message's transmit frame is built once and never rewritten.
//! - Segment values are packed big-endian, exactly at the segment's width.
//! - Checksums never cover the prefix bytes.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use donp_core::{Protocol, SimulatedTransport, load_schema_file};
//!
//! let definition = load_schema_file(Path::new("modbusRtu.json"))?;
//! let mut protocol = Protocol::with_seed(definition, Some(7));
//! let engine = protocol.engine();
//! let mut transport = SimulatedTransport::new(engine.transcoder(), engine.markers().clone());
//! let report = protocol.run(&mut transport, 10);
//! println!("{} of {} transactions succeeded", report.transactions_succeeded, report.transactions_total);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

mod checksum;
mod engine;
mod schema;
mod stats;
mod transcode;
mod transport;

pub use checksum::{Checksum, ChecksumKind, crc16, lrc};
pub use engine::{
    BuiltFrame, Engine, EngineError, FixedPayload, PayloadSource, Protocol, Resolution,
    SeededPayload, TransactionOutcome, Unresolved,
};
pub use schema::{
    Device, Direction, Message, ParamValue, ProtocolDefinition, ProtocolSettings, Prototype,
    SchemaError, Segment, load_schema_file, load_schema_str, parse_document,
};
pub use stats::Statistics;
pub use transcode::{FrameMarkers, Transcoder, TransmissionMode};
pub use transport::{SimulatedTransport, Transport, TransportError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Timestamp used when the clock cannot be formatted.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

/// Outcome of a simulation run, in device/message order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// RFC3339 timestamp of report generation.
    pub generated_at: String,
    /// Schema path as given on the command line, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Effective protocol settings after defaults were applied.
    pub settings: ProtocolSettings,
    pub iterations: u32,
    pub transactions_total: u64,
    pub transactions_succeeded: u64,
    pub transactions_failed: u64,
    pub messages: Vec<MessageSummary>,
    /// Wall-clock duration of the run in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_s: Option<f64>,
}

/// Tool metadata embedded in reports.
///
/// # Examples
/// ```
/// use donp_core::ToolInfo;
///
/// let tool = ToolInfo {
///     name: "donp".to_string(),
///     version: "0.1.0".to_string(),
/// };
/// assert_eq!(tool.name, "donp");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Per-message transaction tally.
#[derive(Debug, Clone, Serialize)]
pub struct MessageSummary {
    pub device: String,
    pub address: u64,
    pub message: String,
    /// Stored transmit frame as flat upper-case hex (empty if never built).
    pub transmit_frame: String,
    pub attempts: u64,
    pub succeeded: u64,
    /// Failure counts keyed by outcome name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub failures: BTreeMap<String, u64>,
    /// Segments left out of the transmit frame.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved_segments: Vec<String>,
}

pub(crate) fn make_run_report(
    settings: ProtocolSettings,
    iterations: u32,
    messages: Vec<MessageSummary>,
    elapsed: Option<Duration>,
) -> RunReport {
    let transactions_total = messages.iter().map(|m| m.attempts).sum();
    let transactions_succeeded = messages.iter().map(|m| m.succeeded).sum();
    RunReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "donp".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| DEFAULT_GENERATED_AT.to_string()),
        schema: None,
        settings,
        iterations,
        transactions_total,
        transactions_succeeded,
        transactions_failed: transactions_total - transactions_succeeded,
        messages,
        elapsed_s: elapsed.map(|d| d.as_secs_f64()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{MessageSummary, ProtocolSettings, REPORT_VERSION, make_run_report};

    fn summary(attempts: u64, succeeded: u64) -> MessageSummary {
        MessageSummary {
            device: "plc".to_string(),
            address: 1,
            message: "read".to_string(),
            transmit_frame: "0103".to_string(),
            attempts,
            succeeded,
            failures: BTreeMap::new(),
            unresolved_segments: Vec::new(),
        }
    }

    #[test]
    fn report_totals_sum_messages() {
        let report = make_run_report(
            ProtocolSettings::default(),
            2,
            vec![summary(2, 2), summary(2, 1)],
            None,
        );
        assert_eq!(report.report_version, REPORT_VERSION);
        assert_eq!(report.transactions_total, 4);
        assert_eq!(report.transactions_succeeded, 3);
        assert_eq!(report.transactions_failed, 1);
        assert!(report.generated_at.contains('T'));
    }

    #[test]
    fn report_omits_absent_optional_fields() {
        let report = make_run_report(ProtocolSettings::default(), 1, vec![summary(1, 1)], None);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("schema").is_none());
        assert!(json.get("elapsed_s").is_none());
        assert!(json["messages"][0].get("failures").is_none());
        assert!(json["messages"][0].get("unresolved_segments").is_none());
        assert_eq!(json["settings"]["transmission_mode"], "hex");
        assert_eq!(json["settings"]["checksum_kind"], "CRC16");
    }
}
