//! Field resolution and encoding engine.
//!
//! Builds framed wire bytes from a prototype layout, a message and its
//! device: prefix, then every segment resolved by name and packed big-endian
//! at its width, then suffix, then transcoding into the wire form. A segment
//! that cannot be resolved is left out and logged; the frame is still built.
//!
//! `Protocol` owns the schema tree and one `Engine`, and drives the
//! transaction loop over all devices and messages, one transaction at a time.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::Serialize;

use crate::checksum::Checksum;
use crate::schema::{Device, Direction, Message, Prototype, ProtocolDefinition, ProtocolSettings};
use crate::stats::Statistics;
use crate::transcode::{FrameMarkers, Transcoder};
use crate::transport::Transport;
use crate::{MessageSummary, RunReport, make_run_report};

pub mod error;
pub mod pack;
pub mod payload;
pub mod resolve;
pub mod sizing;

pub use error::EngineError;
pub use payload::{FixedPayload, PayloadSource, SeededPayload};
pub use resolve::{Resolution, Unresolved};

use pack::pack_values;
use resolve::{ResolveContext, resolve_segment};

/// A built frame plus the names of segments that were left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltFrame {
    pub wire: Vec<u8>,
    pub unresolved: Vec<String>,
}

/// Result of one simulated transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionOutcome {
    Completed,
    /// No prototype (or no message at the requested position).
    NoPrototype,
    /// The receive frame could not be built or came out empty.
    Build,
    /// The transport rejected the exchange.
    Transport,
    ChecksumMismatch,
}

impl TransactionOutcome {
    pub fn is_success(self) -> bool {
        self == TransactionOutcome::Completed
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionOutcome::Completed => "completed",
            TransactionOutcome::NoPrototype => "no_prototype",
            TransactionOutcome::Build => "build",
            TransactionOutcome::Transport => "transport",
            TransactionOutcome::ChecksumMismatch => "checksum_mismatch",
        }
    }
}

/// Frame builder and validator configured from protocol settings.
pub struct Engine {
    markers: FrameMarkers,
    transcoder: Transcoder,
    checksum: Checksum,
    payload: Box<dyn PayloadSource + Send>,
}

impl Engine {
    pub fn new(settings: &ProtocolSettings, payload: Box<dyn PayloadSource + Send>) -> Self {
        let transcoder = Transcoder::new(settings.transmission_mode);
        Self {
            markers: FrameMarkers::new(&settings.prefix, &settings.suffix),
            transcoder,
            checksum: Checksum::new(settings.checksum_kind.clone(), transcoder),
            payload,
        }
    }

    pub fn markers(&self) -> &FrameMarkers {
        &self.markers
    }

    pub fn transcoder(&self) -> Transcoder {
        self.transcoder
    }

    pub fn checksum(&self) -> &Checksum {
        &self.checksum
    }

    /// Wire bytes for `message` laid out by `prototype` in `direction`.
    ///
    /// # Examples
    /// ```
    /// use std::collections::BTreeMap;
    ///
    /// use donp_core::{
    ///     Device, Direction, Engine, FixedPayload, Message, ProtocolSettings, Prototype, Segment,
    /// };
    ///
    /// let layout = vec![Segment::new("slave_address", "", 8)?, Segment::new("error_check", "", 16)?];
    /// let prototype = Prototype::new("read", "", layout.clone(), layout)?;
    /// let message = Message::new("read", BTreeMap::new());
    /// let device = Device::new("meter", 17, vec![]);
    ///
    /// let mut engine = Engine::new(&ProtocolSettings::default(), Box::new(FixedPayload::default()));
    /// let frame = engine.build_message(&prototype, Direction::Transmit, &message, &device)?;
    /// assert_eq!(frame.len(), 3);
    /// assert_eq!(frame[0], 0x11);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn build_message(
        &mut self,
        prototype: &Prototype,
        direction: Direction,
        message: &Message,
        device: &Device,
    ) -> Result<Vec<u8>, EngineError> {
        Ok(self
            .build_frame(prototype, direction, message, device)?
            .wire)
    }

    /// Like [`Engine::build_message`], also reporting unresolved segments.
    pub fn build_frame(
        &mut self,
        prototype: &Prototype,
        direction: Direction,
        message: &Message,
        device: &Device,
    ) -> Result<BuiltFrame, EngineError> {
        let segments =
            prototype
                .segments(direction)
                .ok_or_else(|| EngineError::MissingSegments {
                    prototype: prototype.name().to_string(),
                    direction,
                })?;

        let mut frame = self.markers.prefix().as_bytes().to_vec();
        let mut unresolved = Vec::new();
        for segment in segments {
            let resolution = {
                let checksum = || self.checksum.calculate(&frame, &self.markers);
                let context = ResolveContext {
                    message,
                    device,
                    checksum: &checksum,
                };
                resolve_segment(segment, &context, self.payload.as_mut())
            };
            match resolution {
                Resolution::Values(values) => {
                    pack_values(&values, segment.width_bytes(), &mut frame)
                }
                Resolution::Unresolved(reason) => {
                    warn!(
                        "Protocol: unable to find value for segment '{}' of message '{}': {reason}",
                        segment.name(),
                        message.name()
                    );
                    unresolved.push(segment.name().to_string());
                }
            }
        }
        frame.extend_from_slice(self.markers.suffix().as_bytes());

        let wire = self
            .transcoder
            .binary_to_text(&frame, &self.markers)
            .into_owned();
        Ok(BuiltFrame { wire, unresolved })
    }

    /// Exchange the message's stored transmit frame and a freshly built
    /// receive frame, then validate the receive frame's checksum.
    pub fn transact(
        &mut self,
        prototype: &Prototype,
        message: &Message,
        device: &Device,
        transport: &mut dyn Transport,
    ) -> TransactionOutcome {
        let received = match self.build_message(prototype, Direction::Receive, message, device) {
            Ok(frame) => frame,
            Err(err) => {
                warn!("Protocol: no received message for '{}': {err}", message.name());
                return TransactionOutcome::Build;
            }
        };
        if received.is_empty() {
            warn!(
                "Protocol: received message for '{}' has no resolvable segments",
                message.name()
            );
            return TransactionOutcome::Build;
        }
        if let Err(err) = transport.exchange(message.raw_bytes(), &received) {
            warn!(
                "Protocol: message transmission failed for '{}': {err}",
                message.name()
            );
            return TransactionOutcome::Transport;
        }
        if !self.checksum.validate(&received, &self.markers) {
            warn!(
                "Protocol: message validation failed for '{}'",
                message.name()
            );
            return TransactionOutcome::ChecksumMismatch;
        }
        TransactionOutcome::Completed
    }

    pub fn run_transaction(
        &mut self,
        prototype: &Prototype,
        message: &Message,
        device: &Device,
        transport: &mut dyn Transport,
    ) -> bool {
        self.transact(prototype, message, device, transport)
            .is_success()
    }
}

/// Top-level aggregate: settings, prototypes by name, devices and the engine.
pub struct Protocol {
    settings: ProtocolSettings,
    prototypes: BTreeMap<String, Prototype>,
    devices: Vec<Device>,
    engine: Engine,
}

impl Protocol {
    pub fn new(definition: ProtocolDefinition, payload: Box<dyn PayloadSource + Send>) -> Self {
        let ProtocolDefinition {
            settings,
            prototypes,
            devices,
        } = definition;
        let mut by_name = BTreeMap::new();
        for prototype in prototypes {
            by_name
                .entry(prototype.name().to_string())
                .or_insert(prototype);
        }
        let engine = Engine::new(&settings, payload);
        let protocol = Self {
            settings,
            prototypes: by_name,
            devices,
            engine,
        };
        protocol.log();
        protocol
    }

    /// Protocol with a seeded payload generator (entropy-seeded when `seed` is `None`).
    pub fn with_seed(definition: ProtocolDefinition, seed: Option<u64>) -> Self {
        let payload = match seed {
            Some(seed) => SeededPayload::from_seed(seed),
            None => SeededPayload::from_entropy(),
        };
        Self::new(definition, Box::new(payload))
    }

    pub fn settings(&self) -> &ProtocolSettings {
        &self.settings
    }

    pub fn prototype(&self, name: &str) -> Option<&Prototype> {
        self.prototypes.get(name)
    }

    pub fn prototypes(&self) -> impl Iterator<Item = &Prototype> {
        self.prototypes.values()
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn log(&self) {
        debug!(
            "Protocol: prefix={:?}, suffix={:?}, timeout={} ms, source_address={}, mode={}, checksum={}",
            self.settings.prefix,
            self.settings.suffix,
            self.settings.timeout,
            self.settings.source_address,
            self.settings.transmission_mode.name(),
            self.settings.checksum_kind
        );
        for prototype in self.prototypes.values() {
            debug!("Prototype: {} ({})", prototype.name(), prototype.description());
        }
        for device in &self.devices {
            debug!("Device: {}, Address: {}", device.name(), device.address());
        }
    }

    /// Build the frame for the message at (`device`, `message`).
    pub fn build_frame(
        &mut self,
        device: usize,
        message: usize,
        direction: Direction,
    ) -> Result<BuiltFrame, EngineError> {
        let position = EngineError::NoMessage { device, message };
        let Some(device) = self.devices.get(device) else {
            return Err(position);
        };
        let Some(message) = device.messages().get(message) else {
            return Err(position);
        };
        let prototype =
            self.prototypes
                .get(message.name())
                .ok_or_else(|| EngineError::UnknownPrototype {
                    name: message.name().to_string(),
                })?;
        self.engine
            .build_frame(prototype, direction, message, device)
    }

    /// Build and store the transmit frame of every message that has a
    /// prototype and no stored frame yet.
    ///
    /// Returns the unresolved segment names per (device, message) position.
    pub fn freeze_transmit_frames(&mut self) -> BTreeMap<(usize, usize), Vec<String>> {
        let mut unresolved = BTreeMap::new();
        for device_index in 0..self.devices.len() {
            for message_index in 0..self.devices[device_index].messages().len() {
                if let Some(missing) = self.freeze_one(device_index, message_index) {
                    unresolved.insert((device_index, message_index), missing);
                }
            }
        }
        unresolved
    }

    fn freeze_one(&mut self, device_index: usize, message_index: usize) -> Option<Vec<String>> {
        if self.devices[device_index].messages()[message_index].is_frozen() {
            return None;
        }
        let frame = match self.build_frame(device_index, message_index, Direction::Transmit) {
            Ok(frame) => frame,
            Err(err) => {
                warn!("Protocol: no transmit frame: {err}");
                return None;
            }
        };
        if frame.wire.is_empty() {
            return None;
        }
        self.devices[device_index].messages_mut()[message_index].freeze(frame.wire);
        Some(frame.unresolved)
    }

    /// One transaction for the message at (`device`, `message`).
    pub fn transact(
        &mut self,
        device: usize,
        message: usize,
        transport: &mut dyn Transport,
    ) -> TransactionOutcome {
        let exists = self
            .devices
            .get(device)
            .is_some_and(|d| message < d.messages().len());
        if !exists {
            warn!("Protocol: no message at device #{device}, message #{message}");
            return TransactionOutcome::NoPrototype;
        }
        self.freeze_one(device, message);

        let Protocol {
            prototypes,
            devices,
            engine,
            ..
        } = self;
        let device = &devices[device];
        let message = &device.messages()[message];
        let Some(prototype) = prototypes.get(message.name()) else {
            warn!("Protocol: no prototype found for message '{}'", message.name());
            return TransactionOutcome::NoPrototype;
        };
        engine.transact(prototype, message, device, transport)
    }

    pub fn run_transaction(
        &mut self,
        device: usize,
        message: usize,
        transport: &mut dyn Transport,
    ) -> bool {
        self.transact(device, message, transport).is_success()
    }

    /// Freeze transmit frames, then run `iterations` passes over every
    /// device and message in order.
    pub fn run(&mut self, transport: &mut dyn Transport, iterations: u32) -> RunReport {
        let mut stats = Statistics::new();
        stats.start();
        debug!("Protocol: running {iterations} iteration(s)");

        let unresolved = self.freeze_transmit_frames();
        let mut summaries: Vec<MessageSummary> = Vec::new();
        for (device_index, device) in self.devices.iter().enumerate() {
            for (message_index, message) in device.messages().iter().enumerate() {
                summaries.push(MessageSummary {
                    device: device.name().to_string(),
                    address: device.address(),
                    message: message.name().to_string(),
                    transmit_frame: self
                        .engine
                        .transcoder
                        .to_display_hex(message.raw_bytes(), &self.engine.markers),
                    attempts: 0,
                    succeeded: 0,
                    failures: BTreeMap::new(),
                    unresolved_segments: unresolved
                        .get(&(device_index, message_index))
                        .cloned()
                        .unwrap_or_default(),
                });
            }
        }

        for _ in 0..iterations {
            let mut position = 0;
            for device_index in 0..self.devices.len() {
                for message_index in 0..self.devices[device_index].messages().len() {
                    let outcome = self.transact(device_index, message_index, transport);
                    let summary = &mut summaries[position];
                    summary.attempts += 1;
                    if outcome.is_success() {
                        summary.succeeded += 1;
                        debug!("Protocol: transaction succeeded for '{}'", summary.message);
                    } else {
                        *summary
                            .failures
                            .entry(outcome.as_str().to_string())
                            .or_insert(0) += 1;
                    }
                    position += 1;
                }
            }
        }

        stats.stop();
        stats.log();
        make_run_report(self.settings.clone(), iterations, summaries, stats.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{Engine, Protocol, TransactionOutcome};
    use crate::checksum::{ChecksumKind, crc16};
    use crate::engine::payload::FixedPayload;
    use crate::schema::{
        Device, Direction, Message, ParamValue, ProtocolDefinition, ProtocolSettings, Prototype,
        Segment,
    };
    use crate::transcode::TransmissionMode;
    use crate::transport::{SimulatedTransport, Transport, TransportError};

    fn segments(spec: &[(&str, u64)]) -> Vec<Segment> {
        spec.iter()
            .map(|(name, bits)| Segment::new(*name, "", *bits).unwrap())
            .collect()
    }

    fn read_holding() -> Prototype {
        Prototype::new(
            "read",
            "",
            segments(&[
                ("slave_address", 8),
                ("function_code", 8),
                ("starting_address", 16),
                ("quantity", 16),
                ("error_check", 16),
            ]),
            segments(&[
                ("slave_address", 8),
                ("function_code", 8),
                ("byte_count", 8),
                ("data_bytes", 8),
                ("error_check", 16),
            ]),
        )
        .unwrap()
    }

    fn read_message() -> Message {
        let mut parameters = BTreeMap::new();
        parameters.insert("function_code".to_string(), ParamValue::Unsigned(3));
        parameters.insert("starting_address".to_string(), ParamValue::Unsigned(0));
        parameters.insert("quantity".to_string(), ParamValue::Unsigned(10));
        parameters.insert("length".to_string(), ParamValue::Unsigned(2));
        Message::new("read", parameters)
    }

    fn engine(settings: &ProtocolSettings) -> Engine {
        Engine::new(settings, Box::new(FixedPayload::new(vec![0xAB, 0xCD])))
    }

    #[test]
    fn builds_modbus_rtu_request() {
        let mut engine = engine(&ProtocolSettings::default());
        let device = Device::new("plc", 1, vec![]);
        let frame = engine
            .build_message(&read_holding(), Direction::Transmit, &read_message(), &device)
            .unwrap();
        assert_eq!(frame, vec![0x01, 0x03, 0x00, 0x00, 0x00, 0x0A, 0xC5, 0xCD]);
    }

    #[test]
    fn receive_frame_carries_synthesized_payload() {
        let mut engine = engine(&ProtocolSettings::default());
        let device = Device::new("plc", 1, vec![]);
        let frame = engine
            .build_message(&read_holding(), Direction::Receive, &read_message(), &device)
            .unwrap();
        // address, function, byte count 4, four payload bytes, crc
        assert_eq!(&frame[..7], &[0x01, 0x03, 0x04, 0xAB, 0xCD, 0xAB, 0xCD]);
        let crc = crc16::calculate(&frame[..7]).to_be_bytes();
        assert_eq!(&frame[7..], &crc);
    }

    #[test]
    fn prefix_and_suffix_are_upper_cased_literals() {
        let settings = ProtocolSettings {
            prefix: "ab".to_string(),
            suffix: "z".to_string(),
            ..ProtocolSettings::default()
        };
        let mut engine = engine(&settings);
        let prototype = Prototype::new(
            "ping",
            "",
            segments(&[("slave_address", 8)]),
            segments(&[("slave_address", 8)]),
        )
        .unwrap();
        let frame = engine
            .build_message(
                &prototype,
                Direction::Transmit,
                &Message::new("ping", BTreeMap::new()),
                &Device::new("d", 0x7F, vec![]),
            )
            .unwrap();
        assert_eq!(frame, b"AB\x7FZ".to_vec());
    }

    #[test]
    fn unresolved_segments_are_dropped_and_reported() {
        let mut engine = engine(&ProtocolSettings::default());
        let prototype = Prototype::new(
            "write",
            "",
            segments(&[("slave_address", 8), ("register", 16), ("value", 16)]),
            segments(&[("slave_address", 8)]),
        )
        .unwrap();
        let mut parameters = BTreeMap::new();
        parameters.insert("value".to_string(), ParamValue::Unsigned(0x1234));
        parameters.insert("register".to_string(), ParamValue::Text("r1".to_string()));
        let built = engine
            .build_frame(
                &prototype,
                Direction::Transmit,
                &Message::new("write", parameters),
                &Device::new("d", 2, vec![]),
            )
            .unwrap();
        assert_eq!(built.wire, vec![0x02, 0x12, 0x34]);
        assert_eq!(built.unresolved, vec!["register".to_string()]);
    }

    #[test]
    fn text_hex_mode_encodes_data_and_keeps_markers() {
        let settings = ProtocolSettings {
            prefix: ":".to_string(),
            suffix: "\r\n".to_string(),
            transmission_mode: TransmissionMode::TextHex,
            checksum_kind: ChecksumKind::Lrc,
            ..ProtocolSettings::default()
        };
        let mut engine = engine(&settings);
        let prototype = Prototype::new(
            "read",
            "",
            segments(&[
                ("slave_address", 8),
                ("function_code", 8),
                ("starting_address", 16),
                ("quantity", 16),
                ("error_check", 8),
            ]),
            segments(&[("slave_address", 8), ("error_check", 8)]),
        )
        .unwrap();
        let mut parameters = BTreeMap::new();
        parameters.insert("function_code".to_string(), ParamValue::Unsigned(3));
        parameters.insert("starting_address".to_string(), ParamValue::Unsigned(0));
        parameters.insert("quantity".to_string(), ParamValue::Unsigned(1));
        let frame = engine
            .build_message(
                &prototype,
                Direction::Transmit,
                &Message::new("read", parameters),
                &Device::new("d", 1, vec![]),
            )
            .unwrap();
        assert_eq!(frame, b":010300000001FB\r\n".to_vec());
        assert!(engine.checksum().validate(&frame, engine.markers()));
    }

    fn definition(settings: ProtocolSettings) -> ProtocolDefinition {
        ProtocolDefinition {
            settings,
            prototypes: vec![read_holding()],
            devices: vec![
                Device::new("plc", 1, vec![read_message()]),
                Device::new(
                    "orphan",
                    2,
                    vec![Message::new("unknown", BTreeMap::new())],
                ),
            ],
        }
    }

    #[test]
    fn freeze_is_first_write_wins() {
        let mut protocol = Protocol::new(
            definition(ProtocolSettings::default()),
            Box::new(FixedPayload::new(vec![1])),
        );
        protocol.freeze_transmit_frames();
        let first = protocol.devices()[0].messages()[0].raw_bytes().to_vec();
        assert!(!first.is_empty());
        protocol.freeze_transmit_frames();
        assert_eq!(protocol.devices()[0].messages()[0].raw_bytes(), &first[..]);
        assert!(protocol.devices()[1].messages()[0].raw_bytes().is_empty());
    }

    #[test]
    fn transact_reports_outcomes() {
        let settings = ProtocolSettings::default();
        let mut protocol = Protocol::new(
            definition(settings),
            Box::new(FixedPayload::new(vec![9, 8, 7])),
        );
        let engine = protocol.engine();
        let mut transport = SimulatedTransport::new(engine.transcoder(), engine.markers().clone());

        assert_eq!(
            protocol.transact(0, 0, &mut transport),
            TransactionOutcome::Completed
        );
        assert!(protocol.run_transaction(0, 0, &mut transport));
        assert_eq!(
            protocol.transact(1, 0, &mut transport),
            TransactionOutcome::NoPrototype
        );
        assert_eq!(
            protocol.transact(5, 0, &mut transport),
            TransactionOutcome::NoPrototype
        );
    }

    struct RejectingTransport;

    impl Transport for RejectingTransport {
        fn exchange(&mut self, _tx: &[u8], _rx: &[u8]) -> Result<(), TransportError> {
            Err(TransportError::Failed("link down".to_string()))
        }
    }

    #[test]
    fn transport_failure_is_an_outcome() {
        let mut protocol = Protocol::new(
            definition(ProtocolSettings::default()),
            Box::new(FixedPayload::default()),
        );
        assert_eq!(
            protocol.transact(0, 0, &mut RejectingTransport),
            TransactionOutcome::Transport
        );
    }

    #[test]
    fn huge_length_drops_payload_instead_of_panicking() {
        let mut engine = engine(&ProtocolSettings::default());
        let mut parameters = read_message().parameters().clone();
        parameters.insert("length".to_string(), ParamValue::Unsigned(u64::MAX / 2));
        let message = Message::new("read", parameters);
        let built = engine
            .build_frame(
                &read_holding(),
                Direction::Receive,
                &message,
                &Device::new("plc", 1, vec![]),
            )
            .unwrap();
        assert_eq!(built.unresolved, vec!["data_bytes".to_string()]);
        // address, function, oversized byte count truncated to one byte, crc
        assert_eq!(built.wire.len(), 1 + 1 + 1 + 2);
    }

    #[test]
    fn empty_receive_frame_is_a_build_failure() {
        let prototype = Prototype::new(
            "blind",
            "",
            segments(&[("slave_address", 8)]),
            segments(&[("status", 8)]),
        )
        .unwrap();
        let mut engine = engine(&ProtocolSettings::default());
        let mut message = Message::new("blind", BTreeMap::new());
        message.freeze(vec![0x01]);
        let device = Device::new("d", 1, vec![]);
        let mut transport = SimulatedTransport::new(engine.transcoder(), engine.markers().clone());
        assert_eq!(
            engine.transact(&prototype, &message, &device, &mut transport),
            TransactionOutcome::Build
        );
        assert_eq!(transport.exchanges(), 0);
    }

    #[test]
    fn checksum_not_last_fails_validation() {
        let prototype = Prototype::new(
            "odd",
            "",
            segments(&[("slave_address", 8)]),
            segments(&[("error_check", 16), ("slave_address", 8)]),
        )
        .unwrap();
        let mut engine = engine(&ProtocolSettings::default());
        let mut message = Message::new("odd", BTreeMap::new());
        let device = Device::new("d", 0x42, vec![]);
        message.freeze(vec![0x42]);
        let mut transport = SimulatedTransport::new(engine.transcoder(), engine.markers().clone());
        assert_eq!(
            engine.transact(&prototype, &message, &device, &mut transport),
            TransactionOutcome::ChecksumMismatch
        );
    }

    #[test]
    fn run_tallies_every_iteration() {
        let mut protocol = Protocol::new(
            definition(ProtocolSettings::default()),
            Box::new(FixedPayload::new(vec![0x10, 0x20])),
        );
        let engine = protocol.engine();
        let mut transport = SimulatedTransport::new(engine.transcoder(), engine.markers().clone());
        let report = protocol.run(&mut transport, 3);

        assert_eq!(report.iterations, 3);
        assert_eq!(report.transactions_total, 6);
        assert_eq!(report.transactions_succeeded, 3);
        assert_eq!(report.transactions_failed, 3);
        assert_eq!(report.messages[0].transmit_frame, "01030000000AC5CD");
        assert_eq!(report.messages[0].succeeded, 3);
        assert_eq!(report.messages[1].failures.get("no_prototype"), Some(&3));
        assert_eq!(transport.exchanges(), 3);
    }
}
