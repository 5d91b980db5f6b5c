use std::collections::BTreeMap;

use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;

use super::error::SchemaError;
use super::layout;
use super::model::{Device, Message, ParamValue, Prototype, Segment};
use super::reader::DocumentReader;
use crate::checksum::ChecksumKind;
use crate::transcode::TransmissionMode;

/// Protocol-wide settings taken from the schema's top-level `protocol` node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProtocolSettings {
    pub prefix: String,
    pub suffix: String,
    /// Transport timeout in milliseconds; carried for the transport, unused by the engine.
    pub timeout: u64,
    pub source_address: u64,
    pub transmission_mode: TransmissionMode,
    pub checksum_kind: ChecksumKind,
}

impl Default for ProtocolSettings {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            timeout: 0,
            source_address: 0,
            transmission_mode: TransmissionMode::Binary,
            checksum_kind: ChecksumKind::Crc16,
        }
    }
}

/// Validated, strongly typed content of a schema document.
#[derive(Debug, Clone)]
pub struct ProtocolDefinition {
    pub settings: ProtocolSettings,
    pub prototypes: Vec<Prototype>,
    pub devices: Vec<Device>,
}

pub fn parse_document(document: &Value) -> Result<ProtocolDefinition, SchemaError> {
    let root = DocumentReader::new(document, "document");
    let protocol = root.require_object(layout::ROOT, "protocol")?;

    let settings = parse_settings(&protocol);
    let prototypes = parse_prototypes(protocol.require_array(layout::PROTOTYPE)?);
    if prototypes.is_empty() {
        return Err(SchemaError::NoneValid {
            entity: layout::PROTOTYPE,
        });
    }
    let devices = parse_devices(protocol.require_array(layout::DEVICE)?);
    if devices.is_empty() {
        return Err(SchemaError::NoneValid {
            entity: layout::DEVICE,
        });
    }

    Ok(ProtocolDefinition {
        settings,
        prototypes,
        devices,
    })
}

fn parse_settings(protocol: &DocumentReader<'_>) -> ProtocolSettings {
    let defaults = ProtocolSettings::default();
    let prefix = setting(protocol.optional_str(layout::PREFIX)).unwrap_or_default();
    let suffix = setting(protocol.optional_str(layout::SUFFIX)).unwrap_or_default();
    let timeout = setting(protocol.optional_u64(layout::TIMEOUT)).unwrap_or(defaults.timeout);
    let source_address =
        setting(protocol.optional_u64(layout::SOURCE_ADDRESS)).unwrap_or(defaults.source_address);
    let transmission_mode = setting(protocol.optional_str(layout::TRANSMISSION_MODE))
        .unwrap_or(layout::DEFAULT_TRANSMISSION_MODE);
    let checksum = setting(protocol.optional_str(layout::CHECKSUM_CALCULATION))
        .unwrap_or(layout::DEFAULT_CHECKSUM_CALCULATION);

    let settings = ProtocolSettings {
        prefix: prefix.to_string(),
        suffix: suffix.to_string(),
        timeout,
        source_address,
        transmission_mode: TransmissionMode::from_name(transmission_mode),
        checksum_kind: ChecksumKind::from_name(checksum),
    };
    debug!("Protocol settings: {settings:?}");
    settings
}

/// Optional settings fall back to their defaults when mistyped.
fn setting<T>(value: Result<Option<T>, SchemaError>) -> Option<T> {
    match value {
        Ok(value) => value,
        Err(err) => {
            warn!("Schema: {err}; using default");
            None
        }
    }
}

fn parse_prototypes(items: &[Value]) -> Vec<Prototype> {
    let mut prototypes: Vec<Prototype> = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match parse_prototype(item) {
            Ok(prototype) => {
                if prototypes.iter().any(|p| p.name() == prototype.name()) {
                    warn!(
                        "Schema: duplicate prototype '{}' ignored (first definition wins)",
                        prototype.name()
                    );
                    continue;
                }
                debug!(
                    "Prototype: {} ({})",
                    prototype.name(),
                    prototype.description()
                );
                prototypes.push(prototype);
            }
            Err(err) => warn!("Schema: skipping prototype #{index}: {err}"),
        }
    }
    prototypes
}

pub fn parse_prototype(value: &Value) -> Result<Prototype, SchemaError> {
    let reader = DocumentReader::new(value, layout::PROTOTYPE);
    let name = reader.require_str(layout::NAME)?;
    let wrap = |err: SchemaError| err.in_entity(layout::PROTOTYPE, name);

    let description = reader.optional_str(layout::DESC).map_err(wrap)?;
    let transmit = parse_segments(reader.require_array(layout::TRANSMIT).map_err(wrap)?)
        .map_err(wrap)?;
    let receive =
        parse_segments(reader.require_array(layout::RECEIVE).map_err(wrap)?).map_err(wrap)?;

    Prototype::new(name, description.unwrap_or_default(), transmit, receive)
}

fn parse_segments(items: &[Value]) -> Result<Vec<Segment>, SchemaError> {
    items.iter().map(parse_segment).collect()
}

pub fn parse_segment(value: &Value) -> Result<Segment, SchemaError> {
    let reader = DocumentReader::new(value, "segment");
    let name = reader.require_str(layout::NAME)?;
    let bits = reader.require_u64(layout::BITS)?;
    let description = reader.optional_str(layout::DESC)?.unwrap_or_default();
    let segment = Segment::new(name, description, bits)?;
    debug!(
        "Segment: {}, Desc: {}, Bits: {}",
        segment.name(),
        segment.description(),
        segment.bits()
    );
    Ok(segment)
}

fn parse_devices(items: &[Value]) -> Vec<Device> {
    let mut devices = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match parse_device(item) {
            Ok(device) => {
                debug!("Device: {}, Address: {}", device.name(), device.address());
                devices.push(device);
            }
            Err(err) => warn!("Schema: skipping device #{index}: {err}"),
        }
    }
    devices
}

pub fn parse_device(value: &Value) -> Result<Device, SchemaError> {
    let reader = DocumentReader::new(value, layout::DEVICE);
    let name = reader.optional_str(layout::NAME)?.unwrap_or_default();
    let wrap = |err: SchemaError| err.in_entity(layout::DEVICE, name);

    let address = reader.optional_u64(layout::ADDRESS).map_err(wrap)?;
    let items = reader.require_array(layout::MESSAGE).map_err(wrap)?;

    let mut messages = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match parse_message(item) {
            Ok(message) => messages.push(message),
            Err(err) => warn!("Schema: device '{name}': skipping message #{index}: {err}"),
        }
    }
    if messages.is_empty() {
        warn!("Schema: device '{name}' has no valid messages");
    }

    Ok(Device::new(name, address.unwrap_or(0), messages))
}

pub fn parse_message(value: &Value) -> Result<Message, SchemaError> {
    let reader = DocumentReader::new(value, layout::MESSAGE);
    let name = reader.require_str(layout::NAME)?;
    let parameters: BTreeMap<String, ParamValue> = reader
        .entries()
        .filter(|(key, _)| key.as_str() != layout::NAME)
        .map(|(key, value)| (key.clone(), ParamValue::from_json(value)))
        .collect();
    for (key, value) in &parameters {
        debug!("Message {name}: {key} = {value}");
    }
    Ok(Message::new(name, parameters))
}
