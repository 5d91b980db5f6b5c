use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::error::SchemaError;
use super::layout;

/// Message direction, selecting a prototype's segment sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Transmit,
    Receive,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Transmit => layout::TRANSMIT,
            Direction::Receive => layout::RECEIVE,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named, fixed-width field of a message layout.
///
/// # Examples
/// ```
/// use donp_core::Segment;
///
/// let segment = Segment::new("slave_address", "", 8)?;
/// assert_eq!(segment.width_bytes(), 1);
/// # Ok::<(), donp_core::SchemaError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    name: String,
    description: String,
    bits: u8,
}

impl Segment {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        bits: u64,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        if bits == 0 || bits > layout::MAX_SEGMENT_BITS {
            return Err(SchemaError::InvalidBits { name, bits });
        }
        Ok(Self {
            name,
            description: description.into(),
            bits: bits as u8,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Whole bytes occupied by one value of this segment on the wire.
    ///
    /// Widths that are not a multiple of 8 round up to the next byte.
    pub fn width_bytes(&self) -> usize {
        (self.bits as usize).div_ceil(8)
    }
}

/// Transmit and receive layouts for one message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prototype {
    name: String,
    description: String,
    transmit: Vec<Segment>,
    receive: Vec<Segment>,
}

impl Prototype {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        transmit: Vec<Segment>,
        receive: Vec<Segment>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        if transmit.is_empty() {
            return Err(SchemaError::EmptyDirection {
                name,
                direction: layout::TRANSMIT,
            });
        }
        if receive.is_empty() {
            return Err(SchemaError::EmptyDirection {
                name,
                direction: layout::RECEIVE,
            });
        }
        Ok(Self {
            name,
            description: description.into(),
            transmit,
            receive,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Segment sequence for `direction`, `None` when that layout is empty.
    pub fn segments(&self, direction: Direction) -> Option<&[Segment]> {
        let segments = match direction {
            Direction::Transmit => &self.transmit,
            Direction::Receive => &self.receive,
        };
        if segments.is_empty() {
            None
        } else {
            Some(segments.as_slice())
        }
    }
}

/// A message parameter value as found in the schema document.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Compound(Value),
}

impl ParamValue {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(number) => {
                if let Some(value) = number.as_u64() {
                    ParamValue::Unsigned(value)
                } else if let Some(value) = number.as_i64() {
                    ParamValue::Signed(value)
                } else {
                    ParamValue::Float(number.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(text) => ParamValue::Text(text.clone()),
            Value::Bool(flag) => ParamValue::Bool(*flag),
            other => ParamValue::Compound(other.clone()),
        }
    }

    /// Non-negative numeric value usable as a field value.
    ///
    /// Floats are truncated toward zero; negative or non-numeric values yield `None`.
    pub fn as_field_value(&self) -> Option<u64> {
        match self {
            ParamValue::Unsigned(value) => Some(*value),
            ParamValue::Signed(value) => u64::try_from(*value).ok(),
            ParamValue::Float(value) if value.is_finite() && *value >= 0.0 => {
                Some(value.trunc() as u64)
            }
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Unsigned(value) => write!(f, "{value}"),
            ParamValue::Signed(value) => write!(f, "{value}"),
            ParamValue::Float(value) => write!(f, "{value}"),
            ParamValue::Text(text) => write!(f, "{text:?}"),
            ParamValue::Bool(flag) => write!(f, "{flag}"),
            ParamValue::Compound(value) => write!(f, "{value}"),
        }
    }
}

/// A concrete message instance owned by a device.
///
/// `raw_bytes` holds the transmit frame once built; the first write wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    name: String,
    parameters: BTreeMap<String, ParamValue>,
    raw_bytes: Option<Vec<u8>>,
}

impl Message {
    pub fn new(name: impl Into<String>, parameters: BTreeMap<String, ParamValue>) -> Self {
        Self {
            name: name.into(),
            parameters,
            raw_bytes: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &BTreeMap<String, ParamValue> {
        &self.parameters
    }

    pub fn parameter(&self, key: &str) -> Option<&ParamValue> {
        self.parameters.get(key)
    }

    pub fn raw_bytes(&self) -> &[u8] {
        self.raw_bytes.as_deref().unwrap_or(&[])
    }

    pub fn is_frozen(&self) -> bool {
        self.raw_bytes.is_some()
    }

    /// Stores the transmit frame unless one is already stored.
    ///
    /// Returns `true` when `bytes` was stored.
    pub fn freeze(&mut self, bytes: Vec<u8>) -> bool {
        if self.raw_bytes.is_some() {
            return false;
        }
        self.raw_bytes = Some(bytes);
        true
    }
}

/// An addressable peer and the messages built for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    name: String,
    address: u64,
    messages: Vec<Message>,
}

impl Device {
    pub fn new(name: impl Into<String>, address: u64, messages: Vec<Message>) -> Self {
        Self {
            name: name.into(),
            address,
            messages,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> u64 {
        self.address
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn messages_mut(&mut self) -> &mut [Message] {
        &mut self.messages
    }
}
