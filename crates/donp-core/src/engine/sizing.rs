use log::warn;

use crate::schema::Message;
use crate::schema::layout;

/// Element type of a message's data payload (`data_type` parameter).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Int16,
    Int32,
    Float,
    String,
    Bit,
}

impl DataType {
    /// Parse a `data_type` value; unknown names fall back to `int16`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "int16" => DataType::Int16,
            "int32" => DataType::Int32,
            "float" => DataType::Float,
            "string" => DataType::String,
            "bit" => DataType::Bit,
            other => {
                warn!("Message: unknown data type '{other}', sizing as int16");
                DataType::Int16
            }
        }
    }

    /// Bytes needed for `length` elements of this type.
    pub fn byte_count(self, length: u64) -> u64 {
        match self {
            DataType::Int16 => length.saturating_mul(2),
            DataType::Int32 | DataType::Float => length.saturating_mul(4),
            DataType::String => length,
            DataType::Bit => length.div_ceil(8),
        }
    }
}

/// Data bytes carried by `message`, from its `data_type` (default `int16`)
/// and `length` (default 1) parameters.
pub fn data_byte_count(message: &Message) -> u64 {
    let data_type = message
        .parameter(layout::DATA_TYPE)
        .and_then(|value| value.as_text())
        .map(DataType::from_name)
        .unwrap_or(DataType::Int16);
    let length = match message.parameter(layout::LENGTH) {
        None => 1,
        Some(value) => value.as_field_value().unwrap_or_else(|| {
            warn!(
                "Message {}: length {value} is not a non-negative number, using 1",
                message.name()
            );
            1
        }),
    };
    data_type.byte_count(length)
}
