use std::fmt;

use super::payload::PayloadSource;
use super::sizing::data_byte_count;
use crate::schema::{Device, Message, Segment};

pub const SLAVE_ADDRESS: &str = "slave_address";
pub const ERROR_CHECK: &str = "error_check";
pub const BYTE_COUNT: &str = "byte_count";
pub const DATA_BYTES: &str = "data_bytes";

/// Upper bound on synthesized `data_bytes` values for one segment.
pub const MAX_PAYLOAD_VALUES: u64 = 65_536;

/// Outcome of resolving one segment's value(s).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Values to pack, each at the segment's width.
    Values(Vec<u64>),
    /// The segment is left out of the frame.
    Unresolved(Unresolved),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unresolved {
    /// No message parameter named like the segment.
    Missing,
    /// A parameter exists but is not a non-negative number.
    NotNumeric(String),
    /// The synthesized payload would exceed `MAX_PAYLOAD_VALUES`, or its
    /// size overflows (`None`).
    PayloadTooLarge(Option<u64>),
}

impl fmt::Display for Unresolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unresolved::Missing => f.write_str("no matching message parameter"),
            Unresolved::NotNumeric(value) => write!(f, "parameter value {value} is not numeric"),
            Unresolved::PayloadTooLarge(Some(count)) => write!(
                f,
                "payload of {count} values exceeds the limit of {MAX_PAYLOAD_VALUES}"
            ),
            Unresolved::PayloadTooLarge(None) => f.write_str("payload size overflows"),
        }
    }
}

/// Everything a segment may draw its value from.
pub struct ResolveContext<'a> {
    pub message: &'a Message,
    pub device: &'a Device,
    /// Checksum over the frame assembled so far (prefix excluded).
    pub checksum: &'a dyn Fn() -> u16,
}

/// Resolve a segment by name: reserved names first, then message parameters.
pub fn resolve_segment(
    segment: &Segment,
    context: &ResolveContext<'_>,
    payload: &mut dyn PayloadSource,
) -> Resolution {
    match segment.name() {
        SLAVE_ADDRESS => Resolution::Values(vec![context.device.address()]),
        ERROR_CHECK => Resolution::Values(vec![u64::from((context.checksum)())]),
        BYTE_COUNT => Resolution::Values(vec![data_byte_count(context.message)]),
        DATA_BYTES => {
            let Some(total_bits) =
                u64::from(segment.bits()).checked_mul(data_byte_count(context.message))
            else {
                return Resolution::Unresolved(Unresolved::PayloadTooLarge(None));
            };
            let count = total_bits.div_ceil(8);
            if count > MAX_PAYLOAD_VALUES {
                return Resolution::Unresolved(Unresolved::PayloadTooLarge(Some(count)));
            }
            Resolution::Values(
                (0..count)
                    .map(|_| u64::from(payload.next_byte()))
                    .collect(),
            )
        }
        name => match context.message.parameter(name) {
            None => Resolution::Unresolved(Unresolved::Missing),
            Some(value) => match value.as_field_value() {
                Some(value) => Resolution::Values(vec![value]),
                None => Resolution::Unresolved(Unresolved::NotNumeric(value.to_string())),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::{MAX_PAYLOAD_VALUES, ResolveContext, Resolution, Unresolved, resolve_segment};
    use crate::engine::payload::FixedPayload;
    use crate::schema::{Device, Message, ParamValue, Segment};

    fn message() -> Message {
        message_with_length(ParamValue::Unsigned(3))
    }

    fn message_with_length(length: ParamValue) -> Message {
        let mut parameters = BTreeMap::new();
        parameters.insert("function_code".to_string(), ParamValue::Unsigned(3));
        parameters.insert("label".to_string(), ParamValue::Text("x".to_string()));
        parameters.insert("length".to_string(), length);
        parameters.insert("data_type".to_string(), ParamValue::Text("string".to_string()));
        Message::new("read", parameters)
    }

    fn resolve(name: &str, bits: u64) -> Resolution {
        resolve_for(&message(), name, bits)
    }

    fn resolve_for(message: &Message, name: &str, bits: u64) -> Resolution {
        let device = Device::new("meter", 17, vec![]);
        let checksum = || 0xBEEF;
        let context = ResolveContext {
            message,
            device: &device,
            checksum: &checksum,
        };
        let mut payload = FixedPayload::new(vec![1, 2, 3, 4, 5]);
        resolve_segment(&Segment::new(name, "", bits).unwrap(), &context, &mut payload)
    }

    #[test]
    fn reserved_names() {
        assert_eq!(resolve("slave_address", 8), Resolution::Values(vec![17]));
        assert_eq!(resolve("error_check", 16), Resolution::Values(vec![0xBEEF]));
        assert_eq!(resolve("byte_count", 8), Resolution::Values(vec![3]));
    }

    #[test]
    fn data_bytes_synthesizes_one_value_per_byte() {
        assert_eq!(resolve("data_bytes", 8), Resolution::Values(vec![1, 2, 3]));
        // 16 bits x 3 data bytes = 48 bits -> 6 values
        assert_eq!(
            resolve("data_bytes", 16),
            Resolution::Values(vec![1, 2, 3, 4, 5, 1])
        );
    }

    #[test]
    fn oversized_data_bytes_are_unresolved() {
        // string data: one byte per element
        let huge = message_with_length(ParamValue::Unsigned(u64::MAX / 2));
        assert_eq!(
            resolve_for(&huge, "data_bytes", 8),
            Resolution::Unresolved(Unresolved::PayloadTooLarge(None))
        );

        let large = message_with_length(ParamValue::Unsigned(1_000_000_000));
        assert_eq!(
            resolve_for(&large, "data_bytes", 8),
            Resolution::Unresolved(Unresolved::PayloadTooLarge(Some(1_000_000_000)))
        );

        let at_limit = message_with_length(ParamValue::Unsigned(MAX_PAYLOAD_VALUES));
        match resolve_for(&at_limit, "data_bytes", 8) {
            Resolution::Values(values) => assert_eq!(values.len() as u64, MAX_PAYLOAD_VALUES),
            other => panic!("expected values, got {other:?}"),
        }
    }

    #[test]
    fn parameters_by_name() {
        assert_eq!(resolve("function_code", 8), Resolution::Values(vec![3]));
        assert_eq!(
            resolve("starting_address", 16),
            Resolution::Unresolved(Unresolved::Missing)
        );
        assert!(matches!(
            resolve("label", 8),
            Resolution::Unresolved(Unresolved::NotNumeric(_))
        ));
    }
}
