use thiserror::Error;

/// Errors returned while reading a protocol schema document.
///
/// Entity-level errors (a bad segment, prototype, device or message) are
/// logged and the entity is skipped; only document-level errors abort a load.
///
/// # Examples
/// ```
/// use donp_core::SchemaError;
///
/// let err = SchemaError::MissingField { entity: "segment", field: "bits" };
/// assert!(err.to_string().contains("missing required field 'bits'"));
/// ```
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing required field '{field}' in {entity}")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },
    #[error("field '{field}' in {entity} must be {expected}")]
    WrongType {
        entity: &'static str,
        field: &'static str,
        expected: &'static str,
    },
    #[error("segment '{name}' has invalid bit width {bits} (expected 1..=255)")]
    InvalidBits { name: String, bits: u64 },
    #[error("prototype '{name}' has no {direction} segments")]
    EmptyDirection {
        name: String,
        direction: &'static str,
    },
    #[error("{entity} '{name}' is invalid: {source}")]
    Entity {
        entity: &'static str,
        name: String,
        #[source]
        source: Box<SchemaError>,
    },
    #[error("no valid {entity} definitions in schema")]
    NoneValid { entity: &'static str },
}

impl SchemaError {
    pub(crate) fn in_entity(self, entity: &'static str, name: impl Into<String>) -> Self {
        SchemaError::Entity {
            entity,
            name: name.into(),
            source: Box::new(self),
        }
    }
}
