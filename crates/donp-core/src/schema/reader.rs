use serde_json::{Map, Value};

use super::error::SchemaError;

/// Typed, checked access to one object node of a schema document.
///
/// Every accessor distinguishes "absent" from "present with the wrong type",
/// so entity constructors can extract their fields once and fail precisely.
pub struct DocumentReader<'a> {
    value: &'a Value,
    entity: &'static str,
}

impl<'a> DocumentReader<'a> {
    pub fn new(value: &'a Value, entity: &'static str) -> Self {
        Self { value, entity }
    }

    pub fn require_str(&self, key: &'static str) -> Result<&'a str, SchemaError> {
        self.optional_str(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn optional_str(&self, key: &'static str) -> Result<Option<&'a str>, SchemaError> {
        match self.value.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(text)) => Ok(Some(text.as_str())),
            Some(_) => Err(self.wrong_type(key, "a string")),
        }
    }

    pub fn require_u64(&self, key: &'static str) -> Result<u64, SchemaError> {
        self.optional_u64(key)?.ok_or_else(|| self.missing(key))
    }

    pub fn optional_u64(&self, key: &'static str) -> Result<Option<u64>, SchemaError> {
        match self.value.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => value
                .as_u64()
                .map(Some)
                .ok_or_else(|| self.wrong_type(key, "a non-negative integer")),
        }
    }

    pub fn require_array(&self, key: &'static str) -> Result<&'a [Value], SchemaError> {
        match self.value.get(key) {
            None | Some(Value::Null) => Err(self.missing(key)),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(_) => Err(self.wrong_type(key, "an array")),
        }
    }

    pub fn require_object(
        &self,
        key: &'static str,
        entity: &'static str,
    ) -> Result<DocumentReader<'a>, SchemaError> {
        match self.value.get(key) {
            None | Some(Value::Null) => Err(self.missing(key)),
            Some(value @ Value::Object(_)) => Ok(DocumentReader::new(value, entity)),
            Some(_) => Err(self.wrong_type(key, "an object")),
        }
    }

    /// All key/value pairs of this node; empty when the node is not an object.
    pub fn entries(&self) -> impl Iterator<Item = (&'a String, &'a Value)> {
        self.value
            .as_object()
            .map(Map::iter)
            .into_iter()
            .flatten()
    }

    fn missing(&self, field: &'static str) -> SchemaError {
        SchemaError::MissingField {
            entity: self.entity,
            field,
        }
    }

    fn wrong_type(&self, field: &'static str, expected: &'static str) -> SchemaError {
        SchemaError::WrongType {
            entity: self.entity,
            field,
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::DocumentReader;
    use crate::schema::error::SchemaError;

    #[test]
    fn require_str_reports_missing_and_wrong_type() {
        let value = json!({ "name": 7 });
        let reader = DocumentReader::new(&value, "segment");

        let err = reader.require_str("name").unwrap_err();
        assert!(matches!(err, SchemaError::WrongType { field: "name", .. }));

        let err = reader.require_str("desc").unwrap_err();
        assert!(matches!(err, SchemaError::MissingField { field: "desc", .. }));
    }

    #[test]
    fn optional_fields_treat_null_as_absent() {
        let value = json!({ "desc": null, "bits": 16 });
        let reader = DocumentReader::new(&value, "segment");
        assert_eq!(reader.optional_str("desc").unwrap(), None);
        assert_eq!(reader.require_u64("bits").unwrap(), 16);
    }

    #[test]
    fn negative_numbers_are_not_u64() {
        let value = json!({ "bits": -8 });
        let reader = DocumentReader::new(&value, "segment");
        assert!(reader.require_u64("bits").is_err());
    }

    #[test]
    fn entries_of_non_object_is_empty() {
        let value = json!([1, 2, 3]);
        let reader = DocumentReader::new(&value, "message");
        assert_eq!(reader.entries().count(), 0);
    }
}
