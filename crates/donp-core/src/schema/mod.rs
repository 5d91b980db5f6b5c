//! Protocol schema model and loader.
//!
//! A schema document is a JSON tree with a required top-level `protocol` node
//! holding `prototype` and `device` arrays plus optional framing and checksum
//! settings. Loading follows the same layering as the wire code:
//! - `layout`: document key names (source of truth)
//! - `reader`: typed, checked access to one object node
//! - `parser`: entity construction, skipping and logging invalid entities
//! - `error`: explicit, actionable errors
//!
//! The resulting model (`Segment`, `Prototype`, `Device`, `Message`) is
//! immutable apart from a message's transmit frame, which is set once.

use std::fs;
use std::path::Path;

pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod reader;

pub use error::SchemaError;
pub use model::{Device, Direction, Message, ParamValue, Prototype, Segment};
pub use parser::{ProtocolDefinition, ProtocolSettings, parse_document};

/// Load and validate a schema document from a JSON file.
///
/// # Examples
/// ```no_run
/// use std::path::Path;
///
/// use donp_core::load_schema_file;
///
/// let definition = load_schema_file(Path::new("modbusRtu.json"))?;
/// println!("{} prototypes", definition.prototypes.len());
/// # Ok::<(), donp_core::SchemaError>(())
/// ```
pub fn load_schema_file(path: &Path) -> Result<ProtocolDefinition, SchemaError> {
    let text = fs::read_to_string(path)?;
    load_schema_str(&text)
}

/// Load and validate a schema document from JSON text.
pub fn load_schema_str(text: &str) -> Result<ProtocolDefinition, SchemaError> {
    let document: serde_json::Value = serde_json::from_str(text)?;
    parse_document(&document)
}
