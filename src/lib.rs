//! Read-only lookups into a dynamic object graph by path expression.
//!
//! ```
//! use value_path::{resolve, Mapping, Record, Value};
//!
//! let root = Value::from(
//!     Record::new("sample")
//!         .field("String", "Hello world!")
//!         .field("Map", Mapping::new().entry("shoeSize", 42.5)),
//! );
//!
//! let hit = resolve(&root, "Map.shoeSize").unwrap();
//! assert!(hit.found);
//! assert_eq!(*hit.value, Value::Float(42.5));
//!
//! assert_eq!(*resolve(&root, "String[2]").unwrap().value, Value::Char('l'));
//! assert!(!resolve(&root, "Map.age").unwrap().found);
//! assert!(resolve(&root, "Map.age.x").is_err());
//! ```

pub mod engine;
pub mod errors;
pub mod parser;
pub mod path;
pub mod value;

pub use engine::{resolve, resolve_keys, Lookup};
pub use errors::{ErrorKind, PathError, Result, SyntaxError};
pub use parser::parse;
pub use path::Path;
pub use value::{Field, Kind, Mapping, Opaque, Record, Value};

/// Resolves `expr` against a JSON document, returning an owned value.
pub fn from_json(json: serde_json::Value, expr: &str) -> Result<(serde_json::Value, bool)> {
    let root = Value::from(json);
    let lookup = resolve(&root, expr)?;
    Ok((lookup.value.to_json(), lookup.found))
}
