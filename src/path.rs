use std::fmt;
use std::str::FromStr;

use crate::engine::{self, Lookup};
use crate::errors::{Result, SyntaxError};
use crate::parser;
use crate::value::Value;

/// A parsed path expression, reusable across lookups.
///
/// ```
/// use value_path::{Path, Value};
///
/// let path = Path::parse("items[1]").unwrap();
/// let root = Value::from(serde_json::json!({"items": ["a", "b"]}));
/// assert_eq!(*path.resolve(&root).unwrap().value, Value::from("b"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    keys: Vec<String>,
}

impl Path {
    pub fn parse(expr: &str) -> std::result::Result<Self, SyntaxError> {
        let keys = parser::parse(expr)?;
        tracing::trace!(expr, ?keys, "parsed path");
        Ok(Self { keys })
    }

    /// A path from already-split keys. Empty keys are identity steps.
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn is_identity(&self) -> bool {
        self.keys.iter().all(String::is_empty)
    }

    pub fn resolve<'v>(&self, root: &'v Value) -> Result<Lookup<'v>> {
        engine::resolve_keys(root, &self.keys)
    }
}

impl FromStr for Path {
    type Err = SyntaxError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Path::parse(s)
    }
}

/// Canonical bracketed form, e.g. `["Map"]["42.5"]`. Identity renders as `.`.
///
/// Backslashes are written verbatim, so a key ending in `\` does not reparse.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_identity() {
            return f.write_str(".");
        }
        for key in self.keys.iter().filter(|k| !k.is_empty()) {
            let escaped = key.replace('"', "\\\"");
            write!(f, "[\"{escaped}\"]")?;
        }
        Ok(())
    }
}
