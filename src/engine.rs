//! Graph resolver: folds a key sequence over a [`Value`], one step per key.

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::errors::{PathError, Result};
use crate::parser;
use crate::value::Value;

/// Outcome of a successful resolution.
///
/// `found` reports whether the *last* key existed; a missed key still
/// resolves, to the container's zero value (usually `Null`).
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup<'v> {
    pub value: Cow<'v, Value>,
    pub found: bool,
}

impl<'v> Lookup<'v> {
    fn hit(value: &'v Value) -> Self {
        Self {
            value: Cow::Borrowed(value),
            found: true,
        }
    }

    fn miss(value: Value) -> Self {
        Self {
            value: Cow::Owned(value),
            found: false,
        }
    }

    /// Drops the borrow on the graph.
    pub fn into_owned<'a>(self) -> Lookup<'a> {
        Lookup {
            value: Cow::Owned(self.value.into_owned()),
            found: self.found,
        }
    }

    pub fn into_value(self) -> Value {
        self.value.into_owned()
    }
}

/// Parses `expr` and resolves it against `root`.
///
/// A `Null` root resolves to itself before `expr` is even parsed.
pub fn resolve<'v>(root: &'v Value, expr: &str) -> Result<Lookup<'v>> {
    if root.is_null() {
        trace!(expr, "null root, path not evaluated");
        return Ok(Lookup::hit(root));
    }
    let keys = parser::parse(expr)?;
    resolve_keys(root, &keys)
}

/// Resolves already-parsed keys against `root`. The first failing step ends
/// the traversal.
pub fn resolve_keys<'v, K: AsRef<str>>(root: &'v Value, keys: &[K]) -> Result<Lookup<'v>> {
    if root.is_null() {
        return Ok(Lookup::hit(root));
    }
    keys.iter()
        .try_fold(Lookup::hit(root), |current, key| step(current, key.as_ref()))
        .inspect_err(|e| debug!(error = %e, "path resolution failed"))
}

fn step<'v>(current: Lookup<'v>, key: &str) -> Result<Lookup<'v>> {
    if key.is_empty() {
        return Ok(current);
    }
    match current.value {
        Cow::Borrowed(value) => step_into(value, key),
        // synthesized values (chars, zero values) own their children too
        Cow::Owned(value) => step_into(&value, key).map(|l| l.into_owned()),
    }
}

fn step_into<'v>(value: &'v Value, key: &str) -> Result<Lookup<'v>> {
    let target = value.deref_once();
    let kind = target.kind();
    trace!(key, %kind, "step");
    match target {
        Value::Map(map) => Ok(match map.get(key) {
            Some(v) => Lookup::hit(v),
            None => Lookup::miss(map.zero()),
        }),
        Value::Record(record) => Ok(match record.lookup(key) {
            Some(v) => Lookup::hit(v),
            None => Lookup::miss(Value::Null),
        }),
        Value::Seq(items) => {
            let index = parse_index(key)?;
            usize::try_from(index)
                .ok()
                .and_then(|i| items.get(i))
                .map(Lookup::hit)
                .ok_or(PathError::InvalidIndex {
                    index,
                    len: items.len(),
                })
        }
        Value::Str(text) => {
            let index = parse_index(key)?;
            match usize::try_from(index).ok().and_then(|i| text.chars().nth(i)) {
                Some(c) => Ok(Lookup {
                    value: Cow::Owned(Value::Char(c)),
                    found: true,
                }),
                None => Err(PathError::InvalidIndex {
                    index,
                    len: text.chars().count(),
                }),
            }
        }
        Value::Null => Err(PathError::NotFound {
            key: key.to_string(),
        }),
        Value::Bool(_)
        | Value::Int(_)
        | Value::Float(_)
        | Value::Char(_)
        | Value::Ref(_)
        | Value::Opaque(_) => Err(PathError::NotSupported {
            key: key.to_string(),
            kind,
        }),
    }
}

fn parse_index(key: &str) -> Result<i64> {
    key.parse::<i64>().map_err(|source| PathError::IndexParse {
        key: key.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::value::{Kind, Mapping, Record};
    use pretty_assertions::assert_eq;

    fn found(root: &Value, expr: &str) -> Value {
        let l = resolve(root, expr).unwrap_or_else(|e| panic!("{expr:?}: {e}"));
        assert!(l.found, "{expr:?} should be found");
        l.into_value()
    }

    fn error(root: &Value, expr: &str) -> PathError {
        match resolve(root, expr) {
            Ok(l) => panic!("{expr:?} resolved to {l:?}"),
            Err(e) => e,
        }
    }

    #[test]
    fn empty_keys_keep_found_flag() {
        let root = Value::from(Mapping::new().entry("a", 1));
        let l = resolve_keys(&root, &["b", ""]).unwrap();
        assert!(!l.found);
        assert_eq!(*l.value, Value::Null);
    }

    #[test]
    fn only_the_last_step_decides_found() {
        let inner = Mapping::new().entry("x", 1);
        let root = Value::from(Mapping::with_zero(Value::Map(inner)).entry("a", 0));
        let l = resolve(&root, "missing.x").unwrap();
        assert!(l.found);
        assert_eq!(*l.value, Value::Int(1));
    }

    #[test]
    fn one_reference_level_is_transparent() {
        let root = Value::reference(Mapping::new().entry("a", Value::reference(vec![1, 2])));
        assert_eq!(found(&root, "a[1]"), Value::Int(2));

        let double = Value::reference(Value::reference(vec![1]));
        let e = error(&double, "0");
        assert!(matches!(e, PathError::NotSupported { kind: Kind::Reference, .. }));
    }

    #[test]
    fn reference_to_null_is_not_found() {
        let root = Value::reference(Value::Null);
        assert_eq!(error(&root, "a").kind(), ErrorKind::NotFound);
    }

    #[test]
    fn explicit_null_is_found_but_not_navigable() {
        let root = Value::from(Mapping::new().entry("a", Value::Null));
        let l = resolve(&root, "a").unwrap();
        assert!(l.found);
        assert_eq!(*l.value, Value::Null);
        assert_eq!(error(&root, "a.b").kind(), ErrorKind::NotFound);
    }

    #[test]
    fn scalars_are_not_supported() {
        let root = Value::from(Record::new("r").field("n", 3));
        let e = error(&root, "n.x");
        assert!(matches!(e, PathError::NotSupported { kind: Kind::Scalar, ref key } if key == "x"));
    }

    #[test]
    fn out_of_range_indices_are_invalid() {
        let root = Value::from(vec![1, 2, 3]);
        assert!(matches!(error(&root, "3"), PathError::InvalidIndex { index: 3, len: 3 }));
        assert!(matches!(error(&root, "[\"-1\"]"), PathError::InvalidIndex { index: -1, len: 3 }));

        let text = Value::from("héllo");
        assert_eq!(found(&text, "1"), Value::Char('é'));
        assert!(matches!(error(&text, "5"), PathError::InvalidIndex { index: 5, len: 5 }));
    }

    #[test]
    fn navigating_into_a_char_is_not_supported() {
        let root = Value::from("abc");
        assert_eq!(error(&root, "0.0").kind(), ErrorKind::NotSupported);
    }

    #[test]
    fn null_root_skips_parsing() {
        let l = resolve(&Value::Null, "-").unwrap();
        assert!(l.found);
        assert_eq!(*l.value, Value::Null);
    }
}
