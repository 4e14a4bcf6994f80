//! Dynamic values the resolver walks over.
//!
//! A [`Value`] is the in-memory object graph: scalars, text, sequences,
//! string-keyed mappings, named-field records, single-level references and
//! opaque leaves such as functions or channels.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use serde_json::Value as Json;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    /// Text; indexed as a sequence of chars.
    Str(String),
    Seq(Vec<Value>),
    Map(Mapping),
    Record(Record),
    /// One level of indirection, followed transparently by the resolver.
    Ref(Arc<Value>),
    Opaque(Opaque),
}

/// How a value is navigated by a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Absent,
    Mapping,
    Record,
    Sequence,
    Reference,
    Scalar,
    Opaque,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Kind::Absent => "absent",
            Kind::Mapping => "mapping",
            Kind::Record => "record",
            Kind::Sequence => "sequence",
            Kind::Reference => "reference",
            Kind::Scalar => "scalar",
            Kind::Opaque => "opaque",
        };
        f.write_str(s)
    }
}

/// Leaves that carry behaviour rather than data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opaque {
    Function(String),
    Channel(String),
}

impl Value {
    pub fn reference(target: impl Into<Value>) -> Self {
        Value::Ref(Arc::new(target.into()))
    }

    pub fn function(name: impl Into<String>) -> Self {
        Value::Opaque(Opaque::Function(name.into()))
    }

    pub fn channel(name: impl Into<String>) -> Self {
        Value::Opaque(Opaque::Channel(name.into()))
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Absent,
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Char(_) => Kind::Scalar,
            Value::Str(_) | Value::Seq(_) => Kind::Sequence,
            Value::Map(_) => Kind::Mapping,
            Value::Record(_) => Kind::Record,
            Value::Ref(_) => Kind::Reference,
            Value::Opaque(_) => Kind::Opaque,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Follows exactly one reference; anything else is returned as is.
    pub fn deref_once(&self) -> &Value {
        match self {
            Value::Ref(target) => target,
            other => other,
        }
    }

    fn as_embedded_record(&self) -> Option<&Record> {
        match self.deref_once() {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Converts back into JSON. References are followed, records become
    /// objects and opaque leaves become `null`.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Null | Value::Opaque(_) => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f).map_or(Json::Null, Json::Number),
            Value::Char(c) => Json::String(c.to_string()),
            Value::Str(s) => Json::String(s.clone()),
            Value::Seq(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(m) => Json::Object(m.iter().map(|(k, v)| (k.clone(), v.to_json())).collect()),
            Value::Record(r) => Json::Object(
                r.fields()
                    .iter()
                    .map(|f| (f.name.clone(), f.value.to_json()))
                    .collect(),
            ),
            Value::Ref(target) => target.to_json(),
        }
    }
}

/// String-keyed association. A miss yields the mapping's zero value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mapping {
    entries: BTreeMap<String, Value>,
    zero: Option<Box<Value>>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapping whose misses report `zero` instead of `Null`, e.g. a table
    /// of flags answering `false` for unknown keys.
    pub fn with_zero(zero: impl Into<Value>) -> Self {
        Self {
            entries: BTreeMap::new(),
            zero: Some(Box::new(zero.into())),
        }
    }

    pub fn entry(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn zero(&self) -> Value {
        self.zero.as_deref().cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            zero: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: Value,
    /// Members of an embedded record are promoted into the parent's namespace.
    pub embedded: bool,
}

/// Named-field aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    type_name: String,
    fields: Vec<Field>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
            embedded: false,
        });
        self
    }

    /// Embeds `value` under `name`. If it is a record (or a reference to
    /// one) its members are promoted.
    pub fn embed(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
            embedded: true,
        });
        self
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Looks `name` up among the record's own fields and, breadth-first by
    /// depth, the members of embedded records. The shallowest depth with a
    /// match decides; two matches at that depth are ambiguous and miss.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        let mut level: Vec<&Record> = vec![self];
        while !level.is_empty() {
            let hits = level
                .iter()
                .copied()
                .flat_map(|r| r.fields.iter())
                .filter(|f| f.name == name);
            match hits.at_most_one() {
                Ok(Some(f)) => return Some(&f.value),
                Ok(None) => {}
                Err(_) => return None,
            }
            level = level
                .iter()
                .copied()
                .flat_map(|r| r.fields.iter())
                .filter(|f| f.embedded)
                .filter_map(|f| f.value.as_embedded_record())
                .collect();
        }
        None
    }
}

macro_rules! value_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(impl From<$t> for Value {
            fn from(v: $t) -> Self {
                Value::$variant(v.into())
            }
        })*
    };
}

value_from! {
    bool => Bool,
    i32 => Int,
    i64 => Int,
    u32 => Int,
    f32 => Float,
    f64 => Float,
    char => Char,
    String => Str,
    &str => Str,
    Mapping => Map,
    Record => Record,
    Arc<Value> => Ref,
    Opaque => Opaque,
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<BTreeMap<String, T>> for Value {
    fn from(map: BTreeMap<String, T>) -> Self {
        Value::Map(map.into_iter().collect())
    }
}

impl<T: Into<Value>> From<HashMap<String, T>> for Value {
    fn from(map: HashMap<String, T>) -> Self {
        Value::Map(map.into_iter().collect())
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            Json::String(s) => Value::Str(s),
            Json::Array(items) => Value::Seq(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()),
        }
    }
}
