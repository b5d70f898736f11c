// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::foreign::{self, Foreign, Shape};
use crate::number::Number;
use crate::Rc;

use core::fmt;
use std::borrow::Cow;
use std::collections::BTreeMap;

use anyhow::{anyhow, bail, Result};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Shared handle to a sequence of values.
pub type Sequence = Rc<Vec<Value>>;

/// Shared handle to a string-keyed mapping.
pub type Mapping = Rc<BTreeMap<Rc<str>, Value>>;

/// A dynamically typed value, usually the output of a JSON or YAML decoder.
///
/// Containers are reference counted so that cloning a value (or an
/// [`Answer`](crate::Answer) holding one) never copies the tree.
#[derive(Debug, Clone)]
pub enum Value {
    // Json data types. serde will automatically map json to these variants.
    Null,
    Bool(bool),
    Number(Number),
    String(Rc<str>),
    Array(Sequence),
    Object(Mapping),

    // Containers of any other concrete type.
    Foreign(Rc<dyn Foreign>),

    // Indicate that a value is absent
    Undefined,
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::String(s) => serializer.serialize_str(s.as_ref()),
            Value::Number(n) => n.serialize(serializer),
            Value::Array(a) => a.serialize(serializer),
            Value::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields.iter() {
                    map.serialize_entry(k.as_ref(), v)?;
                }
                map.end()
            }
            Value::Foreign(f) => foreign::materialize(f.as_ref()).serialize(serializer),

            // display undefined as a special string
            Value::Undefined => serializer.serialize_str("<undefined>"),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a value")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Deserialize::deserialize(deserializer)
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Bool(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::from(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        // Keep the decoder's convention: non-negative integers are unsigned.
        match u64::try_from(v) {
            Ok(u) => Ok(Value::from(u)),
            Err(_) => Ok(Value::from(v)),
        }
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::from(v))
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::from(s))
    }

    fn visit_string<E>(self, s: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Value::from(s))
    }

    fn visit_seq<V>(self, mut visitor: V) -> Result<Self::Value, V::Error>
    where
        V: SeqAccess<'de>,
    {
        let mut arr = vec![];
        while let Some(v) = visitor.next_element()? {
            arr.push(v);
        }
        Ok(Value::from(arr))
    }

    fn visit_map<V>(self, mut visitor: V) -> Result<Self::Value, V::Error>
    where
        V: MapAccess<'de>,
    {
        let mut map = BTreeMap::new();
        while let Some((key, value)) = visitor.next_entry::<Value, Value>()? {
            let key = match key {
                Value::String(s) => s,
                // YAML allows non-string keys; keep their json text.
                other => Rc::from(other.to_string()),
            };
            map.insert(key, value);
        }
        Ok(Value::from(map))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => write!(f, "{s}"),
            Err(_e) => Err(fmt::Error),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) | (Value::Undefined, Value::Undefined) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Foreign(a), Value::Foreign(b)) if Rc::ptr_eq(a, b) => true,
            (Value::Foreign(f), v) | (v, Value::Foreign(f)) => {
                &foreign::materialize(f.as_ref()) == v
            }
            _ => false,
        }
    }
}

impl Value {
    pub fn new_object() -> Value {
        Value::from(BTreeMap::new())
    }

    pub fn new_array() -> Value {
        Value::from(vec![])
    }

    /// Wrap a container of any other concrete type.
    pub fn foreign<F: Foreign + 'static>(f: F) -> Value {
        Value::Foreign(Rc::new(f))
    }

    pub fn from_json_str(json: &str) -> Result<Value> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_str(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_file(path: &str) -> Result<Value> {
        match std::fs::read_to_string(path) {
            Ok(c) => Self::from_json_str(c.as_str()),
            Err(e) => bail!("Failed to read {path}. {e}"),
        }
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(yaml: &str) -> Result<Value> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_file(path: &str) -> Result<Value> {
        match std::fs::read_to_string(path) {
            Ok(c) => Self::from_yaml_str(c.as_str()),
            Err(e) => bail!("Failed to read {path}. {e}"),
        }
    }
}

macro_rules! value_from_number {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )+
    };
}

value_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(a: Vec<Value>) -> Self {
        Value::Array(Rc::new(a))
    }
}

impl From<BTreeMap<Rc<str>, Value>> for Value {
    fn from(m: BTreeMap<Rc<str>, Value>) -> Self {
        Value::Object(Rc::new(m))
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Value::from(u)
                } else if let Some(i) = n.as_i64() {
                    Value::from(i)
                } else {
                    Value::from(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::from(s),
            serde_json::Value::Array(a) => {
                Value::from(a.into_iter().map(Value::from).collect::<Vec<_>>())
            }
            serde_json::Value::Object(o) => Value::from(
                o.into_iter()
                    .map(|(k, v)| (Rc::from(k), Value::from(v)))
                    .collect::<BTreeMap<_, _>>(),
            ),
        }
    }
}

impl Value {
    pub fn from_array(a: Vec<Value>) -> Value {
        Value::from(a)
    }

    pub fn from_map(m: BTreeMap<Rc<str>, Value>) -> Value {
        Value::from(m)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// True unless the value is null or undefined.
    pub fn is_present(&self) -> bool {
        !matches!(self, Value::Null | Value::Undefined)
    }

    /// Container shape of the value, `None` for scalars.
    pub fn shape(&self) -> Option<Shape> {
        match self {
            Value::Array(_) => Some(Shape::Sequence),
            Value::Object(_) => Some(Shape::Map),
            Value::Foreign(f) => Some(f.shape()),
            _ => None,
        }
    }

    /// Child stored under `key`. See [`crate::access::map_access`].
    pub fn get_key(&self, key: &str) -> Option<Cow<'_, Value>> {
        crate::access::map_access(self, key)
    }

    /// Child stored at `index`. See [`crate::access::sequence_access`].
    pub fn get_index(&self, index: usize) -> Option<Cow<'_, Value>> {
        crate::access::sequence_access(self, index)
    }

    pub fn as_bool(&self) -> Result<&bool> {
        match self {
            Value::Bool(b) => Ok(b),
            _ => Err(anyhow!("not a bool")),
        }
    }

    pub fn as_string(&self) -> Result<&Rc<str>> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(anyhow!("not a string")),
        }
    }

    pub fn as_number(&self) -> Result<&Number> {
        match self {
            Value::Number(n) => Ok(n),
            _ => Err(anyhow!("not a number")),
        }
    }

    pub fn as_array(&self) -> Result<&Vec<Value>> {
        match self {
            Value::Array(a) => Ok(a),
            _ => Err(anyhow!("not an array")),
        }
    }

    pub fn as_object(&self) -> Result<&BTreeMap<Rc<str>, Value>> {
        match self {
            Value::Object(m) => Ok(m),
            _ => Err(anyhow!("not an object")),
        }
    }
}

// Coercions behind the typed extractors on `Answer`. Null and undefined never
// convert; strings are never parsed as numbers.
impl Value {
    pub fn to_i64(&self) -> Option<i64> {
        self.as_number().ok()?.to_i64()
    }

    pub fn to_u64(&self) -> Option<u64> {
        self.as_number().ok()?.to_u64()
    }

    pub fn to_f64(&self) -> Option<f64> {
        Some(self.as_number().ok()?.to_f64())
    }

    /// Sequence view. An `Array` is shared as is; a foreign sequence is
    /// copied into a new `Array`.
    pub fn to_sequence(&self) -> Option<Sequence> {
        match self {
            Value::Array(items) => Some(items.clone()),
            Value::Foreign(f) if f.shape() == Shape::Sequence => {
                match foreign::materialize(f.as_ref()) {
                    Value::Array(items) => Some(items),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Mapping view. An `Object` is shared as is; a foreign map is copied into
    /// a new `Object`, skipping entries whose key is not a string.
    pub fn to_mapping(&self) -> Option<Mapping> {
        match self {
            Value::Object(fields) => Some(fields.clone()),
            Value::Foreign(f) if f.shape() == Shape::Map => match foreign::materialize(f.as_ref()) {
                Value::Object(fields) => Some(fields),
                _ => None,
            },
            _ => None,
        }
    }
}
