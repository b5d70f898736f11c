// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Structural adapters for containers that are not built from [`Value`].
//!
//! Decoders produce `Value::Array` and `Value::Object` and queries walk those
//! directly. Any other container (a `Vec<i64>`, a `HashMap<String, String>`,
//! a user type) is wrapped in `Value::Foreign` and reached through the
//! [`Foreign`] trait. Scalar elements are converted to [`Value`] on access.
//!
//! Nested containers are held behind `Rc` (`Vec<Rc<Vec<i64>>>`, not
//! `Vec<Vec<i64>>`). A step into an `Rc` child hands out another reference
//! to it, so walking or materializing a foreign container never copies the
//! levels below it.

use crate::value::Value;
use crate::Rc;

use core::borrow::Borrow;
use core::fmt::Debug;
use core::hash::{BuildHasher, Hash};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Container shape a foreign value presents to queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Map,
    Sequence,
}

/// Thread-safety required of foreign containers: `Send + Sync` when values
/// are shared through `Arc`, nothing otherwise.
#[cfg(feature = "arc")]
pub trait Shareable: Send + Sync {}
#[cfg(feature = "arc")]
impl<T: Send + Sync + ?Sized> Shareable for T {}

#[cfg(not(feature = "arc"))]
pub trait Shareable {}
#[cfg(not(feature = "arc"))]
impl<T: ?Sized> Shareable for T {}

/// Read-only view of a container whose concrete type is unknown to the walker.
pub trait Foreign: Debug + Shareable {
    fn shape(&self) -> Shape;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value stored under a string key. `None` when the key is missing, the
    /// container is not a map, or its keys are not strings.
    fn get_key(&self, _key: &str) -> Option<Value> {
        None
    }

    /// Value stored at a position. `None` when out of range or not a sequence.
    fn get_index(&self, _index: usize) -> Option<Value> {
        None
    }

    /// String-keyed entries of a map. Entries whose key is not a string are
    /// left out.
    fn entries(&self) -> Vec<(Rc<str>, Value)> {
        Vec::new()
    }
}

/// Copy a foreign container into a freshly allocated `Array` or `Object`.
pub fn materialize(foreign: &dyn Foreign) -> Value {
    match foreign.shape() {
        Shape::Sequence => Value::from(
            (0..foreign.len())
                .filter_map(|idx| foreign.get_index(idx))
                .collect::<Vec<_>>(),
        ),
        Shape::Map => Value::from(foreign.entries().into_iter().collect::<BTreeMap<_, _>>()),
    }
}

/// Conversion of a concrete element into a [`Value`].
pub trait ToValue {
    fn to_value(&self) -> Value;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

macro_rules! to_value_via_from {
    ($($ty:ty),+) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    Value::from(*self)
                }
            }
        )+
    };
}

to_value_via_from!(bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::from(self.as_str())
    }
}

impl ToValue for &str {
    fn to_value(&self) -> Value {
        Value::from(*self)
    }
}

impl ToValue for Rc<str> {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

/// A shared child container. Only the reference count changes.
impl<F: Foreign + 'static> ToValue for Rc<F> {
    fn to_value(&self) -> Value {
        Value::Foreign(self.clone())
    }
}

/// Key type of a foreign map.
///
/// String-like keys answer lookups; every other key type is incompatible
/// with path keys, so lookups miss and its entries are skipped.
pub trait MapKey: Sized {
    fn key_str(&self) -> Option<&str>;

    fn lookup_ordered<'m, V>(_map: &'m BTreeMap<Self, V>, _key: &str) -> Option<&'m V>
    where
        Self: Ord,
    {
        None
    }

    fn lookup_hashed<'m, V, S>(_map: &'m HashMap<Self, V, S>, _key: &str) -> Option<&'m V>
    where
        Self: Hash + Eq,
        S: BuildHasher,
    {
        None
    }
}

macro_rules! string_map_key {
    ($($ty:ty),+) => {
        $(
            impl MapKey for $ty {
                fn key_str(&self) -> Option<&str> {
                    Some(Borrow::<str>::borrow(self))
                }

                fn lookup_ordered<'m, V>(map: &'m BTreeMap<Self, V>, key: &str) -> Option<&'m V> {
                    map.get(key)
                }

                fn lookup_hashed<'m, V, S>(map: &'m HashMap<Self, V, S>, key: &str) -> Option<&'m V>
                where
                    S: BuildHasher,
                {
                    map.get(key)
                }
            }
        )+
    };
}

string_map_key!(String, Box<str>, Rc<str>, &'static str);

macro_rules! incompatible_map_key {
    ($($ty:ty),+) => {
        $(
            impl MapKey for $ty {
                fn key_str(&self) -> Option<&str> {
                    None
                }
            }
        )+
    };
}

incompatible_map_key!(bool, char, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl<T> Foreign for Vec<T>
where
    T: ToValue + Debug + Shareable,
{
    fn shape(&self) -> Shape {
        Shape::Sequence
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get_index(&self, index: usize) -> Option<Value> {
        self.get(index).map(ToValue::to_value)
    }
}

impl<T> Foreign for VecDeque<T>
where
    T: ToValue + Debug + Shareable,
{
    fn shape(&self) -> Shape {
        Shape::Sequence
    }

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn get_index(&self, index: usize) -> Option<Value> {
        self.get(index).map(ToValue::to_value)
    }
}

impl<K, V> Foreign for BTreeMap<K, V>
where
    K: MapKey + Ord + Debug + Shareable,
    V: ToValue + Debug + Shareable,
{
    fn shape(&self) -> Shape {
        Shape::Map
    }

    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn get_key(&self, key: &str) -> Option<Value> {
        K::lookup_ordered(self, key).map(ToValue::to_value)
    }

    fn entries(&self) -> Vec<(Rc<str>, Value)> {
        self.iter()
            .filter_map(|(k, v)| Some((Rc::from(k.key_str()?), v.to_value())))
            .collect()
    }
}

impl<K, V, S> Foreign for HashMap<K, V, S>
where
    K: MapKey + Hash + Eq + Debug + Shareable,
    V: ToValue + Debug + Shareable,
    S: BuildHasher + Shareable,
{
    fn shape(&self) -> Shape {
        Shape::Map
    }

    fn len(&self) -> usize {
        HashMap::len(self)
    }

    fn get_key(&self, key: &str) -> Option<Value> {
        K::lookup_hashed(self, key).map(ToValue::to_value)
    }

    fn entries(&self) -> Vec<(Rc<str>, Value)> {
        self.iter()
            .filter_map(|(k, v)| Some((Rc::from(k.key_str()?), v.to_value())))
            .collect()
    }
}
