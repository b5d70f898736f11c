// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::cache::PathCache;
use crate::value::{Mapping, Sequence, Value};

/// Result of a path query.
///
/// Holds the value the query reached (`Value::Undefined` when it missed) and
/// the cache used to resolve further queries from it. Extractors return the
/// converted value with `true`, or the caller's default with `false`.
#[derive(Debug, Clone)]
pub struct Answer<'c> {
    value: Value,
    cache: &'c PathCache,
}

fn or_default<T>(value: Option<T>, default: T) -> (T, bool) {
    match value {
        Some(v) => (v, true),
        None => (default, false),
    }
}

impl<'c> Answer<'c> {
    pub(crate) fn new(value: Value, cache: &'c PathCache) -> Self {
        Self { value, cache }
    }

    /// Query `path` using this answer's value as the root.
    pub fn query(&self, path: &str) -> Answer<'c> {
        self.cache.query(&self.value, path)
    }

    /// True if the query reached a value that is not null.
    pub fn exists(&self) -> bool {
        self.value.is_present()
    }

    /// The raw value: `Value::Undefined` for a miss, `Value::Null` for a
    /// null leaf.
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// String value. Other types are not stringified.
    pub fn as_str<'a>(&'a self, default: &'a str) -> (&'a str, bool) {
        match &self.value {
            Value::String(s) => (s.as_ref(), true),
            _ => (default, false),
        }
    }

    pub fn as_bool(&self, default: bool) -> (bool, bool) {
        or_default(self.value.as_bool().ok().copied(), default)
    }

    /// Signed integer value; see [`Number::to_i64`](crate::Number::to_i64).
    pub fn as_i64(&self, default: i64) -> (i64, bool) {
        or_default(self.value.to_i64(), default)
    }

    /// Unsigned integer value; see [`Number::to_u64`](crate::Number::to_u64).
    pub fn as_u64(&self, default: u64) -> (u64, bool) {
        or_default(self.value.to_u64(), default)
    }

    pub fn as_f64(&self, default: f64) -> (f64, bool) {
        or_default(self.value.to_f64(), default)
    }

    /// Sequence value. Foreign sequences are copied on every call.
    pub fn as_sequence(&self, default: Sequence) -> (Sequence, bool) {
        or_default(self.value.to_sequence(), default)
    }

    /// Mapping value. Foreign maps are copied on every call and entries
    /// with non-string keys are dropped.
    pub fn as_map(&self, default: Mapping) -> (Mapping, bool) {
        or_default(self.value.to_mapping(), default)
    }
}

impl PartialEq for Answer<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}
