// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Single-step lookups on values of unknown shape.
//!
//! `Object` and `Array` are answered by borrowing straight from the tree.
//! Foreign containers go through their [`Foreign`](crate::Foreign) adapter and
//! yield an owned child. Neither function fails loudly: a wrong shape, a
//! missing key or an out of range index all produce `None`.

use crate::foreign::Shape;
use crate::value::Value;

use std::borrow::Cow;

/// Look up `key` in a map-shaped value.
pub fn map_access<'v>(value: &'v Value, key: &str) -> Option<Cow<'v, Value>> {
    match value {
        Value::Object(fields) => fields.get(key).map(Cow::Borrowed),
        Value::Foreign(f) if f.shape() == Shape::Map => f.get_key(key).map(Cow::Owned),
        _ => None,
    }
}

/// Look up `index` in a sequence-shaped value.
pub fn sequence_access(value: &Value, index: usize) -> Option<Cow<'_, Value>> {
    match value {
        Value::Array(items) => items.get(index).map(Cow::Borrowed),
        Value::Foreign(f) if f.shape() == Shape::Sequence && index < f.len() => {
            f.get_index(index).map(Cow::Owned)
        }
        _ => None,
    }
}
