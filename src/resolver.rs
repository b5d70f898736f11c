// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::access::{map_access, sequence_access};
use crate::path::PathToken;
use crate::value::Value;

use std::borrow::Cow;

fn step<'v>(current: &'v Value, token: &PathToken) -> Option<Cow<'v, Value>> {
    match token {
        PathToken::Key(key) => map_access(current, key),
        PathToken::Index(index) => sequence_access(current, *index),
    }
}

/// Walk `tokens` starting at `root`.
///
/// Returns the value reached after the last token, or `Value::Undefined` as
/// soon as a step misses. A null (or undefined) value met before the last
/// token ends the walk as absent; a null reached by the last token is
/// returned as `Value::Null`.
pub fn resolve(root: &Value, tokens: &[PathToken]) -> Value {
    let mut current = Cow::Borrowed(root);
    for (idx, token) in tokens.iter().enumerate() {
        if !current.is_present() {
            log::trace!("walk stopped before token {idx} `{token}`: null value");
            return Value::Undefined;
        }

        let next = match &current {
            Cow::Borrowed(v) => step(*v, token),
            Cow::Owned(v) => step(v, token).map(|c| Cow::Owned(c.into_owned())),
        };

        match next {
            Some(v) => current = v,
            None => {
                log::trace!("walk stopped at token {idx} `{token}`: not found");
                return Value::Undefined;
            }
        }
    }
    current.into_owned()
}
