// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

// Use README.md as crate documentation.
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

#[cfg(feature = "arc")]
use std::sync::Arc as Rc;
#[cfg(not(feature = "arc"))]
use std::rc::Rc;

mod access;
mod answer;
mod cache;
mod foreign;
mod number;
mod path;
mod resolver;
mod value;

pub use access::{map_access, sequence_access};
pub use answer::Answer;
pub use cache::{CachedPath, PathCache};
pub use foreign::{materialize, Foreign, MapKey, Shape, Shareable, ToValue};
pub use number::Number;
pub use path::{tokenize, PathError, PathToken};
pub use resolver::resolve;
pub use value::{Mapping, Sequence, Value};

/// Resolve `path` against `root` using the process-wide [`PathCache`].
///
/// Use [`PathCache::query`] to resolve through a cache you own instead.
pub fn query(root: &Value, path: &str) -> Answer<'static> {
    PathCache::shared().query(root, path)
}
