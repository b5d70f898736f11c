// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::answer::Answer;
use crate::path::{tokenize, PathError, PathToken};
use crate::resolver::resolve;
use crate::value::Value;

use std::sync::Arc;

use dashmap::DashMap;

/// Tokens of one path, or the reason it could not be tokenized.
pub type CachedPath = Result<Arc<[PathToken]>, PathError>;

/// Thread-safe memo of tokenized paths using DashMap.
///
/// Entries are never evicted or replaced: paths are expected to come from a
/// small, fixed set of query templates. Lookups of different paths only
/// contend when they hash to the same shard.
#[derive(Debug, Default)]
pub struct PathCache {
    inner: DashMap<Box<str>, CachedPath>,
}

lazy_static::lazy_static! {
    static ref SHARED: PathCache = PathCache::new();
}

impl PathCache {
    /// Create a new, empty cache.
    pub fn new() -> Self {
        Self {
            inner: DashMap::new(),
        }
    }

    /// Create a cache sized for `capacity` distinct paths.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: DashMap::with_capacity(capacity),
        }
    }

    /// Process-wide cache used by [`crate::query`]. Created on first use and
    /// kept for the life of the process.
    pub fn shared() -> &'static PathCache {
        &SHARED
    }

    /// Tokens for `path`, tokenizing it on first request.
    pub fn tokens(&self, path: &str) -> CachedPath {
        if let Some(entry) = self.inner.get(path) {
            return entry.value().clone();
        }

        // Tokenize without holding a shard lock.
        let computed: CachedPath = tokenize(path).map(Arc::from);
        match &computed {
            Ok(tokens) => log::trace!("cached path `{path}` ({} tokens)", tokens.len()),
            Err(e) => log::trace!("cached malformed path `{path}`: {e}"),
        }

        // Another thread may have raced us to the insert; keep the first entry.
        self.inner
            .entry(Box::from(path))
            .or_insert(computed)
            .value()
            .clone()
    }

    /// Check if `path` has been tokenized before.
    pub fn contains(&self, path: &str) -> bool {
        self.inner.contains_key(path)
    }

    /// Get the number of cached paths.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Resolve `path` against `root`.
    ///
    /// A malformed path resolves to an absent answer like any other miss.
    pub fn query(&self, root: &Value, path: &str) -> Answer<'_> {
        let value = match self.tokens(path) {
            Ok(tokens) => resolve(root, &tokens),
            Err(_) => Value::Undefined,
        };
        Answer::new(value, self)
    }
}
