//! Request context passed through resource operations.

use crate::value::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Opaque per-request context.
///
/// The engine never inspects it; it is handed to custom key verifiers,
/// finders and relation-name functions, which typically read entries such
/// as `current_user`. Cloning is cheap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    values: Arc<BTreeMap<String, Value>>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        Arc::make_mut(&mut self.values).insert(key.into(), value.into());
    }

    /// Get an entry.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Whether the context has no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
