//! Attribute metadata.

use crate::value::Value;
use std::collections::BTreeMap;

/// Format used when an attribute does not declare one.
pub const DEFAULT_FORMAT: &str = "default";

/// Options attached to a declared attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeOptions {
    format: Option<String>,
    /// Application-defined flags, passed through untouched.
    pub flags: BTreeMap<String, Value>,
}

impl AttributeOptions {
    /// Options with the default format and no flags.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value format (e.g. `id`, `date_with_timezone`).
    #[must_use]
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Add a custom flag.
    #[must_use]
    pub fn flag(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.flags.insert(name.into(), value.into());
        self
    }

    /// The effective format, `"default"` unless one was set.
    pub fn format_name(&self) -> &str {
        self.format.as_deref().unwrap_or(DEFAULT_FORMAT)
    }

    /// Whether a format was declared explicitly.
    pub fn has_format(&self) -> bool {
        self.format.is_some()
    }
}
