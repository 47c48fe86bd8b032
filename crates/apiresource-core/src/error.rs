//! Error types for resource operations.
//!
//! Every variant is request-scoped: callers render it into a response and
//! carry on. Domain failures (validation, not found, conflicts, invalid
//! values) are kept apart from programming and configuration errors so a
//! request layer can tell them apart.

use crate::value::Value;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Per-field error messages reported by a backing record.
///
/// Keys are field names (or `"base"` for record-level messages).
pub type ErrorMessages = BTreeMap<String, Vec<String>>;

/// The primary error type for all resource operations.
#[derive(Debug, Clone)]
pub enum Error {
    /// Lookup by key yielded nothing
    RecordNotFound {
        /// The key that was looked up
        key: Value,
    },
    /// A key or attribute value violates its type or format constraints
    InvalidFieldValue {
        /// Field name (`id` for key verification)
        field: String,
        /// The rejected value
        value: Value,
    },
    /// A to-many link already exists
    HasManyRelationExists {
        /// The colliding key
        key: Value,
    },
    /// The record failed validation or persistence reported field errors
    Validation(ValidationErrors),
    /// Persistence failed without reporting any message (silent cancel)
    SaveFailed,
    /// Persistence signalled a concurrent-modification conflict
    RecordLocked {
        /// Message from the record store
        message: String,
    },
    /// A backing field setter rejected the value outright
    InvalidArgument(String),
    /// No accessor with this name exists on the resource
    UndefinedAccessor {
        /// Resource name
        resource: String,
        /// Accessor name (writers end in `=`)
        name: String,
    },
    /// The resource does not declare this relationship
    UnknownRelationship {
        /// Resource name
        resource: String,
        /// Relationship name
        relationship: String,
    },
    /// No resource is registered under the resolved name
    ResourceNotFound {
        /// Type name that was looked up
        type_name: String,
        /// Fully resolved resource name
        resource_name: String,
    },
    /// The record store knows no model for this resource
    ModelNotFound {
        /// Resource name
        resource: String,
        /// Model name that failed to resolve
        model: String,
    },
    /// Abstract resources cannot be instantiated
    AbstractResource(String),
    /// Mutation attempted on an immutable resource
    ImmutableResource(String),
    /// Record store failure not covered by another variant
    Store(String),
}

/// Validation failure payload.
///
/// Carries the full per-field message mapping together with the
/// relationship names of the resource type, so a renderer can point each
/// message at an attribute or a relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    /// Messages grouped by field name
    pub error_messages: ErrorMessages,
    /// Relationship names declared on the resource type
    pub resource_relationships: Vec<String>,
}

impl ValidationErrors {
    /// Create a validation payload.
    pub fn new(error_messages: ErrorMessages, resource_relationships: Vec<String>) -> Self {
        Self {
            error_messages,
            resource_relationships,
        }
    }

    /// Check if there are any messages.
    pub fn is_empty(&self) -> bool {
        self.error_messages.values().all(Vec::is_empty)
    }

    /// Messages for one field (empty slice if none).
    pub fn messages_for(&self, field: &str) -> &[String] {
        self.error_messages.get(field).map_or(&[], Vec::as_slice)
    }

    /// Whether a field name refers to a relationship of the resource.
    pub fn is_relationship(&self, field: &str) -> bool {
        self.resource_relationships.iter().any(|r| r == field)
    }
}

impl Error {
    /// Shorthand for an `InvalidFieldValue` error.
    pub fn invalid_field_value(field: impl Into<String>, value: Value) -> Self {
        Error::InvalidFieldValue {
            field: field.into(),
            value,
        }
    }

    /// Shorthand for an `UndefinedAccessor` error.
    pub fn undefined_accessor(resource: impl Into<String>, name: impl Into<String>) -> Self {
        Error::UndefinedAccessor {
            resource: resource.into(),
            name: name.into(),
        }
    }

    /// Shorthand for an `UnknownRelationship` error.
    pub fn unknown_relationship(
        resource: impl Into<String>,
        relationship: impl Into<String>,
    ) -> Self {
        Error::UnknownRelationship {
            resource: resource.into(),
            relationship: relationship.into(),
        }
    }

    /// Is this a failure the client caused (as opposed to a programming or
    /// configuration error in the application)?
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::RecordNotFound { .. }
                | Error::InvalidFieldValue { .. }
                | Error::HasManyRelationExists { .. }
                | Error::Validation(_)
                | Error::SaveFailed
                | Error::RecordLocked { .. }
                | Error::ImmutableResource(_)
        )
    }

    /// Suggested HTTP status for rendering this error.
    pub fn status_hint(&self) -> u16 {
        match self {
            Error::RecordNotFound { .. } => 404,
            Error::InvalidFieldValue { .. } => 400,
            Error::HasManyRelationExists { .. } | Error::RecordLocked { .. } => 409,
            Error::Validation(_) | Error::SaveFailed => 422,
            Error::ImmutableResource(_) => 405,
            _ => 500,
        }
    }

    /// The validation payload, if this is a validation error.
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            Error::Validation(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::RecordNotFound { key } => {
                write!(f, "The record identified by {key} could not be found.")
            }
            Error::InvalidFieldValue { field, value } => {
                write!(f, "{value} is not a valid value for {field}.")
            }
            Error::HasManyRelationExists { key } => {
                write!(f, "The relation to {key} already exists.")
            }
            Error::Validation(e) => write!(f, "{e}"),
            Error::SaveFailed => write!(f, "Save failed or was cancelled"),
            Error::RecordLocked { message } => write!(f, "{message}"),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            Error::UndefinedAccessor { resource, name } => {
                write!(f, "Undefined accessor `{name}` on resource `{resource}`")
            }
            Error::UnknownRelationship {
                resource,
                relationship,
            } => write!(
                f,
                "Unknown relationship `{relationship}` on resource `{resource}`"
            ),
            Error::ResourceNotFound {
                type_name,
                resource_name,
            } => write!(
                f,
                "Could not find resource '{type_name}'. (Resource {resource_name} not found)"
            ),
            Error::ModelNotFound { resource, model } => write!(
                f,
                "Model {model} could not be found for {resource}. If this a base resource declare it as abstract."
            ),
            Error::AbstractResource(name) => {
                write!(f, "Resource `{name}` is abstract and cannot be instantiated")
            }
            Error::ImmutableResource(name) => write!(f, "Resource `{name}` is immutable"),
            Error::Store(msg) => write!(f, "Record store error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Validation Error(s)");
        }
        writeln!(f, "Validation Error(s):")?;
        for (field, messages) in &self.error_messages {
            for message in messages {
                writeln!(f, "  - {field}: {message}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<ValidationErrors> for Error {
    fn from(err: ValidationErrors) -> Self {
        Error::Validation(err)
    }
}

/// Result type alias for resource operations.
pub type Result<T> = std::result::Result<T, Error>;
