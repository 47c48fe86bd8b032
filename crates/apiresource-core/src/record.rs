//! Backing record and record store contracts.
//!
//! The engine never persists anything itself. A [`Record`] is one backing
//! entity (a row, a document) owned by the application; a [`RecordStore`]
//! builds and finds records by model name. Both are implemented by the
//! persistence layer.

use crate::context::Context;
use crate::error::{Error, ErrorMessages, Result};
use crate::value::Value;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// One backing record.
///
/// Field access is dynamic: resources address fields by name, including
/// foreign keys (`author_id`), to-many key lists (`tag_ids`) and
/// polymorphic type discriminators (`vehicle_type`).
///
/// # Example
///
/// ```ignore
/// struct Row { fields: BTreeMap<String, Value> }
///
/// impl Record for Row {
///     fn model_name(&self) -> &str { "Post" }
///     fn read(&self, field: &str) -> Result<Value> {
///         Ok(self.fields.get(field).cloned().unwrap_or(Value::Null))
///     }
///     fn write(&mut self, field: &str, value: Value) -> Result<()> {
///         self.fields.insert(field.to_string(), value);
///         Ok(())
///     }
/// }
/// ```
pub trait Record: Send {
    /// Model name, camel-cased and `::`-namespaced (`Person`, `Api::Book`).
    fn model_name(&self) -> &str;

    /// Read a field.
    fn read(&self, field: &str) -> Result<Value>;

    /// Write a field in memory.
    ///
    /// Return [`Error::InvalidArgument`] when the field rejects the value
    /// (e.g. an enumerated column); the field protocol turns that into
    /// `InvalidFieldValue`.
    fn write(&mut self, field: &str, value: Value) -> Result<()>;

    /// Run validations, populating [`Record::error_messages`].
    fn validate(&mut self) -> bool {
        true
    }

    /// Error messages from the last validation, save or destroy.
    fn error_messages(&self) -> ErrorMessages {
        ErrorMessages::new()
    }

    /// Persist without validating again.
    ///
    /// `Ok(false)` means the store refused the write; messages, if any,
    /// are read from [`Record::error_messages`]. Records without a
    /// persistence step keep the default, which reports success.
    fn save(&mut self) -> Result<bool> {
        Ok(true)
    }

    /// Destroy the record. `Ok(false)` means the store refused.
    fn destroy(&mut self) -> Result<bool> {
        Ok(false)
    }

    /// Current value of a named association.
    fn association(&self, relation: &str) -> Result<Association> {
        Err(Error::Store(format!(
            "{} has no association `{relation}`",
            self.model_name()
        )))
    }

    /// Append a record to a to-many association.
    fn push_association(&mut self, relation: &str, record: &RecordHandle) -> Result<()> {
        let _ = record;
        Err(Error::Store(format!(
            "{} cannot append to association `{relation}`",
            self.model_name()
        )))
    }

    /// Remove the member identified by `key` from a to-many association.
    fn delete_association(&mut self, relation: &str, key: &Value) -> Result<()> {
        let _ = key;
        Err(Error::Store(format!(
            "{} cannot delete from association `{relation}`",
            self.model_name()
        )))
    }
}

/// Shared handle to a backing record.
///
/// The application keeps its own clone; resources hold another. The lock
/// only guards individual field accesses and is never held across
/// callbacks.
#[derive(Clone)]
pub struct RecordHandle {
    inner: Arc<Mutex<dyn Record>>,
}

impl RecordHandle {
    /// Wrap a record.
    pub fn new<R: Record + 'static>(record: R) -> Self {
        Self {
            inner: Arc::new(Mutex::new(record)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, dyn Record + 'static> {
        // Recover from a poisoned lock; records hold plain field data.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run a closure with shared access to the record.
    pub fn with<T>(&self, f: impl FnOnce(&dyn Record) -> T) -> T {
        let guard = self.lock();
        f(&*guard)
    }

    /// Run a closure with exclusive access to the record.
    pub fn with_mut<T>(&self, f: impl FnOnce(&mut dyn Record) -> T) -> T {
        let mut guard = self.lock();
        f(&mut *guard)
    }

    /// Model name of the wrapped record.
    pub fn model_name(&self) -> String {
        self.with(|r| r.model_name().to_string())
    }

    /// Read a field.
    pub fn read(&self, field: &str) -> Result<Value> {
        self.with(|r| r.read(field))
    }

    /// Write a field.
    pub fn write(&self, field: &str, value: Value) -> Result<()> {
        self.with_mut(|r| r.write(field, value))
    }

    /// Whether two handles point at the same record.
    pub fn ptr_eq(&self, other: &RecordHandle) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for RecordHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordHandle")
            .field("model", &self.model_name())
            .finish()
    }
}

/// Current value of an association.
#[derive(Debug, Clone)]
pub enum Association {
    /// To-one association (possibly unset)
    One(Option<RecordHandle>),
    /// To-many association, in relation order
    Many(Vec<RecordHandle>),
}

impl Association {
    /// The linked record of a to-one association.
    ///
    /// A to-many association yields its first member.
    pub fn into_one(self) -> Option<RecordHandle> {
        match self {
            Association::One(record) => record,
            Association::Many(records) => records.into_iter().next(),
        }
    }

    /// The linked records, in order. A to-one association yields zero or
    /// one record.
    pub fn into_many(self) -> Vec<RecordHandle> {
        match self {
            Association::One(record) => record.into_iter().collect(),
            Association::Many(records) => records,
        }
    }
}

/// Persistence-side lookup and construction of records.
pub trait RecordStore: Send + Sync {
    /// Whether a model with this name exists.
    fn has_model(&self, model: &str) -> bool;

    /// Primary key field of a model, when the store knows it.
    fn primary_key(&self, model: &str) -> Option<String> {
        let _ = model;
        None
    }

    /// Build a new, unsaved record.
    fn build(&self, model: &str) -> Result<RecordHandle>;

    /// Find a record by primary key. `Ok(None)` when nothing matches.
    fn find_by_key(
        &self,
        model: &str,
        primary_key: &str,
        key: &Value,
        context: &Context,
    ) -> Result<Option<RecordHandle>>;
}
