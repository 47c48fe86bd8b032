//! Resource instances and the change/save state machine.
//!
//! A [`Resource`] binds one definition to one backing record and one
//! request context. Mutations run through [`Resource::change`], which
//! coalesces nested changes into a single create-or-update cycle with at
//! most one save.
//!
//! ```text
//! Idle ──change()──▶ InChange{1} ──nested change()──▶ InChange{2} ...
//!   ▲                    │
//!   └──── save if needed ┘ (phase reset on every exit path)
//! ```

use crate::callbacks::CallbackKind;
use crate::definition::{Reader, ResourceDefinition, Writer};
use crate::registry::ResourceRegistry;
use apiresource_core::{
    Association, Context, Error, ErrorMessages, RecordHandle, Result, ValidationErrors, Value,
};
use std::fmt;
use std::sync::Arc;

/// Outcome of a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    /// The mutation ran and anything it required was persisted.
    Completed,
    /// The mutation was accepted but did not fully run (e.g. an around
    /// hook short-circuited it).
    Accepted,
}

impl ChangeStatus {
    /// Whether this is `Completed`.
    pub const fn is_completed(self) -> bool {
        matches!(self, ChangeStatus::Completed)
    }
}

/// Re-entrancy state of a resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChangePhase {
    /// No change is running.
    #[default]
    Idle,
    /// Inside a change, `depth` levels deep.
    InChange {
        /// Nesting depth, 1 for the outermost change.
        depth: usize,
    },
}

/// Value produced by a reader.
#[derive(Debug)]
pub enum Output {
    /// Attribute, foreign key or custom getter value.
    Value(Value),
    /// Backing related records.
    Records(Association),
    /// To-one relationship accessor.
    One(Option<Resource>),
    /// To-many relationship accessor.
    Many(Vec<Resource>),
}

impl Output {
    /// The plain value, if this output is one.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Output::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// One resource instance.
pub struct Resource {
    pub(crate) definition: Arc<ResourceDefinition>,
    pub(crate) registry: Arc<ResourceRegistry>,
    pub(crate) record: RecordHandle,
    pub(crate) context: Context,
    phase: ChangePhase,
    pub(crate) save_needed: bool,
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("resource", &self.definition.name())
            .field("record", &self.record)
            .field("phase", &self.phase)
            .field("save_needed", &self.save_needed)
            .finish_non_exhaustive()
    }
}

impl Resource {
    pub(crate) fn new(
        definition: Arc<ResourceDefinition>,
        registry: Arc<ResourceRegistry>,
        record: RecordHandle,
        context: Context,
    ) -> Self {
        Self {
            definition,
            registry,
            record,
            context,
            phase: ChangePhase::Idle,
            save_needed: false,
        }
    }

    /// The resource definition.
    pub fn definition(&self) -> &Arc<ResourceDefinition> {
        &self.definition
    }

    /// The registry this resource was created from.
    pub fn registry(&self) -> &Arc<ResourceRegistry> {
        &self.registry
    }

    /// The backing record.
    pub fn record(&self) -> &RecordHandle {
        &self.record
    }

    /// The request context.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Current change phase.
    pub fn phase(&self) -> ChangePhase {
        self.phase
    }

    /// Whether a save is pending.
    pub fn save_needed(&self) -> bool {
        self.save_needed
    }

    /// Mark a save as pending (for custom setters and hooks).
    pub fn mark_save_needed(&mut self) {
        self.save_needed = true;
    }

    /// Primary key value of the backing record.
    pub fn id(&self) -> Result<Value> {
        self.record.read(self.definition.primary_key())
    }

    /// Whether the backing record has no identity yet.
    pub fn is_new(&self) -> Result<bool> {
        Ok(self.id()?.is_null())
    }

    /// Fields this resource exposes.
    pub fn fetchable_fields(&self) -> Vec<String> {
        self.definition.fields()
    }

    /// Error messages currently held by the backing record.
    pub fn model_error_messages(&self) -> ErrorMessages {
        self.record.with(|r| r.error_messages())
    }

    // ========================================================================
    // Accessor dispatch
    // ========================================================================

    /// Call a reader by name.
    pub fn read(&self, name: &str) -> Result<Output> {
        match self.definition.reader(name) {
            Some(Reader::Attribute(field)) => self.record.read(field).map(Output::Value),
            Some(Reader::ForeignKey(relationship)) => {
                self.read_foreign_key(relationship).map(Output::Value)
            }
            Some(Reader::RelatedRecords(relationship)) => self
                .records_for_relationship(relationship)
                .map(Output::Records),
            Some(Reader::Related(relationship)) => self.related(relationship),
            Some(Reader::Custom(getter)) => getter(self).map(Output::Value),
            None if name == "id" => self.id().map(Output::Value),
            None => Err(Error::undefined_accessor(
                self.definition.resource_name(),
                name,
            )),
        }
    }

    /// Call a reader that yields a plain value.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.read(name)?.into_value().ok_or_else(|| {
            Error::InvalidArgument(format!("`{name}` does not return a plain value"))
        })
    }

    /// Call a writer by name.
    ///
    /// Writers only touch the record in memory; persistence happens in
    /// [`Resource::save`].
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        let definition = Arc::clone(&self.definition);
        match definition.writer(name) {
            Some(Writer::Attribute(field)) => self.record.write(field, value),
            Some(Writer::ForeignKey(relationship)) => {
                let foreign_key = definition.relationship_def(relationship)?.foreign_key_name();
                self.record.write(&foreign_key, value)
            }
            Some(Writer::Custom(setter)) => setter(self, value),
            None => Err(Error::undefined_accessor(
                definition.resource_name(),
                format!("{name}="),
            )),
        }
    }

    // ========================================================================
    // Change / save
    // ========================================================================

    /// Run a mutation as a change of `kind`.
    ///
    /// At top level the operation runs inside the `Create` (new record) or
    /// `Update` hooks and the `kind` hooks, followed by a save when one is
    /// pending or the record is new. Nested inside another change, only
    /// the `kind` hooks run and saving is left to the outer change.
    ///
    /// Returns `Completed` only if the operation and any save it triggered
    /// completed.
    #[tracing::instrument(level = "debug", skip(self, operation), fields(resource = %self.definition.name()))]
    pub fn change<F>(&mut self, kind: CallbackKind, operation: F) -> Result<ChangeStatus>
    where
        F: FnOnce(&mut Resource) -> Result<ChangeStatus>,
    {
        let definition = Arc::clone(&self.definition);
        let mut operation = Some(operation);
        let mut completed = false;

        if let ChangePhase::InChange { depth } = self.phase {
            tracing::trace!(depth = depth + 1, "Nested change");
            self.phase = ChangePhase::InChange { depth: depth + 1 };
            let result = definition.callbacks().run(kind, self, &mut |r| {
                if let Some(op) = operation.take() {
                    completed = op(r)?.is_completed();
                }
                Ok(())
            });
            self.phase = ChangePhase::InChange { depth };
            result?;
        } else {
            let envelope = if self.is_new()? {
                CallbackKind::Create
            } else {
                CallbackKind::Update
            };
            let result = definition.callbacks().run(envelope, self, &mut |r| {
                r.phase = ChangePhase::InChange { depth: 1 };
                definition.callbacks().run(kind, r, &mut |r| {
                    if let Some(op) = operation.take() {
                        completed = op(r)?.is_completed();
                    }
                    Ok(())
                })?;

                if r.save_needed || r.is_new()? {
                    completed = r.save()?.is_completed() && completed;
                }
                Ok(())
            });
            self.phase = ChangePhase::Idle;
            result?;
        }

        let status = if completed {
            ChangeStatus::Completed
        } else {
            ChangeStatus::Accepted
        };
        tracing::debug!(status = ?status, "Change finished");
        Ok(status)
    }

    /// Validate and persist the backing record inside the `Save` hooks.
    pub fn save(&mut self) -> Result<ChangeStatus> {
        let definition = Arc::clone(&self.definition);
        let mut status = ChangeStatus::Accepted;
        definition
            .callbacks()
            .run(CallbackKind::Save, self, &mut |r| {
                status = r.persist()?;
                Ok(())
            })?;
        Ok(status)
    }

    /// Destroy the backing record inside the `Remove` hooks.
    #[tracing::instrument(level = "debug", skip(self), fields(resource = %self.definition.name()))]
    pub fn remove(&mut self) -> Result<ChangeStatus> {
        let definition = Arc::clone(&self.definition);
        let mut status = ChangeStatus::Accepted;
        definition
            .callbacks()
            .run(CallbackKind::Remove, self, &mut |r| {
                status = r.destroy()?;
                Ok(())
            })?;
        Ok(status)
    }

    fn persist(&mut self) -> Result<ChangeStatus> {
        if !self.record.with_mut(|r| r.validate()) {
            tracing::debug!(resource = %self.definition.name(), "Record failed validation");
            return Err(self.validation_error());
        }

        let saved = self.record.with_mut(|r| r.save())?;
        if !saved {
            let messages = self.model_error_messages();
            if messages.values().any(|m| !m.is_empty()) {
                return Err(self.validation_error());
            }
            tracing::warn!(resource = %self.definition.name(), "Save failed without error messages");
            return Err(Error::SaveFailed);
        }

        tracing::trace!(resource = %self.definition.name(), "Record saved");
        self.save_needed = false;
        Ok(ChangeStatus::Completed)
    }

    fn destroy(&mut self) -> Result<ChangeStatus> {
        if !self.record.with_mut(|r| r.destroy())? {
            return Err(self.validation_error());
        }
        Ok(ChangeStatus::Completed)
    }

    fn validation_error(&self) -> Error {
        Error::Validation(ValidationErrors::new(
            self.model_error_messages(),
            self.definition.relationships().keys().cloned().collect(),
        ))
    }
}
