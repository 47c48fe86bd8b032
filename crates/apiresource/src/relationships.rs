//! Relationship accessors and link mutations on resource instances.

use crate::callbacks::CallbackKind;
use crate::definition::ResourceDefinition;
use crate::resource::{ChangeStatus, Output, Resource};
use apiresource_core::{
    Association, Error, RecordHandle, RelationshipDef, Result, Value, inflect,
};
use std::sync::Arc;

impl Resource {
    // ========================================================================
    // Accessors
    // ========================================================================

    /// Related records for a relation name, through the definition's
    /// `records_for` override when one is installed.
    pub fn records_for(&self, relation_name: &str) -> Result<Association> {
        match self.definition.records_for_override() {
            Some(records_for) => records_for(self, relation_name),
            None => self.record.with(|r| r.association(relation_name)),
        }
    }

    /// Related records of a relationship, using the relation name for the
    /// current context.
    pub fn records_for_relationship(&self, relationship: &str) -> Result<Association> {
        let relation_name = self
            .definition
            .relationship_def(relationship)?
            .relation_name_for(&self.context);
        tracing::trace!(relationship, %relation_name, "Fetching related records");
        self.records_for(&relation_name)
    }

    /// Related resource of a to-one relationship.
    pub fn related_one(&self, relationship: &str) -> Result<Option<Resource>> {
        match self.read(relationship)? {
            Output::One(resource) => Ok(resource),
            _ => Err(Error::InvalidArgument(format!(
                "`{relationship}` is not a to-one relationship accessor"
            ))),
        }
    }

    /// Related resources of a to-many relationship.
    pub fn related_many(&self, relationship: &str) -> Result<Vec<Resource>> {
        match self.read(relationship)? {
            Output::Many(resources) => Ok(resources),
            _ => Err(Error::InvalidArgument(format!(
                "`{relationship}` is not a to-many relationship accessor"
            ))),
        }
    }

    pub(crate) fn read_foreign_key(&self, relationship: &str) -> Result<Value> {
        let definition = Arc::clone(&self.definition);
        let rel = definition.relationship_def(relationship)?;
        if rel.belongs_to() {
            return self.record.read(&rel.foreign_key_name());
        }

        let records = self.records_for_relationship(relationship)?;
        if rel.is_to_one() {
            match records.into_one() {
                Some(record) => self.related_key(rel, &record),
                None => Ok(Value::Null),
            }
        } else {
            records
                .into_many()
                .iter()
                .map(|record| self.related_key(rel, record))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array)
        }
    }

    pub(crate) fn related(&self, relationship: &str) -> Result<Output> {
        let definition = Arc::clone(&self.definition);
        let rel = definition.relationship_def(relationship)?;
        let records = self.records_for_relationship(relationship)?;

        if rel.is_to_one() {
            let resource = match records.into_one() {
                Some(record) => Some(self.wrap_related(rel, record)?),
                None => None,
            };
            Ok(Output::One(resource))
        } else if rel.polymorphic {
            // Polymorphism is resolved per element.
            records
                .into_many()
                .into_iter()
                .map(|record| self.wrap_related(rel, record))
                .collect::<Result<Vec<_>>>()
                .map(Output::Many)
        } else {
            let related = self.related_definition(rel, None)?;
            related
                .apply_record_stages(records, &self.context)?
                .into_many()
                .into_iter()
                .map(|record| {
                    self.registry
                        .instantiate(Arc::clone(&related), record, self.context.clone())
                })
                .collect::<Result<Vec<_>>>()
                .map(Output::Many)
        }
    }

    fn related_definition(
        &self,
        rel: &RelationshipDef,
        record: Option<&RecordHandle>,
    ) -> Result<Arc<ResourceDefinition>> {
        match record {
            Some(record) if rel.polymorphic => {
                self.registry.resource_for_model(&self.definition, record)
            }
            _ => self
                .registry
                .resource_for(&rel.related_type(), self.definition.module_path()),
        }
    }

    fn related_key(&self, rel: &RelationshipDef, record: &RecordHandle) -> Result<Value> {
        let definition = self.related_definition(rel, Some(record))?;
        record.read(definition.primary_key())
    }

    fn wrap_related(&self, rel: &RelationshipDef, record: RecordHandle) -> Result<Resource> {
        let definition = self.related_definition(rel, Some(&record))?;
        self.registry
            .instantiate(definition, record, self.context.clone())
    }

    fn foreign_key_of(&self, relationship: &str) -> Result<String> {
        Ok(self
            .definition
            .relationship_def(relationship)?
            .foreign_key_name())
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append related records by key.
    ///
    /// Stops at the first key that is already linked and reports it; links
    /// created for earlier keys stay in place.
    #[tracing::instrument(level = "debug", skip(self, keys), fields(resource = %self.definition.name()))]
    pub fn create_to_many_links(
        &mut self,
        relationship: &str,
        keys: &[Value],
    ) -> Result<ChangeStatus> {
        self.change(CallbackKind::CreateToManyLink, |r| {
            r.link_to_many(relationship, keys)
        })
    }

    fn link_to_many(&mut self, relationship: &str, keys: &[Value]) -> Result<ChangeStatus> {
        let definition = Arc::clone(&self.definition);
        let rel = definition.relationship_def(relationship)?;
        let related_definition = self.related_definition(rel, None)?;
        let primary_key = related_definition.primary_key().to_string();

        for key in keys {
            let related = self.registry.find_with(
                Arc::clone(&related_definition),
                key,
                self.context.clone(),
            )?;
            let related_id = related.id()?;
            let relation_name = rel.relation_name_for(&self.context);

            let linked = self.record.with(|r| r.association(&relation_name))?;
            for member in linked.into_many() {
                if member.read(&primary_key)? == related_id {
                    tracing::debug!(relationship, key = %key, "To-many link already exists");
                    return Err(Error::HasManyRelationExists { key: key.clone() });
                }
            }

            self.record
                .with_mut(|r| r.push_association(&relation_name, related.record()))?;
            tracing::trace!(relationship, key = %key, "To-many link created");
        }

        Ok(ChangeStatus::Completed)
    }

    /// Replace the whole to-many link set. Saved by the enclosing change.
    ///
    /// Positional relationships keep the keys as given. Relationships that
    /// act as a set drop repeated keys.
    #[tracing::instrument(level = "debug", skip(self, keys), fields(resource = %self.definition.name()))]
    pub fn replace_to_many_links(
        &mut self,
        relationship: &str,
        keys: Vec<Value>,
    ) -> Result<ChangeStatus> {
        self.change(CallbackKind::ReplaceToManyLinks, |r| {
            let definition = Arc::clone(&r.definition);
            let rel = definition.relationship_def(relationship)?;
            let keys = if rel.acts_as_set {
                let mut members: Vec<Value> = Vec::with_capacity(keys.len());
                for key in keys {
                    if !members.contains(&key) {
                        members.push(key);
                    }
                }
                members
            } else {
                keys
            };
            r.set(&rel.foreign_key_name(), Value::Array(keys))?;
            r.save_needed = true;
            Ok(ChangeStatus::Completed)
        })
    }

    /// Point a to-one relationship at another key.
    #[tracing::instrument(level = "debug", skip(self), fields(resource = %self.definition.name()))]
    pub fn replace_to_one_link(&mut self, relationship: &str, key: Value) -> Result<ChangeStatus> {
        self.change(CallbackKind::ReplaceToOneLink, |r| {
            let foreign_key = r.foreign_key_of(relationship)?;
            r.set(&foreign_key, key)?;
            r.save_needed = true;
            Ok(ChangeStatus::Completed)
        })
    }

    /// Point a polymorphic to-one relationship at a key of a given type.
    ///
    /// The type discriminator (`<name>_type`) receives the classified type
    /// name (`people` -> `Person`).
    #[tracing::instrument(level = "debug", skip(self), fields(resource = %self.definition.name()))]
    pub fn replace_polymorphic_to_one_link(
        &mut self,
        relationship: &str,
        key: Value,
        type_name: &str,
    ) -> Result<ChangeStatus> {
        self.change(CallbackKind::ReplacePolymorphicToOneLink, |r| {
            let definition = Arc::clone(&r.definition);
            let rel = definition.relationship_def(relationship)?;
            r.record.write(&rel.foreign_key_name(), key)?;
            r.record.write(
                &rel.polymorphic_type(),
                Value::Text(inflect::classify(type_name)),
            )?;
            r.save_needed = true;
            Ok(ChangeStatus::Completed)
        })
    }

    /// Remove one member from a to-many relation immediately.
    #[tracing::instrument(level = "debug", skip(self), fields(resource = %self.definition.name()))]
    pub fn remove_to_many_link(&mut self, relationship: &str, key: &Value) -> Result<ChangeStatus> {
        self.change(CallbackKind::RemoveToManyLink, |r| {
            let relation_name = r
                .definition
                .relationship_def(relationship)?
                .relation_name_for(&r.context);
            r.record
                .with_mut(|m| m.delete_association(&relation_name, key))?;
            Ok(ChangeStatus::Completed)
        })
    }

    /// Clear a to-one relationship.
    #[tracing::instrument(level = "debug", skip(self), fields(resource = %self.definition.name()))]
    pub fn remove_to_one_link(&mut self, relationship: &str) -> Result<ChangeStatus> {
        self.change(CallbackKind::RemoveToOneLink, |r| {
            let foreign_key = r.foreign_key_of(relationship)?;
            r.set(&foreign_key, Value::Null)?;
            r.save_needed = true;
            Ok(ChangeStatus::Completed)
        })
    }
}
