//! Resource definitions: per-type metadata and the accessor table.
//!
//! A [`ResourceDefinition`] is a value object describing one resource
//! type. Registering attributes and relationships also fills a static
//! accessor table (reader and writer entries keyed by name) that
//! [`Resource`](crate::Resource) dispatches through at runtime. Generated
//! entries never replace an existing entry; custom getters and setters
//! always do.
//!
//! Subclassing ([`ResourceDefinition::inherit`]) copies the parent by
//! value. Nothing is shared between a parent and its subclasses.

use crate::callbacks::{AroundFn, CallbackKind, Callbacks, Continuation};
use crate::resource::Resource;
use apiresource_core::{
    Association, AttributeOptions, Context, Error, KeyType, RecordHandle, RecordStore, Result,
    RelationshipDef, Value, inflect,
};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Custom attribute reader.
pub type GetterFn = Arc<dyn Fn(&Resource) -> Result<Value> + Send + Sync>;

/// Custom attribute writer.
pub type SetterFn = Arc<dyn Fn(&mut Resource, Value) -> Result<()> + Send + Sync>;

/// Override for fetching related records by relation name (e.g. to
/// filter by the current user).
pub type RecordsForFn = Arc<dyn Fn(&Resource, &str) -> Result<Association> + Send + Sync>;

/// Override for finding a record by key (e.g. singleton resources).
pub type FindByKeyFn =
    Arc<dyn Fn(&dyn RecordStore, &Value, &Context) -> Result<Option<RecordHandle>> + Send + Sync>;

/// Per-request narrowing of a field list.
pub type FieldFilterFn = Arc<dyn Fn(Vec<String>, &Context) -> Vec<String> + Send + Sync>;

/// One stage of the record pipeline.
pub type RecordStageFn = Arc<dyn Fn(Association, &Context) -> Result<Association> + Send + Sync>;

const RESERVED_RESOURCE_TYPES: &[&str] = &["ids", "types", "hrefs", "links"];
const RESERVED_RELATIONSHIP_NAMES: &[&str] = &["id", "ids", "type", "types"];
const RESERVED_ATTRIBUTE_NAMES: &[&str] = &["type"];

static DEFAULT_KEY_TYPE: KeyType = KeyType::Integer;

/// Reader entry of the accessor table.
#[derive(Clone)]
pub enum Reader {
    /// Read an attribute from the backing record.
    Attribute(String),
    /// Read the foreign key of a relationship.
    ForeignKey(String),
    /// `record_for_<name>` / `records_for_<name>`: backing related records.
    RelatedRecords(String),
    /// The relationship accessor: related resources.
    Related(String),
    /// Application-defined getter.
    Custom(GetterFn),
}

impl fmt::Debug for Reader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reader::Attribute(name) => f.debug_tuple("Attribute").field(name).finish(),
            Reader::ForeignKey(rel) => f.debug_tuple("ForeignKey").field(rel).finish(),
            Reader::RelatedRecords(rel) => f.debug_tuple("RelatedRecords").field(rel).finish(),
            Reader::Related(rel) => f.debug_tuple("Related").field(rel).finish(),
            Reader::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}

/// Writer entry of the accessor table.
#[derive(Clone)]
pub enum Writer {
    /// Write an attribute on the backing record.
    Attribute(String),
    /// Write the foreign key of a relationship.
    ForeignKey(String),
    /// Application-defined setter.
    Custom(SetterFn),
}

impl fmt::Debug for Writer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Writer::Attribute(name) => f.debug_tuple("Attribute").field(name).finish(),
            Writer::ForeignKey(rel) => f.debug_tuple("ForeignKey").field(rel).finish(),
            Writer::Custom(_) => write!(f, "Custom(<fn>)"),
        }
    }
}

/// Field lists whose contents can be narrowed per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldList {
    /// Fields accepted on update.
    Updatable,
    /// Fields accepted on create.
    Creatable,
    /// Fields usable as sort keys.
    Sortable,
}

/// Stages applied to records fetched for this resource, in pipeline
/// order. Query building belongs to the request layer; every stage passes
/// records through unchanged unless a definition overrides it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordStage {
    /// Preload related records.
    Includes,
    /// Narrow by request filters.
    Filters,
    /// Order by request sort keys.
    Sort,
    /// Cut to the requested page.
    Pagination,
}

impl RecordStage {
    /// All stages in the order they run.
    pub const ALL: [RecordStage; 4] = [
        RecordStage::Includes,
        RecordStage::Filters,
        RecordStage::Sort,
        RecordStage::Pagination,
    ];
}

/// Metadata for one resource type.
#[derive(Clone)]
pub struct ResourceDefinition {
    name: String,
    type_name: String,
    attributes: BTreeMap<String, AttributeOptions>,
    relationships: BTreeMap<String, RelationshipDef>,
    primary_key: Option<String>,
    key_type: Option<KeyType>,
    is_abstract: bool,
    immutable: bool,
    model_name: Option<String>,
    model_hints: BTreeMap<String, String>,
    callbacks: Callbacks,
    readers: BTreeMap<String, Reader>,
    writers: BTreeMap<String, Writer>,
    records_for: Option<RecordsForFn>,
    find_by_key: Option<FindByKeyFn>,
    field_filters: HashMap<FieldList, FieldFilterFn>,
    record_stages: HashMap<RecordStage, RecordStageFn>,
    warnings: Vec<String>,
    model_resolved: bool,
}

impl fmt::Debug for ResourceDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDefinition")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("attributes", &self.attributes.keys().collect::<Vec<_>>())
            .field("relationships", &self.relationships.keys().collect::<Vec<_>>())
            .field("primary_key", &self.primary_key)
            .field("key_type", &self.key_type)
            .field("abstract", &self.is_abstract)
            .field("immutable", &self.immutable)
            .field("model_name", &self.model_name())
            .field("model_hints", &self.model_hints)
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

impl ResourceDefinition {
    /// Define a resource type.
    ///
    /// `name` may be given as a class-style path (`MyModule::Related`,
    /// `PostResource`) or an underscored path (`my_module/related`,
    /// `post`). The type name is derived by pluralising the last segment.
    pub fn new(name: impl AsRef<str>) -> Self {
        let underscored = inflect::underscore(name.as_ref());
        let name = underscored
            .strip_suffix("_resource")
            .unwrap_or(&underscored)
            .to_string();
        let type_name = inflect::pluralize(inflect::demodulize(&name));

        let mut definition = Self {
            name,
            type_name,
            attributes: BTreeMap::new(),
            relationships: BTreeMap::new(),
            primary_key: None,
            key_type: None,
            is_abstract: false,
            immutable: false,
            model_name: None,
            model_hints: BTreeMap::new(),
            callbacks: Callbacks::default(),
            readers: BTreeMap::new(),
            writers: BTreeMap::new(),
            records_for: None,
            find_by_key: None,
            field_filters: HashMap::new(),
            record_stages: HashMap::new(),
            warnings: Vec::new(),
            model_resolved: true,
        };
        definition.check_reserved_resource_type();
        definition.add_attribute("id", AttributeOptions::new().format("id"));
        definition
    }

    /// Derive a subclass definition.
    ///
    /// Attributes, model hints, callbacks, custom accessors and lookup
    /// overrides are copied; every relationship is registered again with
    /// `parent_resource` bound to the subclass. The subclass is neither
    /// abstract nor immutable, and keeps its own type, model name, primary
    /// key and key type.
    #[must_use]
    pub fn inherit(&self, name: impl AsRef<str>) -> Self {
        let mut child = Self::new(name);
        child.attributes = self.attributes.clone();
        child.model_hints = self.model_hints.clone();
        child.callbacks = self.callbacks.clone();
        child.readers = self.readers.clone();
        child.writers = self.writers.clone();
        child.records_for = self.records_for.clone();
        child.find_by_key = self.find_by_key.clone();
        child.field_filters = self.field_filters.clone();
        child.record_stages = self.record_stages.clone();

        for relationship in self.relationships.values() {
            child.add_relationship(relationship.clone());
        }
        child.add_attribute("id", AttributeOptions::new().format("id"));

        tracing::debug!(
            parent = %self.name,
            resource = %child.name,
            relationships = child.relationships.len(),
            "Derived resource definition"
        );
        child
    }

    // ========================================================================
    // Declaration
    // ========================================================================

    /// Declare an attribute.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, options: AttributeOptions) -> Self {
        self.add_attribute(name.into(), options);
        self
    }

    /// Declare several attributes sharing the same options.
    #[must_use]
    pub fn attributes(mut self, names: &[&str], options: AttributeOptions) -> Self {
        for name in names {
            self.add_attribute((*name).to_string(), options.clone());
        }
        self
    }

    /// Declare a relationship.
    #[must_use]
    pub fn relationship(mut self, relationship: RelationshipDef) -> Self {
        self.add_relationship(relationship);
        self
    }

    /// Declare a to-one relationship with default options.
    #[must_use]
    pub fn has_one(self, name: impl Into<String>) -> Self {
        self.relationship(RelationshipDef::to_one(name))
    }

    /// Declare a to-many relationship with default options.
    #[must_use]
    pub fn has_many(self, name: impl Into<String>) -> Self {
        self.relationship(RelationshipDef::to_many(name))
    }

    /// Override the derived type name. Model hints that pointed at the
    /// previous type follow the new one.
    #[must_use]
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        let previous = std::mem::replace(&mut self.type_name, type_name.into());
        for target in self.model_hints.values_mut() {
            if *target == previous {
                target.clone_from(&self.type_name);
            }
        }
        self.check_reserved_resource_type();
        self
    }

    /// Set the primary key field explicitly.
    #[must_use]
    pub fn with_primary_key(mut self, field: impl Into<String>) -> Self {
        self.primary_key = Some(field.into());
        self
    }

    /// Set the key type.
    #[must_use]
    pub fn with_key_type(mut self, key_type: KeyType) -> Self {
        self.key_type = Some(key_type);
        self
    }

    /// Back this resource with a differently named model and register a
    /// model hint pointing the model at this resource.
    #[must_use]
    pub fn with_model_name(self, model: impl Into<String>) -> Self {
        let model = model.into();
        let type_name = self.type_name.clone();
        self.with_model_name_without_hint(model.clone())
            .model_hint(&model, type_name)
    }

    /// Back this resource with a differently named model, without a hint.
    #[must_use]
    pub fn with_model_name_without_hint(mut self, model: impl Into<String>) -> Self {
        self.model_name = Some(model.into());
        self
    }

    /// Resolve records of `model` to the resource type `resource_type`
    /// (e.g. `Person` -> `special_people`).
    #[must_use]
    pub fn model_hint(mut self, model: &str, resource_type: impl Into<String>) -> Self {
        self.model_hints
            .insert(inflect::underscore(model), resource_type.into());
        self
    }

    /// Mark the resource abstract (no backing model).
    #[must_use]
    pub fn abstract_resource(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Mark the resource immutable.
    #[must_use]
    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }

    /// Register a hook running before `kind`.
    #[must_use]
    pub fn before<F>(mut self, kind: CallbackKind, hook: F) -> Self
    where
        F: Fn(&mut Resource) -> Result<()> + Send + Sync + 'static,
    {
        self.callbacks.before(kind, Arc::new(hook));
        self
    }

    /// Register a hook running after `kind`.
    #[must_use]
    pub fn after<F>(mut self, kind: CallbackKind, hook: F) -> Self
    where
        F: Fn(&mut Resource) -> Result<()> + Send + Sync + 'static,
    {
        self.callbacks.after(kind, Arc::new(hook));
        self
    }

    /// Register a hook wrapping `kind`. The hook must call the
    /// continuation to proceed; returning without calling it skips the
    /// wrapped operation silently.
    #[must_use]
    pub fn around<F>(mut self, kind: CallbackKind, hook: F) -> Self
    where
        F: Fn(&mut Resource, Continuation<'_>) -> Result<()> + Send + Sync + 'static,
    {
        let hook: AroundFn = Arc::new(hook);
        self.callbacks.around(kind, hook);
        self
    }

    /// Install a custom reader, replacing any generated one.
    #[must_use]
    pub fn getter<F>(mut self, name: impl Into<String>, getter: F) -> Self
    where
        F: Fn(&Resource) -> Result<Value> + Send + Sync + 'static,
    {
        self.readers
            .insert(name.into(), Reader::Custom(Arc::new(getter)));
        self
    }

    /// Install a custom writer, replacing any generated one.
    #[must_use]
    pub fn setter<F>(mut self, name: impl Into<String>, setter: F) -> Self
    where
        F: Fn(&mut Resource, Value) -> Result<()> + Send + Sync + 'static,
    {
        self.writers
            .insert(name.into(), Writer::Custom(Arc::new(setter)));
        self
    }

    /// Override how related records are fetched by relation name.
    #[must_use]
    pub fn records_for<F>(mut self, f: F) -> Self
    where
        F: Fn(&Resource, &str) -> Result<Association> + Send + Sync + 'static,
    {
        self.records_for = Some(Arc::new(f));
        self
    }

    /// Override how records of this resource are found by key.
    #[must_use]
    pub fn find_by_key<F>(mut self, f: F) -> Self
    where
        F: Fn(&dyn RecordStore, &Value, &Context) -> Result<Option<RecordHandle>>
            + Send
            + Sync
            + 'static,
    {
        self.find_by_key = Some(Arc::new(f));
        self
    }

    /// Narrow a field list per request.
    #[must_use]
    pub fn filter_fields<F>(mut self, list: FieldList, f: F) -> Self
    where
        F: Fn(Vec<String>, &Context) -> Vec<String> + Send + Sync + 'static,
    {
        self.field_filters.insert(list, Arc::new(f));
        self
    }

    /// Override one stage of the record pipeline.
    #[must_use]
    pub fn record_stage<F>(mut self, stage: RecordStage, f: F) -> Self
    where
        F: Fn(Association, &Context) -> Result<Association> + Send + Sync + 'static,
    {
        self.record_stages.insert(stage, Arc::new(f));
        self
    }

    fn add_attribute(&mut self, name: impl Into<String>, options: AttributeOptions) {
        let name = name.into();
        if RESERVED_ATTRIBUTE_NAMES.contains(&name.as_str()) {
            self.warn(format!(
                "[NAME COLLISION] `{name}` is a reserved key in {}.",
                self.resource_name()
            ));
        }
        if name == "id" && !options.has_format() {
            self.warn(
                "Id without format is no longer supported. Please remove ids from attributes, or specify a format."
                    .to_string(),
            );
        }

        // `id` is served by `Resource::id` through the primary key.
        if name != "id" {
            self.readers
                .entry(name.clone())
                .or_insert_with(|| Reader::Attribute(name.clone()));
            self.writers
                .entry(name.clone())
                .or_insert_with(|| Writer::Attribute(name.clone()));
        }
        self.attributes.insert(name, options);
    }

    fn add_relationship(&mut self, relationship: RelationshipDef) {
        let relationship = relationship.parent_resource(self.name.clone());
        let name = relationship.name.clone();

        if RESERVED_RELATIONSHIP_NAMES.contains(&name.as_str()) {
            self.warn(format!(
                "[NAME COLLISION] `{name}` is a reserved relationship name in {}.",
                self.resource_name()
            ));
        }

        let foreign_key = relationship.foreign_key_name();
        self.readers
            .entry(relationship.records_accessor_name())
            .or_insert_with(|| Reader::RelatedRecords(name.clone()));
        self.readers
            .entry(foreign_key.clone())
            .or_insert_with(|| Reader::ForeignKey(name.clone()));
        // The related record owns the key: link through the relationship.
        if !relationship.is_to_one() || relationship.belongs_to() {
            self.writers
                .entry(foreign_key)
                .or_insert_with(|| Writer::ForeignKey(name.clone()));
        }
        self.readers
            .entry(name.clone())
            .or_insert_with(|| Reader::Related(name.clone()));

        self.relationships.insert(name, relationship);
    }

    fn check_reserved_resource_type(&mut self) {
        if RESERVED_RESOURCE_TYPES.contains(&self.type_name.as_str()) {
            self.warn(format!(
                "[NAME COLLISION] `{}` is a reserved resource name.",
                self.resource_name()
            ));
        }
    }

    fn warn(&mut self, message: String) {
        tracing::warn!(resource = %self.name, "{message}");
        self.warnings.push(message);
    }

    // ========================================================================
    // Registry resolution
    // ========================================================================

    pub(crate) fn resolve(
        &mut self,
        primary_key: Option<String>,
        default_key_type: &KeyType,
        model_resolved: bool,
    ) {
        if self.primary_key.is_none() {
            self.primary_key = primary_key;
        }
        if self.key_type.is_none() {
            self.key_type = Some(default_key_type.clone());
        }
        self.model_resolved = model_resolved;
        if !model_resolved {
            self.warn(format!(
                "[MODEL NOT FOUND] Model could not be found for {}. If this a base Resource declare it as abstract.",
                self.resource_name()
            ));
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Normalised resource name (`post`, `my_module/related`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class-style resource name (`PostResource`).
    pub fn resource_name(&self) -> String {
        format!("{}Resource", inflect::camelize(&self.name))
    }

    /// Pluralised type name (`posts`).
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Namespace prefix of the resource (`my_module/`, or empty).
    pub fn module_path(&self) -> &str {
        match self.name.rfind('/') {
            Some(idx) => &self.name[..=idx],
            None => "",
        }
    }

    /// Backing model name; empty for abstract resources.
    pub fn model_name(&self) -> String {
        if self.is_abstract {
            return String::new();
        }
        self.model_name
            .clone()
            .unwrap_or_else(|| inflect::camelize(inflect::demodulize(&self.name)))
    }

    /// Whether the registry found a model for this resource.
    pub fn model_resolved(&self) -> bool {
        self.model_resolved
    }

    /// Primary key field.
    pub fn primary_key(&self) -> &str {
        self.primary_key.as_deref().unwrap_or("id")
    }

    /// Key type used by [`ResourceDefinition::verify_key`].
    pub fn key_type(&self) -> &KeyType {
        self.key_type.as_ref().unwrap_or(&DEFAULT_KEY_TYPE)
    }

    /// Foreign key name other resources use to point at this one
    /// (`post_id`).
    pub fn as_parent_key(&self) -> String {
        format!("{}_id", inflect::singularize(&self.type_name))
    }

    /// Whether the resource is abstract.
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Whether the resource is immutable.
    pub fn is_immutable(&self) -> bool {
        self.immutable
    }

    /// Fail with `ImmutableResource` if mutation is not allowed.
    pub fn ensure_mutable(&self) -> Result<()> {
        if self.immutable {
            return Err(Error::ImmutableResource(self.resource_name()));
        }
        Ok(())
    }

    /// Declared attributes.
    pub fn attribute_map(&self) -> &BTreeMap<String, AttributeOptions> {
        &self.attributes
    }

    /// Options of one attribute.
    pub fn attribute_options(&self, name: &str) -> Option<&AttributeOptions> {
        self.attributes.get(name)
    }

    /// Declared relationships.
    pub fn relationships(&self) -> &BTreeMap<String, RelationshipDef> {
        &self.relationships
    }

    /// Look up a relationship by name.
    pub fn relationship_def(&self, name: &str) -> Result<&RelationshipDef> {
        self.relationships
            .get(name)
            .ok_or_else(|| Error::unknown_relationship(self.resource_name(), name))
    }

    /// Model hint table (underscored model name to resource type).
    pub fn model_hints(&self) -> &BTreeMap<String, String> {
        &self.model_hints
    }

    /// Callback chains.
    pub fn callbacks(&self) -> &Callbacks {
        &self.callbacks
    }

    /// Reader entry for `name`.
    pub fn reader(&self, name: &str) -> Option<&Reader> {
        self.readers.get(name)
    }

    /// Writer entry for `name`.
    pub fn writer(&self, name: &str) -> Option<&Writer> {
        self.writers.get(name)
    }

    pub(crate) fn records_for_override(&self) -> Option<&RecordsForFn> {
        self.records_for.as_ref()
    }

    pub(crate) fn find_by_key_override(&self) -> Option<&FindByKeyFn> {
        self.find_by_key.as_ref()
    }

    /// Warnings raised while the definition was built.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    // ========================================================================
    // Keys and fields
    // ========================================================================

    /// Verify and normalise a key for this resource.
    pub fn verify_key(&self, key: &Value, context: &Context) -> Result<Value> {
        self.key_type().verify(key, context)
    }

    /// Verify and normalise several keys.
    pub fn verify_keys(&self, keys: &[Value], context: &Context) -> Result<Vec<Value>> {
        self.key_type().verify_all(keys, context)
    }

    /// Resource type for records of `model` (`MyModule::Thing`), via the
    /// hint table or the last segment of the model name.
    pub fn resource_type_for(&self, model: &str) -> String {
        let model = inflect::underscore(model);
        match self.model_hints.get(&model) {
            Some(resource_type) => resource_type.clone(),
            None => inflect::demodulize(&model).to_string(),
        }
    }

    /// Relationship names followed by attribute names.
    pub fn fields(&self) -> Vec<String> {
        let mut fields: Vec<String> = self.relationships.keys().cloned().collect();
        for name in self.attributes.keys() {
            if !fields.contains(name) {
                fields.push(name.clone());
            }
        }
        fields
    }

    /// Fields accepted on update: everything but `id`.
    pub fn updatable_fields(&self, context: &Context) -> Vec<String> {
        let fields = self.fields().into_iter().filter(|f| f != "id").collect();
        self.apply_filter(FieldList::Updatable, fields, context)
    }

    /// Fields accepted on create.
    pub fn creatable_fields(&self, context: &Context) -> Vec<String> {
        self.apply_filter(FieldList::Creatable, self.fields(), context)
    }

    /// Fields usable as sort keys: the attributes.
    pub fn sortable_fields(&self, context: &Context) -> Vec<String> {
        let fields = self.attributes.keys().cloned().collect();
        self.apply_filter(FieldList::Sortable, fields, context)
    }

    // ========================================================================
    // Record pipeline
    // ========================================================================

    /// Preload stage; identity unless overridden.
    pub fn apply_includes(&self, records: Association, context: &Context) -> Result<Association> {
        self.apply_stage(RecordStage::Includes, records, context)
    }

    /// Filter stage; identity unless overridden.
    pub fn apply_filters(&self, records: Association, context: &Context) -> Result<Association> {
        self.apply_stage(RecordStage::Filters, records, context)
    }

    /// Sort stage; identity unless overridden.
    pub fn apply_sort(&self, records: Association, context: &Context) -> Result<Association> {
        self.apply_stage(RecordStage::Sort, records, context)
    }

    /// Pagination stage; identity unless overridden.
    pub fn apply_pagination(&self, records: Association, context: &Context) -> Result<Association> {
        self.apply_stage(RecordStage::Pagination, records, context)
    }

    /// Run every stage in [`RecordStage::ALL`] order.
    pub fn apply_record_stages(
        &self,
        mut records: Association,
        context: &Context,
    ) -> Result<Association> {
        for stage in RecordStage::ALL {
            records = self.apply_stage(stage, records, context)?;
        }
        Ok(records)
    }

    fn apply_stage(
        &self,
        stage: RecordStage,
        records: Association,
        context: &Context,
    ) -> Result<Association> {
        match self.record_stages.get(&stage) {
            Some(apply) => {
                tracing::trace!(resource = %self.name, ?stage, "Applying record stage");
                apply(records, context)
            }
            None => Ok(records),
        }
    }

    fn apply_filter(&self, list: FieldList, fields: Vec<String>, context: &Context) -> Vec<String> {
        match self.field_filters.get(&list) {
            Some(filter) => filter(fields, context),
            None => fields,
        }
    }
}
