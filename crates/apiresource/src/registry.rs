//! Resource registry.
//!
//! Definitions are collected in a [`RegistryBuilder`] at start-up and
//! frozen into a [`ResourceRegistry`] by [`RegistryBuilder::build`]. The
//! registry is shared read-only through `Arc` while requests are served.

use crate::definition::ResourceDefinition;
use crate::resource::Resource;
use apiresource_core::{Context, Error, KeyType, RecordHandle, RecordStore, Result, Value, inflect};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Registry-wide configuration.
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    /// Key type for definitions that do not set one.
    pub default_key_type: KeyType,
    /// Fail `build()` when a non-abstract resource has no model, instead
    /// of logging and failing when the resource is instantiated.
    pub strict_models: bool,
}

impl RegistryConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default key type.
    #[must_use]
    pub fn default_key_type(mut self, key_type: KeyType) -> Self {
        self.default_key_type = key_type;
        self
    }

    /// Enable or disable strict model resolution.
    #[must_use]
    pub fn strict_models(mut self, strict: bool) -> Self {
        self.strict_models = strict;
        self
    }
}

/// Collects resource definitions before the registry is frozen.
pub struct RegistryBuilder {
    store: Arc<dyn RecordStore>,
    config: RegistryConfig,
    definitions: BTreeMap<String, ResourceDefinition>,
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("config", &self.config)
            .field("definitions", &self.definitions.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl RegistryBuilder {
    /// Start a registry backed by `store`.
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            config: RegistryConfig::default(),
            definitions: BTreeMap::new(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a definition, replacing one with the same name.
    pub fn define(&mut self, definition: ResourceDefinition) -> &mut Self {
        let name = definition.name().to_string();
        if self.definitions.insert(name.clone(), definition).is_some() {
            tracing::debug!(resource = %name, "Replaced resource definition");
        }
        self
    }

    /// A registered definition.
    pub fn get(&self, name: &str) -> Option<&ResourceDefinition> {
        self.definitions.get(&normalize_name(name))
    }

    /// Derive a subclass of a registered definition. The result still has
    /// to be passed to [`RegistryBuilder::define`].
    pub fn inherit(&self, parent: &str, name: &str) -> Result<ResourceDefinition> {
        self.get(parent)
            .map(|definition| definition.inherit(name))
            .ok_or_else(|| Error::ResourceNotFound {
                type_name: parent.to_string(),
                resource_name: normalize_name(parent),
            })
    }

    /// Resolve models, primary keys and key types, and freeze the registry.
    ///
    /// A non-abstract resource without a model is logged and fails only when
    /// instantiated, unless [`RegistryConfig::strict_models`] is set.
    #[tracing::instrument(level = "debug", skip(self), fields(definitions = self.definitions.len()))]
    pub fn build(self) -> Result<Arc<ResourceRegistry>> {
        let mut definitions = BTreeMap::new();

        for (name, mut definition) in self.definitions {
            if definition.is_abstract() {
                definition.resolve(None, &self.config.default_key_type, true);
            } else {
                let model = definition.model_name();
                let found = self.store.has_model(&model);
                if !found && self.config.strict_models {
                    return Err(Error::ModelNotFound {
                        resource: definition.resource_name(),
                        model,
                    });
                }
                let primary_key = if found {
                    self.store.primary_key(&model)
                } else {
                    None
                };
                definition.resolve(primary_key, &self.config.default_key_type, found);
            }
            definitions.insert(name, Arc::new(definition));
        }

        tracing::debug!(count = definitions.len(), "Resource registry built");
        Ok(Arc::new(ResourceRegistry {
            store: self.store,
            definitions,
        }))
    }
}

fn normalize_name(name: &str) -> String {
    let underscored = inflect::underscore(name);
    underscored
        .strip_suffix("_resource")
        .unwrap_or(&underscored)
        .to_string()
}

/// Frozen set of resource definitions plus the record store.
pub struct ResourceRegistry {
    store: Arc<dyn RecordStore>,
    definitions: BTreeMap<String, Arc<ResourceDefinition>>,
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("definitions", &self.definitions.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl ResourceRegistry {
    /// The record store.
    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }

    /// Names of all registered resources.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Definition registered under a resource name (`post`,
    /// `MyModule::Related`, `PostResource`).
    pub fn definition(&self, name: &str) -> Result<Arc<ResourceDefinition>> {
        let resource_name = normalize_name(name);
        self.definitions
            .get(&resource_name)
            .cloned()
            .ok_or_else(|| Error::ResourceNotFound {
                type_name: name.to_string(),
                resource_name,
            })
    }

    /// Resolve a resource type (`people`, `my_module/related`) as seen
    /// from `module_path`.
    ///
    /// Types without a `/` are looked up inside `module_path`; explicit
    /// paths are used as given.
    pub fn resource_for(&self, type_name: &str, module_path: &str) -> Result<Arc<ResourceDefinition>> {
        let with_module = if type_name.contains('/') {
            type_name.to_string()
        } else {
            format!("{module_path}{type_name}")
        };
        let resource_name = inflect::singularize(&inflect::underscore(&with_module));

        match self.definitions.get(&resource_name) {
            Some(definition) => Ok(Arc::clone(definition)),
            None => {
                tracing::debug!(type_name, module_path, %resource_name, "Resource lookup failed");
                Err(Error::ResourceNotFound {
                    type_name: type_name.to_string(),
                    resource_name,
                })
            }
        }
    }

    /// Resolve the resource for a record, as seen from `from`: model hints
    /// of `from` first, then the record's model name.
    pub fn resource_for_model(
        &self,
        from: &ResourceDefinition,
        record: &RecordHandle,
    ) -> Result<Arc<ResourceDefinition>> {
        let resource_type = from.resource_type_for(&record.model_name());
        self.resource_for(&resource_type, from.module_path())
    }

    /// Related resource of a non-polymorphic relationship declared on
    /// `from`.
    pub fn related_definition(
        &self,
        from: &ResourceDefinition,
        relationship: &str,
    ) -> Result<Arc<ResourceDefinition>> {
        let relationship = from.relationship_def(relationship)?;
        self.resource_for(&relationship.related_type(), from.module_path())
    }

    fn instantiable(definition: &ResourceDefinition) -> Result<()> {
        if definition.is_abstract() {
            return Err(Error::AbstractResource(definition.resource_name()));
        }
        if !definition.model_resolved() {
            return Err(Error::ModelNotFound {
                resource: definition.resource_name(),
                model: definition.model_name(),
            });
        }
        Ok(())
    }

    /// Wrap an existing record.
    pub fn instantiate(
        self: &Arc<Self>,
        definition: Arc<ResourceDefinition>,
        record: RecordHandle,
        context: Context,
    ) -> Result<Resource> {
        Self::instantiable(&definition)?;
        Ok(Resource::new(definition, Arc::clone(self), record, context))
    }

    /// Build a resource around a new, unsaved record.
    #[tracing::instrument(level = "debug", skip(self, context))]
    pub fn create(self: &Arc<Self>, name: &str, context: Context) -> Result<Resource> {
        let definition = self.definition(name)?;
        Self::instantiable(&definition)?;
        let record = self.store.build(&definition.model_name())?;
        Ok(Resource::new(definition, Arc::clone(self), record, context))
    }

    /// Find a resource by key.
    ///
    /// The key is handed to the store as given; request layers verify
    /// keys with [`ResourceDefinition::verify_key`] first.
    pub fn find_by_key(
        self: &Arc<Self>,
        name: &str,
        key: &Value,
        context: Context,
    ) -> Result<Resource> {
        let definition = self.definition(name)?;
        self.find_with(definition, key, context)
    }

    pub(crate) fn find_with(
        self: &Arc<Self>,
        definition: Arc<ResourceDefinition>,
        key: &Value,
        context: Context,
    ) -> Result<Resource> {
        Self::instantiable(&definition)?;
        let found = match definition.find_by_key_override() {
            Some(finder) => finder(self.store.as_ref(), key, &context)?,
            None => self.store.find_by_key(
                &definition.model_name(),
                definition.primary_key(),
                key,
                &context,
            )?,
        };

        match found {
            Some(record) => Ok(Resource::new(definition, Arc::clone(self), record, context)),
            None => {
                tracing::debug!(resource = %definition.name(), key = %key, "Record not found");
                Err(Error::RecordNotFound { key: key.clone() })
            }
        }
    }
}
