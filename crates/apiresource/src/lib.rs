//! apiresource - declarative API resources over backing records.
//!
//! Resources expose backing records (rows, documents) as typed API
//! resources with attributes, to-one/to-many relationships, lifecycle
//! callbacks and field-level mutation:
//!
//! - Declarative resource definitions with a static accessor table
//! - Key verification (integer, string, UUID or custom)
//! - Nested changes coalesced into a single save
//! - Before/after/around callbacks per lifecycle event
//! - Field replacement from generic attribute/relationship payloads
//!
//! Persistence is delegated to an application-provided [`RecordStore`].
//!
//! # Quick Start
//!
//! ```ignore
//! use apiresource::prelude::*;
//!
//! let mut builder = RegistryBuilder::new(store);
//! builder
//!     .define(
//!         ResourceDefinition::new("person")
//!             .attributes(&["name", "email"], AttributeOptions::new())
//!             .has_many("comments"),
//!     )
//!     .define(
//!         ResourceDefinition::new("post")
//!             .attribute("title", AttributeOptions::new())
//!             .relationship(RelationshipDef::to_one("author").class_name("Person"))
//!             .has_many("tags")
//!             .before(CallbackKind::Save, |post| {
//!                 tracing::info!(id = %post.id()?, "saving post");
//!                 Ok(())
//!             }),
//!     );
//! let registry = builder.build()?;
//!
//! let mut post = registry.find_by_key("post", &Value::Int(1), Context::new())?;
//! let payload = FieldPayload::new()
//!     .attribute("title", "New title")
//!     .to_one("author", Value::Null);
//! assert_eq!(post.replace_fields(&payload)?, ChangeStatus::Completed);
//! ```

pub use apiresource_core::{
    Association, AttributeOptions, Cardinality, Context, Error, ErrorMessages, ForeignKeyOn,
    KeyType, Record, RecordHandle, RecordStore, RelationName, RelationshipDef, Result,
    ValidationErrors, Value, inflect,
};

pub mod callbacks;
pub mod definition;
pub mod fields;
pub mod registry;
mod relationships;
pub mod resource;

pub use callbacks::{CallbackChain, CallbackKind, Callbacks, Continuation};
pub use definition::{FieldList, Reader, RecordStage, ResourceDefinition, Writer};
pub use fields::{FieldPayload, ToOneValue};
pub use registry::{RegistryBuilder, RegistryConfig, ResourceRegistry};
pub use resource::{ChangePhase, ChangeStatus, Output, Resource};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use apiresource::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Association,
        AttributeOptions,
        // Callbacks
        CallbackKind,
        ChangeStatus,
        Context,
        Error,
        // Field replacement
        FieldPayload,
        ForeignKeyOn,
        KeyType,
        RecordStage,
        // Persistence seam
        Record,
        RecordHandle,
        RecordStore,
        // Registry
        RegistryBuilder,
        RegistryConfig,
        RelationshipDef,
        Resource,
        ResourceDefinition,
        ResourceRegistry,
        Result,
        ToOneValue,
        Value,
    };
}
