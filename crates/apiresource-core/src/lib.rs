//! Core types and traits for apiresource.
//!
//! This crate provides the building blocks the resource engine is made of:
//!
//! - `Value` for dynamically typed field values and keys
//! - `Error` and the validation payload returned to request layers
//! - `Record` / `RecordStore` traits implemented by the persistence layer
//! - `KeyType` verification of externally supplied identifiers
//! - Attribute and relationship metadata
//! - `inflect` naming helpers

pub mod attribute;
pub mod context;
pub mod error;
pub mod inflect;
pub mod key;
pub mod record;
pub mod relationship;
pub mod value;

pub use attribute::{AttributeOptions, DEFAULT_FORMAT};
pub use context::Context;
pub use error::{Error, ErrorMessages, Result, ValidationErrors};
pub use key::{KeyType, KeyVerifierFn, is_uuid};
pub use record::{Association, Record, RecordHandle, RecordStore};
pub use relationship::{
    Cardinality, ForeignKeyOn, RelationName, RelationNameFn, RelationshipDef,
};
pub use value::Value;
