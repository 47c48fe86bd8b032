//! Field replacement: applying a generic patch payload to a resource.

use crate::callbacks::CallbackKind;
use crate::resource::{ChangeStatus, Resource};
use apiresource_core::{Error, Result, Value};
use serde::Deserialize;

/// New value of a to-one relationship.
#[derive(Debug, Clone, PartialEq)]
pub enum ToOneValue {
    /// Unlink.
    Clear,
    /// Link to the record with this key.
    Key(Value),
    /// Link a polymorphic relationship to a key of a given type.
    Polymorphic {
        /// Related key
        id: Value,
        /// Resource type of the related record (`people`)
        type_name: String,
    },
}

/// Generic attribute / to-one / to-many patch.
///
/// Entries are applied in the order they were added: attributes first,
/// then to-one, then to-many relationships.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPayload {
    /// Attribute values, applied through the attribute writers.
    pub attributes: Vec<(String, Value)>,
    /// To-one link replacements.
    pub to_one: Vec<(String, ToOneValue)>,
    /// To-many link set replacements.
    pub to_many: Vec<(String, Vec<Value>)>,
}

#[derive(Deserialize)]
struct RawPayload {
    #[serde(default)]
    attributes: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    to_one: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    to_many: serde_json::Map<String, serde_json::Value>,
}

impl FieldPayload {
    /// Empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute.
    #[must_use]
    pub fn attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Link a to-one relationship; a null key clears it.
    #[must_use]
    pub fn to_one(mut self, name: impl Into<String>, key: impl Into<Value>) -> Self {
        let key = key.into();
        let value = if key.is_null() {
            ToOneValue::Clear
        } else {
            ToOneValue::Key(key)
        };
        self.to_one.push((name.into(), value));
        self
    }

    /// Link a polymorphic to-one relationship.
    #[must_use]
    pub fn polymorphic_to_one(
        mut self,
        name: impl Into<String>,
        id: impl Into<Value>,
        type_name: impl Into<String>,
    ) -> Self {
        self.to_one.push((
            name.into(),
            ToOneValue::Polymorphic {
                id: id.into(),
                type_name: type_name.into(),
            },
        ));
        self
    }

    /// Replace a to-many link set.
    #[must_use]
    pub fn to_many(mut self, name: impl Into<String>, keys: Vec<Value>) -> Self {
        self.to_many.push((name.into(), keys));
        self
    }

    /// Whether the payload carries no entries.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.to_one.is_empty() && self.to_many.is_empty()
    }

    /// Parse a `{"attributes": {..}, "to_one": {..}, "to_many": {..}}`
    /// document. Every section is optional.
    ///
    /// To-one entries are `null` (clear), a scalar key, or an object with
    /// `id` and `type` (polymorphic). Entries within a section keep their
    /// document order.
    pub fn from_json(document: &serde_json::Value) -> Result<Self> {
        let raw: RawPayload = serde_json::from_value(document.clone())
            .map_err(|e| Error::InvalidArgument(format!("malformed field payload: {e}")))?;

        let mut payload = FieldPayload::new();
        for (name, value) in raw.attributes {
            payload.attributes.push((name, Value::from(value)));
        }

        for (name, value) in raw.to_one {
            let entry = match value {
                serde_json::Value::Null => ToOneValue::Clear,
                serde_json::Value::Object(map) => {
                    let id = map.get("id").cloned().map(Value::from);
                    let type_name = map.get("type").and_then(|t| t.as_str()).map(str::to_string);
                    match (id, type_name) {
                        (Some(id), Some(type_name)) => ToOneValue::Polymorphic { id, type_name },
                        _ => {
                            return Err(Error::InvalidArgument(format!(
                                "to-one `{name}` must carry both `id` and `type`"
                            )));
                        }
                    }
                }
                scalar => ToOneValue::Key(Value::from(scalar)),
            };
            payload.to_one.push((name, entry));
        }

        for (name, value) in raw.to_many {
            let keys = match value {
                serde_json::Value::Array(items) => items.into_iter().map(Value::from).collect(),
                _ => {
                    return Err(Error::InvalidArgument(format!(
                        "to-many `{name}` must be an array of keys"
                    )));
                }
            };
            payload.to_many.push((name, keys));
        }

        Ok(payload)
    }
}

impl Resource {
    /// Apply a field payload as one `ReplaceFields` change.
    ///
    /// Each relationship entry runs as a nested change, so the whole
    /// payload is persisted by a single save. A writer rejecting a value
    /// with `InvalidArgument` is reported as `InvalidFieldValue` for that
    /// attribute; other errors pass through unchanged.
    #[tracing::instrument(level = "debug", skip(self, payload), fields(resource = %self.definition.name()))]
    pub fn replace_fields(&mut self, payload: &FieldPayload) -> Result<ChangeStatus> {
        self.change(CallbackKind::ReplaceFields, |r| r.apply_fields(payload))
    }

    fn apply_fields(&mut self, payload: &FieldPayload) -> Result<ChangeStatus> {
        for (attribute, value) in &payload.attributes {
            match self.set(attribute, value.clone()) {
                Ok(()) => self.save_needed = true,
                Err(Error::InvalidArgument(reason)) => {
                    tracing::debug!(attribute = %attribute, value = %value, %reason, "Attribute rejected");
                    return Err(Error::invalid_field_value(attribute, value.clone()));
                }
                Err(e) => return Err(e),
            }
        }

        for (relationship, value) in &payload.to_one {
            match value {
                ToOneValue::Clear => self.remove_to_one_link(relationship)?,
                ToOneValue::Key(key) => self.replace_to_one_link(relationship, key.clone())?,
                ToOneValue::Polymorphic { id, type_name } => {
                    self.replace_polymorphic_to_one_link(relationship, id.clone(), type_name)?
                }
            };
        }

        for (relationship, keys) in &payload.to_many {
            self.replace_to_many_links(relationship, keys.clone())?;
        }

        Ok(ChangeStatus::Completed)
    }
}
