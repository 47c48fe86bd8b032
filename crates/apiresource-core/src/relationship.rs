//! Relationship metadata.
//!
//! A [`RelationshipDef`] is declarative: it names the relationship, its
//! cardinality and how the link is stored. Everything else (foreign key
//! name, related resource name, relation name for a request) is derived
//! from it at the point of use.

use crate::context::Context;
use crate::inflect;
use std::fmt;
use std::sync::Arc;

/// Cardinality of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// At most one related resource (`has_one`).
    One,
    /// A sequence of related resources (`has_many`).
    Many,
}

/// Which side of a to-one relationship stores the foreign key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ForeignKeyOn {
    /// This record holds the key (belongs-to).
    #[default]
    SelfSide,
    /// The related record holds the key.
    Related,
}

/// Context-sensitive relation-name function.
pub type RelationNameFn = Arc<dyn Fn(&Context) -> String + Send + Sync>;

/// Name of the backing association used for a relationship.
#[derive(Clone)]
pub enum RelationName {
    /// The same association for every request.
    Fixed(String),
    /// Chosen per request, e.g. a filtered association for non-admins.
    Dynamic(RelationNameFn),
}

impl RelationName {
    /// Evaluate for a request context. Never cached.
    pub fn resolve(&self, context: &Context) -> String {
        match self {
            RelationName::Fixed(name) => name.clone(),
            RelationName::Dynamic(f) => f(context),
        }
    }
}

impl fmt::Debug for RelationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationName::Fixed(name) => f.debug_tuple("Fixed").field(name).finish(),
            RelationName::Dynamic(_) => write!(f, "Dynamic(<fn>)"),
        }
    }
}

/// A declared relationship between two resource types.
#[derive(Debug, Clone)]
pub struct RelationshipDef {
    /// Relationship name as exposed by the resource.
    pub name: String,
    /// One or many.
    pub cardinality: Cardinality,
    foreign_key: Option<String>,
    class_name: Option<String>,
    /// Related resource type is resolved per record via model hints.
    pub polymorphic: bool,
    /// Belongs-to direction for to-one relationships.
    pub foreign_key_on: ForeignKeyOn,
    relation_name: Option<RelationName>,
    /// Replacement is set-based rather than positional.
    pub acts_as_set: bool,
    /// Name of the resource that declares this relationship.
    pub parent_resource: String,
}

impl RelationshipDef {
    /// Create a relationship with derived defaults.
    #[must_use]
    pub fn new(name: impl Into<String>, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            cardinality,
            foreign_key: None,
            class_name: None,
            polymorphic: false,
            foreign_key_on: ForeignKeyOn::SelfSide,
            relation_name: None,
            acts_as_set: false,
            parent_resource: String::new(),
        }
    }

    /// A to-one relationship.
    #[must_use]
    pub fn to_one(name: impl Into<String>) -> Self {
        Self::new(name, Cardinality::One)
    }

    /// A to-many relationship.
    #[must_use]
    pub fn to_many(name: impl Into<String>) -> Self {
        Self::new(name, Cardinality::Many)
    }

    /// Override the foreign key field.
    #[must_use]
    pub fn foreign_key(mut self, key: impl Into<String>) -> Self {
        self.foreign_key = Some(key.into());
        self
    }

    /// Override the related class name (`Person`, `BookComments`).
    #[must_use]
    pub fn class_name(mut self, name: impl Into<String>) -> Self {
        self.class_name = Some(name.into());
        self
    }

    /// Mark the relationship polymorphic.
    #[must_use]
    pub const fn polymorphic(mut self, value: bool) -> Self {
        self.polymorphic = value;
        self
    }

    /// Set which side stores the foreign key.
    #[must_use]
    pub const fn foreign_key_on(mut self, side: ForeignKeyOn) -> Self {
        self.foreign_key_on = side;
        self
    }

    /// Use a fixed backing association name.
    #[must_use]
    pub fn relation_name(mut self, name: impl Into<String>) -> Self {
        self.relation_name = Some(RelationName::Fixed(name.into()));
        self
    }

    /// Choose the backing association per request.
    #[must_use]
    pub fn relation_name_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&Context) -> String + Send + Sync + 'static,
    {
        self.relation_name = Some(RelationName::Dynamic(Arc::new(f)));
        self
    }

    /// Set-based replacement semantics.
    #[must_use]
    pub const fn acts_as_set(mut self, value: bool) -> Self {
        self.acts_as_set = value;
        self
    }

    /// Bind the relationship to its declaring resource.
    #[must_use]
    pub fn parent_resource(mut self, resource: impl Into<String>) -> Self {
        self.parent_resource = resource.into();
        self
    }

    /// Is this a to-one relationship?
    pub const fn is_to_one(&self) -> bool {
        matches!(self.cardinality, Cardinality::One)
    }

    /// Does this record hold the foreign key of a to-one relationship?
    pub const fn belongs_to(&self) -> bool {
        self.is_to_one() && matches!(self.foreign_key_on, ForeignKeyOn::SelfSide)
    }

    /// Foreign key field: `<name>_id` for to-one, `<singular>_ids` for
    /// to-many, unless overridden.
    pub fn foreign_key_name(&self) -> String {
        if let Some(key) = &self.foreign_key {
            return key.clone();
        }
        match self.cardinality {
            Cardinality::One => format!("{}_id", self.name),
            Cardinality::Many => format!("{}_ids", inflect::singularize(&self.name)),
        }
    }

    /// Polymorphic type discriminator field, `<name>_type`.
    pub fn polymorphic_type(&self) -> String {
        format!("{}_type", self.name)
    }

    /// Related class name, explicit or derived from the relationship name.
    pub fn class_name_or_default(&self) -> String {
        match (&self.class_name, self.cardinality) {
            (Some(name), _) => name.clone(),
            (None, Cardinality::One) => inflect::camelize(&self.name),
            (None, Cardinality::Many) => inflect::camelize(&inflect::singularize(&self.name)),
        }
    }

    /// Type name used to look up the related resource (`person`,
    /// `book_comments`).
    pub fn related_type(&self) -> String {
        inflect::underscore(&self.class_name_or_default())
    }

    /// Backing association name for a request context.
    pub fn relation_name_for(&self, context: &Context) -> String {
        self.relation_name
            .as_ref()
            .map_or_else(|| self.name.clone(), |name| name.resolve(context))
    }

    /// Name of the generated related-records accessor.
    pub fn records_accessor_name(&self) -> String {
        match self.cardinality {
            Cardinality::One => format!("record_for_{}", self.name),
            Cardinality::Many => format!("records_for_{}", self.name),
        }
    }
}
