//! In-memory record store and resource fixtures shared by the integration
//! tests.

#![allow(dead_code)]

use apiresource::prelude::*;
use apiresource::{Association, CallbackKind, ErrorMessages, FieldList, inflect};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

// ============================================================================
// Store
// ============================================================================

/// How a model's associations are stored.
#[derive(Debug, Clone)]
pub enum AssocSpec {
    /// Scalar foreign key on this record.
    BelongsTo { foreign_key: String, model: String },
    /// Foreign key plus type discriminator on this record.
    Polymorphic { foreign_key: String, type_field: String },
    /// Explicit member list, optionally writable through an ids field.
    Links {
        ids_field: Option<String>,
        model: String,
        one: bool,
    },
    /// Members of another association whose `field` equals `value`.
    Filtered {
        source: String,
        field: String,
        value: Value,
    },
}

/// Behaviour of `save` for a model.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SaveFailure {
    #[default]
    None,
    /// Refuse without messages.
    Silent,
    /// Refuse and report a base message.
    Message(String),
    /// Signal a concurrent modification.
    Locked(String),
}

#[derive(Debug, Clone)]
pub struct ModelSchema {
    pub primary_key: String,
    pub associations: BTreeMap<String, AssocSpec>,
    pub required: Vec<String>,
    pub enums: BTreeMap<String, Vec<Value>>,
    pub save_failure: SaveFailure,
    pub destroy_fails: bool,
}

impl Default for ModelSchema {
    fn default() -> Self {
        Self {
            primary_key: "id".to_string(),
            associations: BTreeMap::new(),
            required: Vec::new(),
            enums: BTreeMap::new(),
            save_failure: SaveFailure::None,
            destroy_fails: false,
        }
    }
}

impl ModelSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn belongs_to(mut self, relation: &str, model: &str) -> Self {
        self.associations.insert(
            relation.to_string(),
            AssocSpec::BelongsTo {
                foreign_key: format!("{relation}_id"),
                model: model.to_string(),
            },
        );
        self
    }

    pub fn polymorphic(mut self, relation: &str) -> Self {
        self.associations.insert(
            relation.to_string(),
            AssocSpec::Polymorphic {
                foreign_key: format!("{relation}_id"),
                type_field: format!("{relation}_type"),
            },
        );
        self
    }

    pub fn has_many(mut self, relation: &str, model: &str, ids_field: &str) -> Self {
        self.associations.insert(
            relation.to_string(),
            AssocSpec::Links {
                ids_field: Some(ids_field.to_string()),
                model: model.to_string(),
                one: false,
            },
        );
        self
    }

    pub fn has_one(mut self, relation: &str, model: &str) -> Self {
        self.associations.insert(
            relation.to_string(),
            AssocSpec::Links {
                ids_field: None,
                model: model.to_string(),
                one: true,
            },
        );
        self
    }

    pub fn filtered(mut self, relation: &str, source: &str, field: &str, value: Value) -> Self {
        self.associations.insert(
            relation.to_string(),
            AssocSpec::Filtered {
                source: source.to_string(),
                field: field.to_string(),
                value,
            },
        );
        self
    }

    pub fn required(mut self, field: &str) -> Self {
        self.required.push(field.to_string());
        self
    }

    pub fn enumerated(mut self, field: &str, allowed: &[&str]) -> Self {
        self.enums.insert(
            field.to_string(),
            allowed.iter().map(|v| Value::from(*v)).collect(),
        );
        self
    }
}

#[derive(Default)]
struct StoreState {
    schemas: BTreeMap<String, ModelSchema>,
    handles: BTreeMap<u64, RecordHandle>,
    ids: BTreeMap<(String, String), u64>,
    next_token: u64,
    next_id: i64,
    saves: usize,
}

type SharedState = Arc<Mutex<StoreState>>;

fn lock(state: &SharedState) -> MutexGuard<'_, StoreState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

fn lookup(state: &SharedState, model: &str, key: &Value) -> Option<RecordHandle> {
    let state = lock(state);
    state
        .ids
        .get(&(model.to_string(), key.to_string()))
        .and_then(|token| state.handles.get(token))
        .cloned()
}

/// Record store keeping every record in memory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: SharedState,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(&self, name: &str, schema: ModelSchema) -> &Self {
        lock(&self.state).schemas.insert(name.to_string(), schema);
        self
    }

    pub fn update_schema(&self, name: &str, f: impl FnOnce(&mut ModelSchema)) {
        if let Some(schema) = lock(&self.state).schemas.get_mut(name) {
            f(schema);
        }
    }

    /// Insert a persisted record without counting a save.
    pub fn insert(&self, model: &str, fields: &[(&str, Value)]) -> RecordHandle {
        let mut state = lock(&self.state);
        state.next_token += 1;
        let token = state.next_token;
        let primary_key = state
            .schemas
            .get(model)
            .map_or_else(|| "id".to_string(), |s| s.primary_key.clone());

        let mut values: BTreeMap<String, Value> = fields
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect();
        let id = match values.get(&primary_key) {
            Some(id) if !id.is_null() => id.clone(),
            _ => {
                state.next_id += 1;
                Value::Int(state.next_id)
            }
        };
        values.insert(primary_key, id.clone());

        let record = MemoryRecord {
            model: model.to_string(),
            token,
            fields: values,
            links: BTreeMap::new(),
            errors: ErrorMessages::new(),
            state: Arc::clone(&self.state),
        };
        let handle = RecordHandle::new(record);
        state.handles.insert(token, handle.clone());
        state.ids.insert((model.to_string(), id.to_string()), token);
        handle
    }

    /// Add `member` to a link association of `owner`.
    pub fn link(&self, owner: &RecordHandle, relation: &str, member: &RecordHandle) {
        owner
            .with_mut(|r| r.push_association(relation, member))
            .unwrap();
    }

    pub fn save_count(&self) -> usize {
        lock(&self.state).saves
    }

    pub fn exists(&self, model: &str, key: &Value) -> bool {
        lookup(&self.state, model, key).is_some()
    }

    pub fn first(&self, model: &str) -> Option<RecordHandle> {
        let state = lock(&self.state);
        state
            .ids
            .iter()
            .filter(|((m, _), _)| m == model)
            .min_by_key(|((_, id), _)| id.parse::<i64>().unwrap_or(i64::MAX))
            .and_then(|(_, token)| state.handles.get(token))
            .cloned()
    }
}

impl RecordStore for MemoryStore {
    fn has_model(&self, model: &str) -> bool {
        lock(&self.state).schemas.contains_key(model)
    }

    fn primary_key(&self, model: &str) -> Option<String> {
        lock(&self.state)
            .schemas
            .get(model)
            .map(|s| s.primary_key.clone())
    }

    fn build(&self, model: &str) -> Result<RecordHandle> {
        let mut state = lock(&self.state);
        if !state.schemas.contains_key(model) {
            return Err(Error::Store(format!("unknown model {model}")));
        }
        state.next_token += 1;
        let token = state.next_token;
        let handle = RecordHandle::new(MemoryRecord {
            model: model.to_string(),
            token,
            fields: BTreeMap::new(),
            links: BTreeMap::new(),
            errors: ErrorMessages::new(),
            state: Arc::clone(&self.state),
        });
        state.handles.insert(token, handle.clone());
        Ok(handle)
    }

    fn find_by_key(
        &self,
        model: &str,
        _primary_key: &str,
        key: &Value,
        _context: &Context,
    ) -> Result<Option<RecordHandle>> {
        Ok(lookup(&self.state, model, key))
    }
}

/// One in-memory record.
pub struct MemoryRecord {
    model: String,
    token: u64,
    fields: BTreeMap<String, Value>,
    links: BTreeMap<String, Vec<RecordHandle>>,
    errors: ErrorMessages,
    state: SharedState,
}

impl MemoryRecord {
    fn schema(&self) -> ModelSchema {
        lock(&self.state)
            .schemas
            .get(&self.model)
            .cloned()
            .unwrap_or_default()
    }

    fn spec(&self, relation: &str) -> Result<AssocSpec> {
        self.schema()
            .associations
            .get(relation)
            .cloned()
            .ok_or_else(|| Error::Store(format!("{} has no association {relation}", self.model)))
    }

    fn member_key(member: &RecordHandle, state: &SharedState) -> Result<Value> {
        let model = member.model_name();
        let primary_key = lock(state)
            .schemas
            .get(&model)
            .map_or_else(|| "id".to_string(), |s| s.primary_key.clone());
        member.read(&primary_key)
    }
}

impl Record for MemoryRecord {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn read(&self, field: &str) -> Result<Value> {
        Ok(self.fields.get(field).cloned().unwrap_or(Value::Null))
    }

    fn write(&mut self, field: &str, value: Value) -> Result<()> {
        let schema = self.schema();
        if let Some(allowed) = schema.enums.get(field) {
            if !value.is_null() && !allowed.contains(&value) {
                return Err(Error::InvalidArgument(format!(
                    "'{value}' is not a valid {field}"
                )));
            }
        }

        for (relation, spec) in &schema.associations {
            if let AssocSpec::Links {
                ids_field: Some(ids_field),
                model,
                ..
            } = spec
            {
                if ids_field == field {
                    let keys = match &value {
                        Value::Array(keys) => keys.clone(),
                        Value::Null => Vec::new(),
                        other => vec![other.clone()],
                    };
                    let mut members = Vec::with_capacity(keys.len());
                    for key in keys {
                        let member = lookup(&self.state, model, &key)
                            .ok_or(Error::RecordNotFound { key })?;
                        members.push(member);
                    }
                    self.links.insert(relation.clone(), members);
                    return Ok(());
                }
            }
        }

        self.fields.insert(field.to_string(), value);
        Ok(())
    }

    fn validate(&mut self) -> bool {
        self.errors.clear();
        for field in self.schema().required {
            if self.fields.get(&field).is_none_or(Value::is_null) {
                self.errors
                    .entry(field)
                    .or_default()
                    .push("can't be blank".to_string());
            }
        }
        self.errors.is_empty()
    }

    fn error_messages(&self) -> ErrorMessages {
        self.errors.clone()
    }

    fn save(&mut self) -> Result<bool> {
        let schema = self.schema();
        match schema.save_failure {
            SaveFailure::None => {}
            SaveFailure::Silent => return Ok(false),
            SaveFailure::Message(message) => {
                self.errors.entry("base".to_string()).or_default().push(message);
                return Ok(false);
            }
            SaveFailure::Locked(message) => return Err(Error::RecordLocked { message }),
        }

        let mut state = lock(&self.state);
        let id = match self.fields.get(&schema.primary_key) {
            Some(id) if !id.is_null() => id.clone(),
            _ => {
                state.next_id += 1;
                Value::Int(state.next_id)
            }
        };
        self.fields.insert(schema.primary_key.clone(), id.clone());
        state
            .ids
            .insert((self.model.clone(), id.to_string()), self.token);
        state.saves += 1;
        Ok(true)
    }

    fn destroy(&mut self) -> Result<bool> {
        let schema = self.schema();
        if schema.destroy_fails {
            return Ok(false);
        }
        let id = self.read(&schema.primary_key)?;
        lock(&self.state)
            .ids
            .remove(&(self.model.clone(), id.to_string()));
        Ok(true)
    }

    fn association(&self, relation: &str) -> Result<Association> {
        match self.spec(relation)? {
            AssocSpec::BelongsTo { foreign_key, model } => {
                let key = self.read(&foreign_key)?;
                if key.is_null() {
                    return Ok(Association::One(None));
                }
                Ok(Association::One(lookup(&self.state, &model, &key)))
            }
            AssocSpec::Polymorphic {
                foreign_key,
                type_field,
            } => {
                let key = self.read(&foreign_key)?;
                let model = self.read(&type_field)?;
                match model.as_str() {
                    Some(model) if !key.is_null() => {
                        Ok(Association::One(lookup(&self.state, model, &key)))
                    }
                    _ => Ok(Association::One(None)),
                }
            }
            AssocSpec::Links { one, .. } => {
                let members = self.links.get(relation).cloned().unwrap_or_default();
                if one {
                    Ok(Association::One(members.into_iter().next()))
                } else {
                    Ok(Association::Many(members))
                }
            }
            AssocSpec::Filtered {
                source,
                field,
                value,
            } => {
                let mut members = Vec::new();
                for member in self.links.get(&source).cloned().unwrap_or_default() {
                    if member.read(&field)? == value {
                        members.push(member);
                    }
                }
                Ok(Association::Many(members))
            }
        }
    }

    fn push_association(&mut self, relation: &str, record: &RecordHandle) -> Result<()> {
        let target = match self.spec(relation)? {
            AssocSpec::Links { .. } => relation.to_string(),
            AssocSpec::Filtered { source, .. } => source,
            _ => {
                return Err(Error::Store(format!(
                    "{relation} is not a collection association"
                )));
            }
        };
        self.links.entry(target).or_default().push(record.clone());
        Ok(())
    }

    fn delete_association(&mut self, relation: &str, key: &Value) -> Result<()> {
        let target = match self.spec(relation)? {
            AssocSpec::Links { .. } => relation.to_string(),
            AssocSpec::Filtered { source, .. } => source,
            _ => {
                return Err(Error::Store(format!(
                    "{relation} is not a collection association"
                )));
            }
        };
        let members = self.links.get(&target).cloned().unwrap_or_default();
        let mut kept = Vec::with_capacity(members.len());
        for member in members {
            if Self::member_key(&member, &self.state)? != *key {
                kept.push(member);
            }
        }
        self.links.insert(target, kept);
        Ok(())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// Shared log that callbacks append to.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn logger(log: EventLog, event: &'static str) -> impl Fn(&mut Resource) -> Result<()> + Send + Sync + 'static {
    move |_| {
        log.lock().unwrap().push(event.to_string());
        Ok(())
    }
}

/// Store with the schemas used by the fixtures.
pub fn store() -> MemoryStore {
    inflect::add_uncountable("preferences");
    let store = MemoryStore::new();
    store
        .model(
            "Person",
            ModelSchema::new()
                .has_many("comments", "Comment", "comment_ids")
                .has_many("posts", "Post", "post_ids")
                .has_many("vehicles", "Vehicle", "vehicle_ids")
                .has_many("related", "Comment", "related_ids")
                .has_one("preferences", "Preferences")
                .belongs_to("hair_cut", "HairCut"),
        )
        .model(
            "Post",
            ModelSchema::new()
                .required("title")
                .belongs_to("author", "Person")
                .belongs_to("section", "Section")
                .has_many("tags", "Tag", "tag_ids")
                .has_many("comments", "Comment", "comment_ids"),
        )
        .model(
            "Comment",
            ModelSchema::new()
                .belongs_to("post", "Post")
                .belongs_to("author", "Person")
                .has_many("tags", "Tag", "tag_ids"),
        )
        .model("Tag", ModelSchema::new().has_many("posts", "Post", "post_ids"))
        .model("Section", ModelSchema::new())
        .model("HairCut", ModelSchema::new())
        .model("Preferences", ModelSchema::new().has_one("author", "Person"))
        .model("Car", ModelSchema::new())
        .model("Boat", ModelSchema::new())
        .model("Picture", ModelSchema::new().polymorphic("imageable"))
        .model("Document", ModelSchema::new())
        .model(
            "Book",
            ModelSchema::new()
                .has_many("book_comments", "BookComment", "book_comment_ids")
                .filtered(
                    "approved_book_comments",
                    "book_comments",
                    "approved",
                    Value::Bool(true),
                ),
        )
        .model("BookComment", ModelSchema::new().belongs_to("book", "Book"))
        .model(
            "Cat",
            ModelSchema::new()
                .enumerated("breed", &["persian", "siamese", "sphinx"])
                .belongs_to("mother", "Cat")
                .belongs_to("father", "Cat"),
        )
        .model("Company", ModelSchema::new());
    store
}

/// Registry over [`store`] with the fixture resources. Callbacks on `post`
/// append to `log`.
pub fn registry(store: &MemoryStore, log: &EventLog) -> Arc<ResourceRegistry> {
    let mut builder = RegistryBuilder::new(Arc::new(store.clone()));

    let base = ResourceDefinition::new("BaseResource").abstract_resource();
    let person = base
        .inherit("PersonResource")
        .attributes(&["name", "email"], AttributeOptions::new())
        .attribute(
            "date_joined",
            AttributeOptions::new().format("date_with_timezone"),
        )
        .has_many("comments")
        .has_many("posts")
        .relationship(RelationshipDef::to_many("vehicles").polymorphic(true))
        .relationship(
            RelationshipDef::to_one("preferences").foreign_key_on(ForeignKeyOn::Related),
        )
        .has_one("hair_cut");
    let special_base = ResourceDefinition::new("SpecialBaseResource")
        .abstract_resource()
        .model_hint("Person", "special_person");
    let special_person = special_base
        .inherit("SpecialPersonResource")
        .with_model_name("Person");

    let post = ResourceDefinition::new("PostResource")
        .attribute("title", AttributeOptions::new())
        .attribute("body", AttributeOptions::new())
        .attribute("subject", AttributeOptions::new())
        .relationship(RelationshipDef::to_one("author").class_name("Person"))
        .has_one("section")
        .relationship(RelationshipDef::to_many("tags").acts_as_set(true))
        .relationship(RelationshipDef::to_many("comments").acts_as_set(false))
        .with_primary_key("id")
        .getter("subject", |post| post.record().read("title"))
        .setter("title", |post, title| {
            post.record().write("title", title.clone())?;
            if title == Value::from("BOOM") {
                return Err(Error::Store(
                    "The Server just tested going boom.".to_string(),
                ));
            }
            Ok(())
        })
        .filter_fields(FieldList::Updatable, |fields, _| {
            fields
                .into_iter()
                .filter(|f| f != "author" && f != "subject")
                .collect()
        })
        .before(CallbackKind::Save, logger(Arc::clone(log), "before_save"))
        .after(CallbackKind::Save, logger(Arc::clone(log), "after_save"))
        .before(CallbackKind::Update, logger(Arc::clone(log), "before_update"))
        .after(CallbackKind::Update, logger(Arc::clone(log), "after_update"))
        .before(CallbackKind::Create, logger(Arc::clone(log), "before_create"))
        .after(CallbackKind::Create, logger(Arc::clone(log), "after_create"))
        .before(CallbackKind::ReplaceFields, logger(Arc::clone(log), "before_replace_fields"))
        .after(CallbackKind::ReplaceFields, logger(Arc::clone(log), "after_replace_fields"))
        .before(CallbackKind::RemoveToOneLink, logger(Arc::clone(log), "before_remove_to_one_link"))
        .around(CallbackKind::Update, {
            let log = Arc::clone(log);
            move |post, proceed| {
                log.lock().unwrap().push("around_update_enter".to_string());
                proceed(post)?;
                log.lock().unwrap().push("around_update_exit".to_string());
                Ok(())
            }
        });

    let comment = ResourceDefinition::new("CommentResource")
        .attribute("body", AttributeOptions::new())
        .has_one("post")
        .relationship(RelationshipDef::to_one("author").class_name("Person"))
        .has_many("tags");
    let company = ResourceDefinition::new("CompanyResource")
        .attributes(&["name", "address"], AttributeOptions::new());
    let firm = company.inherit("FirmResource");
    let tag = ResourceDefinition::new("TagResource")
        .attribute("name", AttributeOptions::new())
        .has_many("posts");
    let section = ResourceDefinition::new("SectionResource").attribute("name", AttributeOptions::new());
    let hair_cut = ResourceDefinition::new("HairCutResource").attribute("style", AttributeOptions::new());
    let preferences = ResourceDefinition::new("PreferencesResource")
        .attribute("advanced_mode", AttributeOptions::new())
        .relationship(RelationshipDef::to_one("author").foreign_key_on(ForeignKeyOn::Related))
        .find_by_key({
            let store = store.clone();
            move |_, _, _| Ok(store.first("Preferences"))
        });
    let author = ResourceDefinition::new("AuthorResource")
        .with_model_name("Person")
        .attribute("name", AttributeOptions::new());
    let vehicle = ResourceDefinition::new("VehicleResource")
        .abstract_resource()
        .attributes(&["make", "model"], AttributeOptions::new());
    let car = vehicle.inherit("CarResource").attribute("drive_layout", AttributeOptions::new());
    let boat = vehicle.inherit("BoatResource").attribute("length_at_water_line", AttributeOptions::new());
    let picture = ResourceDefinition::new("PictureResource")
        .attribute("name", AttributeOptions::new())
        .relationship(RelationshipDef::to_one("imageable").polymorphic(true));
    let document = ResourceDefinition::new("DocumentResource").attribute("name", AttributeOptions::new());

    let book = ResourceDefinition::new("Api::V2::BookResource")
        .attribute("title", AttributeOptions::new())
        .attributes(&["isbn", "banned"], AttributeOptions::new())
        .relationship(RelationshipDef::to_many("book_comments").relation_name_fn(|context| {
            let admin = context
                .get("current_user")
                .is_some_and(|user| user.field("book_admin") == Value::Bool(true));
            if admin {
                "book_comments".to_string()
            } else {
                "approved_book_comments".to_string()
            }
        }))
        .relationship(
            RelationshipDef::to_many("aliased_comments")
                .class_name("BookComments")
                .relation_name("approved_book_comments"),
        );
    let book_comment = ResourceDefinition::new("Api::V2::BookCommentResource")
        .attributes(&["body", "approved"], AttributeOptions::new())
        .has_one("book");

    let cat = ResourceDefinition::new("CatResource")
        .attribute("name", AttributeOptions::new())
        .attribute("breed", AttributeOptions::new())
        .relationship(RelationshipDef::to_one("mother").class_name("Cat"))
        .relationship(RelationshipDef::to_one("father").class_name("Cat"));

    let namespaced = ResourceDefinition::new("MyModule::MyNamespacedResource")
        .with_model_name("Person")
        .has_many("related");
    let related = ResourceDefinition::new("MyModule::RelatedResource")
        .with_model_name("Comment")
        .attribute("body", AttributeOptions::new());
    let api_namespaced = namespaced
        .inherit("MyAPI::MyNamespacedResource")
        .with_model_name("Person");
    let api_related = related
        .inherit("MyAPI::RelatedResource")
        .with_model_name("Comment");

    let no_match = ResourceDefinition::new("NoMatchResource");
    let no_match_abstract = ResourceDefinition::new("NoMatchAbstractResource").abstract_resource();

    for definition in [
        base,
        person,
        special_base,
        special_person,
        post,
        comment,
        company,
        firm,
        tag,
        section,
        hair_cut,
        preferences,
        author,
        vehicle,
        car,
        boat,
        picture,
        document,
        book,
        book_comment,
        cat,
        namespaced,
        related,
        api_namespaced,
        api_related,
        no_match,
        no_match_abstract,
    ] {
        builder.define(definition);
    }

    builder.build().unwrap()
}

/// Seeded records.
pub struct Seed {
    pub person: RecordHandle,
    pub other_person: RecordHandle,
    pub post: RecordHandle,
    pub tags: Vec<RecordHandle>,
    pub section: RecordHandle,
    pub comments: Vec<RecordHandle>,
}

pub fn seed(store: &MemoryStore) -> Seed {
    let person = store.insert(
        "Person",
        &[("name", Value::from("Joe Author")), ("email", Value::from("joe@xyz.fake"))],
    );
    let other_person = store.insert("Person", &[("name", Value::from("Fred Reader"))]);
    let section = store.insert("Section", &[("name", Value::from("ruby"))]);
    let post = store.insert(
        "Post",
        &[
            ("title", Value::from("New post")),
            ("body", Value::from("A body!!!")),
            ("author_id", person.read("id").unwrap()),
            ("section_id", section.read("id").unwrap()),
        ],
    );
    let tags: Vec<RecordHandle> = ["short", "whiny", "happy"]
        .iter()
        .map(|name| store.insert("Tag", &[("name", Value::from(*name))]))
        .collect();
    store.link(&post, "tags", &tags[0]);

    let comments: Vec<RecordHandle> = ["what a dumb post", "i liked it"]
        .iter()
        .map(|body| {
            store.insert(
                "Comment",
                &[
                    ("body", Value::from(*body)),
                    ("post_id", post.read("id").unwrap()),
                    ("author_id", other_person.read("id").unwrap()),
                ],
            )
        })
        .collect();
    for comment in &comments {
        store.link(&post, "comments", comment);
        store.link(&other_person, "comments", comment);
    }
    store.link(&person, "posts", &post);

    Seed {
        person,
        other_person,
        post,
        tags,
        section,
        comments,
    }
}

/// Store, registry, log and seed in one go.
pub fn setup() -> (MemoryStore, Arc<ResourceRegistry>, EventLog, Seed) {
    let store = store();
    let log = EventLog::default();
    let registry = registry(&store, &log);
    let seed = seed(&store);
    (store, registry, log, seed)
}

pub fn id_of(record: &RecordHandle) -> Value {
    record.read("id").unwrap()
}
