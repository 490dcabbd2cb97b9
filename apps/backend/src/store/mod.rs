//! Resource gateway: the only path from handlers to persisted records.
//!
//! Records are JSON documents. A handful of fields are typed and filterable;
//! everything else is carried verbatim.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::domain::DomainError;

pub mod memory;
pub mod sea;

pub use memory::MemoryStore;
pub use sea::SeaStore;

/// A stored record.
pub type Document = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Jobs,
    Bits,
}

impl Collection {
    pub fn name(self) -> &'static str {
        match self {
            Collection::Jobs => "jobs",
            Collection::Bits => "bits",
        }
    }

    /// Whether `field` can appear in a filter or sort on this collection.
    pub fn supports(self, field: Field) -> bool {
        match self {
            Collection::Jobs => matches!(field, Field::Id | Field::EmployerEmail | Field::Category),
            Collection::Bits => matches!(
                field,
                Field::Id | Field::UserEmail | Field::EmployerEmail | Field::Status
            ),
        }
    }
}

/// Filterable document fields, named by their wire keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    EmployerEmail,
    Category,
    UserEmail,
    Status,
}

impl Field {
    pub fn key(self) -> &'static str {
        match self {
            Field::Id => "_id",
            Field::EmployerEmail => "employer_email",
            Field::Category => "category",
            Field::UserEmail => "userEmail",
            Field::Status => "status",
        }
    }

    /// String value of this field in `doc`, if it holds one.
    pub fn read(self, doc: &Document) -> Option<&str> {
        doc.get(self.key()).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: Field,
    pub value: String,
}

impl Condition {
    fn matches(&self, doc: &Document) -> bool {
        self.field.read(doc) == Some(self.value.as_str())
    }
}

/// Conjunction of equality conditions plus an optional any-of group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub all: Vec<Condition>,
    pub any: Vec<Condition>,
}

impl Filter {
    /// Matches every document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn by_id(id: impl Into<String>) -> Self {
        Self::new().eq(Field::Id, id)
    }

    pub fn eq(mut self, field: Field, value: impl Into<String>) -> Self {
        self.all.push(Condition {
            field,
            value: value.into(),
        });
        self
    }

    /// Add alternatives; at least one must match.
    pub fn any_of<I>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = (Field, String)>,
    {
        self.any
            .extend(conditions.into_iter().map(|(field, value)| Condition { field, value }));
        self
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.all.iter().all(|c| c.matches(doc))
            && (self.any.is_empty() || self.any.iter().any(|c| c.matches(doc)))
    }

    /// Reject fields the collection does not index.
    pub fn check(&self, collection: Collection) -> Result<(), DomainError> {
        match self
            .all
            .iter()
            .chain(self.any.iter())
            .find(|c| !collection.supports(c.field))
        {
            Some(c) => Err(DomainError::validation(format!(
                "field '{}' is not filterable on {}",
                c.field.key(),
                collection.name()
            ))),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub filter: Filter,
    /// Ascending sort; documents missing the field come first.
    pub sort: Option<Field>,
}

impl Query {
    pub fn new(filter: Filter) -> Self {
        Self { filter, sort: None }
    }

    pub fn sorted_by(mut self, field: Field) -> Self {
        self.sort = Some(field);
        self
    }

    pub fn check(&self, collection: Collection) -> Result<(), DomainError> {
        self.filter.check(collection)?;
        match self.sort {
            Some(field) if !collection.supports(field) => Err(DomainError::validation(format!(
                "field '{}' is not sortable on {}",
                field.key(),
                collection.name()
            ))),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Apply `$set` semantics; returns whether anything changed.
pub(crate) fn apply_patch(doc: &mut Document, patch: &Document) -> bool {
    let mut changed = false;
    for (key, value) in patch {
        if doc.get(key) != Some(value) {
            doc.insert(key.clone(), value.clone());
            changed = true;
        }
    }
    changed
}

/// Narrow CRUD surface over the two collections.
///
/// Write operations act on the first document matching the filter.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find(&self, collection: Collection, query: &Query)
        -> Result<Vec<Document>, DomainError>;

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, DomainError>;

    /// Store `document` under a freshly generated `_id`.
    async fn insert(&self, collection: Collection, document: Document)
        -> Result<InsertAck, DomainError>;

    async fn update(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: &Document,
    ) -> Result<UpdateAck, DomainError>;

    async fn delete(&self, collection: Collection, filter: &Filter)
        -> Result<DeleteAck, DomainError>;

    /// Short name for health reporting.
    fn backend_name(&self) -> &'static str;
}
