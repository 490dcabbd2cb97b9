use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use ulid::Ulid;

use super::{
    apply_patch, Collection, DeleteAck, Document, Field, Filter, InsertAck, Query, RecordStore,
    UpdateAck,
};
use crate::errors::domain::DomainError;

/// In-process store. Each collection keeps documents in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub fn len(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .get(&collection)
            .map_or(0, Vec::len)
    }

    pub fn is_empty(&self, collection: Collection) -> bool {
        self.len(collection) == 0
    }
}

/// Missing values sort before present ones.
fn compare_by(field: Field, a: &Document, b: &Document) -> Ordering {
    field.read(a).cmp(&field.read(b))
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn find(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<Document>, DomainError> {
        query.check(collection)?;

        let guard = self.collections.read();
        let mut docs: Vec<Document> = guard
            .get(&collection)
            .into_iter()
            .flatten()
            .filter(|doc| query.filter.matches(doc))
            .cloned()
            .collect();
        drop(guard);

        if let Some(field) = query.sort {
            docs.sort_by(|a, b| compare_by(field, a, b));
        }
        Ok(docs)
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, DomainError> {
        filter.check(collection)?;

        Ok(self
            .collections
            .read()
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)))
            .cloned())
    }

    async fn insert(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> Result<InsertAck, DomainError> {
        let id = Ulid::new().to_string();
        document.insert(Field::Id.key().to_string(), Value::String(id.clone()));

        self.collections
            .write()
            .entry(collection)
            .or_default()
            .push(document);

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id,
        })
    }

    async fn update(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: &Document,
    ) -> Result<UpdateAck, DomainError> {
        filter.check(collection)?;

        let mut guard = self.collections.write();
        let target = guard
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| filter.matches(doc)));

        let (matched, modified) = match target {
            Some(doc) => (1, u64::from(apply_patch(doc, patch))),
            None => (0, 0),
        };

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: matched,
            modified_count: modified,
        })
    }

    async fn delete(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<DeleteAck, DomainError> {
        filter.check(collection)?;

        let mut guard = self.collections.write();
        let deleted = match guard.get_mut(&collection) {
            Some(docs) => match docs.iter().position(|doc| filter.matches(doc)) {
                Some(idx) => {
                    docs.remove(idx);
                    1
                }
                None => 0,
            },
            None => 0,
        };

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: deleted,
        })
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_fresh_id() {
        let store = MemoryStore::new();

        let ack = store
            .insert(
                Collection::Jobs,
                doc(json!({"_id": "client-chosen", "employer_email": "a@x.com"})),
            )
            .await
            .unwrap();

        assert!(ack.acknowledged);
        assert_ne!(ack.inserted_id, "client-chosen");
        assert_eq!(ack.inserted_id.len(), 26);

        let found = store
            .find_one(Collection::Jobs, &Filter::by_id(&ack.inserted_id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found["employer_email"], json!("a@x.com"));
        assert_eq!(store.len(Collection::Jobs), 1);
        assert!(store.is_empty(Collection::Bits));
    }

    #[tokio::test]
    async fn test_find_sorts_missing_first_and_is_stable() {
        let store = MemoryStore::new();
        for (status, tag) in [
            (Some("rejected"), "r"),
            (Some("in progress"), "p1"),
            (None, "none"),
            (Some("in progress"), "p2"),
        ] {
            let mut d = doc(json!({"userEmail": "a@x.com", "employer_email": "e@x.com", "tag": tag}));
            if let Some(status) = status {
                d.insert("status".into(), json!(status));
            }
            store.insert(Collection::Bits, d).await.unwrap();
        }

        let docs = store
            .find(
                Collection::Bits,
                &Query::new(Filter::new().eq(Field::UserEmail, "a@x.com")).sorted_by(Field::Status),
            )
            .await
            .unwrap();

        let tags: Vec<&str> = docs.iter().map(|d| d["tag"].as_str().unwrap()).collect();
        assert_eq!(tags, vec!["none", "p1", "p2", "r"]);
    }

    #[tokio::test]
    async fn test_update_counts() {
        let store = MemoryStore::new();
        let id = store
            .insert(Collection::Bits, doc(json!({"userEmail": "a@x.com", "status": "pending"})))
            .await
            .unwrap()
            .inserted_id;

        let same = store
            .update(Collection::Bits, &Filter::by_id(&id), &doc(json!({"status": "pending"})))
            .await
            .unwrap();
        assert_eq!((same.matched_count, same.modified_count), (1, 0));

        let changed = store
            .update(Collection::Bits, &Filter::by_id(&id), &doc(json!({"status": "accepted"})))
            .await
            .unwrap();
        assert_eq!((changed.matched_count, changed.modified_count), (1, 1));

        let missing = store
            .update(Collection::Bits, &Filter::by_id("nope"), &doc(json!({"status": "x"})))
            .await
            .unwrap();
        assert_eq!((missing.matched_count, missing.modified_count), (0, 0));
    }

    #[tokio::test]
    async fn test_delete_respects_owner_filter() {
        let store = MemoryStore::new();
        let id = store
            .insert(Collection::Jobs, doc(json!({"employer_email": "a@x.com"})))
            .await
            .unwrap()
            .inserted_id;

        let wrong_owner = store
            .delete(
                Collection::Jobs,
                &Filter::by_id(&id).eq(Field::EmployerEmail, "b@x.com"),
            )
            .await
            .unwrap();
        assert_eq!(wrong_owner.deleted_count, 0);

        let owner = store
            .delete(
                Collection::Jobs,
                &Filter::by_id(&id).eq(Field::EmployerEmail, "a@x.com"),
            )
            .await
            .unwrap();
        assert_eq!(owner.deleted_count, 1);
        assert!(store.is_empty(Collection::Jobs));
    }

    #[tokio::test]
    async fn test_unsupported_field_is_validation_error() {
        let store = MemoryStore::new();
        let err = store
            .find(Collection::Jobs, &Query::new(Filter::new().eq(Field::Status, "x")))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
