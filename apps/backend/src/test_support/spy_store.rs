use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::errors::domain::DomainError;
use crate::store::{
    Collection, DeleteAck, Document, Filter, InsertAck, MemoryStore, Query, RecordStore, UpdateAck,
};

/// Memory store that counts every call reaching it.
#[derive(Debug, Default)]
pub struct SpyStore {
    inner: MemoryStore,
    calls: AtomicUsize,
}

impl SpyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RecordStore for SpyStore {
    async fn find(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<Document>, DomainError> {
        self.hit();
        self.inner.find(collection, query).await
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, DomainError> {
        self.hit();
        self.inner.find_one(collection, filter).await
    }

    async fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<InsertAck, DomainError> {
        self.hit();
        self.inner.insert(collection, document).await
    }

    async fn update(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: &Document,
    ) -> Result<UpdateAck, DomainError> {
        self.hit();
        self.inner.update(collection, filter, patch).await
    }

    async fn delete(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<DeleteAck, DomainError> {
        self.hit();
        self.inner.delete(collection, filter).await
    }

    fn backend_name(&self) -> &'static str {
        "spy"
    }
}
