use serde_json::Value;
use tracing::{debug, info};

use crate::errors::domain::{DomainError, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::models;
use crate::policy::{Clearance, Role};
use crate::store::{
    Collection, DeleteAck, Document, Field, Filter, InsertAck, Query, RecordStore, UpdateAck,
};

/// Job operations. Each method performs exactly one store call.
pub struct JobService<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> JobService<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// All jobs, or those in `category`.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Document>, DomainError> {
        let filter = match category {
            Some(category) => Filter::new().eq(Field::Category, category),
            None => Filter::new(),
        };
        self.store.find(Collection::Jobs, &Query::new(filter)).await
    }

    pub async fn fetch(&self, id: &str) -> Result<Document, DomainError> {
        self.store
            .find_one(Collection::Jobs, &Filter::by_id(id))
            .await?
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Job, format!("Job {id} not found")))
    }

    /// Jobs posted by the cleared employer.
    pub async fn posted(&self, clearance: &Clearance) -> Result<Vec<Document>, DomainError> {
        self.store
            .find(Collection::Jobs, &Query::new(clearance.scope(Filter::new())))
            .await
    }

    /// The body is validated before the owner check, so a body without an
    /// employer is a 400 rather than a 403.
    pub async fn create(
        &self,
        clearance: &Clearance,
        body: Value,
    ) -> Result<InsertAck, crate::AppError> {
        let doc = models::new_job(body)?;
        clearance.require_owner(&doc, Role::Employer)?;

        let ack = self.store.insert(Collection::Jobs, doc).await?;
        info!(
            job_id = %ack.inserted_id,
            employer = %Redacted(clearance.email().unwrap_or_default()),
            "job created"
        );
        Ok(ack)
    }

    pub async fn update(
        &self,
        clearance: &Clearance,
        id: &str,
        body: Value,
    ) -> Result<UpdateAck, DomainError> {
        let patch = models::patch(Collection::Jobs, body)?;
        let ack = self
            .store
            .update(Collection::Jobs, &clearance.scope(Filter::by_id(id)), &patch)
            .await?;
        debug!(job_id = id, matched = ack.matched_count, "job update applied");
        Ok(ack)
    }

    pub async fn delete(&self, clearance: &Clearance, id: &str) -> Result<DeleteAck, DomainError> {
        let ack = self
            .store
            .delete(Collection::Jobs, &clearance.scope(Filter::by_id(id)))
            .await?;
        debug!(job_id = id, deleted = ack.deleted_count, "job delete applied");
        Ok(ack)
    }
}
