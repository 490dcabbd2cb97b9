use serde_json::Value;
use tracing::{debug, info};

use crate::errors::domain::{DomainError, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::models::{self, ProgressUpdate};
use crate::policy::{Clearance, Role};
use crate::store::{
    Collection, Document, Field, Filter, InsertAck, Query, RecordStore, UpdateAck,
};

/// Bit operations. Each method performs exactly one store call.
pub struct BitService<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> BitService<'a> {
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Every bit, unscoped. Callers must already hold a session.
    pub async fn list_all(&self) -> Result<Vec<Document>, DomainError> {
        self.store
            .find(Collection::Bits, &Query::new(Filter::new()))
            .await
    }

    /// Bits in the cleared role's scope, sorted by status. Used for both the
    /// applicant's own bits and the employer's incoming requests.
    pub async fn list_scoped(&self, clearance: &Clearance) -> Result<Vec<Document>, DomainError> {
        let query = Query::new(clearance.scope(Filter::new())).sorted_by(Field::Status);
        self.store.find(Collection::Bits, &query).await
    }

    /// A single bit, visible to its applicant or its employer.
    pub async fn fetch(&self, clearance: &Clearance, id: &str) -> Result<Document, DomainError> {
        self.store
            .find_one(Collection::Bits, &clearance.scope(Filter::by_id(id)))
            .await?
            .ok_or_else(|| DomainError::not_found(NotFoundKind::Bit, format!("Bit {id} not found")))
    }

    pub async fn create(
        &self,
        clearance: &Clearance,
        body: Value,
    ) -> Result<InsertAck, crate::AppError> {
        let doc = models::new_bit(body)?;
        clearance.require_owner(&doc, Role::Applicant)?;

        let ack = self.store.insert(Collection::Bits, doc).await?;
        info!(
            bit_id = %ack.inserted_id,
            applicant = %Redacted(clearance.email().unwrap_or_default()),
            "bit created"
        );
        Ok(ack)
    }

    /// Applicant-side progress update: only `status` and `progress` change.
    pub async fn update_progress(
        &self,
        clearance: &Clearance,
        id: &str,
        body: Value,
    ) -> Result<UpdateAck, DomainError> {
        let update: ProgressUpdate = serde_json::from_value(body).map_err(|_| {
            DomainError::validation("body must be {\"updatedData\": {\"status\", \"progress\"}}")
        })?;
        let patch = update.into_patch()?;
        let ack = self
            .store
            .update(Collection::Bits, &clearance.scope(Filter::by_id(id)), &patch)
            .await?;
        debug!(bit_id = id, matched = ack.matched_count, "bit progress applied");
        Ok(ack)
    }

    /// Employer-side status change on an incoming request.
    pub async fn update_request(
        &self,
        clearance: &Clearance,
        id: &str,
        body: Value,
    ) -> Result<UpdateAck, DomainError> {
        let patch = models::patch(Collection::Bits, body)?;
        let ack = self
            .store
            .update(Collection::Bits, &clearance.scope(Filter::by_id(id)), &patch)
            .await?;
        debug!(bit_id = id, matched = ack.matched_count, "bit request update applied");
        Ok(ack)
    }
}
