//! SeaORM-backed store. Each row keeps the full record in `document`; the
//! filterable fields are mirrored into indexed columns on every write.

use async_trait::async_trait;
use sea_orm::sea_query::NullOrdering;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition as SeaCondition, ConnectionTrait, DatabaseBackend,
    DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder, Set,
};
use serde_json::Value;
use time::OffsetDateTime;
use ulid::Ulid;

use super::{
    apply_patch, Collection, Condition, DeleteAck, Document, Field, Filter, InsertAck, Query,
    RecordStore, UpdateAck,
};
use crate::entities::{bits, jobs};
use crate::errors::domain::{DomainError, InfraErrorKind};

#[derive(Debug, Clone)]
pub struct SeaStore {
    db: DatabaseConnection,
}

impl SeaStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn job_column(field: Field) -> Option<jobs::Column> {
    match field {
        Field::Id => Some(jobs::Column::Id),
        Field::EmployerEmail => Some(jobs::Column::EmployerEmail),
        Field::Category => Some(jobs::Column::Category),
        Field::UserEmail | Field::Status => None,
    }
}

fn bit_column(field: Field) -> Option<bits::Column> {
    match field {
        Field::Id => Some(bits::Column::Id),
        Field::UserEmail => Some(bits::Column::UserEmail),
        Field::EmployerEmail => Some(bits::Column::EmployerEmail),
        Field::Status => Some(bits::Column::Status),
        Field::Category => None,
    }
}

/// Translate a filter into a SQL condition over the mirrored columns.
fn condition<C, F>(filter: &Filter, column: F) -> Result<SeaCondition, DomainError>
where
    C: ColumnTrait,
    F: Fn(Field) -> Option<C>,
{
    let eq = |c: &Condition| {
        column(c.field)
            .map(|col| col.eq(c.value.clone()))
            .ok_or_else(|| DomainError::validation(format!("field '{}' is not filterable", c.field.key())))
    };

    let mut all = SeaCondition::all();
    for c in &filter.all {
        all = all.add(eq(c)?);
    }
    if !filter.any.is_empty() {
        let mut any = SeaCondition::any();
        for c in &filter.any {
            any = any.add(eq(c)?);
        }
        all = all.add(any);
    }
    Ok(all)
}

fn into_document(value: Value) -> Result<Document, DomainError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("stored document is not an object: {other}"),
        )),
    }
}

fn owned(field: Field, doc: &Document) -> String {
    field.read(doc).unwrap_or_default().to_string()
}

fn optional(field: Field, doc: &Document) -> Option<String> {
    field.read(doc).map(str::to_string)
}

#[async_trait]
impl RecordStore for SeaStore {
    async fn find(
        &self,
        collection: Collection,
        query: &Query,
    ) -> Result<Vec<Document>, DomainError> {
        query.check(collection)?;

        let values: Vec<Value> = match collection {
            Collection::Jobs => {
                let mut select = jobs::Entity::find().filter(condition(&query.filter, job_column)?);
                if let Some(col) = query.sort.and_then(job_column) {
                    select = select.order_by_with_nulls(col, Order::Asc, NullOrdering::First);
                }
                select
                    .order_by_asc(jobs::Column::CreatedAt)
                    .order_by_asc(jobs::Column::Id)
                    .all(&self.db)
                    .await?
                    .into_iter()
                    .map(|row| row.document)
                    .collect()
            }
            Collection::Bits => {
                let mut select = bits::Entity::find().filter(condition(&query.filter, bit_column)?);
                if let Some(col) = query.sort.and_then(bit_column) {
                    select = select.order_by_with_nulls(col, Order::Asc, NullOrdering::First);
                }
                select
                    .order_by_asc(bits::Column::CreatedAt)
                    .order_by_asc(bits::Column::Id)
                    .all(&self.db)
                    .await?
                    .into_iter()
                    .map(|row| row.document)
                    .collect()
            }
        };

        values.into_iter().map(into_document).collect()
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> Result<Option<Document>, DomainError> {
        filter.check(collection)?;

        let value = match collection {
            Collection::Jobs => jobs::Entity::find()
                .filter(condition(filter, job_column)?)
                .order_by_asc(jobs::Column::CreatedAt)
                .one(&self.db)
                .await?
                .map(|row| row.document),
            Collection::Bits => bits::Entity::find()
                .filter(condition(filter, bit_column)?)
                .order_by_asc(bits::Column::CreatedAt)
                .one(&self.db)
                .await?
                .map(|row| row.document),
        };

        value.map(into_document).transpose()
    }

    async fn insert(
        &self,
        collection: Collection,
        mut document: Document,
    ) -> Result<InsertAck, DomainError> {
        let id = Ulid::new().to_string();
        document.insert(Field::Id.key().to_string(), Value::String(id.clone()));
        let now = OffsetDateTime::now_utc();

        match collection {
            Collection::Jobs => {
                let row = jobs::ActiveModel {
                    id: Set(id.clone()),
                    employer_email: Set(owned(Field::EmployerEmail, &document)),
                    category: Set(optional(Field::Category, &document)),
                    document: Set(Value::Object(document)),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                jobs::Entity::insert(row)
                    .exec_without_returning(&self.db)
                    .await?;
            }
            Collection::Bits => {
                let row = bits::ActiveModel {
                    id: Set(id.clone()),
                    user_email: Set(owned(Field::UserEmail, &document)),
                    employer_email: Set(owned(Field::EmployerEmail, &document)),
                    status: Set(optional(Field::Status, &document)),
                    document: Set(Value::Object(document)),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                bits::Entity::insert(row)
                    .exec_without_returning(&self.db)
                    .await?;
            }
        }

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
        let now = OffsetDateTime::now_utc();

        let (matched, modified) = match collection {
            Collection::Jobs => {
                let row = jobs::Entity::find()
                    .filter(condition(filter, job_column)?)
                    .order_by_asc(jobs::Column::CreatedAt)
                    .one(&self.db)
                    .await?;
                match row {
                    None => (0, 0),
                    Some(row) => {
                        let mut doc = into_document(row.document.clone())?;
                        if apply_patch(&mut doc, patch) {
                            let mut active: jobs::ActiveModel = row.into();
                            active.employer_email = Set(owned(Field::EmployerEmail, &doc));
                            active.category = Set(optional(Field::Category, &doc));
                            active.document = Set(Value::Object(doc));
                            active.updated_at = Set(now);
                            active.update(&self.db).await?;
                            (1, 1)
                        } else {
                            (1, 0)
                        }
                    }
                }
            }
            Collection::Bits => {
                let row = bits::Entity::find()
                    .filter(condition(filter, bit_column)?)
                    .order_by_asc(bits::Column::CreatedAt)
                    .one(&self.db)
                    .await?;
                match row {
                    None => (0, 0),
                    Some(row) => {
                        let mut doc = into_document(row.document.clone())?;
                        if apply_patch(&mut doc, patch) {
                            let mut active: bits::ActiveModel = row.into();
                            active.user_email = Set(owned(Field::UserEmail, &doc));
                            active.employer_email = Set(owned(Field::EmployerEmail, &doc));
                            active.status = Set(optional(Field::Status, &doc));
                            active.document = Set(Value::Object(doc));
                            active.updated_at = Set(now);
                            active.update(&self.db).await?;
                            (1, 1)
                        } else {
                            (1, 0)
                        }
                    }
                }
            }
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

        let deleted = match collection {
            Collection::Jobs => {
                let row = jobs::Entity::find()
                    .filter(condition(filter, job_column)?)
                    .order_by_asc(jobs::Column::CreatedAt)
                    .one(&self.db)
                    .await?;
                match row {
                    Some(row) => {
                        jobs::Entity::delete_by_id(row.id)
                            .exec(&self.db)
                            .await?
                            .rows_affected
                    }
                    None => 0,
                }
            }
            Collection::Bits => {
                let row = bits::Entity::find()
                    .filter(condition(filter, bit_column)?)
                    .order_by_asc(bits::Column::CreatedAt)
                    .one(&self.db)
                    .await?;
                match row {
                    Some(row) => {
                        bits::Entity::delete_by_id(row.id)
                            .exec(&self.db)
                            .await?
                            .rows_affected
                    }
                    None => 0,
                }
            }
        };

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: deleted,
        })
    }

    fn backend_name(&self) -> &'static str {
        match self.db.get_database_backend() {
            DatabaseBackend::Postgres => "postgres",
            DatabaseBackend::Sqlite => "sqlite",
            _ => "sql",
        }
    }
}
