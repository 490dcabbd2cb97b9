//! Shape checks for incoming job and bit documents.
//!
//! Only the typed fields are checked; any other field passes through as-is.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::errors::domain::DomainError;
use crate::store::{Collection, Document, Field};

fn required_email(doc: &Document, field: Field) -> Result<(), DomainError> {
    match doc.get(field.key()) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(()),
        _ => Err(DomainError::validation(format!(
            "'{}' must be a non-empty string",
            field.key()
        ))),
    }
}

fn optional_string(doc: &Document, field: Field) -> Result<(), DomainError> {
    match doc.get(field.key()) {
        None | Some(Value::String(_)) | Some(Value::Null) => Ok(()),
        Some(_) => Err(DomainError::validation(format!(
            "'{}' must be a string",
            field.key()
        ))),
    }
}

fn object(value: Value) -> Result<Document, DomainError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(DomainError::validation("body must be a JSON object")),
    }
}

/// Validate a job body for insertion. Any client-supplied `_id` is dropped.
pub fn new_job(value: Value) -> Result<Document, DomainError> {
    let mut doc = object(value)?;
    doc.remove(Field::Id.key());
    required_email(&doc, Field::EmployerEmail)?;
    optional_string(&doc, Field::Category)?;
    Ok(doc)
}

/// Validate a bit body for insertion. Both owner fields are required; the
/// employer email is not cross-checked against the job.
pub fn new_bit(value: Value) -> Result<Document, DomainError> {
    let mut doc = object(value)?;
    doc.remove(Field::Id.key());
    required_email(&doc, Field::UserEmail)?;
    required_email(&doc, Field::EmployerEmail)?;
    optional_string(&doc, Field::Status)?;
    Ok(doc)
}

/// Fields a patch may never write on `collection`.
pub fn protected_fields(collection: Collection) -> &'static [Field] {
    match collection {
        Collection::Jobs => &[Field::Id, Field::EmployerEmail],
        Collection::Bits => &[Field::Id, Field::UserEmail, Field::EmployerEmail],
    }
}

/// Validate a `$set` patch. Empty patches and writes to id or owner fields
/// are rejected.
pub fn patch(collection: Collection, value: Value) -> Result<Document, DomainError> {
    let doc = object(value)?;
    if doc.is_empty() {
        return Err(DomainError::validation("patch must set at least one field"));
    }
    if let Some(field) = protected_fields(collection)
        .iter()
        .find(|f| doc.contains_key(f.key()))
    {
        return Err(DomainError::protected_field(field.key()));
    }
    match collection {
        Collection::Jobs => optional_string(&doc, Field::Category)?,
        Collection::Bits => optional_string(&doc, Field::Status)?,
    }
    Ok(doc)
}

/// Body of `PATCH /bits/{email}/{id}`.
#[derive(Debug, Deserialize)]
pub struct ProgressUpdate {
    #[serde(rename = "updatedData")]
    pub updated_data: ProgressFields,
}

/// A key that is present is written even when its value is `null`.
#[derive(Debug, Deserialize)]
pub struct ProgressFields {
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub progress: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ProgressUpdate {
    /// The `$set` document; only `status` and `progress` are ever written.
    pub fn into_patch(self) -> Result<Document, DomainError> {
        let mut doc = Map::new();
        if let Some(status) = self.updated_data.status {
            doc.insert(Field::Status.key().to_string(), status);
        }
        if let Some(progress) = self.updated_data.progress {
            doc.insert("progress".to_string(), progress);
        }
        patch(Collection::Bits, Value::Object(doc))
    }
}
