// Unit tests for error mapping - pure domain logic without HTTP or store dependencies
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_to_400() {
    let app: AppError = DomainError::validation("employer_email is required").into();
    assert_eq!(app.code(), ErrorCode::InvalidBody);
    assert_eq!(app.status().as_u16(), 400);
    assert!(app.detail().contains("employer_email"));
}

#[test]
fn maps_protected_field_to_400() {
    let app: AppError = DomainError::protected_field("userEmail").into();
    assert_eq!(app.code(), ErrorCode::ProtectedField);
    assert_eq!(app.status().as_u16(), 400);
    assert!(app.detail().contains("userEmail"));
}

#[test]
fn maps_not_found_per_collection() {
    let job: AppError = DomainError::not_found(NotFoundKind::Job, "no job").into();
    assert_eq!(job.code().as_str(), "JOB_NOT_FOUND");
    assert_eq!(job.status().as_u16(), 404);

    let bit: AppError = DomainError::not_found(NotFoundKind::Bit, "no bit").into();
    assert_eq!(bit.code().as_str(), "BIT_NOT_FOUND");

    let other: AppError =
        DomainError::not_found(NotFoundKind::Other("thing".into()), "no thing").into();
    assert_eq!(other.code().as_str(), "NOT_FOUND");
}

#[test]
fn maps_infra_to_5xx() {
    let down: AppError = DomainError::infra(InfraErrorKind::StoreUnavailable, "down").into();
    assert_eq!(down.code().as_str(), "STORE_UNAVAILABLE");
    assert_eq!(down.status().as_u16(), 503);

    let corrupt: AppError = DomainError::infra(InfraErrorKind::DataCorruption, "bad json").into();
    assert_eq!(corrupt.code().as_str(), "STORE_FAILURE");
    assert_eq!(corrupt.status().as_u16(), 500);
    assert!(matches!(corrupt, AppError::Store { .. }));
}
