//! Bit routes. Every route needs a session; self-only routes also need the
//! path email to be the caller's.

use actix_web::{web, HttpResponse, Result};
use serde_json::Value;

use super::{OwnedRecordPath, OwnerPath};
use crate::error::AppError;
use crate::extractors::{CurrentIdentity, ValidatedJson};
use crate::middleware::SessionGuard;
use crate::policy::{self, RouteIntent};
use crate::services::BitService;
use crate::state::app_state::AppState;

/// GET /bits
async fn list_all_bits(
    identity: CurrentIdentity,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    policy::clear(RouteIntent::ListAllBits, Some(&identity.0), None)?;
    let bits = BitService::new(app_state.store.as_ref()).list_all().await?;
    Ok(HttpResponse::Ok().json(bits))
}

/// POST /bits
async fn create_bit(
    identity: CurrentIdentity,
    body: ValidatedJson<Value>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let clearance = policy::clear(RouteIntent::CreateBit, Some(&identity.0), None)?;
    let ack = BitService::new(app_state.store.as_ref())
        .create(&clearance, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ack))
}

/// GET /bits/{email}: the applicant's own bits, by status.
async fn list_own_bits(
    identity: CurrentIdentity,
    path: web::Path<OwnerPath>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let clearance = policy::clear(RouteIntent::ListOwnBits, Some(&identity.0), Some(&path.email))?;
    let bits = BitService::new(app_state.store.as_ref())
        .list_scoped(&clearance)
        .await?;
    Ok(HttpResponse::Ok().json(bits))
}

/// GET /bits-requests/{email}: bits against the employer's jobs.
async fn list_bit_requests(
    identity: CurrentIdentity,
    path: web::Path<OwnerPath>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let clearance =
        policy::clear(RouteIntent::ListBitRequests, Some(&identity.0), Some(&path.email))?;
    let bits = BitService::new(app_state.store.as_ref())
        .list_scoped(&clearance)
        .await?;
    Ok(HttpResponse::Ok().json(bits))
}

/// GET /bits/{email}/{id}
async fn fetch_bit(
    identity: CurrentIdentity,
    path: web::Path<OwnedRecordPath>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let clearance = policy::clear(RouteIntent::FetchBit, Some(&identity.0), Some(&path.email))?;
    let bit = BitService::new(app_state.store.as_ref())
        .fetch(&clearance, &path.id)
        .await?;
    Ok(HttpResponse::Ok().json(bit))
}

/// PATCH /bits/{email}/{id}
async fn update_bit_progress(
    identity: CurrentIdentity,
    path: web::Path<OwnedRecordPath>,
    body: ValidatedJson<Value>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let clearance =
        policy::clear(RouteIntent::UpdateBitProgress, Some(&identity.0), Some(&path.email))?;
    let ack = BitService::new(app_state.store.as_ref())
        .update_progress(&clearance, &path.id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ack))
}

/// PATCH /bits-request/{email}/{id}
async fn update_bit_request(
    identity: CurrentIdentity,
    path: web::Path<OwnedRecordPath>,
    body: ValidatedJson<Value>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let clearance = policy::clear(
        RouteIntent::UpdateBitRequestStatus,
        Some(&identity.0),
        Some(&path.email),
    )?;
    let ack = BitService::new(app_state.store.as_ref())
        .update_request(&clearance, &path.id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ack))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/bits")
            .wrap(SessionGuard)
            .route(web::get().to(list_all_bits))
            .route(web::post().to(create_bit)),
    )
    .service(
        web::resource("/bits/{email}")
            .wrap(SessionGuard)
            .route(web::get().to(list_own_bits)),
    )
    .service(
        web::resource("/bits-requests/{email}")
            .wrap(SessionGuard)
            .route(web::get().to(list_bit_requests)),
    )
    .service(
        web::resource("/bits/{email}/{id}")
            .wrap(SessionGuard)
            .route(web::get().to(fetch_bit))
            .route(web::patch().to(update_bit_progress)),
    )
    .service(
        web::resource("/bits-request/{email}/{id}")
            .wrap(SessionGuard)
            .route(web::patch().to(update_bit_request)),
    );
}
