//! Job routes. Browsing is public; listing by owner and every write needs a
//! session, and id-addressed writes only ever touch the caller's own jobs.

use actix_web::{guard, web, HttpResponse, Result};
use serde_json::Value;

use super::{OwnedRecordPath, OwnerPath};
use crate::error::AppError;
use crate::extractors::{CurrentIdentity, ValidatedJson};
use crate::middleware::SessionGuard;
use crate::policy::{self, RouteIntent};
use crate::services::JobService;
use crate::state::app_state::AppState;

/// GET /jobs
async fn list_jobs(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    policy::clear(RouteIntent::ListJobs, None, None)?;
    let jobs = JobService::new(app_state.store.as_ref()).list(None).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

/// GET /jobs/{category}
async fn list_jobs_by_category(
    category: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    policy::clear(RouteIntent::ListJobsByCategory, None, None)?;
    let jobs = JobService::new(app_state.store.as_ref())
        .list(Some(category.as_str()))
        .await?;
    Ok(HttpResponse::Ok().json(jobs))
}

/// GET /job/{id}
async fn fetch_job(
    id: web::Path<String>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    policy::clear(RouteIntent::FetchJob, None, None)?;
    let job = JobService::new(app_state.store.as_ref()).fetch(&id).await?;
    Ok(HttpResponse::Ok().json(job))
}

/// GET /posted-jobs/{email}
async fn list_posted_jobs(
    identity: CurrentIdentity,
    path: web::Path<OwnerPath>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let clearance = policy::clear(RouteIntent::ListPostedJobs, Some(&identity.0), Some(&path.email))?;
    let jobs = JobService::new(app_state.store.as_ref())
        .posted(&clearance)
        .await?;
    Ok(HttpResponse::Ok().json(jobs))
}

/// POST /jobs
async fn create_job(
    identity: CurrentIdentity,
    body: ValidatedJson<Value>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let clearance = policy::clear(RouteIntent::CreateJob, Some(&identity.0), None)?;
    let ack = JobService::new(app_state.store.as_ref())
        .create(&clearance, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ack))
}

/// PUT /jobs/{email}/{id}
async fn update_job(
    identity: CurrentIdentity,
    path: web::Path<OwnedRecordPath>,
    body: ValidatedJson<Value>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let clearance = policy::clear(RouteIntent::UpdateJob, Some(&identity.0), Some(&path.email))?;
    let ack = JobService::new(app_state.store.as_ref())
        .update(&clearance, &path.id, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ack))
}

/// DELETE /jobs/{email}/{id}
async fn delete_job(
    identity: CurrentIdentity,
    path: web::Path<OwnedRecordPath>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let clearance = policy::clear(RouteIntent::DeleteJob, Some(&identity.0), Some(&path.email))?;
    let ack = JobService::new(app_state.store.as_ref())
        .delete(&clearance, &path.id)
        .await?;
    Ok(HttpResponse::Ok().json(ack))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // POST /jobs needs a session while GET /jobs is public; the guarded
    // resource is tried first and falls through for other methods.
    cfg.service(
        web::resource("/jobs")
            .guard(guard::Post())
            .wrap(SessionGuard)
            .route(web::post().to(create_job)),
    )
    .service(web::resource("/jobs").route(web::get().to(list_jobs)))
    .service(web::resource("/jobs/{category}").route(web::get().to(list_jobs_by_category)))
    .service(web::resource("/job/{id}").route(web::get().to(fetch_job)))
    .service(
        web::resource("/posted-jobs/{email}")
            .wrap(SessionGuard)
            .route(web::get().to(list_posted_jobs)),
    )
    .service(
        web::resource("/jobs/{email}/{id}")
            .wrap(SessionGuard)
            .route(web::put().to(update_job))
            .route(web::delete().to(delete_job)),
    );
}
