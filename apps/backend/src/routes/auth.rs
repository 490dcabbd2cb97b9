use std::time::SystemTime;

use actix_web::{web, HttpResponse, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::auth::{token, Identity};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::ValidatedJson;
use crate::logging::pii::Redacted;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// POST /jwt
///
/// Identity is self-asserted: any JSON object with a non-empty `email`
/// string gets a session cookie. Other fields are ignored.
async fn issue_session(
    body: ValidatedJson<Value>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let email = body
        .get("email")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .ok_or_else(|| {
            AppError::bad_request(ErrorCode::InvalidEmail, "Email must be a non-empty string")
        })?;

    let token = token::issue(&Identity::new(email), SystemTime::now(), &app_state.security)?;
    info!(email = %Redacted(email), "session issued");

    Ok(HttpResponse::Ok()
        .cookie(app_state.cookie.session_cookie(token))
        .json(SuccessResponse { success: true }))
}

/// POST /logout
async fn end_session(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok()
        .cookie(app_state.cookie.removal_cookie())
        .json(SuccessResponse { success: true }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/jwt").route(web::post().to(issue_session)))
        .service(web::resource("/logout").route(web::post().to(end_session)));
}
