//! Session middleware.
//!
//! Reads the `token` cookie, verifies it and stores the resulting
//! [`Identity`] in request extensions. Requests without a valid session end
//! here with a 401 problem response; the wrapped service never runs.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::auth::{token, Credential};
use crate::error::AppError;
use crate::logging::pii::redact;
use crate::logging::security;
use crate::state::app_state::AppState;

pub struct SessionGuard;

impl<S, B> Transform<S, ServiceRequest> for SessionGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGuardMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionGuardMiddleware<S> {
    service: Rc<S>,
}

fn reject<B>(req: ServiceRequest, err: AppError) -> ServiceResponse<EitherBody<B>> {
    let response = err.error_response();
    req.into_response(response).map_into_right_body()
}

impl<S, B> Service<ServiceRequest> for SessionGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let path = redact(req.path());

            // Absent credentials stop here; verification is never attempted.
            let token = match Credential::from_request(req.request()) {
                Credential::Present(token) => token,
                Credential::Absent => {
                    security::credential_missing(&path);
                    return Ok(reject(req, AppError::unauthorized()));
                }
            };

            let Some(state) = req.app_data::<web::Data<AppState>>().cloned() else {
                return Ok(reject(req, AppError::internal("AppState not available")));
            };

            match token::verify(&token, &state.security) {
                Ok(identity) => {
                    req.extensions_mut().insert(identity);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    security::credential_rejected(&path, "verification_failed");
                    Ok(reject(req, err))
                }
            }
        })
    }
}
