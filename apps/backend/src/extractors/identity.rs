use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::auth::Identity;
use crate::error::AppError;

/// Identity attached by `SessionGuard`. Fails with 401 when the route is not
/// behind the guard or the guard did not run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentIdentity(pub Identity);

impl CurrentIdentity {
    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn into_inner(self) -> Identity {
        self.0
    }
}

impl FromRequest for CurrentIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Identity>()
                .cloned()
                .map(CurrentIdentity)
                .ok_or_else(AppError::unauthorized),
        )
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[actix_web::test]
    async fn test_reads_identity_from_extensions() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(Identity::new("a@x.com"));

        let current = CurrentIdentity::extract(&req).await.unwrap();
        assert_eq!(current.email(), "a@x.com");
    }

    #[actix_web::test]
    async fn test_missing_identity_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let err = CurrentIdentity::extract(&req).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }
}
