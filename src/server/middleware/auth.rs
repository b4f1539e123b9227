//! Admin authentication middleware
//!
//! Every route except the health check requires the configured admin key
//! in the `Authorization` header. When no key is configured the check is
//! skipped entirely.

use crate::utils::error::KeyforgeError;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header;
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

/// Admin auth middleware for actix-web.
pub struct AdminAuth {
    admin_key: Option<String>,
}

impl AdminAuth {
    pub fn new(admin_key: Option<String>) -> Self {
        Self { admin_key }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AdminAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AdminAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AdminAuthService {
            service,
            admin_key: self.admin_key.clone(),
        }))
    }
}

/// Service implementation for admin auth.
pub struct AdminAuthService<S> {
    service: S,
    admin_key: Option<String>,
}

impl<S, B> Service<ServiceRequest> for AdminAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(expected) = self.admin_key.clone() else {
            // No admin key configured: open access.
            return Box::pin(self.service.call(req));
        };

        if req.path() == "/health" {
            return Box::pin(self.service.call(req));
        }

        let provided = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_key);

        match provided {
            Some(key) if key == expected => Box::pin(self.service.call(req)),
            Some(_) => {
                debug!("Rejected request with invalid admin key");
                Box::pin(ready(Err(
                    KeyforgeError::unauthorized("invalid admin key").into()
                )))
            }
            None => Box::pin(ready(Err(KeyforgeError::unauthorized(
                "Authorization header required, use: Authorization: Bearer <key>",
            )
            .into()))),
        }
    }
}

/// Accept both `Bearer` and `ADMIN` prefixes.
fn extract_key(header_value: &str) -> Option<String> {
    header_value
        .strip_prefix("Bearer ")
        .or_else(|| header_value.strip_prefix("ADMIN "))
        .map(str::to_string)
}
