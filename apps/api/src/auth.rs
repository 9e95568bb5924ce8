//! Caller identity boundary.
//!
//! Token verification is the upstream gateway's job. This service consumes
//! the bearer token as an opaque caller identity string — never parsed,
//! only sanitized by the artifact store before filesystem use. Requests
//! without an identity are refused before any pipeline work begins.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::errors::AppError;

/// Opaque authenticated caller identity, extracted from the
/// `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct CallerId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .unwrap_or_default();

        if token.is_empty() {
            tracing::warn!("missing caller identity, request denied");
            return Err(AppError::Unauthorized);
        }

        Ok(CallerId(token.to_string()))
    }
}
