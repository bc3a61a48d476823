use crate::auth::jwt::TokenService;
use crate::auth::permissions::{self, Operation};
use crate::types::{AppError, Claims};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::sync::Arc;

/// Splits an `Authorization` value into its scheme and credentials, if the
/// scheme matches `expected` (case-insensitive).
fn authorization_credentials<'a>(headers: &'a HeaderMap, expected: &str) -> Option<&'a str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, credentials) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(expected) {
        return None;
    }

    let credentials = credentials.trim();
    (!credentials.is_empty()).then_some(credentials)
}

/// Bearer-token authentication.
///
/// On success the verified [`Claims`] are stored in the request extensions;
/// permission checks happen in a separate layer.
pub async fn bearer_auth(
    State(token_service): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = authorization_credentials(req.headers(), "Bearer").ok_or_else(|| {
        tracing::warn!(method = %req.method(), path = %req.uri().path(), "missing bearer token");
        AppError::MissingToken
    })?;

    let claims = token_service.verify(token).inspect_err(|e| {
        tracing::warn!(method = %req.method(), path = %req.uri().path(), error = %e, "bearer token rejected");
    })?;

    tracing::debug!(
        sub = %claims.sub,
        role = %claims.role,
        method = %req.method(),
        path = %req.uri().path(),
        "token verified"
    );
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Checks the verified role against the operation implied by the method.
pub async fn enforce_permission(req: Request, next: Next) -> Result<Response, AppError> {
    let operation = Operation::from_method(req.method());
    authorize(operation, req, next).await
}

/// Like [`enforce_permission`] but for a fixed operation regardless of method.
pub async fn enforce_operation(
    operation: Operation,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(Some(operation), req, next).await
}

async fn authorize(
    operation: Option<Operation>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or(AppError::MissingToken)?;

    let allowed = operation
        .map(|op| permissions::is_allowed(&claims.role, op.as_str()))
        .unwrap_or(false);

    if !allowed {
        tracing::warn!(
            sub = %claims.sub,
            role = %claims.role,
            method = %req.method(),
            path = %req.uri().path(),
            "permission denied"
        );
        return Err(AppError::PermissionDenied);
    }

    tracing::debug!(sub = %claims.sub, operation = ?operation, "permission granted");
    Ok(next.run(req).await)
}

/// Extractor for the claims attached by [`bearer_auth`].
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::MissingToken)
    }
}

/// Username and password from an `Authorization: Basic` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl BasicCredentials {
    /// Decodes the base64 `username:password` payload. The password may
    /// itself contain colons; the username may not.
    pub fn decode(encoded: &str) -> Result<Self, AppError> {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|_| AppError::MalformedHeader)?;
        let decoded = String::from_utf8(bytes).map_err(|_| AppError::MalformedHeader)?;
        let (username, password) = decoded.split_once(':').ok_or(AppError::MalformedHeader)?;

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

impl<S> FromRequestParts<S> for BasicCredentials
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let encoded =
            authorization_credentials(&parts.headers, "Basic").ok_or(AppError::MalformedHeader)?;
        BasicCredentials::decode(encoded)
    }
}
