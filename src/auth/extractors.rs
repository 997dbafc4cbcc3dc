use axum::{
    async_trait,
    extract::{FromRef, FromRequest, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::claims::TokenUser;
use crate::auth::jwt::JwtKeys;
use crate::error::AppError;

/// JSON body extractor whose rejections render as `{ "message": ... }` with 400.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Extracts and validates the bearer token, yielding the token subject.
pub struct AuthUser(pub TokenUser);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Auth("Missing Authorization header.".into()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| AppError::Auth("Invalid Authorization header.".into()))?;

        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            AppError::Auth("Invalid or expired token.".into())
        })?;

        Ok(AuthUser(claims.user))
    }
}
