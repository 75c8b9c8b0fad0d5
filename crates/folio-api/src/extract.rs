//! Request extractors: JSON bodies and caller identity

use std::sync::Arc;

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::Json;
use folio_core::errors::FolioError;
use folio_core::model::Role;
use folio_engine::commands::account;
use folio_engine::Claims;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

pub const HEADER_API_KEY: &str = "x-api-key";

/// JSON request body whose rejections use the standard error shape
#[derive(Debug)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(FolioError::InvalidPayload {
                reason: rejection.body_text(),
            }
            .into()),
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    (!token.is_empty()).then_some(token)
}

fn keys_match(given: &[u8], expected: &[u8]) -> bool {
    given.len() == expected.len()
        && given
            .iter()
            .zip(expected)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// Claims of a caller presenting a valid bearer token
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Claims);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| FolioError::unauthorized("missing bearer token"))?;
        Ok(Self(state.signer.verify(token)?))
    }
}

/// Caller allowed to modify content
///
/// Either the configured `x-api-key` or a bearer token for a stored user
/// whose role is `admin`. The role is read from the `users` collection, not
/// the token, so deleting or demoting an admin takes effect immediately.
/// A token for a deleted user is `Unauthorized`; one for a non-admin is
/// `Forbidden`.
#[derive(Debug, Clone)]
pub struct AdminAccess;

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminAccess {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let (Some(expected), Some(given)) = (
            state.admin_api_key.as_ref(),
            parts.headers.get(HEADER_API_KEY),
        ) {
            if keys_match(given.as_bytes(), expected.expose().as_bytes()) {
                return Ok(Self);
            }
            return Err(FolioError::unauthorized("invalid API key").into());
        }

        let CurrentUser(claims) = CurrentUser::from_request_parts(parts, state).await?;
        let user = account::me(&state.store, &claims).await?;
        if Role::from_stored(user.get_str("role")) != Role::Admin {
            return Err(FolioError::Forbidden {
                required_role: Role::Admin.to_string(),
            }
            .into());
        }
        Ok(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcg=="));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_keys_match() {
        assert!(keys_match(b"secret", b"secret"));
        assert!(!keys_match(b"secret", b"secreT"));
        assert!(!keys_match(b"secret", b"secret-longer"));
    }
}
