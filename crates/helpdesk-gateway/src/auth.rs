// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session authentication middleware.
//!
//! `require_session` resolves `Authorization: Bearer <token>` to a user and
//! stores it as a [`CurrentUser`] request extension; `require_staff` must be
//! layered inside it and rejects employees.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use helpdesk_core::types::User;

use crate::error::ApiError;
use crate::server::AppState;

/// The authenticated user for this request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Token from an `Authorization: Bearer` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(request.headers())
        .map(String::from)
        .ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;
    let user = state.services.accounts.authenticate(&token).await?;
    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

pub async fn require_staff(request: Request, next: Next) -> Result<Response, ApiError> {
    let is_staff = request
        .extensions()
        .get::<CurrentUser>()
        .is_some_and(|CurrentUser(user)| user.role.is_staff());
    if !is_staff {
        return Err(ApiError::forbidden("agent access required"));
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn ignores_other_schemes_and_blank_tokens() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
        headers.insert("authorization", HeaderValue::from_static("Bearer   "));
        assert_eq!(bearer_token(&headers), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
