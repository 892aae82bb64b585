// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the authenticated principal.
//!
//! ```rust,ignore
//! async fn list_members(principal: Principal) -> impl IntoResponse {
//!     // principal.manager_id scopes every query
//! }
//! ```
//!
//! Relies on [`authenticate`](super::middleware::authenticate) having run;
//! a request without verified claims is rejected like any other auth failure.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, Claims, Principal};

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<Claims>()
            .cloned()
            .ok_or(AuthError::MissingCredentials)?;

        let principal = Principal::from_claims(claims).ok_or_else(|| {
            AuthError::MalformedToken("token has no subject to scope members by".to_string())
        })?;

        tracing::debug!(
            manager_id = %principal.manager_id,
            authorities = ?principal.authorities,
            "Resolved principal"
        );

        Ok(principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use serde_json::json;

    fn parts_with(claims: Option<serde_json::Value>) -> Parts {
        let mut parts = Request::builder()
            .uri("/api/v1/members")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        if let Some(value) = claims {
            parts
                .extensions
                .insert(serde_json::from_value::<Claims>(value).unwrap());
        }
        parts
    }

    #[tokio::test]
    async fn reads_claims_set_by_middleware() {
        let mut parts = parts_with(Some(json!({
            "sub": "manager-1",
            "realm_access": { "roles": ["manager"] }
        })));

        let principal = Principal::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(principal.manager_id, "manager-1");
        assert_eq!(principal.authorities, vec!["ROLE_manager"]);
    }

    #[tokio::test]
    async fn rejects_without_claims() {
        let mut parts = parts_with(None);

        let result = Principal::from_request_parts(&mut parts, &()).await;

        assert_eq!(result, Err(AuthError::MissingCredentials));
    }

    #[tokio::test]
    async fn rejects_claims_without_subject() {
        let mut parts = parts_with(Some(json!({ "realm_access": { "roles": ["manager"] } })));

        let result = Principal::from_request_parts(&mut parts, &()).await;

        assert!(matches!(result, Err(AuthError::MalformedToken(_))));
    }
}
