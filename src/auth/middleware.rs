// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Gates every request except the public documentation and actuator paths.
//! Verified claims are stored in the request extensions as [`Claims`] for
//! the handlers behind it.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/api/v1/members", get(list_members))
//!     .layer(axum::middleware::from_fn_with_state(authenticator, authenticate));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::{AuthError, Claims, TokenAuthenticator};

/// Paths that are public along with everything beneath them.
pub const PUBLIC_PATH_PREFIXES: &[&str] = &["/v3/api-docs", "/swagger-ui", "/actuator/health"];

/// Paths that are public only as an exact match.
pub const PUBLIC_EXACT_PATHS: &[&str] = &["/swagger-ui.html", "/actuator/info"];

/// Whether `path` may be served without a bearer token.
pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATH_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
        || PUBLIC_EXACT_PATHS.contains(&path)
}

/// Token after the `Bearer ` scheme, if the header has that form.
fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Authentication middleware function.
pub async fn authenticate(
    State(authenticator): State<Arc<TokenAuthenticator>>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_public_path(request.uri().path()) {
        return next.run(request).await;
    }

    // Owned so no borrow of the (non-Sync) request is held across the await
    let token = bearer_token(&request).map(str::to_owned);
    let result = match token {
        Some(token) => authenticator.verify(&token).await,
        None => Err(AuthError::MissingCredentials),
    };

    match result {
        Ok(claims) => {
            request.extensions_mut().insert::<Claims>(claims);
            next.run(request).await
        }
        Err(e) => {
            tracing::debug!(
                path = %request.uri().path(),
                kind = e.kind(),
                reason = %e,
                "Rejected request"
            );
            e.into_response()
        }
    }
}
