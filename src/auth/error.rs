// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Every kind is rendered to the client the same way: `401` with
//! `{"error":"Unauthorized"}`. The variant and its reason only reach the log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization` header, or one without the `Bearer ` scheme
    #[error("missing bearer credentials")]
    MissingCredentials,
    /// JWKS endpoint unreachable, timed out, or answered with an error status
    #[error("failed to fetch JWKS: {0}")]
    Network(String),
    /// JWKS response body is not a key set document
    #[error("failed to parse JWKS: {0}")]
    Parse(String),
    /// No cached key for the token's `kid`, even after a refresh
    #[error("key not found for kid: {0}")]
    KeyNotFound(String),
    /// Header or claims unreadable, wrong algorithm, bad signature, expired
    #[error("malformed token: {0}")]
    MalformedToken(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
}

impl AuthError {
    /// Short label used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::Network(_) => "network",
            AuthError::Parse(_) => "parse",
            AuthError::KeyNotFound(_) => "key_not_found",
            AuthError::MalformedToken(_) => "malformed_token",
        }
    }

    /// HTTP status and client-facing message for this error.
    ///
    /// Kept as one table so no kind can leak a different response shape.
    pub fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            AuthError::MissingCredentials
            | AuthError::Network(_)
            | AuthError::Parse(_)
            | AuthError::KeyNotFound(_)
            | AuthError::MalformedToken(_) => (StatusCode::UNAUTHORIZED, "Unauthorized"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(AuthErrorBody { error: message })).into_response()
    }
}
