// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Member API errors rendered as RFC 7807 problem details.
//!
//! Handlers return [`ApiError`]; the [`problem_details`] middleware fills in
//! the `instance` member from the request URI before the response leaves.

use axum::{
    extract::Request,
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::StorageError;

/// Problem category, each with a fixed status and title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Conflict,
    AccessDenied,
    Internal,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        self.describe().0
    }

    pub fn title(self) -> &'static str {
        self.describe().1
    }

    fn describe(self) -> (StatusCode, &'static str) {
        match self {
            ErrorKind::BadRequest => (StatusCode::BAD_REQUEST, "Bad Request"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "Member Not Found"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "Resource Conflict"),
            ErrorKind::AccessDenied => (StatusCode::FORBIDDEN, "Access Denied"),
            ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ErrorKind,
    pub detail: String,
    pub instance: Option<String>,
}

#[derive(Serialize)]
struct ProblemBody<'a> {
    #[serde(rename = "type")]
    problem_type: &'static str,
    title: &'static str,
    status: u16,
    detail: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    instance: Option<&'a str>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            instance: None,
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, detail)
    }

    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, detail)
    }

    pub fn access_denied(detail: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccessDenied, detail)
    }

    /// Internal failure. The cause is logged, the client gets a generic detail.
    pub fn internal(cause: &dyn std::fmt::Display) -> Self {
        tracing::error!(error = %cause, "Internal error");
        Self::new(ErrorKind::Internal, "An unexpected error occurred")
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    /// Write the problem document.
    fn render(&self) -> Response {
        let status = self.status();
        let body = Json(ProblemBody {
            problem_type: "about:blank",
            title: self.kind.title(),
            status: status.as_u16(),
            detail: &self.detail,
            instance: self.instance.as_deref(),
        });
        let mut response = (status, body).into_response();
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(id) => {
                ApiError::not_found(format!("Member not found with id: {id}"))
            }
            StorageError::EmailTaken => {
                ApiError::conflict("Member creation failed due to a conflict")
            }
            StorageError::PermissionDenied { .. } => {
                ApiError::access_denied("Not authorized to access this member")
            }
            other => ApiError::internal(&other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = self.render();
        // Picked up by `problem_details` to add the request URI
        response.extensions_mut().insert(self);
        response
    }
}

/// Re-render problem responses with `instance` set to the request URI.
pub async fn problem_details(request: Request, next: Next) -> Response {
    let uri = request.uri().to_string();
    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<ApiError>() {
        Some(error) if error.instance.is_none() => error.with_instance(uri).render(),
        Some(error) => error.render(),
        None => response,
    }
}
