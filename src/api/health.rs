// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Liveness response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Build and key-cache information. Never triggers a JWKS fetch.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InfoResponse {
    pub name: String,
    pub version: String,
    pub issuer: String,
    pub jwks_url: String,
    /// Number of signing keys currently cached.
    pub cached_keys: usize,
}

#[utoipa::path(
    get,
    path = "/actuator/health",
    tag = "Actuator",
    responses((status = 200, body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP".to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/actuator/info",
    tag = "Actuator",
    responses((status = 200, body = InfoResponse))
)]
pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    let keys = state.authenticator.keys();
    Json(InfoResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        issuer: state.issuer_uri.to_string(),
        jwks_url: keys.jwks_url().to_string(),
        cached_keys: keys.len().await,
    })
}
