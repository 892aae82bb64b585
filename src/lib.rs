// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Member Service - manager-scoped member registry behind JWT bearer auth
//!
//! Managers authenticate with tokens issued by an OpenID Connect provider.
//! Signatures are checked against the issuer's published RSA keys, fetched
//! lazily and cached per key id.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - JWKS key cache, token verification, bearer middleware
//! - `storage` - Member persistence (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
