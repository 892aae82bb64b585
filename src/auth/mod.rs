// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! JWT bearer authentication against the issuer's published RSA keys.
//!
//! ## Auth Flow
//!
//! 1. Client sends `Authorization: Bearer <JWT>`
//! 2. Middleware skips the public documentation and actuator paths
//! 3. Token header must declare RS256/RS384/RS512 and carry a `kid`
//! 4. The key for `kid` comes from the JWKS cache, which refreshes once on a miss
//! 5. Verified claims go into the request extensions
//! 6. Handlers extract a [`Principal`]:
//!    - `sub` → manager ID
//!    - `realm_access.roles` → `ROLE_` authorities
//!
//! ## Security
//!
//! - Every failure is answered with the same `401 {"error":"Unauthorized"}`
//! - The JWKS URL is derived from the issuer URI, never configured separately
//! - Cached keys are never evicted

pub mod claims;
pub mod error;
pub mod extractor;
pub mod jwks;
pub mod middleware;
pub mod roles;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_support;

pub use claims::{Claims, Principal};
pub use error::AuthError;
pub use jwks::JwksKeyCache;
pub use middleware::authenticate;
pub use validator::TokenAuthenticator;
