// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and RSA key caching.
//!
//! ## Behaviour
//!
//! - The JWKS URL is derived from the issuer URI, never configured directly
//! - Keys are cached by `kid` for the lifetime of the process
//! - A lookup miss triggers exactly one refresh before giving up
//! - Entries that cannot be decoded are skipped, the rest are still cached
//!
//! The network call never holds the cache lock. The write lock is taken
//! once per refresh to publish the decoded batch, so concurrent misses may
//! each refresh; the last writer wins per `kid`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use base64ct::{Base64UrlUnpadded, Encoding};
use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use tokio::sync::RwLock;

use super::error::AuthError;

/// Well-known path appended to the issuer URI to reach its key set.
pub const JWKS_PATH_SUFFIX: &str = "/protocol/openid-connect/certs";

/// Default upper bound on a single JWKS fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Derive the JWKS URL from an issuer URI.
pub fn jwks_url_for_issuer(issuer_uri: &str) -> String {
    format!("{}{JWKS_PATH_SUFFIX}", issuer_uri.trim_end_matches('/'))
}

/// Key set document as published by the issuer.
#[derive(Debug, Clone, Deserialize)]
pub struct JwksDocument {
    pub keys: Vec<JwkEntry>,
}

/// One entry of the key set. Only the RSA fields are read; entries for
/// other key types simply have empty `n`/`e` and get skipped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JwkEntry {
    #[serde(default)]
    pub kid: String,
    #[serde(default)]
    pub n: String,
    #[serde(default)]
    pub e: String,
}

/// RSA public key as two big-endian unsigned integers without leading zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaPublicKey {
    modulus: Vec<u8>,
    exponent: Vec<u8>,
}

impl RsaPublicKey {
    /// Decode a JWKS entry, or `None` if it is unusable.
    pub fn from_jwk(entry: &JwkEntry) -> Option<Self> {
        if entry.n.is_empty() || entry.e.is_empty() {
            return None;
        }
        let n_bytes = Base64UrlUnpadded::decode_vec(&entry.n).ok()?;
        let e_bytes = Base64UrlUnpadded::decode_vec(&entry.e).ok()?;

        let modulus = big_endian_uint(&n_bytes);
        let exponent = big_endian_uint(&e_bytes);
        if modulus.is_empty() || exponent.is_empty() {
            return None;
        }

        Some(Self { modulus, exponent })
    }

    pub fn modulus(&self) -> &[u8] {
        &self.modulus
    }

    pub fn exponent(&self) -> &[u8] {
        &self.exponent
    }

    /// Verification key for `jsonwebtoken`.
    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_rsa_raw_components(&self.modulus, &self.exponent)
    }
}

/// Build an unsigned integer from big-endian bytes by shifting the
/// accumulator left one byte and OR-ing in the next, for any width.
///
/// The result is big-endian with no leading zero bytes; zero is empty.
fn big_endian_uint(bytes: &[u8]) -> Vec<u8> {
    let mut acc: Vec<u8> = Vec::with_capacity(bytes.len());
    for &byte in bytes {
        // acc = (acc << 8) | byte
        if acc.is_empty() && byte == 0 {
            continue;
        }
        acc.push(byte);
    }
    acc
}

/// Process-wide cache of issuer signing keys, keyed by `kid`.
///
/// Constructed once at startup and shared behind an `Arc`.
pub struct JwksKeyCache {
    /// Derived JWKS endpoint
    jwks_url: String,
    /// Bound on one fetch; timeouts surface as `AuthError::Network`
    fetch_timeout: Duration,
    /// Cached keys. Never evicted.
    keys: RwLock<HashMap<String, Arc<RsaPublicKey>>>,
    /// HTTP client
    client: reqwest::Client,
}

impl JwksKeyCache {
    /// Create a cache for the issuer's key set.
    pub fn for_issuer(issuer_uri: &str, fetch_timeout: Duration) -> Self {
        Self {
            jwks_url: jwks_url_for_issuer(issuer_uri),
            fetch_timeout,
            keys: RwLock::new(HashMap::new()),
            client: reqwest::Client::new(),
        }
    }

    /// Get the JWKS URL.
    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    /// Number of keys currently cached.
    pub async fn len(&self) -> usize {
        self.keys.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.keys.read().await.is_empty()
    }

    /// Sorted key IDs currently cached.
    pub async fn key_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.keys.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    async fn cached(&self, kid: &str) -> Option<Arc<RsaPublicKey>> {
        self.keys.read().await.get(kid).cloned()
    }

    /// Resolve the key for `kid`, refreshing once on a miss.
    pub async fn lookup(&self, kid: &str) -> Result<Arc<RsaPublicKey>, AuthError> {
        if let Some(key) = self.cached(kid).await {
            tracing::trace!(kid, "JWKS cache hit");
            return Ok(key);
        }

        tracing::debug!(kid, "JWKS cache miss, refreshing");
        self.refresh().await?;

        self.cached(kid).await.ok_or_else(|| {
            tracing::warn!(kid, "Key not found in JWKS after refresh");
            AuthError::KeyNotFound(kid.to_string())
        })
    }

    /// Fetch the key set and publish every decodable RSA key.
    ///
    /// Returns how many keys were published by this refresh.
    pub async fn refresh(&self) -> Result<usize, AuthError> {
        let document = self.fetch_document().await?;
        let total = document.keys.len();

        let decoded: Vec<(String, Arc<RsaPublicKey>)> = document
            .keys
            .iter()
            .filter_map(|entry| match RsaPublicKey::from_jwk(entry) {
                Some(key) => Some((entry.kid.clone(), Arc::new(key))),
                None => {
                    tracing::debug!(kid = %entry.kid, "Skipping undecodable JWKS entry");
                    None
                }
            })
            .collect();
        let published = decoded.len();

        {
            let mut keys = self.keys.write().await;
            keys.extend(decoded);
        }

        tracing::info!(
            url = %self.jwks_url,
            published,
            skipped = total - published,
            "JWKS cache refreshed"
        );

        Ok(published)
    }

    /// Fetch and parse the JWKS document.
    async fn fetch_document(&self) -> Result<JwksDocument, AuthError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .timeout(self.fetch_timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(url = %self.jwks_url, error = %e, "Failed to fetch JWKS");
                AuthError::Network(e.to_string())
            })?;

        if !response.status().is_success() {
            tracing::warn!(
                url = %self.jwks_url,
                status = %response.status(),
                "JWKS endpoint returned error"
            );
            return Err(AuthError::Network(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::warn!(url = %self.jwks_url, error = %e, "Failed to read JWKS response");
            AuthError::Network(e.to_string())
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::warn!(url = %self.jwks_url, error = %e, "Failed to parse JWKS response");
            AuthError::Parse(e.to_string())
        })
    }
}
