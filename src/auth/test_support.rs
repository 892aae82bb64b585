// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared fixtures for auth tests: RSA signing keys, token minting and a
//! mocked JWKS endpoint.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::jwks::JwksKeyCache;

/// Realm path the mocked issuer lives under.
pub const REALM_PATH: &str = "/realms/test-realm";

/// Path the cache is expected to fetch from.
pub const CERTS_PATH: &str = "/realms/test-realm/protocol/openid-connect/certs";

pub const PRIMARY_KID: &str = "primary-key";
pub const PRIMARY_PEM: &str = include_str!("testdata/rsa_private.pem");
pub const PRIMARY_N: &str = "wuczAF4hZjLpXftmkAiC1d12StGqdYlca7puboFeX-QEe5hegmp8XR55QE78IhUawRtRKpV74yxTdnE4KMma5u-Z7LqTmzkdarMJW_pS5bf4V_bFBBjydTVyQVMmFvoNG7UzlJN1JY2eyFRGgjBiRJjzv1G2hEtED6LP0BRbDQjGmGMMU7oKzoGkLJOoTvGc2DZb-z_H7Ft65kkFjXC9N3svVxZizFUY9hf3rgbyf8Pfg-Y2kbwHTzx2daqv4RBgUaaecwoen-8XQdbJj3FDOhZ_kHXFBlsTu0MpxZEyq_xaP-S-ib0it3mYRYCneGm0Eq-etMIEG1u2FpmwvgGNAw";

pub const OTHER_KID: &str = "other-key";
pub const OTHER_PEM: &str = include_str!("testdata/rsa_private_other.pem");
pub const OTHER_N: &str = "3ZZEFDIPcgXaUkXjBudXoNwsq8HzIUhkhbyBgvYyg7JeTLHA1UC-gzGpmXg_25pdrL7eAMOutLH17hsXlCEk5adcIczGFA25V7RPuxFWiziF8oD5hXl4I9p77LbLFLkqMT4ziOlcKdDm-RbzBTYtXoznV3JlhxtfaDb0LkiSQPicWUBiDhZEr0r-IM0MJrpkLzYmUKNhkgRA8sHz-_w1WSyMIE5P87Qt_WgLHeITevDkpvSn-XNeKFNwLietjnpHEQ0UMu-Qct9URuZYYcRC_W1XcyeyFY1OgafFsPCB8xpZTWGoJQEv7Fay46-cknZc6TffEwk1r7KV4I7LPbXfoQ";

/// 65537, the usual RSA public exponent.
pub const EXPONENT_AQAB: &str = "AQAB";

pub fn jwk(kid: &str, n: &str, e: &str) -> Value {
    json!({ "kty": "RSA", "alg": "RS256", "use": "sig", "kid": kid, "n": n, "e": e })
}

pub fn primary_jwk() -> Value {
    jwk(PRIMARY_KID, PRIMARY_N, EXPONENT_AQAB)
}

pub fn other_jwk() -> Value {
    jwk(OTHER_KID, OTHER_N, EXPONENT_AQAB)
}

pub fn jwks_body(keys: Vec<Value>) -> Value {
    json!({ "keys": keys })
}

/// Mount a JWKS document on the mock server, optionally asserting how many
/// times it gets fetched (checked when the server is dropped).
pub async fn mount_jwks(server: &MockServer, body: Value, expected_fetches: Option<u64>) {
    let mock = Mock::given(method("GET"))
        .and(path(CERTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body));
    let mock = match expected_fetches {
        Some(n) => mock.expect(n),
        None => mock,
    };
    mock.mount(server).await;
}

pub fn issuer_for(server: &MockServer) -> String {
    format!("{}{REALM_PATH}", server.uri())
}

pub fn cache_for(server: &MockServer) -> Arc<JwksKeyCache> {
    Arc::new(JwksKeyCache::for_issuer(
        &issuer_for(server),
        Duration::from_secs(2),
    ))
}

pub async fn fetch_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or_default()
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Claims for a token issued to `manager` that is valid for an hour.
pub fn manager_claims(manager: &str, roles: &[&str]) -> Value {
    json!({
        "sub": manager,
        "iat": now(),
        "exp": now() + 3600,
        "realm_access": { "roles": roles },
    })
}

pub fn sign_rsa(alg: Algorithm, kid: Option<&str>, pem: &str, claims: &Value) -> String {
    let mut header = Header::new(alg);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).expect("test key parses");
    encode(&header, claims, &key).expect("token encodes")
}

pub fn sign_primary(claims: &Value) -> String {
    sign_rsa(Algorithm::RS256, Some(PRIMARY_KID), PRIMARY_PEM, claims)
}

pub fn sign_hmac(kid: Option<&str>, secret: &[u8], claims: &Value) -> String {
    let mut header = Header::new(Algorithm::HS256);
    header.kid = kid.map(str::to_string);
    encode(&header, claims, &EncodingKey::from_secret(secret)).expect("token encodes")
}
