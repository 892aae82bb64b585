// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token verification against the cached issuer keys.

use std::sync::Arc;

use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use super::{jwks::JwksKeyCache, AuthError, Claims};

/// Verifies bearer tokens and yields their claims.
///
/// Only RSA PKCS#1 signatures are accepted. The algorithm is checked before
/// any key lookup, so a token claiming e.g. `HS256` never gets a chance to
/// be verified with an RSA public key used as an HMAC secret.
pub struct TokenAuthenticator {
    keys: Arc<JwksKeyCache>,
    /// Leeway in seconds for `exp`/`nbf`
    leeway: u64,
}

impl TokenAuthenticator {
    pub fn new(keys: Arc<JwksKeyCache>) -> Self {
        Self { keys, leeway: 0 }
    }

    /// Set the clock skew leeway in seconds.
    pub fn with_leeway(mut self, leeway: u64) -> Self {
        self.leeway = leeway;
        self
    }

    /// The underlying key cache.
    pub fn keys(&self) -> &JwksKeyCache {
        &self.keys
    }

    /// Verify `token` and return its claims.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)
            .map_err(|e| AuthError::MalformedToken(format!("unreadable header: {e}")))?;

        if !is_rsa(header.alg) {
            return Err(AuthError::MalformedToken(format!(
                "unexpected signing method: {:?}",
                header.alg
            )));
        }

        let kid = header
            .kid
            .as_deref()
            .ok_or_else(|| AuthError::MalformedToken("kid header not found".to_string()))?;

        let key = self.keys.lookup(kid).await?;

        let mut validation = Validation::new(header.alg);
        validation.leeway = self.leeway;
        validation.validate_aud = false;
        validation.validate_nbf = true;
        // exp is checked when present, not required
        validation.required_spec_claims.clear();

        let token_data = decode::<Claims>(token, &key.decoding_key(), &validation)
            .map_err(|e| AuthError::MalformedToken(format!("{:?}", e.kind())))?;

        Ok(token_data.claims)
    }
}

fn is_rsa(alg: Algorithm) -> bool {
    matches!(alg, Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use serde_json::json;
    use wiremock::MockServer;

    async fn authenticator(server: &MockServer) -> TokenAuthenticator {
        TokenAuthenticator::new(cache_for(server))
    }

    #[tokio::test]
    async fn accepts_valid_rs256_token() {
        let server = MockServer::start().await;
        mount_jwks(&server, jwks_body(vec![primary_jwk()]), Some(1)).await;
        let auth = authenticator(&server).await;

        let token = sign_primary(&manager_claims("manager-1", &["manager"]));
        let claims = auth.verify(&token).await.unwrap();

        assert_eq!(claims.subject(), Some("manager-1"));
        assert_eq!(claims.authorities(), vec!["ROLE_manager"]);
    }

    #[tokio::test]
    async fn accepts_rs384_and_rs512() {
        let server = MockServer::start().await;
        mount_jwks(&server, jwks_body(vec![primary_jwk()]), Some(1)).await;
        let auth = authenticator(&server).await;
        let claims = manager_claims("manager-1", &[]);

        for alg in [Algorithm::RS384, Algorithm::RS512] {
            let token = sign_rsa(alg, Some(PRIMARY_KID), PRIMARY_PEM, &claims);
            assert!(auth.verify(&token).await.is_ok(), "{alg:?} rejected");
        }
    }

    #[tokio::test]
    async fn rejects_hmac_token_even_with_cached_kid() {
        let server = MockServer::start().await;
        mount_jwks(&server, jwks_body(vec![primary_jwk()]), Some(1)).await;
        let auth = authenticator(&server).await;
        auth.keys().lookup(PRIMARY_KID).await.unwrap();

        let token = sign_hmac(Some(PRIMARY_KID), b"guessable", &manager_claims("m", &[]));
        let result = auth.verify(&token).await;

        assert!(matches!(result, Err(AuthError::MalformedToken(_))));
        assert_eq!(fetch_count(&server).await, 1);
    }

    #[tokio::test]
    async fn rejects_missing_kid_without_fetching() {
        let server = MockServer::start().await;
        mount_jwks(&server, jwks_body(vec![primary_jwk()]), Some(0)).await;
        let auth = authenticator(&server).await;

        let token = sign_rsa(Algorithm::RS256, None, PRIMARY_PEM, &manager_claims("m", &[]));

        assert_eq!(
            auth.verify(&token).await,
            Err(AuthError::MalformedToken("kid header not found".into()))
        );
    }

    #[tokio::test]
    async fn rejects_unknown_kid() {
        let server = MockServer::start().await;
        mount_jwks(&server, jwks_body(vec![primary_jwk()]), Some(1)).await;
        let auth = authenticator(&server).await;

        let token = sign_rsa(Algorithm::RS256, Some("rotated"), PRIMARY_PEM, &manager_claims("m", &[]));

        assert_eq!(
            auth.verify(&token).await,
            Err(AuthError::KeyNotFound("rotated".into()))
        );
    }

    #[tokio::test]
    async fn rejects_signature_from_another_key() {
        let server = MockServer::start().await;
        mount_jwks(&server, jwks_body(vec![primary_jwk(), other_jwk()]), None).await;
        let auth = authenticator(&server).await;

        // Signed with the other private key but claims the primary kid
        let token = sign_rsa(Algorithm::RS256, Some(PRIMARY_KID), OTHER_PEM, &manager_claims("m", &[]));

        assert!(matches!(auth.verify(&token).await, Err(AuthError::MalformedToken(_))));
    }

    #[tokio::test]
    async fn rejects_tampered_payload() {
        let server = MockServer::start().await;
        mount_jwks(&server, jwks_body(vec![primary_jwk()]), None).await;
        let auth = authenticator(&server).await;

        let token = sign_primary(&manager_claims("manager-1", &["viewer"]));
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let forged = manager_claims("manager-1", &["admin"]);
        parts[1] = URL_SAFE_NO_PAD.encode(forged.to_string());

        assert!(matches!(
            auth.verify(&parts.join(".")).await,
            Err(AuthError::MalformedToken(_))
        ));
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let server = MockServer::start().await;
        mount_jwks(&server, jwks_body(vec![primary_jwk()]), None).await;
        let auth = authenticator(&server).await;

        let token = sign_primary(&json!({ "sub": "m", "exp": now() - 600 }));

        assert!(matches!(auth.verify(&token).await, Err(AuthError::MalformedToken(_))));
    }

    #[tokio::test]
    async fn leeway_tolerates_small_skew() {
        let server = MockServer::start().await;
        mount_jwks(&server, jwks_body(vec![primary_jwk()]), None).await;
        let auth = authenticator(&server).await.with_leeway(120);

        let token = sign_primary(&json!({ "sub": "m", "exp": now() - 30 }));

        assert!(auth.verify(&token).await.is_ok());
    }

    #[tokio::test]
    async fn rejects_not_yet_valid_token() {
        let server = MockServer::start().await;
        mount_jwks(&server, jwks_body(vec![primary_jwk()]), None).await;
        let auth = authenticator(&server).await;

        let token = sign_primary(&json!({ "sub": "m", "nbf": now() + 600, "exp": now() + 3600 }));

        assert!(matches!(auth.verify(&token).await, Err(AuthError::MalformedToken(_))));
    }

    #[tokio::test]
    async fn token_without_exp_is_accepted() {
        let server = MockServer::start().await;
        mount_jwks(&server, jwks_body(vec![primary_jwk()]), None).await;
        let auth = authenticator(&server).await;

        let token = sign_primary(&json!({ "sub": "m" }));

        assert!(auth.verify(&token).await.is_ok());
    }

    #[tokio::test]
    async fn rejects_garbage() {
        let server = MockServer::start().await;
        mount_jwks(&server, jwks_body(vec![primary_jwk()]), Some(0)).await;
        let auth = authenticator(&server).await;

        for token in ["", "not-a-jwt", "a.b.c"] {
            assert!(matches!(auth.verify(token).await, Err(AuthError::MalformedToken(_))));
        }
    }

    #[tokio::test]
    async fn rejects_alg_none() {
        let server = MockServer::start().await;
        mount_jwks(&server, jwks_body(vec![primary_jwk()]), Some(0)).await;
        let auth = authenticator(&server).await;

        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","kid":"primary-key"}"#);
        let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"m"}"#);
        let token = format!("{header}.{payload}.");

        assert!(matches!(auth.verify(&token).await, Err(AuthError::MalformedToken(_))));
    }
}
