// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified token claims and the authenticated principal derived from them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::roles::extract_authorities;

/// Decoded payload of a verified token.
///
/// Kept as a loose claim map: the middleware only guarantees the signature,
/// each consumer reads the claims it needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(Map<String, Value>);

impl Claims {
    pub fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// String value of a claim, if present and a string.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Subject (`sub`) of the token.
    pub fn subject(&self) -> Option<&str> {
        self.get_str("sub")
    }

    /// `ROLE_`-prefixed realm roles; empty when the token carries none.
    pub fn authorities(&self) -> Vec<String> {
        extract_authorities(&self.0)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(claims: Map<String, Value>) -> Self {
        Self(claims)
    }
}

/// The caller of a member endpoint.
///
/// Members are scoped to the manager identified by the token subject.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    /// Manager identifier (`sub` claim)
    pub manager_id: String,
    /// Realm roles as `ROLE_` authorities
    pub authorities: Vec<String>,
    /// Full claim set
    pub claims: Claims,
}

impl Principal {
    /// Build from verified claims. `None` if the subject is missing or empty.
    pub fn from_claims(claims: Claims) -> Option<Self> {
        let manager_id = claims.subject().filter(|sub| !sub.is_empty())?.to_string();
        let authorities = claims.authorities();
        Some(Self {
            manager_id,
            authorities,
            claims,
        })
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a == authority)
    }
}
