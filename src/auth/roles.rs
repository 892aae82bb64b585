// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Realm roles projected into authority strings.

use serde_json::{Map, Value};

/// Marker prepended to every realm role.
pub const ROLE_PREFIX: &str = "ROLE_";

/// Project `realm_access.roles` into `ROLE_`-prefixed authorities.
///
/// Any shape mismatch along the way yields an empty list. Non-string roles
/// are skipped; order is preserved.
pub fn extract_authorities(claims: &Map<String, Value>) -> Vec<String> {
    claims
        .get("realm_access")
        .and_then(Value::as_object)
        .and_then(|realm_access| realm_access.get("roles"))
        .and_then(Value::as_array)
        .map(|roles| {
            roles
                .iter()
                .filter_map(Value::as_str)
                .map(|role| format!("{ROLE_PREFIX}{role}"))
                .collect()
        })
        .unwrap_or_default()
}
