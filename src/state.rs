// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{auth::TokenAuthenticator, storage::MemberDatabase};

#[derive(Clone)]
pub struct AppState {
    pub members: Arc<MemberDatabase>,
    /// Shared with the authentication middleware; exposes the key cache to `/actuator/info`.
    pub authenticator: Arc<TokenAuthenticator>,
    pub issuer_uri: Arc<str>,
}

impl AppState {
    pub fn new(
        members: MemberDatabase,
        authenticator: Arc<TokenAuthenticator>,
        issuer_uri: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            members: Arc::new(members),
            authenticator,
            issuer_uri: issuer_uri.into(),
        }
    }
}
