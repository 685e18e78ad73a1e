// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::auth::AuthConfig;
use crate::identity::IdentityDirectory;
use crate::storage::Database;

/// Shared handles for every request.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth_config: AuthConfig,
    pub identity: IdentityDirectory,
}

impl AppState {
    /// State in development auth mode.
    pub fn new(db: Database, identity: IdentityDirectory) -> Self {
        Self {
            db,
            auth_config: AuthConfig::development(),
            identity,
        }
    }

    pub fn with_auth_config(mut self, auth_config: AuthConfig) -> Self {
        self.auth_config = auth_config;
        self
    }
}
