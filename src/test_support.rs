// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared helpers for unit tests.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};

use crate::identity::{IdentityDirectory, InMemoryDirectory};
use crate::state::AppState;
use crate::storage::Database;

/// In-memory database, in-memory identity directory, development auth.
pub fn test_state() -> AppState {
    let db = Database::open_in_memory().expect("open in-memory database");
    AppState::new(db, IdentityDirectory::InMemory(InMemoryDirectory::new()))
}

/// Unsigned JWT with the given claims JSON (development mode only).
pub fn dev_token_with_claims(claims: &str) -> String {
    let header = r#"{"alg":"RS256","typ":"JWT"}"#;
    let header_b64 = URL_SAFE_NO_PAD.encode(header.as_bytes());
    let claims_b64 = URL_SAFE_NO_PAD.encode(claims.as_bytes());
    format!("{header_b64}.{claims_b64}.fake_signature")
}

/// Unsigned JWT for `user_id` that expires far in the future.
pub fn dev_token(user_id: &str) -> String {
    dev_token_with_claims(&format!(
        r#"{{"sub":"{user_id}","iat":1609459200,"exp":9999999999,"iss":"test","sid":"sess_test"}}"#
    ))
}
