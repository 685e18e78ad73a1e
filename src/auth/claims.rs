// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims read from a Clerk session token.
///
/// See: https://clerk.com/docs/backend-requests/handling/manual-jwt
#[derive(Debug, Clone, Deserialize)]
pub struct ClerkClaims {
    /// Subject (user ID) - the canonical Clerk user identifier
    #[serde(default)]
    pub sub: String,

    #[serde(default)]
    pub iat: i64,

    /// Expiration timestamp
    #[serde(default)]
    pub exp: i64,

    #[serde(default)]
    pub nbf: Option<i64>,

    /// Issuer (the Clerk frontend API URL)
    #[serde(default)]
    pub iss: String,

    /// Audience; validated by `jsonwebtoken` when configured
    #[serde(default)]
    pub aud: Option<serde_json::Value>,

    /// Clerk session ID
    #[serde(default)]
    pub sid: Option<String>,

    /// Authorized party
    #[serde(default)]
    pub azp: Option<String>,
}

/// Authenticated caller extracted from a verified JWT.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Canonical user ID (Clerk `sub` claim)
    pub user_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(skip)]
    pub issuer: String,

    /// Token expiration (Unix timestamp)
    #[serde(skip)]
    pub expires_at: i64,
}

impl AuthenticatedUser {
    /// Build from verified claims. `sub` must already be checked non-empty.
    pub fn from_claims(claims: ClerkClaims) -> Self {
        Self {
            user_id: claims.sub,
            session_id: claims.sid,
            issuer: claims.iss,
            expires_at: claims.exp,
        }
    }
}
