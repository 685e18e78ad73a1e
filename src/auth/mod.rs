// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Clerk JWT authentication for the classroom API.
//!
//! ## Auth Flow
//!
//! 1. The web client signs the teacher in with Clerk
//! 2. The client sends `Authorization: Bearer <Clerk JWT>`
//! 3. The server:
//!    - Fetches Clerk JWKS via HTTPS
//!    - Verifies JWT signature, expiry, issuer, audience
//!    - Uses `sub` as the caller's canonical `user_id`
//!
//! Every `/v1` route sits behind [`middleware::require_auth`], so an
//! unauthenticated request is rejected before any body is parsed or any
//! row is touched. Clock skew tolerance is 60 seconds.

pub mod claims;
pub mod error;
pub mod extractor;
pub mod jwks;
pub mod middleware;
pub mod verifier;

pub use claims::AuthenticatedUser;
pub use error::AuthError;
pub use extractor::Auth;
pub use jwks::JwksManager;
pub use verifier::AuthConfig;
