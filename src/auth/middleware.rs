// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Applied with `route_layer` to the `/v1` router so it only runs for
//! matched routes and always before any extractor reads the body:
//!
//! ```rust,ignore
//! let v1 = Router::new()
//!     .route("/classes", get(list_classes))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), require_auth));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::state::AppState;

/// Reject the request with `401` unless it carries a valid bearer token.
///
/// On success the [`AuthenticatedUser`](super::AuthenticatedUser) is inserted
/// into the request extensions for the [`Auth`](super::Auth) extractor.
pub async fn require_auth(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    match state.auth_config.verify_bearer(request.headers()).await {
        Ok(user) => {
            tracing::Span::current().record("user_id", user.user_id.as_str());
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
