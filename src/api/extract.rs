// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Extractors that report bad input as `422 validation_failed`.
//!
//! Axum's stock rejections answer with plain-text 400/415/422 bodies. These
//! wrappers keep the JSON error shape used everywhere else.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::validation::{FieldError, Validate};

/// JSON body that has been decoded and passed [`Validate`].
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate().map(ValidatedJson).map_err(ApiError::validation)
    }
}

/// Path parameters; a non-integer id is a validation failure.
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| ApiPath(value))
            .map_err(path_rejection)
    }
}

/// Query string parameters.
pub struct ApiQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| ApiQuery(value))
            .map_err(query_rejection)
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    let text = rejection.body_text();
    let field = match &rejection {
        JsonRejection::JsonDataError(_) => field_from_serde_message(&text),
        _ => "body".to_string(),
    };
    ApiError::validation(vec![FieldError::new(field, text)])
}

fn path_rejection(rejection: PathRejection) -> ApiError {
    ApiError::validation(vec![FieldError::new("path", rejection.body_text())])
}

fn query_rejection(rejection: QueryRejection) -> ApiError {
    ApiError::validation(vec![FieldError::new("query", rejection.body_text())])
}

/// Best-effort field name from a serde data error.
///
/// Handles `missing field `x``, `unknown field `x`` and the
/// `path.to.x: invalid type ...` prefix added by `serde_path_to_error`.
fn field_from_serde_message(text: &str) -> String {
    let detail = text
        .split_once("target type: ")
        .map_or(text, |(_, rest)| rest);

    for marker in ["missing field `", "unknown field `"] {
        if let Some((_, rest)) = detail.split_once(marker) {
            if let Some((field, _)) = rest.split_once('`') {
                return field.to_string();
            }
        }
    }

    match detail.split_once(": ") {
        Some((path, _)) if !path.is_empty() && !path.contains(char::is_whitespace) => {
            path.to_string()
        }
        _ => "body".to_string(),
    }
}
