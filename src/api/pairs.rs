// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Antagonistic pair API endpoints.
//!
//! A pair records two students who must not be seated together. Self-pairs,
//! unknown students and pairs that already exist in either order are
//! rejected with `409 conflict`.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    api::extract::{ApiPath, ValidatedJson},
    auth::Auth,
    error::{ApiError, ErrorBody},
    models::CreatePairRequest,
    state::AppState,
    storage::{AntagonisticPair, PairRepository},
};

#[utoipa::path(
    get,
    path = "/v1/pairs",
    tag = "Pairs",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Pairs ordered by id", body = [AntagonisticPair]),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
pub async fn list_pairs(
    State(state): State<AppState>,
) -> Result<Json<Vec<AntagonisticPair>>, ApiError> {
    let conn = state.db.lock()?;
    Ok(Json(PairRepository::new(&conn).list_all()?))
}

/// Get a pair by id. Responds `null` when it does not exist.
#[utoipa::path(
    get,
    path = "/v1/pairs/{id}",
    tag = "Pairs",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Pair id")),
    responses(
        (status = 200, description = "The pair, or null", body = Option<AntagonisticPair>),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
pub async fn get_pair(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Option<AntagonisticPair>>, ApiError> {
    let conn = state.db.lock()?;
    Ok(Json(PairRepository::new(&conn).get(id)?))
}

#[utoipa::path(
    post,
    path = "/v1/pairs",
    tag = "Pairs",
    security(("bearer_auth" = [])),
    request_body = CreatePairRequest,
    responses(
        (status = 201, description = "Pair recorded", body = AntagonisticPair),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 409, description = "Self-pair, unknown student or duplicate pair", body = ErrorBody),
        (status = 422, description = "Invalid input", body = ErrorBody)
    )
)]
pub async fn create_pair(
    Auth(user): Auth,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreatePairRequest>,
) -> Result<(StatusCode, Json<AntagonisticPair>), ApiError> {
    let conn = state.db.lock()?;
    let pair = PairRepository::new(&conn)
        .create(request.first_student_id, request.second_student_id)?;
    tracing::info!(
        pair_id = pair.id,
        first_student_id = pair.first_student_id,
        second_student_id = pair.second_student_id,
        user_id = %user.user_id,
        "Antagonistic pair recorded"
    );
    Ok((StatusCode::CREATED, Json(pair)))
}

#[utoipa::path(
    delete,
    path = "/v1/pairs/{id}",
    tag = "Pairs",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Pair id")),
    responses(
        (status = 200, description = "The deleted pair", body = AntagonisticPair),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Pair not found", body = ErrorBody)
    )
)]
pub async fn delete_pair(
    Auth(user): Auth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<AntagonisticPair>, ApiError> {
    let conn = state.db.lock()?;
    let pair = PairRepository::new(&conn).delete(id)?;
    tracing::info!(pair_id = id, user_id = %user.user_id, "Antagonistic pair removed");
    Ok(Json(pair))
}
