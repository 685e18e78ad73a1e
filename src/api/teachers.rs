// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Teacher API endpoints.
//!
//! Teacher profiles live in the identity provider; responses are always the
//! sanitized [`TeacherProfile`]. The local `teachers` row is kept in step so
//! classes can reference the teacher.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    api::extract::{ApiPath, ValidatedJson},
    auth::Auth,
    error::{ApiError, ErrorBody},
    identity::{IdentityError, NewIdentityUser, TeacherProfile},
    models::{CreateTeacherRequest, UpdateTeacherRequest},
    state::AppState,
    storage::TeacherRepository,
    validation::{is_identity_user_id, FieldError},
};

/// List every teacher known to the identity provider.
#[utoipa::path(
    get,
    path = "/v1/teachers",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Sanitized teacher profiles", body = [TeacherProfile]),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 502, description = "Identity provider unreachable", body = ErrorBody)
    )
)]
pub async fn list_teachers(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeacherProfile>>, ApiError> {
    let users = state.identity.list_users().await?;
    Ok(Json(users.into_iter().map(TeacherProfile::from).collect()))
}

/// The caller's own profile.
#[utoipa::path(
    get,
    path = "/v1/teachers/me",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's profile", body = TeacherProfile),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Caller unknown to the identity provider", body = ErrorBody)
    )
)]
pub async fn get_me(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<TeacherProfile>, ApiError> {
    let profile = state.identity.get_user(&user.user_id).await?;
    Ok(Json(profile.into()))
}

/// Get a teacher's profile by identity-provider id. Responds `null` when unknown.
#[utoipa::path(
    get,
    path = "/v1/teachers/{id}",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Identity-provider user id")),
    responses(
        (status = 200, description = "The profile, or null", body = Option<TeacherProfile>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Malformed user id", body = ErrorBody)
    )
)]
pub async fn get_teacher(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<Option<TeacherProfile>>, ApiError> {
    if !is_identity_user_id(&id) {
        return Err(ApiError::validation(vec![FieldError::new(
            "id",
            "must contain only letters, digits and underscores",
        )]));
    }
    match state.identity.get_user(&id).await {
        Ok(user) => Ok(Json(Some(user.into()))),
        Err(IdentityError::NotFound(_)) => Ok(Json(None)),
        Err(e) => Err(e.into()),
    }
}

/// Provision a teacher account with the identity provider.
#[utoipa::path(
    post,
    path = "/v1/teachers",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    request_body = CreateTeacherRequest,
    responses(
        (status = 201, description = "Account created", body = TeacherProfile),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Invalid input or rejected by the identity provider", body = ErrorBody)
    )
)]
pub async fn create_teacher(
    Auth(user): Auth,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateTeacherRequest>,
) -> Result<(StatusCode, Json<TeacherProfile>), ApiError> {
    let created = state
        .identity
        .create_user(NewIdentityUser {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            school: request.school,
        })
        .await?;

    {
        let conn = state.db.lock()?;
        TeacherRepository::new(&conn).upsert_school(&created.id, created.school())?;
    }

    tracing::info!(teacher_id = %created.id, user_id = %user.user_id, "Teacher account created");
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Update the caller's school.
#[utoipa::path(
    patch,
    path = "/v1/teachers/me",
    tag = "Teachers",
    security(("bearer_auth" = [])),
    request_body = UpdateTeacherRequest,
    responses(
        (status = 200, description = "Caller's updated profile", body = TeacherProfile),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Caller unknown to the identity provider", body = ErrorBody),
        (status = 422, description = "Invalid input", body = ErrorBody)
    )
)]
pub async fn update_me(
    Auth(user): Auth,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<UpdateTeacherRequest>,
) -> Result<Json<TeacherProfile>, ApiError> {
    let updated = state
        .identity
        .update_school(&user.user_id, request.school.as_deref())
        .await?;

    {
        let conn = state.db.lock()?;
        TeacherRepository::new(&conn).upsert_school(&user.user_id, updated.school())?;
    }

    tracing::info!(user_id = %user.user_id, "Teacher school updated");
    Ok(Json(updated.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedUser;
    use crate::identity::{IdentityDirectory, IdentityUser, InMemoryDirectory};
    use crate::storage::Database;

    const T1: &str = "user_2f2DunSM8PXDtKRWsWAcIRIRKzU";

    fn caller(user_id: &str) -> Auth {
        Auth(AuthenticatedUser {
            user_id: user_id.to_string(),
            session_id: None,
            issuer: "test".to_string(),
            expires_at: 0,
        })
    }

    fn state_with_t1() -> AppState {
        let t1: IdentityUser = serde_json::from_value(serde_json::json!({
            "id": T1,
            "first_name": "Minerva",
            "last_name": "McGonagall",
            "public_metadata": { "school": "Hogwarts" },
            "private_metadata": { "note": "secret" },
            "email_addresses": [{ "email_address": "minerva@example.com" }]
        }))
        .unwrap();
        AppState::new(
            Database::open_in_memory().unwrap(),
            IdentityDirectory::InMemory(InMemoryDirectory::with_users([t1])),
        )
    }

    #[tokio::test]
    async fn get_fetches_the_requested_user() {
        let state = state_with_t1();

        let Json(found) = get_teacher(State(state.clone()), ApiPath(T1.to_string()))
            .await
            .unwrap();
        let found = found.unwrap();
        assert_eq!(found.id, T1);
        assert_eq!(found.public_metadata["school"], "Hogwarts");

        let Json(missing) = get_teacher(State(state), ApiPath("user_missing".to_string()))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn get_rejects_malformed_ids_before_lookup() {
        let state = state_with_t1();
        for id in ["../../v1/organizations/org_secret", "x?limit=1", ""] {
            let err = get_teacher(State(state.clone()), ApiPath(id.to_string()))
                .await
                .unwrap_err();
            assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY, "{id}");
            assert_eq!(
                err.details,
                Some(vec![FieldError::new(
                    "id",
                    "must contain only letters, digits and underscores"
                )])
            );
        }
    }

    #[tokio::test]
    async fn me_returns_the_caller() {
        let state = state_with_t1();
        let Json(me) = get_me(caller(T1), State(state.clone())).await.unwrap();
        assert_eq!(me.first_name.as_deref(), Some("Minerva"));

        let err = get_me(caller("user_stranger"), State(state)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn create_provisions_account_and_local_row() {
        let state = state_with_t1();
        let (status, Json(profile)) = create_teacher(
            caller(T1),
            State(state.clone()),
            ValidatedJson(CreateTeacherRequest {
                first_name: "Severus".to_string(),
                last_name: "Snape".to_string(),
                email: "snape@example.com".to_string(),
                school: Some("Hogwarts".to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(profile.public_metadata["school"], "Hogwarts");

        let conn = state.db.lock().unwrap();
        let record = TeacherRepository::new(&conn).get(&profile.id).unwrap().unwrap();
        assert_eq!(record.school.as_deref(), Some("Hogwarts"));
    }

    #[tokio::test]
    async fn duplicate_email_passes_provider_error_through() {
        let state = state_with_t1();
        let err = create_teacher(
            caller(T1),
            State(state),
            ValidatedJson(CreateTeacherRequest {
                first_name: "Other".to_string(),
                last_name: "Minerva".to_string(),
                email: "minerva@example.com".to_string(),
                school: None,
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code, "identity_provider_error");
    }

    #[tokio::test]
    async fn update_targets_the_caller() {
        let state = state_with_t1();
        let Json(updated) = update_me(
            caller(T1),
            State(state.clone()),
            ValidatedJson(UpdateTeacherRequest {
                school: Some("Beauxbatons".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.id, T1);
        assert_eq!(updated.public_metadata["school"], "Beauxbatons");

        let conn = state.db.lock().unwrap();
        let record = TeacherRepository::new(&conn).get(T1).unwrap().unwrap();
        assert_eq!(record.school.as_deref(), Some("Beauxbatons"));
    }

    #[tokio::test]
    async fn list_returns_sanitized_profiles() {
        let state = state_with_t1();
        let Json(all) = list_teachers(State(state)).await.unwrap();
        assert_eq!(all.len(), 1);

        let body = serde_json::to_value(&all[0]).unwrap();
        assert!(body.get("private_metadata").is_none());
        assert!(body.get("email_addresses").is_none());
    }
}
