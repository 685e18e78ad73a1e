// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Student API endpoints.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    api::extract::{ApiPath, ValidatedJson},
    auth::Auth,
    error::{ApiError, ErrorBody},
    models::{CreateStudentRequest, UpdateStudentRequest},
    state::AppState,
    storage::{AntagonisticPair, PairRepository, Student, StudentRepository},
};

#[utoipa::path(
    get,
    path = "/v1/students",
    tag = "Students",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Students ordered by id", body = [Student]),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
pub async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, ApiError> {
    let conn = state.db.lock()?;
    Ok(Json(StudentRepository::new(&conn).list_all()?))
}

/// Get a student by id. Responds `null` when it does not exist.
#[utoipa::path(
    get,
    path = "/v1/students/{id}",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Student id")),
    responses(
        (status = 200, description = "The student, or null", body = Option<Student>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Non-integer id", body = ErrorBody)
    )
)]
pub async fn get_student(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Option<Student>>, ApiError> {
    let conn = state.db.lock()?;
    Ok(Json(StudentRepository::new(&conn).get(id)?))
}

#[utoipa::path(
    post,
    path = "/v1/students",
    tag = "Students",
    security(("bearer_auth" = [])),
    request_body = CreateStudentRequest,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Invalid input", body = ErrorBody)
    )
)]
pub async fn create_student(
    Auth(user): Auth,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateStudentRequest>,
) -> Result<(StatusCode, Json<Student>), ApiError> {
    let conn = state.db.lock()?;
    let student = StudentRepository::new(&conn).create(&request.first_name, &request.last_name)?;
    tracing::info!(student_id = student.id, user_id = %user.user_id, "Student created");
    Ok((StatusCode::CREATED, Json(student)))
}

/// Replace a student's first and last name.
#[utoipa::path(
    put,
    path = "/v1/students/{id}",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Student id")),
    request_body = UpdateStudentRequest,
    responses(
        (status = 200, description = "Updated student", body = Student),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Student not found", body = ErrorBody),
        (status = 422, description = "Invalid input", body = ErrorBody)
    )
)]
pub async fn update_student(
    Auth(user): Auth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<UpdateStudentRequest>,
) -> Result<Json<Student>, ApiError> {
    let conn = state.db.lock()?;
    let student =
        StudentRepository::new(&conn).update(id, &request.first_name, &request.last_name)?;
    tracing::info!(student_id = id, user_id = %user.user_id, "Student updated");
    Ok(Json(student))
}

/// Delete a student, its enrollments and every antagonistic pair naming it.
#[utoipa::path(
    delete,
    path = "/v1/students/{id}",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Student id")),
    responses(
        (status = 200, description = "The deleted student", body = Student),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Student not found", body = ErrorBody)
    )
)]
pub async fn delete_student(
    Auth(user): Auth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Student>, ApiError> {
    let conn = state.db.lock()?;
    let student = StudentRepository::new(&conn).delete(id)?;
    tracing::info!(student_id = id, user_id = %user.user_id, "Student deleted");
    Ok(Json(student))
}

/// Antagonistic pairs naming the student on either side.
#[utoipa::path(
    get,
    path = "/v1/students/{id}/pairs",
    tag = "Students",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Student id")),
    responses(
        (status = 200, description = "Pairs ordered by id", body = [AntagonisticPair]),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Student not found", body = ErrorBody)
    )
)]
pub async fn list_student_pairs(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<AntagonisticPair>>, ApiError> {
    let conn = state.db.lock()?;
    if !StudentRepository::new(&conn).exists(id)? {
        return Err(ApiError::not_found(format!("Student {id} not found")));
    }
    Ok(Json(PairRepository::new(&conn).list_for_student(id)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedUser;
    use crate::test_support::test_state;

    fn caller() -> Auth {
        Auth(AuthenticatedUser {
            user_id: "user_t1".to_string(),
            session_id: None,
            issuer: "test".to_string(),
            expires_at: 0,
        })
    }

    async fn create(state: &AppState, first: &str, last: &str) -> Student {
        let (status, Json(student)) = create_student(
            caller(),
            State(state.clone()),
            ValidatedJson(CreateStudentRequest {
                first_name: first.to_string(),
                last_name: last.to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        student
    }

    #[tokio::test]
    async fn get_delete_get() {
        let state = test_state();
        let student = create(&state, "Sherlock", "Holmes").await;

        let Json(found) = get_student(State(state.clone()), ApiPath(student.id)).await.unwrap();
        assert_eq!(found, Some(student.clone()));

        let Json(deleted) = delete_student(caller(), State(state.clone()), ApiPath(student.id))
            .await
            .unwrap();
        assert_eq!(deleted, student);

        let Json(found) = get_student(State(state), ApiPath(student.id)).await.unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn update_replaces_names() {
        let state = test_state();
        let student = create(&state, "Tony", "Stark").await;

        let Json(updated) = update_student(
            caller(),
            State(state.clone()),
            ApiPath(student.id),
            ValidatedJson(UpdateStudentRequest {
                first_name: "Arya".to_string(),
                last_name: "Stark".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(updated.first_name, "Arya");
        assert_eq!(updated.id, student.id);

        let Json(all) = list_students(State(state)).await.unwrap();
        assert_eq!(all, vec![updated]);
    }

    #[tokio::test]
    async fn delete_removes_pairs_naming_the_student() {
        let state = test_state();
        let holmes = create(&state, "Sherlock", "Holmes").await;
        let moriarty = create(&state, "James", "Moriarty").await;
        {
            let conn = state.db.lock().unwrap();
            PairRepository::new(&conn).create(holmes.id, moriarty.id).unwrap();
        }

        let Json(deleted) = delete_student(caller(), State(state.clone()), ApiPath(holmes.id))
            .await
            .unwrap();
        assert_eq!(deleted, holmes);

        let Json(left) = list_student_pairs(State(state.clone()), ApiPath(moriarty.id))
            .await
            .unwrap();
        assert!(left.is_empty());

        let conn = state.db.lock().unwrap();
        assert!(PairRepository::new(&conn).list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn pairs_are_listed_from_either_side() {
        let state = test_state();
        let holmes = create(&state, "Sherlock", "Holmes").await;
        let moriarty = create(&state, "James", "Moriarty").await;
        let watson = create(&state, "John", "Watson").await;
        let (first, second) = {
            let conn = state.db.lock().unwrap();
            let pairs = PairRepository::new(&conn);
            (
                pairs.create(holmes.id, moriarty.id).unwrap(),
                pairs.create(watson.id, holmes.id).unwrap(),
            )
        };

        let Json(for_holmes) = list_student_pairs(State(state.clone()), ApiPath(holmes.id))
            .await
            .unwrap();
        assert_eq!(for_holmes, vec![first, second]);

        let Json(for_watson) = list_student_pairs(State(state.clone()), ApiPath(watson.id))
            .await
            .unwrap();
        assert_eq!(for_watson, vec![second]);

        let err = list_student_pairs(State(state), ApiPath(999)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_student_update_and_delete_are_not_found() {
        let state = test_state();
        let err = delete_student(caller(), State(state.clone()), ApiPath(1))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err = update_student(
            caller(),
            State(state),
            ApiPath(1),
            ValidatedJson(UpdateStudentRequest {
                first_name: "A".to_string(),
                last_name: "B".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
