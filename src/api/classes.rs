// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Class API endpoints, including enrollment.
//!
//! Any authenticated teacher may read or modify any class. On create, the
//! caller becomes both the assigned teacher and the creator.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    api::extract::{ApiPath, ApiQuery, ValidatedJson},
    auth::Auth,
    error::{ApiError, ErrorBody},
    models::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
    state::AppState,
    storage::{Class, ClassRepository, EnrollmentRepository, NewClass, Student, TeacherRepository},
};

/// List classes.
///
/// Returns every class, or with `mine=true` only those where the caller is
/// the teacher or the creator.
#[utoipa::path(
    get,
    path = "/v1/classes",
    tag = "Classes",
    security(("bearer_auth" = [])),
    params(ClassListQuery),
    responses(
        (status = 200, description = "Classes ordered by id", body = [Class]),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    )
)]
pub async fn list_classes(
    Auth(user): Auth,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ClassListQuery>,
) -> Result<Json<Vec<Class>>, ApiError> {
    let conn = state.db.lock()?;
    let repo = ClassRepository::new(&conn);
    let classes = if query.mine.unwrap_or(false) {
        repo.list_for_user(&user.user_id)?
    } else {
        repo.list_all()?
    };
    Ok(Json(classes))
}

/// Get a class by id. Responds `null` when it does not exist.
#[utoipa::path(
    get,
    path = "/v1/classes/{id}",
    tag = "Classes",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Class id")),
    responses(
        (status = 200, description = "The class, or null", body = Option<Class>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Non-integer id", body = ErrorBody)
    )
)]
pub async fn get_class(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Option<Class>>, ApiError> {
    let conn = state.db.lock()?;
    Ok(Json(ClassRepository::new(&conn).get(id)?))
}

/// Create a class taught and created by the caller.
#[utoipa::path(
    post,
    path = "/v1/classes",
    tag = "Classes",
    security(("bearer_auth" = [])),
    request_body = CreateClassRequest,
    responses(
        (status = 201, description = "Class created", body = Class),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 422, description = "Invalid input", body = ErrorBody)
    )
)]
pub async fn create_class(
    Auth(user): Auth,
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateClassRequest>,
) -> Result<(StatusCode, Json<Class>), ApiError> {
    if let Some(requested) = request.teacher_id.as_deref() {
        if requested != user.user_id {
            tracing::debug!(
                requested_teacher = %requested,
                user_id = %user.user_id,
                "Ignoring teacher_id; the caller becomes the class teacher"
            );
        }
    }

    let conn = state.db.lock()?;
    TeacherRepository::new(&conn).ensure(&user.user_id)?;
    let class = ClassRepository::new(&conn).create(&NewClass {
        name: &request.name,
        teacher_id: &user.user_id,
        creator_id: &user.user_id,
    })?;

    tracing::info!(class_id = class.id, user_id = %user.user_id, "Class created");
    Ok((StatusCode::CREATED, Json(class)))
}

/// Rename a class.
#[utoipa::path(
    put,
    path = "/v1/classes/{id}",
    tag = "Classes",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Class id")),
    request_body = UpdateClassRequest,
    responses(
        (status = 200, description = "Updated class", body = Class),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Class not found", body = ErrorBody),
        (status = 422, description = "Invalid input", body = ErrorBody)
    )
)]
pub async fn update_class(
    Auth(user): Auth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ValidatedJson(request): ValidatedJson<UpdateClassRequest>,
) -> Result<Json<Class>, ApiError> {
    let conn = state.db.lock()?;
    let class = ClassRepository::new(&conn).update_name(id, &request.name)?;
    tracing::info!(class_id = id, user_id = %user.user_id, "Class renamed");
    Ok(Json(class))
}

/// Delete a class and its enrollments.
#[utoipa::path(
    delete,
    path = "/v1/classes/{id}",
    tag = "Classes",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Class id")),
    responses(
        (status = 200, description = "The deleted class", body = Class),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Class not found", body = ErrorBody)
    )
)]
pub async fn delete_class(
    Auth(user): Auth,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Class>, ApiError> {
    let conn = state.db.lock()?;
    let class = ClassRepository::new(&conn).delete(id)?;
    tracing::info!(class_id = id, user_id = %user.user_id, "Class deleted");
    Ok(Json(class))
}

/// Students enrolled in a class.
#[utoipa::path(
    get,
    path = "/v1/classes/{id}/students",
    tag = "Classes",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Class id")),
    responses(
        (status = 200, description = "Enrolled students ordered by id", body = [Student]),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Class not found", body = ErrorBody)
    )
)]
pub async fn list_class_students(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let conn = state.db.lock()?;
    if !ClassRepository::new(&conn).exists(id)? {
        return Err(ApiError::not_found(format!("Class {id} not found")));
    }
    Ok(Json(EnrollmentRepository::new(&conn).students_in_class(id)?))
}

/// Enroll a student in a class. Enrolling twice is a no-op.
#[utoipa::path(
    put,
    path = "/v1/classes/{id}/students/{student_id}",
    tag = "Classes",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Class id"),
        ("student_id" = i64, Path, description = "Student id")
    ),
    responses(
        (status = 200, description = "Enrolled students after the change", body = [Student]),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Class or student not found", body = ErrorBody)
    )
)]
pub async fn enroll_student(
    Auth(user): Auth,
    State(state): State<AppState>,
    ApiPath((id, student_id)): ApiPath<(i64, i64)>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let conn = state.db.lock()?;
    let enrollments = EnrollmentRepository::new(&conn);
    if enrollments.enroll(id, student_id)? {
        tracing::info!(class_id = id, student_id, user_id = %user.user_id, "Student enrolled");
    }
    Ok(Json(enrollments.students_in_class(id)?))
}

/// Remove a student from a class.
#[utoipa::path(
    delete,
    path = "/v1/classes/{id}/students/{student_id}",
    tag = "Classes",
    security(("bearer_auth" = [])),
    params(
        ("id" = i64, Path, description = "Class id"),
        ("student_id" = i64, Path, description = "Student id")
    ),
    responses(
        (status = 200, description = "Enrolled students after the change", body = [Student]),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Enrollment not found", body = ErrorBody)
    )
)]
pub async fn unenroll_student(
    Auth(user): Auth,
    State(state): State<AppState>,
    ApiPath((id, student_id)): ApiPath<(i64, i64)>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let conn = state.db.lock()?;
    let enrollments = EnrollmentRepository::new(&conn);
    enrollments.unenroll(id, student_id)?;
    tracing::info!(class_id = id, student_id, user_id = %user.user_id, "Student unenrolled");
    Ok(Json(enrollments.students_in_class(id)?))
}
