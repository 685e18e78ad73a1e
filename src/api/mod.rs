// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::Request,
    middleware::from_fn_with_state,
    routing::{get, put},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::middleware::require_auth,
    error::ErrorBody,
    identity::TeacherProfile,
    models::{
        CreateClassRequest, CreatePairRequest, CreateStudentRequest, CreateTeacherRequest,
        UpdateClassRequest, UpdateStudentRequest, UpdateTeacherRequest,
    },
    state::AppState,
    storage::{AntagonisticPair, Class, Student},
    validation::FieldError,
};

pub mod classes;
pub mod extract;
pub mod health;
pub mod pairs;
pub mod students;
pub mod teachers;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route(
            "/classes",
            get(classes::list_classes).post(classes::create_class),
        )
        .route(
            "/classes/{id}",
            get(classes::get_class)
                .put(classes::update_class)
                .delete(classes::delete_class),
        )
        .route("/classes/{id}/students", get(classes::list_class_students))
        .route(
            "/classes/{id}/students/{student_id}",
            put(classes::enroll_student).delete(classes::unenroll_student),
        )
        .route(
            "/students",
            get(students::list_students).post(students::create_student),
        )
        .route(
            "/students/{id}",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
        .route("/students/{id}/pairs", get(students::list_student_pairs))
        .route(
            "/teachers",
            get(teachers::list_teachers).post(teachers::create_teacher),
        )
        .route(
            "/teachers/me",
            get(teachers::get_me).patch(teachers::update_me),
        )
        .route("/teachers/{id}", get(teachers::get_teacher))
        .route("/pairs", get(pairs::list_pairs).post(pairs::create_pair))
        .route(
            "/pairs/{id}",
            get(pairs::get_pair).delete(pairs::delete_pair),
        )
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness));

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

/// Request span; `user_id` is filled in by the auth middleware.
fn make_request_span(request: &Request<Body>) -> tracing::Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "http_request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
        user_id = tracing::field::Empty,
    )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        health::liveness,
        health::readiness,
        classes::list_classes,
        classes::get_class,
        classes::create_class,
        classes::update_class,
        classes::delete_class,
        classes::list_class_students,
        classes::enroll_student,
        classes::unenroll_student,
        students::list_students,
        students::get_student,
        students::create_student,
        students::update_student,
        students::delete_student,
        students::list_student_pairs,
        teachers::list_teachers,
        teachers::get_me,
        teachers::get_teacher,
        teachers::create_teacher,
        teachers::update_me,
        pairs::list_pairs,
        pairs::get_pair,
        pairs::create_pair,
        pairs::delete_pair
    ),
    components(
        schemas(
            Class,
            Student,
            AntagonisticPair,
            TeacherProfile,
            CreateClassRequest,
            UpdateClassRequest,
            CreateStudentRequest,
            UpdateStudentRequest,
            CreateTeacherRequest,
            UpdateTeacherRequest,
            CreatePairRequest,
            ErrorBody,
            FieldError,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness probes"),
        (name = "Classes", description = "Classes and enrollment"),
        (name = "Students", description = "Student records"),
        (name = "Teachers", description = "Teacher profiles held by the identity provider"),
        (name = "Pairs", description = "Antagonistic student pairs")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
