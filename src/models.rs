// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request bodies and query parameters accepted by the REST API. Response
//! rows live with their repositories in [`crate::storage`]; teacher profiles
//! in [`crate::identity`].

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::validation::{FieldError, Validate, Validator, MAX_NAME_LEN, MAX_SCHOOL_LEN};

// =============================================================================
// Class Models
// =============================================================================

/// Request to create a class.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateClassRequest {
    /// Class name (1-100 characters after trimming)
    pub name: String,
    /// Accepted for compatibility; the caller always becomes the class teacher
    #[serde(default)]
    pub teacher_id: Option<String>,
}

impl Validate for CreateClassRequest {
    fn validate(self) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new();
        let name = v.name("name", self.name, MAX_NAME_LEN);
        v.finish(Self {
            name,
            teacher_id: self.teacher_id,
        })
    }
}

/// Request to rename a class.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateClassRequest {
    pub name: String,
}

impl Validate for UpdateClassRequest {
    fn validate(self) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new();
        let name = v.name("name", self.name, MAX_NAME_LEN);
        v.finish(Self { name })
    }
}

/// Query parameters for listing classes.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ClassListQuery {
    /// Only classes where the caller is teacher or creator
    #[serde(default)]
    pub mine: Option<bool>,
}

// =============================================================================
// Student Models
// =============================================================================

/// Request to create a student.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateStudentRequest {
    pub first_name: String,
    pub last_name: String,
}

impl Validate for CreateStudentRequest {
    fn validate(self) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new();
        let first_name = v.name("first_name", self.first_name, MAX_NAME_LEN);
        let last_name = v.name("last_name", self.last_name, MAX_NAME_LEN);
        v.finish(Self {
            first_name,
            last_name,
        })
    }
}

/// Request to replace a student's names.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateStudentRequest {
    pub first_name: String,
    pub last_name: String,
}

impl Validate for UpdateStudentRequest {
    fn validate(self) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new();
        let first_name = v.name("first_name", self.first_name, MAX_NAME_LEN);
        let last_name = v.name("last_name", self.last_name, MAX_NAME_LEN);
        v.finish(Self {
            first_name,
            last_name,
        })
    }
}

// =============================================================================
// Teacher Models
// =============================================================================

/// Request to provision a teacher account with the identity provider.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateTeacherRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Stored as `public_metadata.school`
    #[serde(default)]
    pub school: Option<String>,
}

impl Validate for CreateTeacherRequest {
    fn validate(self) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new();
        let first_name = v.name("first_name", self.first_name, MAX_NAME_LEN);
        let last_name = v.name("last_name", self.last_name, MAX_NAME_LEN);
        let email = v.email("email", self.email);
        let school = v.optional_name("school", self.school, MAX_SCHOOL_LEN);
        v.finish(Self {
            first_name,
            last_name,
            email,
            school,
        })
    }
}

/// Request to update the caller's own school. `null` or blank clears it.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateTeacherRequest {
    #[serde(default)]
    pub school: Option<String>,
}

impl Validate for UpdateTeacherRequest {
    fn validate(self) -> Result<Self, Vec<FieldError>> {
        let mut v = Validator::new();
        let school = v.optional_name("school", self.school, MAX_SCHOOL_LEN);
        v.finish(Self { school })
    }
}

// =============================================================================
// Antagonistic Pair Models
// =============================================================================

/// Request to flag two students as must-not-seat-together.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct CreatePairRequest {
    pub first_student_id: i64,
    pub second_student_id: i64,
}

impl Validate for CreatePairRequest {
    // Self-pairs and unknown ids are schema constraints (409), not input errors.
    fn validate(self) -> Result<Self, Vec<FieldError>> {
        Ok(self)
    }
}
