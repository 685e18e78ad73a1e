// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request validation.
//!
//! Request bodies implement [`Validate`], which checks every field and returns
//! the normalized (trimmed) value. All problems are reported at once as a list
//! of [`FieldError`]s.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Longest accepted class or student name, in characters.
pub const MAX_NAME_LEN: usize = 100;
/// Longest accepted school name, in characters.
pub const MAX_SCHOOL_LEN: usize = 200;
/// Longest accepted email address (RFC 5321 path limit).
pub const MAX_EMAIL_LEN: usize = 254;
/// Longest accepted identity-provider user id.
pub const MAX_USER_ID_LEN: usize = 64;

/// One invalid field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate and normalize a decoded request body.
pub trait Validate: Sized {
    fn validate(self) -> Result<Self, Vec<FieldError>>;
}

/// Collects field errors while a request is checked.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trim `value` and require 1..=`max` characters.
    pub fn name(&mut self, field: &str, value: String, max: usize) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.push(field, "must not be blank");
        } else if trimmed.chars().count() > max {
            self.push(field, format!("must be at most {max} characters"));
        }
        trimmed.to_string()
    }

    /// Trim an optional value; blank becomes `None`.
    pub fn optional_name(&mut self, field: &str, value: Option<String>, max: usize) -> Option<String> {
        let trimmed = value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())?;
        if trimmed.chars().count() > max {
            self.push(field, format!("must be at most {max} characters"));
        }
        Some(trimmed)
    }

    /// Trim `value` and require a plausible `local@domain.tld` address.
    pub fn email(&mut self, field: &str, value: String) -> String {
        let trimmed = value.trim().to_string();
        if !is_plausible_email(&trimmed) {
            self.push(field, "must be a valid email address");
        }
        trimmed
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// `Ok(value)` if nothing was pushed.
    pub fn finish<T>(self, value: T) -> Result<T, Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self.errors)
        }
    }
}

/// Identity-provider user ids are ASCII letters, digits and underscores.
pub fn is_identity_user_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_USER_ID_LEN
        && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

fn is_plausible_email(email: &str) -> bool {
    if email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
