// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Identity Directory
//!
//! Teacher profiles are owned by Clerk. This module wraps the Clerk Backend
//! API user endpoints and offers an in-memory directory with the same
//! behaviour for development mode and tests.
//!
//! Profiles leaving the service are always converted to [`TeacherProfile`],
//! which carries only public fields. Email addresses and private metadata
//! never reach a response body.

pub mod clerk;
pub mod memory;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

pub use clerk::ClerkClient;
pub use memory::InMemoryDirectory;

/// Public metadata key holding the teacher's school.
pub const SCHOOL_METADATA_KEY: &str = "school";

/// Full user record as returned by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdentityUser {
    pub id: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default = "empty_object")]
    pub public_metadata: Value,
    #[serde(default = "empty_object")]
    pub private_metadata: Value,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
}

/// Email address entry on an identity-provider user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailAddress {
    #[serde(default)]
    pub id: Option<String>,
    pub email_address: String,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

impl IdentityUser {
    /// School stored in public metadata, if any.
    pub fn school(&self) -> Option<&str> {
        self.public_metadata
            .get(SCHOOL_METADATA_KEY)
            .and_then(Value::as_str)
    }

    /// Whether any of the user's email addresses matches (case-insensitive).
    pub fn has_email(&self, email: &str) -> bool {
        self.email_addresses
            .iter()
            .any(|e| e.email_address.eq_ignore_ascii_case(email))
    }
}

/// Sanitized teacher profile returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct TeacherProfile {
    /// Identity-provider user id
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
    /// Public metadata (contains `school`)
    #[schema(value_type = Object)]
    pub public_metadata: Value,
    pub username: Option<String>,
}

impl From<IdentityUser> for TeacherProfile {
    fn from(user: IdentityUser) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            image_url: user.image_url,
            public_metadata: user.public_metadata,
            username: user.username,
        }
    }
}

/// Input for provisioning a new identity-provider account.
#[derive(Debug, Clone)]
pub struct NewIdentityUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub school: Option<String>,
}

/// Errors from the identity directory.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("Identity provider configuration missing: {0}")]
    MissingConfig(String),

    #[error("Identity provider request failed: {0}")]
    Request(String),

    /// The provider answered with a non-success status.
    #[error("Identity provider rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Identity provider response was invalid: {0}")]
    InvalidResponse(String),

    #[error("User {0} not found")]
    NotFound(String),
}

/// The identity directory used by the teacher endpoints.
#[derive(Debug, Clone)]
pub enum IdentityDirectory {
    /// Clerk Backend API.
    Clerk(ClerkClient),
    /// Process-local directory for development mode and tests.
    InMemory(InMemoryDirectory),
}

impl IdentityDirectory {
    /// Short name for logs and health output.
    pub fn mode(&self) -> &'static str {
        match self {
            IdentityDirectory::Clerk(_) => "clerk",
            IdentityDirectory::InMemory(_) => "in_memory",
        }
    }

    pub async fn get_user(&self, user_id: &str) -> Result<IdentityUser, IdentityError> {
        match self {
            IdentityDirectory::Clerk(client) => client.get_user(user_id).await,
            IdentityDirectory::InMemory(directory) => directory.get_user(user_id).await,
        }
    }

    pub async fn list_users(&self) -> Result<Vec<IdentityUser>, IdentityError> {
        match self {
            IdentityDirectory::Clerk(client) => client.list_users().await,
            IdentityDirectory::InMemory(directory) => Ok(directory.list_users().await),
        }
    }

    pub async fn create_user(&self, user: NewIdentityUser) -> Result<IdentityUser, IdentityError> {
        match self {
            IdentityDirectory::Clerk(client) => client.create_user(&user).await,
            IdentityDirectory::InMemory(directory) => directory.create_user(user).await,
        }
    }

    /// Set (or clear, with `None`) the `school` public metadata field.
    pub async fn update_school(
        &self,
        user_id: &str,
        school: Option<&str>,
    ) -> Result<IdentityUser, IdentityError> {
        match self {
            IdentityDirectory::Clerk(client) => client.update_school(user_id, school).await,
            IdentityDirectory::InMemory(directory) => {
                directory.update_school(user_id, school).await
            }
        }
    }
}
