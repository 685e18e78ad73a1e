// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory identity directory.
//!
//! Used when no `CLERK_SECRET_KEY` is configured. It mirrors the provider's
//! observable behaviour closely enough for local development: generated
//! `user_…` ids, a 422 on a duplicate email, and merge semantics for public
//! metadata.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;

use super::{EmailAddress, IdentityError, IdentityUser, NewIdentityUser, SCHOOL_METADATA_KEY};

#[derive(Debug, Default)]
struct DirectoryState {
    users: BTreeMap<String, IdentityUser>,
    next_id: u64,
}

/// Process-local user directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory pre-populated with `users`.
    pub fn with_users(users: impl IntoIterator<Item = IdentityUser>) -> Self {
        let users = users.into_iter().map(|u| (u.id.clone(), u)).collect();
        Self {
            state: Arc::new(RwLock::new(DirectoryState { users, next_id: 0 })),
        }
    }

    pub async fn get_user(&self, user_id: &str) -> Result<IdentityUser, IdentityError> {
        self.state
            .read()
            .await
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| IdentityError::NotFound(user_id.to_string()))
    }

    pub async fn list_users(&self) -> Vec<IdentityUser> {
        self.state.read().await.users.values().cloned().collect()
    }

    pub async fn create_user(&self, user: NewIdentityUser) -> Result<IdentityUser, IdentityError> {
        let mut state = self.state.write().await;

        if state.users.values().any(|u| u.has_email(&user.email)) {
            return Err(IdentityError::Rejected {
                status: 422,
                message: "That email address is taken. Please try another.".to_string(),
            });
        }

        state.next_id += 1;
        let id = format!("user_local_{:06}", state.next_id);

        let mut public_metadata = serde_json::Map::new();
        if let Some(school) = user.school {
            public_metadata.insert(SCHOOL_METADATA_KEY.to_string(), Value::String(school));
        }

        let created = IdentityUser {
            id: id.clone(),
            first_name: Some(user.first_name),
            last_name: Some(user.last_name),
            image_url: None,
            username: None,
            public_metadata: Value::Object(public_metadata),
            private_metadata: Value::Object(serde_json::Map::new()),
            email_addresses: vec![EmailAddress {
                id: None,
                email_address: user.email,
            }],
        };
        state.users.insert(id, created.clone());
        Ok(created)
    }

    pub async fn update_school(
        &self,
        user_id: &str,
        school: Option<&str>,
    ) -> Result<IdentityUser, IdentityError> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(user_id)
            .ok_or_else(|| IdentityError::NotFound(user_id.to_string()))?;

        if !user.public_metadata.is_object() {
            user.public_metadata = Value::Object(serde_json::Map::new());
        }
        if let Some(metadata) = user.public_metadata.as_object_mut() {
            match school {
                Some(school) => {
                    metadata.insert(
                        SCHOOL_METADATA_KEY.to_string(),
                        Value::String(school.to_string()),
                    );
                }
                None => {
                    metadata.remove(SCHOOL_METADATA_KEY);
                }
            }
        }
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewIdentityUser {
        NewIdentityUser {
            first_name: "Severus".to_string(),
            last_name: "Snape".to_string(),
            email: email.to_string(),
            school: Some("Hogwarts".to_string()),
        }
    }

    #[tokio::test]
    async fn create_then_get_and_list() {
        let directory = InMemoryDirectory::new();
        let created = directory.create_user(new_user("snape@example.com")).await.unwrap();

        assert!(created.id.starts_with("user_local_"));
        assert_eq!(created.school(), Some("Hogwarts"));
        assert_eq!(directory.get_user(&created.id).await.unwrap(), created);
        assert_eq!(directory.list_users().await, vec![created]);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_with_422() {
        let directory = InMemoryDirectory::new();
        directory.create_user(new_user("snape@example.com")).await.unwrap();

        let err = directory
            .create_user(new_user("Snape@Example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::Rejected { status: 422, .. }));
    }

    #[tokio::test]
    async fn update_school_sets_and_clears() {
        let directory = InMemoryDirectory::new();
        let created = directory.create_user(new_user("snape@example.com")).await.unwrap();

        let moved = directory
            .update_school(&created.id, Some("Durmstrang"))
            .await
            .unwrap();
        assert_eq!(moved.school(), Some("Durmstrang"));

        let cleared = directory.update_school(&created.id, None).await.unwrap();
        assert_eq!(cleared.school(), None);
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let directory = InMemoryDirectory::new();
        assert!(matches!(
            directory.get_user("user_missing").await,
            Err(IdentityError::NotFound(_))
        ));
        assert!(matches!(
            directory.update_school("user_missing", Some("X")).await,
            Err(IdentityError::NotFound(_))
        ));
    }
}
