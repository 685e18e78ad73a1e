// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Class repository.
//!
//! A class has an assigned teacher and a creator; both are identity-provider
//! user ids that must exist in `teachers`. Deleting a class removes its
//! enrollments through the `class_students` cascade.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{StorageError, StorageResult};

const CLASS_COLUMNS: &str = "id, name, teacher_id, creator_id, created_at";

/// Class row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Class {
    /// Auto-incremented class id
    pub id: i64,
    /// Display name
    pub name: String,
    /// Assigned instructor (identity-provider user id)
    pub teacher_id: String,
    /// User who created the class
    pub creator_id: String,
    /// When the class was created
    pub created_at: DateTime<Utc>,
}

impl Class {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            teacher_id: row.get("teacher_id")?,
            creator_id: row.get("creator_id")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Values for a new class row.
#[derive(Debug, Clone)]
pub struct NewClass<'n> {
    pub name: &'n str,
    pub teacher_id: &'n str,
    pub creator_id: &'n str,
}

/// Repository for the `classes` table.
pub struct ClassRepository<'a> {
    conn: &'a Connection,
}

impl<'a> ClassRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Get a class by id, `None` if it does not exist.
    pub fn get(&self, id: i64) -> StorageResult<Option<Class>> {
        let class = self
            .conn
            .query_row(
                &format!("SELECT {CLASS_COLUMNS} FROM classes WHERE id = ?1"),
                params![id],
                Class::from_row,
            )
            .optional()?;
        Ok(class)
    }

    /// Whether a class with this id exists.
    pub fn exists(&self, id: i64) -> StorageResult<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM classes WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Every class, unfiltered.
    pub fn list_all(&self) -> StorageResult<Vec<Class>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {CLASS_COLUMNS} FROM classes ORDER BY id"))?;
        let rows = stmt.query_map([], Class::from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Classes the user teaches or created.
    pub fn list_for_user(&self, user_id: &str) -> StorageResult<Vec<Class>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes
             WHERE teacher_id = ?1 OR creator_id = ?1
             ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![user_id], Class::from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Insert a class. Both teacher ids must already exist in `teachers`.
    pub fn create(&self, class: &NewClass<'_>) -> StorageResult<Class> {
        let created = self.conn.query_row(
            &format!(
                "INSERT INTO classes(name, teacher_id, creator_id, created_at)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING {CLASS_COLUMNS}"
            ),
            params![class.name, class.teacher_id, class.creator_id, Utc::now()],
            Class::from_row,
        )?;
        Ok(created)
    }

    /// Replace the name of an existing class.
    pub fn update_name(&self, id: i64, name: &str) -> StorageResult<Class> {
        self.conn
            .query_row(
                &format!("UPDATE classes SET name = ?2 WHERE id = ?1 RETURNING {CLASS_COLUMNS}"),
                params![id, name],
                Class::from_row,
            )
            .optional()?
            .ok_or_else(|| StorageError::NotFound(format!("Class {id}")))
    }

    /// Delete a class and return the removed row.
    pub fn delete(&self, id: i64) -> StorageResult<Class> {
        self.conn
            .query_row(
                &format!("DELETE FROM classes WHERE id = ?1 RETURNING {CLASS_COLUMNS}"),
                params![id],
                Class::from_row,
            )
            .optional()?
            .ok_or_else(|| StorageError::NotFound(format!("Class {id}")))
    }
}
