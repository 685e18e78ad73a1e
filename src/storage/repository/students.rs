// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Student repository.
//!
//! Deleting a student cascades to both its enrollments and every antagonistic
//! pair that mentions it.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{StorageError, StorageResult};

const STUDENT_COLUMNS: &str = "id, first_name, last_name, created_at";

/// Student row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Student {
    /// Auto-incremented student id
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// When the student was created
    pub created_at: DateTime<Utc>,
}

impl Student {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// Repository for the `students` table.
pub struct StudentRepository<'a> {
    conn: &'a Connection,
}

impl<'a> StudentRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn get(&self, id: i64) -> StorageResult<Option<Student>> {
        let student = self
            .conn
            .query_row(
                &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?1"),
                params![id],
                Student::from_row,
            )
            .optional()?;
        Ok(student)
    }

    pub fn exists(&self, id: i64) -> StorageResult<bool> {
        let exists = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM students WHERE id = ?1)",
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    pub fn list_all(&self) -> StorageResult<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {STUDENT_COLUMNS} FROM students ORDER BY id"))?;
        let rows = stmt.query_map([], Student::from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn create(&self, first_name: &str, last_name: &str) -> StorageResult<Student> {
        let student = self.conn.query_row(
            &format!(
                "INSERT INTO students(first_name, last_name, created_at)
                 VALUES (?1, ?2, ?3)
                 RETURNING {STUDENT_COLUMNS}"
            ),
            params![first_name, last_name, Utc::now()],
            Student::from_row,
        )?;
        Ok(student)
    }

    /// Replace both name fields of an existing student.
    pub fn update(&self, id: i64, first_name: &str, last_name: &str) -> StorageResult<Student> {
        self.conn
            .query_row(
                &format!(
                    "UPDATE students SET first_name = ?2, last_name = ?3
                     WHERE id = ?1
                     RETURNING {STUDENT_COLUMNS}"
                ),
                params![id, first_name, last_name],
                Student::from_row,
            )
            .optional()?
            .ok_or_else(|| StorageError::NotFound(format!("Student {id}")))
    }

    pub fn delete(&self, id: i64) -> StorageResult<Student> {
        self.conn
            .query_row(
                &format!("DELETE FROM students WHERE id = ?1 RETURNING {STUDENT_COLUMNS}"),
                params![id],
                Student::from_row,
            )
            .optional()?
            .ok_or_else(|| StorageError::NotFound(format!("Student {id}")))
    }
}
