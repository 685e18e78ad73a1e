// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Teacher anchor rows.
//!
//! Teacher profiles live in the identity provider. This table only holds the
//! provider's user id (so class foreign keys have something to point at) and
//! a mirror of the `school` public metadata field.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::StorageResult;

/// Local teacher row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TeacherRecord {
    /// Identity-provider user id
    pub user_id: String,
    /// Mirrored school name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
}

impl TeacherRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            user_id: row.get("user_id")?,
            school: row.get("school")?,
        })
    }
}

/// Repository for the `teachers` table.
pub struct TeacherRepository<'a> {
    conn: &'a Connection,
}

impl<'a> TeacherRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert the teacher row if it is missing. Leaves an existing row untouched.
    pub fn ensure(&self, user_id: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO teachers(user_id) VALUES (?1)",
            params![user_id],
        )?;
        Ok(())
    }

    /// Insert or update the teacher row with the given school.
    pub fn upsert_school(&self, user_id: &str, school: Option<&str>) -> StorageResult<TeacherRecord> {
        let record = self.conn.query_row(
            "INSERT INTO teachers(user_id, school) VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET school = excluded.school
             RETURNING user_id, school",
            params![user_id, school],
            TeacherRecord::from_row,
        )?;
        Ok(record)
    }

    /// Test-only read of the local mirror.
    #[cfg(test)]
    pub fn get(&self, user_id: &str) -> StorageResult<Option<TeacherRecord>> {
        use rusqlite::OptionalExtension;

        let record = self
            .conn
            .query_row(
                "SELECT user_id, school FROM teachers WHERE user_id = ?1",
                params![user_id],
                TeacherRecord::from_row,
            )
            .optional()?;
        Ok(record)
    }
}
