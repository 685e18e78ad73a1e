// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Antagonistic pair repository.
//!
//! A pair flags two students who must not be seated together. The relation is
//! symmetric but stored as an ordered `(first, second)` tuple; the schema
//! rejects self-pairs, unknown students, and a pair that already exists in
//! either order.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{StorageError, StorageResult};

const PAIR_COLUMNS: &str = "id, first_student_id, second_student_id";

/// Antagonistic pair row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct AntagonisticPair {
    pub id: i64,
    pub first_student_id: i64,
    pub second_student_id: i64,
}

impl AntagonisticPair {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            first_student_id: row.get("first_student_id")?,
            second_student_id: row.get("second_student_id")?,
        })
    }
}

/// Repository for the `antagonistic_pairs` table.
pub struct PairRepository<'a> {
    conn: &'a Connection,
}

impl<'a> PairRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn get(&self, id: i64) -> StorageResult<Option<AntagonisticPair>> {
        let pair = self
            .conn
            .query_row(
                &format!("SELECT {PAIR_COLUMNS} FROM antagonistic_pairs WHERE id = ?1"),
                params![id],
                AntagonisticPair::from_row,
            )
            .optional()?;
        Ok(pair)
    }

    pub fn list_all(&self) -> StorageResult<Vec<AntagonisticPair>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PAIR_COLUMNS} FROM antagonistic_pairs ORDER BY id"
        ))?;
        let rows = stmt.query_map([], AntagonisticPair::from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Pairs mentioning the student on either side.
    pub fn list_for_student(&self, student_id: i64) -> StorageResult<Vec<AntagonisticPair>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PAIR_COLUMNS} FROM antagonistic_pairs
             WHERE first_student_id = ?1 OR second_student_id = ?1
             ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![student_id], AntagonisticPair::from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Record a new pair.
    ///
    /// Fails with `MissingReference` if either student does not exist and with
    /// `Conflict` for a self-pair or a pair already recorded in either order.
    pub fn create(
        &self,
        first_student_id: i64,
        second_student_id: i64,
    ) -> StorageResult<AntagonisticPair> {
        let pair = self.conn.query_row(
            &format!(
                "INSERT INTO antagonistic_pairs(first_student_id, second_student_id)
                 VALUES (?1, ?2)
                 RETURNING {PAIR_COLUMNS}"
            ),
            params![first_student_id, second_student_id],
            AntagonisticPair::from_row,
        )?;
        Ok(pair)
    }

    pub fn delete(&self, id: i64) -> StorageResult<AntagonisticPair> {
        self.conn
            .query_row(
                &format!("DELETE FROM antagonistic_pairs WHERE id = ?1 RETURNING {PAIR_COLUMNS}"),
                params![id],
                AntagonisticPair::from_row,
            )
            .optional()?
            .ok_or_else(|| StorageError::NotFound(format!("Antagonistic pair {id}")))
    }
}
