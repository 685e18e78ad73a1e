// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Relational Storage Module
//!
//! This module provides persistent storage on a single **SQLite** database.
//! Every API operation maps onto one repository call, and every repository
//! call issues one statement (or a short, independent sequence of them).
//!
//! ## Schema
//!
//! ```text
//! teachers(user_id PK, school)
//! classes(id PK, name, teacher_id → teachers, creator_id → teachers, created_at)
//! students(id PK, first_name, last_name, created_at)
//! class_students(class_id → classes CASCADE, student_id → students CASCADE)
//! antagonistic_pairs(id PK, first_student_id → students CASCADE,
//!                    second_student_id → students CASCADE)
//! ```
//!
//! ## Concurrency
//!
//! The connection lives behind a mutex. Handlers take the lock for the
//! duration of one synchronous repository call and release it before any
//! `.await`. Atomicity is whatever SQLite guarantees for a single statement.

pub mod repository;
pub mod schema;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{ffi, Connection, ErrorCode};

pub use repository::{
    AntagonisticPair, Class, ClassRepository, EnrollmentRepository, NewClass, PairRepository,
    Student, StudentRepository, TeacherRecord, TeacherRepository,
};

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Underlying SQLite failure that is not a constraint violation
    #[error("database error: {0}")]
    Sqlite(#[source] rusqlite::Error),
    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),
    /// A foreign key points at a row that does not exist
    #[error("Referenced row does not exist: {0}")]
    MissingReference(String),
    /// Unique, primary key or check constraint rejected the write
    #[error("Conflict: {0}")]
    Conflict(String),
    /// A previous holder of the connection panicked
    #[error("database connection lock poisoned")]
    Poisoned,
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(failure, message) = &e {
            if failure.code == ErrorCode::ConstraintViolation {
                let detail = message.clone().unwrap_or_else(|| failure.to_string());
                return match failure.extended_code {
                    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => StorageError::MissingReference(detail),
                    _ => StorageError::Conflict(detail),
                };
            }
        }
        StorageError::Sqlite(e)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Open a configured, migrated connection to the database at `path`.
///
/// The caller owns the returned connection; the seed binary uses this
/// directly and drops it when done.
pub fn open_connection(path: impl AsRef<Path>) -> StorageResult<Connection> {
    let conn = Connection::open(path)?;
    prepare(conn)
}

/// Open a configured, migrated in-memory database.
pub fn open_in_memory_connection() -> StorageResult<Connection> {
    prepare(Connection::open_in_memory()?)
}

fn prepare(conn: Connection) -> StorageResult<Connection> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    schema::migrate(&conn)?;
    Ok(conn)
}

/// Shared database handle stored in `AppState`.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (creating if needed) the SQLite file at `path` and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Ok(Self::from_connection(open_connection(path)?))
    }

    /// Open a private in-memory database. Used by tests and local tooling.
    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self::from_connection(open_in_memory_connection()?))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Lock the connection for one repository call.
    ///
    /// The guard must be dropped before the caller awaits anything.
    pub fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }

    /// Cheap liveness query for health checks.
    pub fn ping(&self) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}
