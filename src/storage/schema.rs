// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Schema creation. Every statement is idempotent so `migrate` runs on each
//! startup.

use rusqlite::Connection;

use super::StorageResult;

/// Current schema version, stored in `PRAGMA user_version`.
pub const SCHEMA_VERSION: i64 = 1;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS teachers(
    user_id TEXT PRIMARY KEY,
    school TEXT
);

CREATE TABLE IF NOT EXISTS classes(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    teacher_id TEXT NOT NULL,
    creator_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    FOREIGN KEY(teacher_id) REFERENCES teachers(user_id),
    FOREIGN KEY(creator_id) REFERENCES teachers(user_id)
);
CREATE INDEX IF NOT EXISTS idx_classes_teacher ON classes(teacher_id);
CREATE INDEX IF NOT EXISTS idx_classes_creator ON classes(creator_id);

CREATE TABLE IF NOT EXISTS students(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS class_students(
    class_id INTEGER NOT NULL,
    student_id INTEGER NOT NULL,
    PRIMARY KEY(class_id, student_id),
    FOREIGN KEY(class_id) REFERENCES classes(id) ON DELETE CASCADE,
    FOREIGN KEY(student_id) REFERENCES students(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_class_students_student ON class_students(student_id);

CREATE TABLE IF NOT EXISTS antagonistic_pairs(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_student_id INTEGER NOT NULL,
    second_student_id INTEGER NOT NULL,
    CHECK(first_student_id <> second_student_id),
    FOREIGN KEY(first_student_id) REFERENCES students(id) ON DELETE CASCADE,
    FOREIGN KEY(second_student_id) REFERENCES students(id) ON DELETE CASCADE
);
CREATE INDEX IF NOT EXISTS idx_antagonistic_pairs_second
    ON antagonistic_pairs(second_student_id);
-- (a, b) and (b, a) describe the same pair
CREATE UNIQUE INDEX IF NOT EXISTS idx_antagonistic_pairs_unordered
    ON antagonistic_pairs(
        min(first_student_id, second_student_id),
        max(first_student_id, second_student_id)
    );
";

/// Create all tables and indexes if they are missing.
pub fn migrate(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(SCHEMA)?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    Ok(())
}
