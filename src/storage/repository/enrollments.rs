// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Class ↔ student enrollment (many-to-many join).

use rusqlite::{params, Connection};

use super::super::{StorageError, StorageResult};
use super::students::Student;

/// Repository for the `class_students` join table.
pub struct EnrollmentRepository<'a> {
    conn: &'a Connection,
}

impl<'a> EnrollmentRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Enroll a student in a class.
    ///
    /// Returns `true` if a new enrollment was recorded and `false` if the
    /// student was already enrolled. Unknown class or student ids are
    /// reported as `NotFound`.
    pub fn enroll(&self, class_id: i64, student_id: i64) -> StorageResult<bool> {
        // OR IGNORE covers the primary key only; foreign keys still fail.
        let inserted = self
            .conn
            .execute(
                "INSERT OR IGNORE INTO class_students(class_id, student_id) VALUES (?1, ?2)",
                params![class_id, student_id],
            )
            .map_err(StorageError::from)
            .map_err(|e| match e {
                StorageError::MissingReference(_) => StorageError::NotFound(format!(
                    "Class {class_id} or student {student_id}"
                )),
                other => other,
            })?;
        Ok(inserted == 1)
    }

    /// Enroll many students in one class. Returns the number of new rows.
    pub fn enroll_many(&self, class_id: i64, student_ids: &[i64]) -> StorageResult<usize> {
        let mut stmt = self.conn.prepare(
            "INSERT OR IGNORE INTO class_students(class_id, student_id) VALUES (?1, ?2)",
        )?;
        let mut inserted = 0;
        for student_id in student_ids {
            inserted += stmt.execute(params![class_id, student_id])?;
        }
        Ok(inserted)
    }

    /// Remove an enrollment.
    pub fn unenroll(&self, class_id: i64, student_id: i64) -> StorageResult<()> {
        let removed = self.conn.execute(
            "DELETE FROM class_students WHERE class_id = ?1 AND student_id = ?2",
            params![class_id, student_id],
        )?;
        if removed == 0 {
            return Err(StorageError::NotFound(format!(
                "Student {student_id} in class {class_id}"
            )));
        }
        Ok(())
    }

    /// Students enrolled in a class, ordered by student id.
    pub fn students_in_class(&self, class_id: i64) -> StorageResult<Vec<Student>> {
        let mut stmt = self.conn.prepare(
            "SELECT s.id, s.first_name, s.last_name, s.created_at FROM students s
             JOIN class_students cs ON cs.student_id = s.id
             WHERE cs.class_id = ?1
             ORDER BY s.id",
        )?;
        let rows = stmt.query_map(params![class_id], Student::from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{
        open_in_memory_connection, ClassRepository, NewClass, StudentRepository,
        TeacherRepository,
    };

    fn setup() -> (Connection, i64, Vec<i64>) {
        let conn = open_in_memory_connection().unwrap();
        TeacherRepository::new(&conn).ensure("user_t1").unwrap();
        let class = ClassRepository::new(&conn)
            .create(&NewClass {
                name: "English",
                teacher_id: "user_t1",
                creator_id: "user_t1",
            })
            .unwrap();
        let students = StudentRepository::new(&conn);
        let ids = [("Pam", "Beesly"), ("Dwight", "Schrute"), ("Michael", "Scott")]
            .iter()
            .map(|(f, l)| students.create(f, l).unwrap().id)
            .collect();
        (conn, class.id, ids)
    }

    #[test]
    fn enroll_twice_keeps_one_row() {
        let (conn, class_id, ids) = setup();
        let repo = EnrollmentRepository::new(&conn);

        assert!(repo.enroll(class_id, ids[0]).unwrap());
        assert!(!repo.enroll(class_id, ids[0]).unwrap());

        assert_eq!(repo.students_in_class(class_id).unwrap().len(), 1);
    }

    #[test]
    fn enroll_unknown_ids_is_not_found() {
        let (conn, class_id, ids) = setup();
        let repo = EnrollmentRepository::new(&conn);

        assert!(matches!(
            repo.enroll(class_id, 999),
            Err(StorageError::NotFound(_))
        ));
        assert!(matches!(
            repo.enroll(999, ids[0]),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn enroll_many_skips_duplicates() {
        let (conn, class_id, ids) = setup();
        let repo = EnrollmentRepository::new(&conn);

        repo.enroll(class_id, ids[1]).unwrap();
        let inserted = repo.enroll_many(class_id, &ids).unwrap();
        assert_eq!(inserted, 2);

        let enrolled: Vec<i64> = repo
            .students_in_class(class_id)
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(enrolled, ids);
    }

    #[test]
    fn unenroll_removes_only_that_row() {
        let (conn, class_id, ids) = setup();
        let repo = EnrollmentRepository::new(&conn);
        repo.enroll_many(class_id, &ids).unwrap();

        repo.unenroll(class_id, ids[1]).unwrap();
        let enrolled: Vec<i64> = repo
            .students_in_class(class_id)
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(enrolled, vec![ids[0], ids[2]]);

        assert!(matches!(
            repo.unenroll(class_id, ids[1]),
            Err(StorageError::NotFound(_))
        ));
    }
}
