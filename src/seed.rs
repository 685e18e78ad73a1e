// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Sample data for local development.
//!
//! One-shot and not idempotent: running it twice inserts a second copy of the
//! classes and students. Each step runs as its own statements with no
//! enclosing transaction, so a failure leaves the earlier steps in place.

use rusqlite::Connection;

use crate::storage::{
    ClassRepository, EnrollmentRepository, NewClass, PairRepository, StorageResult,
    StudentRepository, TeacherRepository,
};

pub const SAMPLE_TEACHER_1: &str = "user_2f2DunSM8PXDtKRWsWAcIRIRKzU";
pub const SAMPLE_TEACHER_2: &str = "user_2f56P5CoTVngb9QwnfKh5CQprSR";

/// (name, teacher, creator)
const CLASSES: [(&str, &str, &str); 3] = [
    ("Physics", SAMPLE_TEACHER_1, SAMPLE_TEACHER_1),
    ("History", SAMPLE_TEACHER_2, SAMPLE_TEACHER_1),
    ("English", SAMPLE_TEACHER_2, SAMPLE_TEACHER_2),
];

const STUDENTS: [(&str, &str); 40] = [
    ("Walter", "White"),
    ("Daenerys", "Targaryen"),
    ("Michael", "Scott"),
    ("Sherlock", "Holmes"),
    ("Tony", "Stark"),
    ("Rachel", "Green"),
    ("Dexter", "Morgan"),
    ("Jon", "Snow"),
    ("Luke", "Skywalker"),
    ("Arya", "Stark"),
    ("Pam", "Beesly"),
    ("Dwight", "Schrute"),
    ("Ross", "Geller"),
    ("Chandler", "Bing"),
    ("Hermione", "Granger"),
    ("Bruce", "Wayne"),
    ("Leia", "Organa"),
    ("Clark", "Kent"),
    ("Draco", "Malfoy"),
    ("Peter", "Parker"),
    ("James", "Moriarty"),
    ("Cersei", "Lannister"),
    ("Fox", "Mulder"),
    ("Dana", "Scully"),
    ("Homer", "Simpson"),
    ("Marge", "Simpson"),
    ("Bart", "Simpson"),
    ("Lisa", "Simpson"),
    ("Jack", "Sparrow"),
    ("Ellen", "Ripley"),
    ("Forrest", "Gump"),
    ("Indiana", "Jones"),
    ("Vito", "Corleone"),
    ("Michael", "Corleone"),
    ("Frodo", "Baggins"),
    ("Harry", "Potter"),
    ("One", "Ring"),
    ("Tyrion", "Lannister"),
    ("Anakin", "Skywalker"),
    ("Obi-Wan", "Kenobi"),
];

/// 1-based positions in [`STUDENTS`].
const PAIRS: [(usize, usize); 5] = [(4, 21), (10, 22), (19, 36), (39, 9), (37, 35)];

/// What a seed run inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSummary {
    pub class_ids: Vec<i64>,
    pub student_ids: Vec<i64>,
    pub enrolled: usize,
    pub pair_ids: Vec<i64>,
}

/// Insert the sample teachers, classes, students, enrollments and pairs.
pub fn run(conn: &Connection) -> StorageResult<SeedSummary> {
    tracing::info!("Creating teachers...");
    let teachers = TeacherRepository::new(conn);
    teachers.ensure(SAMPLE_TEACHER_1)?;
    teachers.ensure(SAMPLE_TEACHER_2)?;

    tracing::info!("Creating classes...");
    let classes = ClassRepository::new(conn);
    let class_ids = CLASSES
        .iter()
        .map(|&(name, teacher_id, creator_id)| {
            classes
                .create(&NewClass {
                    name,
                    teacher_id,
                    creator_id,
                })
                .map(|class| class.id)
        })
        .collect::<StorageResult<Vec<_>>>()?;

    tracing::info!("Creating students...");
    let students = StudentRepository::new(conn);
    let student_ids = STUDENTS
        .iter()
        .map(|&(first, last)| students.create(first, last).map(|s| s.id))
        .collect::<StorageResult<Vec<_>>>()?;

    tracing::info!("Assigning students to classes...");
    let enrolled = EnrollmentRepository::new(conn).enroll_many(class_ids[0], &student_ids)?;

    tracing::info!("Creating antagonistic pairs...");
    let pairs = PairRepository::new(conn);
    let pair_ids = PAIRS
        .iter()
        .map(|&(first, second)| {
            pairs
                .create(student_ids[first - 1], student_ids[second - 1])
                .map(|pair| pair.id)
        })
        .collect::<StorageResult<Vec<_>>>()?;

    tracing::info!(
        classes = class_ids.len(),
        students = student_ids.len(),
        enrolled,
        pairs = pair_ids.len(),
        "Seeding completed successfully"
    );

    Ok(SeedSummary {
        class_ids,
        student_ids,
        enrolled,
        pair_ids,
    })
}
