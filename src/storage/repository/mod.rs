// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the relational schema.
//!
//! Each repository borrows a locked connection and exposes CRUD operations
//! for one table (or, for enrollments, one join table).

pub mod classes;
pub mod enrollments;
pub mod pairs;
pub mod students;
pub mod teachers;

pub use classes::{Class, ClassRepository, NewClass};
pub use enrollments::EnrollmentRepository;
pub use pairs::{AntagonisticPair, PairRepository};
pub use students::{Student, StudentRepository};
pub use teachers::{TeacherRecord, TeacherRepository};
