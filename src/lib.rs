// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Classroom Server - class, student and seating-conflict management API
//!
//! Teachers sign in through Clerk; the service stores classes, students,
//! enrollments and antagonistic pairs in SQLite.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Authentication (Clerk JWT)
//! - `identity` - Teacher profiles held by the identity provider
//! - `storage` - SQLite schema and repositories
//! - `seed` - Sample data for local development

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod identity;
pub mod logging;
pub mod models;
pub mod seed;
pub mod state;
pub mod storage;
pub mod validation;

#[cfg(test)]
mod test_support;
