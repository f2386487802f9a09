//! Common library for the places application
//!
//! This crate provides the shared infrastructure used by the places
//! service: PostgreSQL connectivity, schema migrations, and the
//! database error types.

pub mod database;
pub mod error;
