//! Common library for the Millenium Auto backend
//!
//! This crate provides shared functionality used by the API service and the
//! provisioning binary: PostgreSQL connectivity and shared error types.

pub mod database;
pub mod error;
