//! # Taskdesk Shared Library
//!
//! This crate contains the domain types, persistence and business logic used
//! by the Taskdesk API server.
//!
//! ## Module Organization
//!
//! - `models`: Users, tasks and task status
//! - `auth`: Password hashing, JWT tokens and the bearer-token middleware
//! - `db`: PostgreSQL pool and migrations
//! - `store`: Repository traits with PostgreSQL and in-memory implementations
//! - `tasks`: Owner-scoped query engine and the task service

pub mod auth;
pub mod db;
pub mod models;
pub mod store;
pub mod tasks;

/// Current version of the Taskdesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
