//! Database layer for taskdue.
//!
//! SQLite persistence for the local backend: the schema with its migrations,
//! the row policies for tasks and one repository per table.
//!
//! ```rust
//! use taskdue::db::{db::Db, tasks::Tasks, users::Users};
//! use taskdue::libs::task::NewTask;
//!
//! let db = Db::open_in_memory()?;
//! let me = Users::new(&db.conn).create("me@example.com", "secret-pass")?;
//! let tasks = Tasks::new(&db.conn, me.id);
//! tasks.insert(&NewTask::parse("Review code", "2025-11-01")?)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Connection setup: pragmas and migrations.
pub mod db;

/// Versioned schema changes.
pub mod migrations;

/// Row-level policies for the `tasks` table.
pub mod policies;

/// Caller-scoped task CRUD.
pub mod tasks;

/// Identities of the local auth store.
pub mod users;

/// Bearer tokens of the local auth store.
pub mod auth_sessions;

/// Profiles provisioned from identities.
pub mod profiles;
