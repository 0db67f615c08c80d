//! # taskdue
//!
//! A per-user task list with due dates. Tasks live either in an embedded
//! SQLite database or in a hosted Supabase project; in both cases every row
//! belongs to one identity and row-level policies keep users apart.
//!
//! ## Layout
//!
//! - [`db`]: local schema, migrations, row policies and repositories
//! - [`api`]: the auth and task backends (local and Supabase)
//! - [`libs`]: configuration, messages, the task list controller and its
//!   auth guard
//! - [`commands`]: the `taskdue` command line
//!
//! ```rust,no_run
//! use taskdue::commands::Cli;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod db;
pub mod libs;
