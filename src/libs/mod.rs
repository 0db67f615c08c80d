//! Core library modules for taskdue.
//!
//! - **Infrastructure**: configuration, data storage, messages, errors
//! - **Domain**: tasks, sessions and their change notifications
//! - **View logic**: the task list controller, its auth guard and the
//!   console table renderer
//!
//! ```rust,no_run
//! use taskdue::libs::task::NewTask;
//!
//! let task = NewTask::parse("Renew certificates", "2025-12-31")?;
//! assert_eq!(task.due_date.to_string(), "2025-12-31");
//! # Ok::<(), taskdue::libs::error::TaskError>(())
//! ```

pub mod config;
pub mod controller;
pub mod data_storage;
pub mod error;
pub mod guard;
pub mod messages;
pub mod session;
pub mod task;
pub mod view;
