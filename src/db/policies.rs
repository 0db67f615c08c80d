//! Row-level authorization for the `tasks` table.
//!
//! SQLite has no row security, so the four policies live here and
//! [`Tasks`](super::tasks::Tasks) splices their predicates into every
//! statement. Each predicate compares the row owner with the caller bound to
//! the `:caller` parameter, the counterpart of `auth.uid()` on Postgres.
//! Rows outside a predicate are invisible: reads skip them and writes affect
//! zero rows without an error.

use crate::libs::error::TaskError;
use crate::libs::messages::Message;
use uuid::Uuid;

/// Named parameter every policy predicate binds.
pub const CALLER_PARAM: &str = ":caller";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select,
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowPolicy {
    pub name: &'static str,
    pub command: Command,
    /// Filter applied to existing rows (`USING`).
    pub using: Option<&'static str>,
    /// Condition a new row must satisfy (`WITH CHECK`).
    pub with_check: bool,
}

pub static TASK_POLICIES: [RowPolicy; 4] = [
    RowPolicy {
        name: "Users can view their own tasks",
        command: Command::Select,
        using: Some("user_id = :caller"),
        with_check: false,
    },
    RowPolicy {
        name: "Users can insert their own tasks",
        command: Command::Insert,
        using: None,
        with_check: true,
    },
    RowPolicy {
        name: "Users can update their own tasks",
        command: Command::Update,
        using: Some("user_id = :caller"),
        with_check: false,
    },
    RowPolicy {
        name: "Users can delete their own tasks",
        command: Command::Delete,
        using: Some("user_id = :caller"),
        with_check: false,
    },
];

pub fn policy_for(command: Command) -> &'static RowPolicy {
    TASK_POLICIES
        .iter()
        .find(|policy| policy.command == command)
        .unwrap_or(&TASK_POLICIES[0])
}

/// `USING` predicate for `command`. Commands without one see no rows.
pub fn using_clause(command: Command) -> &'static str {
    policy_for(command).using.unwrap_or("0")
}

/// `WITH CHECK` for a row about to be written on behalf of `caller`.
pub fn check_new_row(command: Command, caller: Uuid, owner: Uuid) -> Result<(), TaskError> {
    if policy_for(command).with_check && owner != caller {
        tracing::warn!(policy = policy_for(command).name, %caller, %owner, "row rejected by policy");
        return Err(TaskError::Request(Message::PolicyViolation));
    }
    Ok(())
}
