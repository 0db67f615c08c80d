//! Task storage scoped to one caller.
//!
//! `Tasks` is the only code that touches the `tasks` table. Every statement
//! carries the matching predicate from [`policies`](super::policies), so a
//! caller can neither see nor change rows owned by someone else.
//!
//! ```rust
//! use taskdue::db::{db::Db, tasks::Tasks};
//! use taskdue::libs::task::NewTask;
//! # use taskdue::db::users::Users;
//!
//! let db = Db::open_in_memory()?;
//! # let owner = Users::new(&db.conn).create("me@example.com", "secret-pass")?.id;
//! let tasks = Tasks::new(&db.conn, owner);
//! tasks.insert(&NewTask::parse("Write docs", "2025-12-31")?)?;
//! assert_eq!(tasks.list()?.len(), 1);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::policies::{check_new_row, using_clause, Command};
use crate::libs::error::TaskResult;
use crate::libs::task::{NewTask, Task};
use rusqlite::{named_params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const TASK_COLUMNS: &str = "id, user_id, description, due_date, completed, created_at";
const INSERT_TASK: &str = "INSERT INTO tasks (id, user_id, description, due_date) VALUES (:id, :owner, :description, :due_date)";

pub struct Tasks<'a> {
    conn: &'a Connection,
    caller: Uuid,
}

impl<'a> Tasks<'a> {
    pub fn new(conn: &'a Connection, caller: Uuid) -> Self {
        Self { conn, caller }
    }

    pub fn caller(&self) -> Uuid {
        self.caller
    }

    /// Caller's tasks by ascending due date; equal dates keep insertion order.
    pub fn list(&self) -> TaskResult<Vec<Task>> {
        let sql = format!(
            "SELECT {} FROM tasks WHERE {} ORDER BY due_date ASC, rowid ASC",
            TASK_COLUMNS,
            using_clause(Command::Select)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let tasks = stmt
            .query_map(named_params! { ":caller": self.caller }, Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tasks)
    }

    pub fn get(&self, id: Uuid) -> TaskResult<Option<Task>> {
        let sql = format!("SELECT {} FROM tasks WHERE id = :id AND {}", TASK_COLUMNS, using_clause(Command::Select));
        let task = self
            .conn
            .query_row(&sql, named_params! { ":id": id, ":caller": self.caller }, Self::map_row)
            .optional()?;

        Ok(task)
    }

    /// Inserts a task owned by the caller and returns the stored row.
    pub fn insert(&self, new_task: &NewTask) -> TaskResult<Task> {
        self.insert_for(self.caller, new_task)
    }

    /// Inserts a task for `owner`, rejected unless `owner` is the caller.
    pub fn insert_for(&self, owner: Uuid, new_task: &NewTask) -> TaskResult<Task> {
        check_new_row(Command::Insert, self.caller, owner)?;

        let id = Uuid::new_v4();
        let sql = format!("{} RETURNING {}", INSERT_TASK, TASK_COLUMNS);
        let task = self.conn.query_row(
            &sql,
            named_params! {
                ":id": id,
                ":owner": owner,
                ":description": new_task.description,
                ":due_date": new_task.due_date,
            },
            Self::map_row,
        )?;
        tracing::debug!(task = %task.id, owner = %owner, "task inserted");

        Ok(task)
    }

    /// Returns the number of rows changed: 0 when `id` is unknown or foreign.
    pub fn set_completion(&self, id: Uuid, completed: bool) -> TaskResult<usize> {
        let sql = format!("UPDATE tasks SET completed = :completed WHERE id = :id AND {}", using_clause(Command::Update));
        let updated = self.conn.execute(
            &sql,
            named_params! { ":completed": completed, ":id": id, ":caller": self.caller },
        )?;
        tracing::debug!(task = %id, completed, updated, "task completion set");

        Ok(updated)
    }

    /// Same zero-rows semantics as [`Tasks::set_completion`].
    pub fn delete(&self, id: Uuid) -> TaskResult<usize> {
        let sql = format!("DELETE FROM tasks WHERE id = :id AND {}", using_clause(Command::Delete));
        let deleted = self.conn.execute(&sql, named_params! { ":id": id, ":caller": self.caller })?;
        tracing::debug!(task = %id, deleted, "task deleted");

        Ok(deleted)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Task> {
        Ok(Task {
            id: row.get(0)?,
            user_id: row.get(1)?,
            description: row.get(2)?,
            due_date: row.get(3)?,
            completed: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}
