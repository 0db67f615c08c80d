use crate::libs::error::{TaskError, TaskResult};
use crate::libs::messages::Message;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub description: String,
    pub due_date: NaiveDate,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Creation form input that already passed client-side validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTask {
    pub description: String,
    pub due_date: NaiveDate,
}

impl NewTask {
    /// Validates raw form fields: the description must not be blank and the
    /// due date must be a `YYYY-MM-DD` calendar date.
    pub fn parse(description: &str, due_date: &str) -> TaskResult<Self> {
        let description = description.trim();
        if description.is_empty() {
            return Err(TaskError::Validation(Message::DescriptionRequired));
        }
        let due_date = NaiveDate::parse_from_str(due_date.trim(), DUE_DATE_FORMAT)
            .map_err(|_| TaskError::Validation(Message::InvalidDueDate(due_date.to_string())))?;

        Ok(Self {
            description: description.to_string(),
            due_date,
        })
    }
}

/// Stable sort by due date; equal dates keep their incoming order.
pub fn sort_by_due_date(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| task.due_date);
}

/// How a user points at a task on the command line.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskSelector {
    /// 1-based position in the due-date ordered list.
    Position(usize),
    Id(Uuid),
}

impl TaskSelector {
    pub fn parse(input: &str) -> TaskResult<Self> {
        let input = input.trim();
        if let Ok(position) = input.parse::<usize>() {
            if position > 0 {
                return Ok(TaskSelector::Position(position));
            }
        }
        Uuid::parse_str(input)
            .map(TaskSelector::Id)
            .map_err(|_| TaskError::Validation(Message::InvalidTaskSelector(input.to_string())))
    }

    pub fn resolve<'a>(&self, tasks: &'a [Task]) -> Option<&'a Task> {
        match self {
            TaskSelector::Position(position) => position.checked_sub(1).and_then(|index| tasks.get(index)),
            TaskSelector::Id(id) => tasks.iter().find(|task| task.id == *id),
        }
    }
}
