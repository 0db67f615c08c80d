//! Error taxonomy for task operations.
//!
//! | Variant      | Cause                                  | Handling                 |
//! |--------------|----------------------------------------|--------------------------|
//! | `Auth`       | no session, expired or invalid token   | redirect to login        |
//! | `Validation` | missing description, malformed date    | block submission, inline |
//! | `Request`    | transport failure, policy rejection    | toast, state unchanged   |
//! | `Fetch`      | listing failed                         | toast, keep last list    |
//!
//! Nothing here is retried; the user re-triggers the action.

use crate::libs::messages::Message;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskError {
    #[error("{0}")]
    Auth(Message),
    #[error("{0}")]
    Validation(Message),
    #[error("{0}")]
    Request(Message),
    #[error("{0}")]
    Fetch(Message),
}

impl TaskError {
    pub fn request(error: impl ToString) -> Self {
        TaskError::Request(Message::RequestFailed(error.to_string()))
    }

    pub fn message(&self) -> &Message {
        match self {
            TaskError::Auth(message)
            | TaskError::Validation(message)
            | TaskError::Request(message)
            | TaskError::Fetch(message) => message,
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, TaskError::Auth(_))
    }

    /// Re-tags a failed listing so it is reported as a fetch failure.
    pub fn into_fetch(self) -> Self {
        match self {
            TaskError::Request(Message::RequestFailed(error)) => TaskError::Fetch(Message::FetchFailed(error)),
            TaskError::Request(message) => TaskError::Fetch(Message::FetchFailed(message.to_string())),
            other => other,
        }
    }
}

impl From<rusqlite::Error> for TaskError {
    fn from(error: rusqlite::Error) -> Self {
        TaskError::request(error)
    }
}

impl From<reqwest::Error> for TaskError {
    fn from(error: reqwest::Error) -> Self {
        TaskError::request(error)
    }
}

pub type TaskResult<T> = std::result::Result<T, TaskError>;
