//! State holder behind the task list view.
//!
//! The controller owns the last fetched snapshot of the caller's tasks and a
//! queue of transient notifications. Every mutation goes to the backend and
//! is followed by a full refetch, so the snapshot only ever shows what the
//! store returned. Errors never escape an operation: they become
//! notifications, and an auth error also sends the user to the login view.

use crate::api::{AuthProvider, TaskBackend};
use crate::libs::error::{TaskError, TaskResult};
use crate::libs::guard::{AuthGuard, Navigator};
use crate::libs::messages::Message;
use crate::libs::task::{sort_by_due_date, NewTask, Task};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Unauthenticated,
    Loading,
    Ready,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

/// A toast: shown once, then dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: Level,
    pub message: Message,
}

impl Notification {
    pub fn success(message: Message) -> Self {
        Self {
            level: Level::Success,
            message,
        }
    }

    pub fn error(message: Message) -> Self {
        Self {
            level: Level::Error,
            message,
        }
    }
}

pub struct TaskListController<'a, A: AuthProvider, B: TaskBackend> {
    auth: &'a A,
    backend: &'a B,
    guard: AuthGuard,
    state: ViewState,
    tasks: Vec<Task>,
    notifications: Vec<Notification>,
}

impl<'a, A: AuthProvider, B: TaskBackend> TaskListController<'a, A, B> {
    /// Attaches the guard, checks the session and loads the first snapshot.
    /// Without a session nothing is requested from the backend.
    pub async fn mount(auth: &'a A, backend: &'a B, navigator: Arc<dyn Navigator>) -> Self {
        let guard = AuthGuard::attach(auth, navigator);
        let mut controller = Self {
            auth,
            backend,
            guard,
            state: ViewState::Unauthenticated,
            tasks: Vec::new(),
            notifications: Vec::new(),
        };

        match auth.get_current_session().await {
            Ok(Some(session)) => {
                controller.guard.hold(session);
                controller.refresh().await;
            }
            Ok(None) => controller.guard.require_login(),
            Err(e) => {
                controller.fail(e);
                controller.guard.require_login();
            }
        }

        controller
    }

    pub fn state(&self) -> ViewState {
        if self.guard.session().is_none() {
            return ViewState::Unauthenticated;
        }
        self.state
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Drains pending notifications for rendering.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// Replaces the snapshot with a fresh listing. On failure the previous
    /// snapshot stays in place.
    pub async fn refresh(&mut self) {
        let Some(session) = self.guard.session() else {
            self.unauthenticated();
            return;
        };

        self.state = ViewState::Loading;
        match self.backend.list_tasks(&session).await {
            Ok(mut tasks) => {
                sort_by_due_date(&mut tasks);
                tracing::debug!(count = tasks.len(), "tasks loaded");
                self.tasks = tasks;
                self.state = ViewState::Ready;
            }
            Err(e) => {
                self.state = ViewState::Ready;
                self.fail(e.into_fetch());
            }
        }
    }

    /// Validates the form fields and creates the task. A validation error is
    /// returned to the caller for inline display and nothing is sent.
    pub async fn submit(&mut self, description: &str, due_date: &str) -> TaskResult<bool> {
        let new_task = NewTask::parse(description, due_date)?;
        Ok(self.add_task(new_task).await)
    }

    pub async fn add_task(&mut self, new_task: NewTask) -> bool {
        let Some(session) = self.guard.session() else {
            self.unauthenticated();
            return false;
        };

        match self.backend.create_task(&session, &new_task).await {
            Ok(task) => {
                self.notify(Notification::success(Message::TaskCreated(task.description)));
                self.refresh().await;
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    /// Flips the completion flag the snapshot shows for `id`.
    pub async fn toggle_task(&mut self, id: Uuid) -> bool {
        let Some(task) = self.tasks.iter().find(|task| task.id == id).cloned() else {
            self.notify(Notification::error(Message::TaskNotFound(id.to_string())));
            return false;
        };
        let Some(session) = self.guard.session() else {
            self.unauthenticated();
            return false;
        };

        let completed = !task.completed;
        match self.backend.set_completion(&session, id, completed).await {
            Ok(_) => {
                let message = if completed {
                    Message::TaskCompleted(task.description)
                } else {
                    Message::TaskReopened(task.description)
                };
                self.notify(Notification::success(message));
                self.refresh().await;
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    pub async fn remove_task(&mut self, id: Uuid) -> bool {
        let Some(session) = self.guard.session() else {
            self.unauthenticated();
            return false;
        };
        let description = self
            .tasks
            .iter()
            .find(|task| task.id == id)
            .map(|task| task.description.clone())
            .unwrap_or_else(|| id.to_string());

        match self.backend.delete_task(&session, id).await {
            Ok(_) => {
                self.notify(Notification::success(Message::TaskDeleted(description)));
                self.refresh().await;
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    /// Ends the session. The guard sees the change and redirects.
    pub async fn sign_out(&mut self) {
        match self.auth.sign_out().await {
            Ok(()) => {
                self.tasks.clear();
                self.state = ViewState::Unauthenticated;
                self.notify(Notification::success(Message::SignedOut));
            }
            Err(e) => self.fail(e),
        }
    }

    /// Releases the guard subscription.
    pub fn unmount(self) {}

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    fn fail(&mut self, error: TaskError) {
        tracing::warn!(error = %error, "task operation failed");
        let auth = error.is_auth();
        self.notify(Notification::error(error.message().clone()));
        if auth {
            self.unauthenticated();
        }
    }

    fn unauthenticated(&mut self) {
        self.state = ViewState::Unauthenticated;
        self.guard.require_login();
    }
}
