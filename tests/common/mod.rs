//! In-memory auth provider, task backend and navigator shared by the guard
//! and controller tests.
#![allow(dead_code)]

use chrono::{Duration, NaiveDate, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use taskdue::api::{AuthProvider, TaskBackend};
use taskdue::libs::error::{TaskError, TaskResult};
use taskdue::libs::guard::Navigator;
use taskdue::libs::messages::Message;
use taskdue::libs::session::{Identity, Session, SessionContext};
use taskdue::libs::task::{NewTask, Task};
use uuid::Uuid;

pub fn session_for(email: &str) -> Session {
    Session {
        access_token: format!("token-{}", email),
        expires_at: Utc::now() + Duration::hours(1),
        user: Identity {
            id: Uuid::new_v4(),
            email: email.to_string(),
        },
    }
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

#[derive(Default)]
pub struct RecordingNavigator {
    redirects: AtomicUsize,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct MockAuth {
    context: SessionContext,
    session: Mutex<Option<Session>>,
}

impl MockAuth {
    pub fn signed_in(session: Session) -> Self {
        Self {
            context: SessionContext::new(),
            session: Mutex::new(Some(session)),
        }
    }

    /// Simulates the provider noticing that the session expired.
    pub fn expire(&self) {
        *self.session.lock() = None;
        self.context.publish(None);
    }
}

impl AuthProvider for MockAuth {
    fn context(&self) -> &SessionContext {
        &self.context
    }

    async fn get_current_session(&self) -> TaskResult<Option<Session>> {
        Ok(self.session.lock().clone())
    }

    async fn sign_in(&self, email: &str, _password: &str) -> TaskResult<Session> {
        let session = session_for(email);
        *self.session.lock() = Some(session.clone());
        self.context.publish(Some(&session));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> TaskResult<Option<Session>> {
        self.sign_in(email, password).await.map(Some)
    }

    async fn sign_out(&self) -> TaskResult<()> {
        *self.session.lock() = None;
        self.context.publish(None);
        Ok(())
    }
}

/// Task store that records every call and can be told to fail.
#[derive(Default)]
pub struct MockBackend {
    pub tasks: Mutex<Vec<Task>>,
    pub calls: Mutex<Vec<&'static str>>,
    pub fail_with: Mutex<Option<TaskError>>,
}

impl MockBackend {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub fn fail_next(&self, error: TaskError) {
        *self.fail_with.lock() = Some(error);
    }

    pub fn seed(&self, owner: Uuid, description: &str, due_date: &str) -> Task {
        let task = Task {
            id: Uuid::new_v4(),
            user_id: owner,
            description: description.to_string(),
            due_date: date(due_date),
            completed: false,
            created_at: Utc::now(),
        };
        self.tasks.lock().push(task.clone());
        task
    }

    fn record(&self, call: &'static str) -> TaskResult<()> {
        self.calls.lock().push(call);
        match self.fail_with.lock().take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl TaskBackend for MockBackend {
    /// Returned in storage order; sorting is the caller's job.
    async fn list_tasks(&self, session: &Session) -> TaskResult<Vec<Task>> {
        self.record("list")?;
        Ok(self
            .tasks
            .lock()
            .iter()
            .filter(|task| task.user_id == session.user.id)
            .cloned()
            .collect())
    }

    async fn create_task(&self, session: &Session, new_task: &NewTask) -> TaskResult<Task> {
        self.record("create")?;
        let task = Task {
            id: Uuid::new_v4(),
            user_id: session.user.id,
            description: new_task.description.clone(),
            due_date: new_task.due_date,
            completed: false,
            created_at: Utc::now(),
        };
        self.tasks.lock().push(task.clone());
        Ok(task)
    }

    async fn set_completion(&self, session: &Session, id: Uuid, completed: bool) -> TaskResult<usize> {
        self.record("update")?;
        let mut tasks = self.tasks.lock();
        let mut updated = 0;
        for task in tasks.iter_mut().filter(|t| t.id == id && t.user_id == session.user.id) {
            task.completed = completed;
            updated += 1;
        }
        Ok(updated)
    }

    async fn delete_task(&self, session: &Session, id: Uuid) -> TaskResult<usize> {
        self.record("delete")?;
        let mut tasks = self.tasks.lock();
        let before = tasks.len();
        tasks.retain(|t| !(t.id == id && t.user_id == session.user.id));
        Ok(before - tasks.len())
    }
}

pub fn request_failure() -> TaskError {
    TaskError::Request(Message::RequestFailed("connection reset".to_string()))
}
