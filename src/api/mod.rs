//! Service clients: authentication and task storage.
//!
//! Two traits describe what the rest of the application needs from a backend:
//!
//! - [`AuthProvider`]: current session, sign in/up/out and session-change
//!   notifications.
//! - [`TaskBackend`]: the four task operations, always on behalf of the
//!   session passed in.
//!
//! Both are implemented for the embedded SQLite store ([`local`]) and for a
//! hosted Supabase project ([`supabase`]). [`Auth`] and [`Backend`] pick one
//! at runtime from the configuration.
//!
//! ```rust,no_run
//! use taskdue::api::{AuthProvider, TaskBackend, connect};
//! use taskdue::libs::{config::Config, data_storage::DataStorage};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let (auth, backend) = connect(&Config::read()?, &DataStorage::new())?;
//! if let Some(session) = auth.get_current_session().await? {
//!     let tasks = backend.list_tasks(&session).await?;
//!     println!("{} task(s)", tasks.len());
//! }
//! # Ok(())
//! # }
//! ```

use crate::libs::config::{BackendKind, Config};
use crate::libs::data_storage::DataStorage;
use crate::libs::error::TaskResult;
use crate::libs::session::{Session, SessionContext, Subscription};
use crate::libs::task::{NewTask, Task};
use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use uuid::Uuid;

pub mod local;
pub mod supabase;

pub use local::{LocalAuth, LocalTasks};
pub use supabase::{SupabaseAuth, SupabaseConfig, SupabaseTasks};

/// The authentication collaborator.
#[allow(async_fn_in_trait)]
pub trait AuthProvider {
    /// Session-change notifications of this provider.
    fn context(&self) -> &SessionContext;

    /// Returns the cached session if it is still valid. A session found
    /// expired is discarded and observers are told there is no session.
    async fn get_current_session(&self) -> TaskResult<Option<Session>>;

    async fn sign_in(&self, email: &str, password: &str) -> TaskResult<Session>;

    /// Registers the account and signs it in. `None` means the service
    /// accepted the registration but waits for the address to be confirmed.
    async fn sign_up(&self, email: &str, password: &str) -> TaskResult<Option<Session>>;

    /// Ends the session. Observers are notified even if the service could
    /// not be reached.
    async fn sign_out(&self) -> TaskResult<()>;

    /// Registers `callback` until the returned handle is dropped.
    fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<&Session>) + Send + Sync + 'static,
    {
        self.context().subscribe(callback)
    }
}

/// Task operations, each scoped by row-level authorization to the owner of
/// `session`.
#[allow(async_fn_in_trait)]
pub trait TaskBackend {
    /// Caller's tasks ordered by ascending due date.
    async fn list_tasks(&self, session: &Session) -> TaskResult<Vec<Task>>;

    async fn create_task(&self, session: &Session, new_task: &NewTask) -> TaskResult<Task>;

    /// Number of rows changed; 0 when `id` is missing or not the caller's.
    async fn set_completion(&self, session: &Session, id: Uuid, completed: bool) -> TaskResult<usize>;

    /// Number of rows removed; 0 when `id` is missing or not the caller's.
    async fn delete_task(&self, session: &Session, id: Uuid) -> TaskResult<usize>;
}

/// Session cache on disk, shared by both auth providers.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(storage: &DataStorage, file_name: &str) -> Result<Self> {
        Ok(Self {
            path: storage.get_path(file_name)?,
        })
    }

    pub fn read(&self) -> Option<Session> {
        let content = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "ignoring unreadable session file");
                None
            }
        }
    }

    pub fn write(&self, session: &Session) -> Result<()> {
        let mut file = fs::OpenOptions::new().write(true).create(true).truncate(true).open(&self.path)?;
        file.write_all(serde_json::to_string(session)?.as_bytes())?;
        Ok(())
    }

    pub fn delete(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

/// Auth provider selected by configuration.
pub enum Auth {
    Local(LocalAuth),
    Supabase(SupabaseAuth),
}

/// Task backend selected by configuration.
pub enum Backend {
    Local(LocalTasks),
    Supabase(SupabaseTasks),
}

/// Opens the configured backend.
pub fn connect(config: &Config, storage: &DataStorage) -> Result<(Auth, Backend)> {
    tracing::debug!(backend = %config.backend, "connecting");
    match config.backend {
        BackendKind::Local => {
            let (auth, tasks) = local::open(storage, config.session_ttl_hours())?;
            Ok((Auth::Local(auth), Backend::Local(tasks)))
        }
        BackendKind::Supabase => {
            let supabase = config.supabase()?;
            let auth = SupabaseAuth::new(&supabase, storage)?;
            let tasks = SupabaseTasks::new(&supabase);
            Ok((Auth::Supabase(auth), Backend::Supabase(tasks)))
        }
    }
}

impl AuthProvider for Auth {
    fn context(&self) -> &SessionContext {
        match self {
            Auth::Local(auth) => auth.context(),
            Auth::Supabase(auth) => auth.context(),
        }
    }

    async fn get_current_session(&self) -> TaskResult<Option<Session>> {
        match self {
            Auth::Local(auth) => auth.get_current_session().await,
            Auth::Supabase(auth) => auth.get_current_session().await,
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> TaskResult<Session> {
        match self {
            Auth::Local(auth) => auth.sign_in(email, password).await,
            Auth::Supabase(auth) => auth.sign_in(email, password).await,
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> TaskResult<Option<Session>> {
        match self {
            Auth::Local(auth) => auth.sign_up(email, password).await,
            Auth::Supabase(auth) => auth.sign_up(email, password).await,
        }
    }

    async fn sign_out(&self) -> TaskResult<()> {
        match self {
            Auth::Local(auth) => auth.sign_out().await,
            Auth::Supabase(auth) => auth.sign_out().await,
        }
    }
}

impl TaskBackend for Backend {
    async fn list_tasks(&self, session: &Session) -> TaskResult<Vec<Task>> {
        match self {
            Backend::Local(tasks) => tasks.list_tasks(session).await,
            Backend::Supabase(tasks) => tasks.list_tasks(session).await,
        }
    }

    async fn create_task(&self, session: &Session, new_task: &NewTask) -> TaskResult<Task> {
        match self {
            Backend::Local(tasks) => tasks.create_task(session, new_task).await,
            Backend::Supabase(tasks) => tasks.create_task(session, new_task).await,
        }
    }

    async fn set_completion(&self, session: &Session, id: Uuid, completed: bool) -> TaskResult<usize> {
        match self {
            Backend::Local(tasks) => tasks.set_completion(session, id, completed).await,
            Backend::Supabase(tasks) => tasks.set_completion(session, id, completed).await,
        }
    }

    async fn delete_task(&self, session: &Session, id: Uuid) -> TaskResult<usize> {
        match self {
            Backend::Local(tasks) => tasks.delete_task(session, id).await,
            Backend::Supabase(tasks) => tasks.delete_task(session, id).await,
        }
    }
}
