//! Embedded backend: authentication and tasks in one SQLite database.
//!
//! Every task call resolves the bearer token to an identity first, the same
//! way the hosted service derives `auth.uid()` from the JWT, and then goes
//! through the caller-scoped [`Tasks`] repository.

use super::{AuthProvider, SessionFile, TaskBackend};
use crate::db::auth_sessions::AuthSessions;
use crate::db::db::Db;
use crate::db::tasks::Tasks;
use crate::db::users::Users;
use crate::libs::config::SessionConfig;
use crate::libs::data_storage::DataStorage;
use crate::libs::error::{TaskError, TaskResult};
use crate::libs::session::{Session, SessionContext};
use crate::libs::task::{NewTask, Task};
use anyhow::Result;
use chrono::Duration;
use parking_lot::Mutex;
use std::sync::Arc;
use uuid::Uuid;

const SESSION_FILE: &str = ".local_session";

pub type SharedDb = Arc<Mutex<Db>>;

/// Opens the database in `storage` and returns both halves of the backend.
pub fn open(storage: &DataStorage, ttl_hours: i64) -> Result<(LocalAuth, LocalTasks)> {
    SessionConfig { ttl_hours }.validate()?;
    let db: SharedDb = Arc::new(Mutex::new(Db::in_storage(storage)?));
    let auth = LocalAuth::new(db.clone(), SessionFile::new(storage, SESSION_FILE)?, Duration::hours(ttl_hours));
    let tasks = LocalTasks::new(db);
    Ok((auth, tasks))
}

pub struct LocalAuth {
    db: SharedDb,
    session_file: SessionFile,
    ttl: Duration,
    context: SessionContext,
}

impl LocalAuth {
    pub fn new(db: SharedDb, session_file: SessionFile, ttl: Duration) -> Self {
        Self {
            db,
            session_file,
            ttl,
            context: SessionContext::new(),
        }
    }

    fn discard_session(&self) {
        if let Err(e) = self.session_file.delete() {
            tracing::warn!(error = %e, "failed to remove session file");
        }
        self.context.publish(None);
    }

    fn store_session(&self, session: &Session) -> TaskResult<()> {
        self.session_file.write(session).map_err(TaskError::request)?;
        self.context.publish(Some(session));
        Ok(())
    }
}

impl AuthProvider for LocalAuth {
    fn context(&self) -> &SessionContext {
        &self.context
    }

    async fn get_current_session(&self) -> TaskResult<Option<Session>> {
        let Some(session) = self.session_file.read() else {
            return Ok(None);
        };

        let verified = {
            let db = self.db.lock();
            AuthSessions::new(&db.conn).authenticate(&session.access_token)
        };
        match verified {
            Ok(identity) if identity == session.user && !session.is_expired() => Ok(Some(session)),
            Ok(_) | Err(TaskError::Auth(_)) => {
                tracing::debug!(user = %session.user.id, "cached session no longer valid");
                self.discard_session();
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    async fn sign_in(&self, email: &str, password: &str) -> TaskResult<Session> {
        let session = {
            let db = self.db.lock();
            let identity = Users::new(&db.conn).verify(email, password)?;
            let sessions = AuthSessions::new(&db.conn);
            sessions.purge_expired()?;
            sessions.issue(&identity, self.ttl)?
        };
        tracing::info!(user = %session.user.id, "signed in");
        self.store_session(&session)?;

        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> TaskResult<Option<Session>> {
        {
            let db = self.db.lock();
            Users::new(&db.conn).create(email, password)?;
        }
        self.sign_in(email, password).await.map(Some)
    }

    async fn sign_out(&self) -> TaskResult<()> {
        if let Some(session) = self.session_file.read() {
            let revoked = {
                let db = self.db.lock();
                AuthSessions::new(&db.conn).revoke(&session.access_token)
            };
            if let Err(e) = revoked {
                tracing::warn!(error = %e, "failed to revoke session token, dropping local session anyway");
            }
        }
        self.discard_session();
        Ok(())
    }
}

pub struct LocalTasks {
    db: SharedDb,
}

impl LocalTasks {
    pub fn new(db: SharedDb) -> Self {
        Self { db }
    }

    /// Runs `f` against the repository scoped to the token's owner.
    fn scoped<T>(&self, session: &Session, f: impl FnOnce(&Tasks<'_>) -> TaskResult<T>) -> TaskResult<T> {
        let db = self.db.lock();
        let identity = AuthSessions::new(&db.conn).authenticate(&session.access_token)?;
        f(&Tasks::new(&db.conn, identity.id))
    }
}

impl TaskBackend for LocalTasks {
    async fn list_tasks(&self, session: &Session) -> TaskResult<Vec<Task>> {
        self.scoped(session, |tasks| tasks.list())
    }

    async fn create_task(&self, session: &Session, new_task: &NewTask) -> TaskResult<Task> {
        self.scoped(session, |tasks| tasks.insert(new_task))
    }

    async fn set_completion(&self, session: &Session, id: Uuid, completed: bool) -> TaskResult<usize> {
        self.scoped(session, |tasks| tasks.set_completion(id, completed))
    }

    async fn delete_task(&self, session: &Session, id: Uuid) -> TaskResult<usize> {
        self.scoped(session, |tasks| tasks.delete(id))
    }
}
