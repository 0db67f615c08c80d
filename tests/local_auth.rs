#[cfg(test)]
mod tests {
    use chrono::Duration;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use taskdue::api::local::{LocalAuth, LocalTasks, SharedDb};
    use taskdue::api::{AuthProvider, SessionFile, TaskBackend};
    use taskdue::db::db::Db;
    use taskdue::libs::data_storage::DataStorage;
    use taskdue::libs::error::TaskError;
    use taskdue::libs::messages::Message;
    use taskdue::libs::task::NewTask;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};

    const SESSION_FILE: &str = ".test_session";

    struct AuthTestContext {
        temp_dir: TempDir,
        db: SharedDb,
        auth: LocalAuth,
        tasks: LocalTasks,
    }

    impl AuthTestContext {
        fn with_ttl(temp_dir: TempDir, ttl: Duration) -> Self {
            let storage = DataStorage::with_base(temp_dir.path());
            let db: SharedDb = Arc::new(Mutex::new(Db::in_storage(&storage).unwrap()));
            let auth = LocalAuth::new(db.clone(), SessionFile::new(&storage, SESSION_FILE).unwrap(), ttl);
            let tasks = LocalTasks::new(db.clone());
            AuthTestContext {
                temp_dir,
                db,
                auth,
                tasks,
            }
        }
    }

    impl AsyncTestContext for AuthTestContext {
        async fn setup() -> Self {
            Self::with_ttl(tempfile::tempdir().unwrap(), Duration::hours(1))
        }
    }

    #[test_context(AuthTestContext)]
    #[tokio::test]
    async fn test_sign_up_signs_in(ctx: &mut AuthTestContext) {
        assert!(ctx.auth.get_current_session().await.unwrap().is_none());

        let session = ctx.auth.sign_up("new@example.com", "secret-pass").await.unwrap().unwrap();
        assert_eq!(session.user.email, "new@example.com");

        let current = ctx.auth.get_current_session().await.unwrap().unwrap();
        assert_eq!(current, session);
    }

    #[test_context(AuthTestContext)]
    #[tokio::test]
    async fn test_sign_up_rejects_duplicate_and_short_password(ctx: &mut AuthTestContext) {
        ctx.auth.sign_up("new@example.com", "secret-pass").await.unwrap().unwrap();

        let duplicate = ctx.auth.sign_up("NEW@example.com", "secret-pass").await.unwrap_err();
        assert!(matches!(duplicate, TaskError::Validation(Message::EmailAlreadyRegistered(_))));

        let short = ctx.auth.sign_up("other@example.com", "abc").await.unwrap_err();
        assert!(matches!(short, TaskError::Validation(Message::PasswordTooShort(_))));
    }

    #[test_context(AuthTestContext)]
    #[tokio::test]
    async fn test_wrong_password_is_auth_error(ctx: &mut AuthTestContext) {
        ctx.auth.sign_up("new@example.com", "secret-pass").await.unwrap().unwrap();
        ctx.auth.sign_out().await.unwrap();

        let error = ctx.auth.sign_in("new@example.com", "wrong-pass").await.unwrap_err();
        assert_eq!(error, TaskError::Auth(Message::WrongCredentials));

        let unknown = ctx.auth.sign_in("nobody@example.com", "secret-pass").await.unwrap_err();
        assert_eq!(unknown, TaskError::Auth(Message::WrongCredentials));
    }

    #[test_context(AuthTestContext)]
    #[tokio::test]
    async fn test_sign_out_notifies_and_revokes(ctx: &mut AuthTestContext) {
        let session = ctx.auth.sign_up("new@example.com", "secret-pass").await.unwrap().unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let _subscription = {
            let seen = seen.clone();
            ctx.auth.subscribe(move |session| seen.lock().push(session.map(|s| s.user.email.clone())))
        };

        ctx.auth.sign_out().await.unwrap();
        assert_eq!(*seen.lock(), vec![None]);
        assert!(ctx.auth.get_current_session().await.unwrap().is_none());

        // The old token no longer opens the task store.
        let error = ctx.tasks.list_tasks(&session).await.unwrap_err();
        assert!(error.is_auth());
    }

    #[test_context(AuthTestContext)]
    #[tokio::test]
    async fn test_tasks_scoped_to_session_owner(ctx: &mut AuthTestContext) {
        let alice = ctx.auth.sign_up("alice@example.com", "alice-pass").await.unwrap().unwrap();
        let created = ctx
            .tasks
            .create_task(&alice, &NewTask::parse("Test DevOps Task", "2025-12-31").unwrap())
            .await
            .unwrap();
        let bob = ctx.auth.sign_up("bob@example.com", "bob-pass").await.unwrap().unwrap();

        assert!(ctx.tasks.list_tasks(&bob).await.unwrap().is_empty());
        assert_eq!(ctx.tasks.set_completion(&bob, created.id, true).await.unwrap(), 0);
        assert_eq!(ctx.tasks.delete_task(&bob, created.id).await.unwrap(), 0);

        let listed = ctx.tasks.list_tasks(&alice).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(!listed[0].completed);
    }

    #[tokio::test]
    async fn test_expired_session_is_discarded() {
        let ctx = AuthTestContext::with_ttl(tempfile::tempdir().unwrap(), Duration::seconds(-1));
        ctx.auth.sign_up("new@example.com", "secret-pass").await.unwrap().unwrap();

        let notified = Arc::new(Mutex::new(0));
        let _subscription = {
            let notified = notified.clone();
            ctx.auth.subscribe(move |session| {
                assert!(session.is_none());
                *notified.lock() += 1;
            })
        };

        assert!(ctx.auth.get_current_session().await.unwrap().is_none());
        assert_eq!(*notified.lock(), 1);

        let sessions: i64 = ctx
            .db
            .lock()
            .conn
            .query_row("SELECT COUNT(*) FROM auth_sessions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(sessions, 0);
    }

    #[test_context(AuthTestContext)]
    #[tokio::test]
    async fn test_sign_out_notifies_even_when_revoke_fails(ctx: &mut AuthTestContext) {
        ctx.auth.sign_up("new@example.com", "secret-pass").await.unwrap().unwrap();
        ctx.db.lock().conn.execute_batch("DROP TABLE auth_sessions").unwrap();

        let notified = Arc::new(Mutex::new(Vec::new()));
        let _subscription = {
            let notified = notified.clone();
            ctx.auth.subscribe(move |session| notified.lock().push(session.is_some()))
        };

        ctx.auth.sign_out().await.unwrap();

        assert_eq!(*notified.lock(), vec![false]);
        let session_file = ctx.temp_dir.path().join(SESSION_FILE);
        assert!(!session_file.exists());
    }

    #[tokio::test]
    async fn test_oversized_ttl_fails_instead_of_panicking() {
        let ctx = AuthTestContext::with_ttl(tempfile::tempdir().unwrap(), Duration::hours(2_500_000_000));

        let error = ctx.auth.sign_up("new@example.com", "secret-pass").await.unwrap_err();

        assert!(matches!(error, TaskError::Validation(Message::SessionTtlOutOfRange(_))));
        assert!(ctx.auth.get_current_session().await.unwrap().is_none());
    }

    #[test]
    fn test_open_rejects_out_of_range_ttl() {
        let temp_dir = tempfile::tempdir().unwrap();
        let storage = DataStorage::with_base(temp_dir.path());

        assert!(taskdue::api::local::open(&storage, 3_000_000_000).is_err());
        assert!(taskdue::api::local::open(&storage, 0).is_err());
        assert!(taskdue::api::local::open(&storage, 24).is_ok());
    }
}
