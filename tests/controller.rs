mod common;

#[cfg(test)]
mod tests {
    use super::common::{request_failure, session_for, MockAuth, MockBackend, RecordingNavigator};
    use std::sync::Arc;
    use taskdue::api::AuthProvider;
    use taskdue::libs::controller::{Level, Notification, TaskListController, ViewState};
    use taskdue::libs::error::TaskError;
    use taskdue::libs::messages::Message;
    use taskdue::libs::task::NewTask;
    use test_context::{test_context, AsyncTestContext};

    struct ControllerTestContext {
        auth: MockAuth,
        backend: MockBackend,
        navigator: Arc<RecordingNavigator>,
    }

    impl AsyncTestContext for ControllerTestContext {
        async fn setup() -> Self {
            ControllerTestContext {
                auth: MockAuth::signed_in(session_for("devops@example.com")),
                backend: MockBackend::default(),
                navigator: Arc::new(RecordingNavigator::default()),
            }
        }
    }

    impl ControllerTestContext {
        async fn owner(&self) -> uuid::Uuid {
            self.auth.get_current_session().await.unwrap().unwrap().user.id
        }
    }

    #[tokio::test]
    async fn test_mount_without_session_redirects_before_any_request() {
        let auth = MockAuth::default();
        let backend = MockBackend::default();
        let navigator = Arc::new(RecordingNavigator::default());

        let controller = TaskListController::mount(&auth, &backend, navigator.clone()).await;

        assert_eq!(controller.state(), ViewState::Unauthenticated);
        assert_eq!(navigator.redirects(), 1);
        assert!(backend.calls().is_empty());
        assert!(controller.tasks().is_empty());
    }

    #[test_context(ControllerTestContext)]
    #[tokio::test]
    async fn test_mount_loads_sorted_snapshot(ctx: &mut ControllerTestContext) {
        let owner = ctx.owner().await;
        ctx.backend.seed(owner, "Later", "2025-12-01");
        ctx.backend.seed(owner, "Sooner", "2025-11-01");
        ctx.backend.seed(owner, "Also later", "2025-12-01");

        let controller = TaskListController::mount(&ctx.auth, &ctx.backend, ctx.navigator.clone()).await;

        assert_eq!(controller.state(), ViewState::Ready);
        let descriptions: Vec<_> = controller.tasks().iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["Sooner", "Later", "Also later"]);
        assert_eq!(ctx.backend.calls(), vec!["list"]);
    }

    #[test_context(ControllerTestContext)]
    #[tokio::test]
    async fn test_add_refetches(ctx: &mut ControllerTestContext) {
        let mut controller = TaskListController::mount(&ctx.auth, &ctx.backend, ctx.navigator.clone()).await;

        assert!(controller.submit("Test DevOps Task", "2025-12-31").await.unwrap());

        assert_eq!(ctx.backend.calls(), vec!["list", "create", "list"]);
        assert_eq!(controller.tasks().len(), 1);
        assert!(!controller.tasks()[0].completed);
        assert_eq!(
            controller.take_notifications(),
            vec![Notification::success(Message::TaskCreated("Test DevOps Task".to_string()))]
        );
        assert!(controller.take_notifications().is_empty());
    }

    #[test_context(ControllerTestContext)]
    #[tokio::test]
    async fn test_invalid_form_sends_nothing(ctx: &mut ControllerTestContext) {
        let mut controller = TaskListController::mount(&ctx.auth, &ctx.backend, ctx.navigator.clone()).await;

        let blank = controller.submit("   ", "2025-12-31").await.unwrap_err();
        assert_eq!(blank, TaskError::Validation(Message::DescriptionRequired));
        let bad_date = controller.submit("Valid", "31/12/2025").await.unwrap_err();
        assert!(matches!(bad_date, TaskError::Validation(Message::InvalidDueDate(_))));

        assert_eq!(ctx.backend.calls(), vec!["list"]);
    }

    #[test_context(ControllerTestContext)]
    #[tokio::test]
    async fn test_toggle_uses_inverse_of_snapshot(ctx: &mut ControllerTestContext) {
        let owner = ctx.owner().await;
        let task = ctx.backend.seed(owner, "Renew TLS", "2025-12-31");
        let mut controller = TaskListController::mount(&ctx.auth, &ctx.backend, ctx.navigator.clone()).await;

        assert!(controller.toggle_task(task.id).await);
        assert!(controller.tasks()[0].completed);

        assert!(controller.toggle_task(task.id).await);
        assert!(!controller.tasks()[0].completed);

        assert_eq!(ctx.backend.calls(), vec!["list", "update", "list", "update", "list"]);
    }

    #[test_context(ControllerTestContext)]
    #[tokio::test]
    async fn test_remove_refetches(ctx: &mut ControllerTestContext) {
        let owner = ctx.owner().await;
        let task = ctx.backend.seed(owner, "Decommission", "2025-12-31");
        let mut controller = TaskListController::mount(&ctx.auth, &ctx.backend, ctx.navigator.clone()).await;
        assert_eq!(controller.tasks().len(), 1);

        assert!(controller.remove_task(task.id).await);

        assert!(controller.tasks().is_empty());
        assert_eq!(ctx.backend.calls(), vec!["list", "delete", "list"]);
    }

    #[test_context(ControllerTestContext)]
    #[tokio::test]
    async fn test_request_failure_toasts_and_keeps_snapshot(ctx: &mut ControllerTestContext) {
        let owner = ctx.owner().await;
        ctx.backend.seed(owner, "Existing", "2025-12-31");
        let mut controller = TaskListController::mount(&ctx.auth, &ctx.backend, ctx.navigator.clone()).await;
        let before = controller.tasks().to_vec();

        ctx.backend.fail_next(request_failure());
        assert!(!controller.add_task(NewTask::parse("Will fail", "2025-12-01").unwrap()).await);

        assert_eq!(controller.tasks(), before.as_slice());
        assert_eq!(controller.state(), ViewState::Ready);
        let notifications = controller.take_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].level, Level::Error);
        assert_eq!(ctx.navigator.redirects(), 0);
    }

    #[test_context(ControllerTestContext)]
    #[tokio::test]
    async fn test_fetch_failure_keeps_previous_list(ctx: &mut ControllerTestContext) {
        let owner = ctx.owner().await;
        ctx.backend.seed(owner, "Existing", "2025-12-31");
        let mut controller = TaskListController::mount(&ctx.auth, &ctx.backend, ctx.navigator.clone()).await;

        ctx.backend.fail_next(request_failure());
        controller.refresh().await;

        assert_eq!(controller.tasks().len(), 1);
        assert_eq!(controller.state(), ViewState::Ready);
        assert_eq!(
            controller.take_notifications(),
            vec![Notification::error(Message::FetchFailed("connection reset".to_string()))]
        );
    }

    #[test_context(ControllerTestContext)]
    #[tokio::test]
    async fn test_auth_error_redirects(ctx: &mut ControllerTestContext) {
        let mut controller = TaskListController::mount(&ctx.auth, &ctx.backend, ctx.navigator.clone()).await;

        ctx.backend.fail_next(TaskError::Auth(Message::InvalidSessionToken));
        assert!(!controller.submit("Anything", "2025-12-31").await.unwrap());

        assert_eq!(controller.state(), ViewState::Unauthenticated);
        assert_eq!(ctx.navigator.redirects(), 1);
    }

    #[test_context(ControllerTestContext)]
    #[tokio::test]
    async fn test_expiry_while_mounted_redirects(ctx: &mut ControllerTestContext) {
        let mut controller = TaskListController::mount(&ctx.auth, &ctx.backend, ctx.navigator.clone()).await;
        assert_eq!(controller.state(), ViewState::Ready);

        ctx.auth.expire();

        assert_eq!(controller.state(), ViewState::Unauthenticated);
        assert_eq!(ctx.navigator.redirects(), 1);

        // A later operation neither reaches the backend nor redirects again.
        controller.refresh().await;
        assert_eq!(ctx.backend.calls(), vec!["list"]);
        assert_eq!(ctx.navigator.redirects(), 1);
    }

    #[test_context(ControllerTestContext)]
    #[tokio::test]
    async fn test_sign_out_redirects_and_unmount_unsubscribes(ctx: &mut ControllerTestContext) {
        let mut controller = TaskListController::mount(&ctx.auth, &ctx.backend, ctx.navigator.clone()).await;
        assert_eq!(ctx.auth.context().listener_count(), 1);

        controller.sign_out().await;
        assert_eq!(controller.state(), ViewState::Unauthenticated);
        assert_eq!(ctx.navigator.redirects(), 1);

        controller.unmount();
        assert_eq!(ctx.auth.context().listener_count(), 0);
    }
}
