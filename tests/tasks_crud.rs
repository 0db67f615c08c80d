#[cfg(test)]
mod tests {
    use taskdue::db::db::Db;
    use taskdue::db::tasks::Tasks;
    use taskdue::db::users::Users;
    use taskdue::libs::task::NewTask;
    use test_context::{test_context, TestContext};
    use uuid::Uuid;

    struct TaskTestContext {
        db: Db,
        owner: Uuid,
    }

    impl TestContext for TaskTestContext {
        fn setup() -> Self {
            let db = Db::open_in_memory().unwrap();
            let owner = Users::new(&db.conn).create("devops@example.com", "secret-pass").unwrap().id;
            TaskTestContext { db, owner }
        }
    }

    impl TaskTestContext {
        fn tasks(&self) -> Tasks<'_> {
            Tasks::new(&self.db.conn, self.owner)
        }
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_create_then_list(ctx: &mut TaskTestContext) {
        let tasks = ctx.tasks();
        assert!(tasks.list().unwrap().is_empty());

        let created = tasks.insert(&NewTask::parse("Test DevOps Task", "2025-12-31").unwrap()).unwrap();
        assert_eq!(created.user_id, ctx.owner);
        assert!(!created.completed);

        let listed = tasks.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], created);
        assert_eq!(listed[0].description, "Test DevOps Task");
        assert_eq!(listed[0].due_date.to_string(), "2025-12-31");
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_list_orders_by_due_date(ctx: &mut TaskTestContext) {
        let tasks = ctx.tasks();
        tasks.insert(&NewTask::parse("Later", "2025-12-01").unwrap()).unwrap();
        tasks.insert(&NewTask::parse("Sooner", "2025-11-01").unwrap()).unwrap();
        tasks.insert(&NewTask::parse("Also later", "2025-12-01").unwrap()).unwrap();

        let listed: Vec<_> = tasks.list().unwrap().into_iter().map(|t| t.description).collect();
        assert_eq!(listed, vec!["Sooner", "Later", "Also later"]);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_set_completion_is_idempotent(ctx: &mut TaskTestContext) {
        let tasks = ctx.tasks();
        let task = tasks.insert(&NewTask::parse("Renew TLS", "2025-12-31").unwrap()).unwrap();

        assert_eq!(tasks.set_completion(task.id, true).unwrap(), 1);
        assert!(tasks.get(task.id).unwrap().unwrap().completed);

        assert_eq!(tasks.set_completion(task.id, true).unwrap(), 1);
        assert!(tasks.get(task.id).unwrap().unwrap().completed);

        assert_eq!(tasks.set_completion(task.id, false).unwrap(), 1);
        assert!(!tasks.get(task.id).unwrap().unwrap().completed);
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_delete_then_repeat_is_noop(ctx: &mut TaskTestContext) {
        let tasks = ctx.tasks();
        let task = tasks.insert(&NewTask::parse("Decommission", "2025-12-31").unwrap()).unwrap();

        assert_eq!(tasks.delete(task.id).unwrap(), 1);
        assert!(tasks.get(task.id).unwrap().is_none());
        assert_eq!(tasks.delete(task.id).unwrap(), 0);
        assert!(tasks.list().unwrap().is_empty());
    }

    #[test_context(TaskTestContext)]
    #[test]
    fn test_unknown_id_changes_nothing(ctx: &mut TaskTestContext) {
        let tasks = ctx.tasks();
        let missing = Uuid::new_v4();

        assert_eq!(tasks.set_completion(missing, true).unwrap(), 0);
        assert_eq!(tasks.delete(missing).unwrap(), 0);
        assert!(tasks.get(missing).unwrap().is_none());
    }
}
