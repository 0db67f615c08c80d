#[cfg(test)]
mod tests {
    use taskdue::db::db::Db;
    use taskdue::db::tasks::Tasks;
    use taskdue::db::users::Users;
    use taskdue::libs::error::TaskError;
    use taskdue::libs::messages::Message;
    use taskdue::libs::task::NewTask;
    use test_context::{test_context, TestContext};
    use uuid::Uuid;

    struct IsolationTestContext {
        db: Db,
        alice: Uuid,
        bob: Uuid,
    }

    impl TestContext for IsolationTestContext {
        fn setup() -> Self {
            let db = Db::open_in_memory().unwrap();
            let users = Users::new(&db.conn);
            let alice = users.create("alice@example.com", "alice-pass").unwrap().id;
            let bob = users.create("bob@example.com", "bob-pass").unwrap().id;
            IsolationTestContext { db, alice, bob }
        }
    }

    #[test_context(IsolationTestContext)]
    #[test]
    fn test_select_never_returns_foreign_rows(ctx: &mut IsolationTestContext) {
        let alice = Tasks::new(&ctx.db.conn, ctx.alice);
        let bob = Tasks::new(&ctx.db.conn, ctx.bob);
        let task = alice.insert(&NewTask::parse("Alice's task", "2025-12-31").unwrap()).unwrap();
        bob.insert(&NewTask::parse("Bob's task", "2025-12-30").unwrap()).unwrap();

        let seen_by_bob = bob.list().unwrap();
        assert_eq!(seen_by_bob.len(), 1);
        assert!(seen_by_bob.iter().all(|t| t.user_id == ctx.bob));
        assert!(bob.get(task.id).unwrap().is_none());

        let seen_by_alice = alice.list().unwrap();
        assert_eq!(seen_by_alice.len(), 1);
        assert_eq!(seen_by_alice[0].id, task.id);
    }

    #[test_context(IsolationTestContext)]
    #[test]
    fn test_foreign_update_and_delete_affect_zero_rows(ctx: &mut IsolationTestContext) {
        let alice = Tasks::new(&ctx.db.conn, ctx.alice);
        let bob = Tasks::new(&ctx.db.conn, ctx.bob);
        let task = alice.insert(&NewTask::parse("Alice's task", "2025-12-31").unwrap()).unwrap();

        assert_eq!(bob.set_completion(task.id, true).unwrap(), 0);
        assert_eq!(bob.delete(task.id).unwrap(), 0);

        let untouched = alice.get(task.id).unwrap().unwrap();
        assert!(!untouched.completed);
    }

    #[test_context(IsolationTestContext)]
    #[test]
    fn test_insert_for_another_owner_is_rejected(ctx: &mut IsolationTestContext) {
        let bob = Tasks::new(&ctx.db.conn, ctx.bob);

        let result = bob.insert_for(ctx.alice, &NewTask::parse("Sneaky", "2025-12-31").unwrap());
        assert_eq!(result.unwrap_err(), TaskError::Request(Message::PolicyViolation));
        assert!(Tasks::new(&ctx.db.conn, ctx.alice).list().unwrap().is_empty());
    }
}
