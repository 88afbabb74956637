#[cfg(test)]
mod tests {
    use apcal::db::db::Db;
    use apcal::db::migrations::{get_db_version, needs_migration, MigrationManager};
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct MigrationTestContext {
        temp_dir: TempDir,
    }

    impl MigrationTestContext {
        fn db_path(&self) -> PathBuf {
            self.temp_dir.path().join("data").join("apcal.db")
        }
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            MigrationTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migrations_run_automatically(ctx: &mut MigrationTestContext) {
        let db = Db::open(&ctx.db_path(), Duration::from_secs(1)).unwrap();
        let conn = db.conn();

        assert_eq!(get_db_version(&conn).unwrap(), 5);
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_fresh_connection_needs_migration(ctx: &mut MigrationTestContext) {
        let conn = Db::new_without_migrations(&ctx.db_path()).unwrap();
        assert!(ctx.db_path().exists());
        assert_eq!(get_db_version(&conn).unwrap(), 0);
        assert!(needs_migration(&conn).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_history(ctx: &mut MigrationTestContext) {
        let mut conn = Db::new_without_migrations(&ctx.db_path()).unwrap();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut conn).unwrap();

        let history = manager.get_migration_history(&conn).unwrap();
        let names: Vec<&str> = history.iter().map(|(_, name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "create_users_and_settings",
                "create_work_schedule",
                "create_calendar",
                "create_analytics",
                "create_day_records"
            ]
        );
        for (i, (version, _, _)) in history.iter().enumerate() {
            assert_eq!(*version as usize, i + 1);
        }
        assert!(manager.is_migration_applied(&conn, 3).unwrap());
        assert!(!manager.is_migration_applied(&conn, 6).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migration_idempotency(ctx: &mut MigrationTestContext) {
        let mut conn = Db::new_without_migrations(&ctx.db_path()).unwrap();
        let manager = MigrationManager::new();

        manager.run_migrations(&mut conn).unwrap();
        manager.run_migrations(&mut conn).unwrap();

        assert_eq!(manager.get_migration_history(&conn).unwrap().len(), 5);
        let registrations: i64 = conn
            .query_row("SELECT COUNT(*) FROM analytics_counters WHERE name = 'registrations'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(registrations, 1);
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_reopen_keeps_data(ctx: &mut MigrationTestContext) {
        {
            let db = Db::open(&ctx.db_path(), Duration::from_secs(1)).unwrap();
            db.conn()
                .execute("INSERT INTO settings (key, value) VALUES ('access_code', 'kept')", [])
                .unwrap();
        }

        let db = Db::open(&ctx.db_path(), Duration::from_secs(1)).unwrap();
        let value: String = db
            .conn()
            .query_row("SELECT value FROM settings WHERE key = 'access_code'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(value, "kept");
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_foreign_keys_are_enforced(ctx: &mut MigrationTestContext) {
        let db = Db::open(&ctx.db_path(), Duration::from_secs(1)).unwrap();
        let result = db.conn().execute(
            "INSERT INTO time_slots (date, time, status) VALUES ('2024-06-03', '09:00:00', 'open')",
            [],
        );
        assert!(result.is_err());
    }
}
