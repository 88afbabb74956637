#[cfg(test)]
mod tests {
    use apcal::db::analytics::Analytics;
    use apcal::db::calendar::Calendar;
    use apcal::db::db::Db;
    use apcal::db::settings::Settings;
    use apcal::db::users::{Role, User, Users};
    use apcal::db::work_schedule::WorkSchedule;
    use apcal::libs::slot::{SlotStatus, TimeSlot};
    use chrono::{NaiveDate, NaiveTime, Weekday};
    use test_context::{test_context, TestContext};

    struct StoreTestContext {
        db: Db,
    }

    impl TestContext for StoreTestContext {
        fn setup() -> Self {
            let db = Db::open_in_memory().unwrap();
            Users::new(&db.conn())
                .insert(&User::new("Ada", "Lovelace", "ada@example.com", "hash".to_string()))
                .unwrap();
            StoreTestContext { db }
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn time(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).unwrap()
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_swap_status_only_from_expected_state(ctx: &mut StoreTestContext) {
        let conn = ctx.db.conn();
        let calendar = Calendar::new(&conn);
        calendar.add_day(day()).unwrap();
        calendar
            .insert_slots(day(), &[TimeSlot::new(time(9), SlotStatus::Open), TimeSlot::new(time(12), SlotStatus::Break)])
            .unwrap();

        assert_eq!(calendar.swap_status(day(), time(9), SlotStatus::Open, SlotStatus::Booked).unwrap(), 1);
        assert_eq!(calendar.swap_status(day(), time(9), SlotStatus::Open, SlotStatus::Booked).unwrap(), 0);
        assert_eq!(calendar.swap_status(day(), time(12), SlotStatus::Open, SlotStatus::Booked).unwrap(), 0);
        assert_eq!(calendar.swap_status(day(), time(15), SlotStatus::Open, SlotStatus::Booked).unwrap(), 0);

        assert_eq!(calendar.slot_status(day(), time(9)).unwrap(), Some(SlotStatus::Booked));
        assert_eq!(calendar.slot_status(day(), time(15)).unwrap(), None);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_one_booking_per_slot(ctx: &mut StoreTestContext) {
        let conn = ctx.db.conn();
        let calendar = Calendar::new(&conn);
        calendar.add_day(day()).unwrap();
        calendar.insert_slots(day(), &[TimeSlot::new(time(9), SlotStatus::Booked)]).unwrap();

        let id = calendar.insert_booking(day(), time(9), "ada@example.com").unwrap();
        assert!(id > 0);
        assert!(calendar.insert_booking(day(), time(9), "ada@example.com").is_err());

        let booking = calendar.booking_at(day(), time(9)).unwrap().unwrap();
        assert_eq!(booking.id, id);
        assert!(booking.created_at.is_some());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_booking_needs_known_user_and_slot(ctx: &mut StoreTestContext) {
        let conn = ctx.db.conn();
        let calendar = Calendar::new(&conn);
        calendar.add_day(day()).unwrap();
        calendar.insert_slots(day(), &[TimeSlot::new(time(9), SlotStatus::Booked)]).unwrap();

        assert!(calendar.insert_booking(day(), time(9), "ghost@example.com").is_err());
        assert!(calendar.insert_booking(day(), time(10), "ada@example.com").is_err());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_transaction_rollback_discards_all_stores(ctx: &mut StoreTestContext) {
        {
            let mut conn = ctx.db.conn();
            let tx = conn.transaction().unwrap();
            Calendar::new(&tx).add_day(day()).unwrap();
            Analytics::new(&tx).adjust_bookings("ada@example.com", 1).unwrap();
            // dropped without commit
        }

        let conn = ctx.db.conn();
        assert!(!Calendar::new(&conn).day_exists(day()).unwrap());
        assert!(Analytics::new(&conn).user_stats("ada@example.com").unwrap().is_none());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_booking_total_never_negative(ctx: &mut StoreTestContext) {
        let conn = ctx.db.conn();
        let analytics = Analytics::new(&conn);

        analytics.adjust_bookings("ada@example.com", -1).unwrap();
        assert_eq!(analytics.user_stats("ada@example.com").unwrap().unwrap().bookings_total, 0);

        analytics.adjust_bookings("ada@example.com", 2).unwrap();
        analytics.adjust_bookings("ada@example.com", -3).unwrap();
        assert_eq!(analytics.user_stats("ada@example.com").unwrap().unwrap().bookings_total, 0);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_analytics_counters(ctx: &mut StoreTestContext) {
        let conn = ctx.db.conn();
        let analytics = Analytics::new(&conn);
        let at = day().and_hms_opt(10, 30, 0).unwrap();

        analytics.record_registration("ada@example.com", at).unwrap();
        analytics.record_registration("alan@example.com", at).unwrap();
        analytics.record_login("ada@example.com", at).unwrap();
        analytics.record_login("ada@example.com", at).unwrap();

        assert_eq!(analytics.registration_count().unwrap(), 2);
        let ada = analytics.user_stats("ada@example.com").unwrap().unwrap();
        assert_eq!(ada.registered_at, Some(at));
        assert_eq!(ada.last_login, Some(at));
        assert_eq!(ada.login_count, 2);

        let all = analytics.all().unwrap();
        assert_eq!(all.iter().map(|s| s.email.as_str()).collect::<Vec<_>>(), vec!["ada@example.com", "alan@example.com"]);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_users_and_settings(ctx: &mut StoreTestContext) {
        let conn = ctx.db.conn();
        let users = Users::new(&conn);
        assert!(users.exists("ada@example.com").unwrap());
        assert!(users.insert(&User::new("Ada", "Again", "ada@example.com", "hash".to_string())).is_err());

        assert_eq!(users.set_role("ada@example.com", Role::Admin).unwrap(), 1);
        assert!(users.get("ada@example.com").unwrap().unwrap().is_admin());
        assert_eq!(users.set_role("nobody@example.com", Role::Admin).unwrap(), 0);

        let settings = Settings::new(&conn);
        assert_eq!(settings.access_code().unwrap(), None);
        settings.set_access_code("first").unwrap();
        settings.set_access_code("second").unwrap();
        assert_eq!(settings.access_code().unwrap(), Some("second".to_string()));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_work_schedule_store(ctx: &mut StoreTestContext) {
        let conn = ctx.db.conn();
        let schedule = WorkSchedule::new(&conn);
        assert!(schedule.is_empty().unwrap());

        schedule.set_break(time(10), false).unwrap();
        schedule.set_break(time(9), false).unwrap();
        schedule.set_break(time(10), true).unwrap();
        assert_eq!(schedule.working_hours().unwrap(), vec![time(9)]);
        assert_eq!(schedule.breaks().unwrap(), vec![time(10)]);
        assert_eq!(schedule.template().unwrap().len(), 2);

        schedule.set_day_off(Weekday::Sun, true).unwrap();
        schedule.set_day_off(Weekday::Wed, true).unwrap();
        schedule.set_day_off(Weekday::Sun, true).unwrap();
        assert_eq!(schedule.days_off().unwrap(), vec![Weekday::Wed, Weekday::Sun]);
        assert!(schedule.is_day_off(Weekday::Wed).unwrap());

        schedule.set_day_off(Weekday::Wed, false).unwrap();
        assert!(!schedule.is_day_off(Weekday::Wed).unwrap());
    }
}
