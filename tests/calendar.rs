#[cfg(test)]
mod tests {
    use apcal::db::db::Db;
    use apcal::db::users::User;
    use apcal::libs::config::Config;
    use apcal::libs::error::{CalendarError, ErrorKind};
    use apcal::libs::service::BookingService;
    use apcal::libs::slot::{SlotStatus, TimeSlot};
    use chrono::{NaiveDate, NaiveTime};
    use test_context::{test_context, TestContext};

    struct CalendarTestContext {
        service: BookingService,
        user: User,
    }

    impl TestContext for CalendarTestContext {
        fn setup() -> Self {
            let service = BookingService::with_db(Db::open_in_memory().unwrap(), &Config::default()).unwrap();
            let user = service.register("Ada", "Lovelace", "ada@example.com", "engine", "welcome").unwrap();
            CalendarTestContext { service, user }
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test_context(CalendarTestContext)]
    #[test]
    fn test_days_are_listed_ascending(ctx: &mut CalendarTestContext) {
        ctx.service.add_day(date(2024, 6, 5)).unwrap();
        ctx.service.add_day(date(2024, 1, 15)).unwrap();
        ctx.service.add_day(date(2024, 6, 3)).unwrap();
        ctx.service.add_day(date(2023, 12, 31)).unwrap();

        assert_eq!(
            ctx.service.list_available_days().unwrap(),
            vec!["Sun 31 December 2023", "Mon 15 January 2024", "Mon 3 June 2024", "Wed 5 June 2024"]
        );
        let dates = ctx.service.list_available_dates().unwrap();
        assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test_context(CalendarTestContext)]
    #[test]
    fn test_add_day_seeds_from_template(ctx: &mut CalendarTestContext) {
        let slots = ctx.service.add_day(date(2024, 6, 3)).unwrap();
        assert_eq!(slots.len(), 8);
        assert_eq!(slots[0], TimeSlot::new(time(9, 0), SlotStatus::Open));
        assert!(slots.contains(&TimeSlot::new(time(12, 0), SlotStatus::Break)));
        assert_eq!(slots.iter().filter(|slot| slot.status == SlotStatus::Open).count(), 7);

        assert_eq!(ctx.service.list_time_slots("Mon 3 June 2024").unwrap(), slots);
    }

    #[test_context(CalendarTestContext)]
    #[test]
    fn test_day_off_is_seeded_as_breaks(ctx: &mut CalendarTestContext) {
        let slots = ctx.service.add_day(date(2024, 6, 8)).unwrap();
        assert!(!slots.is_empty());
        assert!(slots.iter().all(|slot| slot.status == SlotStatus::Break));
        assert!(ctx.service.list_available_times("Sat 8 June 2024").unwrap().is_empty());
    }

    #[test_context(CalendarTestContext)]
    #[test]
    fn test_duplicate_day_is_rejected(ctx: &mut CalendarTestContext) {
        ctx.service.add_day(date(2024, 6, 3)).unwrap();
        ctx.service.book("Mon 3 June 2024", "10:00", &ctx.user).unwrap();

        let err = ctx.service.add_day(date(2024, 6, 3)).unwrap_err();
        assert!(matches!(err, CalendarError::DuplicateDay(_)));
        assert_eq!(err.kind(), ErrorKind::Conflict);

        assert_eq!(ctx.service.list_available_days().unwrap().len(), 1);
        assert_eq!(ctx.service.list_appointments_for_day("Mon 3 June 2024").unwrap().len(), 1);
    }

    #[test_context(CalendarTestContext)]
    #[test]
    fn test_delete_day_removes_slots_and_bookings(ctx: &mut CalendarTestContext) {
        ctx.service.add_day(date(2024, 6, 3)).unwrap();
        ctx.service.add_day(date(2024, 6, 4)).unwrap();
        ctx.service.book("Mon 3 June 2024", "10:00", &ctx.user).unwrap();

        ctx.service.delete_day(date(2024, 6, 3)).unwrap();
        assert_eq!(ctx.service.list_available_days().unwrap(), vec!["Tue 4 June 2024"]);
        assert!(ctx.service.list_available_times("Mon 3 June 2024").unwrap().is_empty());
        assert!(ctx.service.list_appointments_for_user("ada@example.com").unwrap().is_empty());

        let err = ctx.service.list_time_slots("Mon 3 June 2024").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = ctx.service.delete_day(date(2024, 6, 3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test_context(CalendarTestContext)]
    #[test]
    fn test_unknown_day_has_no_times(ctx: &mut CalendarTestContext) {
        assert!(ctx.service.list_available_times("Fri 7 June 2024").unwrap().is_empty());

        let err = ctx.service.list_available_times("Friday 7 June").unwrap_err();
        assert!(matches!(err, CalendarError::Parse(_)));
    }

    #[test_context(CalendarTestContext)]
    #[test]
    fn test_set_slot_statuses_keeps_bookings(ctx: &mut CalendarTestContext) {
        ctx.service.add_day(date(2024, 6, 3)).unwrap();
        ctx.service.book("Mon 3 June 2024", "10:00", &ctx.user).unwrap();

        ctx.service
            .set_slot_statuses("Mon 3 June 2024", "08:00=open; 10:00=break, 12:30=open, 13:00=break")
            .unwrap();

        assert_eq!(
            ctx.service.list_time_slots("Mon 3 June 2024").unwrap(),
            vec![
                TimeSlot::new(time(8, 0), SlotStatus::Open),
                TimeSlot::new(time(10, 0), SlotStatus::Booked),
                TimeSlot::new(time(12, 30), SlotStatus::Open),
                TimeSlot::new(time(13, 0), SlotStatus::Break),
            ]
        );
        assert_eq!(ctx.service.list_available_times("Mon 3 June 2024").unwrap(), vec!["08:00", "12:30"]);
        assert_eq!(ctx.service.list_appointments_for_day("Mon 3 June 2024").unwrap(), vec!["Ada Lovelace @ 10:00"]);
    }

    #[test_context(CalendarTestContext)]
    #[test]
    fn test_set_slot_statuses_rejects_bad_input(ctx: &mut CalendarTestContext) {
        ctx.service.add_day(date(2024, 6, 3)).unwrap();
        let before = ctx.service.list_time_slots("Mon 3 June 2024").unwrap();

        for encoded in ["09:00=booked", "09:00", "9am=open", "09:00=closed"] {
            assert!(ctx.service.set_slot_statuses("Mon 3 June 2024", encoded).is_err(), "{}", encoded);
        }
        assert_eq!(ctx.service.list_time_slots("Mon 3 June 2024").unwrap(), before);

        let err = ctx.service.set_slot_statuses("Tue 4 June 2024", "09:00=open").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test_context(CalendarTestContext)]
    #[test]
    fn test_users_booked_on(ctx: &mut CalendarTestContext) {
        let alan = ctx.service.register("Alan", "Turing", "alan@example.com", "enigma", "welcome").unwrap();
        ctx.service.add_day(date(2024, 6, 3)).unwrap();
        ctx.service.book("Mon 3 June 2024", "09:00", &alan).unwrap();
        ctx.service.book("Mon 3 June 2024", "10:00", &ctx.user).unwrap();
        ctx.service.book("Mon 3 June 2024", "11:00", &ctx.user).unwrap();

        assert_eq!(
            ctx.service.users_booked_on(date(2024, 6, 3)).unwrap(),
            vec!["ada@example.com", "alan@example.com"]
        );
        assert!(ctx.service.users_booked_on(date(2024, 6, 4)).unwrap().is_empty());
    }

    #[test_context(CalendarTestContext)]
    #[test]
    fn test_archive_day_survives_deletion(ctx: &mut CalendarTestContext) {
        ctx.service.add_day(date(2024, 6, 3)).unwrap();
        ctx.service.book("Mon 3 June 2024", "09:00", &ctx.user).unwrap();
        ctx.service.book("Mon 3 June 2024", "14:00", &ctx.user).unwrap();

        assert_eq!(ctx.service.archive_day(date(2024, 6, 3)).unwrap(), 2);
        assert_eq!(ctx.service.archive_day(date(2024, 6, 3)).unwrap(), 0);
        ctx.service.delete_day(date(2024, 6, 3)).unwrap();

        let records = ctx.service.archived_bookings(date(2024, 6, 3)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].time, time(9, 0));
        assert_eq!(records[1].time, time(14, 0));
        assert_eq!(records[1].email, "ada@example.com");
        assert_eq!(ctx.service.archived_days().unwrap(), vec!["Mon 3 June 2024"]);
    }

    #[test_context(CalendarTestContext)]
    #[test]
    fn test_nothing_archived_yet(ctx: &mut CalendarTestContext) {
        ctx.service.add_day(date(2024, 6, 3)).unwrap();
        ctx.service.book("Mon 3 June 2024", "09:00", &ctx.user).unwrap();

        assert!(ctx.service.archived_bookings(date(2024, 6, 3)).unwrap().is_empty());
        assert!(ctx.service.archived_days().unwrap().is_empty());
    }

    #[test_context(CalendarTestContext)]
    #[test]
    fn test_archive_unknown_day(ctx: &mut CalendarTestContext) {
        let err = ctx.service.archive_day(date(2024, 6, 3)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
