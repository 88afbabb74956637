#[cfg(test)]
mod tests {
    use apcal::db::db::Db;
    use apcal::libs::config::{CalendarConfig, Config};
    use apcal::libs::error::{CalendarError, ErrorKind};
    use apcal::libs::service::BookingService;
    use apcal::libs::slot::SlotStatus;
    use chrono::NaiveDate;
    use test_context::{test_context, TestContext};

    struct ScheduleTestContext {
        service: BookingService,
    }

    impl TestContext for ScheduleTestContext {
        fn setup() -> Self {
            let config = Config {
                calendar: Some(CalendarConfig {
                    opening_hour: 8,
                    closing_hour: 12,
                    slot_minutes: 30,
                    break_times: vec!["10:00".to_string()],
                    days_off: vec!["Sun".to_string()],
                    ..CalendarConfig::default()
                }),
                ..Config::default()
            };
            let service = BookingService::with_db(Db::open_in_memory().unwrap(), &config).unwrap();
            ScheduleTestContext { service }
        }
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test_context(ScheduleTestContext)]
    #[test]
    fn test_template_seeded_from_config(ctx: &mut ScheduleTestContext) {
        assert_eq!(
            ctx.service.working_hours().unwrap(),
            vec!["08:00", "08:30", "09:00", "09:30", "10:30", "11:00", "11:30"]
        );
        assert_eq!(ctx.service.daily_breaks().unwrap(), vec!["10:00"]);
        assert_eq!(ctx.service.days_off_schedule().unwrap(), vec!["Sunday"]);
    }

    #[test_context(ScheduleTestContext)]
    #[test]
    fn test_schedule_edits_apply_to_new_days_only(ctx: &mut ScheduleTestContext) {
        ctx.service.add_day(date(2024, 6, 3)).unwrap();

        ctx.service.schedule_break("08:00").unwrap();
        ctx.service.schedule_non_break("10:00").unwrap();
        ctx.service.schedule_non_break("12:00").unwrap();
        assert_eq!(ctx.service.daily_breaks().unwrap(), vec!["08:00"]);
        assert!(ctx.service.working_hours().unwrap().contains(&"12:00".to_string()));

        let old = ctx.service.list_available_times("Mon 3 June 2024").unwrap();
        assert!(old.contains(&"08:00".to_string()));
        assert!(!old.contains(&"12:00".to_string()));

        let slots = ctx.service.add_day(date(2024, 6, 4)).unwrap();
        let status = |t: &str| slots.iter().find(|s| s.time.format("%H:%M").to_string() == t).map(|s| s.status);
        assert_eq!(status("08:00"), Some(SlotStatus::Break));
        assert_eq!(status("10:00"), Some(SlotStatus::Open));
        assert_eq!(status("12:00"), Some(SlotStatus::Open));
    }

    #[test_context(ScheduleTestContext)]
    #[test]
    fn test_remove_template_time(ctx: &mut ScheduleTestContext) {
        ctx.service.remove_template_time("11:30").unwrap();
        assert!(!ctx.service.working_hours().unwrap().contains(&"11:30".to_string()));

        let err = ctx.service.remove_template_time("11:30").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = ctx.service.schedule_break("half past eleven").unwrap_err();
        assert!(matches!(err, CalendarError::Parse(_)));
    }

    #[test_context(ScheduleTestContext)]
    #[test]
    fn test_day_from_empty_template_has_no_slots(ctx: &mut ScheduleTestContext) {
        let times = [ctx.service.working_hours().unwrap(), ctx.service.daily_breaks().unwrap()].concat();
        for time in &times {
            ctx.service.remove_template_time(time).unwrap();
        }
        assert!(ctx.service.working_hours().unwrap().is_empty());

        let slots = ctx.service.add_day(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()).unwrap();
        assert!(slots.is_empty());
        assert!(ctx.service.list_time_slots("Mon 3 June 2024").unwrap().is_empty());
    }

    #[test_context(ScheduleTestContext)]
    #[test]
    fn test_days_off(ctx: &mut ScheduleTestContext) {
        ctx.service.schedule_day_off("saturday").unwrap();
        ctx.service.schedule_day_off("Mon").unwrap();
        ctx.service.schedule_day_off("Saturday").unwrap();
        assert_eq!(ctx.service.days_off_schedule().unwrap(), vec!["Monday", "Saturday", "Sunday"]);

        let monday = ctx.service.add_day(date(2024, 6, 3)).unwrap();
        assert!(monday.iter().all(|slot| slot.status == SlotStatus::Break));

        ctx.service.schedule_work_day("Monday").unwrap();
        ctx.service.schedule_work_day("Tuesday").unwrap();
        assert_eq!(ctx.service.days_off_schedule().unwrap(), vec!["Saturday", "Sunday"]);

        let err = ctx.service.schedule_day_off("Someday").unwrap_err();
        assert!(matches!(err, CalendarError::Parse(_)));
    }

    #[test]
    fn test_template_is_seeded_once() {
        let db = Db::open_in_memory().unwrap();
        let service = BookingService::with_db(db.clone(), &Config::default()).unwrap();
        service.remove_template_time("09:00").unwrap();
        service.schedule_work_day("Saturday").unwrap();
        service.set_access_code("changed").unwrap();

        let reopened = BookingService::with_db(db, &Config::default()).unwrap();
        assert!(!reopened.working_hours().unwrap().contains(&"09:00".to_string()));
        assert_eq!(reopened.days_off_schedule().unwrap(), vec!["Sunday"]);
        assert_eq!(reopened.access_code().unwrap(), "changed");
    }

    #[test]
    fn test_invalid_hours_are_rejected() {
        let config = Config {
            calendar: Some(CalendarConfig {
                opening_hour: 17,
                closing_hour: 9,
                ..CalendarConfig::default()
            }),
            ..Config::default()
        };
        assert!(BookingService::with_db(Db::open_in_memory().unwrap(), &config).is_err());

        let config = Config {
            calendar: Some(CalendarConfig {
                slot_minutes: 0,
                ..CalendarConfig::default()
            }),
            ..Config::default()
        };
        assert!(BookingService::with_db(Db::open_in_memory().unwrap(), &config).is_err());

        let config = Config {
            calendar: Some(CalendarConfig {
                slot_minutes: u32::MAX,
                ..CalendarConfig::default()
            }),
            ..Config::default()
        };
        assert!(BookingService::with_db(Db::open_in_memory().unwrap(), &config).is_err());
    }

    #[test]
    fn test_time_correction_is_bounded_on_every_open() {
        let db = Db::open_in_memory().unwrap();
        BookingService::with_db(db.clone(), &Config::default()).unwrap();

        for correction in [i64::MAX / 1000, i64::MIN, 25, -25] {
            let config = Config {
                calendar: Some(CalendarConfig {
                    server_time_correction: correction,
                    ..CalendarConfig::default()
                }),
                ..Config::default()
            };
            let err = BookingService::with_db(db.clone(), &config).err().unwrap();
            assert!(err.to_string().contains("-24..=24"), "{}", err);
        }

        let config = Config {
            calendar: Some(CalendarConfig {
                server_time_correction: -24,
                ..CalendarConfig::default()
            }),
            ..Config::default()
        };
        assert!(BookingService::with_db(db, &config).is_ok());
    }
}
