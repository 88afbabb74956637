#[derive(Debug, Clone)]
pub enum Message {
    // === USER MESSAGES ===
    UserRegistered(String), // email
    UserAlreadyExists(String),
    UserNotFound(String),
    UserPromoted(String),
    AccessCodeRejected,
    LoginSucceeded(String),
    AdminLoginSucceeded(String),
    LoginWrongPassword,
    LoginUnknownEmail,
    LoginAnalyticsFailed(String), // error
    UserHeader,

    // === CALENDAR DAY MESSAGES ===
    DayAdded(String),
    DayAlreadyExists(String),
    DayDeleted(String),
    DayArchived(String, usize), // day, bookings archived
    ArchivedBookingsHeader(String),
    ArchivedDaysHeader,
    NoArchivedDays,
    EmptyWorkSchedule(String),
    DaysHeader,
    NoDaysFound,
    TimesHeader(String),
    NoOpenTimes(String),
    SlotsHeader(String),
    SlotsUpdated(String),
    UsersBookedHeader(String),
    NoUsersBooked(String),

    // === BOOKING MESSAGES ===
    AppointmentBooked(String),    // label
    AppointmentCancelled(String), // label
    SlotUnavailable(String),      // label
    AppointmentsHeader(String),   // email or day
    NextAppointmentsHeader,
    NoAppointments,

    // === WORK SCHEDULE MESSAGES ===
    WorkingHoursHeader,
    DailyBreaksHeader,
    DaysOffHeader,
    BreakScheduled(String),
    WorkingHourScheduled(String),
    TemplateTimeRemoved(String),
    DayOffScheduled(String),
    WorkDayScheduled(String),
    ScheduleSeeded(usize),

    // === ACCESS CODE MESSAGES ===
    AccessCodeCurrent(String),
    AccessCodeUpdated,

    // === ANALYTICS MESSAGES ===
    RegistrationCount(i64),
    StatsHeader,

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleDatabase,
    ConfigModuleCalendar,
    ConfigModuleRegistration,

    // === VALIDATION MESSAGES ===
    InvalidDay(String),
    InvalidTime(String),
    InvalidWeekday(String),
    InvalidBookingLabel(String),
    InvalidSlotEntry(String),
    InvalidSlotStatus(String),
    InvalidEmail(String),
    EmptyField(&'static str),
    InvalidTimeCorrection(i64),
    CorrectionOutOfRange(String, i64), // instant, hours

    // === DATABASE MESSAGES ===
    DbOperationFailed(String, String), // operation, error

    // === PROMPTS ===
    PromptDatabasePath,
    PromptServerTimeCorrection,
    PromptOpeningHour,
    PromptClosingHour,
    PromptSlotMinutes,
    PromptInitialAccessCode,
    PromptPassword,
    PromptRepeatPassword,
    PasswordMismatch,
    PromptSelectModules,

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),        // count
    RunningMigration(u32, String), // version, name
    MigrationCompleted(u32),       // version
    MigrationFailed(u32, String),  // version, error
    AllMigrationsCompleted,
}
