//! Error taxonomy for calendar operations.
//!
//! Every fallible service operation returns [`CalendarError`]. Callers that
//! only need the coarse category (for an HTTP status, an exit code or a
//! legacy integer code) use [`CalendarError::kind`].

use thiserror::Error;

/// Coarse grouping of [`CalendarError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input: wrong access code, malformed day, time or label.
    Validation,
    /// The operation collides with existing state.
    Conflict,
    /// The referenced user, day or booking does not exist.
    NotFound,
    /// The underlying store failed.
    Persistence,
}

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("access code does not match")]
    AccessDenied,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Parse(String),

    #[error("email {0} is already registered")]
    DuplicateEmail(String),

    #[error("day {0} is already in the calendar")]
    DuplicateDay(String),

    #[error("{0} is not available")]
    SlotUnavailable(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("database error: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

impl CalendarError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalendarError::AccessDenied | CalendarError::Validation(_) | CalendarError::Parse(_) => ErrorKind::Validation,
            CalendarError::DuplicateEmail(_) | CalendarError::DuplicateDay(_) | CalendarError::SlotUnavailable(_) => ErrorKind::Conflict,
            CalendarError::NotFound(_) => ErrorKind::NotFound,
            CalendarError::Persistence(_) | CalendarError::PasswordHash(_) => ErrorKind::Persistence,
        }
    }

    /// Legacy registration response code: 2 duplicate email, 3 store failure,
    /// 4 wrong access code. Success is 1 and has no error value.
    pub fn registration_code(&self) -> i32 {
        match self {
            CalendarError::DuplicateEmail(_) => 2,
            CalendarError::AccessDenied => 4,
            _ => 3,
        }
    }
}

pub type CalendarResult<T> = Result<T, CalendarError>;
