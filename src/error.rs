use crate::domain::booking::BookingStatus;
use thiserror::Error;

pub type Result<T, E = RentalError> = std::result::Result<T, E>;

/// Recoverable error conditions surfaced by the rental core.
///
/// None of these are fatal to the process. The console layer catches them,
/// displays the message and re-prompts.
#[derive(Error, Debug)]
pub enum RentalError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("car {0} not found")]
    CarNotFound(u32),
    #[error("booking {0} not found")]
    BookingNotFound(u32),
    #[error("user {0} not found")]
    UserNotFound(u32),
    #[error("booking cannot go from {from:?} to {to:?}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    DateFormat(String),
    #[error("invalid date range: {0} rental day(s)")]
    InvalidDateRange(i64),
    #[error("booking {0} already has a recorded payment")]
    AlreadyPaid(u32),
    #[error("booking is {0:?}, not eligible for payment")]
    IneligibleStatus(BookingStatus),
    #[error("duplicate {0}")]
    Duplicate(String),
    #[error("authentication failed: invalid username or password")]
    AuthenticationFailed,
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
