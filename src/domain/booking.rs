use crate::error::{RentalError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a calendar date from strict `YYYY-MM-DD` input.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| RentalError::DateFormat(input.to_string()))
}

/// A rental period. Construction only validates the date format; a
/// non-positive day count is rejected by `Booking::new`, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: parse_date(start)?,
            end: parse_date(end)?,
        })
    }

    /// Whole calendar days between start and end, proleptic Gregorian.
    /// Crossing month and leap-year boundaries is handled by `NaiveDate`.
    pub fn days(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_days()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
    Paid,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Approved => "Approved",
            BookingStatus::Rejected => "Rejected",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Paid => "Paid",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Rejected | BookingStatus::Cancelled | BookingStatus::Paid
        )
    }

    fn allows(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Rejected) | (Pending, Cancelled)
                | (Approved, Cancelled)
                | (Approved, Paid)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Pending" => Ok(BookingStatus::Pending),
            "Approved" => Ok(BookingStatus::Approved),
            "Rejected" => Ok(BookingStatus::Rejected),
            "Cancelled" => Ok(BookingStatus::Cancelled),
            "Paid" => Ok(BookingStatus::Paid),
            other => Err(RentalError::Validation(format!(
                "unknown booking status '{other}'"
            ))),
        }
    }
}

/// A reservation of one car over a date range. Day count and total price are
/// fixed at creation; a later change to the car's daily rate never reprices
/// an existing booking.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: u32,
    pub user_id: u32,
    pub car_id: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i64,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub booked_on: NaiveDate,
}

impl Booking {
    pub fn new(
        id: u32,
        user_id: u32,
        car_id: u32,
        range: DateRange,
        price_per_day: Decimal,
        booked_on: NaiveDate,
    ) -> Result<Self> {
        let days = range.days();
        if days <= 0 {
            return Err(RentalError::InvalidDateRange(days));
        }
        Ok(Self {
            id,
            user_id,
            car_id,
            start: range.start,
            end: range.end,
            days,
            total_price: price_per_day * Decimal::from(days),
            status: BookingStatus::Pending,
            booked_on,
        })
    }

    /// Moves the booking along its lifecycle. Only the edges
    /// Pending -> Approved/Rejected/Cancelled and Approved -> Cancelled/Paid
    /// exist; everything else, including re-applying the current status,
    /// fails with `InvalidTransition`.
    pub fn transition(&mut self, next: BookingStatus) -> Result<()> {
        if !self.status.allows(next) {
            return Err(RentalError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}
