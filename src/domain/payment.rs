use crate::error::{RentalError, Result};
use chrono::NaiveDate;
use rand::Rng;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    CreditCard,
    PayPal,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CreditCard => "Credit Card",
            PaymentMethod::PayPal => "PayPal",
            PaymentMethod::Cash => "Cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "credit card" | "creditcard" => Ok(PaymentMethod::CreditCard),
            "paypal" => Ok(PaymentMethod::PayPal),
            "cash" => Ok(PaymentMethod::Cash),
            other => Err(RentalError::Validation(format!(
                "method: '{other}' is not one of Credit Card/PayPal/Cash"
            ))),
        }
    }
}

/// A recorded payment is always complete; a failed attempt never produces one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Completed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement record for a booking. Immutable once created; the facade
/// guarantees at most one per booking.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: u32,
    pub booking_id: u32,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_id: String,
}

impl Payment {
    pub fn new(
        id: u32,
        booking_id: u32,
        amount: Decimal,
        method: PaymentMethod,
        date: NaiveDate,
    ) -> Self {
        Self {
            id,
            booking_id,
            amount,
            date,
            method,
            status: PaymentStatus::Completed,
            transaction_id: new_transaction_id(),
        }
    }
}

/// 32 bits of entropy, rendered as 8 hex chars. Independent of the payment id.
pub fn new_transaction_id() -> String {
    format!("{:08X}", rand::thread_rng().r#gen::<u32>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_payment_records_method_and_status() {
        let p = Payment::new(
            1,
            7,
            dec!(150.0),
            PaymentMethod::Cash,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert_eq!(p.booking_id, 7);
        assert_eq!(p.amount, dec!(150.0));
        assert_eq!(p.status, PaymentStatus::Completed);
        assert_eq!(p.method.as_str(), "Cash");
    }

    #[test]
    fn test_transaction_id_shape() {
        let id = new_transaction_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_method_parse_round_trip() {
        for method in [
            PaymentMethod::CreditCard,
            PaymentMethod::PayPal,
            PaymentMethod::Cash,
        ] {
            assert_eq!(method.as_str().parse::<PaymentMethod>().unwrap(), method);
        }
        assert!("Barter".parse::<PaymentMethod>().is_err());
    }
}
