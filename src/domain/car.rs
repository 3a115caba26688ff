use crate::error::{RentalError, Result};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

pub const MIN_YEAR: i32 = 1900;
/// Upper bound for the daily rate, exclusive lower bound is zero.
pub const MAX_PRICE_PER_DAY: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarStatus {
    Available,
    PendingApproval,
    Rented,
}

impl CarStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarStatus::Available => "Available",
            CarStatus::PendingApproval => "PendingApproval",
            CarStatus::Rented => "Rented",
        }
    }
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarStatus {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Available" => Ok(CarStatus::Available),
            "PendingApproval" => Ok(CarStatus::PendingApproval),
            "Rented" => Ok(CarStatus::Rented),
            other => Err(RentalError::Validation(format!(
                "unknown car status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarType {
    Sedan,
    Suv,
    Truck,
}

impl CarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarType::Sedan => "Sedan",
            CarType::Suv => "SUV",
            CarType::Truck => "Truck",
        }
    }
}

impl fmt::Display for CarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarType {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sedan" => Ok(CarType::Sedan),
            "suv" => Ok(CarType::Suv),
            "truck" => Ok(CarType::Truck),
            other => Err(RentalError::Validation(format!(
                "type: '{other}' is not one of Sedan/SUV/Truck"
            ))),
        }
    }
}

/// The fields an admin supplies when adding a car. Ids are assigned by the
/// catalog, never by the caller.
#[derive(Debug, Clone)]
pub struct CarSpec {
    pub brand: String,
    pub model: String,
    pub car_type: CarType,
    pub year: i32,
    pub color: String,
    pub price_per_day: Decimal,
    pub registration: String,
}

impl CarSpec {
    /// Field-level validation. Registration uniqueness is checked against the
    /// catalog by the caller, everything local to the record is checked here.
    pub fn validate(&self, current_year: i32) -> Result<()> {
        if self.brand.trim().is_empty() {
            return Err(RentalError::Validation("brand: must not be empty".into()));
        }
        if self.model.trim().is_empty() {
            return Err(RentalError::Validation("model: must not be empty".into()));
        }
        if self.color.trim().is_empty() {
            return Err(RentalError::Validation("color: must not be empty".into()));
        }
        if self.year < MIN_YEAR || self.year > current_year {
            return Err(RentalError::Validation(format!(
                "year: must be between {MIN_YEAR} and {current_year}"
            )));
        }
        if self.price_per_day <= Decimal::ZERO || self.price_per_day > MAX_PRICE_PER_DAY {
            return Err(RentalError::Validation(
                "pricePerDay: must be positive and at most 1000".into(),
            ));
        }
        let reg = self.registration.as_str();
        let reg_ok = (2..=10).contains(&reg.len())
            && reg.chars().all(|c| c.is_ascii_alphanumeric() && !c.is_ascii_lowercase());
        if !reg_ok {
            return Err(RentalError::Validation(
                "registrationNumber: expected 2-10 uppercase letters or digits".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub id: u32,
    pub brand: String,
    pub model: String,
    pub car_type: CarType,
    pub year: i32,
    pub color: String,
    pub price_per_day: Decimal,
    pub registration: String,
    pub status: CarStatus,
}

impl Car {
    pub fn new(id: u32, spec: CarSpec) -> Self {
        Self {
            id,
            brand: spec.brand,
            model: spec.model,
            car_type: spec.car_type,
            year: spec.year,
            color: spec.color,
            price_per_day: spec.price_per_day,
            registration: spec.registration,
            status: CarStatus::Available,
        }
    }

    /// Availability is derived from the status so the two can never disagree.
    pub fn is_available(&self) -> bool {
        self.status == CarStatus::Available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn spec() -> CarSpec {
        CarSpec {
            brand: "Toyota".into(),
            model: "Camry".into(),
            car_type: CarType::Sedan,
            year: 2022,
            color: "Blue".into(),
            price_per_day: dec!(50.0),
            registration: "ABC123".into(),
        }
    }

    #[test]
    fn test_valid_spec() {
        assert!(spec().validate(2026).is_ok());
    }

    #[test]
    fn test_empty_brand_rejected() {
        let mut s = spec();
        s.brand = "  ".into();
        let err = s.validate(2026).unwrap_err();
        assert!(matches!(err, RentalError::Validation(msg) if msg.starts_with("brand")));
    }

    #[test]
    fn test_year_bounds() {
        let mut s = spec();
        s.year = 1899;
        assert!(s.validate(2026).is_err());
        s.year = 2027;
        assert!(s.validate(2026).is_err());
        s.year = 1900;
        assert!(s.validate(2026).is_ok());
    }

    #[test]
    fn test_price_bounds() {
        let mut s = spec();
        s.price_per_day = dec!(0);
        assert!(s.validate(2026).is_err());
        s.price_per_day = dec!(1000.01);
        assert!(s.validate(2026).is_err());
        s.price_per_day = dec!(1000);
        assert!(s.validate(2026).is_ok());
    }

    #[test]
    fn test_registration_format() {
        let mut s = spec();
        s.registration = "abc123".into();
        assert!(s.validate(2026).is_err());
        s.registration = "A".into();
        assert!(s.validate(2026).is_err());
        s.registration = "GHI789".into();
        assert!(s.validate(2026).is_ok());
    }

    #[test]
    fn test_new_car_is_available() {
        let car = Car::new(1, spec());
        assert_eq!(car.status, CarStatus::Available);
        assert!(car.is_available());
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            CarStatus::Available,
            CarStatus::PendingApproval,
            CarStatus::Rented,
        ] {
            assert_eq!(status.as_str().parse::<CarStatus>().unwrap(), status);
        }
        assert!("Scrapped".parse::<CarStatus>().is_err());
    }

    #[test]
    fn test_car_type_parse_is_case_insensitive() {
        assert_eq!("suv".parse::<CarType>().unwrap(), CarType::Suv);
        assert_eq!("Sedan".parse::<CarType>().unwrap(), CarType::Sedan);
        assert!("Van".parse::<CarType>().is_err());
    }
}
