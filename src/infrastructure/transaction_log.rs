use crate::domain::booking::Booking;
use crate::domain::car::Car;
use crate::domain::payment::Payment;
use crate::domain::user::User;
use crate::error::Result;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const TRANSACTIONS_FILE: &str = "transactions.log";
pub const BOOKING_UPDATES_FILE: &str = "booking_updates.log";

/// Append-only audit trail. Completed transactions and booking status changes
/// go to separate files; entries are never rewritten. Writers serialize on a
/// mutex so interleaved partial blocks cannot occur.
///
/// The records are observational only. Field values are written as-is, with
/// no escaping of embedded separators.
pub struct TransactionLog {
    transactions_path: PathBuf,
    updates_path: PathBuf,
    lock: Mutex<()>,
}

impl TransactionLog {
    pub fn new(dir: &Path) -> Self {
        Self {
            transactions_path: dir.join(TRANSACTIONS_FILE),
            updates_path: dir.join(BOOKING_UPDATES_FILE),
            lock: Mutex::new(()),
        }
    }

    /// Appends the full snapshot of a completed transaction: who paid, for
    /// which car and booking, and through which payment.
    pub fn record_transaction(
        &self,
        user: &User,
        car: &Car,
        booking: &Booking,
        payment: &Payment,
    ) -> Result<()> {
        let _guard = self.lock.lock().expect("log mutex poisoned");
        let mut out = append_to(&self.transactions_path)?;

        writeln!(out, "=== TRANSACTION LOG ===")?;
        writeln!(out, "Timestamp: {}", timestamp())?;
        writeln!(out, "Customer Details:")?;
        writeln!(out, "  Username: {}", user.username)?;
        writeln!(out, "  Email: {}", user.email)?;
        writeln!(out, "Car Details:")?;
        writeln!(out, "  ID: {}", car.id)?;
        writeln!(out, "  Brand: {} {}", car.brand, car.model)?;
        writeln!(out, "  Type: {}", car.car_type)?;
        writeln!(out, "  Registration: {}", car.registration)?;
        writeln!(out, "Booking Details:")?;
        writeln!(out, "  Booking ID: {}", booking.id)?;
        writeln!(out, "  Start Date: {}", booking.start)?;
        writeln!(out, "  End Date: {}", booking.end)?;
        writeln!(out, "  Duration: {} days", booking.days)?;
        writeln!(out, "Payment Details:")?;
        writeln!(out, "  Payment ID: {}", payment.id)?;
        writeln!(out, "  Amount: ${:.2}", payment.amount)?;
        writeln!(out, "  Method: {}", payment.method)?;
        writeln!(out, "  Status: {}", payment.status)?;
        writeln!(out, "  Transaction ID: {}", payment.transaction_id)?;
        writeln!(out, "Revenue Generated: ${:.2}", payment.amount)?;
        writeln!(out, "========================")?;
        Ok(())
    }

    /// Appends a booking status change (approval, rejection, cancellation).
    pub fn record_booking_update(
        &self,
        username: &str,
        action: &str,
        booking: &Booking,
        car: &Car,
    ) -> Result<()> {
        let _guard = self.lock.lock().expect("log mutex poisoned");
        let mut out = append_to(&self.updates_path)?;

        writeln!(out, "=== BOOKING UPDATE ===")?;
        writeln!(out, "Timestamp: {}", timestamp())?;
        writeln!(out, "Action: {action}")?;
        writeln!(out, "Customer: {username}")?;
        writeln!(out, "Booking Details:")?;
        writeln!(out, "  Booking ID: {}", booking.id)?;
        writeln!(out, "  Car: {} {}", car.brand, car.model)?;
        writeln!(out, "  Status: {}", booking.status)?;
        writeln!(out, "========================")?;
        Ok(())
    }

    /// Every line from both records in append order, transactions first.
    /// A file that does not exist yet contributes nothing.
    pub fn read_all(&self) -> Result<Vec<String>> {
        let _guard = self.lock.lock().expect("log mutex poisoned");
        let mut lines = Vec::new();
        for path in [&self.transactions_path, &self.updates_path] {
            if !path.exists() {
                continue;
            }
            let reader = BufReader::new(File::open(path)?);
            for line in reader.lines() {
                lines.push(line?);
            }
        }
        Ok(lines)
    }
}

fn append_to(path: &Path) -> Result<File> {
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::booking::DateRange;
    use crate::domain::car::{CarSpec, CarType};
    use crate::domain::payment::PaymentMethod;
    use crate::domain::user::Role;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    fn fixtures() -> (User, Car, Booking, Payment) {
        let user = User::new(
            2,
            "john".into(),
            "john123".into(),
            "john@example.com".into(),
            Role::Customer,
        );
        let car = Car::new(
            1,
            CarSpec {
                brand: "Toyota".into(),
                model: "Camry".into(),
                car_type: CarType::Sedan,
                year: 2022,
                color: "Blue".into(),
                price_per_day: dec!(50.0),
                registration: "ABC123".into(),
            },
        );
        let booking = Booking::new(
            5,
            user.id,
            car.id,
            DateRange::parse("2024-01-01", "2024-01-04").unwrap(),
            car.price_per_day,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
        .unwrap();
        let payment = Payment::new(
            9,
            booking.id,
            booking.total_price,
            PaymentMethod::Cash,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        (user, car, booking, payment)
    }

    #[test]
    fn test_transaction_block_layout() {
        let dir = tempdir().unwrap();
        let log = TransactionLog::new(dir.path());
        let (user, car, booking, payment) = fixtures();

        log.record_transaction(&user, &car, &booking, &payment)
            .unwrap();

        let lines = log.read_all().unwrap();
        assert_eq!(lines[0], "=== TRANSACTION LOG ===");
        assert!(lines.contains(&"  Username: john".to_string()));
        assert!(lines.contains(&"  Duration: 3 days".to_string()));
        assert!(lines.contains(&"  Method: Cash".to_string()));
        assert!(lines.contains(&"Revenue Generated: $150.00".to_string()));
        assert_eq!(lines.last().unwrap(), "========================");
    }

    #[test]
    fn test_append_order_preserved() {
        let dir = tempdir().unwrap();
        let log = TransactionLog::new(dir.path());
        let (user, car, mut booking, payment) = fixtures();

        log.record_transaction(&user, &car, &booking, &payment)
            .unwrap();
        booking.status = crate::domain::booking::BookingStatus::Approved;
        log.record_booking_update(&user.username, "Approved", &booking, &car)
            .unwrap();
        log.record_booking_update(&user.username, "Cancelled", &booking, &car)
            .unwrap();

        let lines = log.read_all().unwrap();
        let first_update = lines
            .iter()
            .position(|l| l == "=== BOOKING UPDATE ===")
            .unwrap();
        // Transaction blocks come first, update blocks after, in write order.
        assert!(lines[..first_update].contains(&"=== TRANSACTION LOG ===".to_string()));
        let actions: Vec<&String> = lines.iter().filter(|l| l.starts_with("Action: ")).collect();
        assert_eq!(actions, ["Action: Approved", "Action: Cancelled"]);
    }

    #[test]
    fn test_read_all_without_files_is_empty() {
        let dir = tempdir().unwrap();
        let log = TransactionLog::new(dir.path());
        assert!(log.read_all().unwrap().is_empty());
    }
}
