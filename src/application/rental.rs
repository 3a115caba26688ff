use crate::domain::booking::{Booking, BookingStatus, DateRange};
use crate::domain::car::{Car, CarSpec, CarStatus};
use crate::domain::payment::{Payment, PaymentMethod};
use crate::domain::ports::{BookingStoreBox, CarStoreBox, PaymentStoreBox, UserStoreBox};
use crate::domain::user::{self, Role, User};
use crate::error::{RentalError, Result};
use crate::infrastructure::transaction_log::TransactionLog;
use chrono::{Datelike, Local};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU32, Ordering};
use tokio::sync::Mutex;

/// The rental facade. Every operation that touches more than one entity
/// (car + booking, booking + payment) goes through here, so the entities can
/// never observably disagree: a car is Rented exactly while its booking is
/// Approved or Paid, and a booking is Paid exactly when one payment exists.
///
/// The service owns the storage backends and a mutation lock that serializes
/// each check-then-mutate sequence, so two concurrent approvals or payments
/// for the same booking cannot race.
pub struct RentalService {
    cars: CarStoreBox,
    bookings: BookingStoreBox,
    payments: PaymentStoreBox,
    users: UserStoreBox,
    log: TransactionLog,
    mutation: Mutex<()>,
    next_car_id: AtomicU32,
    next_user_id: AtomicU32,
    next_booking_id: AtomicU32,
    next_payment_id: AtomicU32,
}

impl RentalService {
    /// Builds the service over the given stores, resuming id assignment from
    /// whatever the stores already contain.
    pub async fn new(
        cars: CarStoreBox,
        bookings: BookingStoreBox,
        payments: PaymentStoreBox,
        users: UserStoreBox,
        log: TransactionLog,
    ) -> Result<Self> {
        let next_car_id = next_id_after(cars.all().await?.iter().map(|c| c.id));
        let next_user_id = next_id_after(users.all().await?.iter().map(|u| u.id));
        let next_booking_id = next_id_after(bookings.all().await?.iter().map(|b| b.id));
        let next_payment_id = next_id_after(payments.all().await?.iter().map(|p| p.id));

        Ok(Self {
            cars,
            bookings,
            payments,
            users,
            log,
            mutation: Mutex::new(()),
            next_car_id: AtomicU32::new(next_car_id),
            next_user_id: AtomicU32::new(next_user_id),
            next_booking_id: AtomicU32::new(next_booking_id),
            next_payment_id: AtomicU32::new(next_payment_id),
        })
    }

    // --- catalog ---

    pub async fn add_car(&self, spec: CarSpec) -> Result<Car> {
        let _guard = self.mutation.lock().await;
        spec.validate(Local::now().year())?;
        let clash = self
            .cars
            .all()
            .await?
            .into_iter()
            .any(|car| car.registration == spec.registration);
        if clash {
            return Err(RentalError::Duplicate(format!(
                "registration number '{}'",
                spec.registration
            )));
        }

        let car = Car::new(self.next_car_id.fetch_add(1, Ordering::SeqCst), spec);
        self.cars.store(car.clone()).await?;
        tracing::info!(car_id = car.id, registration = %car.registration, "car added");
        Ok(car)
    }

    pub async fn car(&self, car_id: u32) -> Result<Car> {
        self.cars
            .get(car_id)
            .await?
            .ok_or(RentalError::CarNotFound(car_id))
    }

    pub async fn cars(&self) -> Result<Vec<Car>> {
        self.cars.all().await
    }

    pub async fn available_cars(&self) -> Result<Vec<Car>> {
        Ok(self
            .cars
            .all()
            .await?
            .into_iter()
            .filter(Car::is_available)
            .collect())
    }

    /// Existing bookings keep the total they were priced at.
    pub async fn update_car_price(&self, car_id: u32, price: Decimal) -> Result<Car> {
        let _guard = self.mutation.lock().await;
        if price <= Decimal::ZERO || price > crate::domain::car::MAX_PRICE_PER_DAY {
            return Err(RentalError::Validation(
                "pricePerDay: must be positive and at most 1000".into(),
            ));
        }
        let mut car = self.car(car_id).await?;
        car.price_per_day = price;
        self.cars.store(car.clone()).await?;
        Ok(car)
    }

    /// Existence check only; which transitions make sense is decided by the
    /// booking operations, not the catalog.
    pub async fn set_car_status(&self, car_id: u32, status: CarStatus) -> Result<Car> {
        let _guard = self.mutation.lock().await;
        let mut car = self.car(car_id).await?;
        car.status = status;
        self.cars.store(car.clone()).await?;
        Ok(car)
    }

    /// A car with a Pending or Approved booking cannot be removed.
    pub async fn remove_car(&self, car_id: u32) -> Result<()> {
        let _guard = self.mutation.lock().await;
        self.car(car_id).await?;
        let open = self
            .bookings
            .all()
            .await?
            .into_iter()
            .any(|booking| booking.car_id == car_id && !booking.status.is_terminal());
        if open {
            return Err(RentalError::Validation(format!(
                "car {car_id} still has open bookings"
            )));
        }
        self.cars.remove(car_id).await?;
        tracing::info!(car_id, "car removed");
        Ok(())
    }

    // --- users ---

    pub async fn register_user(&self, username: &str, password: &str, email: &str) -> Result<User> {
        let _guard = self.mutation.lock().await;
        user::validate_registration(username, password, email)?;
        if self.users.find_by_username(username).await?.is_some() {
            return Err(RentalError::Duplicate(format!("username '{username}'")));
        }

        let new_user = User::new(
            self.next_user_id.fetch_add(1, Ordering::SeqCst),
            username.to_string(),
            password.to_string(),
            email.to_string(),
            Role::Customer,
        );
        self.users.store(new_user.clone()).await?;
        tracing::info!(user_id = new_user.id, username, "user registered");
        Ok(new_user)
    }

    /// Used only for seeding known accounts; goes around registration rules.
    pub async fn insert_user(&self, username: &str, password: &str, email: &str, role: Role) -> Result<User> {
        let user = User::new(
            self.next_user_id.fetch_add(1, Ordering::SeqCst),
            username.to_string(),
            password.to_string(),
            email.to_string(),
            role,
        );
        self.users.store(user.clone()).await?;
        Ok(user)
    }

    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        match self.users.find_by_username(username).await? {
            Some(user) if user.password == password => Ok(user),
            _ => Err(RentalError::AuthenticationFailed),
        }
    }

    pub async fn user(&self, user_id: u32) -> Result<User> {
        self.users
            .get(user_id)
            .await?
            .ok_or(RentalError::UserNotFound(user_id))
    }

    pub async fn users(&self) -> Result<Vec<User>> {
        self.users.all().await
    }

    // --- booking lifecycle ---

    /// Creates a Pending booking and parks the car in PendingApproval. The
    /// day count is the exact calendar difference and the total is priced at
    /// the car's current daily rate, once.
    pub async fn book(&self, user_id: u32, car_id: u32, start: &str, end: &str) -> Result<Booking> {
        let _guard = self.mutation.lock().await;
        self.user(user_id).await?;
        let mut car = self.car(car_id).await?;
        if !car.is_available() {
            return Err(RentalError::Validation(format!(
                "car {car_id} is not available"
            )));
        }

        let range = DateRange::parse(start, end)?;
        let booking = Booking::new(
            self.next_booking_id.fetch_add(1, Ordering::SeqCst),
            user_id,
            car_id,
            range,
            car.price_per_day,
            Local::now().date_naive(),
        )?;

        self.bookings.store(booking.clone()).await?;
        car.status = CarStatus::PendingApproval;
        self.cars.store(car).await?;
        tracing::info!(
            booking_id = booking.id,
            car_id,
            user_id,
            days = booking.days,
            total = %booking.total_price,
            "booking created"
        );
        Ok(booking)
    }

    pub async fn approve(&self, booking_id: u32) -> Result<Booking> {
        self.decide(booking_id, BookingStatus::Approved).await
    }

    pub async fn reject(&self, booking_id: u32) -> Result<Booking> {
        self.decide(booking_id, BookingStatus::Rejected).await
    }

    async fn decide(&self, booking_id: u32, decision: BookingStatus) -> Result<Booking> {
        let _guard = self.mutation.lock().await;
        let mut booking = self.booking(booking_id).await?;
        booking.transition(decision)?;

        let mut car = self.car(booking.car_id).await?;
        car.status = match decision {
            BookingStatus::Approved => CarStatus::Rented,
            _ => CarStatus::Available,
        };

        self.bookings.store(booking.clone()).await?;
        self.cars.store(car.clone()).await?;
        tracing::info!(booking_id, status = %booking.status, "booking decided");

        let username = self.username_of(booking.user_id).await?;
        self.log
            .record_booking_update(&username, decision.as_str(), &booking, &car)?;
        Ok(booking)
    }

    /// Cancellation is open to Pending and Approved bookings and always hands
    /// the car back to the catalog.
    pub async fn cancel(&self, booking_id: u32) -> Result<Booking> {
        let _guard = self.mutation.lock().await;
        let mut booking = self.booking(booking_id).await?;
        booking.transition(BookingStatus::Cancelled)?;

        let mut car = self.car(booking.car_id).await?;
        car.status = CarStatus::Available;

        self.bookings.store(booking.clone()).await?;
        self.cars.store(car.clone()).await?;
        tracing::info!(booking_id, "booking cancelled");

        let username = self.username_of(booking.user_id).await?;
        self.log
            .record_booking_update(&username, "Cancelled", &booking, &car)?;
        Ok(booking)
    }

    pub async fn booking(&self, booking_id: u32) -> Result<Booking> {
        self.bookings
            .get(booking_id)
            .await?
            .ok_or(RentalError::BookingNotFound(booking_id))
    }

    pub async fn bookings(&self) -> Result<Vec<Booking>> {
        self.bookings.all().await
    }

    pub async fn bookings_for(&self, user_id: u32) -> Result<Vec<Booking>> {
        Ok(self
            .bookings
            .all()
            .await?
            .into_iter()
            .filter(|booking| booking.user_id == user_id)
            .collect())
    }

    // --- payment ---

    /// Records the one and only payment for an approved booking and flips the
    /// booking to Paid in the same call. The amount must match the booking
    /// total exactly; no partial payments, no overpayment.
    pub async fn pay(
        &self,
        booking_id: u32,
        amount: Decimal,
        method: PaymentMethod,
    ) -> Result<Payment> {
        let _guard = self.mutation.lock().await;
        let mut booking = self.booking(booking_id).await?;
        if self.payments.find_by_booking(booking_id).await?.is_some() {
            return Err(RentalError::AlreadyPaid(booking_id));
        }
        if booking.status != BookingStatus::Approved {
            return Err(RentalError::IneligibleStatus(booking.status));
        }
        if amount != booking.total_price {
            return Err(RentalError::Validation(format!(
                "amount: must equal the booking total of ${:.2}",
                booking.total_price
            )));
        }

        let payment = Payment::new(
            self.next_payment_id.fetch_add(1, Ordering::SeqCst),
            booking_id,
            amount,
            method,
            Local::now().date_naive(),
        );
        self.payments.store(payment.clone()).await?;
        booking.transition(BookingStatus::Paid)?;
        self.bookings.store(booking.clone()).await?;
        tracing::info!(
            booking_id,
            payment_id = payment.id,
            method = %payment.method,
            amount = %payment.amount,
            "payment recorded"
        );

        // State is committed at this point; a failed log write is reported to
        // the caller but not rolled back.
        let user = self.user(booking.user_id).await?;
        let car = self.car(booking.car_id).await?;
        self.log
            .record_transaction(&user, &car, &booking, &payment)?;
        Ok(payment)
    }

    pub async fn payments(&self) -> Result<Vec<Payment>> {
        self.payments.all().await
    }

    pub async fn payment_for_booking(&self, booking_id: u32) -> Result<Option<Payment>> {
        self.payments.find_by_booking(booking_id).await
    }

    // --- audit trail ---

    pub fn log_lines(&self) -> Result<Vec<String>> {
        self.log.read_all()
    }

    async fn username_of(&self, user_id: u32) -> Result<String> {
        Ok(self
            .users
            .get(user_id)
            .await?
            .map(|user| user.username)
            .unwrap_or_else(|| "Unknown".to_string()))
    }
}

fn next_id_after(ids: impl Iterator<Item = u32>) -> u32 {
    ids.max().map_or(1, |max| max + 1)
}
