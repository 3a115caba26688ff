use crate::domain::booking::Booking;
use crate::domain::car::Car;
use crate::domain::payment::Payment;
use crate::domain::ports::{BookingStore, CarStore, PaymentStore, UserStore};
use crate::domain::user::User;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory catalog of cars behind `Arc<RwLock<HashMap>>` so clones share
/// state. Ids are assigned monotonically by the facade, so sorting by id
/// reproduces catalog insertion order.
#[derive(Default, Clone)]
pub struct InMemoryCarStore {
    cars: Arc<RwLock<HashMap<u32, Car>>>,
}

impl InMemoryCarStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CarStore for InMemoryCarStore {
    async fn store(&self, car: Car) -> Result<()> {
        let mut cars = self.cars.write().await;
        cars.insert(car.id, car);
        Ok(())
    }

    async fn get(&self, car_id: u32) -> Result<Option<Car>> {
        let cars = self.cars.read().await;
        Ok(cars.get(&car_id).cloned())
    }

    async fn remove(&self, car_id: u32) -> Result<()> {
        let mut cars = self.cars.write().await;
        cars.remove(&car_id);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Car>> {
        let cars = self.cars.read().await;
        let mut all: Vec<Car> = cars.values().cloned().collect();
        all.sort_by_key(|car| car.id);
        Ok(all)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryBookingStore {
    bookings: Arc<RwLock<HashMap<u32, Booking>>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn store(&self, booking: Booking) -> Result<()> {
        let mut bookings = self.bookings.write().await;
        bookings.insert(booking.id, booking);
        Ok(())
    }

    async fn get(&self, booking_id: u32) -> Result<Option<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings.get(&booking_id).cloned())
    }

    async fn all(&self) -> Result<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        let mut all: Vec<Booking> = bookings.values().cloned().collect();
        all.sort_by_key(|booking| booking.id);
        Ok(all)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryPaymentStore {
    payments: Arc<RwLock<HashMap<u32, Payment>>>,
}

impl InMemoryPaymentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn store(&self, payment: Payment) -> Result<()> {
        let mut payments = self.payments.write().await;
        payments.insert(payment.id, payment);
        Ok(())
    }

    async fn find_by_booking(&self, booking_id: u32) -> Result<Option<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments
            .values()
            .find(|payment| payment.booking_id == booking_id)
            .cloned())
    }

    async fn all(&self) -> Result<Vec<Payment>> {
        let payments = self.payments.read().await;
        let mut all: Vec<Payment> = payments.values().cloned().collect();
        all.sort_by_key(|payment| payment.id);
        Ok(all)
    }
}

#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<u32, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn store(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;
        users.insert(user.id, user);
        Ok(())
    }

    async fn get(&self, user_id: u32) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&user_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn all(&self) -> Result<Vec<User>> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|user| user.id);
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::car::{CarSpec, CarType};
    use crate::domain::user::Role;
    use rust_decimal_macros::dec;

    fn car(id: u32, registration: &str) -> Car {
        Car::new(
            id,
            CarSpec {
                brand: "Toyota".into(),
                model: "Camry".into(),
                car_type: CarType::Sedan,
                year: 2022,
                color: "Blue".into(),
                price_per_day: dec!(50.0),
                registration: registration.into(),
            },
        )
    }

    #[tokio::test]
    async fn test_car_store_round_trip() {
        let store = InMemoryCarStore::new();
        let c = car(1, "ABC123");
        store.store(c.clone()).await.unwrap();

        assert_eq!(store.get(1).await.unwrap().unwrap(), c);
        assert!(store.get(2).await.unwrap().is_none());

        store.remove(1).await.unwrap();
        assert!(store.get(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_car_store_all_is_id_ordered() {
        let store = InMemoryCarStore::new();
        for id in [3, 1, 2] {
            store.store(car(id, "ABC123")).await.unwrap();
        }
        let ids: Vec<u32> = store.all().await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_payment_store_find_by_booking() {
        use crate::domain::payment::{Payment, PaymentMethod};
        use chrono::NaiveDate;

        let store = InMemoryPaymentStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        store
            .store(Payment::new(1, 7, dec!(150.0), PaymentMethod::Cash, date))
            .await
            .unwrap();

        assert!(store.find_by_booking(7).await.unwrap().is_some());
        assert!(store.find_by_booking(8).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_store_find_by_username() {
        let store = InMemoryUserStore::new();
        let user = User::new(
            1,
            "john".into(),
            "john123".into(),
            "john@example.com".into(),
            Role::Customer,
        );
        store.store(user.clone()).await.unwrap();

        assert_eq!(store.find_by_username("john").await.unwrap(), Some(user));
        assert!(store.find_by_username("nobody").await.unwrap().is_none());
    }
}
