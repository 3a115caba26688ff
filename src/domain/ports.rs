use super::booking::Booking;
use super::car::Car;
use super::payment::Payment;
use super::user::User;
use crate::error::Result;
use async_trait::async_trait;

pub type CarStoreBox = Box<dyn CarStore>;
pub type BookingStoreBox = Box<dyn BookingStore>;
pub type PaymentStoreBox = Box<dyn PaymentStore>;
pub type UserStoreBox = Box<dyn UserStore>;

#[async_trait]
pub trait CarStore: Send + Sync {
    /// Inserts or replaces the car keyed by its id.
    async fn store(&self, car: Car) -> Result<()>;
    async fn get(&self, car_id: u32) -> Result<Option<Car>>;
    async fn remove(&self, car_id: u32) -> Result<()>;
    /// All cars in catalog insertion order.
    async fn all(&self) -> Result<Vec<Car>>;
}

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn store(&self, booking: Booking) -> Result<()>;
    async fn get(&self, booking_id: u32) -> Result<Option<Booking>>;
    async fn all(&self) -> Result<Vec<Booking>>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn store(&self, payment: Payment) -> Result<()>;
    async fn find_by_booking(&self, booking_id: u32) -> Result<Option<Payment>>;
    async fn all(&self) -> Result<Vec<Payment>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn store(&self, user: User) -> Result<()>;
    async fn get(&self, user_id: u32) -> Result<Option<User>>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn all(&self) -> Result<Vec<User>>;
}
