use fleetbook::application::rental::RentalService;
use fleetbook::domain::car::{CarSpec, CarType};
use fleetbook::infrastructure::in_memory::{
    InMemoryBookingStore, InMemoryCarStore, InMemoryPaymentStore, InMemoryUserStore,
};
use fleetbook::infrastructure::transaction_log::TransactionLog;
use rust_decimal_macros::dec;
use tempfile::TempDir;

/// A fresh service over in-memory stores, logging into a temp directory.
/// Keep the returned `TempDir` alive for the duration of the test.
pub async fn service() -> (RentalService, TempDir) {
    let dir = TempDir::new().unwrap();
    let service = RentalService::new(
        Box::new(InMemoryCarStore::new()),
        Box::new(InMemoryBookingStore::new()),
        Box::new(InMemoryPaymentStore::new()),
        Box::new(InMemoryUserStore::new()),
        TransactionLog::new(dir.path()),
    )
    .await
    .unwrap();
    (service, dir)
}

pub fn camry_spec() -> CarSpec {
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
