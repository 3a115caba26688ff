use clap::Parser;
use fleetbook::application::rental::RentalService;
use fleetbook::domain::ports::{
    BookingStoreBox, CarStore, CarStoreBox, PaymentStoreBox, UserStore, UserStoreBox,
};
use fleetbook::infrastructure::in_memory::{
    InMemoryBookingStore, InMemoryCarStore, InMemoryPaymentStore, InMemoryUserStore,
};
use fleetbook::infrastructure::transaction_log::TransactionLog;
use fleetbook::interfaces::console::{self, Archives};
use fleetbook::interfaces::csv::cars::CarArchive;
use fleetbook::interfaces::csv::users::UserArchive;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the car/user records and the transaction logs.
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    std::fs::create_dir_all(&cli.data_dir).into_diagnostic()?;

    let archives = Archives {
        cars: CarArchive::new(cli.data_dir.join("cars.dat")),
        users: UserArchive::new(cli.data_dir.join("users.dat")),
    };

    // Archives are read once at startup and rewritten after each mutation.
    let car_store = InMemoryCarStore::new();
    for car in archives.cars.load().into_diagnostic()? {
        car_store.store(car).await.into_diagnostic()?;
    }
    let user_store = InMemoryUserStore::new();
    for user in archives.users.load().into_diagnostic()? {
        user_store.store(user).await.into_diagnostic()?;
    }

    let cars: CarStoreBox = Box::new(car_store);
    let users: UserStoreBox = Box::new(user_store);
    let bookings: BookingStoreBox = Box::new(InMemoryBookingStore::new());
    let payments: PaymentStoreBox = Box::new(InMemoryPaymentStore::new());

    let service = RentalService::new(
        cars,
        bookings,
        payments,
        users,
        TransactionLog::new(&cli.data_dir),
    )
    .await
    .into_diagnostic()?;

    console::run(&service, &archives).await.into_diagnostic()?;
    Ok(())
}
