//! Interactive menu front end. All inputs are read line-by-line from stdin;
//! every recoverable core error is displayed and the menu re-prompts. EOF on
//! stdin unwinds cleanly to the top-level loop.

use crate::application::rental::RentalService;
use crate::application::reports;
use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::car::{Car, CarSpec, CarStatus, CarType};
use crate::domain::payment::PaymentMethod;
use crate::domain::user::{Role, User};
use crate::error::Result;
use crate::interfaces::csv::cars::CarArchive;
use crate::interfaces::csv::users::UserArchive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::io::{self, Write};
use std::str::FromStr;

/// The flat-file stores behind the in-memory state. Rewritten in full after
/// each mutation; a failed write is reported but in-memory state stands.
pub struct Archives {
    pub cars: CarArchive,
    pub users: UserArchive,
}

pub async fn run(service: &RentalService, archives: &Archives) -> Result<()> {
    seed(service, archives).await?;

    loop {
        println!("\n=== CAR RENTAL SYSTEM ===");
        println!("1. Login");
        println!("2. Register New User");
        println!("0. Exit");
        let Some(choice) = prompt("Enter your choice: ")? else {
            break;
        };
        match choice.as_str() {
            "1" => login(service, archives).await?,
            "2" => register(service, archives).await?,
            "0" => {
                println!("Exiting system...");
                break;
            }
            _ => println!("Invalid choice! Try again."),
        }
    }
    Ok(())
}

/// Known accounts and a small sample fleet, inserted only when the archives
/// came up empty.
async fn seed(service: &RentalService, archives: &Archives) -> Result<()> {
    if service.users().await?.is_empty() {
        service
            .insert_user("admin", "admin123", "admin@carrental.com", Role::Admin)
            .await?;
        service
            .insert_user("john", "john123", "john@example.com", Role::Customer)
            .await?;
        service
            .insert_user("alice", "alice123", "alice@example.com", Role::Customer)
            .await?;
        archives.users.save(&service.users().await?)?;
    }
    if service.cars().await?.is_empty() {
        for spec in sample_fleet() {
            service.add_car(spec).await?;
        }
        archives.cars.save(&service.cars().await?)?;
    }
    Ok(())
}

fn sample_fleet() -> Vec<CarSpec> {
    vec![
        CarSpec {
            brand: "Toyota".into(),
            model: "Camry".into(),
            car_type: CarType::Sedan,
            year: 2022,
            color: "Blue".into(),
            price_per_day: dec!(50.0),
            registration: "ABC123".into(),
        },
        CarSpec {
            brand: "Honda".into(),
            model: "Civic".into(),
            car_type: CarType::Sedan,
            year: 2021,
            color: "Red".into(),
            price_per_day: dec!(45.0),
            registration: "DEF456".into(),
        },
        CarSpec {
            brand: "Ford".into(),
            model: "Explorer".into(),
            car_type: CarType::Suv,
            year: 2023,
            color: "Black".into(),
            price_per_day: dec!(70.0),
            registration: "GHI789".into(),
        },
        CarSpec {
            brand: "Chevrolet".into(),
            model: "Silverado".into(),
            car_type: CarType::Truck,
            year: 2020,
            color: "White".into(),
            price_per_day: dec!(85.0),
            registration: "JKL012".into(),
        },
    ]
}

async fn login(service: &RentalService, archives: &Archives) -> Result<()> {
    println!("\n--- Login ---");
    let Some(username) = prompt("Username: ")? else {
        return Ok(());
    };
    let Some(password) = prompt("Password: ")? else {
        return Ok(());
    };

    match service.authenticate(&username, &password).await {
        Ok(user) => {
            println!("Login successful! Welcome, {}.", user.username);
            match user.role {
                Role::Admin => admin_menu(service, archives, &user).await,
                Role::Customer => customer_menu(service, archives, &user).await,
            }
        }
        Err(err) => {
            println!("Error: {err}");
            Ok(())
        }
    }
}

async fn register(service: &RentalService, archives: &Archives) -> Result<()> {
    println!("\n--- Register New User ---");
    let Some(username) = prompt("Username (3-20 chars, no spaces): ")? else {
        return Ok(());
    };
    let Some(password) = prompt("Password (6+ chars): ")? else {
        return Ok(());
    };
    let Some(email) = prompt("Email: ")? else {
        return Ok(());
    };

    match service.register_user(&username, &password, &email).await {
        Ok(_) => {
            println!("Registration successful! You can now login.");
            persist_users(service, archives).await;
        }
        Err(err) => println!("Error: {err}"),
    }
    Ok(())
}

// --- customer side ---

async fn customer_menu(
    service: &RentalService,
    archives: &Archives,
    user: &User,
) -> Result<()> {
    loop {
        println!("\n=== CUSTOMER DASHBOARD ===");
        println!("Welcome, {}!", user.username);
        println!("1. Search Cars");
        println!("2. Book a Car");
        println!("3. View My Bookings");
        println!("4. Cancel Booking");
        println!("5. View Rental History");
        println!("6. Make Payment");
        println!("0. Logout");
        let Some(choice) = prompt("Enter your choice: ")? else {
            break;
        };
        match choice.as_str() {
            "1" => search_cars(service).await?,
            "2" => book_car(service, archives, user).await?,
            "3" => view_bookings(service, user).await?,
            "4" => cancel_booking(service, archives, user).await?,
            "5" => rental_history(service, user).await?,
            "6" => make_payment(service, user).await?,
            "0" => {
                println!("Logging out...");
                break;
            }
            _ => println!("Invalid choice! Try again."),
        }
    }
    Ok(())
}

async fn search_cars(service: &RentalService) -> Result<()> {
    println!("\n--- Search Cars ---");
    println!("1. By Brand");
    println!("2. By Type");
    println!("3. By Price Range");
    println!("4. Show All Available Cars");
    let Some(choice) = prompt("Enter your choice: ")? else {
        return Ok(());
    };

    let available = service.available_cars().await?;
    if available.is_empty() {
        println!("No available cars found.");
        return Ok(());
    }

    let filtered: Vec<Car> = match choice.as_str() {
        "1" => {
            let Some(brand) = prompt("Enter brand name (or part of it): ")? else {
                return Ok(());
            };
            let needle = brand.to_lowercase();
            available
                .into_iter()
                .filter(|car| car.brand.to_lowercase().contains(&needle))
                .collect()
        }
        "2" => {
            let Some(kind) = prompt("Enter type (Sedan/SUV/Truck): ")? else {
                return Ok(());
            };
            let needle = kind.to_lowercase();
            available
                .into_iter()
                .filter(|car| car.car_type.as_str().to_lowercase().contains(&needle))
                .collect()
        }
        "3" => {
            let Some(min) = prompt_parsed::<Decimal>("Enter minimum price: ")? else {
                return Ok(());
            };
            let Some(max) = prompt_parsed::<Decimal>("Enter maximum price: ")? else {
                return Ok(());
            };
            available
                .into_iter()
                .filter(|car| car.price_per_day >= min && car.price_per_day <= max)
                .collect()
        }
        "4" => available,
        _ => {
            println!("Invalid choice. Showing all available cars.");
            available
        }
    };

    if filtered.is_empty() {
        println!("No cars match your criteria.");
    } else {
        println!("\nFound {} car(s):", filtered.len());
        print_cars(&filtered);
    }
    Ok(())
}

async fn book_car(service: &RentalService, archives: &Archives, user: &User) -> Result<()> {
    println!("\n--- Book a Car ---");
    let available = service.available_cars().await?;
    if available.is_empty() {
        println!("No cars available for booking at the moment.");
        return Ok(());
    }
    println!("Available Cars:");
    print_cars(&available);

    let Some(car_id) = prompt_parsed::<u32>("Enter Car ID to book: ")? else {
        return Ok(());
    };
    let Some(start) = prompt("Enter start date (YYYY-MM-DD): ")? else {
        return Ok(());
    };
    let Some(end) = prompt("Enter end date (YYYY-MM-DD): ")? else {
        return Ok(());
    };

    match service.book(user.id, car_id, &start, &end).await {
        Ok(booking) => {
            let car = service.car(car_id).await?;
            println!("\nBooking successful!");
            println!("Booking ID: {}", booking.id);
            println!("Car: {} {}", car.brand, car.model);
            println!("Rental Period: {} to {}", booking.start, booking.end);
            println!("Total Days: {}", booking.days);
            println!("Price per Day: ${:.2}", car.price_per_day);
            println!("Total Price: ${:.2}", booking.total_price);
            persist_cars(service, archives).await;
        }
        Err(err) => println!("Error: {err}"),
    }
    Ok(())
}

async fn view_bookings(service: &RentalService, user: &User) -> Result<()> {
    println!("\n--- My Bookings ---");
    let bookings = service.bookings_for(user.id).await?;
    if bookings.is_empty() {
        println!("No bookings found.");
        return Ok(());
    }
    for booking in &bookings {
        print_booking(booking);
        println!("------------------------");
    }
    Ok(())
}

async fn cancel_booking(
    service: &RentalService,
    archives: &Archives,
    user: &User,
) -> Result<()> {
    println!("\n--- Cancel Booking ---");
    let bookings = service.bookings_for(user.id).await?;
    let open: Vec<&Booking> = bookings
        .iter()
        .filter(|booking| !booking.status.is_terminal())
        .collect();
    if open.is_empty() {
        println!("No bookings to cancel.");
        return Ok(());
    }
    for booking in &open {
        print_booking(booking);
        println!("------------------------");
    }

    let Some(booking_id) = prompt_parsed::<u32>("Enter Booking ID to cancel: ")? else {
        return Ok(());
    };
    if !open.iter().any(|booking| booking.id == booking_id) {
        println!("Booking not found.");
        return Ok(());
    }

    match service.cancel(booking_id).await {
        Ok(_) => {
            println!("Booking cancelled successfully.");
            persist_cars(service, archives).await;
        }
        Err(err) => println!("Error: {err}"),
    }
    Ok(())
}

async fn rental_history(service: &RentalService, user: &User) -> Result<()> {
    println!("\n--- Rental History ---");
    let mut bookings = service.bookings_for(user.id).await?;
    if bookings.is_empty() {
        println!("No rental history found.");
        return Ok(());
    }
    // Newest rentals first.
    bookings.sort_by(|a, b| b.start.cmp(&a.start));

    println!("You have {} booking(s):", bookings.len());
    for booking in &bookings {
        print_booking(booking);
        match service.payment_for_booking(booking.id).await? {
            Some(payment) => {
                println!("Payment Method: {}", payment.method);
                println!("Payment Status: {}", payment.status);
            }
            None => println!("Payment: Pending"),
        }
        println!("----------------------------------------");
    }
    Ok(())
}

async fn make_payment(service: &RentalService, user: &User) -> Result<()> {
    println!("\n--- Make Payment ---");
    let bookings = service.bookings_for(user.id).await?;
    let payable: Vec<&Booking> = bookings
        .iter()
        .filter(|booking| booking.status == BookingStatus::Approved)
        .collect();
    if payable.is_empty() {
        println!("No approved bookings requiring payment.");
        return Ok(());
    }
    println!("Approved Bookings:");
    for booking in &payable {
        print_booking(booking);
        println!("------------------------");
    }

    let Some(booking_id) = prompt_parsed::<u32>("Enter Booking ID to pay for: ")? else {
        return Ok(());
    };
    let Some(booking) = payable.iter().find(|booking| booking.id == booking_id) else {
        println!("Booking not found or not awaiting payment.");
        return Ok(());
    };

    println!("Select payment method:");
    println!("1. Credit Card");
    println!("2. PayPal");
    println!("3. Cash");
    let Some(choice) = prompt("Choice: ")? else {
        return Ok(());
    };
    let method = match choice.as_str() {
        "1" => PaymentMethod::CreditCard,
        "2" => PaymentMethod::PayPal,
        "3" => PaymentMethod::Cash,
        _ => {
            println!("Invalid choice.");
            return Ok(());
        }
    };

    println!("Processing payment of ${:.2}...", booking.total_price);
    match service.pay(booking_id, booking.total_price, method).await {
        Ok(payment) => {
            println!("Payment completed successfully via {}.", payment.method);
            println!("Payment ID: {}", payment.id);
            println!("Transaction ID: {}", payment.transaction_id);
        }
        Err(err) => println!("Error: {err}"),
    }
    Ok(())
}

// --- admin side ---

async fn admin_menu(service: &RentalService, archives: &Archives, user: &User) -> Result<()> {
    loop {
        println!("\n=== ADMIN DASHBOARD ===");
        println!("Welcome, {}!", user.username);
        println!("1. Manage Cars");
        println!("2. Manage Bookings");
        println!("3. View Payment Records");
        println!("4. Revenue Report");
        println!("5. Booking Statistics");
        println!("6. View Users");
        println!("0. Logout");
        let Some(choice) = prompt("Enter your choice: ")? else {
            break;
        };
        match choice.as_str() {
            "1" => manage_cars(service, archives).await?,
            "2" => manage_bookings(service, archives).await?,
            "3" => view_payments(service).await?,
            "4" => revenue_report(service)?,
            "5" => booking_statistics(service)?,
            "6" => view_users(service).await?,
            "0" => {
                println!("Logging out...");
                break;
            }
            _ => println!("Invalid choice! Try again."),
        }
    }
    Ok(())
}

async fn manage_cars(service: &RentalService, archives: &Archives) -> Result<()> {
    loop {
        println!("\n=== Manage Cars ===");
        println!("1. Add New Car");
        println!("2. Update Car Price");
        println!("3. Set Car Status");
        println!("4. Remove Car");
        println!("5. View All Cars");
        println!("0. Back to Main Menu");
        let Some(choice) = prompt("Enter your choice: ")? else {
            break;
        };
        match choice.as_str() {
            "1" => add_car(service, archives).await?,
            "2" => update_car_price(service, archives).await?,
            "3" => set_car_status(service, archives).await?,
            "4" => remove_car(service, archives).await?,
            "5" => {
                println!("\n--- All Cars ---");
                print_cars(&service.cars().await?);
            }
            "0" => break,
            _ => println!("Invalid choice!"),
        }
    }
    Ok(())
}

async fn add_car(service: &RentalService, archives: &Archives) -> Result<()> {
    println!("\n--- Add New Car ---");
    let Some(brand) = prompt("Enter brand: ")? else {
        return Ok(());
    };
    let Some(model) = prompt("Enter model: ")? else {
        return Ok(());
    };
    let Some(car_type) = prompt_parsed::<CarType>("Enter type (Sedan/SUV/Truck): ")? else {
        return Ok(());
    };
    let Some(year) = prompt_parsed::<i32>("Enter year: ")? else {
        return Ok(());
    };
    let Some(color) = prompt("Enter color: ")? else {
        return Ok(());
    };
    let Some(registration) = prompt("Enter registration number: ")? else {
        return Ok(());
    };
    let Some(price_per_day) = prompt_parsed::<Decimal>("Enter price per day: ")? else {
        return Ok(());
    };

    let spec = CarSpec {
        brand,
        model,
        car_type,
        year,
        color,
        price_per_day,
        registration,
    };
    match service.add_car(spec).await {
        Ok(car) => {
            println!("Car added successfully with ID: {}", car.id);
            persist_cars(service, archives).await;
        }
        Err(err) => println!("Error: {err}"),
    }
    Ok(())
}

async fn update_car_price(service: &RentalService, archives: &Archives) -> Result<()> {
    print_cars(&service.cars().await?);
    let Some(car_id) = prompt_parsed::<u32>("Enter Car ID to update: ")? else {
        return Ok(());
    };
    let Some(price) = prompt_parsed::<Decimal>("Enter new price per day: ")? else {
        return Ok(());
    };
    match service.update_car_price(car_id, price).await {
        Ok(_) => {
            println!("Price updated successfully.");
            persist_cars(service, archives).await;
        }
        Err(err) => println!("Error: {err}"),
    }
    Ok(())
}

async fn set_car_status(service: &RentalService, archives: &Archives) -> Result<()> {
    print_cars(&service.cars().await?);
    let Some(car_id) = prompt_parsed::<u32>("Enter Car ID to update: ")? else {
        return Ok(());
    };
    let Some(status) =
        prompt_parsed::<CarStatus>("Enter status (Available/PendingApproval/Rented): ")?
    else {
        return Ok(());
    };
    match service.set_car_status(car_id, status).await {
        Ok(_) => {
            println!("Status updated successfully.");
            persist_cars(service, archives).await;
        }
        Err(err) => println!("Error: {err}"),
    }
    Ok(())
}

async fn remove_car(service: &RentalService, archives: &Archives) -> Result<()> {
    print_cars(&service.cars().await?);
    let Some(car_id) = prompt_parsed::<u32>("Enter Car ID to remove: ")? else {
        return Ok(());
    };
    match service.remove_car(car_id).await {
        Ok(()) => {
            println!("Car removed successfully.");
            persist_cars(service, archives).await;
        }
        Err(err) => println!("Error: {err}"),
    }
    Ok(())
}

async fn manage_bookings(service: &RentalService, archives: &Archives) -> Result<()> {
    loop {
        println!("\n=== Manage Bookings ===");
        println!("1. View All Bookings");
        println!("2. Approve/Reject Booking");
        println!("3. View Booking History");
        println!("0. Back to Main Menu");
        let Some(choice) = prompt("Enter your choice: ")? else {
            break;
        };
        match choice.as_str() {
            "1" => {
                println!("\n--- All Bookings ---");
                let bookings = service.bookings().await?;
                if bookings.is_empty() {
                    println!("No bookings in the system.");
                }
                for booking in &bookings {
                    print_booking(booking);
                    println!("------------------------");
                }
            }
            "2" => decide_booking(service, archives).await?,
            "3" => {
                println!("\n--- Booking History ---");
                for line in service.log_lines()? {
                    println!("{line}");
                }
            }
            "0" => break,
            _ => println!("Invalid choice!"),
        }
    }
    Ok(())
}

async fn decide_booking(service: &RentalService, archives: &Archives) -> Result<()> {
    println!("\n--- Approve/Reject Booking ---");
    let pending: Vec<Booking> = service
        .bookings()
        .await?
        .into_iter()
        .filter(|booking| booking.status == BookingStatus::Pending)
        .collect();
    if pending.is_empty() {
        println!("No pending bookings.");
        return Ok(());
    }
    for booking in &pending {
        print_booking(booking);
        println!("------------------------");
    }

    let Some(booking_id) = prompt_parsed::<u32>("Enter Booking ID to manage: ")? else {
        return Ok(());
    };
    println!("1. Approve");
    println!("2. Reject");
    let Some(action) = prompt("Choice: ")? else {
        return Ok(());
    };

    let result = match action.as_str() {
        "1" => service.approve(booking_id).await,
        "2" => service.reject(booking_id).await,
        _ => {
            println!("Invalid choice.");
            return Ok(());
        }
    };
    match result {
        Ok(booking) => {
            println!("Booking {} successfully.", booking.status);
            persist_cars(service, archives).await;
        }
        Err(err) => println!("Error: {err}"),
    }
    Ok(())
}

async fn view_payments(service: &RentalService) -> Result<()> {
    println!("\n--- Payment Records ---");
    let payments = service.payments().await?;
    if payments.is_empty() {
        println!("No payments recorded.");
        return Ok(());
    }
    for payment in &payments {
        println!(
            "Payment ID: {} | Booking ID: {} | Transaction: {}",
            payment.id, payment.booking_id, payment.transaction_id
        );
        println!(
            "Amount: ${:.2} | Date: {} | Method: {} | Status: {}",
            payment.amount, payment.date, payment.method, payment.status
        );
        println!("------------------------");
    }
    Ok(())
}

fn revenue_report(service: &RentalService) -> Result<()> {
    println!("\n=== Revenue Report ===");
    let report = reports::revenue_report(&service.log_lines()?);
    println!("Total Revenue: ${:.2}", report.total);
    if report.total.is_zero() {
        return Ok(());
    }
    println!("\nRevenue by Payment Method:");
    for (method, amount) in &report.by_method {
        let share = *amount / report.total * dec!(100);
        println!("{method}: ${amount:.2} ({share:.1}%)");
    }
    Ok(())
}

fn booking_statistics(service: &RentalService) -> Result<()> {
    println!("\n=== Booking Statistics ===");
    let stats = reports::booking_stats(&service.log_lines()?);
    println!("Bookings by Status:");
    for (action, count) in &stats.by_action {
        println!("{action}: {count}");
    }
    println!("\nBookings by Month:");
    for (month, count) in &stats.by_month {
        println!("{month}: {count}");
    }
    Ok(())
}

async fn view_users(service: &RentalService) -> Result<()> {
    println!("\n--- All Users ---");
    for user in service.users().await? {
        println!(
            "ID: {} | Username: {} | Email: {} | Role: {}",
            user.id, user.username, user.email, user.role
        );
    }
    Ok(())
}

// --- shared helpers ---

async fn persist_cars(service: &RentalService, archives: &Archives) {
    let result = match service.cars().await {
        Ok(cars) => archives.cars.save(&cars),
        Err(err) => Err(err),
    };
    if let Err(err) = result {
        tracing::warn!(%err, "failed to persist car records");
        println!("Warning: could not save car records: {err}");
    }
}

async fn persist_users(service: &RentalService, archives: &Archives) {
    let result = match service.users().await {
        Ok(users) => archives.users.save(&users),
        Err(err) => Err(err),
    };
    if let Err(err) = result {
        tracing::warn!(%err, "failed to persist user records");
        println!("Warning: could not save user records: {err}");
    }
}

fn print_cars(cars: &[Car]) {
    if cars.is_empty() {
        println!("No cars in the system.");
        return;
    }
    for car in cars {
        println!(
            "ID: {} | {} {} {} ({})",
            car.id, car.year, car.brand, car.model, car.color
        );
        println!(
            "Type: {} | Reg: {} | Price/Day: ${:.2} | Status: {}",
            car.car_type, car.registration, car.price_per_day, car.status
        );
        println!("----------------------------------------");
    }
}

fn print_booking(booking: &Booking) {
    println!(
        "Booking ID: {} | Car ID: {}",
        booking.id, booking.car_id
    );
    println!(
        "Dates: {} to {} | Booked on: {}",
        booking.start, booking.end, booking.booked_on
    );
    println!(
        "Total: ${:.2} | Status: {}",
        booking.total_price, booking.status
    );
}

/// Reads one trimmed line. `None` means stdin hit EOF and the caller should
/// back out of its menu.
fn prompt(label: &str) -> Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim().to_string()))
}

/// Like `prompt`, but parses the input. A value that fails to parse is
/// reported and treated like an aborted action.
fn prompt_parsed<T: FromStr>(label: &str) -> Result<Option<T>> {
    let Some(raw) = prompt(label)? else {
        return Ok(None);
    };
    match raw.parse() {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            println!("Invalid input! Please try again.");
            Ok(None)
        }
    }
}
