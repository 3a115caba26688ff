use fleetbook::domain::car::{Car, CarSpec, CarType};
use fleetbook::domain::user::{Role, User};
use fleetbook::interfaces::csv::cars::CarArchive;
use fleetbook::interfaces::csv::users::UserArchive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::tempdir;

fn fleet(n: u32) -> Vec<Car> {
    (1..=n)
        .map(|id| {
            Car::new(
                id,
                CarSpec {
                    brand: "Toyota".into(),
                    model: format!("Model{id}"),
                    car_type: CarType::Sedan,
                    year: 2020,
                    color: "Blue".into(),
                    price_per_day: dec!(50.0) + Decimal::from(id),
                    registration: format!("REG{id:03}"),
                },
            )
        })
        .collect()
}

#[test]
fn test_car_archive_round_trip_preserves_set_and_order() {
    let dir = tempdir().unwrap();
    let archive = CarArchive::new(dir.path().join("cars.dat"));

    let original = fleet(25);
    archive.save(&original).unwrap();
    let reloaded = archive.load().unwrap();
    assert_eq!(reloaded, original);
}

#[test]
fn test_car_archive_full_rewrite_on_save() {
    let dir = tempdir().unwrap();
    let archive = CarArchive::new(dir.path().join("cars.dat"));

    archive.save(&fleet(10)).unwrap();
    let smaller = fleet(3);
    archive.save(&smaller).unwrap();
    // The second save replaces the file, it does not append.
    assert_eq!(archive.load().unwrap(), smaller);
}

#[test]
fn test_user_archive_round_trip_preserves_set_and_order() {
    let dir = tempdir().unwrap();
    let archive = UserArchive::new(dir.path().join("users.dat"));

    let original: Vec<User> = (1..=10)
        .map(|id| {
            let role = if id == 1 { Role::Admin } else { Role::Customer };
            User::new(
                id,
                format!("user{id}"),
                format!("password{id}"),
                format!("user{id}@example.com"),
                role,
            )
        })
        .collect();
    archive.save(&original).unwrap();
    assert_eq!(archive.load().unwrap(), original);
}

#[test]
fn test_missing_archives_read_as_empty() {
    let dir = tempdir().unwrap();
    assert!(
        CarArchive::new(dir.path().join("cars.dat"))
            .load()
            .unwrap()
            .is_empty()
    );
    assert!(
        UserArchive::new(dir.path().join("users.dat"))
            .load()
            .unwrap()
            .is_empty()
    );
}
