use crate::domain::car::Car;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;

/// One car per line, headerless:
/// `id,brand,model,type,year,color,pricePerDay,registrationNumber,status`.
/// Field values are written as-is; embedded separators are not escaped beyond
/// what the CSV writer itself quotes.
#[derive(Debug, Serialize, Deserialize)]
struct CarRecord {
    id: u32,
    brand: String,
    model: String,
    r#type: String,
    year: i32,
    color: String,
    price_per_day: Decimal,
    registration: String,
    status: String,
}

impl From<&Car> for CarRecord {
    fn from(car: &Car) -> Self {
        Self {
            id: car.id,
            brand: car.brand.clone(),
            model: car.model.clone(),
            r#type: car.car_type.as_str().to_string(),
            year: car.year,
            color: car.color.clone(),
            price_per_day: car.price_per_day,
            registration: car.registration.clone(),
            status: car.status.as_str().to_string(),
        }
    }
}

impl CarRecord {
    fn into_car(self) -> Result<Car> {
        Ok(Car {
            id: self.id,
            brand: self.brand,
            model: self.model,
            car_type: self.r#type.parse()?,
            year: self.year,
            color: self.color,
            price_per_day: self.price_per_day,
            registration: self.registration,
            status: self.status.parse()?,
        })
    }
}

pub fn load<R: Read>(source: R) -> Result<Vec<Car>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(source);
    let mut cars = Vec::new();
    for record in reader.deserialize::<CarRecord>() {
        cars.push(record?.into_car()?);
    }
    Ok(cars)
}

pub fn save<W: Write>(out: W, cars: &[Car]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    for car in cars {
        writer.serialize(CarRecord::from(car))?;
    }
    writer.flush()?;
    Ok(())
}

/// The durable car record store: read once at startup, rewritten in full on
/// every catalog mutation. A missing file reads as an empty catalog.
pub struct CarArchive {
    path: PathBuf,
}

impl CarArchive {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<Vec<Car>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        load(File::open(&self.path)?)
    }

    pub fn save(&self, cars: &[Car]) -> Result<()> {
        save(File::create(&self.path)?, cars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::car::{CarSpec, CarStatus, CarType};
    use rust_decimal_macros::dec;

    fn fleet() -> Vec<Car> {
        let mut explorer = Car::new(
            2,
            CarSpec {
                brand: "Ford".into(),
                model: "Explorer".into(),
                car_type: CarType::Suv,
                year: 2023,
                color: "Black".into(),
                price_per_day: dec!(70.0),
                registration: "GHI789".into(),
            },
        );
        explorer.status = CarStatus::Rented;
        vec![
            Car::new(
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
            ),
            explorer,
        ]
    }

    #[test]
    fn test_record_line_format() {
        let mut buf = Vec::new();
        save(&mut buf, &fleet()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "1,Toyota,Camry,Sedan,2022,Blue,50.0,ABC123,Available"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2,Ford,Explorer,SUV,2023,Black,70.0,GHI789,Rented"
        );
    }

    #[test]
    fn test_round_trip_preserves_records_and_order() {
        let original = fleet();
        let mut buf = Vec::new();
        save(&mut buf, &original).unwrap();
        let reloaded = load(buf.as_slice()).unwrap();
        assert_eq!(reloaded, original);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let line = b"1,Toyota,Camry,Sedan,2022,Blue,50.0,ABC123,Scrapped\n";
        assert!(load(line.as_slice()).is_err());
    }

    #[test]
    fn test_archive_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let archive = CarArchive::new(dir.path().join("cars.dat"));
        assert!(archive.load().unwrap().is_empty());

        archive.save(&fleet()).unwrap();
        assert_eq!(archive.load().unwrap(), fleet());
    }
}
