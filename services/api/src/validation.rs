//! Parse-and-validate boundary for untyped transport input
//!
//! The admin form submits year, price, and mileage as strings so the UI can
//! accept thousands separators. Everything crossing this boundary is
//! converted into the strongly-typed car payloads before any store call;
//! handlers never touch raw JSON beyond this module.

use chrono::{Datelike, Utc};
use serde_json::Value;

use crate::models::{CarStatus, FuelType, NewCar, Transmission, UpdateCar};

/// Required fields for car creation, checked in this order
const REQUIRED_CAR_FIELDS: [&str; 9] = [
    "make",
    "model",
    "year",
    "price",
    "mileage",
    "transmission",
    "fuelType",
    "bodyType",
    "color",
];

/// Earliest accepted model year
const MIN_YEAR: i32 = 1900;

/// Parse and validate a car creation payload
///
/// Rejects the first absent required field with a field-identifying message.
/// Defaults: `features = []`, `images = []`, `status = available`.
pub fn parse_new_car(payload: &Value) -> Result<NewCar, String> {
    for field in REQUIRED_CAR_FIELDS {
        require(payload, field)?;
    }

    Ok(NewCar {
        make: string_field(payload, "make")?,
        model: string_field(payload, "model")?,
        year: parse_year(require(payload, "year")?)?,
        price: parse_non_negative(require(payload, "price")?, "price")?,
        mileage: parse_non_negative(require(payload, "mileage")?, "mileage")?,
        transmission: transmission_field(require(payload, "transmission")?)?,
        fuel_type: fuel_type_field(require(payload, "fuelType")?)?,
        body_type: string_field(payload, "bodyType")?,
        color: string_field(payload, "color")?,
        vin: optional_string(payload, "vin"),
        description: optional_string(payload, "description"),
        features: string_list(payload, "features")?,
        cover_image: optional_string(payload, "coverImage"),
        images: string_list(payload, "images")?,
        status: match payload.get("status") {
            None | Some(Value::Null) => CarStatus::Available,
            Some(Value::String(s)) if s.trim().is_empty() => CarStatus::Available,
            Some(Value::String(s)) => status_field(s)?,
            Some(_) => return Err("Invalid status".to_string()),
        },
    })
}

/// Parse and validate a partial car update payload
///
/// Identity and server-managed timestamps are always stripped: `id`, `_id`,
/// `createdAt`, and `updatedAt` keys in the payload are ignored. Fields that
/// are absent or null are left untouched by the update.
pub fn parse_car_update(payload: &Value) -> Result<UpdateCar, String> {
    let mut update = UpdateCar::default();

    if let Some(v) = present(payload, "make") {
        update.make = Some(non_empty_string(v, "make")?);
    }
    if let Some(v) = present(payload, "model") {
        update.model = Some(non_empty_string(v, "model")?);
    }
    if let Some(v) = present(payload, "year") {
        update.year = Some(parse_year(v)?);
    }
    if let Some(v) = present(payload, "price") {
        update.price = Some(parse_non_negative(v, "price")?);
    }
    if let Some(v) = present(payload, "mileage") {
        update.mileage = Some(parse_non_negative(v, "mileage")?);
    }
    if let Some(v) = present(payload, "transmission") {
        update.transmission = Some(transmission_field(v)?);
    }
    if let Some(v) = present(payload, "fuelType") {
        update.fuel_type = Some(fuel_type_field(v)?);
    }
    if let Some(v) = present(payload, "bodyType") {
        update.body_type = Some(non_empty_string(v, "bodyType")?);
    }
    if let Some(v) = present(payload, "color") {
        update.color = Some(non_empty_string(v, "color")?);
    }
    if let Some(v) = present(payload, "vin") {
        update.vin = Some(non_empty_string(v, "vin")?);
    }
    if let Some(v) = present(payload, "description") {
        update.description = Some(non_empty_string(v, "description")?);
    }
    if let Some(v) = present(payload, "coverImage") {
        update.cover_image = Some(non_empty_string(v, "coverImage")?);
    }
    if payload.get("features").is_some_and(|v| !v.is_null()) {
        update.features = Some(string_list(payload, "features")?);
    }
    if payload.get("images").is_some_and(|v| !v.is_null()) {
        update.images = Some(string_list(payload, "images")?);
    }
    if let Some(v) = present(payload, "status") {
        match v.as_str() {
            Some(s) => update.status = Some(status_field(s)?),
            None => return Err("Invalid status".to_string()),
        }
    }

    Ok(update)
}

/// Parse a model year from a JSON number or a string with grouping separators
pub fn parse_year(value: &Value) -> Result<i32, String> {
    let year = match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|y| i32::try_from(y).ok())
            .ok_or_else(|| "Invalid year".to_string())?,
        Value::String(s) => strip_separators(s)
            .parse::<i32>()
            .map_err(|_| "Invalid year".to_string())?,
        _ => return Err("Invalid year".to_string()),
    };

    let max_year = Utc::now().year() + 1;
    if year < MIN_YEAR || year > max_year {
        return Err(format!("Year must be between {MIN_YEAR} and {max_year}"));
    }

    Ok(year)
}

/// Parse a non-negative amount (price, mileage) from a JSON number or a
/// string with grouping separators
pub fn parse_non_negative(value: &Value, field: &str) -> Result<f64, String> {
    let amount = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("Invalid {field}"))?,
        Value::String(s) => strip_separators(s)
            .parse::<f64>()
            .map_err(|_| format!("Invalid {field}"))?,
        _ => return Err(format!("Invalid {field}")),
    };

    if !amount.is_finite() || amount < 0.0 {
        return Err(format!("{field} must be a non-negative number"));
    }

    Ok(amount)
}

/// Strip thousands separators accepted from the admin form
fn strip_separators(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | ' ' | '_' | '\u{00a0}'))
        .collect()
}

fn require<'a>(payload: &'a Value, field: &str) -> Result<&'a Value, String> {
    match payload.get(field) {
        None | Some(Value::Null) => Err(format!("Missing required field: {field}")),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(format!("Missing required field: {field}"))
        }
        Some(value) => Ok(value),
    }
}

/// A field counts as present for updates only when it is set and non-null
fn present<'a>(payload: &'a Value, field: &str) -> Option<&'a Value> {
    payload.get(field).filter(|v| !v.is_null())
}

fn string_field(payload: &Value, field: &str) -> Result<String, String> {
    non_empty_string(require(payload, field)?, field)
}

fn non_empty_string(value: &Value, field: &str) -> Result<String, String> {
    match value.as_str() {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(format!("Invalid {field}")),
    }
}

fn optional_string(payload: &Value, field: &str) -> Option<String> {
    payload
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn string_list(payload: &Value, field: &str) -> Result<Vec<String>, String> {
    match payload.get(field) {
        None | Some(Value::Null) => Ok(vec![]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(String::from)
                    .ok_or_else(|| format!("Invalid {field}"))
            })
            .collect(),
        Some(_) => Err(format!("Invalid {field}")),
    }
}

fn transmission_field(value: &Value) -> Result<Transmission, String> {
    value
        .as_str()
        .and_then(Transmission::parse)
        .ok_or_else(|| "Invalid transmission".to_string())
}

fn fuel_type_field(value: &Value) -> Result<FuelType, String> {
    value
        .as_str()
        .and_then(FuelType::parse)
        .ok_or_else(|| "Invalid fuelType".to_string())
}

fn status_field(value: &str) -> Result<CarStatus, String> {
    CarStatus::parse(value).ok_or_else(|| "Invalid status".to_string())
}
