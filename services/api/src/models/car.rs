//! Car inventory model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transmission type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transmission {
    Automatic,
    Manual,
}

impl Transmission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transmission::Automatic => "Automatic",
            Transmission::Manual => "Manual",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Automatic" => Some(Transmission::Automatic),
            "Manual" => Some(Transmission::Manual),
            _ => None,
        }
    }
}

/// Fuel type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    Gasoline,
    Diesel,
    Electric,
    Hybrid,
}

impl FuelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Gasoline => "Gasoline",
            FuelType::Diesel => "Diesel",
            FuelType::Electric => "Electric",
            FuelType::Hybrid => "Hybrid",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Gasoline" => Some(FuelType::Gasoline),
            "Diesel" => Some(FuelType::Diesel),
            "Electric" => Some(FuelType::Electric),
            "Hybrid" => Some(FuelType::Hybrid),
            _ => None,
        }
    }
}

/// Listing status, governs public visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CarStatus {
    Available,
    Sold,
    Reserved,
}

impl CarStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarStatus::Available => "available",
            CarStatus::Sold => "sold",
            CarStatus::Reserved => "reserved",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(CarStatus::Available),
            "sold" => Some(CarStatus::Sold),
            "reserved" => Some(CarStatus::Reserved),
            _ => None,
        }
    }
}

/// Car entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub mileage: f64,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    pub body_type: String,
    pub color: String,
    pub vin: Option<String>,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub cover_image: Option<String>,
    pub images: Vec<String>,
    pub status: CarStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Validated car creation payload
///
/// Produced exclusively by the parse-and-validate boundary in
/// `validation::parse_new_car`; the id and created_at are assigned by the
/// repository at insert time.
#[derive(Debug, Clone)]
pub struct NewCar {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub price: f64,
    pub mileage: f64,
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    pub body_type: String,
    pub color: String,
    pub vin: Option<String>,
    pub description: Option<String>,
    pub features: Vec<String>,
    pub cover_image: Option<String>,
    pub images: Vec<String>,
    pub status: CarStatus,
}

/// Validated partial update payload
///
/// There is deliberately no id field here: identity is immutable and any id
/// present in the incoming payload is stripped before this type is built.
#[derive(Debug, Clone, Default)]
pub struct UpdateCar {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price: Option<f64>,
    pub mileage: Option<f64>,
    pub transmission: Option<Transmission>,
    pub fuel_type: Option<FuelType>,
    pub body_type: Option<String>,
    pub color: Option<String>,
    pub vin: Option<String>,
    pub description: Option<String>,
    pub features: Option<Vec<String>>,
    pub cover_image: Option<String>,
    pub images: Option<Vec<String>>,
    pub status: Option<CarStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transmission_round_trip() {
        for value in ["Automatic", "Manual"] {
            let parsed = Transmission::parse(value).unwrap();
            assert_eq!(parsed.as_str(), value);
            let json = serde_json::to_string(&parsed).unwrap();
            assert_eq!(json, format!("\"{value}\""));
        }
        assert!(Transmission::parse("automatic").is_none());
        assert!(Transmission::parse("CVT").is_none());
    }

    #[test]
    fn fuel_type_round_trip() {
        for value in ["Gasoline", "Diesel", "Electric", "Hybrid"] {
            let parsed = FuelType::parse(value).unwrap();
            assert_eq!(parsed.as_str(), value);
        }
        assert!(FuelType::parse("Petrol").is_none());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&CarStatus::Available).unwrap(),
            "\"available\""
        );
        assert_eq!(CarStatus::parse("sold"), Some(CarStatus::Sold));
        assert_eq!(CarStatus::parse("Sold"), None);
    }

    #[test]
    fn car_uses_camel_case_field_names() {
        let car = Car {
            id: Uuid::new_v4(),
            make: "Toyota".to_string(),
            model: "Camry".to_string(),
            year: 2021,
            price: 25000.0,
            mileage: 40000.0,
            transmission: Transmission::Automatic,
            fuel_type: FuelType::Gasoline,
            body_type: "Sedan".to_string(),
            color: "White".to_string(),
            vin: None,
            description: None,
            features: vec![],
            cover_image: None,
            images: vec![],
            status: CarStatus::Available,
            created_at: Utc::now(),
            updated_at: None,
        };

        let json = serde_json::to_value(&car).unwrap();
        assert!(json.get("fuelType").is_some());
        assert!(json.get("bodyType").is_some());
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["status"], "available");
    }
}
