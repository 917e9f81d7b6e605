//! Contact submission (seller lead) model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Personal details captured from the public "sell us your car" form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
}

/// Vehicle details captured from the public form
///
/// Year and mileage are kept as the free-text the seller typed; they are a
/// transcription of the form, not inventory data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInfo {
    pub vin: Option<String>,
    pub make: String,
    pub model: String,
    pub submodel: String,
    pub year: String,
    pub mileage_km: String,
    pub is_accidented: bool,
}

/// Review status of a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Reviewed,
    Contacted,
    Completed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Reviewed => "reviewed",
            SubmissionStatus::Contacted => "contacted",
            SubmissionStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(SubmissionStatus::Pending),
            "reviewed" => Some(SubmissionStatus::Reviewed),
            "contacted" => Some(SubmissionStatus::Contacted),
            "completed" => Some(SubmissionStatus::Completed),
            _ => None,
        }
    }
}

/// Contact submission entity
///
/// Photos are forwarded to the notification email at submission time and are
/// never persisted; only the count is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: Uuid,
    pub personal: PersonalInfo,
    pub vehicle: VehicleInfo,
    pub photo_count: i32,
    pub status: SubmissionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// New submission payload, built by the contact intake handler
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub personal: PersonalInfo,
    pub vehicle: VehicleInfo,
    pub photo_count: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trip() {
        for value in ["pending", "reviewed", "contacted", "completed"] {
            let parsed = SubmissionStatus::parse(value).unwrap();
            assert_eq!(parsed.as_str(), value);
        }
        assert!(SubmissionStatus::parse("archived").is_none());
    }

    #[test]
    fn submission_uses_camel_case_field_names() {
        let submission = ContactSubmission {
            id: Uuid::new_v4(),
            personal: PersonalInfo {
                first_name: "Marie".to_string(),
                last_name: "Tremblay".to_string(),
                phone: "514-555-0101".to_string(),
                email: "marie@example.com".to_string(),
                address: "12 Rue Principale".to_string(),
                city: "Montréal".to_string(),
                province: "QC".to_string(),
                postal_code: "H1A 1A1".to_string(),
            },
            vehicle: VehicleInfo {
                vin: None,
                make: "Honda".to_string(),
                model: "Civic".to_string(),
                submodel: "LX".to_string(),
                year: "2018".to_string(),
                mileage_km: "95,000".to_string(),
                is_accidented: false,
            },
            photo_count: 3,
            status: SubmissionStatus::Pending,
            created_at: Utc::now(),
            updated_at: None,
        };

        let json = serde_json::to_value(&submission).unwrap();
        assert!(json.get("photoCount").is_some());
        assert!(json["personal"].get("firstName").is_some());
        assert!(json["vehicle"].get("mileageKm").is_some());
        assert!(json["vehicle"].get("isAccidented").is_some());
        assert_eq!(json["status"], "pending");
    }
}
