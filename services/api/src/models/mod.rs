//! API service models

pub mod admin;
pub mod car;
pub mod submission;

// Re-export for convenience
pub use admin::{AdminUser, NewAdmin};
pub use car::{Car, CarStatus, FuelType, NewCar, Transmission, UpdateCar};
pub use submission::{
    ContactSubmission, NewSubmission, PersonalInfo, SubmissionStatus, VehicleInfo,
};
