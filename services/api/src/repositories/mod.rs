//! Repositories for database operations

pub mod admin;
pub mod car;
pub mod submission;

pub use admin::AdminRepository;
pub use car::CarRepository;
pub use submission::SubmissionRepository;
