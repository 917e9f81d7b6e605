//! Application state shared across handlers

use crate::{
    email::EmailService,
    jwt::JwtService,
    rate_limiter::RateLimiter,
    repositories::{AdminRepository, CarRepository, SubmissionRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub admin_repository: AdminRepository,
    pub car_repository: CarRepository,
    pub submission_repository: SubmissionRepository,
    pub jwt_service: JwtService,
    pub email_service: EmailService,
    pub rate_limiter: RateLimiter,
    /// Mark the session cookie Secure (production deployments)
    pub secure_cookies: bool,
}
