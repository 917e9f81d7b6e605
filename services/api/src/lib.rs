//! Dealer API service library
//!
//! Public site (inventory listing, "sell us your car" intake) and the
//! cookie-authenticated `/api/admin` back office, shared between the `api`
//! server binary and the `add-admin` provisioning binary.

pub mod email;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod rate_limiter;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;
