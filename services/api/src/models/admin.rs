//! Admin user model and related functionality

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role claim carried by every admin account and session token
pub const ADMIN_ROLE: &str = "admin";

/// Admin user entity
///
/// The password hash is never serialized into API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: Option<String>,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Admin provisioning payload, used only by the `add-admin` binary
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub username: String,
    /// Plaintext password, hashed before it reaches the database
    pub password: String,
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let admin = AdminUser {
            id: Uuid::new_v4(),
            username: "millenium".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            email: Some("admin@milleniumauto.ca".to_string()),
            role: ADMIN_ROLE.to_string(),
            is_active: true,
            created_at: Utc::now(),
            last_login: None,
        };

        let json = serde_json::to_string(&admin).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("passwordHash"));
        assert!(json.contains("\"username\":\"millenium\""));
    }
}
