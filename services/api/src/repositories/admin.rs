//! Admin credential repository for database operations

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;

use crate::models::{AdminUser, NewAdmin, admin::ADMIN_ROLE};

/// Admin credential repository
#[derive(Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    /// Create a new admin repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an admin by username, restricted to active accounts
    pub async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, email, role, is_active, created_at, last_login
            FROM admins
            WHERE username = $1 AND is_active = TRUE
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_admin))
    }

    /// Create a new admin account
    ///
    /// Provisioning path only, reachable from the `add-admin` binary and not
    /// over HTTP. Rejects duplicate usernames before insertion.
    pub async fn create(&self, new_admin: &NewAdmin) -> Result<AdminUser> {
        info!("Creating new admin: {}", new_admin.username);

        let existing = sqlx::query("SELECT id FROM admins WHERE username = $1")
            .bind(&new_admin.username)
            .fetch_optional(&self.pool)
            .await?;

        if existing.is_some() {
            anyhow::bail!("Username already exists: {}", new_admin.username);
        }

        let salt = SaltString::generate(&mut rand::thread_rng());
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(new_admin.password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();

        let row = sqlx::query(
            r#"
            INSERT INTO admins (username, password_hash, email, role, is_active)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING id, username, password_hash, email, role, is_active, created_at, last_login
            "#,
        )
        .bind(&new_admin.username)
        .bind(&password_hash)
        .bind(&new_admin.email)
        .bind(ADMIN_ROLE)
        .fetch_one(&self.pool)
        .await?;

        Ok(row_to_admin(row))
    }

    /// Verify an admin's password
    ///
    /// One-way comparison; the plaintext is never stored or logged.
    pub fn verify_password(&self, admin: &AdminUser, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(&admin.password_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        let argon2 = Argon2::default();
        let result = argon2.verify_password(password.as_bytes(), &parsed_hash);

        Ok(result.is_ok())
    }

    /// Record a successful login timestamp
    ///
    /// Best effort: the caller treats a failure here as non-fatal.
    pub async fn update_last_login(&self, username: &str) -> Result<()> {
        sqlx::query("UPDATE admins SET last_login = NOW() WHERE username = $1")
            .bind(username)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

fn row_to_admin(row: PgRow) -> AdminUser {
    AdminUser {
        id: row.get("id"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
        email: row.get("email"),
        role: row.get("role"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        last_login: row.get("last_login"),
    }
}
