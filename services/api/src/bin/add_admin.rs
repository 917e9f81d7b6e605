//! Out-of-band admin provisioning
//!
//! Interactive script creating an admin account with a hashed password.
//! This is the only path that creates credentials; nothing is exposed over
//! HTTP.

use anyhow::Result;
use std::io::{self, BufRead, Write};

use api::{models::NewAdmin, repositories::AdminRepository};
use common::database::{DatabaseConfig, health_check, init_pool};

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if !health_check(&pool).await? {
        anyhow::bail!("Failed to connect to database");
    }
    println!("Connected to database");

    let username = prompt("Enter username: ")?;
    if username.is_empty() {
        anyhow::bail!("Username must not be empty");
    }

    let password = prompt("Enter password: ")?;
    if password.is_empty() {
        anyhow::bail!("Password must not be empty");
    }

    let email = prompt("Enter email (optional): ")?;

    let new_admin = NewAdmin {
        username,
        password,
        email: Some(email).filter(|e| !e.is_empty()),
    };

    let repository = AdminRepository::new(pool);
    let admin = repository.create(&new_admin).await?;

    println!("\nAdmin created successfully!");
    println!("Admin ID: {}", admin.id);
    println!("Username: {}", admin.username);
    if let Some(email) = &admin.email {
        println!("Email: {email}");
    }

    Ok(())
}
