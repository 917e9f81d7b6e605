//! Car inventory repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{Car, CarStatus, FuelType, NewCar, Transmission, UpdateCar};

const CAR_COLUMNS: &str = "id, make, model, year, price, mileage, transmission, fuel_type, \
     body_type, color, vin, description, features, cover_image, images, status, \
     created_at, updated_at";

/// Car inventory repository
#[derive(Clone)]
pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    /// Create a new car repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new car, assigning id and created_at
    pub async fn create(&self, new_car: &NewCar) -> Result<Car> {
        info!("Creating car: {} {}", new_car.make, new_car.model);

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO cars (make, model, year, price, mileage, transmission, fuel_type,
                              body_type, color, vin, description, features, cover_image,
                              images, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {CAR_COLUMNS}
            "#
        ))
        .bind(&new_car.make)
        .bind(&new_car.model)
        .bind(new_car.year)
        .bind(new_car.price)
        .bind(new_car.mileage)
        .bind(new_car.transmission.as_str())
        .bind(new_car.fuel_type.as_str())
        .bind(&new_car.body_type)
        .bind(&new_car.color)
        .bind(&new_car.vin)
        .bind(&new_car.description)
        .bind(&new_car.features)
        .bind(&new_car.cover_image)
        .bind(&new_car.images)
        .bind(new_car.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        row_to_car(row)
    }

    /// Get all cars, newest first
    pub async fn get_all(&self) -> Result<Vec<Car>> {
        let rows = sqlx::query(&format!(
            "SELECT {CAR_COLUMNS} FROM cars ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_car).collect()
    }

    /// Get all cars with a given status, newest first
    ///
    /// The public listing uses this with `available` so sold and reserved
    /// cars never leave the back office.
    pub async fn get_by_status(&self, status: CarStatus) -> Result<Vec<Car>> {
        let rows = sqlx::query(&format!(
            "SELECT {CAR_COLUMNS} FROM cars WHERE status = $1 ORDER BY created_at DESC"
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_car).collect()
    }

    /// Find a car by id
    ///
    /// Not-found is `Ok(None)`, distinct from a query error.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Car>> {
        let row = sqlx::query(&format!("SELECT {CAR_COLUMNS} FROM cars WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(row_to_car).transpose()
    }

    /// Apply a partial update, stamping updated_at
    ///
    /// Returns false when no car matched the id. The payload type has no id
    /// field, so identity can never change here.
    pub async fn update(&self, id: Uuid, update: &UpdateCar) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE cars SET
                make = COALESCE($2, make),
                model = COALESCE($3, model),
                year = COALESCE($4, year),
                price = COALESCE($5, price),
                mileage = COALESCE($6, mileage),
                transmission = COALESCE($7, transmission),
                fuel_type = COALESCE($8, fuel_type),
                body_type = COALESCE($9, body_type),
                color = COALESCE($10, color),
                vin = COALESCE($11, vin),
                description = COALESCE($12, description),
                features = COALESCE($13, features),
                cover_image = COALESCE($14, cover_image),
                images = COALESCE($15, images),
                status = COALESCE($16, status),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&update.make)
        .bind(&update.model)
        .bind(update.year)
        .bind(update.price)
        .bind(update.mileage)
        .bind(update.transmission.map(|t| t.as_str()))
        .bind(update.fuel_type.map(|f| f.as_str()))
        .bind(&update.body_type)
        .bind(&update.color)
        .bind(&update.vin)
        .bind(&update.description)
        .bind(&update.features)
        .bind(&update.cover_image)
        .bind(&update.images)
        .bind(update.status.map(|s| s.as_str()))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a car by id
    ///
    /// Deleting a nonexistent id returns false, not an error.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_car(row: PgRow) -> Result<Car> {
    let transmission: String = row.get("transmission");
    let fuel_type: String = row.get("fuel_type");
    let status: String = row.get("status");

    Ok(Car {
        id: row.get("id"),
        make: row.get("make"),
        model: row.get("model"),
        year: row.get("year"),
        price: row.get("price"),
        mileage: row.get("mileage"),
        transmission: Transmission::parse(&transmission)
            .ok_or_else(|| anyhow::anyhow!("Unknown transmission in store: {}", transmission))?,
        fuel_type: FuelType::parse(&fuel_type)
            .ok_or_else(|| anyhow::anyhow!("Unknown fuel type in store: {}", fuel_type))?,
        body_type: row.get("body_type"),
        color: row.get("color"),
        vin: row.get("vin"),
        description: row.get("description"),
        features: row.get("features"),
        cover_image: row.get("cover_image"),
        images: row.get("images"),
        status: CarStatus::parse(&status)
            .ok_or_else(|| anyhow::anyhow!("Unknown status in store: {}", status))?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
