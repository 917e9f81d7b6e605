//! Contact submission repository for database operations

use anyhow::Result;
use sqlx::{PgPool, Row, postgres::PgRow, types::Json};
use tracing::info;
use uuid::Uuid;

use crate::models::{
    ContactSubmission, NewSubmission, PersonalInfo, SubmissionStatus, VehicleInfo,
};

/// Contact submission repository
#[derive(Clone)]
pub struct SubmissionRepository {
    pool: PgPool,
}

impl SubmissionRepository {
    /// Create a new submission repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new lead with status defaulted to pending
    pub async fn create(&self, new_submission: &NewSubmission) -> Result<ContactSubmission> {
        info!(
            "Creating submission for: {} {}",
            new_submission.personal.first_name, new_submission.personal.last_name
        );

        let row = sqlx::query(
            r#"
            INSERT INTO submissions (personal, vehicle, photo_count, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, personal, vehicle, photo_count, status, created_at, updated_at
            "#,
        )
        .bind(Json(&new_submission.personal))
        .bind(Json(&new_submission.vehicle))
        .bind(new_submission.photo_count)
        .bind(SubmissionStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;

        row_to_submission(row)
    }

    /// Get all submissions, newest first
    pub async fn get_all(&self) -> Result<Vec<ContactSubmission>> {
        let rows = sqlx::query(
            r#"
            SELECT id, personal, vehicle, photo_count, status, created_at, updated_at
            FROM submissions
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_submission).collect()
    }

    /// Update the review status of a lead, stamping updated_at
    ///
    /// Returns false when no submission matched the id.
    pub async fn update_status(&self, id: Uuid, status: SubmissionStatus) -> Result<bool> {
        let result =
            sqlx::query("UPDATE submissions SET status = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(status.as_str())
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a lead by id
    ///
    /// Deleting a nonexistent id returns false, not an error.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM submissions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_submission(row: PgRow) -> Result<ContactSubmission> {
    let personal: Json<PersonalInfo> = row.get("personal");
    let vehicle: Json<VehicleInfo> = row.get("vehicle");
    let status: String = row.get("status");

    Ok(ContactSubmission {
        id: row.get("id"),
        personal: personal.0,
        vehicle: vehicle.0,
        photo_count: row.get("photo_count"),
        status: SubmissionStatus::parse(&status)
            .ok_or_else(|| anyhow::anyhow!("Unknown status in store: {}", status))?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
