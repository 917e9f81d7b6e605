//! Public routes: inventory listing and the "sell us your car" intake

use axum::{
    Json,
    extract::{Multipart, State},
    response::IntoResponse,
};
use serde_json::json;
use tracing::{error, info};

use crate::{
    email::PhotoAttachment,
    error::ApiError,
    models::{CarStatus, NewSubmission, PersonalInfo, VehicleInfo},
    state::AppState,
};

/// Public car listing
///
/// Available-only by policy: sold and reserved cars stay in the back office.
pub async fn list_cars(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let cars = state
        .car_repository
        .get_by_status(CarStatus::Available)
        .await
        .map_err(|e| {
            error!("Failed to fetch public car listing: {}", e);
            ApiError::store(&e)
        })?;

    Ok(Json(json!({ "success": true, "cars": cars })))
}

/// Form fields collected from the multipart contact submission
#[derive(Default)]
struct ContactForm {
    first_name: String,
    last_name: String,
    phone: String,
    email: String,
    address: String,
    city: String,
    province: String,
    postal_code: String,
    vin: Option<String>,
    make: String,
    model: String,
    submodel: String,
    year: String,
    mileage_km: String,
    is_accidented: bool,
    photos: Vec<PhotoAttachment>,
}

/// Public contact-form submission
///
/// Persists the lead first, then forwards it by email with the photos
/// attached. A failed send is a distinct failure from validation, and the
/// already-stored lead is kept.
pub async fn submit_contact(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let form = read_contact_form(multipart).await?;

    for (value, field) in [
        (&form.first_name, "firstName"),
        (&form.last_name, "lastName"),
        (&form.phone, "phone"),
        (&form.email, "email"),
    ] {
        if value.trim().is_empty() {
            return Err(ApiError::BadRequest(format!(
                "Missing required field: {field}"
            )));
        }
    }

    let photo_count = i32::try_from(form.photos.len()).unwrap_or(i32::MAX);

    let new_submission = NewSubmission {
        personal: PersonalInfo {
            first_name: form.first_name,
            last_name: form.last_name,
            phone: form.phone,
            email: form.email,
            address: form.address,
            city: form.city,
            province: form.province,
            postal_code: form.postal_code,
        },
        vehicle: VehicleInfo {
            vin: form.vin,
            make: form.make,
            model: form.model,
            submodel: form.submodel,
            year: form.year,
            mileage_km: form.mileage_km,
            is_accidented: form.is_accidented,
        },
        photo_count,
    };

    let submission = state
        .submission_repository
        .create(&new_submission)
        .await
        .map_err(|e| {
            error!("Failed to store submission: {}", e);
            ApiError::store(&e)
        })?;

    info!("Stored contact submission {}", submission.id);

    if let Err(e) = state
        .email_service
        .send_submission(&new_submission, &form.photos)
        .await
    {
        // The lead is already persisted; report the email failure without
        // rolling the store write back. A timed-out send keeps its own
        // failure kind.
        error!("Failed to send lead notification email: {}", e);
        return Err(e.into());
    }

    Ok(Json(json!({
        "success": true,
        "message": "Submission received successfully"
    })))
}

async fn read_contact_form(mut multipart: Multipart) -> Result<ContactForm, ApiError> {
    let mut form = ContactForm::default();
    let mut photo_index = 0;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("Failed to read multipart field: {}", e);
        ApiError::BadRequest("Malformed form data".to_string())
    })? {
        let Some(name) = field.name().map(String::from) else {
            continue;
        };

        if name == "photos" {
            photo_index += 1;
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let filename = field
                .file_name()
                .map(String::from)
                .unwrap_or_else(|| format!("photo-{photo_index}"));
            let data = field.bytes().await.map_err(|e| {
                error!("Failed to read photo upload: {}", e);
                ApiError::BadRequest("Malformed form data".to_string())
            })?;
            form.photos.push(PhotoAttachment {
                filename,
                content_type,
                data: data.to_vec(),
            });
            continue;
        }

        let value = field.text().await.map_err(|e| {
            error!("Failed to read form field {}: {}", name, e);
            ApiError::BadRequest("Malformed form data".to_string())
        })?;

        match name.as_str() {
            "firstName" => form.first_name = value,
            "lastName" => form.last_name = value,
            "phone" => form.phone = value,
            "email" => form.email = value,
            "address" => form.address = value,
            "city" => form.city = value,
            "province" => form.province = value,
            "postalCode" => form.postal_code = value,
            "vin" => form.vin = Some(value).filter(|v| !v.trim().is_empty()),
            "make" => form.make = value,
            "model" => form.model = value,
            "submodel" => form.submodel = value,
            "year" => form.year = value,
            "mileageKm" => form.mileage_km = value,
            "isAccidented" => form.is_accidented = value == "true",
            // Unknown fields are ignored
            _ => {}
        }
    }

    Ok(form)
}
