//! Administrative back office routes: session management, car inventory
//! CRUD, and lead review

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::{clear_session_cookie, session_cookie, token_from_request},
    state::AppState,
    validation,
};

/// Request for admin login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request for lead status updates
#[derive(Deserialize)]
pub struct UpdateSubmissionStatusRequest {
    pub status: String,
}

/// Admin login endpoint
///
/// On success, sets the http-only session cookie. Failures are uniform:
/// callers cannot tell whether the username or the password was wrong.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Login attempt for admin: {}", payload.username);

    if !state.rate_limiter.check(&payload.username).await {
        return Err(ApiError::TooManyAttempts);
    }

    let admin = state
        .admin_repository
        .find_by_username(&payload.username)
        .await
        .map_err(|e| {
            error!("Failed to look up admin: {}", e);
            ApiError::store(&e)
        })?;

    let Some(admin) = admin else {
        state.rate_limiter.record_failure(&payload.username).await;
        return Err(ApiError::InvalidCredentials);
    };

    let password_ok = state
        .admin_repository
        .verify_password(&admin, &payload.password)
        .map_err(|e| {
            error!("Failed to verify password: {}", e);
            ApiError::InternalServerError
        })?;

    if !password_ok {
        state.rate_limiter.record_failure(&payload.username).await;
        return Err(ApiError::InvalidCredentials);
    }

    state.rate_limiter.reset(&payload.username).await;

    // Best effort: a failed timestamp update must not fail the login
    if let Err(e) = state
        .admin_repository
        .update_last_login(&admin.username)
        .await
    {
        warn!("Failed to update last login for {}: {}", admin.username, e);
    }

    let token = state.jwt_service.issue(&admin.username).map_err(|e| {
        error!("Failed to issue session token: {}", e);
        ApiError::InternalServerError
    })?;

    let cookie = session_cookie(
        token,
        state.jwt_service.token_expiry(),
        state.secure_cookies,
    );

    Ok((
        jar.add(cookie),
        Json(json!({
            "success": true,
            "user": { "username": admin.username, "role": admin.role }
        })),
    ))
}

/// Session verification endpoint
///
/// Explicit session query for protected navigation boundaries: the admin UI
/// calls this instead of keeping an ambient logged-in flag.
pub async fn verify_session(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Response {
    let unauthenticated =
        || (StatusCode::UNAUTHORIZED, Json(json!({ "authenticated": false }))).into_response();

    let Some(token) = token_from_request(&headers, &jar) else {
        return unauthenticated();
    };

    let Some(claims) = state.jwt_service.verify(&token) else {
        return unauthenticated();
    };

    // Re-check the active flag against the store; a deactivated admin's
    // token is denied even before its natural expiry.
    match state.admin_repository.find_by_username(&claims.sub).await {
        Ok(Some(admin)) => Json(json!({
            "authenticated": true,
            "user": { "username": admin.username, "role": admin.role }
        }))
        .into_response(),
        Ok(None) => unauthenticated(),
        Err(e) => {
            error!("Failed to verify session against store: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "authenticated": false })),
            )
                .into_response()
        }
    }
}

/// Logout endpoint
///
/// Clears the session cookie with max-age zero. Tokens are stateless, so a
/// copy held elsewhere stays verifiable until its natural expiry.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    (
        jar.add(clear_session_cookie(state.secure_cookies)),
        Json(json!({ "success": true, "message": "Logout successful" })),
    )
}

/// List all cars, all statuses, newest first
pub async fn list_cars(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let cars = state.car_repository.get_all().await.map_err(|e| {
        error!("Failed to fetch cars: {}", e);
        ApiError::store(&e)
    })?;

    Ok(Json(json!({ "success": true, "cars": cars })))
}

/// Create a new car listing
pub async fn create_car(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let new_car = validation::parse_new_car(&payload).map_err(ApiError::BadRequest)?;

    let car = state.car_repository.create(&new_car).await.map_err(|e| {
        error!("Failed to create car: {}", e);
        ApiError::store(&e)
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "car": car })),
    ))
}

/// Get a specific car
pub async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let car = state
        .car_repository
        .get_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to fetch car: {}", e);
            ApiError::store(&e)
        })?
        .ok_or_else(|| ApiError::NotFound("Car not found".to_string()))?;

    Ok(Json(json!({ "success": true, "car": car })))
}

/// Apply a partial update to a car
///
/// The id field in the payload is always stripped; identity is immutable.
pub async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let update = validation::parse_car_update(&payload).map_err(ApiError::BadRequest)?;

    let updated = state
        .car_repository
        .update(id, &update)
        .await
        .map_err(|e| {
            error!("Failed to update car: {}", e);
            ApiError::store(&e)
        })?;

    if !updated {
        return Err(ApiError::OperationFailed("Failed to update car".to_string()));
    }

    // The row can disappear between the update and the re-fetch; report
    // that as not-found rather than a success with no car.
    let car = state
        .car_repository
        .get_by_id(id)
        .await
        .map_err(|e| {
            error!("Failed to fetch updated car: {}", e);
            ApiError::store(&e)
        })?
        .ok_or_else(|| ApiError::NotFound("Car not found".to_string()))?;

    Ok(Json(json!({ "success": true, "car": car })))
}

/// Delete a car listing
pub async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.car_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete car: {}", e);
        ApiError::store(&e)
    })?;

    if !deleted {
        return Err(ApiError::OperationFailed("Failed to delete car".to_string()));
    }

    Ok(Json(json!({
        "success": true,
        "message": "Car deleted successfully"
    })))
}

/// List all leads, newest first, for the dashboard summary view
pub async fn list_submissions(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let submissions = state.submission_repository.get_all().await.map_err(|e| {
        error!("Failed to fetch submissions: {}", e);
        ApiError::store(&e)
    })?;

    Ok(Json(json!({
        "success": true,
        "total": submissions.len(),
        "submissions": submissions
    })))
}

/// Update the review status of a lead
pub async fn update_submission_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSubmissionStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let status = crate::models::SubmissionStatus::parse(&payload.status)
        .ok_or_else(|| ApiError::BadRequest("Invalid status".to_string()))?;

    let updated = state
        .submission_repository
        .update_status(id, status)
        .await
        .map_err(|e| {
            error!("Failed to update submission status: {}", e);
            ApiError::store(&e)
        })?;

    if !updated {
        return Err(ApiError::OperationFailed(
            "Failed to update submission".to_string(),
        ));
    }

    Ok(Json(json!({ "success": true })))
}

/// Delete a lead
pub async fn delete_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state.submission_repository.delete(id).await.map_err(|e| {
        error!("Failed to delete submission: {}", e);
        ApiError::store(&e)
    })?;

    if !deleted {
        return Err(ApiError::OperationFailed(
            "Failed to delete submission".to_string(),
        ));
    }

    Ok(Json(json!({ "success": true })))
}
