use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch},
    Router,
};

use crate::entities::booking;
use crate::errors::ServiceError;
use crate::services::bookings::{CreateBookingRequest, SetBookingStatusRequest};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/:id", get(get_booking))
        .route("/bookings/:id/status", patch(set_booking_status))
}

pub async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<booking::Model>), ServiceError> {
    let created = state.services.bookings.create_booking(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_bookings(
    State(state): State<AppState>,
) -> Result<Json<Vec<booking::Model>>, ServiceError> {
    let bookings = state.services.bookings.list_bookings().await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<booking::Model>, ServiceError> {
    let found = state.services.bookings.get_booking(id).await?;
    Ok(Json(found))
}

pub async fn set_booking_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<SetBookingStatusRequest>,
) -> Result<Json<booking::Model>, ServiceError> {
    let updated = state.services.bookings.set_status(id, request).await?;
    Ok(Json(updated))
}
