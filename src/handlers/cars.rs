use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::entities::car;
use crate::errors::ServiceError;
use crate::services::cars::{CreateCarRequest, UpdateCarRequest};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ListCarsQuery {
    pub client_id: Option<i64>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cars", get(list_cars).post(create_car))
        .route(
            "/cars/:id",
            get(get_car).patch(update_car).delete(archive_car),
        )
}

pub async fn create_car(
    State(state): State<AppState>,
    Json(request): Json<CreateCarRequest>,
) -> Result<(StatusCode, Json<car::Model>), ServiceError> {
    let created = state.services.cars.create_car(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_cars(
    State(state): State<AppState>,
    Query(query): Query<ListCarsQuery>,
) -> Result<Json<Vec<car::Model>>, ServiceError> {
    let cars = state.services.cars.list_cars(query.client_id).await?;
    Ok(Json(cars))
}

pub async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<car::Model>, ServiceError> {
    let found = state.services.cars.get_car(id).await?;
    Ok(Json(found))
}

pub async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateCarRequest>,
) -> Result<Json<car::Model>, ServiceError> {
    let updated = state.services.cars.update_car(id, request).await?;
    Ok(Json(updated))
}

pub async fn archive_car(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    state.services.cars.archive_car(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
