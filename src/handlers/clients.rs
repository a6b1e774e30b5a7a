use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use crate::entities::client;
use crate::errors::ServiceError;
use crate::services::clients::{CreateClientRequest, UpdateClientRequest};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/:id",
            get(get_client).patch(update_client).delete(archive_client),
        )
}

pub async fn create_client(
    State(state): State<AppState>,
    Json(request): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<client::Model>), ServiceError> {
    let created = state.services.clients.create_client(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_clients(
    State(state): State<AppState>,
) -> Result<Json<Vec<client::Model>>, ServiceError> {
    let clients = state.services.clients.list_clients().await?;
    Ok(Json(clients))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<client::Model>, ServiceError> {
    let found = state.services.clients.get_client(id).await?;
    Ok(Json(found))
}

pub async fn update_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<Json<client::Model>, ServiceError> {
    let updated = state.services.clients.update_client(id, request).await?;
    Ok(Json(updated))
}

pub async fn archive_client(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ServiceError> {
    state.services.clients.archive_client(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
