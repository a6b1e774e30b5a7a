use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch, post},
    Router,
};

use crate::entities::{material_item, work_item, work_order};
use crate::errors::{ErrorResponse, ServiceError};
use crate::services::work_orders::{
    AddMaterialItemRequest, AddPaymentRequest, AddWorkItemRequest, CreateWorkOrderRequest,
    ItemAdded, PaymentRecorded, SetStatusRequest, WorkOrderFull,
};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/work-orders", get(list_work_orders).post(create_work_order))
        .route("/work-orders/:id", get(get_work_order))
        .route("/work-orders/:id/full", get(get_work_order_full))
        .route("/work-orders/:id/status", patch(set_work_order_status))
        .route("/work-orders/:id/work-items", post(add_work_item))
        .route("/work-orders/:id/material-items", post(add_material_item))
        .route("/work-orders/:id/payments", post(add_payment))
}

/// Open a work order for a booking
#[utoipa::path(
    post,
    path = "/api/work-orders",
    request_body = CreateWorkOrderRequest,
    responses(
        (status = 201, description = "Work order created"),
        (status = 404, description = "Booking not found", body = ErrorResponse),
        (status = 409, description = "Work order already exists for booking", body = ErrorResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
    ),
    tag = "work-orders"
)]
pub async fn create_work_order(
    State(state): State<AppState>,
    Json(request): Json<CreateWorkOrderRequest>,
) -> Result<(StatusCode, Json<work_order::Model>), ServiceError> {
    let created = state.services.work_orders.create_from_booking(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// List work orders
#[utoipa::path(
    get,
    path = "/api/work-orders",
    responses((status = 200, description = "Work orders, newest first")),
    tag = "work-orders"
)]
pub async fn list_work_orders(
    State(state): State<AppState>,
) -> Result<Json<Vec<work_order::Model>>, ServiceError> {
    let orders = state.services.work_orders.list_work_orders().await?;
    Ok(Json(orders))
}

/// Get one work order
#[utoipa::path(
    get,
    path = "/api/work-orders/{id}",
    params(("id" = i64, Path, description = "Work order id")),
    responses(
        (status = 200, description = "Work order"),
        (status = 404, description = "Work order not found", body = ErrorResponse),
    ),
    tag = "work-orders"
)]
pub async fn get_work_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<work_order::Model>, ServiceError> {
    let order = state.services.work_orders.get_work_order(id).await?;
    Ok(Json(order))
}

/// Get the aggregate view: work order, line items, payments, audit history
#[utoipa::path(
    get,
    path = "/api/work-orders/{id}/full",
    params(("id" = i64, Path, description = "Work order id")),
    responses(
        (status = 200, description = "Aggregate work order view"),
        (status = 404, description = "Work order not found", body = ErrorResponse),
    ),
    tag = "work-orders"
)]
pub async fn get_work_order_full(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<WorkOrderFull>, ServiceError> {
    let full = state.services.work_orders.get_full(id).await?;
    Ok(Json(full))
}

/// Change a work order's status
#[utoipa::path(
    patch,
    path = "/api/work-orders/{id}/status",
    params(("id" = i64, Path, description = "Work order id")),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Status changed"),
        (status = 400, description = "Unknown status or illegal transition", body = ErrorResponse),
        (status = 404, description = "Work order not found", body = ErrorResponse),
    ),
    tag = "work-orders"
)]
pub async fn set_work_order_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<SetStatusRequest>,
) -> Result<Json<work_order::Model>, ServiceError> {
    let updated = state.services.work_orders.set_status(id, request).await?;
    Ok(Json(updated))
}

/// Add a labor line item
#[utoipa::path(
    post,
    path = "/api/work-orders/{id}/work-items",
    params(("id" = i64, Path, description = "Work order id")),
    request_body = AddWorkItemRequest,
    responses(
        (status = 201, description = "Item added; body carries the item and refreshed totals"),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Work order not found", body = ErrorResponse),
    ),
    tag = "work-orders"
)]
pub async fn add_work_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AddWorkItemRequest>,
) -> Result<(StatusCode, Json<ItemAdded<work_item::Model>>), ServiceError> {
    let added = state.services.work_orders.add_work_item(id, request).await?;
    Ok((StatusCode::CREATED, Json(added)))
}

/// Add a material line item
#[utoipa::path(
    post,
    path = "/api/work-orders/{id}/material-items",
    params(("id" = i64, Path, description = "Work order id")),
    request_body = AddMaterialItemRequest,
    responses(
        (status = 201, description = "Item added; body carries the item and refreshed totals"),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Work order not found", body = ErrorResponse),
    ),
    tag = "work-orders"
)]
pub async fn add_material_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AddMaterialItemRequest>,
) -> Result<(StatusCode, Json<ItemAdded<material_item::Model>>), ServiceError> {
    let added = state
        .services
        .work_orders
        .add_material_item(id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(added)))
}

/// Record a payment
#[utoipa::path(
    post,
    path = "/api/work-orders/{id}/payments",
    params(("id" = i64, Path, description = "Work order id")),
    request_body = AddPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded; body carries the payment and refreshed work order"),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Work order not found", body = ErrorResponse),
    ),
    tag = "work-orders"
)]
pub async fn add_payment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<AddPaymentRequest>,
) -> Result<(StatusCode, Json<PaymentRecorded>), ServiceError> {
    let recorded = state.services.work_orders.add_payment(id, request).await?;
    Ok((StatusCode::CREATED, Json(recorded)))
}
