//! Backend for a small auto service shop: clients, their cars, visit
//! bookings, and the work orders that grow out of them. The work order is
//! the core aggregate; it owns labor and material line items, payments, and
//! an append-only audit history, with derived totals recomputed inside the
//! mutating transaction.

use std::sync::Arc;
use std::time::Duration;

use axum::{http::HeaderValue, response::Json, routing::get, Router};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod services;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::services::bookings::BookingService;
use crate::services::cars::CarService;
use crate::services::clients::ClientService;
use crate::services::work_orders::WorkOrderService;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// All domain services, cheap to clone (each holds an `Arc` to the pool).
#[derive(Clone)]
pub struct AppServices {
    pub clients: ClientService,
    pub cars: CarService,
    pub bookings: BookingService,
    pub work_orders: WorkOrderService,
}

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: AppConfig) -> Self {
        let services = AppServices {
            clients: ClientService::new(db.clone()),
            cars: CarService::new(db.clone()),
            bookings: BookingService::new(db.clone()),
            work_orders: WorkOrderService::new(db.clone(), config.transition_policy()),
        };

        Self {
            db,
            config,
            services,
        }
    }
}

/// Builds the full application router: domain routes under `/api`, health
/// probes at the root, the OpenAPI document, and the middleware stack.
pub fn app_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(handlers::clients::routes())
        .merge(handlers::cars::routes())
        .merge(handlers::bookings::routes())
        .merge(handlers::work_orders::routes());

    let cors = cors_layer(&state.config);

    Router::new()
        .nest("/api", api)
        .route("/health", get(handlers::health::health))
        .route("/health/db", get(handlers::health::health_db))
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(cors)
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(openapi::ApiDoc::openapi())
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    match config.cors_allowed_origins.as_deref() {
        Some(origins) if !origins.trim().is_empty() => {
            let origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any)
        }
        _ => CorsLayer::permissive(),
    }
}
