//! Shared test fixtures: an in-memory SQLite database with migrations
//! applied, plus seed helpers for the client -> car -> booking chain that
//! every work-order scenario needs.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use autoshop_api::{
    db::{self, DbConfig, DbPool},
    entities::{booking, car, client},
    models::status::TransitionPolicy,
    services::{
        bookings::{BookingService, CreateBookingRequest},
        cars::{CarService, CreateCarRequest},
        clients::{ClientService, CreateClientRequest},
        work_orders::WorkOrderService,
    },
};

/// One pooled connection keeps the in-memory database alive and private to
/// the test.
pub async fn test_pool() -> Arc<DbPool> {
    let cfg = DbConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        idle_timeout: Duration::from_secs(3600),
        ..Default::default()
    };

    let pool = db::establish_connection_with_config(&cfg)
        .await
        .expect("failed to open in-memory database");
    db::run_migrations(&pool)
        .await
        .expect("failed to run migrations");

    Arc::new(pool)
}

pub fn work_order_service(pool: &Arc<DbPool>) -> WorkOrderService {
    WorkOrderService::new(pool.clone(), TransitionPolicy::Strict)
}

pub fn permissive_work_order_service(pool: &Arc<DbPool>) -> WorkOrderService {
    WorkOrderService::new(pool.clone(), TransitionPolicy::Permissive)
}

/// Seeds a client, one of their cars, and a booking for tomorrow.
pub async fn seed_booking(pool: &Arc<DbPool>) -> (client::Model, car::Model, booking::Model) {
    let clients = ClientService::new(pool.clone());
    let cars = CarService::new(pool.clone());
    let bookings = BookingService::new(pool.clone());

    let client = clients
        .create_client(CreateClientRequest {
            full_name: "Иван Петров".to_string(),
            phone: "+7 900 123-45-67".to_string(),
            email: Some("ivan@example.com".to_string()),
        })
        .await
        .expect("seed client");

    let car = cars
        .create_car(CreateCarRequest {
            client_id: client.id,
            brand: "Toyota".to_string(),
            model: "Camry".to_string(),
            plate_number: Some("А123ВС77".to_string()),
            vin: None,
            year: Some(2019),
        })
        .await
        .expect("seed car");

    let booking = bookings
        .create_booking(CreateBookingRequest {
            client_id: client.id,
            car_id: car.id,
            scheduled_at: Utc::now() + ChronoDuration::days(1),
            note: Some("стук в подвеске".to_string()),
        })
        .await
        .expect("seed booking");

    (client, car, booking)
}
