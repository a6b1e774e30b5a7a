use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::entities::{booking, car, client};
use crate::errors::ServiceError;
use crate::models::status::BookingStatus;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub client_id: i64,
    pub car_id: i64,
    pub scheduled_at: DateTime<Utc>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetBookingStatusRequest {
    pub status: String,
}

/// Service for service-visit bookings, the entry point of the shop workflow.
/// A booking later becomes the anchor for at most one work order.
#[derive(Clone)]
pub struct BookingService {
    db: Arc<DbPool>,
}

impl BookingService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, req), fields(client_id = req.client_id, car_id = req.car_id))]
    pub async fn create_booking(
        &self,
        req: CreateBookingRequest,
    ) -> Result<booking::Model, ServiceError> {
        let client = client::Entity::find_by_id(req.client_id)
            .filter(client::Column::IsArchived.eq(false))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Client not found".to_string()))?;

        let car = car::Entity::find_by_id(req.car_id)
            .filter(car::Column::IsArchived.eq(false))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Car not found".to_string()))?;

        if car.client_id != client.id {
            return Err(ServiceError::ValidationError(
                "car does not belong to client".to_string(),
            ));
        }

        let model = booking::ActiveModel {
            client_id: Set(client.id),
            car_id: Set(car.id),
            scheduled_at: Set(req.scheduled_at),
            note: Set(normalize_optional(req.note)),
            status: Set(BookingStatus::Pending.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = model.insert(&*self.db).await?;
        info!(booking_id = %model.id, "booking created");
        Ok(model)
    }

    /// Lists bookings, newest first.
    #[instrument(skip(self))]
    pub async fn list_bookings(&self) -> Result<Vec<booking::Model>, ServiceError> {
        let bookings = booking::Entity::find()
            .order_by_desc(booking::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(bookings)
    }

    #[instrument(skip(self))]
    pub async fn get_booking(&self, id: i64) -> Result<booking::Model, ServiceError> {
        booking::Entity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Booking not found".to_string()))
    }

    #[instrument(skip(self, req), fields(booking_id = %id))]
    pub async fn set_status(
        &self,
        id: i64,
        req: SetBookingStatusRequest,
    ) -> Result<booking::Model, ServiceError> {
        let status = BookingStatus::parse(&req.status)?;

        let model = self.get_booking(id).await?;
        let mut active: booking::ActiveModel = model.into();
        active.status = Set(status.to_string());

        let model = active.update(&*self.db).await?;
        info!(booking_id = %model.id, status = %status, "booking status changed");
        Ok(model)
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
