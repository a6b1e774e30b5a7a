use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::entities::{car, client};
use crate::errors::ServiceError;
use crate::models::patch::Patch;

const YEAR_MIN: i32 = 1900;
const YEAR_MAX: i32 = 2100;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateCarRequest {
    pub client_id: i64,
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub plate_number: Option<String>,
    #[serde(default)]
    pub vin: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

/// Update payload. `brand` and `model` are always required; the remaining
/// fields are tri-state (absent keeps, null or blank clears).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateCarRequest {
    pub brand: String,
    pub model: String,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub plate_number: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub vin: Patch<String>,
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub year: Patch<i32>,
}

/// Service for the car registry. A car always belongs to one client.
#[derive(Clone)]
pub struct CarService {
    db: Arc<DbPool>,
}

impl CarService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, req), fields(client_id = req.client_id))]
    pub async fn create_car(&self, req: CreateCarRequest) -> Result<car::Model, ServiceError> {
        let brand = require_field(&req.brand, "brand")?;
        let model = require_field(&req.model, "model")?;
        let year = validate_year(req.year)?;

        client::Entity::find_by_id(req.client_id)
            .filter(client::Column::IsArchived.eq(false))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Client not found".to_string()))?;

        let car = car::ActiveModel {
            client_id: Set(req.client_id),
            brand: Set(brand),
            model: Set(model),
            plate_number: Set(normalize_optional(req.plate_number)),
            vin: Set(normalize_optional(req.vin)),
            year: Set(year),
            is_archived: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let car = car.insert(&*self.db).await?;
        info!(car_id = %car.id, client_id = %car.client_id, "car created");
        Ok(car)
    }

    /// Lists non-archived cars, optionally narrowed to one client.
    #[instrument(skip(self))]
    pub async fn list_cars(&self, client_id: Option<i64>) -> Result<Vec<car::Model>, ServiceError> {
        let mut query = car::Entity::find().filter(car::Column::IsArchived.eq(false));
        if let Some(client_id) = client_id {
            query = query.filter(car::Column::ClientId.eq(client_id));
        }

        let cars = query.order_by_desc(car::Column::Id).all(&*self.db).await?;
        Ok(cars)
    }

    #[instrument(skip(self))]
    pub async fn get_car(&self, id: i64) -> Result<car::Model, ServiceError> {
        find_active(&self.db, id).await
    }

    #[instrument(skip(self, req), fields(car_id = %id))]
    pub async fn update_car(
        &self,
        id: i64,
        req: UpdateCarRequest,
    ) -> Result<car::Model, ServiceError> {
        let brand = require_field(&req.brand, "brand")?;
        let model = require_field(&req.model, "model")?;
        if let Patch::Value(year) = req.year {
            validate_year(Some(year))?;
        }

        let current = find_active(&self.db, id).await?;
        let plate_number = req
            .plate_number
            .cleared_text()
            .apply(current.plate_number.clone());
        let vin = req.vin.cleared_text().apply(current.vin.clone());
        let year = req.year.apply(current.year);

        let mut active: car::ActiveModel = current.into();
        active.brand = Set(brand);
        active.model = Set(model);
        active.plate_number = Set(plate_number);
        active.vin = Set(vin);
        active.year = Set(year);

        let car = active.update(&*self.db).await?;
        info!(car_id = %car.id, "car updated");
        Ok(car)
    }

    /// Archives a car; listings and lookups stop returning it.
    #[instrument(skip(self))]
    pub async fn archive_car(&self, id: i64) -> Result<(), ServiceError> {
        let car = find_active(&self.db, id).await?;

        let mut active: car::ActiveModel = car.into();
        active.is_archived = Set(true);
        active.update(&*self.db).await?;

        info!(car_id = %id, "car archived");
        Ok(())
    }
}

async fn find_active(db: &DbPool, id: i64) -> Result<car::Model, ServiceError> {
    car::Entity::find_by_id(id)
        .filter(car::Column::IsArchived.eq(false))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Car not found".to_string()))
}

fn require_field(raw: &str, field: &str) -> Result<String, ServiceError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ServiceError::ValidationError(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(value.to_string())
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn validate_year(year: Option<i32>) -> Result<Option<i32>, ServiceError> {
    match year {
        Some(y) if !(YEAR_MIN..=YEAR_MAX).contains(&y) => Err(ServiceError::ValidationError(
            format!("year must be between {} and {}", YEAR_MIN, YEAR_MAX),
        )),
        other => Ok(other),
    }
}
