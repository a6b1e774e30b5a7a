use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::entities::client;
use crate::errors::ServiceError;
use crate::models::patch::Patch;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateClientRequest {
    pub full_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Update payload. `full_name` and `phone` are always required; `email` is
/// tri-state (absent keeps, null or blank clears).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateClientRequest {
    pub full_name: String,
    pub phone: String,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub email: Patch<String>,
}

/// Service for the client registry. Deleting is soft: archived clients drop
/// out of listings but their history stays intact.
#[derive(Clone)]
pub struct ClientService {
    db: Arc<DbPool>,
}

impl ClientService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, req))]
    pub async fn create_client(
        &self,
        req: CreateClientRequest,
    ) -> Result<client::Model, ServiceError> {
        let full_name = require_field(&req.full_name, "full_name")?;
        let phone = require_field(&req.phone, "phone")?;

        let model = client::ActiveModel {
            full_name: Set(full_name),
            phone: Set(phone),
            email: Set(normalize_optional(req.email)),
            is_archived: Set(false),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let model = model.insert(&*self.db).await?;
        info!(client_id = %model.id, "client created");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn list_clients(&self) -> Result<Vec<client::Model>, ServiceError> {
        let clients = client::Entity::find()
            .filter(client::Column::IsArchived.eq(false))
            .order_by_desc(client::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(clients)
    }

    #[instrument(skip(self))]
    pub async fn get_client(&self, id: i64) -> Result<client::Model, ServiceError> {
        find_active(&self.db, id).await
    }

    #[instrument(skip(self, req), fields(client_id = %id))]
    pub async fn update_client(
        &self,
        id: i64,
        req: UpdateClientRequest,
    ) -> Result<client::Model, ServiceError> {
        let full_name = require_field(&req.full_name, "full_name")?;
        let phone = require_field(&req.phone, "phone")?;

        let model = find_active(&self.db, id).await?;
        let email = req.email.cleared_text().apply(model.email.clone());

        let mut active: client::ActiveModel = model.into();
        active.full_name = Set(full_name);
        active.phone = Set(phone);
        active.email = Set(email);

        let model = active.update(&*self.db).await?;
        info!(client_id = %model.id, "client updated");
        Ok(model)
    }

    /// Archives a client; listings and lookups stop returning it.
    #[instrument(skip(self))]
    pub async fn archive_client(&self, id: i64) -> Result<(), ServiceError> {
        let model = find_active(&self.db, id).await?;

        let mut active: client::ActiveModel = model.into();
        active.is_archived = Set(true);
        active.update(&*self.db).await?;

        info!(client_id = %id, "client archived");
        Ok(())
    }
}

async fn find_active(db: &DbPool, id: i64) -> Result<client::Model, ServiceError> {
    client::Entity::find_by_id(id)
        .filter(client::Column::IsArchived.eq(false))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Client not found".to_string()))
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
