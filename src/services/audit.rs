//! Append-only audit recorder.
//!
//! Every state-changing action against a work order appends exactly one row.
//! Callers pass the transaction of the primary mutation, so the mutation and
//! its audit record commit or roll back together: a committed mutation can
//! never be missing its trace.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entities::audit_entry;
use crate::errors::ServiceError;

/// Entity kind under which work-order history is recorded.
pub const ENTITY_WORK_ORDER: &str = "work_order";

/// Appends one immutable audit row on the given connection.
pub async fn record<C: ConnectionTrait>(
    conn: &C,
    entity: &str,
    entity_id: i64,
    action: &str,
    details: serde_json::Value,
) -> Result<audit_entry::Model, ServiceError> {
    let entry = audit_entry::ActiveModel {
        entity: Set(entity.to_string()),
        entity_id: Set(entity_id),
        action: Set(action.to_string()),
        details: Set(details),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let entry = entry.insert(conn).await?;
    Ok(entry)
}

/// Returns the full history of an entity in creation order (ascending id).
pub async fn list_for_entity<C: ConnectionTrait>(
    conn: &C,
    entity: &str,
    entity_id: i64,
) -> Result<Vec<audit_entry::Model>, ServiceError> {
    let entries = audit_entry::Entity::find()
        .filter(audit_entry::Column::Entity.eq(entity))
        .filter(audit_entry::Column::EntityId.eq(entity_id))
        .order_by_asc(audit_entry::Column::Id)
        .all(conn)
        .await?;

    Ok(entries)
}
