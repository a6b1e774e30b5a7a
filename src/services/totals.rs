//! Derived-total recomputation for work orders.
//!
//! Both functions re-sum every relevant row from scratch instead of applying
//! incremental deltas. Rerunning them with no intervening mutation yields the
//! same stored value, and a racing recomputation self-heals because the last
//! writer still sums all rows. Callers run them on the transaction of the
//! mutation that made the stored totals stale.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::{material_item, payment, work_item, work_order};
use crate::errors::ServiceError;

/// Condensed view of a work order's money columns, returned alongside newly
/// added line items.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TotalsSummary {
    pub id: i64,
    #[schema(value_type = f64)]
    pub total_amount: Decimal,
    #[schema(value_type = f64)]
    pub paid_amount: Decimal,
    pub status: String,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<&work_order::Model> for TotalsSummary {
    fn from(model: &work_order::Model) -> Self {
        Self {
            id: model.id,
            total_amount: model.total_amount,
            paid_amount: model.paid_amount,
            status: model.status.clone(),
            updated_at: model.updated_at,
        }
    }
}

/// Sets `total_amount` to the sum of all line-item extensions
/// (`qty * unit_price`) currently attached to the work order.
pub async fn recompute_total<C: ConnectionTrait>(
    conn: &C,
    work_order_id: i64,
) -> Result<work_order::Model, ServiceError> {
    let work_sum: Decimal = work_item::Entity::find()
        .filter(work_item::Column::WorkOrderId.eq(work_order_id))
        .all(conn)
        .await?
        .iter()
        .map(|item| item.qty * item.unit_price)
        .sum();

    let material_sum: Decimal = material_item::Entity::find()
        .filter(material_item::Column::WorkOrderId.eq(work_order_id))
        .all(conn)
        .await?
        .iter()
        .map(|item| item.qty * item.unit_price)
        .sum();

    store_total(conn, work_order_id, |active| {
        active.total_amount = Set(work_sum + material_sum);
    })
    .await
}

/// Sets `paid_amount` to the sum of payments with status `paid`. Payments in
/// any other status never contribute.
pub async fn recompute_paid<C: ConnectionTrait>(
    conn: &C,
    work_order_id: i64,
) -> Result<work_order::Model, ServiceError> {
    let paid_sum: Decimal = payment::Entity::find()
        .filter(payment::Column::WorkOrderId.eq(work_order_id))
        .filter(payment::Column::Status.eq(payment::STATUS_PAID))
        .all(conn)
        .await?
        .iter()
        .map(|p| p.amount)
        .sum();

    store_total(conn, work_order_id, |active| {
        active.paid_amount = Set(paid_sum);
    })
    .await
}

async fn store_total<C, F>(
    conn: &C,
    work_order_id: i64,
    apply: F,
) -> Result<work_order::Model, ServiceError>
where
    C: ConnectionTrait,
    F: FnOnce(&mut work_order::ActiveModel),
{
    let order = work_order::Entity::find_by_id(work_order_id)
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound("WorkOrder not found".to_string()))?;

    let mut active: work_order::ActiveModel = order.into();
    apply(&mut active);
    active.updated_at = Set(Utc::now());

    let updated = active.update(conn).await?;
    Ok(updated)
}
