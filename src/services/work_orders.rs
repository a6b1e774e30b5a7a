use std::sync::Arc;

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{audit_entry, booking, material_item, payment, work_item, work_order};
use crate::errors::ServiceError;
use crate::models::status::{PaymentMethod, TransitionPolicy, WorkOrderStatus};
use crate::services::audit::{self, ENTITY_WORK_ORDER};
use crate::services::totals::{self, TotalsSummary};

pub const ACTION_CREATE: &str = "create";
pub const ACTION_STATUS_CHANGE: &str = "status_change";
pub const ACTION_ADD_WORK_ITEM: &str = "add_work_item";
pub const ACTION_ADD_MATERIAL_ITEM: &str = "add_material_item";
pub const ACTION_PAYMENT: &str = "payment";

/// Request to open a work order for a booking.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateWorkOrderRequest {
    #[validate(range(min = 1, message = "booking_id must be a positive id"))]
    pub booking_id: i64,
    pub description: Option<String>,
}

/// Request to change a work order's status.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetStatusRequest {
    pub status: String,
}

/// Request to append a labor line item.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddWorkItemRequest {
    pub name: String,
    /// Defaults to 1 when omitted.
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub qty: Option<Decimal>,
    /// Defaults to 0 when omitted.
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub unit_price: Option<Decimal>,
}

/// Request to append a material line item.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddMaterialItemRequest {
    pub name: String,
    /// Optional catalog reference; never dereferenced here.
    #[serde(default)]
    pub material_id: Option<i64>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub qty: Option<Decimal>,
    #[serde(default)]
    #[schema(value_type = Option<f64>)]
    pub unit_price: Option<Decimal>,
}

/// Request to record a payment against a work order.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddPaymentRequest {
    #[schema(value_type = f64)]
    pub amount: Decimal,
    /// Defaults to `cash` when omitted.
    #[serde(default)]
    pub method: Option<String>,
}

/// A newly added line item together with the owner's refreshed totals.
#[derive(Debug, Clone, Serialize)]
pub struct ItemAdded<T: Serialize> {
    pub item: T,
    pub totals: TotalsSummary,
}

/// A recorded payment together with the refreshed work order.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRecorded {
    pub payment: payment::Model,
    pub work_order: work_order::Model,
}

/// Aggregate view of a work order and everything attached to it.
#[derive(Debug, Clone, Serialize)]
pub struct WorkOrderFull {
    pub work_order: work_order::Model,
    pub work_items: Vec<work_item::Model>,
    pub material_items: Vec<material_item::Model>,
    pub payments: Vec<payment::Model>,
    pub audit_log: Vec<audit_entry::Model>,
}

/// Service for managing the work-order lifecycle: creation from a booking,
/// status transitions, line items, payments, and the aggregate view. Every
/// mutation runs in one transaction together with its totals recomputation
/// and audit record.
#[derive(Clone)]
pub struct WorkOrderService {
    db: Arc<DbPool>,
    policy: TransitionPolicy,
}

impl WorkOrderService {
    pub fn new(db: Arc<DbPool>, policy: TransitionPolicy) -> Self {
        Self { db, policy }
    }

    /// Opens a work order for a booking. At most one work order may ever
    /// exist per booking, including cancelled ones.
    #[instrument(skip(self, req), fields(booking_id = req.booking_id))]
    pub async fn create_from_booking(
        &self,
        req: CreateWorkOrderRequest,
    ) -> Result<work_order::Model, ServiceError> {
        req.validate()?;

        let txn = self.db.begin().await?;

        let booking = booking::Entity::find_by_id(req.booking_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Booking not found".to_string()))?;

        let existing = work_order::Entity::find()
            .filter(work_order::Column::BookingId.eq(booking.id))
            .one(&txn)
            .await?;
        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "WorkOrder already exists for booking".to_string(),
            ));
        }

        let now = Utc::now();
        let order = work_order::ActiveModel {
            booking_id: Set(booking.id),
            client_id: Set(booking.client_id),
            car_id: Set(booking.car_id),
            description: Set(normalize_text(req.description)),
            status: Set(WorkOrderStatus::Created.to_string()),
            total_amount: Set(Decimal::ZERO),
            paid_amount: Set(Decimal::ZERO),
            is_archived: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        // The unique index on booking_id is the backstop for a race between
        // the existence check above and this insert.
        let order = order.insert(&txn).await.map_err(map_unique_violation)?;

        audit::record(
            &txn,
            ENTITY_WORK_ORDER,
            order.id,
            ACTION_CREATE,
            json!({ "booking_id": order.booking_id }),
        )
        .await?;

        txn.commit().await?;

        info!(work_order_id = %order.id, "work order created");
        Ok(order)
    }

    /// Lists non-archived work orders, newest first.
    #[instrument(skip(self))]
    pub async fn list_work_orders(&self) -> Result<Vec<work_order::Model>, ServiceError> {
        let orders = work_order::Entity::find()
            .filter(work_order::Column::IsArchived.eq(false))
            .order_by_desc(work_order::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(orders)
    }

    /// Fetches one work order by id.
    #[instrument(skip(self))]
    pub async fn get_work_order(&self, id: i64) -> Result<work_order::Model, ServiceError> {
        find_active(&*self.db, id).await
    }

    /// Moves a work order to a new status, subject to the transition policy.
    #[instrument(skip(self, req), fields(work_order_id = %id))]
    pub async fn set_status(
        &self,
        id: i64,
        req: SetStatusRequest,
    ) -> Result<work_order::Model, ServiceError> {
        let to = WorkOrderStatus::parse(&req.status)?;

        let txn = self.db.begin().await?;

        let order = find_active(&txn, id).await?;
        let from = WorkOrderStatus::parse(&order.status)?;
        self.policy.check(from, to)?;

        let mut active: work_order::ActiveModel = order.into();
        active.status = Set(to.to_string());
        active.updated_at = Set(Utc::now());
        let order = active.update(&txn).await?;

        audit::record(
            &txn,
            ENTITY_WORK_ORDER,
            order.id,
            ACTION_STATUS_CHANGE,
            json!({ "from": from, "to": to }),
        )
        .await?;

        txn.commit().await?;

        info!(work_order_id = %order.id, from = %from, to = %to, "status changed");
        Ok(order)
    }

    /// Appends a labor line item and refreshes `total_amount`.
    #[instrument(skip(self, req), fields(work_order_id = %id))]
    pub async fn add_work_item(
        &self,
        id: i64,
        req: AddWorkItemRequest,
    ) -> Result<ItemAdded<work_item::Model>, ServiceError> {
        let name = require_name(&req.name)?;
        let qty = validate_qty(req.qty)?;
        let unit_price = validate_unit_price(req.unit_price)?;

        let txn = self.db.begin().await?;

        let order = find_active(&txn, id).await?;

        let item = work_item::ActiveModel {
            work_order_id: Set(order.id),
            name: Set(name),
            qty: Set(qty),
            unit_price: Set(unit_price),
            ..Default::default()
        };
        let item = item.insert(&txn).await?;

        let order = totals::recompute_total(&txn, order.id).await?;

        audit::record(
            &txn,
            ENTITY_WORK_ORDER,
            order.id,
            ACTION_ADD_WORK_ITEM,
            json!({
                "work_item_id": item.id,
                "name": item.name,
                "qty": item.qty,
                "unit_price": item.unit_price,
            }),
        )
        .await?;

        txn.commit().await?;

        info!(work_order_id = %order.id, work_item_id = %item.id, "work item added");
        Ok(ItemAdded {
            totals: TotalsSummary::from(&order),
            item,
        })
    }

    /// Appends a material line item and refreshes `total_amount`.
    #[instrument(skip(self, req), fields(work_order_id = %id))]
    pub async fn add_material_item(
        &self,
        id: i64,
        req: AddMaterialItemRequest,
    ) -> Result<ItemAdded<material_item::Model>, ServiceError> {
        let name = require_name(&req.name)?;
        let qty = validate_qty(req.qty)?;
        let unit_price = validate_unit_price(req.unit_price)?;
        if let Some(material_id) = req.material_id {
            if material_id < 1 {
                return Err(ServiceError::ValidationError(
                    "material_id must be a positive id".to_string(),
                ));
            }
        }

        let txn = self.db.begin().await?;

        let order = find_active(&txn, id).await?;

        let item = material_item::ActiveModel {
            work_order_id: Set(order.id),
            material_id: Set(req.material_id),
            name: Set(name),
            qty: Set(qty),
            unit_price: Set(unit_price),
            ..Default::default()
        };
        let item = item.insert(&txn).await?;

        let order = totals::recompute_total(&txn, order.id).await?;

        audit::record(
            &txn,
            ENTITY_WORK_ORDER,
            order.id,
            ACTION_ADD_MATERIAL_ITEM,
            json!({
                "material_item_id": item.id,
                "material_id": item.material_id,
                "name": item.name,
                "qty": item.qty,
                "unit_price": item.unit_price,
            }),
        )
        .await?;

        txn.commit().await?;

        info!(work_order_id = %order.id, material_item_id = %item.id, "material item added");
        Ok(ItemAdded {
            totals: TotalsSummary::from(&order),
            item,
        })
    }

    /// Records a payment and refreshes `paid_amount`. Overpayment is allowed;
    /// `paid_amount` may exceed `total_amount`.
    #[instrument(skip(self, req), fields(work_order_id = %id))]
    pub async fn add_payment(
        &self,
        id: i64,
        req: AddPaymentRequest,
    ) -> Result<PaymentRecorded, ServiceError> {
        // round to cents before the sign check so sub-cent amounts that
        // would store as 0.00 are rejected too
        let amount = round_money(req.amount);
        if amount <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "amount must be greater than zero".to_string(),
            ));
        }
        let method = match req.method.as_deref() {
            None | Some("") => PaymentMethod::Cash,
            Some(raw) => PaymentMethod::parse(raw)?,
        };

        let txn = self.db.begin().await?;

        let order = find_active(&txn, id).await?;

        let now = Utc::now();
        let paid = payment::ActiveModel {
            work_order_id: Set(order.id),
            amount: Set(amount),
            method: Set(method.to_string()),
            status: Set(payment::STATUS_PAID.to_string()),
            paid_at: Set(Some(now)),
            created_at: Set(now),
            ..Default::default()
        };
        let paid = paid.insert(&txn).await?;

        let order = totals::recompute_paid(&txn, order.id).await?;

        audit::record(
            &txn,
            ENTITY_WORK_ORDER,
            order.id,
            ACTION_PAYMENT,
            json!({
                "payment_id": paid.id,
                "amount": paid.amount,
                "method": paid.method,
            }),
        )
        .await?;

        txn.commit().await?;

        info!(work_order_id = %order.id, payment_id = %paid.id, amount = %paid.amount, "payment recorded");
        Ok(PaymentRecorded {
            payment: paid,
            work_order: order,
        })
    }

    /// Fetches the aggregate view: the work order plus its line items,
    /// payments, and full audit history, each in creation order.
    #[instrument(skip(self))]
    pub async fn get_full(&self, id: i64) -> Result<WorkOrderFull, ServiceError> {
        let conn = &*self.db;
        let order = find_active(conn, id).await?;

        let work_items = work_item::Entity::find()
            .filter(work_item::Column::WorkOrderId.eq(order.id))
            .order_by_asc(work_item::Column::Id)
            .all(conn)
            .await?;

        let material_items = material_item::Entity::find()
            .filter(material_item::Column::WorkOrderId.eq(order.id))
            .order_by_asc(material_item::Column::Id)
            .all(conn)
            .await?;

        let payments = payment::Entity::find()
            .filter(payment::Column::WorkOrderId.eq(order.id))
            .order_by_asc(payment::Column::Id)
            .all(conn)
            .await?;

        let audit_log = audit::list_for_entity(conn, ENTITY_WORK_ORDER, order.id).await?;

        Ok(WorkOrderFull {
            work_order: order,
            work_items,
            material_items,
            payments,
            audit_log,
        })
    }
}

async fn find_active<C: ConnectionTrait>(
    conn: &C,
    id: i64,
) -> Result<work_order::Model, ServiceError> {
    work_order::Entity::find_by_id(id)
        .filter(work_order::Column::IsArchived.eq(false))
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound("WorkOrder not found".to_string()))
}

fn map_unique_violation(err: DbErr) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ServiceError::Conflict("WorkOrder already exists for booking".to_string())
        }
        _ => ServiceError::DatabaseError(err),
    }
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn require_name(raw: &str) -> Result<String, ServiceError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(ServiceError::ValidationError(
            "name must not be empty".to_string(),
        ));
    }
    Ok(name.to_string())
}

fn validate_qty(qty: Option<Decimal>) -> Result<Decimal, ServiceError> {
    // rounded value is what gets stored, so it is what the sign check
    // must hold for; 0.004 rounds to 0.00 and is rejected
    let qty = round_money(qty.unwrap_or(Decimal::ONE));
    if qty <= Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "qty must be greater than zero".to_string(),
        ));
    }
    Ok(qty)
}

fn validate_unit_price(unit_price: Option<Decimal>) -> Result<Decimal, ServiceError> {
    let unit_price = round_money(unit_price.unwrap_or(Decimal::ZERO));
    if unit_price < Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "unit_price must not be negative".to_string(),
        ));
    }
    Ok(unit_price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qty_defaults_to_one() {
        assert_eq!(validate_qty(None).unwrap(), Decimal::ONE);
    }

    #[test]
    fn qty_rejects_zero_and_negative() {
        assert!(validate_qty(Some(Decimal::ZERO)).is_err());
        assert!(validate_qty(Some(Decimal::from(-3))).is_err());
    }

    #[test]
    fn qty_rejects_values_that_round_to_zero() {
        use rust_decimal_macros::dec;
        assert!(validate_qty(Some(dec!(0.004))).is_err());
        assert_eq!(validate_qty(Some(dec!(0.005))).unwrap(), dec!(0.01));
    }

    #[test]
    fn unit_price_defaults_to_zero_and_rejects_negative() {
        assert_eq!(validate_unit_price(None).unwrap(), Decimal::ZERO);
        assert!(validate_unit_price(Some(Decimal::from(-1))).is_err());
    }

    #[test]
    fn amounts_round_to_cents() {
        use rust_decimal_macros::dec;
        assert_eq!(validate_qty(Some(dec!(1.005))).unwrap(), dec!(1.01));
        assert_eq!(validate_unit_price(Some(dec!(9.999))).unwrap(), dec!(10.00));
    }

    #[test]
    fn name_is_trimmed_and_required() {
        assert_eq!(require_name("  Oil change ").unwrap(), "Oil change");
        assert!(require_name("   ").is_err());
        assert!(require_name("").is_err());
    }

    #[test]
    fn description_normalization() {
        assert_eq!(normalize_text(None), None);
        assert_eq!(normalize_text(Some("  ".into())), None);
        assert_eq!(normalize_text(Some(" brakes ".into())), Some("brakes".into()));
    }
}
