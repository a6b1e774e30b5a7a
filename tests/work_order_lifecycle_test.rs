//! End-to-end service tests for the work-order lifecycle: opening from a
//! booking, accumulating labor and materials, recording payments, status
//! transitions, and the audit trail.

mod common;

use autoshop_api::{
    entities::{payment, work_order},
    errors::ServiceError,
    models::status::WorkOrderStatus,
    services::{
        totals,
        work_orders::{
            AddMaterialItemRequest, AddPaymentRequest, AddWorkItemRequest, CreateWorkOrderRequest,
            SetStatusRequest,
        },
    },
};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};

fn create_req(booking_id: i64) -> CreateWorkOrderRequest {
    CreateWorkOrderRequest {
        booking_id,
        description: Some("плановое ТО".to_string()),
    }
}

#[tokio::test]
async fn opens_work_order_from_booking() {
    let pool = common::test_pool().await;
    let (client, car, booking) = common::seed_booking(&pool).await;
    let svc = common::work_order_service(&pool);

    let order = svc.create_from_booking(create_req(booking.id)).await.unwrap();

    assert_eq!(order.booking_id, booking.id);
    assert_eq!(order.client_id, client.id);
    assert_eq!(order.car_id, car.id);
    assert_eq!(order.status, WorkOrderStatus::Created.to_string());
    assert_eq!(order.total_amount, dec!(0));
    assert_eq!(order.paid_amount, dec!(0));
    assert_eq!(order.description.as_deref(), Some("плановое ТО"));

    let full = svc.get_full(order.id).await.unwrap();
    assert_eq!(full.audit_log.len(), 1);
    assert_eq!(full.audit_log[0].action, "create");
    assert_eq!(full.audit_log[0].entity, "work_order");
    assert_eq!(full.audit_log[0].entity_id, order.id);
}

#[tokio::test]
async fn second_work_order_for_same_booking_conflicts() {
    let pool = common::test_pool().await;
    let (_, _, booking) = common::seed_booking(&pool).await;
    let svc = common::work_order_service(&pool);

    svc.create_from_booking(create_req(booking.id)).await.unwrap();
    let err = svc
        .create_from_booking(create_req(booking.id))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn unknown_booking_is_not_found() {
    let pool = common::test_pool().await;
    let svc = common::work_order_service(&pool);

    let err = svc.create_from_booking(create_req(9999)).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)), "got {err:?}");
}

#[tokio::test]
async fn line_items_accumulate_into_total() {
    let pool = common::test_pool().await;
    let (_, _, booking) = common::seed_booking(&pool).await;
    let svc = common::work_order_service(&pool);
    let order = svc.create_from_booking(create_req(booking.id)).await.unwrap();

    let added = svc
        .add_work_item(
            order.id,
            AddWorkItemRequest {
                name: "Замена масла".to_string(),
                qty: None,
                unit_price: Some(dec!(2500)),
            },
        )
        .await
        .unwrap();
    assert_eq!(added.item.qty, dec!(1), "qty defaults to 1");
    assert_eq!(added.totals.total_amount, dec!(2500));

    let added = svc
        .add_material_item(
            order.id,
            AddMaterialItemRequest {
                name: "Масло 5W-30".to_string(),
                material_id: None,
                qty: Some(dec!(4)),
                unit_price: Some(dec!(800)),
            },
        )
        .await
        .unwrap();
    assert_eq!(added.totals.total_amount, dec!(5700));

    let full = svc.get_full(order.id).await.unwrap();
    assert_eq!(full.work_items.len(), 1);
    assert_eq!(full.material_items.len(), 1);
    assert_eq!(full.work_order.total_amount, dec!(5700));

    let actions: Vec<&str> = full.audit_log.iter().map(|e| e.action.as_str()).collect();
    assert_eq!(actions, ["create", "add_work_item", "add_material_item"]);
}

#[tokio::test]
async fn invalid_line_items_are_rejected_and_leave_no_rows() {
    let pool = common::test_pool().await;
    let (_, _, booking) = common::seed_booking(&pool).await;
    let svc = common::work_order_service(&pool);
    let order = svc.create_from_booking(create_req(booking.id)).await.unwrap();

    let zero_qty = svc
        .add_work_item(
            order.id,
            AddWorkItemRequest {
                name: "Диагностика".to_string(),
                qty: Some(dec!(0)),
                unit_price: Some(dec!(1000)),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(zero_qty, ServiceError::ValidationError(_)));

    let blank_name = svc
        .add_material_item(
            order.id,
            AddMaterialItemRequest {
                name: "   ".to_string(),
                material_id: None,
                qty: Some(dec!(1)),
                unit_price: Some(dec!(100)),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(blank_name, ServiceError::ValidationError(_)));

    let negative_price = svc
        .add_work_item(
            order.id,
            AddWorkItemRequest {
                name: "Мойка".to_string(),
                qty: Some(dec!(1)),
                unit_price: Some(dec!(-50)),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(negative_price, ServiceError::ValidationError(_)));

    let full = svc.get_full(order.id).await.unwrap();
    assert!(full.work_items.is_empty());
    assert!(full.material_items.is_empty());
    assert_eq!(full.work_order.total_amount, dec!(0));
    // only the creation record, the failed mutations rolled back
    assert_eq!(full.audit_log.len(), 1);
}

#[tokio::test]
async fn payments_accumulate_into_paid_amount() {
    let pool = common::test_pool().await;
    let (_, _, booking) = common::seed_booking(&pool).await;
    let svc = common::work_order_service(&pool);
    let order = svc.create_from_booking(create_req(booking.id)).await.unwrap();

    svc.add_work_item(
        order.id,
        AddWorkItemRequest {
            name: "Замена колодок".to_string(),
            qty: None,
            unit_price: Some(dec!(5700)),
        },
    )
    .await
    .unwrap();

    let recorded = svc
        .add_payment(
            order.id,
            AddPaymentRequest {
                amount: dec!(2000),
                method: Some("card".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(recorded.payment.amount, dec!(2000));
    assert_eq!(recorded.payment.method, "card");
    assert_eq!(recorded.payment.status, "paid");
    assert!(recorded.payment.paid_at.is_some());
    assert_eq!(recorded.work_order.paid_amount, dec!(2000));

    // default method is cash, overpayment is allowed
    let recorded = svc
        .add_payment(
            order.id,
            AddPaymentRequest {
                amount: dec!(4000),
                method: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(recorded.payment.method, "cash");
    assert_eq!(recorded.work_order.paid_amount, dec!(6000));
    assert!(recorded.work_order.paid_amount > recorded.work_order.total_amount);

    let rejected = svc
        .add_payment(
            order.id,
            AddPaymentRequest {
                amount: dec!(0),
                method: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(rejected, ServiceError::ValidationError(_)));

    let unknown_method = svc
        .add_payment(
            order.id,
            AddPaymentRequest {
                amount: dec!(10),
                method: Some("crypto".to_string()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(unknown_method, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn sub_cent_amounts_never_store_zero_rows() {
    let pool = common::test_pool().await;
    let (_, _, booking) = common::seed_booking(&pool).await;
    let svc = common::work_order_service(&pool);
    let order = svc.create_from_booking(create_req(booking.id)).await.unwrap();

    // 0.004 rounds to 0.00; a work item with qty 0 must never be persisted
    let err = svc
        .add_work_item(
            order.id,
            AddWorkItemRequest {
                name: "Подкраска".to_string(),
                qty: Some(dec!(0.004)),
                unit_price: Some(dec!(100)),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)), "got {err:?}");

    // same for a payment of 0.00
    let err = svc
        .add_payment(
            order.id,
            AddPaymentRequest {
                amount: dec!(0.004),
                method: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)), "got {err:?}");

    let full = svc.get_full(order.id).await.unwrap();
    assert!(full.work_items.is_empty());
    assert!(full.payments.is_empty());
    assert_eq!(full.work_order.total_amount, dec!(0));
    assert_eq!(full.work_order.paid_amount, dec!(0));
}

#[tokio::test]
async fn non_paid_payments_never_contribute_to_paid_amount() {
    let pool = common::test_pool().await;
    let (_, _, booking) = common::seed_booking(&pool).await;
    let svc = common::work_order_service(&pool);
    let order = svc.create_from_booking(create_req(booking.id)).await.unwrap();

    svc.add_payment(
        order.id,
        AddPaymentRequest {
            amount: dec!(1500),
            method: None,
        },
    )
    .await
    .unwrap();

    // a pending payment row written around the service
    let pending = payment::ActiveModel {
        work_order_id: Set(order.id),
        amount: Set(dec!(9999)),
        method: Set("card".to_string()),
        status: Set("pending".to_string()),
        paid_at: Set(None),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    pending.insert(pool.as_ref()).await.unwrap();

    let recomputed = totals::recompute_paid(pool.as_ref(), order.id).await.unwrap();
    assert_eq!(recomputed.paid_amount, dec!(1500));

    let full = svc.get_full(order.id).await.unwrap();
    assert_eq!(full.payments.len(), 2, "the row itself is still visible");
    assert_eq!(full.work_order.paid_amount, dec!(1500));
}

#[tokio::test]
async fn strict_policy_walks_the_status_diagram() {
    let pool = common::test_pool().await;
    let (_, _, booking) = common::seed_booking(&pool).await;
    let svc = common::work_order_service(&pool);
    let order = svc.create_from_booking(create_req(booking.id)).await.unwrap();

    // skipping ahead is rejected
    let err = svc
        .set_status(
            order.id,
            SetStatusRequest {
                status: "ready".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    for status in ["in_progress", "waiting_approval", "ready", "closed"] {
        let updated = svc
            .set_status(
                order.id,
                SetStatusRequest {
                    status: status.to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, status);
    }

    // closed is terminal
    let err = svc
        .set_status(
            order.id,
            SetStatusRequest {
                status: "cancelled".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let full = svc.get_full(order.id).await.unwrap();
    let changes = full
        .audit_log
        .iter()
        .filter(|e| e.action == "status_change")
        .count();
    assert_eq!(changes, 4, "only successful transitions are recorded");
}

#[tokio::test]
async fn unrecognized_status_is_rejected_before_touching_the_row() {
    let pool = common::test_pool().await;
    let (_, _, booking) = common::seed_booking(&pool).await;
    let svc = common::work_order_service(&pool);
    let order = svc.create_from_booking(create_req(booking.id)).await.unwrap();

    let err = svc
        .set_status(
            order.id,
            SetStatusRequest {
                status: "done".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let unchanged = svc.get_work_order(order.id).await.unwrap();
    assert_eq!(unchanged.status, "created");
}

#[tokio::test]
async fn permissive_policy_accepts_any_recognized_status() {
    let pool = common::test_pool().await;
    let (_, _, booking) = common::seed_booking(&pool).await;
    let svc = common::permissive_work_order_service(&pool);
    let order = svc.create_from_booking(create_req(booking.id)).await.unwrap();

    let updated = svc
        .set_status(
            order.id,
            SetStatusRequest {
                status: "closed".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, "closed");

    // even out of a terminal state
    let updated = svc
        .set_status(
            order.id,
            SetStatusRequest {
                status: "in_progress".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, "in_progress");

    // but never an unknown value
    let err = svc
        .set_status(
            order.id,
            SetStatusRequest {
                status: "paused".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));
}

#[tokio::test]
async fn operations_on_missing_work_orders_are_not_found() {
    let pool = common::test_pool().await;
    common::seed_booking(&pool).await;
    let svc = common::work_order_service(&pool);

    assert!(matches!(
        svc.get_work_order(404).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert!(matches!(
        svc.get_full(404).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert!(matches!(
        svc.add_work_item(
            404,
            AddWorkItemRequest {
                name: "x".into(),
                qty: None,
                unit_price: None
            }
        )
        .await
        .unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert!(matches!(
        svc.add_payment(
            404,
            AddPaymentRequest {
                amount: dec!(1),
                method: None
            }
        )
        .await
        .unwrap_err(),
        ServiceError::NotFound(_)
    ));
}

#[tokio::test]
async fn archived_work_orders_disappear_from_reads() {
    let pool = common::test_pool().await;
    let (_, _, booking) = common::seed_booking(&pool).await;
    let svc = common::work_order_service(&pool);
    let order = svc.create_from_booking(create_req(booking.id)).await.unwrap();

    let mut active = order.clone().into_active_model();
    active.is_archived = Set(true);
    active.update(pool.as_ref()).await.unwrap();

    assert!(svc.list_work_orders().await.unwrap().is_empty());
    assert!(matches!(
        svc.get_work_order(order.id).await.unwrap_err(),
        ServiceError::NotFound(_)
    ));
}

#[tokio::test]
async fn recomputing_totals_again_changes_nothing() {
    let pool = common::test_pool().await;
    let (_, _, booking) = common::seed_booking(&pool).await;
    let svc = common::work_order_service(&pool);
    let order = svc.create_from_booking(create_req(booking.id)).await.unwrap();

    svc.add_work_item(
        order.id,
        AddWorkItemRequest {
            name: "Регулировка".to_string(),
            qty: Some(dec!(2)),
            unit_price: Some(dec!(1250.50)),
        },
    )
    .await
    .unwrap();
    svc.add_payment(
        order.id,
        AddPaymentRequest {
            amount: dec!(1000),
            method: None,
        },
    )
    .await
    .unwrap();

    let first = totals::recompute_total(pool.as_ref(), order.id).await.unwrap();
    let second = totals::recompute_total(pool.as_ref(), order.id).await.unwrap();
    assert_eq!(first.total_amount, dec!(2501));
    assert_eq!(second.total_amount, first.total_amount);

    let first = totals::recompute_paid(pool.as_ref(), order.id).await.unwrap();
    let second = totals::recompute_paid(pool.as_ref(), order.id).await.unwrap();
    assert_eq!(first.paid_amount, dec!(1000));
    assert_eq!(second.paid_amount, first.paid_amount);
}

#[tokio::test]
async fn list_returns_newest_first() {
    let pool = common::test_pool().await;
    let svc = common::work_order_service(&pool);

    let (_, _, first_booking) = common::seed_booking(&pool).await;
    let (_, _, second_booking) = common::seed_booking(&pool).await;

    let first = svc
        .create_from_booking(create_req(first_booking.id))
        .await
        .unwrap();
    let second = svc
        .create_from_booking(create_req(second_booking.id))
        .await
        .unwrap();

    let orders: Vec<work_order::Model> = svc.list_work_orders().await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].id, second.id);
    assert_eq!(orders[1].id, first.id);
}
