use utoipa::OpenApi;

use crate::errors::ErrorResponse;
use crate::services::totals::TotalsSummary;
use crate::services::work_orders::{
    AddMaterialItemRequest, AddPaymentRequest, AddWorkItemRequest, CreateWorkOrderRequest,
    SetStatusRequest,
};

/// OpenAPI document for the work-order surface, served at
/// `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Auto Shop API",
        description = "Work-order management for an auto service shop: bookings become work orders, work orders accumulate labor, materials and payments, and every mutation leaves an audit record."
    ),
    paths(
        crate::handlers::work_orders::create_work_order,
        crate::handlers::work_orders::list_work_orders,
        crate::handlers::work_orders::get_work_order,
        crate::handlers::work_orders::get_work_order_full,
        crate::handlers::work_orders::set_work_order_status,
        crate::handlers::work_orders::add_work_item,
        crate::handlers::work_orders::add_material_item,
        crate::handlers::work_orders::add_payment,
    ),
    components(schemas(
        CreateWorkOrderRequest,
        SetStatusRequest,
        AddWorkItemRequest,
        AddMaterialItemRequest,
        AddPaymentRequest,
        TotalsSummary,
        ErrorResponse,
    )),
    tags((name = "work-orders", description = "Work-order lifecycle"))
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_builds_and_lists_paths() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();
        let paths = json["paths"].as_object().unwrap();
        assert!(paths.contains_key("/api/work-orders"));
        assert!(paths.contains_key("/api/work-orders/{id}/payments"));
    }
}
