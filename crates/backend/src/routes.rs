use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::{handlers, system};

/// Бизнес-роуты: чтение для любого вошедшего пользователя, изменение для всех ролей, кроме наблюдателя
fn configure_business_routes() -> Router {
    Router::new()
        // ========================================
        // A001 FACTORY
        // ========================================
        .route(
            "/api/factory",
            get(handlers::a001_factory::list_all).post(handlers::a001_factory::upsert),
        )
        .route(
            "/api/factory/testdata",
            post(handlers::a001_factory::insert_test_data),
        )
        .route(
            "/api/factory/:id",
            get(handlers::a001_factory::get_by_id).delete(handlers::a001_factory::delete),
        )
        // ========================================
        // A002 EQUIPMENT
        // ========================================
        .route(
            "/api/equipment",
            get(handlers::a002_equipment::list_paginated).post(handlers::a002_equipment::upsert),
        )
        .route("/api/equipment/all", get(handlers::a002_equipment::list_all))
        .route(
            "/api/equipment/testdata",
            post(handlers::a002_equipment::insert_test_data),
        )
        .route(
            "/api/equipment/:id",
            get(handlers::a002_equipment::get_by_id).delete(handlers::a002_equipment::delete),
        )
        // ========================================
        // A003 CHECKLIST TEMPLATE
        // ========================================
        .route(
            "/api/checklist_template",
            get(handlers::a003_checklist_template::list_all)
                .post(handlers::a003_checklist_template::upsert),
        )
        .route(
            "/api/checklist_template/testdata",
            post(handlers::a003_checklist_template::insert_test_data),
        )
        .route(
            "/api/checklist_template/:id",
            get(handlers::a003_checklist_template::get_by_id)
                .delete(handlers::a003_checklist_template::delete),
        )
        .route(
            "/api/checklist_template/:id/new-version",
            post(handlers::a003_checklist_template::new_version),
        )
        .route(
            "/api/checklist_template/:id/status",
            post(handlers::a003_checklist_template::change_status),
        )
        // ========================================
        // A004 PM PLAN
        // ========================================
        .route(
            "/api/pm_plan",
            get(handlers::a004_pm_plan::list_all).post(handlers::a004_pm_plan::upsert),
        )
        .route(
            "/api/pm_plan/testdata",
            post(handlers::a004_pm_plan::insert_test_data),
        )
        .route(
            "/api/pm_plan/:id",
            get(handlers::a004_pm_plan::get_by_id).delete(handlers::a004_pm_plan::delete),
        )
        .route(
            "/api/pm_plan/:id/status",
            post(handlers::a004_pm_plan::change_status),
        )
        .route(
            "/api/pm_plan/:id/generate",
            post(handlers::a004_pm_plan::generate),
        )
        // ========================================
        // A005 WORK ORDER
        // ========================================
        .route(
            "/api/work_order",
            get(handlers::a005_work_order::list).post(handlers::a005_work_order::upsert),
        )
        .route(
            "/api/work_order/export",
            get(handlers::a005_work_order::export_csv),
        )
        .route(
            "/api/work_order/testdata",
            post(handlers::a005_work_order::insert_test_data),
        )
        .route(
            "/api/work_order/:id",
            get(handlers::a005_work_order::get_by_id).delete(handlers::a005_work_order::delete),
        )
        .route(
            "/api/work_order/:id/status",
            post(handlers::a005_work_order::change_status),
        )
        .route(
            "/api/work_order/:id/results",
            post(handlers::a005_work_order::record_results),
        )
        // ========================================
        // A006 CORRECTIVE MAINTENANCE
        // ========================================
        .route(
            "/api/corrective_maintenance",
            get(handlers::a006_corrective_maintenance::list)
                .post(handlers::a006_corrective_maintenance::upsert),
        )
        .route(
            "/api/corrective_maintenance/export",
            get(handlers::a006_corrective_maintenance::export_csv),
        )
        .route(
            "/api/corrective_maintenance/testdata",
            post(handlers::a006_corrective_maintenance::insert_test_data),
        )
        .route(
            "/api/corrective_maintenance/:id",
            get(handlers::a006_corrective_maintenance::get_by_id)
                .delete(handlers::a006_corrective_maintenance::delete),
        )
        .route(
            "/api/corrective_maintenance/:id/status",
            post(handlers::a006_corrective_maintenance::change_status),
        )
        // ========================================
        // D100 OVERVIEW
        // ========================================
        .route(
            "/api/d100/overview",
            get(handlers::d100_overview::get_overview),
        )
        .route_layer(middleware::from_fn(
            system::auth::middleware::require_editor,
        ))
}

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    system::api::routes::configure_system_routes().merge(configure_business_routes())
}
