use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use super::handlers;
use crate::handlers as business;
use crate::system::auth;

/// Конфигурация системных роутов приложения
pub fn configure_system_routes() -> Router {
    Router::new()
        // ========================================
        // HEALTH CHECK
        // ========================================
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM AUTH ROUTES (PUBLIC)
        // ========================================
        .route("/api/system/auth/login", post(handlers::auth::login))
        .route("/api/system/auth/refresh", post(handlers::auth::refresh))
        .route("/api/system/auth/logout", post(handlers::auth::logout))
        // System auth routes (protected)
        .route(
            "/api/system/auth/me",
            get(handlers::auth::current_user)
                .layer(middleware::from_fn(auth::middleware::require_auth)),
        )
        // ========================================
        // SYSTEM USERS MANAGEMENT (admin only)
        // ========================================
        .route(
            "/api/system/users",
            get(handlers::users::list)
                .post(handlers::users::create)
                .layer(middleware::from_fn(auth::middleware::require_admin)),
        )
        // Исполнители нужны любому пользователю, поэтому только require_auth
        .route(
            "/api/system/users/assignees",
            get(handlers::users::assignees)
                .layer(middleware::from_fn(auth::middleware::require_auth)),
        )
        .route(
            "/api/system/users/:id",
            get(handlers::users::get_by_id)
                .put(handlers::users::update)
                .delete(handlers::users::delete)
                .layer(middleware::from_fn(auth::middleware::require_admin)),
        )
        .route(
            "/api/system/users/:id/change-password",
            post(handlers::users::change_password)
                .layer(middleware::from_fn(auth::middleware::require_auth)),
        )
        // ========================================
        // PM SCHEDULER
        // ========================================
        .route(
            "/api/system/scheduler",
            get(handlers::scheduler::get_status)
                .layer(middleware::from_fn(auth::middleware::require_auth)),
        )
        .route(
            "/api/system/scheduler/run",
            post(handlers::scheduler::run_now)
                .layer(middleware::from_fn(auth::middleware::require_admin)),
        )
        // ========================================
        // SYSTEM LOG
        // ========================================
        // Очистка только для администратора, чтение и запись для всех вошедших
        .route(
            "/api/logs",
            delete(business::logs::clear_all)
                .layer(middleware::from_fn(auth::middleware::require_admin))
                .get(business::logs::list_all)
                .post(business::logs::create)
                .layer(middleware::from_fn(auth::middleware::require_auth)),
        )
}
