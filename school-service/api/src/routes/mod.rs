//! Route assembly, grounded on
//! `services/inventory_service/api/src/routes/mod.rs`'s public/protected
//! split: a router with no auth layer merged with one wrapped in
//! `auth_middleware`, rather than per-route layering.

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use shared_auth::auth_middleware;
use shared_rate_limit::{rate_limit_middleware, RateLimiter};
use tower_http::cors::CorsLayer;

use crate::handlers::{
    attendance, auth, display_token, live_feed, notification, platform_admin, records,
    school_admin, schedule,
};
use crate::state::AppState;

fn auth_protected_routes() -> Router<AppState> {
    Router::new()
        .route("/change-password", post(auth::change_password))
        .route("/me", get(auth::me))
}

fn schedule_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(schedule::list).post(schedule::create))
        .route("/active", get(schedule::active))
        .route("/:id", put(schedule::update).delete(schedule::delete))
        .route("/:id/default", post(schedule::set_default))
}

fn display_token_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(display_token::list).post(display_token::create))
        .route("/:id", delete(display_token::revoke))
        .route("/:id/regenerate", post(display_token::regenerate))
}

fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notification::list))
        .route("/:id/read", post(notification::mark_read))
        .route("/read-all", post(notification::mark_all_read))
}

fn fcm_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(notification::list_tokens).post(notification::register_token).delete(notification::delete_token))
}

fn school_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/school", get(school_admin::get_school).put(school_admin::update_school))
        .route("/users", get(school_admin::list_users).post(school_admin::create_user))
        .route("/users/:id", put(school_admin::update_user))
        .route("/classes", get(school_admin::list_classes).post(school_admin::create_class))
        .route("/classes/:id", put(school_admin::update_class).delete(school_admin::delete_class))
        .route("/classes/:class_id/students", get(school_admin::list_students_by_class))
        .route("/students", post(school_admin::create_student))
        .route("/students/:id", put(school_admin::update_student))
        .route("/parent-links", post(school_admin::link_parent))
        .route("/parent-links/:parent_user_id/:student_id", delete(school_admin::unlink_parent))
}

fn platform_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/schools", get(platform_admin::list_schools).post(platform_admin::create_school))
        .route("/schools/:id", delete(platform_admin::delete_school))
        .route("/schools/:id/active", post(platform_admin::set_school_active))
        .route("/schools/:school_id/devices", get(school_admin::list_devices).post(school_admin::create_device))
        .route("/devices/:device_code/rotate", post(school_admin::rotate_device_key))
}

fn records_routes() -> Router<AppState> {
    Router::new()
        .route("/students/:student_id/grades", get(records::list_grades).post(records::create_grade))
        .route("/students/:student_id/homeroom-notes", get(records::list_homeroom_notes).post(records::create_homeroom_note))
        .route("/students/:student_id/counseling-notes", get(records::list_counseling_notes).post(records::create_counseling_note))
        .route("/students/:student_id/permits", get(records::list_permits).post(records::create_permit))
        .route("/students/:student_id/permits/:id", put(records::update_permit_status))
        .route("/students/:student_id/violations", get(records::list_violations).post(records::create_violation))
        .route("/students/:student_id/achievements", get(records::list_achievements).post(records::create_achievement))
}

pub fn create_router(state: AppState, login_limiter: Arc<dyn RateLimiter>) -> Router {
    let public_routes = Router::new()
        .nest("/api/v1/auth", Router::new()
            .route("/login", post(auth::login))
            .route_layer(axum::middleware::from_fn_with_state(login_limiter, rate_limit_middleware))
            .route("/refresh", post(auth::refresh)))
        .route("/api/v1/attendance/rfid", post(attendance::rfid))
        .route("/api/v1/display/authenticate", post(display_token::authenticate))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .nest("/api/v1/auth", auth_protected_routes())
        .route("/api/v1/attendance/manual", post(attendance::manual))
        .nest("/api/v1/schedules", schedule_routes())
        .nest("/api/v1/display-tokens", display_token_routes())
        .nest("/api/v1/notifications", notification_routes())
        .nest("/api/v1/fcm/tokens", fcm_routes())
        .nest("/api/v1/school-admin", school_admin_routes())
        .nest("/api/v1/platform-admin", platform_admin_routes())
        .nest("/api/v1/records", records_routes())
        .route("/api/v1/attendance/live", get(live_feed::upgrade))
        .route_layer(axum::middleware::from_fn_with_state(state.clone(), auth_middleware::<AppState>));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
