use axum::{routing::post, Router};

use super::handlers::add_availability_rule;
use crate::app_state::AppState;

pub fn specialist_routes() -> Router<AppState> {
    Router::new().route(
        "/specialists/:specialist_id/availability-rules",
        post(add_availability_rule),
    )
}
