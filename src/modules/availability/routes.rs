use axum::{routing::get, Router};

use super::handlers::specialist_availability;
use crate::app_state::AppState;

pub fn availability_routes() -> Router<AppState> {
    Router::new().route(
        "/specialists/:specialist_id/availability",
        get(specialist_availability),
    )
}
