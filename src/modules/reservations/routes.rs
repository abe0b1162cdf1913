use axum::{
    routing::{patch, post},
    Router,
};

use super::handlers::{create_reservation, update_reservation_status};
use crate::app_state::AppState;

pub fn reservation_routes() -> Router<AppState> {
    Router::new()
        .route("/reservations", post(create_reservation))
        .route(
            "/reservations/:reservation_id/status",
            patch(update_reservation_status),
        )
}
