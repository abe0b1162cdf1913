use axum::{routing::post, Router};

use super::handlers::run_reminder_sweep;
use crate::app_state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/reminders/run", post(run_reminder_sweep))
}
