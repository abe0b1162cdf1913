use axum::{extract::State, Json};

use crate::app_state::AppState;
use crate::scheduling::reminder::SweepReport;

/// Out-of-band reminder sweep trigger, for operations and testing.
pub async fn run_reminder_sweep(State(state): State<AppState>) -> Json<SweepReport> {
    Json(state.reminders.run_sweep().await)
}
