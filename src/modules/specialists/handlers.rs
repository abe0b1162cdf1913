use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::models::{NewWeeklyAvailabilityRule, WeeklyAvailabilityRule};
use crate::error::AppResult;

/// Declare recurring open hours for one weekday. Malformed windows and
/// duplicate weekday rules are rejected at this boundary.
pub async fn add_availability_rule(
    State(state): State<AppState>,
    Path(specialist_id): Path<Uuid>,
    Json(payload): Json<NewWeeklyAvailabilityRule>,
) -> AppResult<(StatusCode, Json<WeeklyAvailabilityRule>)> {
    let rule = state
        .specialists
        .add_availability_rule(specialist_id, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(rule)))
}
