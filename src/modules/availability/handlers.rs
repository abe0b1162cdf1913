use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use time::{format_description::FormatItem, macros::format_description, Date};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::error::{AppError, AppResult};
use crate::scheduling::slots::Slot;

const DATE_FORMAT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// ISO calendar date, interpreted as a UTC day.
    pub date: String,
    pub service_id: Option<Uuid>,
}

pub async fn specialist_availability(
    State(state): State<AppState>,
    Path(specialist_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<Vec<Slot>>> {
    let date = Date::parse(&query.date, DATE_FORMAT).map_err(|_| {
        AppError::BadRequest(format!("invalid date '{}', expected YYYY-MM-DD", query.date))
    })?;

    let slots = state
        .availability
        .available_slots(specialist_id, date, query.service_id)
        .await?;

    Ok(Json(slots))
}
