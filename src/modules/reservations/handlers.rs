use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::models::{NewReservation, Reservation, UpdateReservationStatus};
use crate::error::{AppError, AppResult};

pub async fn create_reservation(
    State(state): State<AppState>,
    Json(payload): Json<NewReservation>,
) -> AppResult<(StatusCode, Json<Reservation>)> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let reservation = state.reservations.create_reservation(payload).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

pub async fn update_reservation_status(
    State(state): State<AppState>,
    Path(reservation_id): Path<Uuid>,
    Json(payload): Json<UpdateReservationStatus>,
) -> AppResult<Json<Reservation>> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let reservation = state
        .reservations
        .update_status(
            reservation_id,
            payload.acting_user_id,
            payload.status,
            payload.cancellation_reason,
        )
        .await?;

    Ok(Json(reservation))
}
