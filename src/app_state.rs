use std::sync::Arc;

use sqlx::PgPool;

use crate::config;
use crate::db::repositories::SpecialistRepository;
use crate::scheduling::{AvailabilityEngine, ReminderScheduler, ReservationService};

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub env: config::Config,
    pub availability: Arc<AvailabilityEngine>,
    pub reservations: Arc<ReservationService>,
    pub reminders: Arc<ReminderScheduler>,
    pub specialists: Arc<SpecialistRepository>,
}
