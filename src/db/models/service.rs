use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::OffsetDateTime;
use validator::Validate;

/// A bookable, time-bound offering of a business. `duration_minutes` drives
/// slot length and a reservation's computed end time; it is read once at
/// reservation creation and never retroactively applied.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct ServiceOffering {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    pub duration_minutes: i32,
    pub price_cents: i64,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewServiceOffering {
    pub business_id: Uuid,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 5, max = 480, message = "Duration must be 5-480 minutes"))]
    pub duration_minutes: i32,
    #[validate(range(min = 0))]
    pub price_cents: i64,
}
