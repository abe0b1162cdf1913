//! Boundary traits the scheduling core depends on. Postgres repositories
//! implement them in production; tests substitute in-memory fakes so the
//! core runs without a database or HTTP harness.

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::models::{
    Business, Reservation, ReservationStatus, ServiceOffering, Specialist, User,
    WeeklyAvailabilityRule,
};
use crate::db::DatabaseError;

/// Everything the core needs to know about a specialist in one read.
#[derive(Debug, Clone)]
pub struct SpecialistProfile {
    pub specialist: Specialist,
    pub weekly_availability: Vec<WeeklyAvailabilityRule>,
    /// Empty set means "no restriction declared".
    pub providable_service_ids: Vec<Uuid>,
}

#[async_trait]
pub trait SpecialistDirectory: Send + Sync {
    async fn specialist(&self, id: Uuid) -> Result<Option<SpecialistProfile>, DatabaseError>;
}

#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    async fn service(&self, id: Uuid) -> Result<Option<ServiceOffering>, DatabaseError>;
}

#[async_trait]
pub trait BusinessDirectory: Send + Sync {
    async fn business(&self, id: Uuid) -> Result<Option<Business>, DatabaseError>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;
}

#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn insert(&self, reservation: Reservation) -> Result<Reservation, DatabaseError>;

    async fn find(&self, id: Uuid) -> Result<Option<Reservation>, DatabaseError>;

    /// Active (pending/confirmed) reservations for a specialist whose start
    /// falls within `[from, to)`.
    async fn active_for_specialist_between(
        &self,
        specialist_id: Uuid,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<Reservation>, DatabaseError>;

    /// Active reservations for a specialist whose `[start, end)` interval
    /// intersects the given window. Callers still re-apply the overlap
    /// predicate on the rows returned.
    async fn active_overlapping(
        &self,
        specialist_id: Uuid,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<Reservation>, DatabaseError>;

    async fn update_status(
        &self,
        id: Uuid,
        status: ReservationStatus,
        cancellation_reason: Option<String>,
    ) -> Result<Reservation, DatabaseError>;

    /// Confirmed reservations with no reminder sent, starting in `[from, to)`.
    async fn confirmed_without_reminder_between(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<Reservation>, DatabaseError>;

    async fn mark_reminder_sent(&self, id: Uuid) -> Result<(), DatabaseError>;
}

/// All "now" references go through here; tests pin the instant.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> OffsetDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
