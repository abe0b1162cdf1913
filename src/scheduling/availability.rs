use std::sync::Arc;

use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime};
use tracing::debug;
use uuid::Uuid;

use super::error::BookingError;
use super::ports::{Clock, ReservationStore, ServiceCatalog, SpecialistDirectory};
use super::slots::{generate_slots, Slot};
use crate::db::models::DayOfWeek;

/// Start and end of a calendar date's UTC day as a half-open instant range.
/// Day boundaries and weekday are both taken in UTC on purpose: date-only
/// inputs are UTC calendar dates, never client-local midnight.
pub fn utc_day_bounds(date: Date) -> (OffsetDateTime, OffsetDateTime) {
    let start = date.midnight().assume_utc();
    (start, start + Duration::days(1))
}

/// Computes the bookable windows of a specialist's day by intersecting the
/// weekly schedule with existing active reservations.
pub struct AvailabilityEngine {
    specialists: Arc<dyn SpecialistDirectory>,
    services: Arc<dyn ServiceCatalog>,
    reservations: Arc<dyn ReservationStore>,
    clock: Arc<dyn Clock>,
    default_slot_minutes: i64,
}

impl AvailabilityEngine {
    pub fn new(
        specialists: Arc<dyn SpecialistDirectory>,
        services: Arc<dyn ServiceCatalog>,
        reservations: Arc<dyn ReservationStore>,
        clock: Arc<dyn Clock>,
        default_slot_minutes: i64,
    ) -> Self {
        Self {
            specialists,
            services,
            reservations,
            clock,
            default_slot_minutes,
        }
    }

    /// Ordered open slots for `specialist_id` on `date`. Slot length comes
    /// from the service when given, otherwise the configured default. An
    /// empty result is an expected outcome (closed day, fully booked, or all
    /// of today's slots already in the past), never an error.
    pub async fn available_slots(
        &self,
        specialist_id: Uuid,
        date: Date,
        service_id: Option<Uuid>,
    ) -> Result<Vec<Slot>, BookingError> {
        let profile = self
            .specialists
            .specialist(specialist_id)
            .await?
            .filter(|p| p.specialist.is_active)
            .ok_or(BookingError::NotFound("specialist"))?;

        let duration_minutes = match service_id {
            Some(id) => {
                let service = self
                    .services
                    .service(id)
                    .await?
                    .ok_or(BookingError::NotFound("service"))?;
                i64::from(service.duration_minutes)
            }
            None => self.default_slot_minutes,
        };

        let weekday: DayOfWeek = date.weekday().into();
        let rule = match profile
            .weekly_availability
            .iter()
            .find(|r| r.day_of_week == weekday && r.is_available)
        {
            Some(rule) => rule,
            // Closed that day.
            None => return Ok(Vec::new()),
        };

        let window_start = PrimitiveDateTime::new(date, rule.start_time).assume_utc();
        let window_end = PrimitiveDateTime::new(date, rule.end_time).assume_utc();

        let mut candidates =
            generate_slots(window_start, window_end, Duration::minutes(duration_minutes));

        let (day_start, day_end) = utc_day_bounds(date);
        let booked = self
            .reservations
            .active_for_specialist_between(specialist_id, day_start, day_end)
            .await?;

        candidates.retain(|slot| {
            !booked
                .iter()
                .any(|r| slot.overlaps(r.start_time, r.end_time))
        });

        // Slots in the past are not offered, but only today is filtered by
        // the current instant; future days never are.
        let now = self.clock.now_utc();
        if date == now.date() {
            candidates.retain(|slot| slot.start_time > now);
        }

        debug!(
            %specialist_id,
            %date,
            booked = booked.len(),
            open = candidates.len(),
            "computed availability"
        );

        Ok(candidates)
    }
}
