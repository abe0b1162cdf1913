use std::sync::Arc;
use std::time::Duration as StdDuration;

use dashmap::DashMap;
use time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use super::error::BookingError;
use super::overlap::intervals_overlap;
use super::ports::{
    BusinessDirectory, Clock, ReservationStore, ServiceCatalog, SpecialistDirectory,
    UserDirectory,
};
use crate::db::models::{NewReservation, Reservation, ReservationStatus, User, UserRole};
use crate::db::DatabaseError;
use crate::notify::{deliver_best_effort, reservation_view, Notifier};

/// Identity tag of whoever is asking for a status transition, resolved from
/// explicit records rather than ambient request context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    Admin,
    /// The user tied to the reservation's specialist record.
    SpecialistOwner,
    /// The reservation's own client.
    Client,
    Other,
}

/// The authorization matrix for status updates, kept pure so it is testable
/// in isolation. Clients may only cancel their own reservation; the
/// specialist-owner and administrators may set any status.
pub fn can_transition(actor: ActorRole, target: ReservationStatus) -> bool {
    match actor {
        ActorRole::Admin | ActorRole::SpecialistOwner => true,
        ActorRole::Client => matches!(target, ReservationStatus::Cancelled),
        ActorRole::Other => false,
    }
}

pub fn resolve_actor(
    user: &User,
    reservation: &Reservation,
    specialist_user_id: Option<Uuid>,
) -> ActorRole {
    if user.role == UserRole::Admin {
        ActorRole::Admin
    } else if specialist_user_id == Some(user.id) {
        ActorRole::SpecialistOwner
    } else if reservation.client_id == user.id {
        ActorRole::Client
    } else {
        ActorRole::Other
    }
}

enum NotificationKind {
    Created,
    Confirmed,
    Cancelled,
}

/// Creates reservations behind the conflict guard and drives the status
/// state machine.
pub struct ReservationService {
    specialists: Arc<dyn SpecialistDirectory>,
    services: Arc<dyn ServiceCatalog>,
    businesses: Arc<dyn BusinessDirectory>,
    users: Arc<dyn UserDirectory>,
    reservations: Arc<dyn ReservationStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    /// Per-specialist critical section around check-then-insert. The store's
    /// exclusion constraint backstops deployments with more than one
    /// process; both paths surface as `Conflict`.
    booking_locks: DashMap<Uuid, Arc<Mutex<()>>>,
    strict_relationship_checks: bool,
    notify_timeout: StdDuration,
}

impl ReservationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        specialists: Arc<dyn SpecialistDirectory>,
        services: Arc<dyn ServiceCatalog>,
        businesses: Arc<dyn BusinessDirectory>,
        users: Arc<dyn UserDirectory>,
        reservations: Arc<dyn ReservationStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        strict_relationship_checks: bool,
        notify_timeout: StdDuration,
    ) -> Self {
        Self {
            specialists,
            services,
            businesses,
            users,
            reservations,
            notifier,
            clock,
            booking_locks: DashMap::new(),
            strict_relationship_checks,
            notify_timeout,
        }
    }

    /// Sequential hard gates; the first failure wins and nothing is
    /// persisted. On success the reservation lands in `pending` and a
    /// created-notification is attempted without ever failing the call.
    pub async fn create_reservation(
        &self,
        new: NewReservation,
    ) -> Result<Reservation, BookingError> {
        let profile = self
            .specialists
            .specialist(new.specialist_id)
            .await?
            .filter(|p| p.specialist.is_active)
            .ok_or(BookingError::NotFound("specialist"))?;

        let service = self
            .services
            .service(new.service_id)
            .await?
            .filter(|s| s.is_active)
            .ok_or(BookingError::NotFound("service"))?;

        if self.strict_relationship_checks {
            if profile.specialist.business_id != new.business_id {
                return Err(BookingError::InvalidRelationship(
                    "specialist does not belong to this business".into(),
                ));
            }
            if service.business_id != new.business_id {
                return Err(BookingError::InvalidRelationship(
                    "service does not belong to this business".into(),
                ));
            }
            if !profile.providable_service_ids.is_empty()
                && !profile.providable_service_ids.contains(&new.service_id)
            {
                return Err(BookingError::InvalidRelationship(
                    "specialist does not provide this service".into(),
                ));
            }
        }

        let start_time = new.start_time;
        let end_time = start_time + Duration::minutes(i64::from(service.duration_minutes));

        let lock = self
            .booking_locks
            .entry(new.specialist_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let reservation = {
            let _guard = lock.lock().await;

            let existing = self
                .reservations
                .active_overlapping(new.specialist_id, start_time, end_time)
                .await?;
            if existing
                .iter()
                .any(|r| intervals_overlap(start_time, end_time, r.start_time, r.end_time))
            {
                return Err(BookingError::Conflict);
            }

            let now = self.clock.now_utc();
            let row = Reservation {
                id: Uuid::new_v4(),
                client_id: new.client_id,
                business_id: new.business_id,
                specialist_id: new.specialist_id,
                service_id: new.service_id,
                start_time,
                end_time,
                status: ReservationStatus::Pending,
                cancellation_reason: None,
                notes: new.notes,
                reminder_sent: false,
                created_at: now,
                updated_at: now,
            };

            match self.reservations.insert(row).await {
                Ok(r) => r,
                // Constraint violation at insert time is the same conflict,
                // just detected by the other layer of the guard.
                Err(DatabaseError::Duplicate) => return Err(BookingError::Conflict),
                Err(err) => return Err(err.into()),
            }
        };

        info!(
            reservation_id = %reservation.id,
            specialist_id = %reservation.specialist_id,
            start = %reservation.start_time,
            "reservation created"
        );

        self.notify(&reservation, NotificationKind::Created).await;

        Ok(reservation)
    }

    /// Authorization-gated status transition. An unchanged status is a no-op
    /// and fires no notification; `confirmed`/`cancelled` transitions notify
    /// best-effort, `completed`/`no-show` never do.
    pub async fn update_status(
        &self,
        reservation_id: Uuid,
        acting_user_id: Uuid,
        new_status: ReservationStatus,
        cancellation_reason: Option<String>,
    ) -> Result<Reservation, BookingError> {
        let reservation = self
            .reservations
            .find(reservation_id)
            .await?
            .ok_or(BookingError::NotFound("reservation"))?;

        let user = self
            .users
            .user(acting_user_id)
            .await?
            .ok_or(BookingError::Forbidden)?;

        let specialist_user_id = self
            .specialists
            .specialist(reservation.specialist_id)
            .await?
            .and_then(|p| p.specialist.user_id);

        let actor = resolve_actor(&user, &reservation, specialist_user_id);
        if !can_transition(actor, new_status) {
            return Err(BookingError::Forbidden);
        }

        if reservation.status == new_status {
            return Ok(reservation);
        }

        let updated = self
            .reservations
            .update_status(reservation_id, new_status, cancellation_reason)
            .await?;

        info!(
            reservation_id = %updated.id,
            status = ?updated.status,
            "reservation status updated"
        );

        match new_status {
            ReservationStatus::Confirmed => {
                self.notify(&updated, NotificationKind::Confirmed).await;
            }
            ReservationStatus::Cancelled => {
                self.notify(&updated, NotificationKind::Cancelled).await;
            }
            _ => {}
        }

        Ok(updated)
    }

    async fn notify(&self, reservation: &Reservation, kind: NotificationKind) {
        let view = match reservation_view(
            reservation,
            &self.users,
            &self.specialists,
            &self.services,
            &self.businesses,
        )
        .await
        {
            Ok(view) => view,
            Err(err) => {
                warn!(
                    reservation_id = %reservation.id,
                    error = %err,
                    "skipping notification, referent lookup failed"
                );
                return;
            }
        };

        let notifier = Arc::clone(&self.notifier);
        match kind {
            NotificationKind::Created => {
                deliver_best_effort("reservation_created", self.notify_timeout, || {
                    let notifier = Arc::clone(&notifier);
                    let view = view.clone();
                    async move { notifier.reservation_created(&view).await }
                })
                .await;
            }
            NotificationKind::Confirmed => {
                deliver_best_effort("reservation_confirmed", self.notify_timeout, || {
                    let notifier = Arc::clone(&notifier);
                    let view = view.clone();
                    async move { notifier.reservation_confirmed(&view).await }
                })
                .await;
            }
            NotificationKind::Cancelled => {
                deliver_best_effort("reservation_cancelled", self.notify_timeout, || {
                    let notifier = Arc::clone(&notifier);
                    let view = view.clone();
                    async move { notifier.reservation_cancelled(&view).await }
                })
                .await;
            }
        }
    }
}
