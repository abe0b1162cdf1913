#![allow(dead_code)]

//! In-memory fakes for the scheduling ports, so the core runs under test
//! without Postgres or an HTTP harness.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use time::macros::time;
use time::{OffsetDateTime, Time};
use uuid::Uuid;

use reserva::db::models::{
    Business, DayOfWeek, Reservation, ReservationStatus, ServiceOffering, Specialist, User,
    UserRole, WeeklyAvailabilityRule,
};
use reserva::db::DatabaseError;
use reserva::notify::{Notifier, NotifyError, ReservationView};
use reserva::scheduling::ports::{
    BusinessDirectory, Clock, ReservationStore, ServiceCatalog, SpecialistDirectory,
    SpecialistProfile, UserDirectory,
};
use reserva::scheduling::{AvailabilityEngine, ReminderScheduler, ReservationService};

pub const NOTIFY_TIMEOUT: StdDuration = StdDuration::from_millis(250);

pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now_utc(&self) -> OffsetDateTime {
        self.0
    }
}

#[derive(Default)]
pub struct InMemoryDirectory {
    pub specialists: Mutex<HashMap<Uuid, SpecialistProfile>>,
    pub services: Mutex<HashMap<Uuid, ServiceOffering>>,
    pub businesses: Mutex<HashMap<Uuid, Business>>,
    pub users: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl SpecialistDirectory for InMemoryDirectory {
    async fn specialist(&self, id: Uuid) -> Result<Option<SpecialistProfile>, DatabaseError> {
        Ok(self.specialists.lock().unwrap().get(&id).cloned())
    }
}

#[async_trait]
impl ServiceCatalog for InMemoryDirectory {
    async fn service(&self, id: Uuid) -> Result<Option<ServiceOffering>, DatabaseError> {
        Ok(self.services.lock().unwrap().get(&id).cloned())
    }
}

#[async_trait]
impl BusinessDirectory for InMemoryDirectory {
    async fn business(&self, id: Uuid) -> Result<Option<Business>, DatabaseError> {
        Ok(self.businesses.lock().unwrap().get(&id).cloned())
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }
}

/// Vec-backed reservation store mirroring the Postgres schema's
/// no_active_overlap exclusion constraint. With `racy` set, the overlap
/// query pretends to see nothing, simulating a lost check-then-insert race
/// so the constraint path can be exercised.
#[derive(Default)]
pub struct InMemoryReservationStore {
    pub rows: Mutex<Vec<Reservation>>,
    pub racy: AtomicBool,
}

fn overlaps(a: &Reservation, start: OffsetDateTime, end: OffsetDateTime) -> bool {
    a.start_time < end && start < a.end_time
}

#[async_trait]
impl ReservationStore for InMemoryReservationStore {
    async fn insert(&self, reservation: Reservation) -> Result<Reservation, DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        if reservation.status.is_active()
            && rows.iter().any(|r| {
                r.specialist_id == reservation.specialist_id
                    && r.status.is_active()
                    && overlaps(r, reservation.start_time, reservation.end_time)
            })
        {
            return Err(DatabaseError::Duplicate);
        }
        rows.push(reservation.clone());
        Ok(reservation)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Reservation>, DatabaseError> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn active_for_specialist_between(
        &self,
        specialist_id: Uuid,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<Reservation>, DatabaseError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                r.specialist_id == specialist_id
                    && r.status.is_active()
                    && r.start_time >= from
                    && r.start_time < to
            })
            .cloned()
            .collect())
    }

    async fn active_overlapping(
        &self,
        specialist_id: Uuid,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<Reservation>, DatabaseError> {
        if self.racy.load(Ordering::SeqCst) {
            return Ok(Vec::new());
        }
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                r.specialist_id == specialist_id && r.status.is_active() && overlaps(r, start, end)
            })
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ReservationStatus,
        cancellation_reason: Option<String>,
    ) -> Result<Reservation, DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(DatabaseError::NotFound)?;
        row.status = status;
        if cancellation_reason.is_some() {
            row.cancellation_reason = cancellation_reason;
        }
        Ok(row.clone())
    }

    async fn confirmed_without_reminder_between(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<Reservation>, DatabaseError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| {
                r.status == ReservationStatus::Confirmed
                    && !r.reminder_sent
                    && r.start_time >= from
                    && r.start_time < to
            })
            .cloned()
            .collect())
    }

    async fn mark_reminder_sent(&self, id: Uuid) -> Result<(), DatabaseError> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(DatabaseError::NotFound)?;
        row.reminder_sent = true;
        Ok(())
    }
}

/// Records every delivered event; configurable to fail whole event kinds or
/// the reminder for specific reservations.
#[derive(Default)]
pub struct RecordingNotifier {
    pub events: Mutex<Vec<(String, Uuid)>>,
    pub fail_events: Mutex<HashSet<String>>,
    pub fail_reminders_for: Mutex<HashSet<Uuid>>,
}

impl RecordingNotifier {
    fn record(&self, event: &str, view: &ReservationView) -> Result<(), NotifyError> {
        if self.fail_events.lock().unwrap().contains(event) {
            return Err(NotifyError::Delivery(format!("{event} rejected")));
        }
        if event == "reminder"
            && self
                .fail_reminders_for
                .lock()
                .unwrap()
                .contains(&view.reservation_id)
        {
            return Err(NotifyError::Delivery("reminder rejected".into()));
        }
        self.events
            .lock()
            .unwrap()
            .push((event.to_string(), view.reservation_id));
        Ok(())
    }

    pub fn count(&self, event: &str) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(e, _)| e == event)
            .count()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn reservation_created(&self, view: &ReservationView) -> Result<(), NotifyError> {
        self.record("created", view)
    }

    async fn reservation_confirmed(&self, view: &ReservationView) -> Result<(), NotifyError> {
        self.record("confirmed", view)
    }

    async fn reservation_cancelled(&self, view: &ReservationView) -> Result<(), NotifyError> {
        self.record("cancelled", view)
    }

    async fn reservation_reminder(&self, view: &ReservationView) -> Result<(), NotifyError> {
        self.record("reminder", view)
    }
}

/// One business with one specialist (Monday 09:00-17:00), one 60-minute
/// service, and the cast of actors the authorization matrix needs.
pub struct TestWorld {
    pub dir: Arc<InMemoryDirectory>,
    pub store: Arc<InMemoryReservationStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub business_id: Uuid,
    pub specialist_id: Uuid,
    pub specialist_user_id: Uuid,
    pub service_id: Uuid,
    pub client_id: Uuid,
    pub admin_id: Uuid,
    pub stranger_id: Uuid,
}

impl TestWorld {
    pub fn new() -> Self {
        let now = OffsetDateTime::UNIX_EPOCH;
        let dir = Arc::new(InMemoryDirectory::default());

        let business_id = Uuid::new_v4();
        let specialist_id = Uuid::new_v4();
        let specialist_user_id = Uuid::new_v4();
        let service_id = Uuid::new_v4();
        let client_id = Uuid::new_v4();
        let admin_id = Uuid::new_v4();
        let stranger_id = Uuid::new_v4();
        let owner_id = Uuid::new_v4();

        {
            let mut users = dir.users.lock().unwrap();
            for (id, role, email) in [
                (client_id, UserRole::Client, "client@example.com"),
                (admin_id, UserRole::Admin, "admin@example.com"),
                (stranger_id, UserRole::Client, "stranger@example.com"),
                (specialist_user_id, UserRole::Specialist, "spec@example.com"),
                (owner_id, UserRole::BusinessOwner, "owner@example.com"),
            ] {
                users.insert(id, make_user(id, role, email, now));
            }
        }

        dir.businesses.lock().unwrap().insert(
            business_id,
            Business {
                id: business_id,
                owner_user_id: owner_id,
                name: "Glow Studio".into(),
                is_active: true,
                created_at: now,
                updated_at: now,
            },
        );

        dir.specialists.lock().unwrap().insert(
            specialist_id,
            SpecialistProfile {
                specialist: Specialist {
                    id: specialist_id,
                    business_id,
                    user_id: Some(specialist_user_id),
                    display_name: "Maya".into(),
                    is_active: true,
                    created_at: now,
                    updated_at: now,
                },
                weekly_availability: vec![make_rule(
                    specialist_id,
                    DayOfWeek::Monday,
                    time!(09:00),
                    time!(17:00),
                    true,
                    now,
                )],
                providable_service_ids: Vec::new(),
            },
        );

        dir.services.lock().unwrap().insert(
            service_id,
            make_service(service_id, business_id, 60, now),
        );

        Self {
            dir,
            store: Arc::new(InMemoryReservationStore::default()),
            notifier: Arc::new(RecordingNotifier::default()),
            business_id,
            specialist_id,
            specialist_user_id,
            service_id,
            client_id,
            admin_id,
            stranger_id,
        }
    }

    pub fn availability_engine(&self, clock: Arc<dyn Clock>) -> AvailabilityEngine {
        AvailabilityEngine::new(
            self.dir.clone(),
            self.dir.clone(),
            self.store.clone(),
            clock,
            60,
        )
    }

    pub fn reservation_service(&self, clock: Arc<dyn Clock>, strict: bool) -> ReservationService {
        ReservationService::new(
            self.dir.clone(),
            self.dir.clone(),
            self.dir.clone(),
            self.dir.clone(),
            self.store.clone(),
            self.notifier.clone(),
            clock,
            strict,
            NOTIFY_TIMEOUT,
        )
    }

    pub fn reminder_scheduler(&self, clock: Arc<dyn Clock>) -> Arc<ReminderScheduler> {
        Arc::new(ReminderScheduler::new(
            self.store.clone(),
            self.dir.clone(),
            self.dir.clone(),
            self.dir.clone(),
            self.dir.clone(),
            self.notifier.clone(),
            clock,
            24,
            NOTIFY_TIMEOUT,
        ))
    }

    /// Seed a reservation row directly, bypassing the conflict guard.
    pub fn seed_reservation(
        &self,
        start: OffsetDateTime,
        end: OffsetDateTime,
        status: ReservationStatus,
    ) -> Reservation {
        let row = Reservation {
            id: Uuid::new_v4(),
            client_id: self.client_id,
            business_id: self.business_id,
            specialist_id: self.specialist_id,
            service_id: self.service_id,
            start_time: start,
            end_time: end,
            status,
            cancellation_reason: None,
            notes: None,
            reminder_sent: false,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        self.store.rows.lock().unwrap().push(row.clone());
        row
    }
}

pub fn make_user(id: Uuid, role: UserRole, email: &str, now: OffsetDateTime) -> User {
    User {
        id,
        email: email.into(),
        display_name: email.split('@').next().unwrap_or("user").into(),
        role,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

pub fn make_rule(
    specialist_id: Uuid,
    day_of_week: DayOfWeek,
    start_time: Time,
    end_time: Time,
    is_available: bool,
    now: OffsetDateTime,
) -> WeeklyAvailabilityRule {
    WeeklyAvailabilityRule {
        id: Uuid::new_v4(),
        specialist_id,
        day_of_week,
        start_time,
        end_time,
        is_available,
        created_at: now,
    }
}

pub fn make_service(
    id: Uuid,
    business_id: Uuid,
    duration_minutes: i32,
    now: OffsetDateTime,
) -> ServiceOffering {
    ServiceOffering {
        id,
        business_id,
        name: "Deep tissue massage".into(),
        duration_minutes,
        price_cents: 7500,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}
