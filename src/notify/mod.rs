//! Notification collaborator boundary. Rendering and transport of the
//! actual emails live outside this system; the trait below is the shape the
//! core depends on, and every call site treats delivery as best-effort.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::models::Reservation;
use crate::db::DatabaseError;
use crate::scheduling::ports::{
    BusinessDirectory, ServiceCatalog, SpecialistDirectory, UserDirectory,
};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),

    #[error("Notification timed out")]
    Timeout,
}

/// Fully-populated reservation view handed to the notification collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationView {
    pub reservation_id: Uuid,
    pub client_name: String,
    pub client_email: String,
    pub specialist_name: String,
    pub service_name: String,
    pub business_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub end_time: OffsetDateTime,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn reservation_created(&self, view: &ReservationView) -> Result<(), NotifyError>;
    async fn reservation_confirmed(&self, view: &ReservationView) -> Result<(), NotifyError>;
    async fn reservation_cancelled(&self, view: &ReservationView) -> Result<(), NotifyError>;
    async fn reservation_reminder(&self, view: &ReservationView) -> Result<(), NotifyError>;
}

/// Default collaborator: structured log lines instead of outbound mail.
pub struct LogNotifier;

impl LogNotifier {
    fn emit(&self, event: &str, view: &ReservationView) -> Result<(), NotifyError> {
        info!(
            event,
            reservation_id = %view.reservation_id,
            client = %view.client_email,
            specialist = %view.specialist_name,
            service = %view.service_name,
            start = %view.start_time,
            "reservation notification"
        );
        Ok(())
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn reservation_created(&self, view: &ReservationView) -> Result<(), NotifyError> {
        self.emit("reservation_created", view)
    }

    async fn reservation_confirmed(&self, view: &ReservationView) -> Result<(), NotifyError> {
        self.emit("reservation_confirmed", view)
    }

    async fn reservation_cancelled(&self, view: &ReservationView) -> Result<(), NotifyError> {
        self.emit("reservation_cancelled", view)
    }

    async fn reservation_reminder(&self, view: &ReservationView) -> Result<(), NotifyError> {
        self.emit("reservation_reminder", view)
    }
}

/// Resolve the referents of a reservation into a notification view. A
/// reservation is a join record; any referent may have vanished, in which
/// case the caller's best-effort path swallows the miss.
pub async fn reservation_view(
    reservation: &Reservation,
    users: &Arc<dyn UserDirectory>,
    specialists: &Arc<dyn SpecialistDirectory>,
    services: &Arc<dyn ServiceCatalog>,
    businesses: &Arc<dyn BusinessDirectory>,
) -> Result<ReservationView, DatabaseError> {
    let client = users
        .user(reservation.client_id)
        .await?
        .ok_or(DatabaseError::NotFound)?;
    let specialist = specialists
        .specialist(reservation.specialist_id)
        .await?
        .ok_or(DatabaseError::NotFound)?;
    let service = services
        .service(reservation.service_id)
        .await?
        .ok_or(DatabaseError::NotFound)?;
    let business = businesses
        .business(reservation.business_id)
        .await?
        .ok_or(DatabaseError::NotFound)?;

    Ok(ReservationView {
        reservation_id: reservation.id,
        client_name: client.display_name,
        client_email: client.email,
        specialist_name: specialist.specialist.display_name,
        service_name: service.name,
        business_name: business.name,
        start_time: reservation.start_time,
        end_time: reservation.end_time,
    })
}

/// Run a delivery attempt with a bounded timeout and at most one retry, then
/// drop and log. Returns whether a delivery attempt succeeded. Failure here
/// must never propagate into the reservation mutation that triggered it.
pub async fn deliver_best_effort<F, Fut>(event: &str, timeout: Duration, attempt: F) -> bool
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<(), NotifyError>>,
{
    for try_no in 1..=2u8 {
        match tokio::time::timeout(timeout, attempt()).await {
            Ok(Ok(())) => return true,
            Ok(Err(err)) => {
                warn!(event, try_no, error = %err, "notification delivery failed");
            }
            Err(_) => {
                warn!(event, try_no, "notification delivery timed out");
            }
        }
    }
    false
}
