use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use serde::Serialize;
use time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::ports::{
    BusinessDirectory, Clock, ReservationStore, ServiceCatalog, SpecialistDirectory,
    UserDirectory,
};
use crate::notify::{deliver_best_effort, reservation_view, Notifier};

/// Window width equals the tick interval, so a reliably-firing sweep visits
/// each reservation exactly once. A missed tick means a missed reminder;
/// that loss is accepted, not retried.
const TICK: StdDuration = StdDuration::from_secs(3600);

#[derive(Debug, Default, Clone, Serialize)]
pub struct SweepReport {
    pub due: usize,
    pub sent: usize,
    pub failed: usize,
    /// True when a previous sweep was still in flight and this one bailed.
    pub skipped: bool,
}

/// Hourly reminder sweep over confirmed, un-reminded reservations starting
/// `lead_hours` from now. Owned resource with an idempotent `start`/`stop`
/// lifecycle; `run_sweep` doubles as the manual trigger.
pub struct ReminderScheduler {
    reservations: Arc<dyn ReservationStore>,
    users: Arc<dyn UserDirectory>,
    specialists: Arc<dyn SpecialistDirectory>,
    services: Arc<dyn ServiceCatalog>,
    businesses: Arc<dyn BusinessDirectory>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    lead_hours: i64,
    notify_timeout: StdDuration,
    sweep_in_flight: AtomicBool,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl ReminderScheduler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        reservations: Arc<dyn ReservationStore>,
        users: Arc<dyn UserDirectory>,
        specialists: Arc<dyn SpecialistDirectory>,
        services: Arc<dyn ServiceCatalog>,
        businesses: Arc<dyn BusinessDirectory>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        lead_hours: i64,
        notify_timeout: StdDuration,
    ) -> Self {
        Self {
            reservations,
            users,
            specialists,
            services,
            businesses,
            notifier,
            clock,
            lead_hours,
            notify_timeout,
            sweep_in_flight: AtomicBool::new(false),
            handle: Mutex::new(None),
        }
    }

    /// Spawn the hourly tick, aligned to the top of the hour. Calling start
    /// on a running scheduler is a no-op.
    pub fn start(self: &Arc<Self>) {
        let mut handle = self.handle.lock().expect("scheduler handle lock poisoned");
        if handle.is_some() {
            return;
        }

        let scheduler = Arc::clone(self);
        let now = scheduler.clock.now_utc();
        let into_hour = u64::from(now.minute()) * 60 + u64::from(now.second());
        let until_next_hour = StdDuration::from_secs(3600 - into_hour.min(3599));

        *handle = Some(tokio::spawn(async move {
            let mut ticks =
                tokio::time::interval_at(tokio::time::Instant::now() + until_next_hour, TICK);
            loop {
                ticks.tick().await;
                scheduler.run_sweep().await;
            }
        }));
        info!(delay_secs = until_next_hour.as_secs(), "reminder scheduler started");
    }

    pub fn stop(&self) {
        if let Some(handle) = self
            .handle
            .lock()
            .expect("scheduler handle lock poisoned")
            .take()
        {
            handle.abort();
            info!("reminder scheduler stopped");
        }
    }

    /// One pass over the reminder window. One bad record never halts the
    /// batch; `reminder_sent` flips only after a delivery succeeded, so an
    /// immediate second run finds nothing left to do.
    pub async fn run_sweep(&self) -> SweepReport {
        if self.sweep_in_flight.swap(true, Ordering::SeqCst) {
            warn!("reminder sweep still running, skipping this tick");
            return SweepReport {
                skipped: true,
                ..SweepReport::default()
            };
        }
        let report = self.sweep().await;
        self.sweep_in_flight.store(false, Ordering::SeqCst);
        report
    }

    async fn sweep(&self) -> SweepReport {
        let now = self.clock.now_utc();
        let from = now + Duration::hours(self.lead_hours);
        let to = from + Duration::hours(1);

        let due = match self
            .reservations
            .confirmed_without_reminder_between(from, to)
            .await
        {
            Ok(due) => due,
            Err(err) => {
                error!(error = %err, "reminder sweep query failed");
                return SweepReport::default();
            }
        };

        let mut report = SweepReport {
            due: due.len(),
            ..SweepReport::default()
        };

        for reservation in due {
            let view = match reservation_view(
                &reservation,
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
                        "skipping reminder, referent lookup failed"
                    );
                    report.failed += 1;
                    continue;
                }
            };

            let notifier = Arc::clone(&self.notifier);
            let delivered =
                deliver_best_effort("reservation_reminder", self.notify_timeout, || {
                    let notifier = Arc::clone(&notifier);
                    let view = view.clone();
                    async move { notifier.reservation_reminder(&view).await }
                })
                .await;

            if delivered {
                match self.reservations.mark_reminder_sent(reservation.id).await {
                    Ok(()) => report.sent += 1,
                    Err(err) => {
                        // Delivered but not recorded; the next tick's window
                        // has moved on, so at worst one duplicate reminder.
                        error!(
                            reservation_id = %reservation.id,
                            error = %err,
                            "failed to record reminder_sent"
                        );
                        report.sent += 1;
                    }
                }
            } else {
                report.failed += 1;
            }
        }

        info!(
            due = report.due,
            sent = report.sent,
            failed = report.failed,
            "reminder sweep finished"
        );
        report
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        if let Ok(mut handle) = self.handle.lock() {
            if let Some(handle) = handle.take() {
                handle.abort();
            }
        }
    }
}
