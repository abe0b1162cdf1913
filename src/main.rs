use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reserva::app::create_router;
use reserva::app_state::AppState;
use reserva::config;
use reserva::db::repositories::{
    BusinessRepository, ReservationRepository, ServiceRepository, SpecialistRepository,
    UserRepository,
};
use reserva::notify::{LogNotifier, Notifier};
use reserva::scheduling::ports::{
    BusinessDirectory, Clock, ReservationStore, ServiceCatalog, SpecialistDirectory, SystemClock,
    UserDirectory,
};
use reserva::scheduling::{AvailabilityEngine, ReminderScheduler, ReservationService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenv().ok();

    let env = config::init()?.clone();
    let pool = reserva::db::init_pool().await?;

    let specialist_repo = Arc::new(SpecialistRepository::new(pool.clone()));
    let specialists: Arc<dyn SpecialistDirectory> = specialist_repo.clone();
    let services: Arc<dyn ServiceCatalog> = Arc::new(ServiceRepository::new(pool.clone()));
    let businesses: Arc<dyn BusinessDirectory> = Arc::new(BusinessRepository::new(pool.clone()));
    let users: Arc<dyn UserDirectory> = Arc::new(UserRepository::new(pool.clone()));
    let reservations: Arc<dyn ReservationStore> =
        Arc::new(ReservationRepository::new(pool.clone()));
    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let notify_timeout = Duration::from_secs(env.booking.notify_timeout_secs);

    let availability = Arc::new(AvailabilityEngine::new(
        specialists.clone(),
        services.clone(),
        reservations.clone(),
        clock.clone(),
        env.booking.default_slot_minutes,
    ));

    let reservation_service = Arc::new(ReservationService::new(
        specialists.clone(),
        services.clone(),
        businesses.clone(),
        users.clone(),
        reservations.clone(),
        notifier.clone(),
        clock.clone(),
        env.booking.strict_relationship_checks,
        notify_timeout,
    ));

    let reminders = Arc::new(ReminderScheduler::new(
        reservations,
        users,
        specialists,
        services,
        businesses,
        notifier,
        clock,
        env.booking.reminder_lead_hours,
        notify_timeout,
    ));
    reminders.start();

    let state = AppState {
        db: pool,
        env: env.clone(),
        availability,
        reservations: reservation_service,
        reminders,
        specialists: specialist_repo,
    };

    let app = create_router(state);
    let addr = env.server_addr();
    info!("{} listening on {}", env.app.name, addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Failed to serve application")?;

    Ok(())
}
