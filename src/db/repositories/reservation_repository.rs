use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::models::{Reservation, ReservationStatus};
use crate::db::DatabaseError;
use crate::scheduling::ports::ReservationStore;

const RESERVATION_COLUMNS: &str = "id, client_id, business_id, specialist_id, service_id, \
     start_time, end_time, status, cancellation_reason, notes, reminder_sent, \
     created_at, updated_at";

#[derive(Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReservationStore for ReservationRepository {
    async fn insert(&self, reservation: Reservation) -> Result<Reservation, DatabaseError> {
        // The no_active_overlap exclusion constraint turns a lost race into
        // DatabaseError::Duplicate here.
        let inserted = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            INSERT INTO reservations
                (id, client_id, business_id, specialist_id, service_id, start_time,
                 end_time, status, cancellation_reason, notes, reminder_sent,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(reservation.id)
        .bind(reservation.client_id)
        .bind(reservation.business_id)
        .bind(reservation.specialist_id)
        .bind(reservation.service_id)
        .bind(reservation.start_time)
        .bind(reservation.end_time)
        .bind(reservation.status)
        .bind(reservation.cancellation_reason)
        .bind(reservation.notes)
        .bind(reservation.reminder_sent)
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Reservation>, DatabaseError> {
        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reservation)
    }

    async fn active_for_specialist_between(
        &self,
        specialist_id: Uuid,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<Reservation>, DatabaseError> {
        let reservations = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            SELECT {RESERVATION_COLUMNS}
            FROM reservations
            WHERE specialist_id = $1
              AND status IN ('pending', 'confirmed')
              AND start_time >= $2
              AND start_time < $3
            ORDER BY start_time
            "#
        ))
        .bind(specialist_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    async fn active_overlapping(
        &self,
        specialist_id: Uuid,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<Reservation>, DatabaseError> {
        let reservations = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            SELECT {RESERVATION_COLUMNS}
            FROM reservations
            WHERE specialist_id = $1
              AND status IN ('pending', 'confirmed')
              AND start_time < $3
              AND end_time > $2
            ORDER BY start_time
            "#
        ))
        .bind(specialist_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ReservationStatus,
        cancellation_reason: Option<String>,
    ) -> Result<Reservation, DatabaseError> {
        let updated = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            UPDATE reservations
            SET status = $2,
                cancellation_reason = COALESCE($3, cancellation_reason),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .bind(cancellation_reason)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn confirmed_without_reminder_between(
        &self,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<Reservation>, DatabaseError> {
        let reservations = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            SELECT {RESERVATION_COLUMNS}
            FROM reservations
            WHERE status = 'confirmed'
              AND reminder_sent = FALSE
              AND start_time >= $1
              AND start_time < $2
            ORDER BY start_time
            "#
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }

    async fn mark_reminder_sent(&self, id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE reservations SET reminder_sent = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
