use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{NewWeeklyAvailabilityRule, Specialist, WeeklyAvailabilityRule};
use crate::db::DatabaseError;
use crate::scheduling::ports::{SpecialistDirectory, SpecialistProfile};

#[derive(Clone)]
pub struct SpecialistRepository {
    pool: PgPool,
}

impl SpecialistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Construction-time schedule hygiene: an available rule must have an
    /// ordered window, and a specialist holds at most one rule per weekday.
    /// Malformed schedules are rejected here rather than tolerated at read
    /// time.
    pub async fn add_availability_rule(
        &self,
        specialist_id: Uuid,
        rule: &NewWeeklyAvailabilityRule,
    ) -> Result<WeeklyAvailabilityRule, DatabaseError> {
        if !rule.window_is_ordered() {
            return Err(DatabaseError::InvalidInput(
                "availability window start must precede end".into(),
            ));
        }

        // The one_rule_per_weekday unique constraint also guards this; the
        // insert maps its violation to Duplicate.
        let inserted = sqlx::query_as::<_, WeeklyAvailabilityRule>(
            r#"
            INSERT INTO weekly_availability_rules
                (specialist_id, day_of_week, start_time, end_time, is_available)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, specialist_id, day_of_week, start_time, end_time, is_available, created_at
            "#,
        )
        .bind(specialist_id)
        .bind(rule.day_of_week)
        .bind(rule.start_time)
        .bind(rule.end_time)
        .bind(rule.is_available)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }
}

#[async_trait]
impl SpecialistDirectory for SpecialistRepository {
    async fn specialist(&self, id: Uuid) -> Result<Option<SpecialistProfile>, DatabaseError> {
        let specialist = sqlx::query_as::<_, Specialist>(
            r#"
            SELECT id, business_id, user_id, display_name, is_active, created_at, updated_at
            FROM specialists
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(specialist) = specialist else {
            return Ok(None);
        };

        let weekly_availability = sqlx::query_as::<_, WeeklyAvailabilityRule>(
            r#"
            SELECT id, specialist_id, day_of_week, start_time, end_time, is_available, created_at
            FROM weekly_availability_rules
            WHERE specialist_id = $1
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let providable_service_ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT service_id FROM specialist_services WHERE specialist_id = $1",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(SpecialistProfile {
            specialist,
            weekly_availability,
            providable_service_ids,
        }))
    }
}
