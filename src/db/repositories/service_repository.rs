use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::ServiceOffering;
use crate::db::DatabaseError;
use crate::scheduling::ports::ServiceCatalog;

#[derive(Clone)]
pub struct ServiceRepository {
    pool: PgPool,
}

impl ServiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceCatalog for ServiceRepository {
    async fn service(&self, id: Uuid) -> Result<Option<ServiceOffering>, DatabaseError> {
        let service = sqlx::query_as::<_, ServiceOffering>(
            r#"
            SELECT id, business_id, name, duration_minutes, price_cents, is_active,
                   created_at, updated_at
            FROM services
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }
}
