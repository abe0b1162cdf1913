use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Business;
use crate::db::DatabaseError;
use crate::scheduling::ports::BusinessDirectory;

#[derive(Clone)]
pub struct BusinessRepository {
    pool: PgPool,
}

impl BusinessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusinessDirectory for BusinessRepository {
    async fn business(&self, id: Uuid) -> Result<Option<Business>, DatabaseError> {
        let business = sqlx::query_as::<_, Business>(
            r#"
            SELECT id, owner_user_id, name, is_active, created_at, updated_at
            FROM businesses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(business)
    }
}
