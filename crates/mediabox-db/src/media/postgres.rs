use super::MediaRepository;
use async_trait::async_trait;
use mediabox_core::models::{Media, NewMedia};
use mediabox_core::AppError;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

/// Postgres-backed media repository (`media` table)
#[derive(Clone)]
pub struct PgMediaRepository {
    pool: PgPool,
}

impl PgMediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert a record inside a transaction owned by the caller.
    ///
    /// Nothing is visible to other connections until the caller commits.
    #[tracing::instrument(
        skip(tx, new),
        fields(db.table = "media", db.operation = "insert", key = %new.object.key)
    )]
    pub async fn create_tx(
        tx: &mut Transaction<'_, Postgres>,
        new: NewMedia,
    ) -> Result<Media, AppError> {
        let media = sqlx::query_as::<Postgres, Media>(
            r#"
            INSERT INTO media (id, key, url, content_type, size)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, key, url, content_type, size, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.object.key)
        .bind(&new.object.url)
        .bind(&new.content_type)
        .bind(new.size)
        .fetch_one(&mut **tx)
        .await?;

        Ok(media)
    }
}

#[async_trait]
impl MediaRepository for PgMediaRepository {
    #[tracing::instrument(
        skip(self, new),
        fields(db.table = "media", db.operation = "insert", key = %new.object.key)
    )]
    async fn create(&self, new: NewMedia) -> Result<Media, AppError> {
        let media = sqlx::query_as::<Postgres, Media>(
            r#"
            INSERT INTO media (id, key, url, content_type, size)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, key, url, content_type, size, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.object.key)
        .bind(&new.object.url)
        .bind(&new.content_type)
        .bind(new.size)
        .fetch_one(&self.pool)
        .await?;

        Ok(media)
    }

    #[tracing::instrument(skip(self), fields(db.table = "media", db.operation = "select", db.record_id = %id))]
    async fn get(&self, id: Uuid) -> Result<Option<Media>, AppError> {
        let media = sqlx::query_as::<Postgres, Media>(
            "SELECT id, key, url, content_type, size, created_at, updated_at FROM media WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(media)
    }

    #[tracing::instrument(
        skip(self, new),
        fields(db.table = "media", db.operation = "update", db.record_id = %id, key = %new.object.key)
    )]
    async fn replace_object(&self, id: Uuid, new: NewMedia) -> Result<Option<Media>, AppError> {
        let media = sqlx::query_as::<Postgres, Media>(
            r#"
            UPDATE media
            SET key = $2, url = $3, content_type = $4, size = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id, key, url, content_type, size, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&new.object.key)
        .bind(&new.object.url)
        .bind(&new.content_type)
        .bind(new.size)
        .fetch_optional(&self.pool)
        .await?;

        Ok(media)
    }

    #[tracing::instrument(skip(self), fields(db.table = "media", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
