//! Postgres repository integration tests.
//!
//! Run with: `DATABASE_URL=postgres://... cargo test -p mediabox-db -- --ignored`

use mediabox_core::models::{NewMedia, StoredObject};
use mediabox_core::AppError;
use mediabox_db::{with_transaction, MediaRepository, PgMediaRepository};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

async fn setup_pool() -> PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

fn new_media(name: &str) -> NewMedia {
    let key = format!("test/others/{}-{}", Uuid::new_v4(), name);
    NewMedia::new(
        StoredObject {
            url: format!("http://localhost:4000/files/{}", key),
            key,
        },
        "text/plain",
        11,
    )
}

#[tokio::test]
#[ignore = "requires a Postgres database in DATABASE_URL"]
async fn test_create_get_replace_delete() {
    let repo = PgMediaRepository::new(setup_pool().await);

    let created = repo.create(new_media("a.txt")).await.unwrap();
    let fetched = repo.get(created.id).await.unwrap().unwrap();
    assert_eq!(fetched.key, created.key);
    assert_eq!(fetched.size, 11);

    let replacement = new_media("b.txt");
    let replaced = repo
        .replace_object(created.id, replacement.clone())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replaced.id, created.id);
    assert_eq!(replaced.key, replacement.object.key);
    assert_eq!(replaced.url, replacement.object.url);

    assert!(repo.delete(created.id).await.unwrap());
    assert!(repo.get(created.id).await.unwrap().is_none());
    assert!(!repo.delete(created.id).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a Postgres database in DATABASE_URL"]
async fn test_replace_unknown_id_returns_none() {
    let repo = PgMediaRepository::new(setup_pool().await);
    let result = repo.replace_object(Uuid::new_v4(), new_media("x.txt")).await;
    assert!(result.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires a Postgres database in DATABASE_URL"]
async fn test_create_tx_is_rolled_back_on_error() {
    let pool = setup_pool().await;
    let repo = PgMediaRepository::new(pool.clone());

    let new = new_media("tx.txt");
    let key = new.object.key.clone();
    let result: Result<(), AppError> = with_transaction(&pool, |tx| {
        Box::pin(async move {
            PgMediaRepository::create_tx(tx, new).await?;
            Err(AppError::Internal("abort".to_string()))
        })
    })
    .await;
    assert!(result.is_err());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM media WHERE key = $1")
        .bind(&key)
        .fetch_one(repo.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
#[ignore = "requires a Postgres database in DATABASE_URL"]
async fn test_create_tx_commits() {
    let pool = setup_pool().await;
    let repo = PgMediaRepository::new(pool.clone());

    let new = new_media("committed.txt");
    let media = with_transaction(&pool, |tx| {
        Box::pin(async move { PgMediaRepository::create_tx(tx, new).await })
    })
    .await
    .unwrap();

    assert!(repo.get(media.id).await.unwrap().is_some());
    repo.delete(media.id).await.unwrap();
}
