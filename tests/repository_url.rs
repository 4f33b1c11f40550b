//! PostgreSQL repository tests. Run with a reachable `DATABASE_URL` and
//! `cargo test -- --ignored`.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use url_hasher::application::services::{CodeLengths, RegistrationOutcome, UrlService};
use url_hasher::domain::entities::NewUrlRecord;
use url_hasher::domain::error::StoreError;
use url_hasher::domain::repositories::UrlRepository;
use url_hasher::infrastructure::persistence::PgUrlRepository;

fn repo(pool: PgPool) -> PgUrlRepository {
    PgUrlRepository::new(Arc::new(pool), std::time::Duration::from_secs(3))
}

/// TIMESTAMPTZ stores microseconds.
fn hours_from_now(hours: i64) -> DateTime<Utc> {
    (Utc::now() + Duration::hours(hours)).trunc_subsecs(6)
}

fn new_record(code: &str, url: &str, expire_at: DateTime<Utc>) -> NewUrlRecord {
    NewUrlRecord {
        original_url: url.to_string(),
        expire_at,
        short_code: code.to_string(),
    }
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_and_get(pool: PgPool) {
    let repo = repo(pool);
    let expire_at = hours_from_now(1);

    let record = repo
        .insert(new_record("abc12345", "https://example.com", expire_at))
        .await
        .unwrap();
    assert!(record.id > 0);

    let found = repo.get("abc12345").await.unwrap().unwrap();
    assert_eq!(found, record);
    assert_eq!(found.expire_at, expire_at);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_get_not_found(pool: PgPool) {
    let repo = repo(pool);

    assert!(repo.get("notfound").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_insert_duplicate_code(pool: PgPool) {
    let repo = repo(pool);
    repo.insert(new_record("dup12345", "https://a.example.com", hours_from_now(1)))
        .await
        .unwrap();

    let result = repo
        .insert(new_record("dup12345", "https://b.example.com", hours_from_now(1)))
        .await;

    assert!(matches!(result, Err(StoreError::DuplicateKey { code }) if code == "dup12345"));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_update_expiration(pool: PgPool) {
    let repo = repo(pool);
    let mut record = repo
        .insert(new_record("upd12345", "https://example.com", hours_from_now(1)))
        .await
        .unwrap();

    record.expire_at = hours_from_now(5);
    repo.update(&record).await.unwrap();

    let found = repo.get("upd12345").await.unwrap().unwrap();
    assert_eq!(found.expire_at, record.expire_at);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_update_missing_record(pool: PgPool) {
    let repo = repo(pool);
    let record = new_record("ghost123", "https://example.com", hours_from_now(1)).with_id(999);

    let result = repo.update(&record).await;

    assert!(matches!(result, Err(StoreError::MissingRecord { id: 999 })));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_count_records(pool: PgPool) {
    let repo = repo(pool);
    repo.insert(new_record("live0001", "https://a.example.com", hours_from_now(1)))
        .await
        .unwrap();
    repo.insert(new_record("live0002", "https://b.example.com", hours_from_now(2)))
        .await
        .unwrap();
    repo.insert(new_record("dead0001", "https://c.example.com", hours_from_now(-1)))
        .await
        .unwrap();

    let counts = repo.count_records().await.unwrap();

    assert_eq!(counts.live, 2);
    assert_eq!(counts.expired, 1);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_health_check(pool: PgPool) {
    assert!(repo(pool).health_check().await);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_service_reshortens_against_postgres(pool: PgPool) {
    let repo = Arc::new(repo(pool));
    repo.insert(new_record("EAaArVRs", "https://other.example.com", hours_from_now(1)))
        .await
        .unwrap();

    let service = UrlService::new(repo.clone(), CodeLengths::new(8, 12).unwrap());
    let registration = service
        .register("https://example.com", hours_from_now(1))
        .await
        .unwrap();

    assert_eq!(registration.outcome, RegistrationOutcome::Reshortened);
    assert_eq!(registration.code(), "EAaArVRs5");
}
