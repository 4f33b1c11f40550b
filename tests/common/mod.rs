#![allow(dead_code)]

use axum_test::TestServer;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use std::sync::Arc;
use url_hasher::application::services::{CodeLengths, UrlService};
use url_hasher::domain::entities::{NewUrlRecord, UrlRecord};
use url_hasher::domain::repositories::UrlRepository;
use url_hasher::infrastructure::persistence::InMemoryUrlRepository;
use url_hasher::routes::app_router;
use url_hasher::state::AppState;

pub const PUBLIC_ADDR: &str = "s.example.com";

/// Digest prefix of `https://example.com` at the default length.
pub const EXAMPLE_CODE: &str = "EAaArVRs";

pub fn create_test_state() -> (AppState, Arc<InMemoryUrlRepository>) {
    let repo = Arc::new(InMemoryUrlRepository::new());
    let lengths = CodeLengths::new(8, 12).unwrap();

    let dyn_repo: Arc<dyn UrlRepository> = repo.clone();
    let url_service = Arc::new(UrlService::new(dyn_repo, lengths));

    (AppState::new(url_service, PUBLIC_ADDR), repo)
}

pub fn create_test_server() -> (TestServer, Arc<InMemoryUrlRepository>) {
    let (state, repo) = create_test_state();
    let server = TestServer::new(app_router(state)).unwrap();
    (server, repo)
}

/// Registrations are stored at microsecond precision.
pub fn in_hours(hours: i64) -> DateTime<Utc> {
    (Utc::now() + Duration::hours(hours)).trunc_subsecs(6)
}

pub async fn create_test_record(
    repo: &InMemoryUrlRepository,
    code: &str,
    url: &str,
    expire_at: DateTime<Utc>,
) -> UrlRecord {
    repo.insert(NewUrlRecord {
        original_url: url.to_string(),
        expire_at,
        short_code: code.to_string(),
    })
    .await
    .unwrap()
}
