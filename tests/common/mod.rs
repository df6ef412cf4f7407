#![allow(dead_code)]

use axum::http::{HeaderValue, header};
use axum_test::{TestResponse, TestServer};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use url_shortener::application::services::{IdentityService, ShortenerService};
use url_shortener::domain::deletion_worker::run_deletion_worker;
use url_shortener::domain::repositories::UrlStorage;
use url_shortener::infrastructure::persistence::MemoryStorage;
use url_shortener::routes::router;
use url_shortener::state::AppState;

pub const SIGNING_SECRET: &str = "test-signing-secret";
pub const BASE_URL: &str = "http://localhost:8080";

pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<MemoryStorage>,
    pub identity: Arc<IdentityService>,
}

pub fn create_test_state(
    storage: Arc<dyn UrlStorage>,
    trusted_subnet: Option<&str>,
) -> (AppState, mpsc::Receiver<url_shortener::domain::deletion_job::DeletionJob>) {
    let (tx, rx) = mpsc::channel(64);

    let state = AppState {
        shortener_service: Arc::new(ShortenerService::new(storage, BASE_URL)),
        identity_service: Arc::new(IdentityService::new(SIGNING_SECRET)),
        delete_sender: tx,
        trusted_subnet: trusted_subnet.map(|cidr| cidr.parse().unwrap()),
    };

    (state, rx)
}

/// Full router over a fresh memory storage with a running deletion worker.
pub fn spawn_app(trusted_subnet: Option<&str>) -> TestApp {
    let storage = Arc::new(MemoryStorage::new());
    let (state, rx) = create_test_state(storage.clone(), trusted_subnet);
    tokio::spawn(run_deletion_worker(rx, storage.clone()));

    let identity = state.identity_service.clone();
    let server = TestServer::new(router(state)).unwrap();

    TestApp {
        server,
        storage,
        identity,
    }
}

pub fn bearer(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
}

/// Token issued to the client in the response `Authorization` header.
pub fn issued_token(response: &TestResponse) -> String {
    response
        .headers()
        .get(header::AUTHORIZATION)
        .expect("response should carry a freshly issued token")
        .to_str()
        .unwrap()
        .strip_prefix("Bearer ")
        .unwrap()
        .to_string()
}

/// Polls until `check` holds, for background work like queued deletions.
pub async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not met in time");
}
