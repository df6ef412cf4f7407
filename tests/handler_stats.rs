mod common;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use serde_json::Value;
use url_shortener::domain::entities::ShortenedData;
use url_shortener::domain::repositories::UrlStorage;

fn real_ip(ip: &'static str) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-real-ip"),
        HeaderValue::from_static(ip),
    )
}

#[tokio::test]
async fn test_stats_from_trusted_subnet() {
    let app = common::spawn_app(Some("192.168.1.0/24"));
    for (user, code, url) in [
        ("u1", "aaaaaaa", "https://a.com"),
        ("u1", "bbbbbbb", "https://b.com"),
        ("u2", "ccccccc", "https://c.com"),
    ] {
        app.storage
            .store(ShortenedData::new(user, code, url))
            .await
            .unwrap();
    }
    app.storage
        .delete_by_user_id_and_short("u2", "ccccccc")
        .await
        .unwrap();

    let (name, value) = real_ip("192.168.1.17");
    let response = app
        .server
        .get("/api/internal/stats")
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    let json = response.json::<Value>();
    assert_eq!(json["urls"], 3);
    assert_eq!(json["users"], 2);
}

#[tokio::test]
async fn test_stats_from_untrusted_ip() {
    let app = common::spawn_app(Some("192.168.1.0/24"));

    let (name, value) = real_ip("10.0.0.1");
    let response = app
        .server
        .get("/api/internal/stats")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "forbidden");
}

#[tokio::test]
async fn test_stats_without_real_ip_header() {
    let app = common::spawn_app(Some("192.168.1.0/24"));

    app.server
        .get("/api/internal/stats")
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_stats_closed_without_trusted_subnet() {
    let app = common::spawn_app(None);

    let (name, value) = real_ip("127.0.0.1");
    app.server
        .get("/api/internal/stats")
        .add_header(name, value)
        .await
        .assert_status(StatusCode::FORBIDDEN);
}
