mod common;

use axum::http::{StatusCode, header};
use url_shortener::domain::entities::ShortenedData;
use url_shortener::domain::repositories::UrlStorage;

#[tokio::test]
async fn test_redirect_success() {
    let app = common::spawn_app(None);
    app.storage
        .store(ShortenedData::new(
            "u1",
            "DdGYF42",
            "https://practicum.yandex.ru/",
        ))
        .await
        .unwrap();

    let response = app.server.get("/DdGYF42").await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://practicum.yandex.ru/"
    );
}

#[tokio::test]
async fn test_redirect_after_shorten() {
    let app = common::spawn_app(None);

    app.server
        .post("/")
        .text("https://example.com")
        .await
        .assert_status(StatusCode::CREATED);

    let response = app.server.get("/yYTQaq-").await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://example.com"
    );
}

#[tokio::test]
async fn test_redirect_not_found() {
    let app = common::spawn_app(None);

    let response = app.server.get("/missing").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_redirect_deleted_is_gone() {
    let app = common::spawn_app(None);
    app.storage
        .store(ShortenedData::new("u1", "abc1234", "https://a.com"))
        .await
        .unwrap();
    app.storage
        .delete_by_user_id_and_short("u1", "abc1234")
        .await
        .unwrap();

    let response = app.server.get("/abc1234").await;

    response.assert_status(StatusCode::GONE);
}
