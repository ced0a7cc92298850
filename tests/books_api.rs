mod common;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use common::{sample_payload, TestApp, SEEDED_ISBN};
use serde_json::json;

#[tokio::test]
async fn list_returns_seeded_book() {
    let app = TestApp::seeded().await;

    let (status, body) = app.request(Method::GET, "/books", None).await;

    assert_eq!(status, StatusCode::OK);
    let books = body["books"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["isbn"], SEEDED_ISBN);
    assert_eq!(books[0]["author"], "Christopher Hitchens");
}

#[tokio::test]
async fn list_applies_query_filters() {
    let app = TestApp::seeded().await;
    app.request(Method::POST, "/books", Some(sample_payload("0691161518")))
        .await;

    let (status, body) = app
        .request(Method::GET, "/books?author=Matthew%20Lane&sort=ignored", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let books = body["books"].as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["isbn"], "0691161518");

    let (_, body) = app.request(Method::GET, "/books?year=1999", None).await;
    assert!(body["books"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn list_rejects_unparsable_filter() {
    let app = TestApp::seeded().await;

    let (status, body) = app.request(Method::GET, "/books?year=recent", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn get_returns_single_book() {
    let app = TestApp::seeded().await;

    let (status, body) = app
        .request(Method::GET, &format!("/books/{SEEDED_ISBN}"), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["isbn"], SEEDED_ISBN);
    assert_eq!(body["book"]["publisher"], "Sam Harris");
}

#[tokio::test]
async fn get_unknown_isbn_is_not_found() {
    let app = TestApp::seeded().await;

    let (status, body) = app.request(Method::GET, "/books/83457638", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "There is no book with an isbn '83457638'");
    assert_eq!(body["error"]["status"], 404);
}

#[tokio::test]
async fn create_returns_created_book() {
    let app = TestApp::seeded().await;

    let (status, body) = app
        .request(Method::POST, "/books", Some(sample_payload("0691161518")))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["book"], sample_payload("0691161518"));

    let (status, body) = app.request(Method::GET, "/books/0691161518", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"], sample_payload("0691161518"));
}

#[tokio::test]
async fn create_ignores_unknown_fields() {
    let app = TestApp::spawn().await;
    let mut payload = sample_payload("0691161518");
    payload["shelf"] = json!("B2");

    let (status, body) = app.request(Method::POST, "/books", Some(payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["book"].get("shelf").is_none());
}

#[tokio::test]
async fn create_with_null_title_is_rejected_before_storage() {
    let app = TestApp::spawn().await;
    let mut payload = sample_payload("0691161518");
    payload["title"] = json!(null);

    let (status, body) = app.request(Method::POST, "/books", Some(payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(
        body["error"]["details"],
        json!(["instance.title is not of a type(s) string"])
    );

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books")
        .fetch_one(&app.db)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn create_duplicate_isbn_is_a_database_error() {
    let app = TestApp::seeded().await;

    let (status, body) = app
        .request(Method::POST, "/books", Some(sample_payload(SEEDED_ISBN)))
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "internal_error");
    assert!(body["message"].as_str().unwrap().contains("UNIQUE"));
}

#[tokio::test]
async fn create_with_malformed_json_is_bad_request() {
    let app = TestApp::spawn().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/books")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"isbn\": "))
        .unwrap();

    let (status, body) = app.send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn update_replaces_every_field_including_isbn() {
    let app = TestApp::seeded().await;
    let payload = json!({
        "isbn": "99990691161518",
        "amazon_url": "http://a.co/eobPtX2",
        "author": "UPDATED Matthew Lane",
        "language": "UPDATED english",
        "pages": 264,
        "publisher": "UPDATED Princeton University Press",
        "title": "UPDATED Power-Up: Unlocking the Hidden Mathematics in Video Games",
        "year": 2017
    });

    let (status, body) = app
        .request(Method::PUT, &format!("/books/{SEEDED_ISBN}"), Some(payload.clone()))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"]["author"], "UPDATED Matthew Lane");
    assert_eq!(body["book"], payload);

    let (status, _) = app
        .request(Method::GET, &format!("/books/{SEEDED_ISBN}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.request(Method::GET, "/books/99990691161518", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["book"], payload);
}

#[tokio::test]
async fn update_with_wrong_fields_is_rejected() {
    let app = TestApp::seeded().await;
    let payload = json!({
        "isbn": "99990691161518",
        "BAD_amazon_url": "http://a.co/eobPtX2",
        "BAD_author": "UPDATED Matthew Lane",
        "BAD_language": "UPDATED english",
        "pages": 264,
        "publisher": "UPDATED Princeton University Press",
        "title": "UPDATED Power-Up: Unlocking the Hidden Mathematics in Video Games",
        "year": 2017
    });

    let (status, body) = app
        .request(Method::PUT, &format!("/books/{SEEDED_ISBN}"), Some(payload))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"].as_array().unwrap().len(), 3);

    let (_, body) = app
        .request(Method::GET, &format!("/books/{SEEDED_ISBN}"), None)
        .await;
    assert_eq!(body["book"]["author"], "Christopher Hitchens");
}

#[tokio::test]
async fn update_unknown_isbn_is_not_found() {
    let app = TestApp::spawn().await;

    let (status, _) = app
        .request(Method::PUT, "/books/83457638", Some(sample_payload("83457638")))
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_is_accepted_then_not_found() {
    let app = TestApp::seeded().await;
    let uri = format!("/books/{SEEDED_ISBN}");

    let (status, body) = app.request(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, json!({ "message": "Book deleted" }));

    let (status, body) = app.request(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn unmatched_route_is_not_found() {
    let app = TestApp::spawn().await;

    let (status, body) = app.request(Method::GET, "/authors", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not Found");
    assert_eq!(body["error"]["message"], "Not Found");
    assert_eq!(body["error"]["status"], 404);
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let app = TestApp::spawn().await;

    let (status, _) = app.request(Method::GET, "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.request(Method::GET, "/docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/books"]["post"].is_object());
    assert!(body["paths"]["/books/{isbn}"]["delete"].is_object());
    assert!(body["components"]["schemas"]["Book"].is_object());
}

#[tokio::test]
async fn undecodable_isbn_is_a_json_bad_request() {
    let app = TestApp::seeded().await;

    for (method, body) in [
        (Method::GET, None),
        (Method::PUT, Some(sample_payload("0691161518"))),
        (Method::DELETE, None),
    ] {
        let (status, body) = app.request(method.clone(), "/books/%FF", body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} /books/%FF");
        assert_eq!(body["error"]["code"], "bad_request");
        assert!(body["message"].is_string());
    }
}

#[tokio::test]
async fn database_failure_on_list_is_internal_error() {
    let app = TestApp::seeded().await;
    sqlx::query("DROP TABLE books").execute(&app.db).await.unwrap();

    let (status, body) = app.request(Method::GET, "/books", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "internal_error");
    assert_eq!(body["error"]["status"], 500);
    assert!(body["message"].as_str().unwrap().contains("no such table"));
}

#[tokio::test]
async fn database_failure_on_get_and_delete_is_internal_error() {
    let app = TestApp::seeded().await;
    sqlx::query("DROP TABLE books").execute(&app.db).await.unwrap();
    let uri = format!("/books/{SEEDED_ISBN}");

    for method in [Method::GET, Method::DELETE] {
        let (status, body) = app.request(method.clone(), &uri, None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
        assert_eq!(body["error"]["code"], "internal_error");
    }
}

#[tokio::test]
async fn trailing_slash_on_collection_is_not_routed() {
    let app = TestApp::seeded().await;

    let (status, body) = app.request(Method::GET, "/books/", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Not Found");
}
