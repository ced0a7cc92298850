#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use bookstore_app::modules::{self, books::Book};
use bookstore_kernel::{
    settings::{DatabaseSettings, Settings},
    InitCtx, ModuleRegistry,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const SEEDED_ISBN: &str = "239457862394";

/// A migrated in-memory database with the application router on top.
pub struct TestApp {
    pub db: SqlitePool,
    pub router: Router,
}

pub async fn migrated_pool() -> (ModuleRegistry, SqlitePool) {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry);

    let db = bookstore_db::connect(&DatabaseSettings::in_memory())
        .await
        .expect("in-memory database");
    bookstore_db::migrate(&db, &registry.collect_migrations())
        .await
        .expect("migrations apply");

    (registry, db)
}

impl TestApp {
    pub async fn spawn() -> Self {
        let (registry, db) = migrated_pool().await;
        let settings = Settings::default();
        let ctx = InitCtx {
            settings: &settings,
            db: &db,
        };
        let router = bookstore_http::build_router(&registry, &ctx);

        Self { db, router }
    }

    /// Same fixture as the seeded row used throughout the API tests.
    pub async fn seeded() -> Self {
        let app = Self::spawn().await;
        sqlx::query(
            "INSERT INTO books (isbn, amazon_url, author, language, pages, publisher, title, year)
             VALUES ($1, 'https://www.amazon.com', 'Christopher Hitchens', 'English', 999,
                     'Sam Harris', 'God Is Not Great', 2010)",
        )
        .bind(SEEDED_ISBN)
        .execute(&app.db)
        .await
        .expect("seed book");
        app
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request builds");

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }
}

pub fn sample_book(isbn: &str) -> Book {
    Book {
        isbn: isbn.to_string(),
        amazon_url: "http://a.co/eobPtX2".to_string(),
        author: "Matthew Lane".to_string(),
        language: "english".to_string(),
        pages: 264,
        publisher: "Princeton University Press".to_string(),
        title: "Power-Up: Unlocking the Hidden Mathematics in Video Games".to_string(),
        year: 2017,
    }
}

pub fn sample_payload(isbn: &str) -> Value {
    serde_json::to_value(sample_book(isbn)).expect("book serializes")
}
