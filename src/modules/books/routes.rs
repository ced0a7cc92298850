//! HTTP handlers for `/books`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bookstore_http::AppError;
use serde_json::{json, Value};

use super::models::{Book, BookFilters};
use super::repository::{BookRepository, RepositoryError};
use super::schema::{self, BOOK_SCHEMA};

impl From<RepositoryError> for AppError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(_) => AppError::not_found(error.to_string()),
            RepositoryError::Database(e) => AppError::internal(e),
        }
    }
}

/// Router for the books module, relative to its mount point.
pub fn router(repository: BookRepository) -> Router {
    Router::new()
        .route("/", get(list_books).post(create_book))
        .route(
            "/{isbn}",
            get(get_book).put(update_book).delete(delete_book),
        )
        .with_state(repository)
}

/// Validate a write payload and decode it into a [`Book`].
fn book_from_payload(payload: Value) -> Result<Book, AppError> {
    let result = schema::validate(&payload, BOOK_SCHEMA);
    if !result.valid {
        tracing::debug!(errors = ?result.errors, "book payload rejected");
        return Err(AppError::validation(result.errors));
    }

    serde_json::from_value(payload).map_err(|e| AppError::bad_request(e.to_string()))
}

async fn list_books(
    State(repository): State<BookRepository>,
    filters: Result<Query<BookFilters>, QueryRejection>,
) -> Result<Json<Value>, AppError> {
    let Query(filters) = filters?;
    let books = repository.find_all(&filters).await?;
    tracing::debug!(count = books.len(), filtered = !filters.is_empty(), "listed books");
    Ok(Json(json!({ "books": books })))
}

async fn get_book(
    State(repository): State<BookRepository>,
    isbn: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(isbn) = isbn?;
    let book = repository.find_one(&isbn).await?;
    Ok(Json(json!({ "book": book })))
}

async fn create_book(
    State(repository): State<BookRepository>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Json(payload) = payload?;
    let book = book_from_payload(payload)?;

    let book = repository.create(&book).await?;
    tracing::info!(isbn = %book.isbn, "book created");
    Ok((StatusCode::CREATED, Json(json!({ "book": book }))))
}

async fn update_book(
    State(repository): State<BookRepository>,
    isbn: Result<Path<String>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Path(isbn) = isbn?;
    let Json(payload) = payload?;
    let book = book_from_payload(payload)?;

    let book = repository.update(&isbn, &book).await?;
    tracing::info!(isbn = %isbn, new_isbn = %book.isbn, "book updated");
    Ok(Json(json!({ "book": book })))
}

async fn delete_book(
    State(repository): State<BookRepository>,
    isbn: Result<Path<String>, PathRejection>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let Path(isbn) = isbn?;
    repository.remove(&isbn).await?;
    tracing::info!(isbn = %isbn, "book deleted");
    Ok((StatusCode::ACCEPTED, Json(json!({ "message": "Book deleted" }))))
}
