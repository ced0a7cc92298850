//! SQL access for books. Every operation issues exactly one statement.

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use thiserror::Error;

use super::models::{Book, BookFilters};

const BOOK_COLUMNS: &str = "isbn, amazon_url, author, language, pages, publisher, title, year";

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("There is no book with an isbn '{0}'")]
    NotFound(String),

    #[error("database failure: {0}")]
    Database(#[from] sqlx::Error),
}

/// Book storage over an injected connection pool.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All books ordered by title, narrowed by any filters given.
    pub async fn find_all(&self, filters: &BookFilters) -> Result<Vec<Book>, RepositoryError> {
        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {BOOK_COLUMNS} FROM books"));
        let mut separator = " WHERE ";

        if let Some(author) = &filters.author {
            query.push(separator).push("author = ").push_bind(author.as_str());
            separator = " AND ";
        }
        if let Some(language) = &filters.language {
            query.push(separator).push("language = ").push_bind(language.as_str());
            separator = " AND ";
        }
        if let Some(publisher) = &filters.publisher {
            query.push(separator).push("publisher = ").push_bind(publisher.as_str());
            separator = " AND ";
        }
        if let Some(year) = filters.year {
            query.push(separator).push("year = ").push_bind(year);
        }
        query.push(" ORDER BY title");

        let books = query.build_query_as::<Book>().fetch_all(&self.pool).await?;
        Ok(books)
    }

    pub async fn find_one(&self, isbn: &str) -> Result<Book, RepositoryError> {
        sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE isbn = $1"))
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(isbn.to_string()))
    }

    /// Insert a new row. A duplicate ISBN surfaces as [`RepositoryError::Database`].
    pub async fn create(&self, book: &Book) -> Result<Book, RepositoryError> {
        let created = sqlx::query_as::<_, Book>(&format!(
            "INSERT INTO books ({BOOK_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Overwrite every column of the row keyed by `isbn`, including the key itself.
    pub async fn update(&self, isbn: &str, book: &Book) -> Result<Book, RepositoryError> {
        sqlx::query_as::<_, Book>(&format!(
            "UPDATE books
             SET isbn = $1, amazon_url = $2, author = $3, language = $4,
                 pages = $5, publisher = $6, title = $7, year = $8
             WHERE isbn = $9
             RETURNING {BOOK_COLUMNS}"
        ))
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepositoryError::NotFound(isbn.to_string()))
    }

    pub async fn remove(&self, isbn: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = $1")
            .bind(isbn)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(isbn.to_string()));
        }
        Ok(())
    }
}
