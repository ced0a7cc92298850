use serde::{Deserialize, Serialize};

/// A book in the catalogue, keyed by ISBN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    /// Primary key
    pub isbn: String,
    pub amazon_url: String,
    pub author: String,
    pub language: String,
    /// Always at least 1
    pub pages: i64,
    pub publisher: String,
    pub title: String,
    pub year: i64,
}

/// Optional exact-match filters accepted by `GET /books`.
///
/// Unknown query parameters are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookFilters {
    pub author: Option<String>,
    pub language: Option<String>,
    pub publisher: Option<String>,
    pub year: Option<i64>,
}

impl BookFilters {
    pub fn is_empty(&self) -> bool {
        self.author.is_none()
            && self.language.is_none()
            && self.publisher.is_none()
            && self.year.is_none()
    }
}
