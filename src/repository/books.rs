//! Catalog (books) repository
//!
//! Case-insensitive matching folds both sides with Postgres `lower()` so the
//! comparison follows the database's own case rules, backed by the
//! `idx_books_title_author_lower` index.

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::CatalogLookup;
use crate::{error::AppResult, models::Book};

const BOOK_COLUMNS: &str = r#"
    id, title, author,
    COALESCE(isbn, '') AS isbn,
    COALESCE(image, '') AS image,
    COALESCE(branch, '{}') AS branch
"#;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogLookup for BooksRepository {
    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let query = format!("SELECT {} FROM books WHERE isbn = $1 ORDER BY id LIMIT 1", BOOK_COLUMNS);
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(isbn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }

    async fn find_by_title_author(&self, title: &str, author: &str) -> AppResult<Option<Book>> {
        let query = format!(
            "SELECT {} FROM books WHERE lower(title) = lower($1) AND lower(author) = lower($2) ORDER BY id LIMIT 1",
            BOOK_COLUMNS
        );
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(title)
            .bind(author)
            .fetch_optional(&self.pool)
            .await?;
        Ok(book)
    }
}
