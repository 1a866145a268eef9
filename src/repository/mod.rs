//! Repository layer for database operations
//!
//! The request aggregator talks to three stores through the traits below:
//! the user directory and the book catalog (both owned by other components
//! and only read here), and the aggregate store it owns.

pub mod book_requests;
pub mod books;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{Book, BookRequest, NewBookRequest, RequestMerge},
};

/// Resolves user ids to registration numbers
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_srn(&self, user_id: i32) -> AppResult<Option<String>>;
}

/// Read-only catalog queries
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Exact ISBN match
    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>>;

    /// Case-insensitive equality on both fields; `title` and `author` are
    /// expected already normalized.
    async fn find_by_title_author(&self, title: &str, author: &str) -> AppResult<Option<Book>>;
}

/// Persistence of book request aggregates
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookRequestStore: Send + Sync {
    async fn find_by_title_author(&self, title: &str, author: &str) -> AppResult<Option<BookRequest>>;

    /// Insert a first request. Returns `None` when an aggregate with the same
    /// key already exists.
    async fn insert(&self, request: &NewBookRequest) -> AppResult<Option<BookRequest>>;

    /// Atomically apply a merge. Returns `None` when nothing changed.
    async fn merge(&self, id: i32, merge: &RequestMerge) -> AppResult<Option<BookRequest>>;

    /// All aggregates, most requested first, most recently updated first
    /// among ties.
    async fn list_by_popularity(&self) -> AppResult<Vec<BookRequest>>;

    /// Remove every aggregate, returning how many were removed.
    async fn delete_all(&self) -> AppResult<u64>;

    /// Connectivity check used by the readiness endpoint
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: Arc<users::UsersRepository>,
    pub books: Arc<books::BooksRepository>,
    pub book_requests: Arc<book_requests::BookRequestsRepository>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(users::UsersRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            book_requests: Arc::new(book_requests::BookRequestsRepository::new(pool.clone())),
            pool,
        }
    }
}
