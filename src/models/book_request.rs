//! Book request aggregate and related types
//!
//! A book request aggregates every user asking for the same (title, author)
//! pair. Both halves of the key are stored normalized so that lookups are
//! plain equality.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::Book;

/// Trim and case-fold a title or author for storage and comparison.
pub fn normalize_field(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Aggregate request record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    pub id: i32,
    /// Normalized title
    pub title: String,
    /// Normalized author
    pub author: String,
    /// Empty when unknown
    pub isbn: String,
    /// Cover image URL, empty when unknown
    pub image: String,
    /// Registration numbers of the requesting users, without duplicates
    pub requested_by: Vec<String>,
    /// Always equal to `requested_by.len()`
    pub count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookRequest {
    pub fn is_requested_by(&self, srn: &str) -> bool {
        self.requested_by.iter().any(|s| s == srn)
    }

    /// Work out what a new submission changes on this record.
    ///
    /// Returns `None` when the requester is already counted and there is no
    /// empty isbn/image the catalog match could fill.
    pub fn plan_merge(&self, srn: &str, matched: Option<&Book>) -> Option<RequestMerge> {
        let isbn = matched
            .filter(|book| self.isbn.is_empty() && !book.isbn.is_empty())
            .map(|book| book.isbn.clone())
            .unwrap_or_default();
        let image = matched
            .filter(|book| self.image.is_empty() && !book.image.is_empty())
            .map(|book| book.image.clone())
            .unwrap_or_default();

        if self.is_requested_by(srn) && isbn.is_empty() && image.is_empty() {
            return None;
        }

        Some(RequestMerge {
            srn: srn.to_string(),
            isbn,
            image,
        })
    }
}

/// Conditional update applied atomically by the store.
///
/// `srn` is appended (and the count incremented) only if absent; `isbn` and
/// `image` only fill fields that are still empty. Empty strings mean no
/// backfill candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestMerge {
    pub srn: String,
    pub isbn: String,
    pub image: String,
}

/// First request for a (title, author) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBookRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub image: String,
    /// The first requester; the record starts with a count of 1
    pub srn: String,
}

impl NewBookRequest {
    /// Catalog data wins over the caller-supplied ISBN.
    pub fn new(key: RequestKey, isbn: Option<&str>, srn: &str, matched: Option<&Book>) -> Self {
        let (isbn, image) = match matched {
            Some(book) => (book.isbn.clone(), book.image.clone()),
            None => (isbn.unwrap_or_default().to_string(), String::new()),
        };

        Self {
            title: key.title,
            author: key.author,
            isbn,
            image,
            srn: srn.to_string(),
        }
    }
}

/// Normalized dedup key of an aggregate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub title: String,
    pub author: String,
}

/// Submit book request body
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct SubmitBookRequest {
    #[serde(default)]
    #[validate(length(max = 512, message = "Title must be at most 512 characters"))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(max = 512, message = "Author must be at most 512 characters"))]
    pub author: Option<String>,
    #[serde(default)]
    #[validate(length(max = 32, message = "ISBN must be at most 32 characters"))]
    pub isbn: Option<String>,
}

impl SubmitBookRequest {
    /// Normalized key, or `None` if title or author is missing or blank.
    pub fn key(&self) -> Option<RequestKey> {
        let title = normalize_field(self.title.as_deref()?);
        let author = normalize_field(self.author.as_deref()?);
        if title.is_empty() || author.is_empty() {
            return None;
        }
        Some(RequestKey { title, author })
    }

    /// Trimmed ISBN; blank counts as absent.
    pub fn isbn(&self) -> Option<&str> {
        self.isbn.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Book request as listed, enriched with live catalog data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EnrichedRequest {
    pub id: i32,
    /// Catalog casing when the book is in the catalog, normalized otherwise
    pub title: String,
    pub author: String,
    pub count: i32,
    pub image: String,
    pub branch: Vec<String>,
}

impl EnrichedRequest {
    pub fn new(request: BookRequest, book: Option<Book>) -> Self {
        match book {
            Some(book) => Self {
                id: request.id,
                title: book.title,
                author: book.author,
                count: request.count,
                image: book.image,
                branch: book.branch,
            },
            None => Self {
                id: request.id,
                title: request.title,
                author: request.author,
                count: request.count,
                image: String::new(),
                branch: Vec::new(),
            },
        }
    }
}
