//! Catalog book model (read-only view of the catalog component's data)

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Book as stored in the catalog, with its original casing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    /// Empty when the catalog has no ISBN for this book
    pub isbn: String,
    /// Cover image URL, empty when unknown
    pub image: String,
    /// Branches holding a copy
    pub branch: Vec<String>,
}
