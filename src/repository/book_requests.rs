//! Book request aggregates repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::BookRequestStore;
use crate::{
    error::AppResult,
    models::{BookRequest, NewBookRequest, RequestMerge},
};

const RETURNING: &str = "id, title, author, isbn, image, requested_by, count, created_at, updated_at";

#[derive(Clone)]
pub struct BookRequestsRepository {
    pool: Pool<Postgres>,
}

impl BookRequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookRequestStore for BookRequestsRepository {
    async fn find_by_title_author(&self, title: &str, author: &str) -> AppResult<Option<BookRequest>> {
        let query = format!("SELECT {} FROM book_requests WHERE title = $1 AND author = $2", RETURNING);
        let row = sqlx::query_as::<_, BookRequest>(&query)
            .bind(title)
            .bind(author)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, request: &NewBookRequest) -> AppResult<Option<BookRequest>> {
        let query = format!(
            r#"
            INSERT INTO book_requests (title, author, isbn, image, requested_by, count)
            VALUES ($1, $2, $3, $4, ARRAY[$5::text], 1)
            ON CONFLICT (title, author) DO NOTHING
            RETURNING {}
            "#,
            RETURNING
        );
        let row = sqlx::query_as::<_, BookRequest>(&query)
            .bind(&request.title)
            .bind(&request.author)
            .bind(&request.isbn)
            .bind(&request.image)
            .bind(&request.srn)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn merge(&self, id: i32, merge: &RequestMerge) -> AppResult<Option<BookRequest>> {
        // The WHERE clause makes the update a no-op (and leaves updated_at
        // alone) when the requester is already counted and nothing can be
        // backfilled. The row lock serializes concurrent merges.
        let query = format!(
            r#"
            UPDATE book_requests SET
                requested_by = CASE WHEN $2::text = ANY(requested_by)
                                    THEN requested_by
                                    ELSE array_append(requested_by, $2::text) END,
                count = CASE WHEN $2::text = ANY(requested_by) THEN count ELSE count + 1 END,
                isbn = CASE WHEN isbn = '' THEN $3 ELSE isbn END,
                image = CASE WHEN image = '' THEN $4 ELSE image END,
                updated_at = NOW()
            WHERE id = $1
              AND (NOT ($2::text = ANY(requested_by))
                   OR (isbn = '' AND $3 <> '')
                   OR (image = '' AND $4 <> ''))
            RETURNING {}
            "#,
            RETURNING
        );
        let row = sqlx::query_as::<_, BookRequest>(&query)
            .bind(id)
            .bind(&merge.srn)
            .bind(&merge.isbn)
            .bind(&merge.image)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_by_popularity(&self) -> AppResult<Vec<BookRequest>> {
        let query = format!(
            "SELECT {} FROM book_requests ORDER BY count DESC, updated_at DESC, id DESC",
            RETURNING
        );
        let rows = sqlx::query_as::<_, BookRequest>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM book_requests")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
