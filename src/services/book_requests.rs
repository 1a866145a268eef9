//! Book request aggregation service
//!
//! Submissions are deduplicated on the normalized (title, author) pair and
//! cross-referenced against the catalog so that a request picks up the ISBN
//! and cover image of a matching book as soon as one exists.

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Book, BookRequest, EnrichedRequest, NewBookRequest, SubmitBookRequest},
    repository::{BookRequestStore, CatalogLookup, UserDirectory},
};

#[derive(Clone)]
pub struct BookRequestsService {
    users: Arc<dyn UserDirectory>,
    catalog: Arc<dyn CatalogLookup>,
    store: Arc<dyn BookRequestStore>,
}

impl BookRequestsService {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        catalog: Arc<dyn CatalogLookup>,
        store: Arc<dyn BookRequestStore>,
    ) -> Self {
        Self { users, catalog, store }
    }

    /// Record that `user_id` wants the described book.
    pub async fn submit_request(&self, user_id: i32, data: &SubmitBookRequest) -> AppResult<BookRequest> {
        data.validate()?;
        let key = data
            .key()
            .ok_or_else(|| AppError::Validation("Title and author are required.".to_string()))?;

        let srn = self
            .users
            .find_srn(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".to_string()))?;

        let isbn = data.isbn();
        let matched = self.resolve_catalog(isbn, &key.title, &key.author).await?;

        if let Some(existing) = self.store.find_by_title_author(&key.title, &key.author).await? {
            return self.merge_into(existing, &srn, matched.as_ref()).await;
        }

        let new = NewBookRequest::new(key, isbn, &srn, matched.as_ref());
        if let Some(created) = self.store.insert(&new).await? {
            tracing::info!(
                request_id = created.id,
                title = %created.title,
                author = %created.author,
                catalog_match = matched.is_some(),
                "Book request created"
            );
            return Ok(created);
        }

        // A concurrent first request for the same key was inserted in between.
        let existing = self
            .store
            .find_by_title_author(&new.title, &new.author)
            .await?
            .ok_or_else(|| AppError::Internal("Book request vanished during insert".to_string()))?;
        self.merge_into(existing, &srn, matched.as_ref()).await
    }

    /// All requests, most popular first, with live catalog data.
    pub async fn list_requests(&self) -> AppResult<Vec<EnrichedRequest>> {
        let requests = self.store.list_by_popularity().await?;

        let mut enriched = Vec::with_capacity(requests.len());
        for request in requests {
            // Title/author only: the stored ISBN is not consulted here.
            let book = self
                .catalog
                .find_by_title_author(&request.title, &request.author)
                .await?;
            enriched.push(EnrichedRequest::new(request, book));
        }
        Ok(enriched)
    }

    /// Delete every request. Returns the number removed.
    pub async fn clear_requests(&self) -> AppResult<u64> {
        let deleted = self.store.delete_all().await?;
        tracing::info!(deleted, "All book requests cleared");
        Ok(deleted)
    }

    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }

    /// ISBN first, then case-insensitive title and author.
    async fn resolve_catalog(&self, isbn: Option<&str>, title: &str, author: &str) -> AppResult<Option<Book>> {
        if let Some(isbn) = isbn {
            if let Some(book) = self.catalog.find_by_isbn(isbn).await? {
                return Ok(Some(book));
            }
        }
        self.catalog.find_by_title_author(title, author).await
    }

    async fn merge_into(&self, existing: BookRequest, srn: &str, matched: Option<&Book>) -> AppResult<BookRequest> {
        let Some(merge) = existing.plan_merge(srn, matched) else {
            tracing::debug!(request_id = existing.id, "Repeat book request, nothing to update");
            return Ok(existing);
        };

        match self.store.merge(existing.id, &merge).await? {
            Some(updated) => {
                tracing::info!(
                    request_id = updated.id,
                    count = updated.count,
                    "Book request updated"
                );
                Ok(updated)
            }
            // Someone else applied the same change first
            None => {
                let current = self
                    .store
                    .find_by_title_author(&existing.title, &existing.author)
                    .await?;
                Ok(current.unwrap_or(existing))
            }
        }
    }
}
