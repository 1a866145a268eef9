//! In-memory stores and router helpers shared by the integration tests

#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc, sync::Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use bookshelf_server::{
    api,
    config::{AdminConfig, AuthConfig},
    error::AppResult,
    models::{Book, BookRequest, NewBookRequest, RequestMerge},
    repository::{BookRequestStore, CatalogLookup, UserDirectory},
    services::{auth::AuthService, book_requests::BookRequestsService, Services},
    AppState,
};

pub const ADMIN_ID: &str = "admin";
pub const ADMIN_PASSWORD: &str = "letmein";

#[derive(Default)]
struct LibraryState {
    users: HashMap<i32, String>,
    books: Vec<Book>,
    requests: Vec<BookRequest>,
    next_id: i32,
    /// Logical clock, one tick per write, so ordering by updated_at is deterministic
    clock: i64,
}

impl LibraryState {
    fn tick(&mut self) -> DateTime<Utc> {
        self.clock += 1;
        Utc.timestamp_opt(1_700_000_000 + self.clock, 0).unwrap()
    }
}

/// Users, catalog and aggregate store backed by one mutex
#[derive(Default)]
pub struct MemoryLibrary {
    state: Mutex<LibraryState>,
}

impl MemoryLibrary {
    pub fn add_user(&self, id: i32, srn: &str) {
        self.state.lock().unwrap().users.insert(id, srn.to_string());
    }

    pub fn add_book(&self, title: &str, author: &str, isbn: &str, image: &str, branch: &[&str]) {
        let mut state = self.state.lock().unwrap();
        let id = state.books.len() as i32 + 1;
        state.books.push(Book {
            id,
            title: title.to_string(),
            author: author.to_string(),
            isbn: isbn.to_string(),
            image: image.to_string(),
            branch: branch.iter().map(|s| s.to_string()).collect(),
        });
    }

    pub fn remove_books(&self) {
        self.state.lock().unwrap().books.clear();
    }

    pub fn requests(&self) -> Vec<BookRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl UserDirectory for MemoryLibrary {
    async fn find_srn(&self, user_id: i32) -> AppResult<Option<String>> {
        Ok(self.state.lock().unwrap().users.get(&user_id).cloned())
    }
}

#[async_trait]
impl CatalogLookup for MemoryLibrary {
    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let state = self.state.lock().unwrap();
        Ok(state.books.iter().find(|b| b.isbn == isbn).cloned())
    }

    async fn find_by_title_author(&self, title: &str, author: &str) -> AppResult<Option<Book>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .books
            .iter()
            .find(|b| b.title.to_lowercase() == title && b.author.to_lowercase() == author)
            .cloned())
    }
}

#[async_trait]
impl BookRequestStore for MemoryLibrary {
    async fn find_by_title_author(&self, title: &str, author: &str) -> AppResult<Option<BookRequest>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .requests
            .iter()
            .find(|r| r.title == title && r.author == author)
            .cloned())
    }

    async fn insert(&self, request: &NewBookRequest) -> AppResult<Option<BookRequest>> {
        let mut state = self.state.lock().unwrap();
        if state
            .requests
            .iter()
            .any(|r| r.title == request.title && r.author == request.author)
        {
            return Ok(None);
        }
        let now = state.tick();
        state.next_id += 1;
        let created = BookRequest {
            id: state.next_id,
            title: request.title.clone(),
            author: request.author.clone(),
            isbn: request.isbn.clone(),
            image: request.image.clone(),
            requested_by: vec![request.srn.clone()],
            count: 1,
            created_at: now,
            updated_at: now,
        };
        state.requests.push(created.clone());
        Ok(Some(created))
    }

    async fn merge(&self, id: i32, merge: &RequestMerge) -> AppResult<Option<BookRequest>> {
        let mut state = self.state.lock().unwrap();
        let now = state.tick();
        let Some(record) = state.requests.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        let mut changed = false;
        if !record.requested_by.contains(&merge.srn) {
            record.requested_by.push(merge.srn.clone());
            record.count += 1;
            changed = true;
        }
        if record.isbn.is_empty() && !merge.isbn.is_empty() {
            record.isbn = merge.isbn.clone();
            changed = true;
        }
        if record.image.is_empty() && !merge.image.is_empty() {
            record.image = merge.image.clone();
            changed = true;
        }
        if !changed {
            return Ok(None);
        }
        record.updated_at = now;
        Ok(Some(record.clone()))
    }

    async fn list_by_popularity(&self) -> AppResult<Vec<BookRequest>> {
        let mut requests = self.state.lock().unwrap().requests.clone();
        requests.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then(b.updated_at.cmp(&a.updated_at))
                .then(b.id.cmp(&a.id))
        });
        Ok(requests)
    }

    async fn delete_all(&self) -> AppResult<u64> {
        let mut state = self.state.lock().unwrap();
        let deleted = state.requests.len() as u64;
        state.requests.clear();
        Ok(deleted)
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

/// Router wired to an in-memory library, plus the auth service used to mint tokens
pub struct TestApp {
    pub router: Router,
    pub library: Arc<MemoryLibrary>,
    pub auth: AuthService,
}

impl TestApp {
    pub fn new() -> Self {
        let library = Arc::new(MemoryLibrary::default());
        let auth = AuthService::new(
            AuthConfig::default(),
            AdminConfig {
                user_id: ADMIN_ID.to_string(),
                password: ADMIN_PASSWORD.to_string(),
            },
        );
        let services = Services {
            auth: auth.clone(),
            book_requests: BookRequestsService::new(library.clone(), library.clone(), library.clone()),
        };
        let router = api::create_router(AppState {
            services: Arc::new(services),
        });
        Self { router, library, auth }
    }

    pub fn session_token(&self, user_id: i32) -> String {
        self.auth.issue_session_token(user_id).unwrap()
    }

    pub fn admin_token(&self) -> String {
        self.auth.admin_login(ADMIN_ID, ADMIN_PASSWORD).unwrap()
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    /// POST /api/book-requests as `user_id`
    pub async fn submit(&self, user_id: i32, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/book-requests")
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", self.session_token(user_id)))
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn list(&self) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri("/api/book-requests")
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn clear(&self, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("DELETE").uri("/api/book-requests");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }
}
