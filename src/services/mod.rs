//! Business logic services

pub mod auth;
pub mod book_requests;

use crate::{
    config::{AdminConfig, AuthConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub book_requests: book_requests::BookRequestsService,
}

impl Services {
    /// Create all services backed by the Postgres repository
    pub fn new(repository: Repository, auth_config: AuthConfig, admin_config: AdminConfig) -> Self {
        Self {
            auth: auth::AuthService::new(auth_config, admin_config),
            book_requests: book_requests::BookRequestsService::new(
                repository.users.clone(),
                repository.books.clone(),
                repository.book_requests.clone(),
            ),
        }
    }
}
