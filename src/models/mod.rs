//! Data models for the Bookshelf server

pub mod book;
pub mod book_request;
pub mod user;

// Re-export commonly used types
pub use book::Book;
pub use book_request::{BookRequest, EnrichedRequest, NewBookRequest, RequestMerge, SubmitBookRequest};
pub use user::{AdminClaims, SessionClaims};
