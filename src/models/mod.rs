//! Data models for the bookstore

pub mod book;

// Re-export commonly used types
pub use book::{Book, BookId, BookPatch, NewBook, NewBookRequest, SortKey};
