//! Repository layer: the in-memory book store

pub mod books;

use std::{
    collections::HashMap,
    sync::{atomic::AtomicU64, Arc},
};

use parking_lot::RwLock;

use crate::models::book::{Book, BookId};

/// Shared book table. Cloning is cheap and every clone sees the same data.
#[derive(Clone)]
pub struct Repository {
    books: Arc<RwLock<HashMap<BookId, Book>>>,
    next_book_id: Arc<AtomicU64>,
}

impl Repository {
    /// Create an empty store whose first identifier is 1
    pub fn new() -> Self {
        Self {
            books: Arc::new(RwLock::new(HashMap::new())),
            next_book_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}
