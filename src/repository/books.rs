//! Book domain methods on Repository

use std::sync::atomic::Ordering;

use super::Repository;
use crate::models::book::{Book, BookId, BookPatch, NewBook};

impl Repository {
    /// Store a new book under the next identifier
    pub fn books_insert(&self, book: NewBook) -> Book {
        let id = self.next_book_id.fetch_add(1, Ordering::Relaxed);
        let book = Book::from_new(id, book);
        self.books.write().insert(id, book.clone());
        tracing::debug!("Inserted book id={}", id);
        book
    }

    /// Get book by ID
    pub fn books_get(&self, id: BookId) -> Option<Book> {
        self.books.read().get(&id).cloned()
    }

    /// Snapshot of every stored book, by ascending id
    pub fn books_list(&self) -> Vec<Book> {
        self.books_filter(|_| true)
    }

    /// Snapshot of the books matching `predicate`, by ascending id
    pub fn books_filter<F>(&self, predicate: F) -> Vec<Book>
    where
        F: Fn(&Book) -> bool,
    {
        let mut books: Vec<Book> = self
            .books
            .read()
            .values()
            .filter(|&book| predicate(book))
            .cloned()
            .collect();
        books.sort_unstable_by_key(|book| book.id);
        books
    }

    /// Merge `patch` into the stored book. `None` if the id is unknown.
    pub fn books_update(&self, id: BookId, patch: BookPatch) -> Option<Book> {
        let mut books = self.books.write();
        let book = books.get_mut(&id)?;
        book.apply(patch);
        tracing::debug!("Updated book id={}", id);
        Some(book.clone())
    }

    /// Remove a book, returning whether it was present
    pub fn books_delete(&self, id: BookId) -> bool {
        let removed = self.books.write().remove(&id).is_some();
        if removed {
            tracing::debug!("Deleted book id={}", id);
        }
        removed
    }

    /// Number of stored books
    pub fn books_count(&self) -> usize {
        self.books.read().len()
    }
}
