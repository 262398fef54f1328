//! Book catalog service: queries, sorting, pagination and validated writes

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{sample_catalog, Book, BookId, BookPatch, NewBook, NewBookRequest, SortKey},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// All books
    pub fn list(&self) -> Vec<Book> {
        self.repository.books_list()
    }

    /// One page of books ordered by `sort_by`. Pages are zero-based.
    pub fn list_sorted(&self, page: usize, size: usize, sort_by: &str) -> Vec<Book> {
        let key = SortKey::from(sort_by);
        let mut books = self.repository.books_list();
        books.sort_by(|a, b| key.compare(a, b));
        paginate(books, page, size)
    }

    /// Get book by ID
    pub fn get(&self, id: BookId) -> AppResult<Book> {
        self.repository
            .books_get(id)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Case-insensitive substring match on the title
    pub fn search_by_title(&self, query: &str) -> Vec<Book> {
        let query = query.to_lowercase();
        self.repository
            .books_filter(|book| book.title.to_lowercase().contains(&query))
    }

    /// Case-insensitive substring match on the author
    pub fn by_author(&self, author: &str) -> Vec<Book> {
        let author = author.to_lowercase();
        self.repository
            .books_filter(|book| book.author.to_lowercase().contains(&author))
    }

    /// Case-insensitive exact match on the genre
    pub fn by_genre(&self, genre: &str) -> Vec<Book> {
        let genre = genre.to_lowercase();
        self.repository
            .books_filter(|book| book.genre.to_lowercase() == genre)
    }

    pub fn in_stock(&self) -> Vec<Book> {
        self.repository.books_filter(Book::is_in_stock)
    }

    /// Validate and store a new book
    pub fn create(&self, request: NewBookRequest) -> AppResult<Book> {
        let new_book = NewBook::try_from(request)?;
        let book = self.repository.books_insert(new_book);
        tracing::info!("Catalog create: book id={} \"{}\"", book.id, book.title);
        Ok(book)
    }

    /// Validate `patch` and merge it into book `id`.
    /// The payload is checked before the lookup, so an invalid patch on an
    /// unknown id is a validation error.
    pub fn update(&self, id: BookId, patch: BookPatch) -> AppResult<Book> {
        patch.validate()?;

        let book = self
            .repository
            .books_update(id, patch)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;
        tracing::info!("Catalog update: book id={}", id);
        Ok(book)
    }

    pub fn delete(&self, id: BookId) -> AppResult<()> {
        if !self.repository.books_delete(id) {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        tracing::info!("Catalog delete: book id={}", id);
        Ok(())
    }

    /// Number of stored books (readiness endpoint)
    pub fn count(&self) -> usize {
        self.repository.books_count()
    }

    /// Load the sample catalog, returning how many books were added
    pub fn seed_sample_catalog(&self) -> usize {
        let samples = sample_catalog();
        let count = samples.len();
        for book in samples {
            self.repository.books_insert(book);
        }
        count
    }
}

/// Slice `[page * size, page * size + size)` of `books`, clamped to bounds
fn paginate(books: Vec<Book>, page: usize, size: usize) -> Vec<Book> {
    let start = page.saturating_mul(size).min(books.len());
    books.into_iter().skip(start).take(size).collect()
}
