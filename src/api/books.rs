//! Book catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookId, BookPatch, NewBookRequest},
    AppState,
};

/// Optional paging for `GET /api/books`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBooksQuery {
    pub page: Option<usize>,
    pub size: Option<usize>,
    pub sort_by: Option<String>,
}

impl ListBooksQuery {
    fn is_paged(&self) -> bool {
        self.page.is_some() || self.size.is_some() || self.sort_by.is_some()
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// List books, optionally sorted and paginated
#[utoipa::path(
    get,
    path = "/api/books",
    tag = "books",
    params(
        ("page" = Option<usize>, Query, description = "Zero-based page number (default: 0)"),
        ("size" = Option<usize>, Query, description = "Books per page (default: 10)"),
        ("sortBy" = Option<String>, Query, description = "title, author, price, publishedDate, genre or stock (default: id)")
    ),
    responses(
        (status = 200, description = "List of books", body = Vec<Book>),
        (status = 400, description = "Malformed query string", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<ListBooksQuery>, AppError>,
) -> Json<Vec<Book>> {
    let books = &state.services.books;
    if !query.is_paged() {
        return Json(books.list());
    }

    let page = query.page.unwrap_or(0);
    let size = query
        .size
        .unwrap_or(state.config.catalog.default_page_size);
    let sort_by = query.sort_by.as_deref().unwrap_or("id");
    Json(books.list_sorted(page, size, sort_by))
}

/// Get book by ID
#[utoipa::path(
    get,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = u64, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<BookId>, AppError>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get(id)?;
    Ok(Json(book))
}

/// Search books by title
#[utoipa::path(
    get,
    path = "/api/books/search",
    tag = "books",
    params(("q" = String, Query, description = "Case-insensitive title fragment")),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>),
        (status = 400, description = "Missing q parameter", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<SearchQuery>, AppError>,
) -> Json<Vec<Book>> {
    Json(state.services.books.search_by_title(&query.q))
}

/// List books whose author contains the given text
#[utoipa::path(
    get,
    path = "/api/books/author/{author}",
    tag = "books",
    params(("author" = String, Path, description = "Case-insensitive author fragment")),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>)
    )
)]
pub async fn list_by_author(
    State(state): State<AppState>,
    Path(author): Path<String>,
) -> Json<Vec<Book>> {
    Json(state.services.books.by_author(&author))
}

/// List books of a genre
#[utoipa::path(
    get,
    path = "/api/books/genre/{genre}",
    tag = "books",
    params(("genre" = String, Path, description = "Genre, matched exactly ignoring case")),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>)
    )
)]
pub async fn list_by_genre(
    State(state): State<AppState>,
    Path(genre): Path<String>,
) -> Json<Vec<Book>> {
    Json(state.services.books.by_genre(&genre))
}

/// List books with stock on hand
#[utoipa::path(
    get,
    path = "/api/books/in-stock",
    tag = "books",
    responses(
        (status = 200, description = "Books in stock", body = Vec<Book>)
    )
)]
pub async fn list_in_stock(State(state): State<AppState>) -> Json<Vec<Book>> {
    Json(state.services.books.in_stock())
}

/// Create a new book
#[utoipa::path(
    post,
    path = "/api/books",
    tag = "books",
    request_body = NewBookRequest,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Field name to validation message")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    WithRejection(Json(request), _): WithRejection<Json<NewBookRequest>, AppError>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.books.create(request)?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing book. Only the fields present are changed.
#[utoipa::path(
    put,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = u64, Path, description = "Book ID")),
    request_body = BookPatch,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Field name to validation message"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<BookId>, AppError>,
    WithRejection(Json(patch), _): WithRejection<Json<BookPatch>, AppError>,
) -> AppResult<Json<Book>> {
    let updated = state.services.books.update(id, patch)?;
    Ok(Json(updated))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/api/books/{id}",
    tag = "books",
    params(("id" = u64, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    WithRejection(Path(id), _): WithRejection<Path<BookId>, AppError>,
) -> AppResult<StatusCode> {
    state.services.books.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}
