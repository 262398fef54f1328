//! Book model and related types

use std::cmp::Ordering;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::{AppError, ErrorCode};

/// Store-assigned book identifier
pub type BookId = u64;

/// Book record as held by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[schema(value_type = u64)]
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub price: Decimal,
    /// ISO date (YYYY-MM-DD)
    pub published_date: NaiveDate,
    pub genre: String,
    /// Copies on hand
    pub stock: i32,
}

impl Book {
    pub fn from_new(id: BookId, book: NewBook) -> Self {
        Self {
            id,
            title: book.title,
            author: book.author,
            isbn: book.isbn,
            price: book.price,
            published_date: book.published_date,
            genre: book.genre,
            stock: book.stock,
        }
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Overwrite every field set in `patch`, leave the others alone
    pub fn apply(&mut self, patch: BookPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(isbn) = patch.isbn {
            self.isbn = isbn;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(published_date) = patch.published_date {
            self.published_date = published_date;
        }
        if let Some(genre) = patch.genre {
            self.genre = genre;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
    }
}

/// A validated book that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub price: Decimal,
    pub published_date: NaiveDate,
    pub genre: String,
    pub stock: i32,
}

/// Create book request.
///
/// Every field is optional on the wire so that a missing or `null` value is
/// reported through validation instead of a deserialization failure. Any `id`
/// sent by the client is ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBookRequest {
    #[validate(
        required(message = "Title cannot be blank"),
        custom(function = "title_not_blank")
    )]
    pub title: Option<String>,
    #[validate(
        required(message = "Author cannot be blank"),
        custom(function = "author_not_blank")
    )]
    pub author: Option<String>,
    #[validate(
        required(message = "ISBN cannot be blank"),
        custom(function = "isbn_not_blank")
    )]
    pub isbn: Option<String>,
    #[validate(
        required(message = "Price cannot be null"),
        custom(function = "price_non_negative")
    )]
    pub price: Option<Decimal>,
    #[validate(
        required(message = "Published date cannot be null"),
        custom(function = "date_not_in_future")
    )]
    pub published_date: Option<NaiveDate>,
    #[validate(
        required(message = "Genre cannot be blank"),
        custom(function = "genre_not_blank")
    )]
    pub genre: Option<String>,
    /// Defaults to 0
    #[validate(range(min = 0, message = "Stock must be non-negative"))]
    pub stock: Option<i32>,
}

impl TryFrom<NewBookRequest> for NewBook {
    type Error = AppError;

    fn try_from(request: NewBookRequest) -> Result<Self, Self::Error> {
        request.validate()?;

        // `validate` already rejected any missing field
        let (Some(title), Some(author), Some(isbn), Some(price), Some(published_date), Some(genre)) = (
            request.title,
            request.author,
            request.isbn,
            request.price,
            request.published_date,
            request.genre,
        ) else {
            return Err(AppError::BadRequest(
                ErrorCode::BadValue,
                "Incomplete book payload".to_string(),
            ));
        };

        Ok(Self {
            title,
            author,
            isbn,
            price,
            published_date,
            genre,
            stock: request.stock.unwrap_or(0),
        })
    }
}

/// Update book request: each field present overwrites the stored value
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    #[validate(custom(function = "title_not_blank"))]
    pub title: Option<String>,
    #[validate(custom(function = "author_not_blank"))]
    pub author: Option<String>,
    #[validate(custom(function = "isbn_not_blank"))]
    pub isbn: Option<String>,
    #[validate(custom(function = "price_non_negative"))]
    pub price: Option<Decimal>,
    #[validate(custom(function = "date_not_in_future"))]
    pub published_date: Option<NaiveDate>,
    #[validate(custom(function = "genre_not_blank"))]
    pub genre: Option<String>,
    #[validate(range(min = 0, message = "Stock must be non-negative"))]
    pub stock: Option<i32>,
}

/// Field a book listing can be ordered by. Unknown names order by id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Id,
    Title,
    Author,
    Price,
    PublishedDate,
    Genre,
    Stock,
}

impl From<&str> for SortKey {
    fn from(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "title" => SortKey::Title,
            "author" => SortKey::Author,
            "price" => SortKey::Price,
            "publisheddate" | "published_date" => SortKey::PublishedDate,
            "genre" => SortKey::Genre,
            "stock" => SortKey::Stock,
            _ => SortKey::Id,
        }
    }
}

impl SortKey {
    /// Order two books by this key, ties broken by ascending id
    pub fn compare(self, a: &Book, b: &Book) -> Ordering {
        let by_key = match self {
            SortKey::Id => Ordering::Equal,
            SortKey::Title => cmp_ignore_case(&a.title, &b.title),
            SortKey::Author => cmp_ignore_case(&a.author, &b.author),
            SortKey::Price => a.price.cmp(&b.price),
            SortKey::PublishedDate => a.published_date.cmp(&b.published_date),
            SortKey::Genre => cmp_ignore_case(&a.genre, &b.genre),
            SortKey::Stock => a.stock.cmp(&b.stock),
        };
        by_key.then(a.id.cmp(&b.id))
    }
}

fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

// Custom validators. The messages are the ones returned to API clients.

fn blank(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some(message.into());
        return Err(err);
    }
    Ok(())
}

fn title_not_blank(value: &str) -> Result<(), ValidationError> {
    blank(value, "Title cannot be blank")
}

fn author_not_blank(value: &str) -> Result<(), ValidationError> {
    blank(value, "Author cannot be blank")
}

fn isbn_not_blank(value: &str) -> Result<(), ValidationError> {
    blank(value, "ISBN cannot be blank")
}

fn genre_not_blank(value: &str) -> Result<(), ValidationError> {
    blank(value, "Genre cannot be blank")
}

fn price_non_negative(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("Price must be non-negative".into());
        return Err(err);
    }
    Ok(())
}

fn date_not_in_future(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Utc::now().date_naive() {
        let mut err = ValidationError::new("past_or_present");
        err.message = Some("Published date cannot be in the future".into());
        return Err(err);
    }
    Ok(())
}

/// Books loaded at startup when `catalog.seed_sample_data` is set
pub fn sample_catalog() -> Vec<NewBook> {
    const SAMPLES: [(&str, &str, &str, i64, (i32, u32, u32), &str, i32); 4] = [
        ("The Great Gatsby", "F. Scott Fitzgerald", "978-0743273565", 1499, (1925, 4, 10), "Fiction", 25),
        ("To Kill a Mockingbird", "Harper Lee", "978-0446310789", 1299, (1960, 7, 11), "Fiction", 18),
        ("1984", "George Orwell", "978-0451524935", 1199, (1949, 6, 8), "Dystopian", 30),
        ("Clean Code", "Robert C. Martin", "978-0132350884", 3999, (2008, 8, 1), "Technical", 15),
    ];

    SAMPLES
        .iter()
        .filter_map(|&(title, author, isbn, cents, (y, m, d), genre, stock)| {
            Some(NewBook {
                title: title.to_string(),
                author: author.to_string(),
                isbn: isbn.to_string(),
                price: Decimal::new(cents, 2),
                published_date: NaiveDate::from_ymd_opt(y, m, d)?,
                genre: genre.to_string(),
                stock,
            })
        })
        .collect()
}
