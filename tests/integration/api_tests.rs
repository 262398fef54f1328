//! API integration tests

use std::sync::Arc;

use bookstore_server::{
    api::create_router,
    config::{AppConfig, CatalogConfig},
    repository::Repository,
    services::Services,
    AppState,
};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

/// Serve the router on an ephemeral port and return its base URL
async fn spawn_app(seed_sample_data: bool) -> String {
    let config = AppConfig {
        catalog: CatalogConfig {
            seed_sample_data,
            default_page_size: 10,
        },
        ..AppConfig::default()
    };

    let services = Services::new(Repository::new());
    if seed_sample_data {
        services.books.seed_sample_catalog();
    }

    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn book_json(title: &str, genre: &str, stock: i64) -> Value {
    json!({
        "title": title,
        "author": "Test Author",
        "isbn": "111-1-111-111-1",
        "price": 10.0,
        "publishedDate": "2020-01-01",
        "genre": genre,
        "stock": stock
    })
}

async fn create_book(client: &Client, base_url: &str, body: Value) -> Value {
    let response = client
        .post(format!("{}/api/books", base_url))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.expect("Failed to parse response")
}

async fn get_json(client: &Client, url: String) -> Value {
    let response = client.get(url).send().await.expect("Failed to send request");
    assert!(response.status().is_success());
    response.json().await.expect("Failed to parse response")
}

fn titles(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("array body")
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let base_url = spawn_app(false).await;
    let client = Client::new();

    let body = get_json(&client, format!("{}/health", base_url)).await;
    assert_eq!(body["status"], "healthy");

    let body = get_json(&client, format!("{}/ready", base_url)).await;
    assert_eq!(body["status"], "ready");
    assert_eq!(body["books"], 0);
}

#[tokio::test]
async fn test_create_and_get_book() {
    let base_url = spawn_app(false).await;
    let client = Client::new();

    let created = create_book(
        &client,
        &base_url,
        json!({
            "id": null,
            "title": "Dune",
            "author": "Frank Herbert",
            "isbn": "X",
            "price": 9.99,
            "publishedDate": "1965-01-01",
            "genre": "Sci-Fi",
            "stock": 3
        }),
    )
    .await;
    assert_eq!(created["id"], 1);
    assert_eq!(created["title"], "Dune");
    assert_eq!(created["publishedDate"], "1965-01-01");
    assert!((created["price"].as_f64().unwrap() - 9.99).abs() < 1e-9);

    let fetched = get_json(&client, format!("{}/api/books/1", base_url)).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_get_unknown_book_is_404_without_body() {
    let base_url = spawn_app(false).await;

    let response = Client::new()
        .get(format!("{}/api/books/99", base_url))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_id_is_400() {
    let base_url = spawn_app(false).await;

    let response = Client::new()
        .get(format!("{}/api/books/abc", base_url))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], 3);
    assert_eq!(body["error"], "MalformedPath");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_create_invalid_book() {
    let base_url = spawn_app(false).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/books", base_url))
        .json(&json!({
            "title": "",
            "author": "Author",
            "isbn": "ISBN",
            "price": -10.00,
            "publishedDate": "9999-01-01",
            "genre": "",
            "stock": 0
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["title"], "Title cannot be blank");
    assert_eq!(body["price"], "Price must be non-negative");
    assert_eq!(body["genre"], "Genre cannot be blank");
    assert_eq!(body["publishedDate"], "Published date cannot be in the future");
    assert!(body.get("author").is_none());

    let all = get_json(&client, format!("{}/api/books", base_url)).await;
    assert!(all.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_with_null_fields() {
    let base_url = spawn_app(false).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/books", base_url))
        .json(&json!({
            "title": null,
            "author": "Author",
            "isbn": null,
            "price": 5.00,
            "publishedDate": "2001-01-01",
            "genre": "Fiction",
            "stock": null
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["title"], "Title cannot be blank");
    assert_eq!(body["isbn"], "ISBN cannot be blank");
    assert!(body.get("stock").is_none());

    // A null stock alone is accepted as zero
    let mut valid = book_json("Null Stock", "Fiction", 0);
    valid["stock"] = Value::Null;
    let created = create_book(&client, &base_url, valid).await;
    assert_eq!(created["stock"], 0);
}

#[tokio::test]
async fn test_create_with_partial_body() {
    let base_url = spawn_app(false).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/books", base_url))
        .json(&json!({ "title": "Only Title" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["author"], "Author cannot be blank");
    assert_eq!(body["isbn"], "ISBN cannot be blank");
    assert_eq!(body["genre"], "Genre cannot be blank");
    assert_eq!(body["price"], "Price cannot be null");
    assert_eq!(body["publishedDate"], "Published date cannot be null");
    assert!(body.get("title").is_none());
    assert!(body.get("stock").is_none());

    let all = get_json(&client, format!("{}/api/books", base_url)).await;
    assert!(all.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_price_round_trips_exactly() {
    let base_url = spawn_app(false).await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/books", base_url))
        .header("content-type", "application/json")
        .body(
            r#"{"title":"Rare Folio","author":"A","isbn":"X","price":12345678901234567.89,"publishedDate":"1901-01-01","genre":"Antique","stock":1}"#,
        )
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let text = client
        .get(format!("{}/api/books/1", base_url))
        .send()
        .await
        .expect("Failed to send request")
        .text()
        .await
        .unwrap();
    assert!(text.contains(r#""price":12345678901234567.89"#));
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let base_url = spawn_app(false).await;

    let response = Client::new()
        .post(format!("{}/api/books", base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_book() {
    let base_url = spawn_app(false).await;
    let client = Client::new();
    create_book(&client, &base_url, book_json("Title One", "Fiction", 5)).await;

    let response = client
        .put(format!("{}/api/books/1", base_url))
        .json(&json!({ "title": "Updated Title" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["title"], "Updated Title");
    assert_eq!(body["author"], "Test Author");
    assert_eq!(body["stock"], 5);

    // An explicit zero is applied
    let response = client
        .put(format!("{}/api/books/1", base_url))
        .json(&json!({ "stock": 0 }))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["stock"], 0);
    assert_eq!(body["title"], "Updated Title");
}

#[tokio::test]
async fn test_update_missing_and_invalid() {
    let base_url = spawn_app(false).await;
    let client = Client::new();
    create_book(&client, &base_url, book_json("Title One", "Fiction", 5)).await;

    let response = client
        .put(format!("{}/api/books/99", base_url))
        .json(&json!({ "title": "Updated Title" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The payload is checked before the lookup
    let response = client
        .put(format!("{}/api/books/99", base_url))
        .json(&json!({ "title": "" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["title"], "Title cannot be blank");

    let response = client
        .put(format!("{}/api/books/1", base_url))
        .json(&json!({ "title": "", "price": -5.00 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["title"], "Title cannot be blank");
    assert_eq!(body["price"], "Price must be non-negative");

    let book = get_json(&client, format!("{}/api/books/1", base_url)).await;
    assert_eq!(book["title"], "Title One");
}

#[tokio::test]
async fn test_delete_book() {
    let base_url = spawn_app(false).await;
    let client = Client::new();
    create_book(&client, &base_url, book_json("Doomed", "Fiction", 1)).await;

    let response = client
        .delete(format!("{}/api/books/1", base_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client
        .delete(format!("{}/api/books/1", base_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_paginated_listing() {
    let base_url = spawn_app(false).await;
    let client = Client::new();
    for title in ["E", "d", "C", "b", "A"] {
        create_book(&client, &base_url, book_json(title, "Fiction", 1)).await;
    }

    let body = get_json(
        &client,
        format!("{}/api/books?page=1&size=2&sortBy=id", base_url),
    )
    .await;
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 4]);

    let body = get_json(&client, format!("{}/api/books?sortBy=title", base_url)).await;
    assert_eq!(titles(&body), vec!["A", "b", "C", "d", "E"]);

    let body = get_json(&client, format!("{}/api/books?page=5&size=2", base_url)).await;
    assert!(body.as_array().unwrap().is_empty());

    let response = client
        .get(format!("{}/api/books?page=-1", base_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_queries_over_sample_catalog() {
    let base_url = spawn_app(true).await;
    let client = Client::new();

    let all = get_json(&client, format!("{}/api/books", base_url)).await;
    assert_eq!(all.as_array().unwrap().len(), 4);

    let body = get_json(&client, format!("{}/api/books/search?q=GREAT", base_url)).await;
    assert_eq!(titles(&body), vec!["The Great Gatsby"]);

    let body = get_json(&client, format!("{}/api/books/author/orwell", base_url)).await;
    assert_eq!(titles(&body), vec!["1984"]);

    let body = get_json(&client, format!("{}/api/books/genre/fiction", base_url)).await;
    assert_eq!(
        titles(&body),
        vec!["The Great Gatsby", "To Kill a Mockingbird"]
    );

    let body = get_json(&client, format!("{}/api/books/in-stock", base_url)).await;
    assert_eq!(body.as_array().unwrap().len(), 4);

    let response = client
        .get(format!("{}/api/books/search", base_url))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_openapi_document() {
    let base_url = spawn_app(false).await;

    let body = get_json(&Client::new(), format!("{}/api-docs/openapi.json", base_url)).await;
    assert!(body["paths"]["/api/books"].is_object());
    assert!(body["paths"]["/api/books/{id}"].is_object());
}
