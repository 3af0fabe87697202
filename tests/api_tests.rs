//! API integration tests
//!
//! These tests expect a running server with an empty-ish database:
//! `cargo run` in one terminal, then `cargo test -- --ignored`.

use reqwest::{redirect::Policy, Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080";

/// Client that does not follow redirects, so the 303 + Location
/// contract of the mutation endpoints can be asserted directly.
fn client() -> Client {
    Client::builder()
        .redirect(Policy::none())
        .build()
        .expect("Failed to build client")
}

/// Extract the record id from a redirect Location like `/catalog/author/42`.
fn id_from_location(response: &reqwest::Response) -> i32 {
    let location = response
        .headers()
        .get("location")
        .expect("No Location header")
        .to_str()
        .expect("Invalid Location header");
    location
        .rsplit('/')
        .next()
        .and_then(|s| s.parse().ok())
        .expect("Location does not end with an id")
}

async fn create_author(client: &Client, first_name: &str, family_name: &str) -> i32 {
    let response = client
        .post(format!("{}/catalog/author/create", BASE_URL))
        .json(&json!({
            "first_name": first_name,
            "family_name": family_name,
            "date_birth": "1775-12-16",
            "date_death": "1817-07-18"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    id_from_location(&response)
}

async fn create_genre(client: &Client, name: &str) -> i32 {
    let response = client
        .post(format!("{}/catalog/genre/create", BASE_URL))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    id_from_location(&response)
}

async fn create_book(client: &Client, title: &str, author_id: i32, genre_id: i32) -> i32 {
    let response = client
        .post(format!("{}/catalog/book/create", BASE_URL))
        .json(&json!({
            "title": title,
            "summary": "A test summary",
            "isbn": "9780000000000",
            "author": author_id,
            "genre": [genre_id]
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    id_from_location(&response)
}

async fn delete_record(client: &Client, kind: &str, id: i32) {
    let response = client
        .post(format!("{}/catalog/{}/{}/delete", BASE_URL, kind, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = client();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_catalog_index_counts() {
    let client = client();

    let response = client
        .get(format!("{}/catalog/", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["book_count"].is_number());
    assert!(body["book_instance_count"].is_number());
    assert!(body["book_instance_available_count"].is_number());
    assert!(body["author_count"].is_number());
    assert!(body["genre_count"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_create_author_and_detail() {
    let client = client();
    let author_id = create_author(&client, "Jane", "Austen").await;

    let response = client
        .get(format!("{}/catalog/author/{}", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["author"]["name"], "Austen Jane");
    assert_eq!(body["author"]["lifespan"], "1775/12/16 - 1817/07/18 (42)");
    assert!(body["author_books"].as_array().expect("No book list").is_empty());

    delete_record(&client, "author", author_id).await;
}

#[tokio::test]
#[ignore]
async fn test_create_author_validation() {
    let client = client();

    let response = client
        .post(format!("{}/catalog/author/create", BASE_URL))
        .json(&json!({
            "first_name": "",
            "family_name": "Nameless",
            "date_birth": "not-a-date"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    let errors = body["errors"].as_array().expect("No errors array");
    assert!(errors.iter().any(|e| e["field"] == "first_name"));
    assert!(errors.iter().any(|e| e["field"] == "date_birth"));
    // The submitted values come back for form re-rendering
    assert_eq!(body["author"]["family_name"], "Nameless");
}

#[tokio::test]
#[ignore]
async fn test_genre_create_is_idempotent_by_name() {
    let client = client();

    let first = client
        .post(format!("{}/catalog/genre/create", BASE_URL))
        .json(&json!({ "name": "Epic Poetry" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(first.status(), StatusCode::SEE_OTHER);
    let first_id = id_from_location(&first);

    // Same name again must land on the existing record
    let second = client
        .post(format!("{}/catalog/genre/create", BASE_URL))
        .json(&json!({ "name": "Epic Poetry" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(second.status(), StatusCode::SEE_OTHER);
    assert_eq!(id_from_location(&second), first_id);

    delete_record(&client, "genre", first_id).await;
}

#[tokio::test]
#[ignore]
async fn test_create_book_without_authors_rejected() {
    let client = client();

    let response = client
        .post(format!("{}/catalog/book/create", BASE_URL))
        .json(&json!({
            "title": "Orphan Book",
            "summary": "No author at all",
            "isbn": "9780000000001"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    let errors = body["errors"].as_array().expect("No errors array");
    assert!(errors
        .iter()
        .any(|e| e["field"] == "author" && e["message"] == "No authors were selected"));
}

#[tokio::test]
#[ignore]
async fn test_book_detail_with_relations() {
    let client = client();
    let author_id = create_author(&client, "Herman", "Melville").await;
    let genre_id = create_genre(&client, "Sea Stories").await;
    let book_id = create_book(&client, "Moby-Dick", author_id, genre_id).await;

    let response = client
        .get(format!("{}/catalog/book/{}", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["book"]["title"], "Moby-Dick");
    assert_eq!(body["book"]["authors"][0]["family_name"], "Melville");
    assert_eq!(body["book"]["genres"][0]["name"], "Sea Stories");
    assert!(body["book_instances"].as_array().expect("No copy list").is_empty());

    delete_record(&client, "book", book_id).await;
    delete_record(&client, "author", author_id).await;
    delete_record(&client, "genre", genre_id).await;
}

#[tokio::test]
#[ignore]
async fn test_delete_book_blocked_by_copies() {
    let client = client();
    let author_id = create_author(&client, "Bram", "Stoker").await;
    let genre_id = create_genre(&client, "Gothic").await;
    let book_id = create_book(&client, "Dracula", author_id, genre_id).await;

    let copy = client
        .post(format!("{}/catalog/bookinstance/create", BASE_URL))
        .json(&json!({
            "book": book_id,
            "imprint": "Archibald Constable, 1897",
            "status": "Available"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(copy.status(), StatusCode::SEE_OTHER);
    let copy_id = id_from_location(&copy);

    // The copy blocks the book delete
    let blocked = client
        .post(format!("{}/catalog/book/{}/delete", BASE_URL, book_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(blocked.status(), StatusCode::CONFLICT);

    let body: Value = blocked.json().await.expect("Failed to parse response");
    assert_eq!(body["book"]["id"], book_id);
    assert_eq!(body["book_instances"][0]["id"], copy_id);

    // Removing the copy unblocks it
    delete_record(&client, "bookinstance", copy_id).await;
    delete_record(&client, "book", book_id).await;
    delete_record(&client, "author", author_id).await;
    delete_record(&client, "genre", genre_id).await;
}

#[tokio::test]
#[ignore]
async fn test_delete_author_blocked_by_books() {
    let client = client();
    let author_id = create_author(&client, "Mary", "Shelley").await;
    let genre_id = create_genre(&client, "Science Fiction").await;
    let book_id = create_book(&client, "Frankenstein", author_id, genre_id).await;

    let blocked = client
        .post(format!("{}/catalog/author/{}/delete", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(blocked.status(), StatusCode::CONFLICT);

    let body: Value = blocked.json().await.expect("Failed to parse response");
    assert_eq!(body["author_books"][0]["title"], "Frankenstein");

    delete_record(&client, "book", book_id).await;
    delete_record(&client, "author", author_id).await;
    delete_record(&client, "genre", genre_id).await;
}

#[tokio::test]
#[ignore]
async fn test_create_book_with_unknown_author_leaves_no_row() {
    let client = client();

    // A reference to a nonexistent author must roll back the whole book
    let response = client
        .post(format!("{}/catalog/book/create", BASE_URL))
        .json(&json!({
            "title": "Phantom Tome",
            "summary": "References an author that does not exist",
            "isbn": "9780000000003",
            "author": 999999
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let list = client
        .get(format!("{}/catalog/books", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = list.json().await.expect("Failed to parse response");
    assert!(!body
        .as_array()
        .expect("No book list")
        .iter()
        .any(|b| b["title"] == "Phantom Tome"));
}

#[tokio::test]
#[ignore]
async fn test_delete_copy_form_shows_book() {
    let client = client();
    let author_id = create_author(&client, "Wilkie", "Collins").await;
    let genre_id = create_genre(&client, "Mystery").await;
    let book_id = create_book(&client, "The Moonstone", author_id, genre_id).await;

    let copy = client
        .post(format!("{}/catalog/bookinstance/create", BASE_URL))
        .json(&json!({
            "book": book_id,
            "imprint": "Tinsley Brothers, 1868",
            "status": "Available"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(copy.status(), StatusCode::SEE_OTHER);
    let copy_id = id_from_location(&copy);

    let response = client
        .get(format!("{}/catalog/bookinstance/{}/delete", BASE_URL, copy_id))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    // The confirmation view carries the referenced book
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["book"]["title"], "The Moonstone");

    delete_record(&client, "bookinstance", copy_id).await;
    delete_record(&client, "book", book_id).await;
    delete_record(&client, "author", author_id).await;
    delete_record(&client, "genre", genre_id).await;
}

#[tokio::test]
#[ignore]
async fn test_delete_missing_copy_redirects() {
    let client = client();

    let response = client
        .post(format!("{}/catalog/bookinstance/999999/delete", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers()["location"],
        "/catalog/bookinstances"
    );
}

#[tokio::test]
#[ignore]
async fn test_delete_body_id_overrides_path() {
    let client = client();
    let author_id = create_author(&client, "Ann", "Radcliffe").await;

    // The body id wins over the path id
    let response = client
        .post(format!("{}/catalog/author/999999/delete", BASE_URL))
        .json(&json!({ "authorid": author_id }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // The record named in the body is gone
    let detail = client
        .get(format!("{}/catalog/author/{}", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(detail.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_update_author_round_trip() {
    let client = client();
    let author_id = create_author(&client, "Jules", "Vern").await;

    let update = client
        .post(format!("{}/catalog/author/{}/update", BASE_URL, author_id))
        .json(&json!({
            "first_name": "Jules",
            "family_name": "Verne",
            "date_birth": "1828-02-08",
            "date_death": "1905-03-24"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(update.status(), StatusCode::SEE_OTHER);
    assert_eq!(id_from_location(&update), author_id);

    let detail = client
        .get(format!("{}/catalog/author/{}", BASE_URL, author_id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = detail.json().await.expect("Failed to parse response");
    assert_eq!(body["author"]["name"], "Verne Jules");

    delete_record(&client, "author", author_id).await;
}

#[tokio::test]
#[ignore]
async fn test_update_missing_book_not_found() {
    let client = client();

    let response = client
        .post(format!("{}/catalog/book/999999/update", BASE_URL))
        .json(&json!({
            "title": "Ghost",
            "summary": "Does not exist",
            "isbn": "9780000000002",
            "author": 1
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_create_copy_without_book_rejected() {
    let client = client();

    let response = client
        .post(format!("{}/catalog/bookinstance/create", BASE_URL))
        .json(&json!({
            "imprint": "Nowhere Press",
            "status": "Available"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.expect("Failed to parse response");
    let errors = body["errors"].as_array().expect("No errors array");
    assert!(errors
        .iter()
        .any(|e| e["field"] == "book" && e["message"] == "Book must be specified"));
}
