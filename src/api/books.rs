//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        author::Author,
        book::{to_id_set, Book, BookPayload},
        genre::Genre,
    },
    services::{DeleteOutcome, FieldError, SaveOutcome},
    AppState,
};

use super::{authors::AuthorView, book_instances::BookInstanceView, genres::GenreView, Selectable};

/// Book with its relations and canonical URL
#[derive(Serialize, ToSchema)]
pub struct BookView {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub url: String,
    pub authors: Vec<AuthorView>,
    pub genres: Vec<GenreView>,
}

impl From<Book> for BookView {
    fn from(book: Book) -> Self {
        Self {
            url: book.url(),
            id: book.id,
            title: book.title,
            summary: book.summary,
            isbn: book.isbn,
            authors: book.authors.into_iter().map(AuthorView::from).collect(),
            genres: book.genres.into_iter().map(GenreView::from).collect(),
        }
    }
}

/// Book detail view: the book plus every copy of it
#[derive(Serialize, ToSchema)]
pub struct BookDetailView {
    pub book: BookView,
    pub book_instances: Vec<BookInstanceView>,
}

/// Book form view: all authors and genres with their pre-selection state,
/// re-rendered with errors on rejected submissions
#[derive(Serialize, ToSchema)]
pub struct BookFormView {
    pub book: Option<BookPayload>,
    pub authors: Vec<Selectable<AuthorView>>,
    pub genres: Vec<Selectable<GenreView>>,
    pub errors: Vec<FieldError>,
}

/// Delete confirmation view: blocking copies must be resolved first
#[derive(Serialize, ToSchema)]
pub struct BookDeleteView {
    pub book: BookView,
    pub book_instances: Vec<BookInstanceView>,
}

/// Delete submission body; overrides the path identifier when present
#[derive(Deserialize, ToSchema)]
pub struct DeleteBookForm {
    pub bookid: Option<i32>,
}

fn form_view(
    book: Option<BookPayload>,
    authors: Vec<Author>,
    genres: Vec<Genre>,
    errors: Vec<FieldError>,
) -> BookFormView {
    let selected_authors = to_id_set(book.as_ref().and_then(|b| b.author.as_ref()));
    let selected_genres = to_id_set(book.as_ref().and_then(|b| b.genre.as_ref()));

    BookFormView {
        book,
        authors: authors
            .into_iter()
            .map(|a| Selectable {
                is_selected: selected_authors.contains(&a.id),
                record: AuthorView::from(a),
            })
            .collect(),
        genres: genres
            .into_iter()
            .map(|g| Selectable {
                is_selected: selected_genres.contains(&g.id),
                record: GenreView::from(g),
            })
            .collect(),
        errors,
    }
}

/// List all books with their authors
#[utoipa::path(
    get,
    path = "/catalog/books",
    tag = "books",
    responses(
        (status = 200, description = "List of books", body = Vec<BookView>)
    )
)]
pub async fn list_books(State(state): State<AppState>) -> AppResult<Json<Vec<BookView>>> {
    let books = state.services.books.list().await?;
    Ok(Json(books.into_iter().map(BookView::from).collect()))
}

/// Book detail with its copies
#[utoipa::path(
    get,
    path = "/catalog/book/{id}",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book detail", body = BookDetailView),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetailView>> {
    let (book, copies) = state.services.books.detail(id).await?;
    Ok(Json(BookDetailView {
        book: book.into(),
        book_instances: copies.into_iter().map(BookInstanceView::from).collect(),
    }))
}

/// Book creation form with all authors and genres to pick from
#[utoipa::path(
    get,
    path = "/catalog/book/create",
    tag = "books",
    responses(
        (status = 200, description = "Book form", body = BookFormView)
    )
)]
pub async fn create_book_form(State(state): State<AppState>) -> AppResult<Json<BookFormView>> {
    let (authors, genres) = state.services.books.form_data().await?;
    Ok(Json(form_view(None, authors, genres, vec![])))
}

/// Create a book; redirects to the new record on success. On validation
/// failure the form is re-rendered with the submitted selections marked.
#[utoipa::path(
    post,
    path = "/catalog/book/create",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 303, description = "Book created, redirect to detail"),
        (status = 400, description = "Validation failed", body = BookFormView)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    Json(payload): Json<BookPayload>,
) -> AppResult<Response> {
    match state.services.books.create(&payload).await? {
        SaveOutcome::Saved(book) => Ok(Redirect::to(&book.url()).into_response()),
        SaveOutcome::Rejected(errors) => {
            let (authors, genres) = state.services.books.form_data().await?;
            Ok((
                StatusCode::BAD_REQUEST,
                Json(form_view(Some(payload), authors, genres, errors)),
            )
                .into_response())
        }
    }
}

/// Book update form, pre-filled with the stored fields and selections
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/update",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book form", body = BookFormView),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookFormView>> {
    let ((book, _copies), (authors, genres)) = tokio::try_join!(
        state.services.books.detail(id),
        state.services.books.form_data(),
    )?;

    Ok(Json(form_view(
        Some(BookPayload::from(&book)),
        authors,
        genres,
        vec![],
    )))
}

/// Update a book; redirects to the record on success
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/update",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 303, description = "Book updated, redirect to detail"),
        (status = 400, description = "Validation failed", body = BookFormView),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<BookPayload>,
) -> AppResult<Response> {
    match state.services.books.update(id, &payload).await? {
        SaveOutcome::Saved(book) => Ok(Redirect::to(&book.url()).into_response()),
        SaveOutcome::Rejected(errors) => {
            let (authors, genres) = state.services.books.form_data().await?;
            Ok((
                StatusCode::BAD_REQUEST,
                Json(form_view(Some(payload), authors, genres, errors)),
            )
                .into_response())
        }
    }
}

/// Delete confirmation view; an already-missing book redirects to the list
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/delete",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Delete confirmation", body = BookDeleteView),
        (status = 303, description = "Book already gone, redirect to list")
    )
)]
pub async fn delete_book_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    match state.services.books.delete_view(id).await? {
        Some((book, copies)) => Ok(Json(BookDeleteView {
            book: book.into(),
            book_instances: copies.into_iter().map(BookInstanceView::from).collect(),
        })
        .into_response()),
        None => Ok(Redirect::to("/catalog/books").into_response()),
    }
}

/// Delete a book unless copies of it still exist
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/delete",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    request_body = DeleteBookForm,
    responses(
        (status = 303, description = "Book deleted (or already gone), redirect to list"),
        (status = 409, description = "Book still has copies", body = BookDeleteView)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    form: Option<Json<DeleteBookForm>>,
) -> AppResult<Response> {
    let id = form.and_then(|Json(f)| f.bookid).unwrap_or(id);

    match state.services.books.delete(id).await? {
        DeleteOutcome::Deleted | DeleteOutcome::Missing => {
            Ok(Redirect::to("/catalog/books").into_response())
        }
        DeleteOutcome::Blocked((book, copies)) => Ok((
            StatusCode::CONFLICT,
            Json(BookDeleteView {
                book: book.into(),
                book_instances: copies.into_iter().map(BookInstanceView::from).collect(),
            }),
        )
            .into_response()),
    }
}
