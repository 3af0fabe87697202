//! Author endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::author::{Author, AuthorPayload},
    services::{DeleteOutcome, FieldError, SaveOutcome},
    AppState,
};

use super::books::BookView;

/// Author with its derived display fields, recomputed on every read
#[derive(Serialize, ToSchema)]
pub struct AuthorView {
    pub id: i32,
    pub first_name: String,
    pub family_name: String,
    pub date_birth: Option<NaiveDate>,
    pub date_death: Option<NaiveDate>,
    pub name: String,
    pub lifespan: String,
    pub date_birth_formatted: String,
    pub date_death_formatted: String,
    pub url: String,
}

impl From<Author> for AuthorView {
    fn from(author: Author) -> Self {
        Self {
            name: author.name(),
            lifespan: author.lifespan(),
            date_birth_formatted: author.date_birth_formatted(),
            date_death_formatted: author.date_death_formatted(),
            url: author.url(),
            id: author.id,
            first_name: author.first_name,
            family_name: author.family_name,
            date_birth: author.date_birth,
            date_death: author.date_death,
        }
    }
}

/// Author detail view: the author plus every book referencing them
#[derive(Serialize, ToSchema)]
pub struct AuthorDetailView {
    pub author: AuthorView,
    pub author_books: Vec<BookView>,
}

/// Author form view, re-rendered with errors on rejected submissions
#[derive(Serialize, ToSchema)]
pub struct AuthorFormView {
    pub author: Option<AuthorPayload>,
    pub errors: Vec<FieldError>,
}

/// Delete confirmation view: blocking books must be resolved first
#[derive(Serialize, ToSchema)]
pub struct AuthorDeleteView {
    pub author: AuthorView,
    pub author_books: Vec<BookView>,
}

/// Delete submission body; overrides the path identifier when present
#[derive(Deserialize, ToSchema)]
pub struct DeleteAuthorForm {
    pub authorid: Option<i32>,
}

/// List all authors
#[utoipa::path(
    get,
    path = "/catalog/authors",
    tag = "authors",
    responses(
        (status = 200, description = "List of authors", body = Vec<AuthorView>)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Json<Vec<AuthorView>>> {
    let authors = state.services.authors.list().await?;
    Ok(Json(authors.into_iter().map(AuthorView::from).collect()))
}

/// Author detail with their books
#[utoipa::path(
    get,
    path = "/catalog/author/{id}",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author detail", body = AuthorDetailView),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetailView>> {
    let (author, books) = state.services.authors.detail(id).await?;
    Ok(Json(AuthorDetailView {
        author: author.into(),
        author_books: books.into_iter().map(BookView::from).collect(),
    }))
}

/// Empty author creation form
#[utoipa::path(
    get,
    path = "/catalog/author/create",
    tag = "authors",
    responses(
        (status = 200, description = "Author form", body = AuthorFormView)
    )
)]
pub async fn create_author_form() -> Json<AuthorFormView> {
    Json(AuthorFormView {
        author: None,
        errors: vec![],
    })
}

/// Create an author; redirects to the new record on success
#[utoipa::path(
    post,
    path = "/catalog/author/create",
    tag = "authors",
    request_body = AuthorPayload,
    responses(
        (status = 303, description = "Author created, redirect to detail"),
        (status = 400, description = "Validation failed", body = AuthorFormView)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    Json(payload): Json<AuthorPayload>,
) -> AppResult<Response> {
    match state.services.authors.create(&payload).await? {
        SaveOutcome::Saved(author) => Ok(Redirect::to(&author.url()).into_response()),
        SaveOutcome::Rejected(errors) => Ok((
            StatusCode::BAD_REQUEST,
            Json(AuthorFormView {
                author: Some(payload),
                errors,
            }),
        )
            .into_response()),
    }
}

/// Author update form, pre-filled from the stored record
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author form", body = AuthorFormView),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorFormView>> {
    let (author, _books) = state.services.authors.detail(id).await?;
    Ok(Json(AuthorFormView {
        author: Some(AuthorPayload::from(&author)),
        errors: vec![],
    }))
}

/// Update an author; redirects to the record on success
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    request_body = AuthorPayload,
    responses(
        (status = 303, description = "Author updated, redirect to detail"),
        (status = 400, description = "Validation failed", body = AuthorFormView),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AuthorPayload>,
) -> AppResult<Response> {
    match state.services.authors.update(id, &payload).await? {
        SaveOutcome::Saved(author) => Ok(Redirect::to(&author.url()).into_response()),
        SaveOutcome::Rejected(errors) => Ok((
            StatusCode::BAD_REQUEST,
            Json(AuthorFormView {
                author: Some(payload),
                errors,
            }),
        )
            .into_response()),
    }
}

/// Delete confirmation view; an already-missing author redirects to the list
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Delete confirmation", body = AuthorDeleteView),
        (status = 303, description = "Author already gone, redirect to list")
    )
)]
pub async fn delete_author_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    match state.services.authors.delete_view(id).await? {
        Some((author, books)) => Ok(Json(AuthorDeleteView {
            author: author.into(),
            author_books: books.into_iter().map(BookView::from).collect(),
        })
        .into_response()),
        None => Ok(Redirect::to("/catalog/authors").into_response()),
    }
}

/// Delete an author unless books still reference them
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(("id" = i32, Path, description = "Author ID")),
    request_body = DeleteAuthorForm,
    responses(
        (status = 303, description = "Author deleted (or already gone), redirect to list"),
        (status = 409, description = "Author still has books", body = AuthorDeleteView)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    form: Option<Json<DeleteAuthorForm>>,
) -> AppResult<Response> {
    let id = form.and_then(|Json(f)| f.authorid).unwrap_or(id);

    match state.services.authors.delete(id).await? {
        DeleteOutcome::Deleted | DeleteOutcome::Missing => {
            Ok(Redirect::to("/catalog/authors").into_response())
        }
        DeleteOutcome::Blocked((author, books)) => Ok((
            StatusCode::CONFLICT,
            Json(AuthorDeleteView {
                author: author.into(),
                author_books: books.into_iter().map(BookView::from).collect(),
            }),
        )
            .into_response()),
    }
}
