//! Book instance (copy) endpoints

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
    models::book_instance::{BookInstance, BookInstancePayload},
    services::{DeleteOutcome, FieldError, SaveOutcome},
    AppState,
};

use super::books::BookView;

/// Copy with its derived display fields
#[derive(Serialize, ToSchema)]
pub struct BookInstanceView {
    pub id: i32,
    pub book_id: i32,
    pub imprint: String,
    pub status: String,
    pub due_back: Option<NaiveDate>,
    pub due_back_formatted: String,
    pub url: String,
    pub book: Option<BookView>,
}

impl From<BookInstance> for BookInstanceView {
    fn from(instance: BookInstance) -> Self {
        Self {
            status: instance.status_label(),
            due_back_formatted: instance.due_back_formatted(),
            url: instance.url(),
            id: instance.id,
            book_id: instance.book_id,
            imprint: instance.imprint,
            due_back: instance.due_back,
            book: instance.book.map(BookView::from),
        }
    }
}

/// Copy form view with the book selector list, re-rendered with errors on
/// rejected submissions
#[derive(Serialize, ToSchema)]
pub struct BookInstanceFormView {
    pub bookinstance: Option<BookInstancePayload>,
    pub book_list: Vec<BookView>,
    pub errors: Vec<FieldError>,
}

/// Delete submission body; overrides the path identifier when present
#[derive(Deserialize, ToSchema)]
pub struct DeleteBookInstanceForm {
    pub copyid: Option<i32>,
}

/// List all copies
#[utoipa::path(
    get,
    path = "/catalog/bookinstances",
    tag = "bookinstances",
    responses(
        (status = 200, description = "List of copies", body = Vec<BookInstanceView>)
    )
)]
pub async fn list_book_instances(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<BookInstanceView>>> {
    let instances = state.services.book_instances.list().await?;
    Ok(Json(
        instances.into_iter().map(BookInstanceView::from).collect(),
    ))
}

/// Copy detail with its book
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Copy detail", body = BookInstanceView),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn get_book_instance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookInstanceView>> {
    let instance = state.services.book_instances.detail(id).await?;
    Ok(Json(instance.into()))
}

/// Copy creation form with the book selector list
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    responses(
        (status = 200, description = "Copy form", body = BookInstanceFormView)
    )
)]
pub async fn create_book_instance_form(
    State(state): State<AppState>,
) -> AppResult<Json<BookInstanceFormView>> {
    let books = state.services.book_instances.form_books().await?;
    Ok(Json(BookInstanceFormView {
        bookinstance: None,
        book_list: books.into_iter().map(BookView::from).collect(),
        errors: vec![],
    }))
}

/// Create a copy; redirects to the new record on success
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/create",
    tag = "bookinstances",
    request_body = BookInstancePayload,
    responses(
        (status = 303, description = "Copy created, redirect to detail"),
        (status = 400, description = "Validation failed", body = BookInstanceFormView)
    )
)]
pub async fn create_book_instance(
    State(state): State<AppState>,
    Json(payload): Json<BookInstancePayload>,
) -> AppResult<Response> {
    match state.services.book_instances.create(&payload).await? {
        SaveOutcome::Saved(instance) => Ok(Redirect::to(&instance.url()).into_response()),
        SaveOutcome::Rejected(errors) => {
            let books = state.services.book_instances.form_books().await?;
            Ok((
                StatusCode::BAD_REQUEST,
                Json(BookInstanceFormView {
                    bookinstance: Some(payload),
                    book_list: books.into_iter().map(BookView::from).collect(),
                    errors,
                }),
            )
                .into_response())
        }
    }
}

/// Copy update form, pre-filled with the stored fields
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Copy form", body = BookInstanceFormView),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn update_book_instance_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookInstanceFormView>> {
    let (instance, books) = tokio::try_join!(
        state.services.book_instances.detail(id),
        state.services.book_instances.form_books(),
    )?;

    Ok(Json(BookInstanceFormView {
        bookinstance: Some(BookInstancePayload::from(&instance)),
        book_list: books.into_iter().map(BookView::from).collect(),
        errors: vec![],
    }))
}

/// Update a copy; redirects to the record on success
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/update",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Book instance ID")),
    request_body = BookInstancePayload,
    responses(
        (status = 303, description = "Copy updated, redirect to detail"),
        (status = 400, description = "Validation failed", body = BookInstanceFormView),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn update_book_instance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<BookInstancePayload>,
) -> AppResult<Response> {
    match state.services.book_instances.update(id, &payload).await? {
        SaveOutcome::Saved(instance) => Ok(Redirect::to(&instance.url()).into_response()),
        SaveOutcome::Rejected(errors) => {
            let books = state.services.book_instances.form_books().await?;
            Ok((
                StatusCode::BAD_REQUEST,
                Json(BookInstanceFormView {
                    bookinstance: Some(payload),
                    book_list: books.into_iter().map(BookView::from).collect(),
                    errors,
                }),
            )
                .into_response())
        }
    }
}

/// Delete confirmation view; an already-missing copy redirects to the list
#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Book instance ID")),
    responses(
        (status = 200, description = "Delete confirmation", body = BookInstanceView),
        (status = 303, description = "Copy already gone, redirect to list")
    )
)]
pub async fn delete_book_instance_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    match state.services.book_instances.delete_view(id).await? {
        Some(instance) => Ok(Json(BookInstanceView::from(instance)).into_response()),
        None => Ok(Redirect::to("/catalog/bookinstances").into_response()),
    }
}

/// Delete a copy; copies have no dependents so this never blocks
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/delete",
    tag = "bookinstances",
    params(("id" = i32, Path, description = "Book instance ID")),
    request_body = DeleteBookInstanceForm,
    responses(
        (status = 303, description = "Copy deleted (or already gone), redirect to list")
    )
)]
pub async fn delete_book_instance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    form: Option<Json<DeleteBookInstanceForm>>,
) -> AppResult<Response> {
    let id = form.and_then(|Json(f)| f.copyid).unwrap_or(id);

    match state.services.book_instances.delete(id).await? {
        DeleteOutcome::Deleted | DeleteOutcome::Missing | DeleteOutcome::Blocked(()) => {
            Ok(Redirect::to("/catalog/bookinstances").into_response())
        }
    }
}
