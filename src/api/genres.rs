//! Genre endpoints

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
    models::genre::{Genre, GenrePayload},
    services::{DeleteOutcome, FieldError, SaveOutcome},
    AppState,
};

use super::books::BookView;

/// Genre with its canonical URL
#[derive(Serialize, ToSchema)]
pub struct GenreView {
    pub id: i32,
    pub name: String,
    pub url: String,
}

impl From<Genre> for GenreView {
    fn from(genre: Genre) -> Self {
        Self {
            url: genre.url(),
            id: genre.id,
            name: genre.name,
        }
    }
}

/// Genre detail view: the genre plus every book referencing it
#[derive(Serialize, ToSchema)]
pub struct GenreDetailView {
    pub genre: GenreView,
    pub genre_books: Vec<BookView>,
}

/// Genre form view, re-rendered with errors on rejected submissions
#[derive(Serialize, ToSchema)]
pub struct GenreFormView {
    pub genre: Option<GenrePayload>,
    pub errors: Vec<FieldError>,
}

/// Delete confirmation view: blocking books must be resolved first
#[derive(Serialize, ToSchema)]
pub struct GenreDeleteView {
    pub genre: GenreView,
    pub genre_books: Vec<BookView>,
}

/// Delete submission body; overrides the path identifier when present
#[derive(Deserialize, ToSchema)]
pub struct DeleteGenreForm {
    pub genreid: Option<i32>,
}

/// List all genres
#[utoipa::path(
    get,
    path = "/catalog/genres",
    tag = "genres",
    responses(
        (status = 200, description = "List of genres", body = Vec<GenreView>)
    )
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Json<Vec<GenreView>>> {
    let genres = state.services.genres.list().await?;
    Ok(Json(genres.into_iter().map(GenreView::from).collect()))
}

/// Genre detail with its books
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre detail", body = GenreDetailView),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<GenreDetailView>> {
    let (genre, books) = state.services.genres.detail(id).await?;
    Ok(Json(GenreDetailView {
        genre: genre.into(),
        genre_books: books.into_iter().map(BookView::from).collect(),
    }))
}

/// Empty genre creation form
#[utoipa::path(
    get,
    path = "/catalog/genre/create",
    tag = "genres",
    responses(
        (status = 200, description = "Genre form", body = GenreFormView)
    )
)]
pub async fn create_genre_form() -> Json<GenreFormView> {
    Json(GenreFormView {
        genre: None,
        errors: vec![],
    })
}

/// Create a genre; an existing genre with the same name is reused, and both
/// cases redirect to the record
#[utoipa::path(
    post,
    path = "/catalog/genre/create",
    tag = "genres",
    request_body = GenrePayload,
    responses(
        (status = 303, description = "Genre created or already present, redirect to detail"),
        (status = 400, description = "Validation failed", body = GenreFormView)
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    Json(payload): Json<GenrePayload>,
) -> AppResult<Response> {
    match state.services.genres.create(&payload).await? {
        SaveOutcome::Saved(genre) => Ok(Redirect::to(&genre.url()).into_response()),
        SaveOutcome::Rejected(errors) => Ok((
            StatusCode::BAD_REQUEST,
            Json(GenreFormView {
                genre: Some(payload),
                errors,
            }),
        )
            .into_response()),
    }
}

/// Genre update form, pre-filled from the stored record
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre form", body = GenreFormView),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn update_genre_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<GenreFormView>> {
    let (genre, _books) = state.services.genres.detail(id).await?;
    Ok(Json(GenreFormView {
        genre: Some(GenrePayload { name: genre.name }),
        errors: vec![],
    }))
}

/// Update a genre; redirects to the record on success
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    request_body = GenrePayload,
    responses(
        (status = 303, description = "Genre updated, redirect to detail"),
        (status = 400, description = "Validation failed", body = GenreFormView),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<GenrePayload>,
) -> AppResult<Response> {
    match state.services.genres.update(id, &payload).await? {
        SaveOutcome::Saved(genre) => Ok(Redirect::to(&genre.url()).into_response()),
        SaveOutcome::Rejected(errors) => Ok((
            StatusCode::BAD_REQUEST,
            Json(GenreFormView {
                genre: Some(payload),
                errors,
            }),
        )
            .into_response()),
    }
}

/// Delete confirmation view; an already-missing genre redirects to the list
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Delete confirmation", body = GenreDeleteView),
        (status = 303, description = "Genre already gone, redirect to list")
    )
)]
pub async fn delete_genre_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Response> {
    match state.services.genres.delete_view(id).await? {
        Some((genre, books)) => Ok(Json(GenreDeleteView {
            genre: genre.into(),
            genre_books: books.into_iter().map(BookView::from).collect(),
        })
        .into_response()),
        None => Ok(Redirect::to("/catalog/genres").into_response()),
    }
}

/// Delete a genre unless books still reference it
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(("id" = i32, Path, description = "Genre ID")),
    request_body = DeleteGenreForm,
    responses(
        (status = 303, description = "Genre deleted (or already gone), redirect to list"),
        (status = 409, description = "Genre still has books", body = GenreDeleteView)
    )
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    form: Option<Json<DeleteGenreForm>>,
) -> AppResult<Response> {
    let id = form.and_then(|Json(f)| f.genreid).unwrap_or(id);

    match state.services.genres.delete(id).await? {
        DeleteOutcome::Deleted | DeleteOutcome::Missing => {
            Ok(Redirect::to("/catalog/genres").into_response())
        }
        DeleteOutcome::Blocked((genre, books)) => Ok((
            StatusCode::CONFLICT,
            Json(GenreDeleteView {
                genre: genre.into(),
                genre_books: books.into_iter().map(BookView::from).collect(),
            }),
        )
            .into_response()),
    }
}
