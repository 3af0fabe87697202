//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, book_instances, books, catalog, genres, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Librarium API",
        version = "0.3.0",
        description = "Library Catalog Server",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/", description = "Catalog server")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Home
        catalog::index,
        // Books
        books::list_books,
        books::get_book,
        books::create_book_form,
        books::create_book,
        books::update_book_form,
        books::update_book,
        books::delete_book_form,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author_form,
        authors::create_author,
        authors::update_author_form,
        authors::update_author,
        authors::delete_author_form,
        authors::delete_author,
        // Genres
        genres::list_genres,
        genres::get_genre,
        genres::create_genre_form,
        genres::create_genre,
        genres::update_genre_form,
        genres::update_genre,
        genres::delete_genre_form,
        genres::delete_genre,
        // Book instances
        book_instances::list_book_instances,
        book_instances::get_book_instance,
        book_instances::create_book_instance_form,
        book_instances::create_book_instance,
        book_instances::update_book_instance_form,
        book_instances::update_book_instance,
        book_instances::delete_book_instance_form,
        book_instances::delete_book_instance,
    ),
    components(
        schemas(
            // Health
            health::HealthResponse,
            // Home
            crate::services::catalog::CatalogCounts,
            // Authors
            authors::AuthorView,
            authors::AuthorDetailView,
            authors::AuthorFormView,
            authors::AuthorDeleteView,
            authors::DeleteAuthorForm,
            crate::models::author::Author,
            crate::models::author::AuthorPayload,
            // Genres
            genres::GenreView,
            genres::GenreDetailView,
            genres::GenreFormView,
            genres::GenreDeleteView,
            genres::DeleteGenreForm,
            crate::models::genre::Genre,
            crate::models::genre::GenrePayload,
            // Books
            books::BookView,
            books::BookDetailView,
            books::BookFormView,
            books::BookDeleteView,
            books::DeleteBookForm,
            crate::models::book::Book,
            crate::models::book::BookPayload,
            crate::models::book::IdSelection,
            // Book instances
            book_instances::BookInstanceView,
            book_instances::BookInstanceFormView,
            book_instances::DeleteBookInstanceForm,
            crate::models::book_instance::BookInstance,
            crate::models::book_instance::BookInstancePayload,
            crate::models::book_instance::InstanceStatus,
            // Shared
            crate::services::validate::FieldError,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "catalog", description = "Catalog home"),
        (name = "books", description = "Book records"),
        (name = "authors", description = "Author records"),
        (name = "genres", description = "Genre records"),
        (name = "bookinstances", description = "Physical copies"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
