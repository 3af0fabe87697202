//! Business logic services: the integrity-checked mutation workflow
//! for each catalog entity.

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;
pub mod validate;

pub use validate::FieldError;

use crate::repository::Repository;

/// Outcome of a validated create/update.
/// `Rejected` carries the field-level errors; nothing was persisted.
#[derive(Debug)]
pub enum SaveOutcome<T> {
    Saved(T),
    Rejected(Vec<FieldError>),
}

/// Outcome of a dependent-record-checked delete.
/// `Blocked` carries whatever the confirmation view needs to re-present the
/// dependents; `Missing` means the record was already gone, which callers
/// treat as success.
#[derive(Debug)]
pub enum DeleteOutcome<T> {
    Deleted,
    Blocked(T),
    Missing,
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub genres: genres::GenresService,
    pub books: books::BooksService,
    pub book_instances: book_instances::BookInstancesService,
    pub catalog: catalog::CatalogService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone()),
            genres: genres::GenresService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            book_instances: book_instances::BookInstancesService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository),
        }
    }
}
