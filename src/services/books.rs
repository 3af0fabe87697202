//! Book workflow: validated writes with author/genre reference sets and
//! copy-checked deletes

use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{to_id_set, Book, BookPayload, NewBook},
        book_instance::BookInstance,
        genre::Genre,
    },
    repository::Repository,
    services::{validate, DeleteOutcome, FieldError, SaveOutcome},
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
}

impl BooksService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all books, title ascending, authors populated
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Book with relations plus every copy of it, fetched concurrently
    pub async fn detail(&self, id: i32) -> AppResult<(Book, Vec<BookInstance>)> {
        tokio::try_join!(
            self.repository.books.get_with_relations(id),
            self.repository.book_instances.find_by_book(id),
        )
    }

    /// All authors and genres, for populating the book form
    pub async fn form_data(&self) -> AppResult<(Vec<Author>, Vec<Genre>)> {
        tokio::try_join!(self.repository.authors.list(), self.repository.genres.list())
    }

    /// Validate and create a book with its author/genre references
    pub async fn create(&self, payload: &BookPayload) -> AppResult<SaveOutcome<Book>> {
        let new = match Self::validate(payload) {
            Ok(new) => new,
            Err(errors) => return Ok(SaveOutcome::Rejected(errors)),
        };

        let book = self.repository.books.create(&new).await?;
        tracing::info!("Created book {} ({})", book.id, book.title);
        Ok(SaveOutcome::Saved(book))
    }

    /// Validate and replace all fields and references of an existing book
    pub async fn update(&self, id: i32, payload: &BookPayload) -> AppResult<SaveOutcome<Book>> {
        let new = match Self::validate(payload) {
            Ok(new) => new,
            Err(errors) => return Ok(SaveOutcome::Rejected(errors)),
        };

        let book = self
            .repository
            .books
            .update(id, &new)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        Ok(SaveOutcome::Saved(book))
    }

    /// Book plus dependents for the delete confirmation view;
    /// `None` when the book is already gone
    pub async fn delete_view(&self, id: i32) -> AppResult<Option<(Book, Vec<BookInstance>)>> {
        let (book, copies) = tokio::try_join!(
            self.repository.books.find_with_relations(id),
            self.repository.book_instances.find_by_book(id),
        )?;

        Ok(book.map(|b| (b, copies)))
    }

    /// Delete a book unless copies of it still exist.
    /// The dependents check and the delete are not atomic; a copy created
    /// concurrently can slip past the check.
    pub async fn delete(&self, id: i32) -> AppResult<DeleteOutcome<(Book, Vec<BookInstance>)>> {
        let (book, copies) = tokio::try_join!(
            self.repository.books.find_with_relations(id),
            self.repository.book_instances.find_by_book(id),
        )?;

        let Some(book) = book else {
            return Ok(DeleteOutcome::Missing);
        };

        if !copies.is_empty() {
            return Ok(DeleteOutcome::Blocked((book, copies)));
        }

        self.repository.books.delete(id).await?;
        tracing::info!("Deleted book {}", id);
        Ok(DeleteOutcome::Deleted)
    }

    fn validate(payload: &BookPayload) -> Result<NewBook, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = validate::non_empty(
            "title",
            &payload.title,
            "Title must not be empty.",
            &mut errors,
        );
        let summary = validate::non_empty(
            "summary",
            &payload.summary,
            "Summary must not be empty.",
            &mut errors,
        );
        let isbn = validate::non_empty(
            "isbn",
            &payload.isbn,
            "ISBN must not be empty.",
            &mut errors,
        );

        let authors = to_id_set(payload.author.as_ref());
        let genres = to_id_set(payload.genre.as_ref());

        // Cross-field rule: a book without authors is never valid
        if authors.is_empty() {
            errors.push(FieldError::new("author", "No authors were selected", ""));
        }

        if errors.is_empty() {
            Ok(NewBook {
                title,
                summary,
                isbn,
                authors,
                genres,
            })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::book::IdSelection;

    fn payload() -> BookPayload {
        BookPayload {
            title: "T".to_string(),
            summary: "S".to_string(),
            isbn: "123".to_string(),
            author: Some(IdSelection::One(1)),
            genre: None,
        }
    }

    #[test]
    fn valid_payload_normalizes_references() {
        let new = BooksService::validate(&payload()).unwrap();
        assert_eq!(new.authors, vec![1]);
        assert!(new.genres.is_empty());
    }

    #[test]
    fn missing_author_set_is_a_field_error() {
        let mut p = payload();
        p.author = None;
        let errors = BooksService::validate(&p).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "author");
        assert_eq!(errors[0].message, "No authors were selected");
    }

    #[test]
    fn empty_author_list_is_a_field_error() {
        let mut p = payload();
        p.author = Some(IdSelection::Many(vec![]));
        let errors = BooksService::validate(&p).unwrap_err();
        assert_eq!(errors[0].field, "author");
    }

    #[test]
    fn blank_text_fields_are_rejected_per_field() {
        let p = BookPayload {
            author: Some(IdSelection::One(1)),
            ..Default::default()
        };
        let errors = BooksService::validate(&p).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "summary", "isbn"]);
    }

    #[test]
    fn duplicate_genre_ids_are_collapsed() {
        let mut p = payload();
        p.genre = Some(IdSelection::Many(vec![2, 2, 3]));
        let new = BooksService::validate(&p).unwrap();
        assert_eq!(new.genres, vec![2, 3]);
    }
}
