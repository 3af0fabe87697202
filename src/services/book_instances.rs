//! Book instance (copy) workflow. Copies have no dependents, so deletes are
//! only ever Deleted or Missing.

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        book_instance::{BookInstance, BookInstancePayload, InstanceStatus, NewBookInstance},
    },
    repository::Repository,
    services::{validate, DeleteOutcome, FieldError, SaveOutcome},
};

#[derive(Clone)]
pub struct BookInstancesService {
    repository: Repository,
}

impl BookInstancesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all copies with their book populated
    pub async fn list(&self) -> AppResult<Vec<BookInstance>> {
        self.repository.book_instances.list().await
    }

    /// A single copy with its book populated
    pub async fn detail(&self, id: i32) -> AppResult<BookInstance> {
        self.repository.book_instances.get_with_book(id).await
    }

    /// All books, for populating the copy form's book selector
    pub async fn form_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Validate and create a copy
    pub async fn create(&self, payload: &BookInstancePayload) -> AppResult<SaveOutcome<BookInstance>> {
        let new = match Self::validate(payload) {
            Ok(new) => new,
            Err(errors) => return Ok(SaveOutcome::Rejected(errors)),
        };

        let instance = self.repository.book_instances.create(&new).await?;
        tracing::info!("Created book instance {} for book {}", instance.id, instance.book_id);
        Ok(SaveOutcome::Saved(instance))
    }

    /// Validate and replace all fields of an existing copy
    pub async fn update(
        &self,
        id: i32,
        payload: &BookInstancePayload,
    ) -> AppResult<SaveOutcome<BookInstance>> {
        let new = match Self::validate(payload) {
            Ok(new) => new,
            Err(errors) => return Ok(SaveOutcome::Rejected(errors)),
        };

        let instance = self
            .repository
            .book_instances
            .update(id, &new)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))?;

        Ok(SaveOutcome::Saved(instance))
    }

    /// The copy with its book for the delete confirmation view, `None` when
    /// already gone
    pub async fn delete_view(&self, id: i32) -> AppResult<Option<BookInstance>> {
        self.repository.book_instances.find_with_book(id).await
    }

    /// Delete a copy; a missing id counts as already deleted
    pub async fn delete(&self, id: i32) -> AppResult<DeleteOutcome<()>> {
        if self.repository.book_instances.find(id).await?.is_none() {
            return Ok(DeleteOutcome::Missing);
        }

        self.repository.book_instances.delete(id).await?;
        tracing::info!("Deleted book instance {}", id);
        Ok(DeleteOutcome::Deleted)
    }

    fn validate(payload: &BookInstancePayload) -> Result<NewBookInstance, Vec<FieldError>> {
        let mut errors = Vec::new();

        let book_id = match payload.book {
            Some(id) => id,
            None => {
                errors.push(FieldError::new("book", "Book must be specified", ""));
                0
            }
        };

        let imprint = validate::non_empty(
            "imprint",
            &payload.imprint,
            "Imprint must be specified",
            &mut errors,
        );

        let status = payload
            .status
            .as_deref()
            .map(InstanceStatus::parse)
            .unwrap_or_default();

        let due_back = validate::optional_date(
            "due_back",
            payload.due_back.as_deref(),
            "Invalid date",
            &mut errors,
        );

        if errors.is_empty() {
            Ok(NewBookInstance {
                book_id,
                imprint,
                status,
                due_back,
            })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> BookInstancePayload {
        BookInstancePayload {
            book: Some(1),
            imprint: "London, 1813".to_string(),
            status: Some("Available".to_string()),
            due_back: None,
        }
    }

    #[test]
    fn valid_payload_parses_status() {
        let new = BookInstancesService::validate(&payload()).unwrap();
        assert_eq!(new.book_id, 1);
        assert_eq!(new.status, InstanceStatus::Available);
        assert_eq!(new.due_back, None);
    }

    #[test]
    fn missing_book_reference_is_rejected() {
        let mut p = payload();
        p.book = None;
        let errors = BookInstancesService::validate(&p).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "book");
    }

    #[test]
    fn blank_imprint_is_rejected() {
        let mut p = payload();
        p.imprint = " ".to_string();
        let errors = BookInstancesService::validate(&p).unwrap_err();
        assert_eq!(errors[0].field, "imprint");
        assert_eq!(errors[0].message, "Imprint must be specified");
    }

    #[test]
    fn absent_status_defaults_to_maintenance() {
        let mut p = payload();
        p.status = None;
        let new = BookInstancesService::validate(&p).unwrap();
        assert_eq!(new.status, InstanceStatus::Maintenance);
    }

    #[test]
    fn malformed_due_back_is_rejected() {
        let mut p = payload();
        p.due_back = Some("soon".to_string());
        let errors = BookInstancesService::validate(&p).unwrap_err();
        assert_eq!(errors[0].field, "due_back");
        assert_eq!(errors[0].value, "soon");
    }
}
