//! Author workflow: validated writes and dependent-checked deletes

use crate::{
    error::{AppError, AppResult},
    models::{
        author::{Author, AuthorPayload, NewAuthor},
        book::Book,
    },
    repository::Repository,
    services::{validate, DeleteOutcome, FieldError, SaveOutcome},
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all authors, family name ascending
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.repository.authors.list().await
    }

    /// Author plus every book referencing them, fetched concurrently
    pub async fn detail(&self, id: i32) -> AppResult<(Author, Vec<Book>)> {
        tokio::try_join!(
            self.repository.authors.get(id),
            self.repository.books.find_by_author(id),
        )
    }

    /// Validate and create an author
    pub async fn create(&self, payload: &AuthorPayload) -> AppResult<SaveOutcome<Author>> {
        let new = match Self::validate(payload) {
            Ok(new) => new,
            Err(errors) => return Ok(SaveOutcome::Rejected(errors)),
        };

        let author = self.repository.authors.create(&new).await?;
        tracing::info!("Created author {} ({})", author.id, author.name());
        Ok(SaveOutcome::Saved(author))
    }

    /// Validate and replace all fields of an existing author
    pub async fn update(&self, id: i32, payload: &AuthorPayload) -> AppResult<SaveOutcome<Author>> {
        let new = match Self::validate(payload) {
            Ok(new) => new,
            Err(errors) => return Ok(SaveOutcome::Rejected(errors)),
        };

        let author = self
            .repository
            .authors
            .update(id, &new)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))?;

        Ok(SaveOutcome::Saved(author))
    }

    /// Author plus dependents for the delete confirmation view;
    /// `None` when the author is already gone
    pub async fn delete_view(&self, id: i32) -> AppResult<Option<(Author, Vec<Book>)>> {
        let (author, books) = tokio::try_join!(
            self.repository.authors.find(id),
            self.repository.books.find_by_author(id),
        )?;

        Ok(author.map(|a| (a, books)))
    }

    /// Delete an author unless books still reference them.
    /// The dependents check and the delete are not atomic; a book created
    /// concurrently can slip past the check.
    pub async fn delete(&self, id: i32) -> AppResult<DeleteOutcome<(Author, Vec<Book>)>> {
        let (author, books) = tokio::try_join!(
            self.repository.authors.find(id),
            self.repository.books.find_by_author(id),
        )?;

        let Some(author) = author else {
            return Ok(DeleteOutcome::Missing);
        };

        if !books.is_empty() {
            return Ok(DeleteOutcome::Blocked((author, books)));
        }

        self.repository.authors.delete(id).await?;
        tracing::info!("Deleted author {}", id);
        Ok(DeleteOutcome::Deleted)
    }

    fn validate(payload: &AuthorPayload) -> Result<NewAuthor, Vec<FieldError>> {
        let mut errors = Vec::new();

        let first_name = validate::non_empty(
            "first_name",
            &payload.first_name,
            "First name must be specified.",
            &mut errors,
        );
        validate::alphanumeric(
            "first_name",
            &payload.first_name,
            "First name has non-alphanumeric characters.",
            &mut errors,
        );

        let family_name = validate::non_empty(
            "family_name",
            &payload.family_name,
            "Family name must be specified.",
            &mut errors,
        );
        validate::alphanumeric(
            "family_name",
            &payload.family_name,
            "Family name has non-alphanumeric characters.",
            &mut errors,
        );

        let date_birth = validate::optional_date(
            "date_birth",
            payload.date_birth.as_deref(),
            "Invalid date of birth",
            &mut errors,
        );
        let date_death = validate::optional_date(
            "date_death",
            payload.date_death.as_deref(),
            "Invalid date of death",
            &mut errors,
        );

        if errors.is_empty() {
            Ok(NewAuthor {
                first_name,
                family_name,
                date_birth,
                date_death,
            })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(first: &str, family: &str) -> AuthorPayload {
        AuthorPayload {
            first_name: first.to_string(),
            family_name: family.to_string(),
            date_birth: None,
            date_death: None,
        }
    }

    #[test]
    fn valid_payload_is_trimmed() {
        let new = AuthorsService::validate(&payload(" Jane ", "Austen")).unwrap();
        assert_eq!(new.first_name, "Jane");
        assert_eq!(new.family_name, "Austen");
        assert_eq!(new.date_birth, None);
    }

    #[test]
    fn empty_names_are_rejected_per_field() {
        let errors = AuthorsService::validate(&payload("", "")).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["first_name", "family_name"]);
    }

    #[test]
    fn non_alphanumeric_name_is_rejected() {
        let errors = AuthorsService::validate(&payload("Jane", "O'Brien")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "family_name");
        assert_eq!(errors[0].value, "O'Brien");
    }

    #[test]
    fn malformed_dates_are_rejected_with_input_preserved() {
        let mut p = payload("Jane", "Austen");
        p.date_birth = Some("not-a-date".to_string());
        let errors = AuthorsService::validate(&p).unwrap_err();
        assert_eq!(errors[0].field, "date_birth");
        assert_eq!(errors[0].value, "not-a-date");
    }

    #[test]
    fn valid_dates_are_parsed() {
        let mut p = payload("Jane", "Austen");
        p.date_birth = Some("1775-12-16".to_string());
        p.date_death = Some("1817-07-18".to_string());
        let new = AuthorsService::validate(&p).unwrap();
        assert!(new.date_birth.is_some());
        assert!(new.date_death.is_some());
    }
}
