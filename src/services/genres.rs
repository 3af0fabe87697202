//! Genre workflow: idempotent-by-name creation and dependent-checked deletes

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        genre::{Genre, GenrePayload, NewGenre},
    },
    repository::Repository,
    services::{validate, DeleteOutcome, FieldError, SaveOutcome},
};

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List all genres, name ascending
    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    /// Genre plus every book referencing it, fetched concurrently
    pub async fn detail(&self, id: i32) -> AppResult<(Genre, Vec<Book>)> {
        tokio::try_join!(
            self.repository.genres.get(id),
            self.repository.books.find_by_genre(id),
        )
    }

    /// Validate and create a genre. Creation is idempotent by name: when a
    /// genre with the same name already exists it is returned as-is and no
    /// duplicate is inserted. The find-then-insert sequence is not atomic,
    /// so concurrent creates of the same name can still race.
    pub async fn create(&self, payload: &GenrePayload) -> AppResult<SaveOutcome<Genre>> {
        let new = match Self::validate(payload) {
            Ok(new) => new,
            Err(errors) => return Ok(SaveOutcome::Rejected(errors)),
        };

        if let Some(existing) = self.repository.genres.find_by_name(&new.name).await? {
            tracing::debug!("Genre '{}' already exists as {}", new.name, existing.id);
            return Ok(SaveOutcome::Saved(existing));
        }

        let genre = self.repository.genres.create(&new).await?;
        tracing::info!("Created genre {} ({})", genre.id, genre.name);
        Ok(SaveOutcome::Saved(genre))
    }

    /// Validate and rename an existing genre
    pub async fn update(&self, id: i32, payload: &GenrePayload) -> AppResult<SaveOutcome<Genre>> {
        let new = match Self::validate(payload) {
            Ok(new) => new,
            Err(errors) => return Ok(SaveOutcome::Rejected(errors)),
        };

        let genre = self
            .repository
            .genres
            .update(id, &new)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Genre {} not found", id)))?;

        Ok(SaveOutcome::Saved(genre))
    }

    /// Genre plus dependents for the delete confirmation view;
    /// `None` when the genre is already gone
    pub async fn delete_view(&self, id: i32) -> AppResult<Option<(Genre, Vec<Book>)>> {
        let (genre, books) = tokio::try_join!(
            self.repository.genres.find(id),
            self.repository.books.find_by_genre(id),
        )?;

        Ok(genre.map(|g| (g, books)))
    }

    /// Delete a genre unless books still reference it
    pub async fn delete(&self, id: i32) -> AppResult<DeleteOutcome<(Genre, Vec<Book>)>> {
        let (genre, books) = tokio::try_join!(
            self.repository.genres.find(id),
            self.repository.books.find_by_genre(id),
        )?;

        let Some(genre) = genre else {
            return Ok(DeleteOutcome::Missing);
        };

        if !books.is_empty() {
            return Ok(DeleteOutcome::Blocked((genre, books)));
        }

        self.repository.genres.delete(id).await?;
        tracing::info!("Deleted genre {}", id);
        Ok(DeleteOutcome::Deleted)
    }

    fn validate(payload: &GenrePayload) -> Result<NewGenre, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = validate::non_empty("name", &payload.name, "Genre name required", &mut errors);

        if errors.is_empty() {
            Ok(NewGenre { name })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed_and_escaped() {
        let payload = GenrePayload {
            name: " Sci-Fi & Fantasy ".to_string(),
        };
        let new = GenresService::validate(&payload).unwrap();
        assert_eq!(new.name, "Sci-Fi &amp; Fantasy");
    }

    #[test]
    fn blank_name_is_rejected() {
        let payload = GenrePayload {
            name: "  ".to_string(),
        };
        let errors = GenresService::validate(&payload).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[0].message, "Genre name required");
    }
}
