//! Authors repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::author::{Author, NewAuthor},
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all authors, family name ascending
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            "SELECT id, first_name, family_name, date_birth, date_death \
             FROM authors ORDER BY family_name, first_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    /// Get author by ID
    pub async fn get(&self, id: i32) -> AppResult<Author> {
        self.find(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    /// Find author by ID, `None` when absent
    pub async fn find(&self, id: i32) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            "SELECT id, first_name, family_name, date_birth, date_death \
             FROM authors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(author)
    }

    /// Create a new author
    pub async fn create(&self, author: &NewAuthor) -> AppResult<Author> {
        let created = sqlx::query_as::<_, Author>(
            "INSERT INTO authors (first_name, family_name, date_birth, date_death) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, first_name, family_name, date_birth, date_death",
        )
        .bind(&author.first_name)
        .bind(&author.family_name)
        .bind(author.date_birth)
        .bind(author.date_death)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Replace all fields of an existing author, `None` when the id is unknown
    pub async fn update(&self, id: i32, author: &NewAuthor) -> AppResult<Option<Author>> {
        let updated = sqlx::query_as::<_, Author>(
            "UPDATE authors SET first_name = $1, family_name = $2, date_birth = $3, date_death = $4 \
             WHERE id = $5 \
             RETURNING id, first_name, family_name, date_birth, date_death",
        )
        .bind(&author.first_name)
        .bind(&author.family_name)
        .bind(author.date_birth)
        .bind(author.date_death)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete an author. Dependent-record checks belong to the service layer.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count all authors
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
