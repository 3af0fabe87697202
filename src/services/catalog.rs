//! Catalog home page summary

use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, repository::Repository};

/// Record counts for the catalog home page
#[derive(Debug, Serialize, ToSchema)]
pub struct CatalogCounts {
    pub book_count: i64,
    pub book_instance_count: i64,
    pub book_instance_available_count: i64,
    pub author_count: i64,
    pub genre_count: i64,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Shared connection pool, used by the readiness probe
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.repository.pool
    }

    /// Count every entity type concurrently for the home page
    pub async fn summary(&self) -> AppResult<CatalogCounts> {
        let (book_count, book_instance_count, book_instance_available_count, author_count, genre_count) =
            tokio::try_join!(
                self.repository.books.count(),
                self.repository.book_instances.count(),
                self.repository.book_instances.count_available(),
                self.repository.authors.count(),
                self.repository.genres.count(),
            )?;

        Ok(CatalogCounts {
            book_count,
            book_instance_count,
            book_instance_available_count,
            author_count,
            genre_count,
        })
    }
}
