//! Book instances repository for database operations

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        book_instance::{BookInstance, InstanceStatus, NewBookInstance},
    },
};

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all copies with their book populated, ordered by book title
    pub async fn list(&self) -> AppResult<Vec<BookInstance>> {
        let rows = sqlx::query(
            r#"
            SELECT bi.id, bi.book_id, bi.imprint, bi.status, bi.due_back,
                   b.title, b.summary, b.isbn
            FROM book_instances bi
            JOIN books b ON b.id = bi.book_id
            ORDER BY b.title, bi.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(Self::row_with_book).collect())
    }

    /// Get a copy by ID with its book populated
    pub async fn get_with_book(&self, id: i32) -> AppResult<BookInstance> {
        self.find_with_book(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Find a copy by ID with its book populated, `None` when absent
    pub async fn find_with_book(&self, id: i32) -> AppResult<Option<BookInstance>> {
        let row = sqlx::query(
            r#"
            SELECT bi.id, bi.book_id, bi.imprint, bi.status, bi.due_back,
                   b.title, b.summary, b.isbn
            FROM book_instances bi
            JOIN books b ON b.id = bi.book_id
            WHERE bi.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Self::row_with_book(&r)))
    }

    /// Find a copy by ID without its book, `None` when absent
    pub async fn find(&self, id: i32) -> AppResult<Option<BookInstance>> {
        let instance = sqlx::query_as::<_, BookInstance>(
            "SELECT id, book_id, imprint, status, due_back FROM book_instances WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(instance)
    }

    /// List all copies referencing the given book
    pub async fn find_by_book(&self, book_id: i32) -> AppResult<Vec<BookInstance>> {
        let instances = sqlx::query_as::<_, BookInstance>(
            "SELECT id, book_id, imprint, status, due_back \
             FROM book_instances WHERE book_id = $1 ORDER BY id",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(instances)
    }

    /// Create a new copy
    pub async fn create(&self, instance: &NewBookInstance) -> AppResult<BookInstance> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO book_instances (book_id, imprint, status, due_back) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(instance.book_id)
        .bind(&instance.imprint)
        .bind(instance.status as i16)
        .bind(instance.due_back)
        .fetch_one(&self.pool)
        .await?;

        self.get_with_book(id).await
    }

    /// Replace all fields of an existing copy, `None` when the id is unknown
    pub async fn update(&self, id: i32, instance: &NewBookInstance) -> AppResult<Option<BookInstance>> {
        let result = sqlx::query(
            "UPDATE book_instances SET book_id = $1, imprint = $2, status = $3, due_back = $4 \
             WHERE id = $5",
        )
        .bind(instance.book_id)
        .bind(&instance.imprint)
        .bind(instance.status as i16)
        .bind(instance.due_back)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Ok(Some(self.get_with_book(id).await?))
    }

    /// Delete a copy
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count all copies
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Count copies currently available for loan
    pub async fn count_available(&self) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
                .bind(InstanceStatus::Available as i16)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    fn row_with_book(row: &sqlx::postgres::PgRow) -> BookInstance {
        BookInstance {
            id: row.get("id"),
            book_id: row.get("book_id"),
            imprint: row.get("imprint"),
            status: row.get("status"),
            due_back: row.get("due_back"),
            book: Some(Book {
                id: row.get("book_id"),
                title: row.get("title"),
                summary: row.get("summary"),
                isbn: row.get("isbn"),
                authors: vec![],
                genres: vec![],
            }),
        }
    }
}
