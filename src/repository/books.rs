//! Books repository for database operations.
//!
//! Author and genre references live in the `book_authors` / `book_genres`
//! junction tables and are kept in submission order via a position column.

use std::collections::HashMap;

use sqlx::{PgConnection, Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{Book, NewBook},
        genre::Genre,
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// List all books, title ascending, with their authors populated
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let mut books = sqlx::query_as::<_, Book>(
            "SELECT id, title, summary, isbn FROM books ORDER BY title",
        )
        .fetch_all(&self.pool)
        .await?;

        // One pass over the junction table instead of a query per book
        let rows = sqlx::query(
            r#"
            SELECT ba.book_id, a.id, a.first_name, a.family_name, a.date_birth, a.date_death
            FROM book_authors ba
            JOIN authors a ON a.id = ba.author_id
            ORDER BY ba.book_id, ba.position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_book: HashMap<i32, Vec<Author>> = HashMap::new();
        for r in &rows {
            by_book.entry(r.get("book_id")).or_default().push(Author {
                id: r.get("id"),
                first_name: r.get("first_name"),
                family_name: r.get("family_name"),
                date_birth: r.get("date_birth"),
                date_death: r.get("date_death"),
            });
        }

        for book in &mut books {
            book.authors = by_book.remove(&book.id).unwrap_or_default();
        }

        Ok(books)
    }

    /// Get book by ID with authors and genres populated
    pub async fn get_with_relations(&self, id: i32) -> AppResult<Book> {
        self.find_with_relations(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Find book by ID with authors and genres populated, `None` when absent
    pub async fn find_with_relations(&self, id: i32) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            "SELECT id, title, summary, isbn FROM books WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut book) = book else {
            return Ok(None);
        };

        book.authors = self.get_book_authors(id).await?;
        book.genres = self.get_book_genres(id).await?;

        Ok(Some(book))
    }

    /// List books referencing the given author
    pub async fn find_by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.id, b.title, b.summary, b.isbn
            FROM books b
            JOIN book_authors ba ON ba.book_id = b.id
            WHERE ba.author_id = $1
            ORDER BY b.title
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// List books referencing the given genre
    pub async fn find_by_genre(&self, genre_id: i32) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.id, b.title, b.summary, b.isbn
            FROM books b
            JOIN book_genres bg ON bg.book_id = b.id
            WHERE bg.genre_id = $1
            ORDER BY b.title
            "#,
        )
        .bind(genre_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Load all authors for a book via the book_authors junction table
    async fn get_book_authors(&self, book_id: i32) -> AppResult<Vec<Author>> {
        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT a.id, a.first_name, a.family_name, a.date_birth, a.date_death
            FROM book_authors ba
            JOIN authors a ON a.id = ba.author_id
            WHERE ba.book_id = $1
            ORDER BY ba.position
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(authors)
    }

    /// Load all genres for a book via the book_genres junction table
    async fn get_book_genres(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = $1
            ORDER BY bg.position
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(genres)
    }

    // =========================================================================
    // CREATE / UPDATE
    // =========================================================================

    /// Create a new book and its author/genre references. The row insert and
    /// both junction syncs commit together; a failed reference (e.g. an author
    /// deleted since the form was rendered) rolls the whole book back.
    pub async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO books (title, summary, isbn) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&book.title)
        .bind(&book.summary)
        .bind(&book.isbn)
        .fetch_one(&mut *tx)
        .await?;

        Self::sync_book_authors(&mut tx, id, &book.authors).await?;
        Self::sync_book_genres(&mut tx, id, &book.genres).await?;

        tx.commit().await?;

        self.get_with_relations(id).await
    }

    /// Replace all fields and references of an existing book, `None` when the
    /// id is unknown. Field update and junction syncs commit together.
    pub async fn update(&self, id: i32, book: &NewBook) -> AppResult<Option<Book>> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("UPDATE books SET title = $1, summary = $2, isbn = $3 WHERE id = $4")
            .bind(&book.title)
            .bind(&book.summary)
            .bind(&book.isbn)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        Self::sync_book_authors(&mut tx, id, &book.authors).await?;
        Self::sync_book_genres(&mut tx, id, &book.genres).await?;

        tx.commit().await?;

        Ok(Some(self.get_with_relations(id).await?))
    }

    // =========================================================================
    // DELETE
    // =========================================================================

    /// Delete a book and its junction rows in one transaction. Dependent-copy
    /// checks belong to the service layer.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM book_authors WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Count all books
    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // JUNCTIONS
    // =========================================================================

    /// Replace all author references for a book: delete existing rows then
    /// insert the new set in order. Runs inside the caller's transaction.
    async fn sync_book_authors(
        conn: &mut PgConnection,
        book_id: i32,
        author_ids: &[i32],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM book_authors WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut *conn)
            .await?;

        for (idx, author_id) in author_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO book_authors (book_id, author_id, position) VALUES ($1, $2, $3) \
                 ON CONFLICT (book_id, author_id) DO UPDATE SET position = $3",
            )
            .bind(book_id)
            .bind(author_id)
            .bind((idx + 1) as i16)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }

    /// Replace all genre references for a book. Runs inside the caller's
    /// transaction.
    async fn sync_book_genres(
        conn: &mut PgConnection,
        book_id: i32,
        genre_ids: &[i32],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut *conn)
            .await?;

        for (idx, genre_id) in genre_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO book_genres (book_id, genre_id, position) VALUES ($1, $2, $3) \
                 ON CONFLICT (book_id, genre_id) DO UPDATE SET position = $3",
            )
            .bind(book_id)
            .bind(genre_id)
            .bind((idx + 1) as i16)
            .execute(&mut *conn)
            .await?;
        }

        Ok(())
    }
}
