//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::author::Author;
use super::genre::Genre;

/// Full book model from database.
/// `authors` and `genres` are populated from the junction tables when queried
/// with relations, and default to empty otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    #[sqlx(skip)]
    #[serde(default)]
    pub authors: Vec<Author>,
    #[sqlx(skip)]
    #[serde(default)]
    pub genres: Vec<Genre>,
}

impl Book {
    /// Canonical detail-page path for this book
    pub fn url(&self) -> String {
        format!("/catalog/book/{}", self.id)
    }
}

/// Identifier selection as submitted by a form: a single value or a list.
/// An absent field is modeled as `Option::None` at the payload level.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum IdSelection {
    One(i32),
    Many(Vec<i32>),
}

/// Normalize an optional single-or-list identifier field into a set.
/// Absent becomes empty, a scalar becomes a one-element set, duplicates are
/// dropped while first-seen order is kept.
pub fn to_id_set(value: Option<&IdSelection>) -> Vec<i32> {
    let ids = match value {
        None => Vec::new(),
        Some(IdSelection::One(id)) => vec![*id],
        Some(IdSelection::Many(ids)) => ids.clone(),
    };

    let mut set = Vec::with_capacity(ids.len());
    for id in ids {
        if !set.contains(&id) {
            set.push(id);
        }
    }
    set
}

/// Validated, sanitized book fields ready for persistence
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub authors: Vec<i32>,
    pub genres: Vec<i32>,
}

/// Raw book form submission
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BookPayload {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub isbn: String,
    pub author: Option<IdSelection>,
    pub genre: Option<IdSelection>,
}

impl From<&Book> for BookPayload {
    /// Pre-fill an edit form from a stored record
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            summary: book.summary.clone(),
            isbn: book.isbn.clone(),
            author: Some(IdSelection::Many(
                book.authors.iter().map(|a| a.id).collect(),
            )),
            genre: Some(IdSelection::Many(book.genres.iter().map(|g| g.id).collect())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_selection_is_empty_set() {
        assert!(to_id_set(None).is_empty());
    }

    #[test]
    fn scalar_selection_is_singleton_set() {
        assert_eq!(to_id_set(Some(&IdSelection::One(3))), vec![3]);
    }

    #[test]
    fn list_selection_drops_duplicates_keeps_order() {
        let sel = IdSelection::Many(vec![5, 2, 5, 9, 2]);
        assert_eq!(to_id_set(Some(&sel)), vec![5, 2, 9]);
    }

    #[test]
    fn scalar_and_list_deserialize_from_json() {
        let one: IdSelection = serde_json::from_str("4").unwrap();
        assert_eq!(to_id_set(Some(&one)), vec![4]);

        let many: IdSelection = serde_json::from_str("[4, 8]").unwrap();
        assert_eq!(to_id_set(Some(&many)), vec![4, 8]);
    }

    #[test]
    fn url_is_canonical_detail_path() {
        let b = Book {
            id: 12,
            title: "T".to_string(),
            summary: "S".to_string(),
            isbn: "123".to_string(),
            authors: vec![],
            genres: vec![],
        };
        assert_eq!(b.url(), "/catalog/book/12");
    }
}
