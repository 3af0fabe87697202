//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::Book;
use super::format_date;

/// Loan status of a physical copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum InstanceStatus {
    Available = 0,
    Maintenance = 1,
    Loaned = 2,
    Reserved = 3,
}

impl From<i16> for InstanceStatus {
    fn from(v: i16) -> Self {
        match v {
            0 => InstanceStatus::Available,
            2 => InstanceStatus::Loaned,
            3 => InstanceStatus::Reserved,
            _ => InstanceStatus::Maintenance,
        }
    }
}

impl Default for InstanceStatus {
    fn default() -> Self {
        InstanceStatus::Maintenance
    }
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            InstanceStatus::Available => "Available",
            InstanceStatus::Maintenance => "Maintenance",
            InstanceStatus::Loaned => "Loaned",
            InstanceStatus::Reserved => "Reserved",
        };
        write!(f, "{}", label)
    }
}

impl InstanceStatus {
    /// Parse a form-submitted status label; anything unrecognized falls back
    /// to the default (Maintenance), matching the original schema default.
    pub fn parse(label: &str) -> Self {
        match label.trim() {
            "Available" => InstanceStatus::Available,
            "Loaned" => InstanceStatus::Loaned,
            "Reserved" => InstanceStatus::Reserved,
            _ => InstanceStatus::Maintenance,
        }
    }
}

/// Full book instance model from database.
/// `book` is populated when queried with relations, `None` otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookInstance {
    pub id: i32,
    pub book_id: i32,
    pub imprint: String,
    pub status: i16,
    pub due_back: Option<NaiveDate>,
    #[sqlx(skip)]
    #[serde(default)]
    pub book: Option<Book>,
}

impl BookInstance {
    /// Canonical detail-page path for this copy
    pub fn url(&self) -> String {
        format!("/catalog/bookinstance/{}", self.id)
    }

    pub fn status_label(&self) -> String {
        InstanceStatus::from(self.status).to_string()
    }

    pub fn due_back_formatted(&self) -> String {
        format_date(self.due_back)
    }
}

/// Validated, sanitized book instance fields ready for persistence
#[derive(Debug, Clone)]
pub struct NewBookInstance {
    pub book_id: i32,
    pub imprint: String,
    pub status: InstanceStatus,
    pub due_back: Option<NaiveDate>,
}

/// Raw book instance form submission
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct BookInstancePayload {
    pub book: Option<i32>,
    #[serde(default)]
    pub imprint: String,
    pub status: Option<String>,
    pub due_back: Option<String>,
}

impl From<&BookInstance> for BookInstancePayload {
    /// Pre-fill an edit form from a stored record
    fn from(instance: &BookInstance) -> Self {
        Self {
            book: Some(instance.book_id),
            imprint: instance.imprint.clone(),
            status: Some(instance.status_label()),
            due_back: instance.due_back.map(|d| d.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_roundtrips_through_code() {
        for status in [
            InstanceStatus::Available,
            InstanceStatus::Maintenance,
            InstanceStatus::Loaned,
            InstanceStatus::Reserved,
        ] {
            assert_eq!(InstanceStatus::from(status as i16), status);
        }
    }

    #[test]
    fn unknown_code_defaults_to_maintenance() {
        assert_eq!(InstanceStatus::from(42), InstanceStatus::Maintenance);
    }

    #[test]
    fn parse_accepts_display_labels() {
        assert_eq!(InstanceStatus::parse("Available"), InstanceStatus::Available);
        assert_eq!(InstanceStatus::parse(" Loaned "), InstanceStatus::Loaned);
        assert_eq!(InstanceStatus::parse("Reserved"), InstanceStatus::Reserved);
        assert_eq!(InstanceStatus::parse("bogus"), InstanceStatus::Maintenance);
    }

    #[test]
    fn url_is_canonical_detail_path() {
        let copy = BookInstance {
            id: 3,
            book_id: 1,
            imprint: "London, 1813".to_string(),
            status: 0,
            due_back: None,
            book: None,
        };
        assert_eq!(copy.url(), "/catalog/bookinstance/3");
        assert_eq!(copy.status_label(), "Available");
        assert_eq!(copy.due_back_formatted(), "");
    }
}
