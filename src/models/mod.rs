//! Data models for Librarium

pub mod author;
pub mod book;
pub mod book_instance;
pub mod genre;

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, IdSelection};
pub use book_instance::{BookInstance, InstanceStatus};
pub use genre::Genre;

/// Format an optional date as `YYYY/MM/DD`, or an empty string when absent.
pub fn format_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y/%m/%d").to_string())
        .unwrap_or_default()
}
