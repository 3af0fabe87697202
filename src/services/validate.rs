//! Form field validation and sanitization helpers.
//!
//! String fields are trimmed and HTML-escaped after validation; the escaping
//! protects the rendered view, not the store. Every failed check produces a
//! `FieldError` that keeps the rejected input for re-display.

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// A single field-level validation failure
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
    /// The rejected input, preserved for form re-display
    pub value: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str, value: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            value: value.to_string(),
        }
    }
}

/// Escape the HTML-significant characters `& < > " ' /` as entities.
pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            '/' => out.push_str("&#x2F;"),
            _ => out.push(c),
        }
    }
    out
}

/// Require a non-empty trimmed value; returns the trimmed, escaped field
pub fn non_empty(
    field: &str,
    value: &str,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new(field, message, value));
    }
    escape(trimmed)
}

/// Flag characters outside `[A-Za-z0-9]` in an otherwise present value
pub fn alphanumeric(field: &str, value: &str, message: &str, errors: &mut Vec<FieldError>) {
    let trimmed = value.trim();
    if !trimmed.is_empty() && !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        errors.push(FieldError::new(field, message, value));
    }
}

/// Parse an optional ISO-8601 date (`YYYY-MM-DD`). Empty or absent input is
/// accepted as `None`; a malformed value produces a field error.
pub fn optional_date(
    field: &str,
    value: Option<&str>,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<NaiveDate> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::new(field, message, raw));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_replaces_html_significant_characters() {
        assert_eq!(
            escape(r#"<b>"Tom & Jerry"</b>'s /path"#),
            "&lt;b&gt;&quot;Tom &amp; Jerry&quot;&lt;&#x2F;b&gt;&#x27;s &#x2F;path"
        );
        assert_eq!(escape("plain text"), "plain text");
    }

    #[test]
    fn non_empty_trims_and_escapes() {
        let mut errors = Vec::new();
        let value = non_empty("title", "  Emma & Co  ", "Title must not be empty.", &mut errors);
        assert_eq!(value, "Emma &amp; Co");
        assert!(errors.is_empty());
    }

    #[test]
    fn non_empty_rejects_blank_input() {
        let mut errors = Vec::new();
        non_empty("title", "   ", "Title must not be empty.", &mut errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "title");
        assert_eq!(errors[0].message, "Title must not be empty.");
    }

    #[test]
    fn alphanumeric_rejects_punctuation_but_not_blank() {
        let mut errors = Vec::new();
        alphanumeric("first_name", "Jane", "non-alphanumeric", &mut errors);
        assert!(errors.is_empty());

        alphanumeric("first_name", "J@ne", "non-alphanumeric", &mut errors);
        assert_eq!(errors.len(), 1);

        // Accented letters count as non-alphanumeric too
        let mut errors = Vec::new();
        alphanumeric("first_name", "Jöse", "non-alphanumeric", &mut errors);
        assert_eq!(errors.len(), 1);

        // Blank input is the non_empty check's job
        let mut errors = Vec::new();
        alphanumeric("first_name", "  ", "non-alphanumeric", &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn optional_date_accepts_absent_and_iso() {
        let mut errors = Vec::new();
        assert_eq!(optional_date("date_birth", None, "Invalid date", &mut errors), None);
        assert_eq!(optional_date("date_birth", Some(""), "Invalid date", &mut errors), None);
        assert_eq!(
            optional_date("date_birth", Some("1775-12-16"), "Invalid date", &mut errors),
            NaiveDate::from_ymd_opt(1775, 12, 16)
        );
        assert!(errors.is_empty());
    }

    #[test]
    fn optional_date_rejects_malformed_input() {
        let mut errors = Vec::new();
        assert_eq!(
            optional_date("due_back", Some("16/12/1775"), "Invalid date", &mut errors),
            None
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].value, "16/12/1775");
    }
}
