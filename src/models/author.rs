//! Author model and related types

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::format_date;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub family_name: String,
    pub date_birth: Option<NaiveDate>,
    pub date_death: Option<NaiveDate>,
}

impl Author {
    /// Display name, family name first.
    pub fn name(&self) -> String {
        format!("{} {}", self.family_name, self.first_name)
    }

    /// Lifespan string: formatted birth and death dates plus the year count.
    /// A living author is measured against today; missing dates collapse to 0.
    pub fn lifespan(&self) -> String {
        let end = self
            .date_death
            .map(|d| d.year())
            .unwrap_or_else(|| Utc::now().date_naive().year());
        let start = self.date_birth.map(|d| d.year()).unwrap_or(end);
        format!(
            "{} - {} ({})",
            self.date_birth_formatted(),
            self.date_death_formatted(),
            end - start
        )
    }

    /// Canonical detail-page path for this author
    pub fn url(&self) -> String {
        format!("/catalog/author/{}", self.id)
    }

    pub fn date_birth_formatted(&self) -> String {
        format_date(self.date_birth)
    }

    pub fn date_death_formatted(&self) -> String {
        format_date(self.date_death)
    }
}

/// Validated, sanitized author fields ready for persistence
#[derive(Debug, Clone)]
pub struct NewAuthor {
    pub first_name: String,
    pub family_name: String,
    pub date_birth: Option<NaiveDate>,
    pub date_death: Option<NaiveDate>,
}

/// Raw author form submission; all fields arrive unvalidated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct AuthorPayload {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub family_name: String,
    pub date_birth: Option<String>,
    pub date_death: Option<String>,
}

impl From<&Author> for AuthorPayload {
    /// Pre-fill an edit form from a stored record
    fn from(author: &Author) -> Self {
        Self {
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_birth: author.date_birth.map(|d| d.to_string()),
            date_death: author.date_death.map(|d| d.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(birth: Option<NaiveDate>, death: Option<NaiveDate>) -> Author {
        Author {
            id: 1,
            first_name: "Jane".to_string(),
            family_name: "Austen".to_string(),
            date_birth: birth,
            date_death: death,
        }
    }

    #[test]
    fn name_puts_family_name_first() {
        let a = author(None, None);
        assert_eq!(a.name(), "Austen Jane");
    }

    #[test]
    fn url_is_canonical_detail_path() {
        let a = author(None, None);
        assert_eq!(a.url(), "/catalog/author/1");
    }

    #[test]
    fn lifespan_with_both_dates() {
        let a = author(
            NaiveDate::from_ymd_opt(1775, 12, 16),
            NaiveDate::from_ymd_opt(1817, 7, 18),
        );
        assert_eq!(a.lifespan(), "1775/12/16 - 1817/07/18 (42)");
    }

    #[test]
    fn lifespan_without_dates_is_zero_years() {
        let a = author(None, None);
        assert_eq!(a.lifespan(), " -  (0)");
    }

    #[test]
    fn formatted_dates_are_empty_when_absent() {
        let a = author(NaiveDate::from_ymd_opt(1775, 12, 16), None);
        assert_eq!(a.date_birth_formatted(), "1775/12/16");
        assert_eq!(a.date_death_formatted(), "");
    }
}
