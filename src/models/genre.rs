//! Genre model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Full genre model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

impl Genre {
    /// Canonical detail-page path for this genre
    pub fn url(&self) -> String {
        format!("/catalog/genre/{}", self.id)
    }
}

/// Validated, sanitized genre fields ready for persistence
#[derive(Debug, Clone)]
pub struct NewGenre {
    pub name: String,
}

/// Raw genre form submission
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct GenrePayload {
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_is_canonical_detail_path() {
        let g = Genre {
            id: 7,
            name: "Fiction".to_string(),
        };
        assert_eq!(g.url(), "/catalog/genre/7");
    }
}
