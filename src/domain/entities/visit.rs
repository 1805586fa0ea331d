//! Visit entity representing a single resolved redirect.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Placeholder for any analytics attribute that could not be resolved.
pub const UNKNOWN: &str = "Unknown";

/// An append-only record of one redirect served for a [`super::ShortLink`].
#[derive(Debug, Clone, FromRow)]
pub struct Visit {
    pub id: i64,
    pub link_id: i64,
    pub visited_at: DateTime<Utc>,
    pub browser: String,
    pub os: String,
    pub country: Option<String>,
}

impl Visit {
    /// Country bucket used for aggregation; absent countries count as [`UNKNOWN`].
    pub fn country_or_unknown(&self) -> &str {
        self.country.as_deref().unwrap_or(UNKNOWN)
    }
}

/// Input data for recording a new visit.
///
/// The timestamp is assigned by the store at insert time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVisit {
    pub link_id: i64,
    pub browser: String,
    pub os: String,
    pub country: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_defaults_to_unknown() {
        let visit = Visit {
            id: 1,
            link_id: 7,
            visited_at: Utc::now(),
            browser: "Chrome 120.0".to_string(),
            os: "Windows 10".to_string(),
            country: None,
        };

        assert_eq!(visit.country_or_unknown(), "Unknown");
    }

    #[test]
    fn test_country_present() {
        let visit = Visit {
            id: 1,
            link_id: 7,
            visited_at: Utc::now(),
            browser: "Firefox 121.0".to_string(),
            os: "Linux".to_string(),
            country: Some("BR".to_string()),
        };

        assert_eq!(visit.country_or_unknown(), "BR");
    }
}
