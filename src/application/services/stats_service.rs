//! On-demand visit statistics.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use crate::domain::entities::Visit;
use crate::domain::repositories::{LinkRepository, VisitRepository};
use crate::error::AppError;

/// Summary counts for a single short link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub total_clicks: i64,
    pub browsers: BTreeMap<String, i64>,
    pub countries: BTreeMap<String, i64>,
    pub os: BTreeMap<String, i64>,
}

/// Breakdown of visits per browser, country and OS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitBreakdown {
    pub browsers: BTreeMap<String, i64>,
    pub countries: BTreeMap<String, i64>,
    pub os: BTreeMap<String, i64>,
}

impl VisitBreakdown {
    /// Counts occurrences of each distinct value. Missing countries count as `"Unknown"`.
    pub fn from_visits(visits: &[Visit]) -> Self {
        let mut breakdown = Self::default();

        for visit in visits {
            *breakdown.browsers.entry(visit.browser.clone()).or_default() += 1;
            *breakdown
                .countries
                .entry(visit.country_or_unknown().to_string())
                .or_default() += 1;
            *breakdown.os.entry(visit.os.clone()).or_default() += 1;
        }

        breakdown
    }
}

/// Aggregates recorded visits into summary counts.
///
/// `total_clicks` comes from the link's stored counter; only the breakdowns
/// scan visit records. Nothing is cached.
pub struct StatsService<L: LinkRepository + ?Sized, V: VisitRepository + ?Sized> {
    link_repository: Arc<L>,
    visit_repository: Arc<V>,
}

impl<L: LinkRepository + ?Sized, V: VisitRepository + ?Sized> StatsService<L, V> {
    pub fn new(link_repository: Arc<L>, visit_repository: Arc<V>) -> Self {
        Self {
            link_repository,
            visit_repository,
        }
    }

    /// Builds statistics for `key`, whatever the link's state.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the key does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn aggregate(&self, key: &str) -> Result<LinkStats, AppError> {
        let link = self
            .link_repository
            .find_by_key(key)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "key": key })))?;

        let visits = self.visit_repository.find_by_link(link.id).await?;
        let VisitBreakdown {
            browsers,
            countries,
            os,
        } = VisitBreakdown::from_visits(&visits);

        Ok(LinkStats {
            total_clicks: link.click_count,
            browsers,
            countries,
            os,
        })
    }
}
