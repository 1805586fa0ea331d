//! DTOs for link statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::application::services::LinkStats;

/// Visit summary for a single short link.
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_clicks: i64,
    pub browsers: BTreeMap<String, i64>,
    pub countries: BTreeMap<String, i64>,
    pub os: BTreeMap<String, i64>,
}

impl From<LinkStats> for StatsResponse {
    fn from(stats: LinkStats) -> Self {
        Self {
            total_clicks: stats.total_clicks,
            browsers: stats.browsers,
            countries: stats.countries,
            os: stats.os,
        }
    }
}
