//! Optional IP geolocation for visit analytics.
//!
//! Geolocation is pluggable and may be absent entirely; visits then carry no
//! country and are aggregated under `"Unknown"`.

mod maxmind;

pub use maxmind::MaxMindGeoLookup;

use async_trait::async_trait;
use std::net::IpAddr;

/// Resolves a client address to a country.
#[async_trait]
pub trait GeoLookup: Send + Sync {
    /// ISO 3166-1 alpha-2 country code for `ip`, if known.
    async fn country(&self, ip: IpAddr) -> Option<String>;

    /// Provider name for logs.
    fn name(&self) -> &'static str;
}
