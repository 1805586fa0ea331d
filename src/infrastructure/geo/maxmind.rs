//! MaxMind GeoLite2 database lookup.

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use maxminddb::Reader;
use tracing::trace;

use super::GeoLookup;

/// Country lookup backed by a local `.mmdb` file (GeoLite2-City or -Country).
pub struct MaxMindGeoLookup {
    reader: Arc<Reader<Vec<u8>>>,
}

impl MaxMindGeoLookup {
    /// Loads the database at `path` into memory.
    ///
    /// # Errors
    ///
    /// Returns the reader error if the file is missing or not a MaxMind database.
    pub fn open(path: &str) -> Result<Self, maxminddb::MaxMindDbError> {
        let reader = Reader::open_readfile(path)?;
        Ok(Self {
            reader: Arc::new(reader),
        })
    }
}

#[async_trait]
impl GeoLookup for MaxMindGeoLookup {
    async fn country(&self, ip: IpAddr) -> Option<String> {
        let result = self.reader.lookup(ip).ok()?;
        let city: maxminddb::geoip2::City = result.decode().ok()??;

        let country = city.country.iso_code.map(String::from);
        trace!("MaxMind lookup for {}: country={:?}", ip, country);

        country
    }

    fn name(&self) -> &'static str {
        "MaxMind"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_database_fails() {
        assert!(MaxMindGeoLookup::open("/nonexistent/GeoLite2-City.mmdb").is_err());
    }
}
