//! Short link entity.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A persisted short key bound to its target URL.
///
/// `click_count` is maintained by the store (atomic increment on each recorded
/// visit) and is only eventually consistent with the visit log.
#[derive(Debug, Clone, FromRow)]
pub struct ShortLink {
    pub id: i64,
    pub key: String,
    pub target_url: String,
    pub active: bool,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ShortLink {
    /// Returns true if the link has an expiry at or before `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| now >= e)
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Seconds remaining until expiry, or `None` for links that never expire.
    ///
    /// Already-expired links report zero.
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> Option<u64> {
        self.expires_at
            .map(|e| (e - now).num_seconds().max(0) as u64)
    }
}

/// Input data for creating a new short link.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub key: String,
    pub target_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn link(expires_at: Option<DateTime<Utc>>) -> ShortLink {
        ShortLink {
            id: 1,
            key: "abc123".to_string(),
            target_url: "https://example.com/".to_string(),
            active: true,
            click_count: 0,
            created_at: Utc::now(),
            expires_at,
        }
    }

    #[test]
    fn test_link_without_expiry_never_expires() {
        let link = link(None);
        assert!(!link.is_expired());
        assert_eq!(link.seconds_until_expiry(Utc::now()), None);
    }

    #[test]
    fn test_link_is_expired() {
        let link = link(Some(Utc::now() - Duration::seconds(1)));
        assert!(link.is_expired());
        assert_eq!(link.seconds_until_expiry(Utc::now()), Some(0));
    }

    #[test]
    fn test_link_expiry_boundary_is_inclusive() {
        let now = Utc::now();
        let link = link(Some(now));
        assert!(link.is_expired_at(now));
        assert!(!link.is_expired_at(now - Duration::milliseconds(1)));
    }

    #[test]
    fn test_seconds_until_expiry() {
        let now = Utc::now();
        let link = link(Some(now + Duration::seconds(90)));
        assert_eq!(link.seconds_until_expiry(now), Some(90));
    }
}
