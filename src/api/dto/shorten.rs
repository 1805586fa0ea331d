//! DTOs for link shortening endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;
use validator::Validate;

use crate::error::AppError;

/// Expiry applied when the request does not mention `expires_in_days`.
pub const DEFAULT_EXPIRES_IN_DAYS: i64 = 7;

/// Upper bound accepted for `expires_in_days`.
pub const MAX_EXPIRES_IN_DAYS: i64 = 3650;

/// Request to shorten a single URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    /// Absolute `http`/`https` URL to redirect to.
    #[validate(length(min = 1, max = 2048, message = "URL length out of range"))]
    pub target_url: String,

    /// Days until the link expires.
    ///
    /// Omitted uses [`DEFAULT_EXPIRES_IN_DAYS`]; explicit `null` never expires.
    #[serde(default, deserialize_with = "present")]
    pub expires_in_days: Option<Option<i64>>,
}

impl ShortenRequest {
    /// Effective expiry in days, `None` meaning the link never expires.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the value is outside `1..=3650`.
    pub fn expiry_days(&self) -> Result<Option<i64>, AppError> {
        match self.expires_in_days {
            None => Ok(Some(DEFAULT_EXPIRES_IN_DAYS)),
            Some(None) => Ok(None),
            Some(Some(days)) if (1..=MAX_EXPIRES_IN_DAYS).contains(&days) => Ok(Some(days)),
            Some(Some(days)) => Err(AppError::bad_request(
                "Request validation failed",
                json!({
                    "expires_in_days": format!("must be between 1 and {}", MAX_EXPIRES_IN_DAYS),
                    "value": days,
                }),
            )),
        }
    }
}

/// Distinguishes an explicit `null` from an absent field.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Created short link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub target_url: String,
    pub short_url: String,
    pub admin_url: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> ShortenRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_expiry_defaults_when_omitted() {
        let req = parse(r#"{"target_url": "https://example.com"}"#);
        assert_eq!(req.expiry_days().unwrap(), Some(DEFAULT_EXPIRES_IN_DAYS));
    }

    #[test]
    fn test_explicit_null_never_expires() {
        let req = parse(r#"{"target_url": "https://example.com", "expires_in_days": null}"#);
        assert_eq!(req.expiry_days().unwrap(), None);
    }

    #[test]
    fn test_explicit_days() {
        let req = parse(r#"{"target_url": "https://example.com", "expires_in_days": 30}"#);
        assert_eq!(req.expiry_days().unwrap(), Some(30));
    }

    #[test]
    fn test_out_of_range_days() {
        for days in [0, -1, MAX_EXPIRES_IN_DAYS + 1] {
            let req = ShortenRequest {
                target_url: "https://example.com".to_string(),
                expires_in_days: Some(Some(days)),
            };
            assert!(matches!(req.expiry_days(), Err(AppError::Validation { .. })));
        }
    }

    #[test]
    fn test_empty_url_fails_validation() {
        let req = parse(r#"{"target_url": ""}"#);
        assert!(req.validate().is_err());
    }
}
