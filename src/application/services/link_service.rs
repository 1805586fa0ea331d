//! Link creation and activation service.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheStore;
use crate::utils::key_generator::{DEFAULT_KEY_LENGTH, generate_key, is_reserved};
use crate::utils::target_url::canonicalize_target;

/// Default number of candidate keys tried before giving up.
pub const DEFAULT_MAX_KEY_ATTEMPTS: usize = 10;

/// Service for creating short links and toggling their activity.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    cache: Arc<dyn CacheStore>,
    key_length: usize,
    max_key_attempts: usize,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a link service using the default key length and retry bound.
    pub fn new(link_repository: Arc<L>, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            link_repository,
            cache,
            key_length: DEFAULT_KEY_LENGTH,
            max_key_attempts: DEFAULT_MAX_KEY_ATTEMPTS,
        }
    }

    /// Overrides the length of generated keys.
    pub fn with_key_length(mut self, key_length: usize) -> Self {
        self.key_length = key_length;
        self
    }

    /// Overrides the number of collision retries.
    pub fn with_max_key_attempts(mut self, max_key_attempts: usize) -> Self {
        self.max_key_attempts = max_key_attempts.max(1);
        self
    }

    /// Creates a short link for `target_url`.
    ///
    /// `expires_in_days` of `None` creates a link that never expires.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is not an absolute
    /// `http`/`https` URL or the expiry is not positive.
    /// Returns [`AppError::KeyspaceExhausted`] if no free key was found.
    pub async fn create_short_link(
        &self,
        target_url: &str,
        expires_in_days: Option<i64>,
    ) -> Result<ShortLink, AppError> {
        let target_url = canonicalize_target(target_url).map_err(|e| {
            AppError::bad_request("Invalid target URL", json!({ "reason": e.to_string() }))
        })?;

        let expires_at = match expires_in_days {
            Some(days) if days <= 0 => {
                return Err(AppError::bad_request(
                    "expires_in_days must be positive",
                    json!({ "expires_in_days": days }),
                ));
            }
            Some(days) => Some(Utc::now() + Duration::days(days)),
            None => None,
        };

        for attempt in 1..=self.max_key_attempts {
            let Some(key) = self.next_free_key().await? else {
                debug!("Key collision on attempt {}", attempt);
                continue;
            };

            let new_link = NewShortLink {
                key,
                target_url: target_url.clone(),
                expires_at,
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => {
                    info!("Created short link {} -> {}", link.key, link.target_url);
                    return Ok(link);
                }
                // Another request claimed the same key between the check and the insert.
                Err(AppError::Conflict { .. }) => {
                    debug!("Key insert conflict on attempt {}", attempt);
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            "No free key of length {} after {} attempts",
            self.key_length, self.max_key_attempts
        );
        Err(AppError::keyspace_exhausted(
            "Failed to generate a unique key",
            json!({
                "key_length": self.key_length,
                "attempts": self.max_key_attempts,
            }),
        ))
    }

    /// Generates one candidate key and returns it if the store confirms it is unused.
    async fn next_free_key(&self) -> Result<Option<String>, AppError> {
        self.claim_candidate(generate_key(self.key_length)).await
    }

    /// Returns `key` unless it is reserved for a system route or already taken.
    async fn claim_candidate(&self, key: String) -> Result<Option<String>, AppError> {
        if is_reserved(&key) {
            return Ok(None);
        }

        if self.link_repository.key_exists(&key).await? {
            Ok(None)
        } else {
            Ok(Some(key))
        }
    }

    /// Retrieves a link by key regardless of its state.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the key does not exist.
    pub async fn get_link(&self, key: &str) -> Result<ShortLink, AppError> {
        self.link_repository
            .find_by_key(key)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "key": key })))
    }

    /// Activates or deactivates a link.
    ///
    /// Deactivation also evicts the cached target so redirects stop as soon
    /// as the store is updated.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the key does not exist.
    pub async fn set_active(&self, key: &str, active: bool) -> Result<(), AppError> {
        if !self.link_repository.set_active(key, active).await? {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "key": key }),
            ));
        }

        if !active {
            self.cache.invalidate(key).await;
        }

        info!(
            "Short link {} {}",
            key,
            if active { "activated" } else { "deactivated" }
        );
        Ok(())
    }
}
