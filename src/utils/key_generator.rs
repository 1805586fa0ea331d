//! Short key generation.
//!
//! Keys are drawn from the 62-symbol alphanumeric alphabet using the
//! thread-local CSPRNG, so consecutive keys are not predictable from each
//! other and the keyspace cannot be walked by enumeration.

use rand::{Rng, distr::Alphanumeric};

/// Key length used when none is configured.
pub const DEFAULT_KEY_LENGTH: usize = 6;

/// Smallest accepted key length.
pub const MIN_KEY_LENGTH: usize = 4;

/// Largest accepted key length.
pub const MAX_KEY_LENGTH: usize = 32;

/// Keys that cannot be issued because a static route shadows `/{key}`.
pub const RESERVED_KEYS: &[&str] = &["health", "shorten", "stats"];

/// Generates a random alphanumeric key of exactly `length` characters.
///
/// # Examples
///
/// ```ignore
/// let key = generate_key(6);
/// assert_eq!(key.len(), 6);
/// assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_key(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Returns true if `key` could have been produced by [`generate_key`].
///
/// Used to reject obviously bogus keys before they reach the cache or store.
pub fn is_well_formed(key: &str) -> bool {
    (MIN_KEY_LENGTH..=MAX_KEY_LENGTH).contains(&key.len())
        && key.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Returns true if `key` collides with a system endpoint.
pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}
