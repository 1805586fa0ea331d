//! Utility functions used across the application.
//!
//! - [`key_generator`] - Random short key generation
//! - [`target_url`] - Target URL validation and canonicalization
//! - [`user_agent`] - Browser/OS extraction from user-agent strings
//! - [`client_ip`] - Client address resolution behind optional proxies

pub mod client_ip;
pub mod key_generator;
pub mod target_url;
pub mod user_agent;
