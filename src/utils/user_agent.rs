//! User-agent parsing for visit analytics.

use woothee::parser::Parser;

use crate::domain::entities::UNKNOWN;

/// Marker woothee uses for attributes it cannot identify.
const WOOTHEE_UNKNOWN: &str = "UNKNOWN";

/// Browser and operating system derived from a user-agent string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    /// Browser family and version, e.g. `"Chrome 120.0.0.0"`.
    pub browser: String,
    /// OS family and version, e.g. `"Windows 10 NT 10.0"`.
    pub os: String,
}

impl ClientInfo {
    fn unknown() -> Self {
        Self {
            browser: UNKNOWN.to_string(),
            os: UNKNOWN.to_string(),
        }
    }
}

/// Parses a raw user-agent header value.
///
/// Never fails: a missing, empty or unrecognised header yields `"Unknown"`
/// for whichever part could not be resolved.
pub fn parse_user_agent(user_agent: Option<&str>) -> ClientInfo {
    let Some(ua) = user_agent.map(str::trim).filter(|ua| !ua.is_empty()) else {
        return ClientInfo::unknown();
    };

    let Some(result) = Parser::new().parse(ua) else {
        return ClientInfo::unknown();
    };

    ClientInfo {
        browser: family_with_version(result.name, &result.version),
        os: family_with_version(result.os, &result.os_version),
    }
}

fn family_with_version(family: &str, version: &str) -> String {
    if family.is_empty() || family == WOOTHEE_UNKNOWN {
        return UNKNOWN.to_string();
    }

    let version = version.trim();
    if version.is_empty() || version == WOOTHEE_UNKNOWN {
        family.to_string()
    } else {
        format!("{} {}", family, version)
    }
}
