//! Shared indicator sets for URL phishing analysis.
//!
//! This module consolidates the closed lists and pre-compiled patterns used
//! when extracting risk-relevant features from a URL. The lists are exposed
//! as named constants and wrapped in [`Indicators`] so callers can override
//! them through configuration.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

// ---------------------------------------------------------------------------
// Indicator lists
// ---------------------------------------------------------------------------

/// Top-level domains that show up disproportionately in phishing campaigns.
pub const SUSPICIOUS_TLDS: &[&str] = &[
    "xyz", "top", "club", "online", "site", "live", "stream", "click", "bid", "cf", "ga", "ml",
    "gq", "tk",
];

/// Well-known link shortener hosts. Matched as substrings of the host, so
/// `notbit.ly.evil.com` counts as a `bit.ly` link.
pub const URL_SHORTENERS: &[&str] = &[
    "bit.ly",
    "tinyurl.com",
    "t.co",
    "goo.gl",
    "is.gd",
    "cli.gs",
    "pic.gd",
    "ddp.ly",
    "su.pr",
    "ow.ly",
];

/// Dotted-quad IPv4 shape. Octet range is checked separately.
pub static IPV4_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})$").unwrap()
});

/// Indicator lists used by feature extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Indicators {
    pub suspicious_tlds: Vec<String>,
    pub url_shorteners: Vec<String>,
}

impl Default for Indicators {
    fn default() -> Self {
        Self {
            suspicious_tlds: SUSPICIOUS_TLDS.iter().map(|s| s.to_string()).collect(),
            url_shorteners: URL_SHORTENERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Built-in indicator lists, shared by [`crate::features::UrlFeatures::extract`].
pub static DEFAULT_INDICATORS: LazyLock<Indicators> = LazyLock::new(Indicators::default);

impl Indicators {
    /// True if `tld` is one of the suspicious top-level domains.
    pub fn is_suspicious_tld(&self, tld: &str) -> bool {
        !tld.is_empty() && self.suspicious_tlds.iter().any(|t| t == tld)
    }

    /// True if `host` contains any shortener hostname.
    pub fn is_shortener_host(&self, host: &str) -> bool {
        self.url_shorteners
            .iter()
            .any(|s| !s.is_empty() && host.contains(s.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Check whether `host` is a dotted-quad IPv4 literal with every octet in 0-255.
///
/// No IPv6, no octal or hex forms, no shortened quads.
pub fn is_ipv4_literal(host: &str) -> bool {
    let Some(caps) = IPV4_RE.captures(host) else {
        return false;
    };
    caps.iter()
        .skip(1)
        .flatten()
        .all(|m| m.as_str().parse::<u16>().map(|n| n <= 255).unwrap_or(false))
}
