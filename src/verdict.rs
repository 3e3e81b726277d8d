//! Verdicts, verdict policies, and the risk factors used to explain them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::features::UrlFeatures;

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Classification result for a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Safe,
    Suspicious,
    Dangerous,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Suspicious => "suspicious",
            Self::Dangerous => "dangerous",
        }
    }

    /// Short headline for rendering.
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Safe => "Safe Website",
            Self::Suspicious => "Suspicious Website",
            Self::Dangerous => "Dangerous Website",
        }
    }

    pub fn is_dangerous(&self) -> bool {
        matches!(self, Self::Dangerous)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "safe" => Ok(Self::Safe),
            "suspicious" => Ok(Self::Suspicious),
            "dangerous" => Ok(Self::Dangerous),
            other => Err(format!("unknown verdict '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// How the aggregate confidence is mapped to a verdict.
///
/// Both policies read the aggregate as a risk score (0 = no risk signal).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerdictPolicy {
    /// `safe` / `dangerous` on a single safety cut.
    TwoClass,
    /// `safe` / `suspicious` / `dangerous` on two risk cuts.
    #[default]
    ThreeClass,
}

impl VerdictPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwoClass => "two-class",
            Self::ThreeClass => "three-class",
        }
    }
}

impl fmt::Display for VerdictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerdictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "two-class" | "two" | "binary" => Ok(Self::TwoClass),
            "three-class" | "three" => Ok(Self::ThreeClass),
            other => Err(format!(
                "unknown policy '{other}' (expected two-class or three-class)"
            )),
        }
    }
}

/// Cut points for both policies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Two-class: safe when the safety score `1 - confidence` exceeds this.
    pub two_class_safe_above: f64,
    /// Three-class: safe below this risk.
    pub safe_below: f64,
    /// Three-class: suspicious below this risk, dangerous at or above.
    pub suspicious_below: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            two_class_safe_above: 0.65,
            safe_below: 0.3,
            suspicious_below: 0.6,
        }
    }
}

impl Thresholds {
    /// Map an aggregate risk `confidence` in [0, 1] to a verdict.
    pub fn verdict(&self, policy: VerdictPolicy, confidence: f64) -> Verdict {
        match policy {
            VerdictPolicy::TwoClass => {
                if 1.0 - confidence > self.two_class_safe_above {
                    Verdict::Safe
                } else {
                    Verdict::Dangerous
                }
            }
            VerdictPolicy::ThreeClass => {
                if confidence < self.safe_below {
                    Verdict::Safe
                } else if confidence < self.suspicious_below {
                    Verdict::Suspicious
                } else {
                    Verdict::Dangerous
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Risk factors
// ---------------------------------------------------------------------------

/// Entropy (bits per character) at or above which a URL reads as random.
pub const HIGH_ENTROPY_BITS: f64 = 4.5;

/// A human-readable indicator found in a URL's features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    IpAddressHost,
    UrlShortener,
    SuspiciousTld,
    MissingHttps,
    ExcessiveLength,
    LongDomain,
    ManySubdomains,
    ManyDashes,
    ManyDigits,
    HighEntropy,
}

impl RiskFactor {
    pub fn description(&self) -> &'static str {
        match self {
            Self::IpAddressHost => "host is a raw IP address",
            Self::UrlShortener => "link goes through a URL shortener",
            Self::SuspiciousTld => "top-level domain is common in phishing",
            Self::MissingHttps => "connection is not HTTPS",
            Self::ExcessiveLength => "URL is unusually long",
            Self::LongDomain => "host name is unusually long",
            Self::ManySubdomains => "host has many subdomain levels",
            Self::ManyDashes => "URL contains many dashes",
            Self::ManyDigits => "URL contains many digits",
            Self::HighEntropy => "URL text looks random",
        }
    }
}

/// Collect the risk factors present in `features`, strongest first.
///
/// Count-based factors fire when the feature saturates its normalization cap.
pub fn risk_factors(features: &UrlFeatures) -> Vec<RiskFactor> {
    let checks = [
        (features.has_ip_address, RiskFactor::IpAddressHost),
        (features.has_url_shortener, RiskFactor::UrlShortener),
        (features.has_suspicious_tld, RiskFactor::SuspiciousTld),
        (!features.has_https, RiskFactor::MissingHttps),
        (features.url_length >= 100, RiskFactor::ExcessiveLength),
        (features.domain_length >= 50, RiskFactor::LongDomain),
        (features.num_subdomains >= 5, RiskFactor::ManySubdomains),
        (features.num_dashes >= 5, RiskFactor::ManyDashes),
        (features.num_digits >= 10, RiskFactor::ManyDigits),
        (features.entropy >= HIGH_ENTROPY_BITS, RiskFactor::HighEntropy),
    ];
    checks
        .into_iter()
        .filter_map(|(present, factor)| present.then_some(factor))
        .collect()
}

/// One-line explanation of a verdict.
pub fn derive_reasoning(verdict: Verdict, factors: &[RiskFactor]) -> String {
    let summary = match verdict {
        Verdict::Safe => "This URL appears to be safe based on our analysis",
        Verdict::Suspicious => "This URL has some suspicious characteristics",
        Verdict::Dangerous => "This URL has multiple indicators of being a phishing site",
    };
    if factors.is_empty() {
        return format!("{summary}.");
    }
    let details: Vec<&str> = factors.iter().map(|f| f.description()).collect();
    format!("{summary}: {}.", details.join("; "))
}
