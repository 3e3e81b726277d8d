//! URL feature extraction for the phishing classifier.
//!
//! Feature extraction produces an 11-field [`UrlFeatures`] value from a raw
//! URL string. Extraction is total: malformed input degrades to a best-effort
//! feature set instead of failing, since phishing links are often
//! deliberately mangled. Host extraction is plain string splitting, not a URI
//! parser.
//!
//! [`UrlFeatures::to_normalized_vec`] maps the features to the 11 comparable
//! scalars consumed by the ensemble, using the caps documented inline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::patterns::{is_ipv4_literal, Indicators, DEFAULT_INDICATORS};

/// Number of entries in a normalized feature vector.
pub const FEATURE_COUNT: usize = 11;

/// Names of the normalized features, in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "url_length",
    "domain_length",
    "missing_https",
    "num_dots",
    "num_dashes",
    "num_digits",
    "num_subdomains",
    "has_ip_address",
    "has_suspicious_tld",
    "has_url_shortener",
    "entropy",
];

/// The 11-field feature set for URL phishing classification.
///
/// All counts are taken on the lowercased URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlFeatures {
    pub url_length: usize,
    pub domain_length: usize,
    pub has_https: bool,
    pub num_dots: usize,
    pub num_dashes: usize,
    pub num_digits: usize,
    pub num_subdomains: usize,
    pub has_ip_address: bool,
    pub has_suspicious_tld: bool,
    pub has_url_shortener: bool,
    pub entropy: f64,
}

impl UrlFeatures {
    /// Extract features using the built-in indicator lists.
    pub fn extract(url: &str) -> Self {
        Self::extract_with(url, &DEFAULT_INDICATORS)
    }

    /// Extract features using caller-supplied indicator lists.
    pub fn extract_with(url: &str, indicators: &Indicators) -> Self {
        let url = url.to_lowercase();
        let domain = extract_domain(&url);
        let tld = top_level_domain(domain);

        Self {
            url_length: url.chars().count(),
            domain_length: domain.chars().count(),
            has_https: url.starts_with("https://"),
            num_dots: url.matches('.').count(),
            num_dashes: url.matches('-').count(),
            num_digits: url.chars().filter(|c| c.is_ascii_digit()).count(),
            num_subdomains: domain.matches('.').count(),
            has_ip_address: is_ipv4_literal(domain),
            has_suspicious_tld: indicators.is_suspicious_tld(tld),
            has_url_shortener: indicators.is_shortener_host(domain),
            entropy: shannon_entropy(&url),
        }
    }

    /// Convert to the normalized feature vector for the ensemble.
    ///
    /// Every entry lies in [0, 1] except entropy, which is divided by 5 and
    /// left uncapped: strings drawn from more than 32 distinct characters
    /// exceed 1. HTTPS is inverted so that its absence raises the score.
    pub fn to_normalized_vec(&self) -> Vec<f64> {
        let clip_scale = |val: usize, max: f64| -> f64 { (val as f64 / max).min(1.0) };

        let bool_scale = |val: bool| -> f64 {
            if val {
                1.0
            } else {
                0.0
            }
        };

        vec![
            clip_scale(self.url_length, 100.0),    // 0  long URLs saturate at 100 chars
            clip_scale(self.domain_length, 50.0),  // 1  hosts saturate at 50 chars
            bool_scale(!self.has_https),           // 2  risk-inverted
            clip_scale(self.num_dots, 10.0),       // 3
            clip_scale(self.num_dashes, 5.0),      // 4
            clip_scale(self.num_digits, 10.0),     // 5
            clip_scale(self.num_subdomains, 5.0),  // 6
            bool_scale(self.has_ip_address),       // 7
            bool_scale(self.has_suspicious_tld),   // 8
            bool_scale(self.has_url_shortener),    // 9
            self.entropy / 5.0,                    // 10 typically 0-5, not capped
        ]
    }
}

/// Extract the host portion of a (lowercased) URL.
///
/// With a `//` separator the host is the text between the first `//` and the
/// next `/`; without one it is everything before the first `/`. The result is
/// cut at the first `:` (port) and the first `?` (query).
pub fn extract_domain(url: &str) -> &str {
    let candidate = match url.find("//") {
        Some(pos) => {
            let rest = &url[pos + 2..];
            rest.split('/').next().unwrap_or(rest)
        }
        None => url.split('/').next().unwrap_or(url),
    };
    let candidate = candidate.split(':').next().unwrap_or(candidate);
    candidate.split('?').next().unwrap_or(candidate)
}

/// Text after the final `.` of `domain`, or `""` when there is none.
pub fn top_level_domain(domain: &str) -> &str {
    domain.rsplit_once('.').map(|(_, tld)| tld).unwrap_or("")
}

/// Base-2 Shannon entropy over the characters of `s`. Zero for the empty string.
///
/// Counts are summed in character order, so repeated calls are bit-identical.
pub fn shannon_entropy(s: &str) -> f64 {
    let mut frequencies: BTreeMap<char, usize> = BTreeMap::new();
    let mut len = 0usize;
    for c in s.chars() {
        *frequencies.entry(c).or_insert(0) += 1;
        len += 1;
    }
    if len == 0 {
        return 0.0;
    }

    let len = len as f64;
    frequencies.values().fold(0.0, |entropy, &count| {
        let p = count as f64 / len;
        entropy - p * p.log2()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_features() {
        let f = UrlFeatures::extract("https://www.google.com");
        assert_eq!(f.url_length, 22);
        assert_eq!(f.domain_length, 14);
        assert!(f.has_https);
        assert_eq!(f.num_dots, 2);
        assert_eq!(f.num_dashes, 0);
        assert_eq!(f.num_digits, 0);
        assert_eq!(f.num_subdomains, 2);
        assert!(!f.has_ip_address);
        assert!(!f.has_suspicious_tld);
        assert!(!f.has_url_shortener);
        assert!((f.entropy - 3.6635).abs() < 1e-3, "entropy {}", f.entropy);
    }

    #[test]
    fn test_empty_url() {
        let f = UrlFeatures::extract("");
        assert_eq!(f.url_length, 0);
        assert_eq!(f.domain_length, 0);
        assert!(!f.has_https);
        assert_eq!(f.num_dots + f.num_dashes + f.num_digits + f.num_subdomains, 0);
        assert!(!f.has_ip_address && !f.has_suspicious_tld && !f.has_url_shortener);
        assert_eq!(f.entropy, 0.0);
    }

    #[test]
    fn test_domain_extraction() {
        assert_eq!(extract_domain("https://www.google.com"), "www.google.com");
        assert_eq!(extract_domain("http://example.com/a/b"), "example.com");
        assert_eq!(extract_domain("http://example.com:8080/x"), "example.com");
        assert_eq!(extract_domain("http://example.com?q=1"), "example.com");
        assert_eq!(extract_domain("example.com/path"), "example.com");
        assert_eq!(extract_domain("example.com"), "example.com");
        assert_eq!(extract_domain("//cdn.example.net/lib.js"), "cdn.example.net");
        assert_eq!(extract_domain(""), "");
    }

    #[test]
    fn test_domain_extraction_malformed() {
        assert_eq!(extract_domain("http://"), "");
        assert_eq!(extract_domain("http:///etc/passwd"), "");
        assert_eq!(extract_domain("mailto:someone@example.com"), "mailto");
        assert_eq!(extract_domain("::::"), "");
    }

    #[test]
    fn test_top_level_domain() {
        assert_eq!(top_level_domain("free-gift.xyz"), "xyz");
        assert_eq!(top_level_domain("example.com"), "com");
        assert_eq!(top_level_domain("localhost"), "");
        assert_eq!(top_level_domain("trailing."), "");
    }

    #[test]
    fn test_case_normalization() {
        let upper = UrlFeatures::extract("HTTPS://WWW.GOOGLE.COM");
        let lower = UrlFeatures::extract("https://www.google.com");
        assert_eq!(upper, lower);
    }

    #[test]
    fn test_ip_host() {
        let f = UrlFeatures::extract("http://192.168.1.1/login");
        assert!(f.has_ip_address);
        assert_eq!(f.num_subdomains, 3);
        assert_eq!(f.num_digits, 8);

        let f = UrlFeatures::extract("http://999.1.1.1/");
        assert!(!f.has_ip_address);
    }

    #[test]
    fn test_suspicious_tld() {
        assert!(UrlFeatures::extract("http://free-gift.xyz/claim").has_suspicious_tld);
        assert!(!UrlFeatures::extract("http://example.com").has_suspicious_tld);
        // a bare label has no tld
        assert!(!UrlFeatures::extract("xyz").has_suspicious_tld);
    }

    #[test]
    fn test_url_shortener() {
        assert!(UrlFeatures::extract("http://bit.ly/abc123").has_url_shortener);
        assert!(UrlFeatures::extract("http://notbit.ly.evil.com/x").has_url_shortener);
        assert!(!UrlFeatures::extract("https://example.org/bit.ly").has_url_shortener);
    }

    #[test]
    fn test_extract_with_custom_indicators() {
        let indicators = Indicators {
            suspicious_tlds: vec!["com".into()],
            url_shorteners: vec![],
        };
        let f = UrlFeatures::extract_with("http://bit.ly.example.com", &indicators);
        assert!(f.has_suspicious_tld);
        assert!(!f.has_url_shortener);
    }

    #[test]
    fn test_entropy() {
        assert_eq!(shannon_entropy(""), 0.0);
        assert_eq!(shannon_entropy("aaaa"), 0.0);
        assert!((shannon_entropy("ab") - 1.0).abs() < 1e-12);
        assert!((shannon_entropy("abcd") - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_extract_is_repeatable() {
        let url = "http://secure-login.paypal.com.verify-account-update.xyz/signin?id=12345";
        let a = UrlFeatures::extract(url);
        let b = UrlFeatures::extract(url);
        assert_eq!(a, b);
        assert_eq!(a.entropy.to_bits(), b.entropy.to_bits());
    }

    #[test]
    fn test_entropy_bits_stable_across_calls() {
        let url = "http://secure-login.paypal.com.verify-account-update.xyz/signin?id=12345";
        let first = UrlFeatures::extract(url).entropy.to_bits();
        for _ in 0..100 {
            assert_eq!(UrlFeatures::extract(url).entropy.to_bits(), first);
            assert_eq!(shannon_entropy(url).to_bits(), first);
        }
    }

    #[test]
    fn test_feature_normalization() {
        let normalized = UrlFeatures::extract("https://www.google.com").to_normalized_vec();
        assert_eq!(normalized.len(), FEATURE_COUNT);
        assert_eq!(normalized[2], 0.0, "https should normalize to 0");
        for &val in &normalized[..FEATURE_COUNT - 1] {
            assert!((0.0..=1.0).contains(&val), "Value {} out of range", val);
        }
        assert!((normalized[0] - 0.22).abs() < 1e-12);
        assert!((normalized[6] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_normalization_caps_and_uncapped_entropy() {
        let features = UrlFeatures {
            url_length: 500,
            domain_length: 120,
            has_https: false,
            num_dots: 40,
            num_dashes: 12,
            num_digits: 99,
            num_subdomains: 30,
            has_ip_address: true,
            has_suspicious_tld: true,
            has_url_shortener: true,
            entropy: 6.0,
        };
        let normalized = features.to_normalized_vec();
        assert!(normalized[..FEATURE_COUNT - 1].iter().all(|&v| v == 1.0));
        assert!((normalized[10] - 1.2).abs() < 1e-12);
    }
}
