//! PhishEye: heuristic URL phishing classification.
//!
//! Classifies URLs into three categories:
//! - **SAFE**: few or no risk signals
//! - **SUSPICIOUS**: some risk signals, worth a second look
//! - **DANGEROUS**: multiple indicators of a phishing site
//!
//! The pipeline is local and synchronous: [`features::UrlFeatures::extract`]
//! turns a URL string into 11 features, the features are normalized, and an
//! [`ensemble::EnsembleScorer`] averages three weighted members into a risk
//! confidence that a [`verdict::VerdictPolicy`] maps to a verdict. No URL is
//! ever fetched or resolved.
//!
//! Uses structured logging via [`tracing`]. Set the `RUST_LOG` environment
//! variable to control log verbosity (e.g., `RUST_LOG=phisheye=debug`).

pub mod batch;
pub mod config;
pub mod ensemble;
pub mod error;
pub mod features;
pub mod model;
pub mod noise;
pub mod patterns;
pub mod scores;
pub mod verdict;

use serde::Serialize;
use sha2::{Digest, Sha256};

pub use config::EnsembleConfig;
pub use ensemble::{EnsembleResult, EnsembleScorer};
pub use error::ClassifierError;
pub use features::UrlFeatures;
pub use verdict::{Verdict, VerdictPolicy};

use crate::noise::NoiseSource;
use crate::verdict::{derive_reasoning, risk_factors, RiskFactor};

/// Version prefix for configuration hashes. Bump when serialization format changes.
const CONFIG_HASH_VERSION: &str = "v1";

/// Full result of analyzing one URL.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub url: String,
    pub features: UrlFeatures,
    #[serde(flatten)]
    pub result: EnsembleResult,
    pub risk_factors: Vec<RiskFactor>,
    pub reasoning: String,
}

/// Extract features from `url` with the built-in indicator lists.
pub fn extract_features(url: &str) -> UrlFeatures {
    UrlFeatures::extract(url)
}

impl<N: NoiseSource> EnsembleScorer<N> {
    /// Extract, score and explain a URL.
    ///
    /// Extraction uses the indicator lists from this scorer's configuration.
    pub fn analyze(&mut self, url: &str) -> Result<Analysis, ClassifierError> {
        let features = UrlFeatures::extract_with(url, &self.config().indicators);
        tracing::debug!(url, features = ?features, "extracted url features");

        let result = self.classify(&features)?;
        let factors = risk_factors(&features);
        let reasoning = derive_reasoning(result.verdict, &factors);

        Ok(Analysis {
            url: url.to_string(),
            features,
            result,
            risk_factors: factors,
            reasoning,
        })
    }
}

/// Compute the SHA-256 fingerprint of an ensemble configuration.
///
/// Identifies the weights, thresholds, policy and indicator lists a result
/// was produced with.
pub fn config_hash(config: &EnsembleConfig) -> String {
    let serialized =
        serde_json::to_vec(config).unwrap_or_else(|_| format!("{:?}", config).into_bytes());
    let mut hasher = Sha256::new();
    hasher.update(CONFIG_HASH_VERSION.as_bytes());
    hasher.update(&serialized);
    format!("sha256:{}", hex::encode(hasher.finalize()))
}
