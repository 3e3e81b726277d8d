//! Ensemble configuration: weights, thresholds, policy, noise, indicator lists.
//!
//! Every field defaults to the built-in constants, so an override file only
//! needs the values it changes:
//!
//! ```json
//! { "policy": "two-class", "thresholds": { "safe_below": 0.25 } }
//! ```

use std::fs;
use std::path::Path;

use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};

use crate::model::WeightTable;
use crate::patterns::Indicators;
use crate::verdict::{Thresholds, VerdictPolicy};

/// Default upper bound of the per-model noise term.
pub const DEFAULT_NOISE_AMPLITUDE: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    pub weights: WeightTable,
    pub thresholds: Thresholds,
    pub policy: VerdictPolicy,
    /// Each member score gets `amplitude * U[0, 1)` added before clamping.
    pub noise_amplitude: f64,
    pub indicators: Indicators,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            weights: WeightTable::default(),
            thresholds: Thresholds::default(),
            policy: VerdictPolicy::default(),
            noise_amplitude: DEFAULT_NOISE_AMPLITUDE,
            indicators: Indicators::default(),
        }
    }
}

impl EnsembleConfig {
    pub fn with_policy(mut self, policy: VerdictPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Load a configuration override from a JSON file.
///
/// Values are not validated here; an inconsistent file surfaces as an
/// initialization error from the scorer.
pub fn load_config(path: &Path) -> Result<EnsembleConfig> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
    let config: EnsembleConfig = serde_json::from_str(&content)
        .wrap_err_with(|| format!("Failed to parse config file {}", path.display()))?;
    tracing::info!(path = %path.display(), policy = %config.policy, "loaded ensemble config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::XGBOOST_WEIGHTS;

    #[test]
    fn test_default_config_values() {
        let cfg = EnsembleConfig::default();
        assert_eq!(cfg.weights.xgboost, XGBOOST_WEIGHTS.to_vec());
        assert_eq!(cfg.thresholds.safe_below, 0.3);
        assert_eq!(cfg.thresholds.suspicious_below, 0.6);
        assert_eq!(cfg.thresholds.two_class_safe_above, 0.65);
        assert_eq!(cfg.policy, VerdictPolicy::ThreeClass);
        assert_eq!(cfg.noise_amplitude, 0.1);
        assert_eq!(cfg.indicators.suspicious_tlds.len(), 14);
        assert_eq!(cfg.indicators.url_shorteners.len(), 10);
    }

    #[test]
    fn test_partial_override() {
        let json = r#"{
            "policy": "two-class",
            "noise_amplitude": 0.0,
            "thresholds": { "safe_below": 0.25 },
            "indicators": { "suspicious_tlds": ["zip", "mov"] }
        }"#;
        let cfg: EnsembleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.policy, VerdictPolicy::TwoClass);
        assert_eq!(cfg.noise_amplitude, 0.0);
        assert_eq!(cfg.thresholds.safe_below, 0.25);
        assert_eq!(cfg.thresholds.suspicious_below, 0.6);
        assert_eq!(cfg.indicators.suspicious_tlds, vec!["zip", "mov"]);
        assert_eq!(cfg.indicators.url_shorteners.len(), 10);
        assert_eq!(cfg.weights, WeightTable::default());
    }

    #[test]
    fn test_empty_object_is_default() {
        let cfg: EnsembleConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, EnsembleConfig::default());
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("phisheye.json");
        fs::write(&path, r#"{ "weights": { "xgboost": [1.0, 1.0] } }"#).unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.weights.xgboost, vec![1.0, 1.0]);
        assert_eq!(cfg.weights.logistic.len(), 11);
    }

    #[test]
    fn test_load_config_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join("missing.json")).is_err());

        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }
}
