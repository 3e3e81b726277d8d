//! Ensemble members: three nominal models sharing one weighted-sum scorer.
//!
//! The names follow the classifiers the ensemble imitates (gradient-boosted
//! trees, logistic regression, a gaussian model) but every member is the same
//! function, `Σ feature·weight / n`, parameterized by its own weight vector.
//! Weights are hand-picked, not trained.
//!
//! Weight index order matches [`crate::features::FEATURE_NAMES`]:
//!
//! ```text
//! 0: url_length      4: num_dashes       8: has_suspicious_tld
//! 1: domain_length   5: num_digits       9: has_url_shortener
//! 2: missing_https   6: num_subdomains  10: entropy
//! 3: num_dots        7: has_ip_address
//! ```

use serde::{Deserialize, Serialize};

use crate::features::FEATURE_COUNT;

pub const XGBOOST_WEIGHTS: [f64; FEATURE_COUNT] =
    [0.8, 0.7, 0.9, 0.6, 0.7, 0.6, 0.8, 0.95, 0.85, 0.9, 0.6];

pub const LOGISTIC_WEIGHTS: [f64; FEATURE_COUNT] =
    [0.7, 0.6, 0.8, 0.5, 0.6, 0.5, 0.7, 0.9, 0.8, 0.85, 0.55];

pub const GAUSSIAN_WEIGHTS: [f64; FEATURE_COUNT] =
    [0.75, 0.65, 0.85, 0.55, 0.65, 0.55, 0.75, 0.9, 0.82, 0.87, 0.58];

/// Ensemble member names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Xgboost,
    Logistic,
    Gaussian,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [Self::Xgboost, Self::Logistic, Self::Gaussian];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xgboost => "xgboost",
            Self::Logistic => "logistic",
            Self::Gaussian => "gaussian",
        }
    }
}

/// One weight vector per ensemble member.
///
/// Stored as `Vec` so that a configuration file can supply any length;
/// dimensionality is checked when the scorer initializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightTable {
    pub xgboost: Vec<f64>,
    pub logistic: Vec<f64>,
    pub gaussian: Vec<f64>,
}

impl Default for WeightTable {
    fn default() -> Self {
        Self {
            xgboost: XGBOOST_WEIGHTS.to_vec(),
            logistic: LOGISTIC_WEIGHTS.to_vec(),
            gaussian: GAUSSIAN_WEIGHTS.to_vec(),
        }
    }
}

impl WeightTable {
    /// Every member uses the same weights.
    pub fn uniform(weights: [f64; FEATURE_COUNT]) -> Self {
        Self {
            xgboost: weights.to_vec(),
            logistic: weights.to_vec(),
            gaussian: weights.to_vec(),
        }
    }

    pub fn get(&self, kind: ModelKind) -> &[f64] {
        match kind {
            ModelKind::Xgboost => &self.xgboost,
            ModelKind::Logistic => &self.logistic,
            ModelKind::Gaussian => &self.gaussian,
        }
    }
}

/// Weighted mean of `features` under `weights`, before noise and clamping.
///
/// Both slices must have the same length; callers validate this up front.
pub fn weighted_score(features: &[f64], weights: &[f64]) -> f64 {
    debug_assert_eq!(features.len(), weights.len());
    if weights.is_empty() {
        return 0.0;
    }
    let sum: f64 = features.iter().zip(weights).map(|(f, w)| f * w).sum();
    sum / weights.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weighted_score_zero_vector() {
        let zeros = [0.0; FEATURE_COUNT];
        for kind in ModelKind::ALL {
            let weights = WeightTable::default();
            assert_eq!(weighted_score(&zeros, weights.get(kind)), 0.0);
        }
    }

    #[test]
    fn test_weighted_score_ones_is_mean_weight() {
        let ones = [1.0; FEATURE_COUNT];
        let table = WeightTable::default();
        let xgb = weighted_score(&ones, table.get(ModelKind::Xgboost));
        let log = weighted_score(&ones, table.get(ModelKind::Logistic));
        let gau = weighted_score(&ones, table.get(ModelKind::Gaussian));
        assert!((xgb - 8.4 / 11.0).abs() < 1e-12, "xgboost {}", xgb);
        assert!((log - 7.5 / 11.0).abs() < 1e-12, "logistic {}", log);
        assert!((gau - 7.92 / 11.0).abs() < 1e-12, "gaussian {}", gau);
    }

    #[test]
    fn test_uniform_table() {
        let table = WeightTable::uniform([1.0; FEATURE_COUNT]);
        let ones = [1.0; FEATURE_COUNT];
        for kind in ModelKind::ALL {
            assert!((weighted_score(&ones, table.get(kind)) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_model_kind_names() {
        let names: Vec<_> = ModelKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, ["xgboost", "logistic", "gaussian"]);
    }
}
