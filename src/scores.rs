//! ModelScores: per-member output of the ensemble.

use serde::{Deserialize, Serialize};

use crate::model::ModelKind;

/// Spread between the highest and lowest member score above which the
/// ensemble is considered split. Logged, never used to change a verdict.
pub const DISAGREEMENT_THRESHOLD: f64 = 0.25;

/// Score of each ensemble member, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelScores {
    pub xgboost: f64,
    pub logistic: f64,
    pub gaussian: f64,
}

impl ModelScores {
    pub fn set(&mut self, kind: ModelKind, score: f64) {
        match kind {
            ModelKind::Xgboost => self.xgboost = score,
            ModelKind::Logistic => self.logistic = score,
            ModelKind::Gaussian => self.gaussian = score,
        }
    }

    pub fn get(&self, kind: ModelKind) -> f64 {
        match kind {
            ModelKind::Xgboost => self.xgboost,
            ModelKind::Logistic => self.logistic,
            ModelKind::Gaussian => self.gaussian,
        }
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.xgboost, self.logistic, self.gaussian]
    }

    /// Arithmetic mean of the member scores: the ensemble confidence.
    pub fn mean(&self) -> f64 {
        self.to_array().iter().sum::<f64>() / 3.0
    }

    /// Difference between the highest and lowest member score.
    pub fn spread(&self) -> f64 {
        let scores = self.to_array();
        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
        max - min
    }

    /// Returns true if the members disagree by more than [`DISAGREEMENT_THRESHOLD`].
    pub fn is_split(&self) -> bool {
        self.spread() > DISAGREEMENT_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        let scores = ModelScores {
            xgboost: 0.3,
            logistic: 0.6,
            gaussian: 0.9,
        };
        assert!((scores.mean() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_set_by_kind() {
        let mut scores = ModelScores::default();
        for (i, kind) in ModelKind::ALL.into_iter().enumerate() {
            scores.set(kind, i as f64 / 10.0);
        }
        assert_eq!(scores.to_array(), [0.0, 0.1, 0.2]);
        assert_eq!(scores.get(ModelKind::Gaussian), 0.2);
    }

    #[test]
    fn test_spread_and_split() {
        let agree = ModelScores {
            xgboost: 0.40,
            logistic: 0.35,
            gaussian: 0.38,
        };
        assert!((agree.spread() - 0.05).abs() < 1e-12);
        assert!(!agree.is_split());

        let split = ModelScores {
            xgboost: 0.9,
            logistic: 0.1,
            gaussian: 0.5,
        };
        assert!(split.is_split());
    }

    #[test]
    fn test_serializes_with_model_names() {
        let json = serde_json::to_value(ModelScores::default()).unwrap();
        assert!(json.get("xgboost").is_some());
        assert!(json.get("logistic").is_some());
        assert!(json.get("gaussian").is_some());
    }
}
