//! Ensemble scorer: weighted members, noise, aggregation and verdict.
//!
//! The scorer has a two-state lifecycle. [`EnsembleScorer::initialize`]
//! validates the configuration and builds the member set once; later calls
//! are no-ops. Scoring before initialization fails with
//! [`ClassifierError::NotReady`]. A failed initialization leaves the scorer
//! uninitialized so the caller can retry.

use rand::rngs::ThreadRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EnsembleConfig;
use crate::error::{ClassifierError, ClassifierResult};
use crate::features::{UrlFeatures, FEATURE_COUNT};
use crate::model::{weighted_score, ModelKind};
use crate::noise::{NoiseSource, RngNoise};
use crate::scores::ModelScores;
use crate::verdict::{Verdict, VerdictPolicy};

/// Outcome of scoring one feature vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleResult {
    pub verdict: Verdict,
    /// Mean of the member scores, in [0, 1]. Higher means riskier.
    pub confidence: f64,
    pub scores: ModelScores,
    pub policy: VerdictPolicy,
}

/// A validated ensemble member.
#[derive(Debug, Clone)]
struct Member {
    kind: ModelKind,
    weights: [f64; FEATURE_COUNT],
}

#[derive(Debug)]
enum ScorerState {
    Uninitialized,
    Ready(Vec<Member>),
}

/// Owns the configuration, the noise source and the member set.
pub struct EnsembleScorer<N: NoiseSource = RngNoise<ThreadRng>> {
    config: EnsembleConfig,
    noise: N,
    state: ScorerState,
    model_builds: u32,
}

impl EnsembleScorer {
    /// Scorer with non-deterministic noise from the thread RNG.
    pub fn new(config: EnsembleConfig) -> Self {
        Self::with_noise(config, RngNoise::thread())
    }
}

impl<N: NoiseSource> EnsembleScorer<N> {
    pub fn with_noise(config: EnsembleConfig, noise: N) -> Self {
        Self {
            config,
            noise,
            state: ScorerState::Uninitialized,
            model_builds: 0,
        }
    }

    pub fn config(&self) -> &EnsembleConfig {
        &self.config
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ScorerState::Ready(_))
    }

    /// Number of times the member set has been built.
    pub fn model_builds(&self) -> u32 {
        self.model_builds
    }

    /// Build the member set. Idempotent once it has succeeded.
    pub fn initialize(&mut self) -> ClassifierResult<()> {
        if self.is_ready() {
            debug!("ensemble already initialized");
            return Ok(());
        }

        let members = build_members(&self.config)?;
        self.model_builds += 1;
        self.state = ScorerState::Ready(members);

        info!(
            policy = %self.config.policy,
            noise_amplitude = self.config.noise_amplitude,
            "ensemble initialized"
        );
        Ok(())
    }

    /// Score a normalized feature vector of length [`FEATURE_COUNT`].
    pub fn score(&mut self, normalized: &[f64]) -> ClassifierResult<EnsembleResult> {
        let ScorerState::Ready(members) = &self.state else {
            return Err(ClassifierError::NotReady);
        };
        if normalized.len() != FEATURE_COUNT {
            return Err(ClassifierError::Input {
                expected: FEATURE_COUNT,
                actual: normalized.len(),
            });
        }
        if let Some(index) = normalized.iter().position(|v| !v.is_finite()) {
            return Err(ClassifierError::NonFinite { index });
        }

        let amplitude = self.config.noise_amplitude;
        let mut scores = ModelScores::default();
        for member in members {
            let raw = weighted_score(normalized, &member.weights);
            let score = (raw + self.noise.draw() * amplitude).clamp(0.0, 1.0);
            scores.set(member.kind, score);
        }

        let confidence = scores.mean();
        let policy = self.config.policy;
        let verdict = self.config.thresholds.verdict(policy, confidence);

        debug!(
            features = ?normalized,
            xgboost = scores.xgboost,
            logistic = scores.logistic,
            gaussian = scores.gaussian,
            spread = scores.spread(),
            confidence,
            verdict = %verdict,
            "ensemble scores"
        );
        if scores.is_split() {
            debug!(spread = scores.spread(), "ensemble members disagree");
        }

        Ok(EnsembleResult {
            verdict,
            confidence,
            scores,
            policy,
        })
    }

    /// Normalize `features` and score them.
    pub fn classify(&mut self, features: &UrlFeatures) -> ClassifierResult<EnsembleResult> {
        self.score(&features.to_normalized_vec())
    }
}

/// Validate the configuration and turn it into fixed-size members.
fn build_members(config: &EnsembleConfig) -> ClassifierResult<Vec<Member>> {
    let amplitude = config.noise_amplitude;
    if !amplitude.is_finite() || !(0.0..=1.0).contains(&amplitude) {
        return Err(ClassifierError::Init(format!(
            "noise_amplitude must be within [0, 1], got {amplitude}"
        )));
    }

    let t = &config.thresholds;
    let cuts = [t.two_class_safe_above, t.safe_below, t.suspicious_below];
    if cuts.iter().any(|c| !c.is_finite() || !(0.0..=1.0).contains(c)) {
        return Err(ClassifierError::Init(format!(
            "thresholds must be within [0, 1], got {cuts:?}"
        )));
    }
    if t.safe_below > t.suspicious_below {
        return Err(ClassifierError::Init(format!(
            "safe_below ({}) must not exceed suspicious_below ({})",
            t.safe_below, t.suspicious_below
        )));
    }

    ModelKind::ALL
        .into_iter()
        .map(|kind| {
            let raw = config.weights.get(kind);
            let weights: [f64; FEATURE_COUNT] = raw.try_into().map_err(|_| {
                ClassifierError::Init(format!(
                    "{} weights must have {} entries, got {}",
                    kind.as_str(),
                    FEATURE_COUNT,
                    raw.len()
                ))
            })?;
            if weights.iter().any(|w| !w.is_finite()) {
                return Err(ClassifierError::Init(format!(
                    "{} weights contain a non-finite value",
                    kind.as_str()
                )));
            }
            Ok(Member { kind, weights })
        })
        .collect()
}
