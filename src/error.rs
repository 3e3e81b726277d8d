use thiserror::Error;

/// Errors raised by the ensemble scorer.
///
/// URL feature extraction never fails and has no variant here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// Model set could not be built from the configuration. The scorer stays
    /// uninitialized and `initialize()` may be called again.
    #[error("Failed to initialize ensemble: {0}")]
    Init(String),

    /// Normalized feature vector has the wrong dimensionality.
    #[error("Invalid feature vector: expected {expected} values, got {actual}")]
    Input { expected: usize, actual: usize },

    /// Normalized feature vector contains NaN or an infinity.
    #[error("Invalid feature vector: value at index {index} is not finite")]
    NonFinite { index: usize },

    /// `score`/`classify` called before `initialize()`.
    #[error("Ensemble not initialized; call initialize() first")]
    NotReady,
}

pub type ClassifierResult<T> = Result<T, ClassifierError>;
