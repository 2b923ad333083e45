//! The error taxonomy shared across every component (see `spec.md` §7).
//!
//! Each component crate is free to keep its own narrower `thiserror` enum
//! for local detail, but every one of those enums converts into `SelError`
//! at its crate boundary so `selscore-api` has a single place to map the
//! taxonomy onto HTTP status codes.

use thiserror::Error;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, SelError>;

/// Semantic error kinds from the error-handling design (`spec.md` §7).
#[derive(Debug, Error)]
pub enum SelError {
    /// Feature vector length did not match the active manifest length.
    #[error("feature vector length {actual} does not match manifest length {expected} for skill {skill}")]
    FeatureShape {
        skill: String,
        expected: usize,
        actual: usize,
    },

    /// Model artifact content hash did not match the manifest index.
    /// Fatal at startup; never recovered.
    #[error("artifact integrity check failed for skill {skill}: expected hash {expected}, got {actual}")]
    ArtifactIntegrity {
        skill: String,
        expected: String,
        actual: String,
    },

    /// Fusion config failed validation; the caller's write is refused and
    /// the previously active config is retained.
    #[error("invalid fusion config at {field_path}: {message}")]
    InvalidConfig {
        field_path: String,
        message: String,
    },

    /// A required upstream collaborator (feature store, secret backend) was
    /// unavailable. Never silently substituted with defaults.
    #[error("upstream unavailable: {source_name}: {message}")]
    UpstreamUnavailable {
        source_name: String,
        message: String,
    },

    /// The model predictor itself failed (not a shape mismatch).
    #[error("prediction failed for skill {skill}: {message}")]
    PredictionFailure { skill: String, message: String },

    /// The LLM rate limiter refused to grant a token. Always recovered by
    /// falling back to the template rationale.
    #[error("rate limited: {limiter}, retry after {retry_after_secs:.2}s")]
    RateLimited {
        limiter: String,
        retry_after_secs: f64,
    },

    /// Network failure, timeout, or unparseable response from the LLM.
    /// Always recovered by falling back to the template rationale.
    #[error("LLM transport failure: {message}")]
    LlmTransportFailure { message: String },

    /// Fusion had no non-model evidence sources; recovered with
    /// `degraded_fusion = true`.
    #[error("insufficient evidence for skill {skill}: only the model source was available")]
    InsufficientEvidence { skill: String },

    /// A batch or per-call deadline elapsed before work finished.
    #[error("deadline exceeded: {operation} after {elapsed_ms}ms")]
    DeadlineExceeded { operation: String, elapsed_ms: u64 },

    /// Process-fatal configuration problem (e.g. a required secret absent
    /// from every source at startup).
    #[error("fatal configuration error: {0}")]
    FatalConfig(String),

    /// Anything else, preserved for context rather than information loss.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SelError {
    /// Stable, low-cardinality category string for metrics records
    /// (`error_category` in `spec.md` §4.3).
    pub fn category(&self) -> &'static str {
        match self {
            SelError::FeatureShape { .. } => "feature_shape",
            SelError::ArtifactIntegrity { .. } => "artifact_integrity",
            SelError::InvalidConfig { .. } => "invalid_config",
            SelError::UpstreamUnavailable { .. } => "upstream_unavailable",
            SelError::PredictionFailure { .. } => "prediction_failure",
            SelError::RateLimited { .. } => "rate_limited",
            SelError::LlmTransportFailure { .. } => "llm_transport_failure",
            SelError::InsufficientEvidence { .. } => "insufficient_evidence",
            SelError::DeadlineExceeded { .. } => "deadline_exceeded",
            SelError::FatalConfig(_) => "fatal_config",
            SelError::Internal(_) => "internal",
        }
    }

    /// Whether this error kind is always locally recovered (never
    /// surfaced as a failed result) per the propagation policy in
    /// `spec.md` §7.
    pub fn always_recovered(&self) -> bool {
        matches!(
            self,
            SelError::RateLimited { .. }
                | SelError::LlmTransportFailure { .. }
                | SelError::InsufficientEvidence { .. }
        )
    }
}
