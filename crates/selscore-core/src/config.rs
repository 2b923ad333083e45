//! Calibration constants and environment-variable overrides shared across
//! every component. Defaults come from `spec.md`; each has a named env var
//! override for operators, read with the same `env::var().ok().and_then`
//! pattern used throughout this workspace.

/// Environment variable names.
pub mod env_vars {
    pub const CONFIDENCE_SIGMA_REF: &str = "SELSCORE_CONFIDENCE_SIGMA_REF";
    pub const CONFIDENCE_WEIGHT_VARIANCE: &str = "SELSCORE_CONFIDENCE_WEIGHT_VARIANCE";
    pub const CONFIDENCE_WEIGHT_EXTREMITY: &str = "SELSCORE_CONFIDENCE_WEIGHT_EXTREMITY";
    pub const CONFIDENCE_WEIGHT_COMPLETENESS: &str = "SELSCORE_CONFIDENCE_WEIGHT_COMPLETENESS";

    pub const RATE_LIMIT_CALLS_PER_MINUTE: &str = "SELSCORE_LLM_RATE_LIMIT_PER_MINUTE";
    pub const RATE_LIMIT_CALLS_PER_HOUR: &str = "SELSCORE_LLM_RATE_LIMIT_PER_HOUR";
    pub const RATE_LIMIT_BURST_SIZE: &str = "SELSCORE_LLM_RATE_LIMIT_BURST";

    pub const METRICS_MAX_RECORDS: &str = "SELSCORE_METRICS_MAX_RECORDS";

    pub const BATCH_MAX_CONCURRENCY: &str = "SELSCORE_BATCH_MAX_CONCURRENCY";
    pub const BATCH_DEADLINE_SECS: &str = "SELSCORE_BATCH_DEADLINE_SECS";
    pub const BATCH_MAX_IDS: &str = "SELSCORE_BATCH_MAX_IDS";

    pub const LLM_CALL_DEADLINE_SECS: &str = "SELSCORE_LLM_CALL_DEADLINE_SECS";
    pub const FUSION_CONFIG_PATH: &str = "SELSCORE_FUSION_CONFIG_PATH";

    pub const MODEL_MANIFEST_PATH: &str = "SELSCORE_MODEL_MANIFEST_PATH";
    pub const MODEL_ARTIFACT_DIR: &str = "SELSCORE_MODEL_ARTIFACT_DIR";

    pub const LLM_ENDPOINT: &str = "SELSCORE_LLM_ENDPOINT";
    pub const LLM_MODEL: &str = "SELSCORE_LLM_MODEL";
}

/// Untyped defaults, named to match `spec.md`'s calibration notes.
pub mod defaults {
    /// Reference standard deviation used to normalize ensemble variance
    /// into the confidence blend's variance component.
    pub const CONFIDENCE_SIGMA_REF: f64 = 0.2;

    /// Confidence blend weights for the ordinary (non-degenerate) case:
    /// variance, extremity, completeness.
    pub const CONFIDENCE_WEIGHT_VARIANCE: f64 = 0.50;
    pub const CONFIDENCE_WEIGHT_EXTREMITY: f64 = 0.30;
    pub const CONFIDENCE_WEIGHT_COMPLETENESS: f64 = 0.20;

    /// Confidence blend weights when the ensemble degenerates to a single
    /// effective member (variance is undefined, so it is weighted down).
    pub const DEGENERATE_WEIGHT_VARIANCE: f64 = 0.20;
    pub const DEGENERATE_WEIGHT_EXTREMITY: f64 = 0.60;
    pub const DEGENERATE_WEIGHT_COMPLETENESS: f64 = 0.20;

    pub const RATE_LIMIT_CALLS_PER_MINUTE: u32 = 50;
    pub const RATE_LIMIT_CALLS_PER_HOUR: u32 = 500;
    pub const RATE_LIMIT_BURST_SIZE: u32 = 10;

    /// Oldest-first eviction ceiling for the in-memory metrics store.
    pub const METRICS_MAX_RECORDS: usize = 10_000;

    pub const BATCH_MAX_CONCURRENCY: usize = 16;
    pub const BATCH_DEADLINE_SECS: u64 = 60;
    pub const BATCH_MAX_IDS: usize = 100;

    pub const LLM_CALL_DEADLINE_SECS: u64 = 15;

    pub const FUSION_CONFIG_PATH: &str = "config/fusion_weights.toml";

    /// Where the manifest (skill -> version, expected hash) lives, and the
    /// directory holding the artifact bytes it indexes.
    pub const MODEL_MANIFEST_PATH: &str = "config/model_manifest.toml";
    pub const MODEL_ARTIFACT_DIR: &str = "models";

    pub const LLM_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
    pub const LLM_MODEL: &str = "gpt-4o-mini";

    /// Token budget halving sequence for rationale prompt assembly:
    /// start at 10 evidence items, halve (rounding down, floor 1) on
    /// each retry until the prompt fits the model's token budget.
    pub const EVIDENCE_BUDGET_SEQUENCE: [usize; 5] = [10, 5, 2, 1, 1];
}

/// Per-model-family token budgets used by C8 to decide how much evidence
/// fits in a single rationale prompt. Unknown model names fall back to
/// the most conservative entry.
pub mod token_budgets {
    pub const DEFAULT_FAMILY: &str = "default";

    /// `(model_family, max_prompt_tokens)`.
    pub const TABLE: &[(&str, usize)] = &[
        ("gpt-4o-mini", 8_000),
        ("gpt-4o", 16_000),
        ("claude-3-haiku", 8_000),
        (DEFAULT_FAMILY, 4_000),
    ];

    pub fn budget_for(model_family: &str) -> usize {
        TABLE
            .iter()
            .find(|(name, _)| *name == model_family)
            .map(|(_, budget)| *budget)
            .unwrap_or_else(|| {
                TABLE
                    .iter()
                    .find(|(name, _)| *name == DEFAULT_FAMILY)
                    .map(|(_, budget)| *budget)
                    .unwrap_or(4_000)
            })
    }
}

/// Typed readers: environment variable if set and parseable, else the
/// matching default from [`defaults`].
pub mod env {
    use super::{defaults, env_vars};

    fn read<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(default)
    }

    pub fn confidence_sigma_ref() -> f64 {
        read(env_vars::CONFIDENCE_SIGMA_REF, defaults::CONFIDENCE_SIGMA_REF)
    }

    pub fn confidence_weight_variance() -> f64 {
        read(
            env_vars::CONFIDENCE_WEIGHT_VARIANCE,
            defaults::CONFIDENCE_WEIGHT_VARIANCE,
        )
    }

    pub fn confidence_weight_extremity() -> f64 {
        read(
            env_vars::CONFIDENCE_WEIGHT_EXTREMITY,
            defaults::CONFIDENCE_WEIGHT_EXTREMITY,
        )
    }

    pub fn confidence_weight_completeness() -> f64 {
        read(
            env_vars::CONFIDENCE_WEIGHT_COMPLETENESS,
            defaults::CONFIDENCE_WEIGHT_COMPLETENESS,
        )
    }

    pub fn rate_limit_calls_per_minute() -> u32 {
        read(
            env_vars::RATE_LIMIT_CALLS_PER_MINUTE,
            defaults::RATE_LIMIT_CALLS_PER_MINUTE,
        )
    }

    pub fn rate_limit_calls_per_hour() -> u32 {
        read(
            env_vars::RATE_LIMIT_CALLS_PER_HOUR,
            defaults::RATE_LIMIT_CALLS_PER_HOUR,
        )
    }

    pub fn rate_limit_burst_size() -> u32 {
        read(env_vars::RATE_LIMIT_BURST_SIZE, defaults::RATE_LIMIT_BURST_SIZE)
    }

    pub fn metrics_max_records() -> usize {
        read(env_vars::METRICS_MAX_RECORDS, defaults::METRICS_MAX_RECORDS)
    }

    pub fn batch_max_concurrency() -> usize {
        read(env_vars::BATCH_MAX_CONCURRENCY, defaults::BATCH_MAX_CONCURRENCY)
    }

    pub fn batch_deadline_secs() -> u64 {
        read(env_vars::BATCH_DEADLINE_SECS, defaults::BATCH_DEADLINE_SECS)
    }

    pub fn batch_max_ids() -> usize {
        read(env_vars::BATCH_MAX_IDS, defaults::BATCH_MAX_IDS)
    }

    pub fn llm_call_deadline_secs() -> u64 {
        read(env_vars::LLM_CALL_DEADLINE_SECS, defaults::LLM_CALL_DEADLINE_SECS)
    }

    pub fn fusion_config_path() -> String {
        std::env::var(env_vars::FUSION_CONFIG_PATH)
            .unwrap_or_else(|_| defaults::FUSION_CONFIG_PATH.to_string())
    }

    pub fn model_manifest_path() -> String {
        std::env::var(env_vars::MODEL_MANIFEST_PATH)
            .unwrap_or_else(|_| defaults::MODEL_MANIFEST_PATH.to_string())
    }

    pub fn model_artifact_dir() -> String {
        std::env::var(env_vars::MODEL_ARTIFACT_DIR)
            .unwrap_or_else(|_| defaults::MODEL_ARTIFACT_DIR.to_string())
    }

    pub fn llm_endpoint() -> String {
        std::env::var(env_vars::LLM_ENDPOINT).unwrap_or_else(|_| defaults::LLM_ENDPOINT.to_string())
    }

    pub fn llm_model() -> String {
        std::env::var(env_vars::LLM_MODEL).unwrap_or_else(|_| defaults::LLM_MODEL.to_string())
    }
}
