//! Feature assembly, model prediction, and confidence calculation (C6).

pub mod confidence;
pub mod feature_store;
pub mod service;

pub mod prelude {
    pub use crate::confidence::{calculate_confidence, ConfidenceWeights};
    pub use crate::feature_store::{FeatureStore, NullFeatureStore};
    pub use crate::service::InferenceService;
}
