//! Model artifact loading and tree-ensemble prediction (C5).

pub mod artifact;
pub mod ensemble;
pub mod manifest;
pub mod registry;
pub mod tree;

pub mod prelude {
    pub use crate::artifact::{content_hash, ModelArtifact};
    pub use crate::ensemble::{Ensemble, EnsembleOutput};
    pub use crate::manifest::{load_manifest_file, read_artifact_bytes};
    pub use crate::registry::{ManifestEntry, ModelRegistry};
    pub use crate::tree::{RegressionTree, TreeNode};
}
