use serde::{Deserialize, Serialize};

use super::classification::ClassificationConfig;
use super::clustering::ClusteringConfig;
use super::resolution::ResolutionConfig;
use crate::core::{Error, Result};

/// Root configuration structure, read from `.cohesionmap.toml`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CohesionConfig {
    #[serde(default)]
    pub clustering: ClusteringConfig,

    #[serde(default)]
    pub classification: ClassificationConfig,

    #[serde(default)]
    pub resolution: ResolutionConfig,
}

impl CohesionConfig {
    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<()> {
        let threshold = self.clustering.distance_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(Error::Validation(format!(
                "clustering.distance_threshold must be in (0, 1], got {threshold}"
            )));
        }
        if self.clustering.target_clusters == Some(0) {
            return Err(Error::Validation(
                "clustering.target_clusters must be at least 1".to_string(),
            ));
        }
        if self.resolution.max_hierarchy_depth == 0 {
            return Err(Error::Validation(
                "resolution.max_hierarchy_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
