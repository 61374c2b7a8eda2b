use serde::{Deserialize, Serialize};

/// How the distance between two clusters is derived from member distances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Linkage {
    /// Smallest pairwise distance
    Single,
    /// Largest pairwise distance
    #[default]
    Complete,
    /// Mean pairwise distance
    Average,
}

/// God-class clustering configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Clusters merge while their distance is strictly below this (default: 0.75)
    #[serde(default = "default_distance_threshold")]
    pub distance_threshold: f64,

    /// Cluster distance rule (default: complete)
    #[serde(default)]
    pub linkage: Linkage,

    /// Stop merging once this many clusters remain
    #[serde(default)]
    pub target_clusters: Option<usize>,

    /// Whether constructors take part in clustering (default: false)
    #[serde(default)]
    pub include_constructors: bool,

    /// Methods an extract-class candidate needs (default: 1)
    #[serde(default = "default_min_candidate_members")]
    pub min_candidate_methods: usize,

    /// Fields an extract-class candidate needs (default: 1)
    #[serde(default = "default_min_candidate_members")]
    pub min_candidate_fields: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            distance_threshold: default_distance_threshold(),
            linkage: Linkage::default(),
            target_clusters: None,
            include_constructors: false,
            min_candidate_methods: default_min_candidate_members(),
            min_candidate_fields: default_min_candidate_members(),
        }
    }
}

fn default_distance_threshold() -> f64 {
    0.75
}

fn default_min_candidate_members() -> usize {
    1
}
