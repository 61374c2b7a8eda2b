//! Distance-based clustering of class members
//!
//! Each method and field of a class gets an entity set (see
//! [`similarity::EntitySet`]); members are compared by Jaccard distance and
//! grouped with hierarchical agglomerative clustering. Groups that separate
//! cleanly from the rest of the class are extract-class candidates.

mod hierarchical;
mod similarity;

pub use hierarchical::{Cluster, HierarchicalClustering};
pub use similarity::{jaccard_distance, DistanceMatrix, EntitySet};

use serde::Serialize;
use std::fmt;

/// A clustered member, named by its entity key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", content = "key", rename_all = "snake_case")]
pub enum MemberId {
    /// `pkg.Class#name(params)`
    Method(String),
    /// `pkg.Class.name`
    Field(String),
}

impl MemberId {
    pub fn key(&self) -> &str {
        match self {
            Self::Method(key) | Self::Field(key) => key,
        }
    }

    pub fn is_method(&self) -> bool {
        matches!(self, Self::Method(_))
    }

    pub fn is_field(&self) -> bool {
        matches!(self, Self::Field(_))
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
