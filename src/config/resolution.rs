use serde::{Deserialize, Serialize};

use crate::model::DEFAULT_MAX_HIERARCHY_DEPTH;

/// Reference resolution configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionConfig {
    /// Bound on superclass and enclosing-class walks (default: 256)
    #[serde(default = "default_max_hierarchy_depth")]
    pub max_hierarchy_depth: usize,

    /// Let inner classes resolve members of their enclosing classes (default: true)
    #[serde(default = "default_search_enclosing_scopes")]
    pub search_enclosing_scopes: bool,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            max_hierarchy_depth: default_max_hierarchy_depth(),
            search_enclosing_scopes: default_search_enclosing_scopes(),
        }
    }
}

fn default_max_hierarchy_depth() -> usize {
    DEFAULT_MAX_HIERARCHY_DEPTH
}

fn default_search_enclosing_scopes() -> bool {
    true
}
