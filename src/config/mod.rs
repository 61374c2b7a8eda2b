//! Analysis configuration
//!
//! Loaded from `.cohesionmap.toml`. Every section and every key is optional;
//! missing values take the defaults documented on each field.

mod classification;
mod clustering;
mod core;
mod loader;
mod resolution;

pub use self::core::CohesionConfig;
pub use classification::ClassificationConfig;
pub use clustering::{ClusteringConfig, Linkage};
pub use loader::{
    directory_ancestors, find_config_from, load_config, load_config_from_path,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use resolution::ResolutionConfig;
