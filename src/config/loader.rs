use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::CohesionConfig;
use crate::core::{Error, Result, ResultExt};

/// File name searched for by [`load_config`]
pub const CONFIG_FILE_NAME: &str = ".cohesionmap.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse a TOML document and validate it
pub fn parse_and_validate_config(contents: &str) -> Result<CohesionConfig> {
    let config = toml::from_str::<CohesionConfig>(contents)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate the configuration at `path`
pub fn load_config_from_path(path: &Path) -> Result<CohesionConfig> {
    let contents = read_config_file(path).map_err(|e| {
        Error::configuration(
            format!("Failed to read {}: {}", path.display(), e),
            Some(path.to_path_buf()),
        )
    })?;
    let config =
        parse_and_validate_config(&contents).context(format!("Invalid {}", path.display()))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Like [`load_config_from_path`], but a missing or broken file is logged
/// and skipped
pub(crate) fn try_load_config_from_path(path: &Path) -> Option<CohesionConfig> {
    if !path.is_file() {
        return None;
    }
    match load_config_from_path(path) {
        Ok(config) => Some(config),
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// `start` and its ancestors, nearest first, at most `max_depth` of them
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `.cohesionmap.toml` upward from `start`
pub fn find_config_from(start: PathBuf) -> Option<CohesionConfig> {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
}

/// Search `.cohesionmap.toml` upward from the working directory, falling
/// back to defaults
pub fn load_config() -> CohesionConfig {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return CohesionConfig::default();
        }
    };

    find_config_from(current).unwrap_or_else(|| {
        log::debug!(
            "No config found after checking {} directories. Using default config.",
            MAX_TRAVERSAL_DEPTH
        );
        CohesionConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Linkage;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document_is_default() {
        let config = parse_and_validate_config("").unwrap();
        assert_eq!(config, CohesionConfig::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = parse_and_validate_config(indoc! {r#"
            [clustering]
            distance_threshold = 0.5
            linkage = "average"

            [classification]
            skip_test_classes = false
        "#})
        .unwrap();

        assert_eq!(config.clustering.distance_threshold, 0.5);
        assert_eq!(config.clustering.linkage, Linkage::Average);
        assert_eq!(config.clustering.min_candidate_methods, 1);
        assert!(!config.classification.skip_test_classes);
        assert!(config.classification.skip_generated_classes);
        assert_eq!(
            config.classification.test_base_classes,
            vec!["junit.framework.TestCase".to_string()]
        );
        assert_eq!(config.resolution.max_hierarchy_depth, 256);
    }

    #[test]
    fn test_out_of_range_threshold_rejected() {
        for threshold in ["0.0", "1.5", "-0.2"] {
            let doc = format!("[clustering]\ndistance_threshold = {threshold}\n");
            let err = parse_and_validate_config(&doc).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{threshold}: {err}");
        }
    }

    #[test]
    fn test_zero_target_and_depth_rejected() {
        assert!(parse_and_validate_config("[clustering]\ntarget_clusters = 0\n").is_err());
        assert!(parse_and_validate_config("[resolution]\nmax_hierarchy_depth = 0\n").is_err());
    }

    #[test]
    fn test_unknown_linkage_is_parse_error() {
        let err = parse_and_validate_config("[clustering]\nlinkage = \"ward\"\n").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let err = load_config_from_path(Path::new("/nonexistent/.cohesionmap.toml")).unwrap_err();
        assert!(matches!(err, Error::Configuration { path: Some(_), .. }));
    }

    #[test]
    fn test_directory_ancestors_bounded() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c"), 2).collect();
        assert_eq!(dirs, vec![PathBuf::from("/a/b/c"), PathBuf::from("/a/b")]);
    }
}
