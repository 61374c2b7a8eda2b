use serde::{Deserialize, Serialize};

use crate::organization::classifiers::TEST_CASE_CLASS;

/// Which classes are kept out of god-class analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Skip classes recognized as tests (default: true)
    #[serde(default = "default_true")]
    pub skip_test_classes: bool,

    /// Skip classes produced by parser generators (default: true)
    #[serde(default = "default_true")]
    pub skip_generated_classes: bool,

    /// Qualified names of test base classes
    #[serde(default = "default_test_base_classes")]
    pub test_base_classes: Vec<String>,

    /// Additional comment fragments marking generated code
    #[serde(default)]
    pub extra_generator_markers: Vec<String>,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            skip_test_classes: true,
            skip_generated_classes: true,
            test_base_classes: default_test_base_classes(),
            extra_generator_markers: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_test_base_classes() -> Vec<String> {
    vec![TEST_CASE_CLASS.to_string()]
}
