//! Code-smell classifiers
//!
//! Pure predicates deciding whether a class is test code or the output of
//! a parser generator. Both are used to keep such classes out of god-class
//! analysis.

use crate::config::ClassificationConfig;
use crate::model::{ClassEntity, ClassRegistry};
use serde::Serialize;

/// Base class of JUnit 3 style tests
pub const TEST_CASE_CLASS: &str = "junit.framework.TestCase";

/// A comment pattern identifying generated source.
///
/// Matches when every fragment occurs in the comment text (case-sensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorSignature {
    pub tool: &'static str,
    pub fragments: &'static [&'static str],
}

impl GeneratorSignature {
    pub fn matches(&self, text: &str) -> bool {
        self.fragments.iter().all(|fragment| text.contains(fragment))
    }
}

pub const PARSER_GENERATOR_SIGNATURES: &[GeneratorSignature] = &[
    GeneratorSignature {
        tool: "JavaCC",
        fragments: &["Generated By:JavaCC"],
    },
    GeneratorSignature {
        tool: "JJTree",
        fragments: &["Generated By:JJTree"],
    },
    GeneratorSignature {
        tool: "ANTLR",
        fragments: &["Generated from", "by ANTLR"],
    },
    GeneratorSignature {
        tool: "JFlex",
        fragments: &["generated by JFlex"],
    },
    GeneratorSignature {
        tool: "CUP",
        fragments: &["generated by CUP"],
    },
    GeneratorSignature {
        tool: "jay",
        fragments: &["created by jay"],
    },
];

/// Whether a single comment carries one of the built-in generator markers
pub fn is_parser_generator_comment(text: &str) -> bool {
    generator_of(text).is_some()
}

/// Name of the tool whose marker appears in `text`
pub fn generator_of(text: &str) -> Option<&'static str> {
    PARSER_GENERATOR_SIGNATURES
        .iter()
        .find(|signature| signature.matches(text))
        .map(|signature| signature.tool)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeCategory {
    Production,
    Test,
    Generated,
}

/// Classifier configured with extra base classes and generator markers
#[derive(Debug, Clone)]
pub struct CodeClassifier {
    test_base_classes: Vec<String>,
    extra_generator_markers: Vec<String>,
}

impl Default for CodeClassifier {
    fn default() -> Self {
        Self {
            test_base_classes: vec![TEST_CASE_CLASS.to_string()],
            extra_generator_markers: Vec::new(),
        }
    }
}

impl CodeClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ClassificationConfig) -> Self {
        Self {
            test_base_classes: config.test_base_classes.clone(),
            extra_generator_markers: config.extra_generator_markers.clone(),
        }
    }

    /// Test-annotated method, or a superclass chain reaching a test base
    pub fn is_test_class(&self, class: &ClassEntity, registry: &ClassRegistry) -> bool {
        class.contains_method_with_test_annotation()
            || class.extends_any_of(registry, &self.test_base_classes)
    }

    /// Built-in generator markers plus any configured extras
    pub fn is_generated(&self, class: &ClassEntity) -> bool {
        class.is_generated_by_parser_generator()
            || class.comments().iter().any(|comment| {
                self.extra_generator_markers
                    .iter()
                    .any(|marker| comment.text().contains(marker.as_str()))
            })
    }

    /// Generated wins over test when both apply
    pub fn categorize(&self, class: &ClassEntity, registry: &ClassRegistry) -> CodeCategory {
        if self.is_generated(class) {
            CodeCategory::Generated
        } else if self.is_test_class(class, registry) {
            CodeCategory::Test
        } else {
            CodeCategory::Production
        }
    }
}
