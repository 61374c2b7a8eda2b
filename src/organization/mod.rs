//! Code organization analysis: classifiers and god-class detection

pub mod classifiers;
pub mod clustering;
pub mod god_class;

pub use classifiers::{CodeCategory, CodeClassifier, TEST_CASE_CLASS};
pub use god_class::{ClusterReport, FieldUsage, GodClassAnalysis, GodClassDetector, SkipReason};
