//! Class cohesion analysis core.
//!
//! Builds an entity model of classes, methods, fields and comments from
//! front-end syntax trees, decomposes method bodies into statement trees,
//! resolves field and method references through superclass and enclosing
//! scopes, classifies test and generated code, and clusters class members
//! to find god classes and extract-class candidates.

// Export modules for library usage
pub mod config;
pub mod core;
pub mod decomposition;
pub mod model;
pub mod observability;
pub mod organization;
pub mod resolution;
pub mod session;
pub mod testkit;

// Re-export commonly used types
pub use crate::core::{Error, Result, ResultExt};

pub use crate::config::{load_config, parse_and_validate_config, CohesionConfig, Linkage};

pub use crate::decomposition::{
    MethodBody, OwnedNode, Statement, StatementDecomposer, SyntaxKind, SyntaxNode, SyntaxRef,
};

pub use crate::model::{
    ClassBuilder, ClassEntity, ClassRegistry, CommentEntity, FieldAccess, FieldEntity,
    MethodBuilder, MethodEntity, MethodInvocation, RegistryBuilder, TypeRef,
};

pub use crate::organization::{
    ClusterReport, CodeCategory, CodeClassifier, FieldUsage, GodClassAnalysis, GodClassDetector,
    SkipReason,
};

pub use crate::resolution::{ReferenceResolver, ResolvedField, ResolvedMethod};

pub use crate::session::{AnalysisSession, SessionBuilder};
