//! Testing infrastructure for cohesionmap.
//!
//! - **Test helpers**: factory functions for syntax trees, classes and
//!   configurations (see [`helpers`])
//! - **Assertion macros**: [`crate::assert_result_ok!`],
//!   [`crate::assert_result_err!`] and [`crate::assert_contains_error!`]
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use cohesionmap::testkit::helpers::{enclosing_access_classes, ConfigBuilder};
//! use cohesionmap::AnalysisSession;
//!
//! let config = ConfigBuilder::new().build();
//! let session = AnalysisSession::from_classes(enclosing_access_classes(), config)?;
//! let analysis = session.analyze_class("app.TestEnclosingAccess$Inner").unwrap();
//! assert_eq!(analysis.clusters.len(), 2);
//! ```

pub mod assertions;
pub mod helpers;
