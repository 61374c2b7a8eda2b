//! Observability: tracing setup and analysis context tracking.
//!
//! Track context during analysis:
//!
//! ```ignore
//! use cohesionmap::observability::{set_phase, set_current_class, AnalysisPhase};
//!
//! let _phase = set_phase(AnalysisPhase::Clustering);
//! for class in registry.classes() {
//!     let _class = set_current_class(class.name());
//!     // ...
//! }
//! ```

pub mod context;
pub mod subscriber;

pub use subscriber::{env_filter, init_tracing, LOG_ENV_VAR};
pub use context::{
    get_current_context, get_progress, increment_analyzed, reset_context, reset_progress,
    set_current_class, set_current_method, set_phase, set_progress, AnalysisContext,
    AnalysisPhase, ContextGuard,
};
