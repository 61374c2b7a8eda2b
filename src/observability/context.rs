//! Thread-local context tracking for analysis runs.
//!
//! Records the current analysis phase, class and method so log lines and
//! failure reports can say where the engine was. Uses thread-local storage
//! (works with rayon parallel iterators) and atomic counters for global
//! progress across a parallel `analyze_all`.

use std::cell::RefCell;
use std::sync::atomic::{AtomicUsize, Ordering};

static CLASSES_ANALYZED: AtomicUsize = AtomicUsize::new(0);
static CLASSES_TOTAL: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static CURRENT_CONTEXT: RefCell<AnalysisContext> =
        const { RefCell::new(AnalysisContext::new()) };
}

/// Context snapshot for the current analysis operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisContext {
    pub phase: Option<AnalysisPhase>,
    /// Qualified name of the class being analyzed
    pub current_class: Option<String>,
    /// Signature of the method being analyzed
    pub current_method: Option<String>,
}

impl AnalysisContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_class: None,
            current_method: None,
        }
    }
}

/// `phase=.. class=.. method=..`, omitting unset parts; `-` when empty
impl std::fmt::Display for AnalysisContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(phase) = self.phase {
            parts.push(format!("phase={phase}"));
        }
        if let Some(class) = &self.current_class {
            parts.push(format!("class={class}"));
        }
        if let Some(method) = &self.current_method {
            parts.push(format!("method={method}"));
        }
        if parts.is_empty() {
            write!(f, "-")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

/// Major stages of an analysis session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    /// Building entities and registering classes
    ModelBuilding,
    /// Turning method bodies into statement trees
    Decomposition,
    /// Binding field and method references
    Resolution,
    /// Test and generated-code detection
    Classification,
    /// Distance matrix and agglomerative clustering
    Clustering,
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ModelBuilding => write!(f, "model_building"),
            Self::Decomposition => write!(f, "decomposition"),
            Self::Resolution => write!(f, "resolution"),
            Self::Classification => write!(f, "classification"),
            Self::Clustering => write!(f, "clustering"),
        }
    }
}

/// RAII guard restoring the previous context on drop, so contexts nest
/// (method within class within phase).
pub struct ContextGuard {
    previous: AnalysisContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        CURRENT_CONTEXT.with(|ctx| {
            *ctx.borrow_mut() = self.previous.clone();
        });
    }
}

fn update(apply: impl FnOnce(&mut AnalysisContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|ctx| {
        let previous = ctx.borrow().clone();
        apply(&mut ctx.borrow_mut());
        ContextGuard { previous }
    })
}

/// Set the current analysis phase until the guard drops.
///
/// # Example
///
/// ```ignore
/// let _phase = set_phase(AnalysisPhase::Clustering);
/// // ... cluster ...
/// // previous phase restored when _phase drops
/// ```
#[must_use]
pub fn set_phase(phase: AnalysisPhase) -> ContextGuard {
    update(|ctx| ctx.phase = Some(phase))
}

#[must_use]
pub fn set_current_class(name: impl Into<String>) -> ContextGuard {
    let name = name.into();
    update(|ctx| {
        ctx.current_class = Some(name);
        ctx.current_method = None;
    })
}

#[must_use]
pub fn set_current_method(signature: impl Into<String>) -> ContextGuard {
    let signature = signature.into();
    update(|ctx| ctx.current_method = Some(signature))
}

/// Thread-safe; called once before a parallel run
pub fn set_progress(analyzed: usize, total: usize) {
    CLASSES_ANALYZED.store(analyzed, Ordering::Relaxed);
    CLASSES_TOTAL.store(total, Ordering::Relaxed);
}

/// Thread-safe; called from parallel iterators
pub fn increment_analyzed() {
    CLASSES_ANALYZED.fetch_add(1, Ordering::Relaxed);
}

#[must_use]
pub fn get_current_context() -> AnalysisContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

/// (analyzed, total)
#[must_use]
pub fn get_progress() -> (usize, usize) {
    (
        CLASSES_ANALYZED.load(Ordering::Relaxed),
        CLASSES_TOTAL.load(Ordering::Relaxed),
    )
}

pub fn reset_progress() {
    CLASSES_ANALYZED.store(0, Ordering::Relaxed);
    CLASSES_TOTAL.store(0, Ordering::Relaxed);
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = AnalysisContext::new();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_guard_restores_previous() {
        reset_context();

        let _phase1 = set_phase(AnalysisPhase::Resolution);
        {
            let _phase2 = set_phase(AnalysisPhase::Clustering);
            assert_eq!(get_current_context().phase, Some(AnalysisPhase::Clustering));
        }

        assert_eq!(
            get_current_context().phase,
            Some(AnalysisPhase::Resolution),
            "Phase should be restored to Resolution"
        );
    }

    #[test]
    fn test_new_class_clears_method() {
        reset_context();

        let _class = set_current_class("app.A");
        let _method = set_current_method("app.A#run()");
        {
            let _other = set_current_class("app.B");
            let ctx = get_current_context();
            assert_eq!(ctx.current_class.as_deref(), Some("app.B"));
            assert!(ctx.current_method.is_none());
        }

        let ctx = get_current_context();
        assert_eq!(ctx.current_class.as_deref(), Some("app.A"));
        assert_eq!(ctx.current_method.as_deref(), Some("app.A#run()"));
    }

    #[test]
    fn test_analysis_phase_display() {
        assert_eq!(AnalysisPhase::ModelBuilding.to_string(), "model_building");
        assert_eq!(AnalysisPhase::Clustering.to_string(), "clustering");
    }

    #[test]
    fn test_empty_context_by_default() {
        reset_context();
        assert_eq!(get_current_context(), AnalysisContext::default());
    }

    #[test]
    fn test_context_display() {
        reset_context();
        assert_eq!(get_current_context().to_string(), "-");

        let _phase = set_phase(AnalysisPhase::Decomposition);
        let _method = set_current_method("app.A#run");
        assert_eq!(
            get_current_context().to_string(),
            "phase=decomposition method=app.A#run"
        );
    }
}
