//! Analysis session
//!
//! A session has a write phase, where compilation units register their
//! classes (possibly from several threads), and a read phase over the frozen
//! registry where analyses run in parallel without locks. Re-analysis means
//! building a new session.

use crate::config::CohesionConfig;
use crate::core::Result;
use crate::decomposition::StatementDecomposer;
use crate::model::{ClassEntity, ClassRegistry, RegistryBuilder};
use crate::observability::{increment_analyzed, set_phase, set_progress, AnalysisPhase};
use crate::organization::{CodeCategory, CodeClassifier, GodClassAnalysis, GodClassDetector};
use crate::resolution::ReferenceResolver;
use rayon::prelude::*;
use tracing::info;

/// Write phase of a session
#[derive(Debug)]
pub struct SessionBuilder {
    registry: RegistryBuilder,
    decomposer: StatementDecomposer,
    config: CohesionConfig,
}

impl SessionBuilder {
    pub fn new(config: CohesionConfig) -> Self {
        Self {
            registry: RegistryBuilder::new().with_max_depth(config.resolution.max_hierarchy_depth),
            decomposer: StatementDecomposer::default(),
            config,
        }
    }

    pub fn with_decomposer(mut self, decomposer: StatementDecomposer) -> Self {
        self.decomposer = decomposer;
        self
    }

    /// Decomposer front-ends should use for method bodies in this session
    pub fn decomposer(&self) -> &StatementDecomposer {
        &self.decomposer
    }

    /// Register a class; callable concurrently from build passes
    pub fn register(&self, class: ClassEntity) -> Result<()> {
        let _phase = set_phase(AnalysisPhase::ModelBuilding);
        self.registry.register(class)
    }

    pub fn register_all(&self, classes: impl IntoIterator<Item = ClassEntity>) -> Result<()> {
        let _phase = set_phase(AnalysisPhase::ModelBuilding);
        self.registry.register_all(classes)
    }

    pub fn class_count(&self) -> usize {
        self.registry.len()
    }

    /// End the write phase
    pub fn finish(self) -> AnalysisSession {
        AnalysisSession::new(self.registry.freeze(), self.config)
    }
}

/// Read phase of a session
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    registry: ClassRegistry,
    config: CohesionConfig,
}

impl AnalysisSession {
    /// The registry's chain-walk bound is taken from `config.resolution`.
    pub fn new(registry: ClassRegistry, config: CohesionConfig) -> Self {
        let registry = registry.with_max_depth(config.resolution.max_hierarchy_depth);
        Self { registry, config }
    }

    pub fn builder(config: CohesionConfig) -> SessionBuilder {
        SessionBuilder::new(config)
    }

    /// Register `classes` and freeze in one step
    pub fn from_classes(
        classes: impl IntoIterator<Item = ClassEntity>,
        config: CohesionConfig,
    ) -> Result<Self> {
        let builder = SessionBuilder::new(config);
        builder.register_all(classes)?;
        Ok(builder.finish())
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CohesionConfig {
        &self.config
    }

    pub fn resolver(&self) -> ReferenceResolver<'_> {
        ReferenceResolver::new(&self.registry)
            .with_enclosing_scopes(self.config.resolution.search_enclosing_scopes)
    }

    pub fn classify(&self, class: &ClassEntity) -> CodeCategory {
        let _phase = set_phase(AnalysisPhase::Classification);
        CodeClassifier::from_config(&self.config.classification).categorize(class, &self.registry)
    }

    pub fn analyze(&self, class: &ClassEntity) -> GodClassAnalysis {
        GodClassDetector::new(&self.registry, &self.config).analyze(class)
    }

    /// `None` when no class of that name is registered
    pub fn analyze_class(&self, name: &str) -> Option<GodClassAnalysis> {
        self.registry.get(name).map(|class| self.analyze(class))
    }

    /// Every registered class, in qualified-name order
    pub fn analyze_all(&self) -> Vec<GodClassAnalysis> {
        let classes: Vec<&ClassEntity> = self.registry.classes().collect();
        set_progress(0, classes.len());

        let detector = GodClassDetector::new(&self.registry, &self.config);
        let analyses: Vec<GodClassAnalysis> = classes
            .par_iter()
            .map(|class| {
                let analysis = detector.analyze(class);
                increment_analyzed();
                analysis
            })
            .collect();

        info!(
            classes = analyses.len(),
            god_classes = analyses.iter().filter(|a| a.is_god_class).count(),
            "Analyzed session"
        );
        analyses
    }

    /// Only the classes flagged as god classes
    pub fn god_classes(&self) -> Vec<GodClassAnalysis> {
        self.analyze_all()
            .into_iter()
            .filter(|analysis| analysis.is_god_class)
            .collect()
    }
}
