//! God-class detection by member clustering
//!
//! A class whose methods and fields fall into several well separated groups
//! is doing more than one job. Each group with enough methods and fields is
//! reported as an extract-class candidate.

use super::classifiers::CodeClassifier;
use super::clustering::{Cluster, DistanceMatrix, EntitySet, HierarchicalClustering, MemberId};
use crate::config::CohesionConfig;
use crate::core::Result;
use crate::model::{ClassEntity, ClassRegistry, FieldEntity, MethodEntity};
use crate::observability::{set_current_class, set_current_method, set_phase, AnalysisPhase};
use crate::resolution::ReferenceResolver;
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, debug_span};

/// Why a class was left out of clustering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    TestClass,
    GeneratedCode,
    Interface,
}

/// How many methods of a cluster touch a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldUsage {
    /// Qualified field name
    pub field: String,
    pub accesses: usize,
}

/// One cluster of members
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterReport {
    /// Method signatures, declaration order
    pub methods: Vec<String>,
    /// Simple names of this class's own fields, declaration order
    pub fields: Vec<String>,
    /// Qualified names (`pkg.Class.field`) of every field the cluster's
    /// methods touch, inherited and enclosing ones included; most used first
    pub field_usage: Vec<FieldUsage>,
    /// Mean pairwise distance between the cluster's members
    pub mean_distance: f64,
    pub is_extract_candidate: bool,
}

impl ClusterReport {
    pub fn size(&self) -> usize {
        self.methods.len() + self.fields.len()
    }

    /// Fields used by the most methods of the cluster
    pub fn predominant_fields(&self) -> Vec<&str> {
        let Some(top) = self.field_usage.first().map(|usage| usage.accesses) else {
            return Vec::new();
        };
        self.field_usage
            .iter()
            .take_while(|usage| usage.accesses == top)
            .map(|usage| usage.field.as_str())
            .collect()
    }
}

/// Result for one class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GodClassAnalysis {
    pub class_name: String,
    pub skipped: Option<SkipReason>,
    pub member_count: usize,
    pub clusters: Vec<ClusterReport>,
    pub is_god_class: bool,
}

impl GodClassAnalysis {
    fn skipped_class(class: &ClassEntity, reason: SkipReason) -> Self {
        Self {
            class_name: class.name().to_string(),
            skipped: Some(reason),
            member_count: 0,
            clusters: Vec::new(),
            is_god_class: false,
        }
    }

    /// Pretty-printed JSON for reporting layers
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn extract_candidates(&self) -> impl Iterator<Item = &ClusterReport> {
        self.clusters.iter().filter(|cluster| cluster.is_extract_candidate)
    }

    /// Cluster holding the method with this signature, e.g. `save()`
    pub fn cluster_of_method(&self, signature: &str) -> Option<&ClusterReport> {
        self.clusters
            .iter()
            .find(|cluster| cluster.methods.iter().any(|method| method == signature))
    }

    /// Cluster holding this class's field, by simple name
    pub fn cluster_of_field(&self, name: &str) -> Option<&ClusterReport> {
        self.clusters
            .iter()
            .find(|cluster| cluster.fields.iter().any(|field| field == name))
    }
}

/// Members of one class prepared for clustering
struct ClassMembers<'a> {
    methods: Vec<&'a MethodEntity>,
    fields: Vec<&'a FieldEntity>,
    /// Resolved fields per entry of `methods`
    accessed: Vec<IndexSet<&'a FieldEntity>>,
    /// Invoked class methods per entry of `methods`
    invoked: Vec<IndexSet<&'a MethodEntity>>,
}

impl<'a> ClassMembers<'a> {
    fn len(&self) -> usize {
        self.methods.len() + self.fields.len()
    }

    fn entity_sets(&self) -> Vec<EntitySet> {
        let method_sets = self.methods.iter().enumerate().map(|(n, method)| {
            EntitySet::new(method_id(method))
                .with_entities(self.accessed[n].iter().map(|field| field.qualified_name()))
                .with_entities(
                    self.invoked[n]
                        .iter()
                        .filter(|callee| **callee != *method)
                        .map(|callee| callee.qualified_signature()),
                )
        });

        let field_sets = self.fields.iter().map(|field| {
            EntitySet::new(field_id(field)).with_entities(
                self.methods
                    .iter()
                    .zip(&self.accessed)
                    .filter(|(_, accessed)| accessed.contains(field))
                    .map(|(method, _)| method.qualified_signature()),
            )
        });

        method_sets.chain(field_sets).collect()
    }
}

fn method_id(method: &MethodEntity) -> MemberId {
    MemberId::Method(method.qualified_signature())
}

fn field_id(field: &FieldEntity) -> MemberId {
    MemberId::Field(field.qualified_name())
}

/// Runs the god-class analysis for classes of one registry
pub struct GodClassDetector<'a> {
    registry: &'a ClassRegistry,
    config: &'a CohesionConfig,
    classifier: CodeClassifier,
    resolver: ReferenceResolver<'a>,
}

impl<'a> GodClassDetector<'a> {
    pub fn new(registry: &'a ClassRegistry, config: &'a CohesionConfig) -> Self {
        Self {
            registry,
            config,
            classifier: CodeClassifier::from_config(&config.classification),
            resolver: ReferenceResolver::new(registry)
                .with_enclosing_scopes(config.resolution.search_enclosing_scopes),
        }
    }

    pub fn skip_reason(&self, class: &ClassEntity) -> Option<SkipReason> {
        let _phase = set_phase(AnalysisPhase::Classification);
        let classification = &self.config.classification;

        if class.is_interface() {
            Some(SkipReason::Interface)
        } else if classification.skip_generated_classes && self.classifier.is_generated(class) {
            Some(SkipReason::GeneratedCode)
        } else if classification.skip_test_classes
            && self.classifier.is_test_class(class, self.registry)
        {
            Some(SkipReason::TestClass)
        } else {
            None
        }
    }

    pub fn analyze(&self, class: &'a ClassEntity) -> GodClassAnalysis {
        let span = debug_span!("god_class", class = %class.name());
        let _enter = span.enter();
        let _class = set_current_class(class.name());

        if let Some(reason) = self.skip_reason(class) {
            debug!(?reason, "Skipping class");
            return GodClassAnalysis::skipped_class(class, reason);
        }

        let members = self.collect_members(class);
        let _phase = set_phase(AnalysisPhase::Clustering);
        let sets = members.entity_sets();
        let matrix = DistanceMatrix::from_entity_sets(&sets);
        let clusters =
            HierarchicalClustering::from_config(&self.config.clustering).cluster(&matrix);

        let reports: Vec<ClusterReport> = clusters
            .iter()
            .map(|cluster| self.report(cluster, &members, &matrix))
            .collect();
        let is_god_class =
            reports.len() > 1 && reports.iter().any(|report| report.is_extract_candidate);

        debug!(
            members = members.len(),
            clusters = reports.len(),
            is_god_class,
            "God-class analysis finished"
        );

        GodClassAnalysis {
            class_name: class.name().to_string(),
            skipped: None,
            member_count: members.len(),
            clusters: reports,
            is_god_class,
        }
    }

    /// Methods with a body (constructors only when configured), then fields
    fn collect_members(&self, class: &'a ClassEntity) -> ClassMembers<'a> {
        let _phase = set_phase(AnalysisPhase::Resolution);
        let include_constructors = self.config.clustering.include_constructors;

        let methods: Vec<&MethodEntity> = class
            .methods()
            .iter()
            .filter(|method| method.body().is_some())
            .filter(|method| include_constructors || !method.is_constructor())
            .collect();

        let accessed = methods
            .iter()
            .map(|method| {
                let _method = set_current_method(method.qualified_signature());
                self.resolver.fields_accessed_inside_method(class, method)
            })
            .collect();

        let invoked = methods
            .iter()
            .map(|method| {
                self.resolver
                    .methods_invoked_inside_method(class, method)
                    .into_iter()
                    .filter(|callee| callee.class_name() == class.name())
                    .collect()
            })
            .collect();

        ClassMembers {
            methods,
            fields: class.fields().iter().collect(),
            accessed,
            invoked,
        }
    }

    fn report(
        &self,
        cluster: &Cluster,
        members: &ClassMembers<'_>,
        matrix: &DistanceMatrix,
    ) -> ClusterReport {
        let method_count = members.methods.len();
        let (method_indices, field_indices): (Vec<usize>, Vec<usize>) =
            cluster.members.iter().partition(|&&index| index < method_count);

        let mut usage: BTreeMap<String, usize> = BTreeMap::new();
        for &index in &method_indices {
            for field in &members.accessed[index] {
                *usage.entry(field.qualified_name()).or_default() += 1;
            }
        }
        let mut field_usage: Vec<FieldUsage> = usage
            .into_iter()
            .map(|(field, accesses)| FieldUsage { field, accesses })
            .collect();
        field_usage.sort_by(|a, b| b.accesses.cmp(&a.accesses).then_with(|| a.field.cmp(&b.field)));

        let clustering = &self.config.clustering;
        let is_extract_candidate = method_indices.len() >= clustering.min_candidate_methods
            && field_indices.len() >= clustering.min_candidate_fields
            && cluster.len() < members.len();

        ClusterReport {
            methods: method_indices
                .iter()
                .map(|&index| members.methods[index].signature().to_string())
                .collect(),
            fields: field_indices
                .iter()
                .map(|&index| members.fields[index - method_count].name().to_string())
                .collect(),
            field_usage,
            mean_distance: matrix.mean_distance(&cluster.members),
            is_extract_candidate,
        }
    }
}
