//! Global class registry
//!
//! Two phases: a [`RegistryBuilder`] accepts classes concurrently while
//! compilation units are built, then [`RegistryBuilder::freeze`] produces an
//! immutable [`ClassRegistry`] that is shared across analyses without locks.

use super::class::ClassEntity;
use crate::core::{Error, Result};
use crate::observability::get_current_context;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;

/// Bound on superclass and enclosing-scope walks
pub const DEFAULT_MAX_HIERARCHY_DEPTH: usize = 256;

/// Write phase of the registry
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    classes: DashMap<String, ClassEntity>,
    max_depth: Option<usize>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Add a class. Safe to call from several threads at once.
    ///
    /// Fails when a class with the same qualified name is already present.
    pub fn register(&self, class: ClassEntity) -> Result<()> {
        match self.classes.entry(class.name().to_string()) {
            Entry::Occupied(entry) => Err(Error::duplicate_class(entry.key().clone())),
            Entry::Vacant(entry) => {
                tracing::trace!(class = %class.name(), "registered class");
                entry.insert(class);
                Ok(())
            }
        }
    }

    pub fn register_all(&self, classes: impl IntoIterator<Item = ClassEntity>) -> Result<()> {
        classes.into_iter().try_for_each(|class| self.register(class))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// End the write phase
    pub fn freeze(self) -> ClassRegistry {
        let max_depth = self.max_depth.unwrap_or(DEFAULT_MAX_HIERARCHY_DEPTH);
        let classes: im::OrdMap<String, Arc<ClassEntity>> = self
            .classes
            .into_iter()
            .map(|(name, class)| (name, Arc::new(class)))
            .collect();
        tracing::debug!(classes = classes.len(), max_depth, "class registry frozen");
        ClassRegistry { classes, max_depth }
    }
}

/// Read phase of the registry: qualified name to class, ordered by name.
///
/// Cloning is cheap; the map is structurally shared.
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    classes: im::OrdMap<String, Arc<ClassEntity>>,
    max_depth: usize,
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self {
            classes: im::OrdMap::new(),
            max_depth: DEFAULT_MAX_HIERARCHY_DEPTH,
        }
    }
}

impl ClassRegistry {
    pub fn get(&self, name: &str) -> Option<&ClassEntity> {
        self.classes.get(name).map(Arc::as_ref)
    }

    pub fn get_shared(&self, name: &str) -> Option<Arc<ClassEntity>> {
        self.classes.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Same classes, with chain walks bounded at `max_depth` steps
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Classes in qualified-name order
    pub fn classes(&self) -> impl Iterator<Item = &ClassEntity> + '_ {
        self.classes.values().map(Arc::as_ref)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.classes.keys().map(String::as_str)
    }

    /// Proper ancestors of `class`, nearest first.
    ///
    /// Ends at a class without superclass, at a superclass name that is not
    /// registered, on a cycle, or after `max_depth` steps.
    pub fn superclass_chain<'a>(&'a self, class: &'a ClassEntity) -> ChainWalk<'a> {
        ChainWalk::new(self, class, Link::Superclass)
    }

    /// Lexically enclosing classes of `class`, innermost first
    pub fn enclosing_chain<'a>(&'a self, class: &'a ClassEntity) -> ChainWalk<'a> {
        ChainWalk::new(self, class, Link::Enclosing)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Superclass,
    Enclosing,
}

impl Link {
    fn next_name(self, class: &ClassEntity) -> Option<&str> {
        match self {
            Self::Superclass => class.superclass(),
            Self::Enclosing => class.enclosing_class(),
        }
    }
}

/// Iterative walk along one link of the class graph
pub struct ChainWalk<'a> {
    registry: &'a ClassRegistry,
    current: Option<&'a ClassEntity>,
    link: Link,
    steps: usize,
    visited: HashSet<&'a str>,
}

impl<'a> ChainWalk<'a> {
    fn new(registry: &'a ClassRegistry, start: &'a ClassEntity, link: Link) -> Self {
        let mut visited = HashSet::new();
        visited.insert(start.name());
        Self {
            registry,
            current: Some(start),
            link,
            steps: 0,
            visited,
        }
    }
}

impl<'a> Iterator for ChainWalk<'a> {
    type Item = &'a ClassEntity;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current.take()?;
        let name = self.link.next_name(current)?;

        if self.steps >= self.registry.max_depth {
            tracing::warn!(
                class = %current.name(),
                max_depth = self.registry.max_depth,
                context = %get_current_context(),
                "hierarchy walk hit depth bound"
            );
            return None;
        }

        let next = self.registry.get(name)?;
        if !self.visited.insert(next.name()) {
            tracing::warn!(
                class = %next.name(),
                link = ?self.link,
                context = %get_current_context(),
                "cycle in class hierarchy"
            );
            return None;
        }

        self.steps += 1;
        self.current = Some(next);
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str, superclass: Option<&str>) -> ClassEntity {
        let builder = ClassEntity::builder(name);
        match superclass {
            Some(superclass) => builder.superclass(superclass).build(),
            None => builder.build(),
        }
    }

    fn chain_names<'a>(walk: ChainWalk<'a>) -> Vec<&'a str> {
        walk.map(ClassEntity::name).collect()
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let builder = RegistryBuilder::new();
        builder.register(class("app.A", None)).unwrap();
        let err = builder.register(class("app.A", None)).unwrap_err();
        assert!(matches!(err, Error::DuplicateClass { ref name } if name == "app.A"));
        assert_eq!(builder.len(), 1);
    }

    #[test]
    fn test_superclass_chain_nearest_first() {
        let builder = RegistryBuilder::new();
        builder
            .register_all([
                class("app.C", Some("app.B")),
                class("app.B", Some("app.A")),
                class("app.A", Some("java.lang.Object")),
            ])
            .unwrap();
        let registry = builder.freeze();
        let c = registry.get("app.C").unwrap();

        assert_eq!(chain_names(registry.superclass_chain(c)), vec!["app.B", "app.A"]);
    }

    #[test]
    fn test_cycle_terminates() {
        let builder = RegistryBuilder::new();
        builder
            .register_all([class("app.A", Some("app.B")), class("app.B", Some("app.A"))])
            .unwrap();
        let registry = builder.freeze();
        let a = registry.get("app.A").unwrap();

        assert_eq!(chain_names(registry.superclass_chain(a)), vec!["app.B"]);
    }

    #[test]
    fn test_depth_bound() {
        let builder = RegistryBuilder::new().with_max_depth(2);
        builder
            .register_all([
                class("app.D", Some("app.C")),
                class("app.C", Some("app.B")),
                class("app.B", Some("app.A")),
                class("app.A", None),
            ])
            .unwrap();
        let registry = builder.freeze();
        let d = registry.get("app.D").unwrap();

        assert_eq!(chain_names(registry.superclass_chain(d)), vec!["app.C", "app.B"]);
    }

    #[test]
    fn test_enclosing_chain() {
        let builder = RegistryBuilder::new();
        builder
            .register_all([
                ClassEntity::builder("app.Outer").build(),
                ClassEntity::builder("app.Outer$Mid")
                    .enclosing_class("app.Outer")
                    .build(),
                ClassEntity::builder("app.Outer$Mid$Inner")
                    .enclosing_class("app.Outer$Mid")
                    .build(),
            ])
            .unwrap();
        let registry = builder.freeze();
        let inner = registry.get("app.Outer$Mid$Inner").unwrap();

        assert_eq!(
            chain_names(registry.enclosing_chain(inner)),
            vec!["app.Outer$Mid", "app.Outer"]
        );
    }

    #[test]
    fn test_parallel_registration() {
        use rayon::prelude::*;

        let builder = RegistryBuilder::new();
        (0..64)
            .into_par_iter()
            .try_for_each(|i| builder.register(class(&format!("app.C{i}"), None)))
            .unwrap();
        let registry = builder.freeze();

        assert_eq!(registry.len(), 64);
        let names: Vec<_> = registry.names().take(2).collect();
        assert_eq!(names, vec!["app.C0", "app.C1"]);
    }
}
