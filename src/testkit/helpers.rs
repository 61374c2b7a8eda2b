//! Test helper functions for creating test data.
//!
//! Front-ends hand the analysis core [`SyntaxRef`] trees; these helpers build
//! small ones out of [`OwnedNode`]s so tests can describe method bodies
//! without a parser. Field helpers use `int` as the declared type.
//!
//! # Quick Reference
//!
//! | Helper | Purpose |
//! |--------|---------|
//! | [`access_stmt`] | `this.name++;` touching one field |
//! | [`call_stmt`] | `receiver.name();` invoking one method |
//! | [`block`] | `{ ... }` around statements |
//! | [`try_stmt`] / [`catch_clause`] | try statements with handlers |
//! | [`synchronized_stmt`] | `synchronized (lock) { ... }` |
//! | [`method_touching`] | Method whose body accesses the named fields |
//! | [`enclosing_access_classes`] | Outer class plus inner class with two methods |
//! | [`ConfigBuilder`] | Build test configurations fluently |
//!
//! # Example
//!
//! ```rust,ignore
//! use cohesionmap::testkit::helpers::{access_stmt, block, method_touching};
//!
//! let body = block(vec![access_stmt("app.A", "count")]);
//! let method = method_touching("app.A", "inc", &["count"]);
//! ```

use crate::config::{CohesionConfig, Linkage};
use crate::decomposition::{OwnedNode, SyntaxKind, SyntaxRef};
use crate::model::{
    ClassEntity, CommentEntity, FieldAccess, FieldEntity, MethodEntity, MethodInvocation,
    TypeRef,
};

/// Expression node reading or writing `owner.name`
pub fn field_expr(owner: &str, name: &str) -> SyntaxRef {
    OwnedNode::new(SyntaxKind::Expression, format!("this.{name}"))
        .with_field_access(FieldAccess::new(owner, name, TypeRef::primitive("int")))
        .into_ref()
}

/// Expression statement touching one field
pub fn access_stmt(owner: &str, name: &str) -> SyntaxRef {
    OwnedNode::new(SyntaxKind::ExpressionStatement, format!("this.{name}++;"))
        .with_child(field_expr(owner, name))
        .into_ref()
}

/// Expression statement calling a no-argument method
pub fn call_stmt(receiver: &str, name: &str) -> SyntaxRef {
    let call = OwnedNode::new(SyntaxKind::Expression, format!("{name}()"))
        .with_method_invocation(MethodInvocation::new(receiver, name, vec![]))
        .into_ref();
    OwnedNode::new(SyntaxKind::ExpressionStatement, format!("{name}();"))
        .with_child(call)
        .into_ref()
}

pub fn block(statements: Vec<SyntaxRef>) -> SyntaxRef {
    OwnedNode::new(SyntaxKind::Block, "{ ... }")
        .with_children(statements)
        .into_ref()
}

pub fn catch_clause(caught: &str, body: SyntaxRef) -> SyntaxRef {
    OwnedNode::new(SyntaxKind::CatchClause, format!("catch ({caught} e) {{ ... }}"))
        .with_caught_type(TypeRef::named(caught))
        .with_catch_parameter("e")
        .with_body(body)
        .into_ref()
}

pub fn try_stmt(
    guarded: SyntaxRef,
    catches: Vec<SyntaxRef>,
    finally: Option<SyntaxRef>,
) -> SyntaxRef {
    let mut node = OwnedNode::new(SyntaxKind::Try, "try { ... }").with_try_block(guarded);
    for clause in catches {
        node = node.with_catch_clause(clause);
    }
    if let Some(finally) = finally {
        node = node.with_finally_block(finally);
    }
    node.into_ref()
}

pub fn synchronized_stmt(lock: SyntaxRef, body: SyntaxRef) -> SyntaxRef {
    OwnedNode::new(SyntaxKind::Synchronized, "synchronized (...) { ... }")
        .with_lock_expression(lock)
        .with_body(body)
        .into_ref()
}

pub fn int_field(class: &str, name: &str) -> FieldEntity {
    FieldEntity::new(class, name, TypeRef::primitive("int"))
}

/// Method of `class` whose body touches each field in order.
///
/// Accesses are recorded against `class`; for outer-class fields use
/// [`method_touching_owned`].
pub fn method_touching(class: &str, name: &str, fields: &[&str]) -> MethodEntity {
    let accesses: Vec<(&str, &str)> = fields.iter().map(|field| (class, *field)).collect();
    method_touching_owned(class, name, &accesses)
}

/// Method of `class` whose body touches each `(owner, field)` in order
pub fn method_touching_owned(class: &str, name: &str, accesses: &[(&str, &str)]) -> MethodEntity {
    let statements = accesses
        .iter()
        .map(|(owner, field)| access_stmt(owner, field))
        .collect();
    MethodEntity::builder(class, name)
        .body_from_syntax(&block(statements))
        .build()
}

/// Class with `int` fields and the given methods, in that order
pub fn class_with(name: &str, fields: &[&str], methods: Vec<MethodEntity>) -> ClassEntity {
    let mut builder = ClassEntity::builder(name);
    for field in fields {
        builder.add_field(int_field(name, field));
    }
    for method in methods {
        builder.add_method(method);
    }
    builder.build()
}

pub fn comment(text: &str) -> CommentEntity {
    CommentEntity::new(text)
}

/// `app.TestEnclosingAccess` with an inner class whose `fun1` touches
/// `a, b, c` and `fun2` touches `d, e`; both also touch the outer
/// `outerField`.
pub fn enclosing_access_classes() -> Vec<ClassEntity> {
    const OUTER: &str = "app.TestEnclosingAccess";
    const INNER: &str = "app.TestEnclosingAccess$Inner";

    let outer = class_with(OUTER, &["outerField"], vec![]);

    let fun1 = method_touching_owned(
        INNER,
        "fun1",
        &[(INNER, "a"), (INNER, "b"), (INNER, "c"), (OUTER, "outerField")],
    );
    let fun2 = method_touching_owned(
        INNER,
        "fun2",
        &[(INNER, "d"), (INNER, "e"), (OUTER, "outerField")],
    );

    let mut inner = ClassEntity::builder(INNER).enclosing_class(OUTER);
    for field in ["a", "b", "c", "d", "e"] {
        inner.add_field(int_field(INNER, field));
    }
    inner.add_method(fun1).add_method(fun2);

    vec![outer, inner.build()]
}

/// Builder for test configurations.
///
/// # Example
///
/// ```rust,ignore
/// use cohesionmap::testkit::helpers::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .distance_threshold(0.5)
///     .keep_test_classes()
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: CohesionConfig,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distance_threshold(mut self, threshold: f64) -> Self {
        self.config.clustering.distance_threshold = threshold;
        self
    }

    pub fn linkage(mut self, linkage: Linkage) -> Self {
        self.config.clustering.linkage = linkage;
        self
    }

    pub fn target_clusters(mut self, target: usize) -> Self {
        self.config.clustering.target_clusters = Some(target);
        self
    }

    pub fn include_constructors(mut self) -> Self {
        self.config.clustering.include_constructors = true;
        self
    }

    pub fn keep_test_classes(mut self) -> Self {
        self.config.classification.skip_test_classes = false;
        self
    }

    pub fn keep_generated_classes(mut self) -> Self {
        self.config.classification.skip_generated_classes = false;
        self
    }

    pub fn build(self) -> CohesionConfig {
        self.config
    }
}
