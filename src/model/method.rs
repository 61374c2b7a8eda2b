use super::comment::CommentEntity;
use super::field::FieldAccess;
use super::types::{Access, Signature, TypeRef};
use crate::decomposition::{MethodBody, StatementDecomposer, SyntaxRef};
use crate::observability::set_current_method;
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

/// How a call site names its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum InvocationKind {
    #[default]
    Regular,
    /// `super.m(...)`: lookup starts above the calling class
    Super,
}

/// A method call found inside a method body
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MethodInvocation {
    receiver_class: String,
    name: String,
    argument_types: Vec<TypeRef>,
    kind: InvocationKind,
}

impl MethodInvocation {
    pub fn new(
        receiver_class: impl Into<String>,
        name: impl Into<String>,
        argument_types: Vec<TypeRef>,
    ) -> Self {
        Self {
            receiver_class: receiver_class.into(),
            name: name.into(),
            argument_types,
            kind: InvocationKind::Regular,
        }
    }

    pub fn super_call(
        receiver_class: impl Into<String>,
        name: impl Into<String>,
        argument_types: Vec<TypeRef>,
    ) -> Self {
        Self {
            kind: InvocationKind::Super,
            ..Self::new(receiver_class, name, argument_types)
        }
    }

    /// Statically known receiver type, `None` when unknown
    pub fn receiver_class(&self) -> Option<&str> {
        if self.receiver_class.is_empty() {
            None
        } else {
            Some(&self.receiver_class)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn argument_types(&self) -> &[TypeRef] {
        &self.argument_types
    }

    pub fn kind(&self) -> InvocationKind {
        self.kind
    }

    pub fn is_super(&self) -> bool {
        self.kind == InvocationKind::Super
    }
}

/// Annotation marker on a method, e.g. `Test` or `org.junit.Test`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Annotation {
    name: String,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// JUnit 3/4/5 and TestNG all spell it `Test`
    pub fn is_test_marker(&self) -> bool {
        self.simple_name() == "Test"
    }
}

/// A method or constructor declared by a class.
///
/// Field accesses and invocations are cached from the body when the entity
/// is built; the body is immutable afterwards so the cache cannot drift.
/// The cache covers the guarded path only (see [`MethodBody::field_accesses`]).
#[derive(Debug, Clone)]
pub struct MethodEntity {
    class_name: String,
    signature: Signature,
    return_type: TypeRef,
    access: Access,
    is_static: bool,
    is_abstract: bool,
    is_constructor: bool,
    annotations: Vec<Annotation>,
    comments: Vec<CommentEntity>,
    body: Option<MethodBody>,
    field_accesses: Vec<FieldAccess>,
    method_invocations: Vec<MethodInvocation>,
}

impl MethodEntity {
    pub fn builder(class_name: impl Into<String>, name: impl Into<String>) -> MethodBuilder {
        MethodBuilder::new(class_name, name)
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn name(&self) -> &str {
        &self.signature.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn parameter_types(&self) -> &[TypeRef] {
        &self.signature.parameter_types
    }

    pub fn return_type(&self) -> &TypeRef {
        &self.return_type
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_constructor(&self) -> bool {
        self.is_constructor
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn comments(&self) -> &[CommentEntity] {
        &self.comments
    }

    /// `None` for abstract, native and interface methods
    pub fn body(&self) -> Option<&MethodBody> {
        self.body.as_ref()
    }

    pub fn field_accesses(&self) -> &[FieldAccess] {
        &self.field_accesses
    }

    pub fn method_invocations(&self) -> &[MethodInvocation] {
        &self.method_invocations
    }

    /// `pkg.Class#name(params)`
    pub fn qualified_signature(&self) -> String {
        format!("{}#{}", self.class_name, self.signature)
    }

    pub fn has_test_annotation(&self) -> bool {
        self.annotations.iter().any(Annotation::is_test_marker)
    }

    /// Whether a call site can bind to this declaration
    pub fn matches_invocation(&self, invocation: &MethodInvocation) -> bool {
        self.signature
            .accepts(invocation.name(), invocation.argument_types())
    }

    pub fn contains_field_access(&self, access: &FieldAccess) -> bool {
        self.field_accesses.contains(access)
            || self
                .body
                .as_ref()
                .is_some_and(|body| body.all_field_accesses().contains(&access))
    }

    pub fn contains_method_invocation(&self, invocation: &MethodInvocation) -> bool {
        self.method_invocations.contains(invocation)
            || self
                .body
                .as_ref()
                .is_some_and(|body| body.all_method_invocations().contains(&invocation))
    }

    pub fn contains_super_method_invocation(&self, invocation: &MethodInvocation) -> bool {
        invocation.is_super() && self.contains_method_invocation(invocation)
    }
}

impl PartialEq for MethodEntity {
    fn eq(&self, other: &Self) -> bool {
        self.class_name == other.class_name && self.signature == other.signature
    }
}

impl Eq for MethodEntity {}

impl Hash for MethodEntity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.class_name.hash(state);
        self.signature.hash(state);
    }
}

impl fmt::Display for MethodEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_signature())
    }
}

/// Accumulates a method during the build pass
#[derive(Debug, Clone)]
pub struct MethodBuilder {
    class_name: String,
    name: String,
    parameter_types: Vec<TypeRef>,
    return_type: TypeRef,
    access: Access,
    is_static: bool,
    is_abstract: bool,
    is_constructor: bool,
    annotations: Vec<Annotation>,
    comments: Vec<CommentEntity>,
    body: Option<MethodBody>,
}

impl MethodBuilder {
    pub fn new(class_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            name: name.into(),
            parameter_types: Vec::new(),
            return_type: TypeRef::primitive("void"),
            access: Access::Public,
            is_static: false,
            is_abstract: false,
            is_constructor: false,
            annotations: Vec::new(),
            comments: Vec::new(),
            body: None,
        }
    }

    pub fn parameter(mut self, ty: TypeRef) -> Self {
        self.parameter_types.push(ty);
        self
    }

    pub fn parameters(mut self, types: impl IntoIterator<Item = TypeRef>) -> Self {
        self.parameter_types.extend(types);
        self
    }

    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.return_type = ty;
        self
    }

    pub fn access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn static_method(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    pub fn abstract_method(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn constructor(mut self, is_constructor: bool) -> Self {
        self.is_constructor = is_constructor;
        self
    }

    pub fn annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(Annotation::new(annotation));
        self
    }

    pub fn comment(mut self, comment: CommentEntity) -> Self {
        self.comments.push(comment);
        self
    }

    pub fn body(mut self, body: MethodBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Decompose the front-end body node with the default decomposer
    pub fn body_from_syntax(self, body: &SyntaxRef) -> Self {
        self.body_with(&StatementDecomposer::default(), body)
    }

    pub fn body_with(self, decomposer: &StatementDecomposer, body: &SyntaxRef) -> Self {
        let _method = set_current_method(format!("{}#{}", self.class_name, self.name));
        let decomposed = decomposer.decompose_method_body(body);
        self.body(decomposed)
    }

    pub fn build(self) -> MethodEntity {
        let (field_accesses, method_invocations) = match &self.body {
            Some(body) => (
                body.field_accesses().into_iter().cloned().collect(),
                body.method_invocations().into_iter().cloned().collect(),
            ),
            None => (Vec::new(), Vec::new()),
        };

        MethodEntity {
            class_name: self.class_name,
            signature: Signature::new(self.name, self.parameter_types),
            return_type: self.return_type,
            access: self.access,
            is_static: self.is_static,
            is_abstract: self.is_abstract,
            is_constructor: self.is_constructor,
            annotations: self.annotations,
            comments: self.comments,
            body: self.body,
            field_accesses,
            method_invocations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decomposition::{OwnedNode, SyntaxKind};

    fn body_touching(fields: &[&str]) -> SyntaxRef {
        let stmts = fields.iter().map(|name| {
            let expr = OwnedNode::new(SyntaxKind::Expression, *name)
                .with_field_access(FieldAccess::new("app.A", *name, TypeRef::primitive("int")))
                .into_ref();
            OwnedNode::new(SyntaxKind::ExpressionStatement, *name)
                .with_child(expr)
                .into_ref()
        });
        OwnedNode::new(SyntaxKind::Block, "{}")
            .with_children(stmts)
            .into_ref()
    }

    #[test]
    fn test_build_caches_accesses_from_body() {
        let method = MethodEntity::builder("app.A", "run")
            .body_from_syntax(&body_touching(&["x", "y"]))
            .build();

        let names: Vec<_> = method.field_accesses().iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert!(method.contains_field_access(&FieldAccess::new(
            "app.A",
            "y",
            TypeRef::primitive("int")
        )));
    }

    #[test]
    fn test_abstract_method_has_no_body() {
        let method = MethodEntity::builder("app.A", "run")
            .abstract_method(true)
            .build();
        assert!(method.body().is_none());
        assert!(method.field_accesses().is_empty());
    }

    #[test]
    fn test_identity_is_class_and_signature() {
        let a = MethodEntity::builder("app.A", "put")
            .parameter(TypeRef::primitive("int"))
            .build();
        let same = MethodEntity::builder("app.A", "put")
            .parameter(TypeRef::primitive("int"))
            .annotation("Deprecated")
            .build();
        let overload = MethodEntity::builder("app.A", "put")
            .parameter(TypeRef::named("java.lang.String"))
            .build();

        assert_eq!(a, same);
        assert_ne!(a, overload);
        assert_eq!(a.qualified_signature(), "app.A#put(int)");
    }

    #[test]
    fn test_matches_invocation_by_signature() {
        let method = MethodEntity::builder("app.A", "put")
            .parameter(TypeRef::named("java.lang.String"))
            .build();

        let put_null = MethodInvocation::new("app.A", "put", vec![TypeRef::Null]);
        assert!(method.matches_invocation(&put_null));
        assert!(!method.matches_invocation(&MethodInvocation::new(
            "app.A",
            "put",
            vec![TypeRef::primitive("int")]
        )));
    }

    #[test]
    fn test_test_annotation_detection() {
        assert!(Annotation::new("Test").is_test_marker());
        assert!(Annotation::new("org.junit.jupiter.api.Test").is_test_marker());
        assert!(!Annotation::new("TestFactory").is_test_marker());

        let method = MethodEntity::builder("app.ATest", "checks")
            .annotation("org.junit.Test")
            .build();
        assert!(method.has_test_annotation());
    }

    #[test]
    fn test_hash_follows_identity() {
        use indexmap::IndexSet;

        let plain = MethodEntity::builder("app.A", "run").build();
        let annotated = MethodEntity::builder("app.A", "run")
            .annotation("Deprecated")
            .build();
        let other = MethodEntity::builder("app.B", "run").build();

        let set: IndexSet<&MethodEntity> = [&plain, &annotated, &other].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set[0].class_name(), "app.A");
    }
}
