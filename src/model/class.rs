use super::comment::CommentEntity;
use super::field::{FieldAccess, FieldEntity};
use super::method::{MethodBuilder, MethodEntity, MethodInvocation};
use super::registry::ClassRegistry;
use super::types::Access;
use crate::organization::classifiers;
use crate::resolution::ReferenceResolver;
use indexmap::IndexSet;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
}

/// A class, interface or enum declaration.
///
/// Members are kept in declaration order. The superclass and the lexically
/// enclosing class are held by qualified name and looked up through the
/// [`ClassRegistry`]; a class never owns either.
#[derive(Debug, Clone)]
pub struct ClassEntity {
    name: String,
    kind: ClassKind,
    access: Access,
    is_abstract: bool,
    superclass: Option<String>,
    interfaces: Vec<String>,
    enclosing_class: Option<String>,
    methods: Vec<MethodEntity>,
    fields: Vec<FieldEntity>,
    comments: Vec<CommentEntity>,
}

impl ClassEntity {
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name)
    }

    /// Qualified name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn simple_name(&self) -> &str {
        self.name
            .rsplit(['.', '$'])
            .next()
            .unwrap_or(&self.name)
    }

    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    /// Qualified name of the declared superclass
    pub fn superclass(&self) -> Option<&str> {
        self.superclass.as_deref()
    }

    pub fn interfaces(&self) -> &[String] {
        &self.interfaces
    }

    /// Qualified name of the lexically enclosing class, for inner classes
    pub fn enclosing_class(&self) -> Option<&str> {
        self.enclosing_class.as_deref()
    }

    pub fn methods(&self) -> &[MethodEntity] {
        &self.methods
    }

    pub fn fields(&self) -> &[FieldEntity] {
        &self.fields
    }

    pub fn comments(&self) -> &[CommentEntity] {
        &self.comments
    }

    pub fn method_count(&self) -> usize {
        self.methods.len()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// First declared method the invocation can bind to; this class only
    pub fn get_method(&self, invocation: &MethodInvocation) -> Option<&MethodEntity> {
        self.methods
            .iter()
            .find(|method| method.matches_invocation(invocation))
    }

    /// Target of a `super.m(...)` call made from this class
    pub fn get_super_method<'a>(
        &'a self,
        invocation: &MethodInvocation,
        registry: &'a ClassRegistry,
    ) -> Option<&'a MethodEntity> {
        registry
            .superclass_chain(self)
            .find_map(|ancestor| ancestor.get_method(invocation))
    }

    /// Method lookup through this class and then its superclass chain
    pub fn find_method<'a>(
        &'a self,
        invocation: &MethodInvocation,
        registry: &'a ClassRegistry,
    ) -> Option<&'a MethodEntity> {
        ReferenceResolver::new(registry)
            .find_method_from(self, invocation)
            .map(|resolved| resolved.method)
    }

    /// First declared field matching the access; this class only
    pub fn get_field(&self, access: &FieldAccess) -> Option<&FieldEntity> {
        self.fields.iter().find(|field| field.matches_access(access))
    }

    /// Field lookup through this class and then its superclass chain.
    ///
    /// Stops with `None` when the chain ends, when a superclass is not in the
    /// registry, or when the registry's depth bound is hit.
    pub fn find_field<'a>(
        &'a self,
        access: &FieldAccess,
        registry: &'a ClassRegistry,
    ) -> Option<&'a FieldEntity> {
        ReferenceResolver::new(registry)
            .find_field_from(self, access)
            .map(|resolved| resolved.field)
    }

    /// Fields of this class (or of its superclasses and enclosing classes)
    /// touched by `method`, including accesses inside every catch clause and
    /// finally block of the method's try statements. Insertion ordered.
    pub fn fields_accessed_inside_method<'a>(
        &'a self,
        method: &MethodEntity,
        registry: &'a ClassRegistry,
    ) -> IndexSet<&'a FieldEntity> {
        ReferenceResolver::new(registry).fields_accessed_inside_method(self, method)
    }

    pub fn contains_method_with_test_annotation(&self) -> bool {
        self.methods.iter().any(MethodEntity::has_test_annotation)
    }

    pub fn contains_method_invocation(&self, invocation: &MethodInvocation) -> bool {
        self.methods
            .iter()
            .any(|method| method.contains_method_invocation(invocation))
    }

    pub fn contains_method_invocation_excluding(
        &self,
        invocation: &MethodInvocation,
        excluded: &MethodEntity,
    ) -> bool {
        self.methods
            .iter()
            .filter(|method| *method != excluded)
            .any(|method| method.contains_method_invocation(invocation))
    }

    pub fn contains_super_method_invocation(&self, invocation: &MethodInvocation) -> bool {
        self.methods
            .iter()
            .any(|method| method.contains_super_method_invocation(invocation))
    }

    pub fn contains_field_access(&self, access: &FieldAccess) -> bool {
        self.methods
            .iter()
            .any(|method| method.contains_field_access(access))
    }

    /// Whether some field is declared with the given qualified type
    pub fn has_field_type(&self, qualified_name: &str) -> bool {
        self.fields
            .iter()
            .any(|field| field.field_type().qualified_name() == Some(qualified_name))
    }

    /// Whether any attached comment carries a known parser-generator marker
    pub fn is_generated_by_parser_generator(&self) -> bool {
        self.comments
            .iter()
            .any(|comment| classifiers::is_parser_generator_comment(comment.text()))
    }

    /// Whether the superclass chain reaches `junit.framework.TestCase`
    pub fn extends_test_case(&self, registry: &ClassRegistry) -> bool {
        self.extends_any_of(registry, &[classifiers::TEST_CASE_CLASS])
    }

    /// Whether the superclass chain reaches one of `bases`.
    ///
    /// The declared superclass of every resolvable level is compared, so an
    /// external base that is never registered still matches.
    pub fn extends_any_of<S: AsRef<str>>(&self, registry: &ClassRegistry, bases: &[S]) -> bool {
        std::iter::once(self)
            .chain(registry.superclass_chain(self))
            .filter_map(ClassEntity::superclass)
            .any(|superclass| bases.iter().any(|base| base.as_ref() == superclass))
    }

    /// Test-related: a test-annotated method, or a TestCase ancestor
    pub fn is_test_related(&self, registry: &ClassRegistry) -> bool {
        self.contains_method_with_test_annotation() || self.extends_test_case(registry)
    }
}

/// Accumulates a class during the build pass.
///
/// `add_*` append and never fail; duplicate adds produce duplicate entries.
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    class: ClassEntity,
}

impl ClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            class: ClassEntity {
                name: name.into(),
                kind: ClassKind::Class,
                access: Access::Public,
                is_abstract: false,
                superclass: None,
                interfaces: Vec::new(),
                enclosing_class: None,
                methods: Vec::new(),
                fields: Vec::new(),
                comments: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.class.name
    }

    pub fn kind(mut self, kind: ClassKind) -> Self {
        self.class.kind = kind;
        self
    }

    pub fn access(mut self, access: Access) -> Self {
        self.class.access = access;
        self
    }

    pub fn abstract_class(mut self, is_abstract: bool) -> Self {
        self.class.is_abstract = is_abstract;
        self
    }

    pub fn superclass(mut self, qualified_name: impl Into<String>) -> Self {
        self.class.superclass = Some(qualified_name.into());
        self
    }

    pub fn interface(mut self, qualified_name: impl Into<String>) -> Self {
        self.class.interfaces.push(qualified_name.into());
        self
    }

    pub fn enclosing_class(mut self, qualified_name: impl Into<String>) -> Self {
        self.class.enclosing_class = Some(qualified_name.into());
        self
    }

    /// Start a method already bound to this class
    pub fn method_builder(&self, name: impl Into<String>) -> MethodBuilder {
        MethodBuilder::new(self.class.name.clone(), name)
    }

    /// Start a field already bound to this class
    pub fn field_entity(
        &self,
        name: impl Into<String>,
        field_type: super::types::TypeRef,
    ) -> FieldEntity {
        FieldEntity::new(self.class.name.clone(), name, field_type)
    }

    pub fn add_method(&mut self, method: MethodEntity) -> &mut Self {
        self.class.methods.push(method);
        self
    }

    pub fn add_field(&mut self, field: FieldEntity) -> &mut Self {
        self.class.fields.push(field);
        self
    }

    pub fn add_comment(&mut self, comment: CommentEntity) -> &mut Self {
        self.class.comments.push(comment);
        self
    }

    pub fn add_comments(&mut self, comments: impl IntoIterator<Item = CommentEntity>) -> &mut Self {
        self.class.comments.extend(comments);
        self
    }

    pub fn with_method(mut self, method: MethodEntity) -> Self {
        self.add_method(method);
        self
    }

    pub fn with_field(mut self, field: FieldEntity) -> Self {
        self.add_field(field);
        self
    }

    pub fn with_comment(mut self, comment: CommentEntity) -> Self {
        self.add_comment(comment);
        self
    }

    pub fn build(self) -> ClassEntity {
        self.class
    }
}
