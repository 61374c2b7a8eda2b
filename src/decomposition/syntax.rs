//! Front-end syntax node interface
//!
//! The analysis core never parses source text. A front-end lowers its own
//! syntax tree into [`SyntaxNode`] handles: a kind tag, child enumeration and
//! per-kind slot accessors, plus the field/method facts its type resolution
//! produced for expression nodes. [`OwnedNode`] is a ready-made owned
//! implementation for front-ends that do not want to wrap their own tree.

use crate::model::{FieldAccess, MethodInvocation, TypeRef};
use std::fmt;
use std::sync::Arc;

/// Shared handle to a front-end syntax node
pub type SyntaxRef = Arc<dyn SyntaxNode>;

/// Syntactic kind of a node
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    Block,
    ExpressionStatement,
    VariableDeclaration,
    Return,
    Throw,
    Break,
    Continue,
    Empty,
    Assert,
    SwitchCase,
    LocalClassDeclaration,
    If,
    While,
    DoWhile,
    For,
    ForEach,
    Switch,
    Synchronized,
    Try,
    CatchClause,
    Labeled,
    Expression,
    /// Anything the front-end has no tag for
    Other(String),
}

impl SyntaxKind {
    /// Statement kinds that carry no nested statements
    pub fn is_simple_statement(&self) -> bool {
        matches!(
            self,
            Self::ExpressionStatement
                | Self::VariableDeclaration
                | Self::Return
                | Self::Throw
                | Self::Break
                | Self::Continue
                | Self::Empty
                | Self::Assert
                | Self::SwitchCase
                | Self::LocalClassDeclaration
        )
    }
}

impl fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(tag) => write!(f, "other({})", tag),
            kind => write!(f, "{:?}", kind),
        }
    }
}

/// A node of the front-end syntax tree.
///
/// Slot accessors return `None` / empty when the slot does not apply to the
/// node's kind. For simple statements `children` enumerates the embedded
/// expressions; for blocks and switches it enumerates nested statements.
pub trait SyntaxNode: fmt::Debug + Send + Sync {
    fn kind(&self) -> SyntaxKind;

    fn children(&self) -> Vec<SyntaxRef>;

    /// Source text of the node
    fn text(&self) -> &str;

    /// Condition of `if`, `while`, `do` and `for`
    fn condition(&self) -> Option<SyntaxRef> {
        None
    }

    /// Iterated expression of an enhanced `for`
    fn iterable(&self) -> Option<SyntaxRef> {
        None
    }

    /// Selector of a `switch`
    fn selector(&self) -> Option<SyntaxRef> {
        None
    }

    /// Lock expression of a `synchronized` block
    fn lock_expression(&self) -> Option<SyntaxRef> {
        None
    }

    /// Body of loops, `synchronized`, labeled statements and catch clauses
    fn body(&self) -> Option<SyntaxRef> {
        None
    }

    fn then_branch(&self) -> Option<SyntaxRef> {
        None
    }

    fn else_branch(&self) -> Option<SyntaxRef> {
        None
    }

    /// Initializers of a classic `for`
    fn initializers(&self) -> Vec<SyntaxRef> {
        Vec::new()
    }

    /// Update expressions of a classic `for`
    fn updaters(&self) -> Vec<SyntaxRef> {
        Vec::new()
    }

    /// Guarded block of a `try`
    fn try_block(&self) -> Option<SyntaxRef> {
        None
    }

    /// Resource declarations of a try-with-resources
    fn resources(&self) -> Vec<SyntaxRef> {
        Vec::new()
    }

    fn catch_clauses(&self) -> Vec<SyntaxRef> {
        Vec::new()
    }

    /// Caught types of a catch clause (several for multi-catch)
    fn caught_types(&self) -> Vec<TypeRef> {
        Vec::new()
    }

    /// Name of the exception variable of a catch clause
    fn catch_parameter(&self) -> Option<String> {
        None
    }

    fn finally_block(&self) -> Option<SyntaxRef> {
        None
    }

    fn label(&self) -> Option<String> {
        None
    }

    /// Resolved type of an expression node
    fn expression_type(&self) -> TypeRef {
        TypeRef::Unknown
    }

    /// Field accesses inside an expression node's subtree
    fn field_accesses(&self) -> Vec<FieldAccess> {
        Vec::new()
    }

    /// Method invocations inside an expression node's subtree
    fn method_invocations(&self) -> Vec<MethodInvocation> {
        Vec::new()
    }
}

/// Owned, immutable syntax node assembled with builder methods
#[derive(Debug, Clone)]
pub struct OwnedNode {
    kind: SyntaxKind,
    text: String,
    children: Vec<SyntaxRef>,
    condition: Option<SyntaxRef>,
    iterable: Option<SyntaxRef>,
    selector: Option<SyntaxRef>,
    lock_expression: Option<SyntaxRef>,
    body: Option<SyntaxRef>,
    then_branch: Option<SyntaxRef>,
    else_branch: Option<SyntaxRef>,
    initializers: Vec<SyntaxRef>,
    updaters: Vec<SyntaxRef>,
    try_block: Option<SyntaxRef>,
    resources: Vec<SyntaxRef>,
    catch_clauses: Vec<SyntaxRef>,
    caught_types: Vec<TypeRef>,
    catch_parameter: Option<String>,
    finally_block: Option<SyntaxRef>,
    label: Option<String>,
    expression_type: TypeRef,
    field_accesses: Vec<FieldAccess>,
    method_invocations: Vec<MethodInvocation>,
}

impl OwnedNode {
    pub fn new(kind: SyntaxKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            children: Vec::new(),
            condition: None,
            iterable: None,
            selector: None,
            lock_expression: None,
            body: None,
            then_branch: None,
            else_branch: None,
            initializers: Vec::new(),
            updaters: Vec::new(),
            try_block: None,
            resources: Vec::new(),
            catch_clauses: Vec::new(),
            caught_types: Vec::new(),
            catch_parameter: None,
            finally_block: None,
            label: None,
            expression_type: TypeRef::Unknown,
            field_accesses: Vec::new(),
            method_invocations: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: SyntaxRef) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = SyntaxRef>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn with_condition(mut self, condition: SyntaxRef) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_iterable(mut self, iterable: SyntaxRef) -> Self {
        self.iterable = Some(iterable);
        self
    }

    pub fn with_selector(mut self, selector: SyntaxRef) -> Self {
        self.selector = Some(selector);
        self
    }

    pub fn with_lock_expression(mut self, lock: SyntaxRef) -> Self {
        self.lock_expression = Some(lock);
        self
    }

    pub fn with_body(mut self, body: SyntaxRef) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_then_branch(mut self, branch: SyntaxRef) -> Self {
        self.then_branch = Some(branch);
        self
    }

    pub fn with_else_branch(mut self, branch: SyntaxRef) -> Self {
        self.else_branch = Some(branch);
        self
    }

    pub fn with_initializer(mut self, initializer: SyntaxRef) -> Self {
        self.initializers.push(initializer);
        self
    }

    pub fn with_updater(mut self, updater: SyntaxRef) -> Self {
        self.updaters.push(updater);
        self
    }

    pub fn with_try_block(mut self, block: SyntaxRef) -> Self {
        self.try_block = Some(block);
        self
    }

    pub fn with_resource(mut self, resource: SyntaxRef) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn with_catch_clause(mut self, clause: SyntaxRef) -> Self {
        self.catch_clauses.push(clause);
        self
    }

    pub fn with_caught_type(mut self, ty: TypeRef) -> Self {
        self.caught_types.push(ty);
        self
    }

    pub fn with_catch_parameter(mut self, name: impl Into<String>) -> Self {
        self.catch_parameter = Some(name.into());
        self
    }

    pub fn with_finally_block(mut self, block: SyntaxRef) -> Self {
        self.finally_block = Some(block);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_expression_type(mut self, ty: TypeRef) -> Self {
        self.expression_type = ty;
        self
    }

    pub fn with_field_access(mut self, access: FieldAccess) -> Self {
        self.field_accesses.push(access);
        self
    }

    pub fn with_method_invocation(mut self, invocation: MethodInvocation) -> Self {
        self.method_invocations.push(invocation);
        self
    }

    pub fn into_ref(self) -> SyntaxRef {
        Arc::new(self)
    }
}

impl SyntaxNode for OwnedNode {
    fn kind(&self) -> SyntaxKind {
        self.kind.clone()
    }

    fn children(&self) -> Vec<SyntaxRef> {
        self.children.clone()
    }

    fn text(&self) -> &str {
        &self.text
    }

    fn condition(&self) -> Option<SyntaxRef> {
        self.condition.clone()
    }

    fn iterable(&self) -> Option<SyntaxRef> {
        self.iterable.clone()
    }

    fn selector(&self) -> Option<SyntaxRef> {
        self.selector.clone()
    }

    fn lock_expression(&self) -> Option<SyntaxRef> {
        self.lock_expression.clone()
    }

    fn body(&self) -> Option<SyntaxRef> {
        self.body.clone()
    }

    fn then_branch(&self) -> Option<SyntaxRef> {
        self.then_branch.clone()
    }

    fn else_branch(&self) -> Option<SyntaxRef> {
        self.else_branch.clone()
    }

    fn initializers(&self) -> Vec<SyntaxRef> {
        self.initializers.clone()
    }

    fn updaters(&self) -> Vec<SyntaxRef> {
        self.updaters.clone()
    }

    fn try_block(&self) -> Option<SyntaxRef> {
        self.try_block.clone()
    }

    fn resources(&self) -> Vec<SyntaxRef> {
        self.resources.clone()
    }

    fn catch_clauses(&self) -> Vec<SyntaxRef> {
        self.catch_clauses.clone()
    }

    fn caught_types(&self) -> Vec<TypeRef> {
        self.caught_types.clone()
    }

    fn catch_parameter(&self) -> Option<String> {
        self.catch_parameter.clone()
    }

    fn finally_block(&self) -> Option<SyntaxRef> {
        self.finally_block.clone()
    }

    fn label(&self) -> Option<String> {
        self.label.clone()
    }

    fn expression_type(&self) -> TypeRef {
        self.expression_type.clone()
    }

    fn field_accesses(&self) -> Vec<FieldAccess> {
        self.field_accesses.clone()
    }

    fn method_invocations(&self) -> Vec<MethodInvocation> {
        self.method_invocations.clone()
    }
}

/// Identity comparison of two syntax handles
pub fn same_node(a: &SyntaxRef, b: &SyntaxRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
