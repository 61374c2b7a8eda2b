//! Composite statement tree
//!
//! Every control-flow construct maps onto one of four shapes: a simple
//! statement, a composite with an optional controlling expression and ordered
//! children, a try statement with its dedicated slots, or an opaque unknown
//! leaf. Expressions are never decomposed further; they keep the facts the
//! front-end attached to them.

use super::syntax::{same_node, SyntaxKind, SyntaxRef};
use crate::model::{FieldAccess, MethodInvocation, TypeRef};

/// Opaque expression attached to a statement
#[derive(Debug, Clone)]
pub struct AbstractExpression {
    syntax: SyntaxRef,
    expression_type: TypeRef,
    field_accesses: Vec<FieldAccess>,
    method_invocations: Vec<MethodInvocation>,
}

impl AbstractExpression {
    /// Wrap a front-end expression node, capturing its access facts
    pub fn new(syntax: SyntaxRef) -> Self {
        Self {
            expression_type: syntax.expression_type(),
            field_accesses: syntax.field_accesses(),
            method_invocations: syntax.method_invocations(),
            syntax,
        }
    }

    /// The wrapped node itself, not a copy
    pub fn syntax(&self) -> &SyntaxRef {
        &self.syntax
    }

    pub fn is_node(&self, node: &SyntaxRef) -> bool {
        same_node(&self.syntax, node)
    }

    pub fn text(&self) -> &str {
        self.syntax.text()
    }

    pub fn expression_type(&self) -> &TypeRef {
        &self.expression_type
    }

    pub fn field_accesses(&self) -> &[FieldAccess] {
        &self.field_accesses
    }

    pub fn method_invocations(&self) -> &[MethodInvocation] {
        &self.method_invocations
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    While,
    DoWhile,
    For,
    ForEach,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompositeKind {
    Block,
    If,
    Loop(LoopKind),
    Switch,
    Synchronized,
    Labeled(String),
}

/// A statement without nested statements
#[derive(Debug, Clone)]
pub struct SimpleStatement {
    kind: SyntaxKind,
    syntax: SyntaxRef,
    expressions: Vec<AbstractExpression>,
}

impl SimpleStatement {
    pub fn new(kind: SyntaxKind, syntax: SyntaxRef, expressions: Vec<AbstractExpression>) -> Self {
        Self {
            kind,
            syntax,
            expressions,
        }
    }

    pub fn kind(&self) -> &SyntaxKind {
        &self.kind
    }

    pub fn syntax(&self) -> &SyntaxRef {
        &self.syntax
    }

    pub fn expressions(&self) -> &[AbstractExpression] {
        &self.expressions
    }
}

/// A statement holding child statements and at most one controlling
/// expression (condition, selector or lock)
#[derive(Debug, Clone)]
pub struct CompositeStatement {
    kind: CompositeKind,
    syntax: Option<SyntaxRef>,
    expression: Option<AbstractExpression>,
    children: Vec<Statement>,
}

impl CompositeStatement {
    pub fn new(kind: CompositeKind, syntax: Option<SyntaxRef>) -> Self {
        Self {
            kind,
            syntax,
            expression: None,
            children: Vec::new(),
        }
    }

    /// Block with no syntax behind it, used where a required block is missing
    pub fn empty_block() -> Self {
        Self::new(CompositeKind::Block, None)
    }

    pub fn set_expression(&mut self, expression: AbstractExpression) {
        self.expression = Some(expression);
    }

    pub fn add_child(&mut self, child: Statement) {
        self.children.push(child);
    }

    pub fn kind(&self) -> &CompositeKind {
        &self.kind
    }

    /// `None` for substituted blocks
    pub fn syntax(&self) -> Option<&SyntaxRef> {
        self.syntax.as_ref()
    }

    pub fn expression(&self) -> Option<&AbstractExpression> {
        self.expression.as_ref()
    }

    pub fn children(&self) -> &[Statement] {
        &self.children
    }

    pub fn is_substituted(&self) -> bool {
        self.syntax.is_none()
    }

    fn own_expressions(&self) -> impl Iterator<Item = &AbstractExpression> {
        self.expression.iter()
    }
}

/// One `catch` of a try statement
#[derive(Debug, Clone)]
pub struct CatchClause {
    syntax: SyntaxRef,
    caught_types: Vec<TypeRef>,
    parameter: Option<String>,
    body: CompositeStatement,
}

impl CatchClause {
    pub fn new(
        syntax: SyntaxRef,
        caught_types: Vec<TypeRef>,
        parameter: Option<String>,
        body: CompositeStatement,
    ) -> Self {
        Self {
            syntax,
            caught_types,
            parameter,
            body,
        }
    }

    pub fn syntax(&self) -> &SyntaxRef {
        &self.syntax
    }

    pub fn caught_types(&self) -> &[TypeRef] {
        &self.caught_types
    }

    pub fn parameter(&self) -> Option<&str> {
        self.parameter.as_deref()
    }

    pub fn body(&self) -> &CompositeStatement {
        &self.body
    }

    pub fn catches(&self, exception: &TypeRef) -> bool {
        self.caught_types.iter().any(|ty| ty == exception)
    }
}

/// `try` with guarded block, catch clauses and optional finally
#[derive(Debug, Clone)]
pub struct TryStatement {
    syntax: SyntaxRef,
    resources: Vec<AbstractExpression>,
    guarded: CompositeStatement,
    catch_clauses: Vec<CatchClause>,
    finally: Option<CompositeStatement>,
}

impl TryStatement {
    pub fn new(
        syntax: SyntaxRef,
        resources: Vec<AbstractExpression>,
        guarded: CompositeStatement,
        catch_clauses: Vec<CatchClause>,
        finally: Option<CompositeStatement>,
    ) -> Self {
        Self {
            syntax,
            resources,
            guarded,
            catch_clauses,
            finally,
        }
    }

    pub fn syntax(&self) -> &SyntaxRef {
        &self.syntax
    }

    pub fn resources(&self) -> &[AbstractExpression] {
        &self.resources
    }

    pub fn guarded_block(&self) -> &CompositeStatement {
        &self.guarded
    }

    pub fn catch_clauses(&self) -> &[CatchClause] {
        &self.catch_clauses
    }

    pub fn finally_clause(&self) -> Option<&CompositeStatement> {
        self.finally.as_ref()
    }

    pub fn is_try_with_resources(&self) -> bool {
        !self.resources.is_empty()
    }

    /// Field accesses directly inside the catch bodies and the finally block
    pub fn handler_field_accesses(&self) -> Vec<&FieldAccess> {
        let mut accesses = Vec::new();
        for clause in &self.catch_clauses {
            accesses.extend(clause.body.field_accesses());
        }
        if let Some(finally) = &self.finally {
            accesses.extend(finally.field_accesses());
        }
        accesses
    }

    /// Method invocations directly inside the catch bodies and the finally block
    pub fn handler_method_invocations(&self) -> Vec<&MethodInvocation> {
        let mut invocations = Vec::new();
        for clause in &self.catch_clauses {
            invocations.extend(clause.body.method_invocations());
        }
        if let Some(finally) = &self.finally {
            invocations.extend(finally.method_invocations());
        }
        invocations
    }
}

/// Leaf for syntax kinds without a statement mapping
#[derive(Debug, Clone)]
pub struct UnknownStatement {
    kind: SyntaxKind,
    syntax: SyntaxRef,
}

impl UnknownStatement {
    pub fn new(kind: SyntaxKind, syntax: SyntaxRef) -> Self {
        Self { kind, syntax }
    }

    pub fn kind(&self) -> &SyntaxKind {
        &self.kind
    }

    pub fn syntax(&self) -> &SyntaxRef {
        &self.syntax
    }
}

/// A node of the statement tree
#[derive(Debug, Clone)]
pub enum Statement {
    Simple(SimpleStatement),
    Composite(CompositeStatement),
    Try(TryStatement),
    Unknown(UnknownStatement),
}

// Traversal helpers. "Guarded path" walks skip catch bodies and finally
// blocks; those are reached through `TryStatement::handler_*`.
impl Statement {
    fn visit<'a>(&'a self, visitor: &mut impl FnMut(&'a Statement)) {
        visitor(self);
        match self {
            Statement::Simple(_) | Statement::Unknown(_) => {}
            Statement::Composite(composite) => composite.visit_children(visitor),
            Statement::Try(try_stmt) => {
                try_stmt.guarded.visit_children(visitor);
                for clause in &try_stmt.catch_clauses {
                    clause.body.visit_children(visitor);
                }
                if let Some(finally) = &try_stmt.finally {
                    finally.visit_children(visitor);
                }
            }
        }
    }

    fn guarded_expressions<'a>(&'a self, out: &mut Vec<&'a AbstractExpression>) {
        match self {
            Statement::Simple(simple) => out.extend(simple.expressions.iter()),
            Statement::Composite(composite) => composite.guarded_expressions(out),
            Statement::Try(try_stmt) => {
                out.extend(try_stmt.resources.iter());
                try_stmt.guarded.guarded_expressions(out);
            }
            Statement::Unknown(_) => {}
        }
    }

    pub fn as_try(&self) -> Option<&TryStatement> {
        match self {
            Statement::Try(try_stmt) => Some(try_stmt),
            _ => None,
        }
    }

    pub fn as_composite(&self) -> Option<&CompositeStatement> {
        match self {
            Statement::Composite(composite) => Some(composite),
            _ => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Statement::Unknown(_))
    }
}

impl CompositeStatement {
    fn visit_children<'a>(&'a self, visitor: &mut impl FnMut(&'a Statement)) {
        for child in &self.children {
            child.visit(visitor);
        }
    }

    fn guarded_expressions<'a>(&'a self, out: &mut Vec<&'a AbstractExpression>) {
        out.extend(self.own_expressions());
        for child in &self.children {
            child.guarded_expressions(out);
        }
    }

    /// Field accesses on the guarded path of this statement
    pub fn field_accesses(&self) -> Vec<&FieldAccess> {
        let mut expressions = Vec::new();
        self.guarded_expressions(&mut expressions);
        expressions
            .into_iter()
            .flat_map(|expr| expr.field_accesses())
            .collect()
    }

    /// Method invocations on the guarded path of this statement
    pub fn method_invocations(&self) -> Vec<&MethodInvocation> {
        let mut expressions = Vec::new();
        self.guarded_expressions(&mut expressions);
        expressions
            .into_iter()
            .flat_map(|expr| expr.method_invocations())
            .collect()
    }

    /// Every try statement nested anywhere below, in pre-order
    pub fn try_statements(&self) -> Vec<&TryStatement> {
        let mut found = Vec::new();
        self.visit_children(&mut |stmt| {
            if let Statement::Try(try_stmt) = stmt {
                found.push(try_stmt);
            }
        });
        found
    }

    /// Every synchronized block nested anywhere below, in pre-order
    pub fn synchronized_statements(&self) -> Vec<&CompositeStatement> {
        let mut found = Vec::new();
        self.visit_children(&mut |stmt| {
            if let Statement::Composite(composite) = stmt {
                if composite.kind == CompositeKind::Synchronized {
                    found.push(composite);
                }
            }
        });
        found
    }

    /// Number of statements below this one, not counting itself
    pub fn statement_count(&self) -> usize {
        let mut count = 0;
        self.visit_children(&mut |_| count += 1);
        count
    }

    pub fn unknown_statement_count(&self) -> usize {
        let mut count = 0;
        self.visit_children(&mut |stmt| {
            if stmt.is_unknown() {
                count += 1;
            }
        });
        count
    }
}

/// Decomposed body of a method
#[derive(Debug, Clone)]
pub struct MethodBody {
    root: CompositeStatement,
}

impl MethodBody {
    pub fn new(root: CompositeStatement) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &CompositeStatement {
        &self.root
    }

    /// Accesses on the guarded path: everything except catch and finally
    /// bodies
    pub fn field_accesses(&self) -> Vec<&FieldAccess> {
        self.root.field_accesses()
    }

    pub fn method_invocations(&self) -> Vec<&MethodInvocation> {
        self.root.method_invocations()
    }

    /// Accesses anywhere in the body, handlers included
    pub fn all_field_accesses(&self) -> Vec<&FieldAccess> {
        let mut accesses = self.field_accesses();
        for try_stmt in self.try_statements() {
            accesses.extend(try_stmt.handler_field_accesses());
        }
        accesses
    }

    pub fn all_method_invocations(&self) -> Vec<&MethodInvocation> {
        let mut invocations = self.method_invocations();
        for try_stmt in self.try_statements() {
            invocations.extend(try_stmt.handler_method_invocations());
        }
        invocations
    }

    pub fn try_statements(&self) -> Vec<&TryStatement> {
        self.root.try_statements()
    }

    pub fn synchronized_statements(&self) -> Vec<&CompositeStatement> {
        self.root.synchronized_statements()
    }

    pub fn statement_count(&self) -> usize {
        self.root.statement_count()
    }

    pub fn unknown_statement_count(&self) -> usize {
        self.root.unknown_statement_count()
    }
}
