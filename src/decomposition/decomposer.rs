//! Recursive descent from front-end syntax nodes to the statement tree

use super::statement::{
    AbstractExpression, CatchClause, CompositeKind, CompositeStatement, LoopKind, MethodBody,
    SimpleStatement, Statement, TryStatement, UnknownStatement,
};
use super::syntax::{SyntaxKind, SyntaxRef};
use crate::observability::{get_current_context, set_phase, AnalysisPhase};
use tracing::{debug, trace, warn};

/// Nesting depth past which a subtree is kept as an opaque leaf.
///
/// Descent is recursive; this bound keeps the worst-case frame chain inside
/// a 2 MiB thread stack in unoptimized builds.
pub const DEFAULT_MAX_NESTING: usize = 128;

/// Builds [`MethodBody`] trees from syntax nodes.
///
/// Decomposition never fails. Unsupported kinds become
/// [`Statement::Unknown`] leaves and missing required blocks are replaced by
/// empty substituted blocks.
#[derive(Debug, Clone, Copy)]
pub struct StatementDecomposer {
    max_nesting: usize,
}

impl Default for StatementDecomposer {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementDecomposer {
    pub fn new() -> Self {
        Self {
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }

    pub fn with_max_nesting(max_nesting: usize) -> Self {
        Self {
            max_nesting: max_nesting.max(1),
        }
    }

    /// Decompose the body node of a method
    pub fn decompose_method_body(&self, body: &SyntaxRef) -> MethodBody {
        let _phase = set_phase(AnalysisPhase::Decomposition);
        MethodBody::new(self.block(body, 0))
    }

    /// Decompose a single statement node
    pub fn decompose(&self, node: &SyntaxRef) -> Statement {
        self.statement(node, 0)
    }

    fn statement(&self, node: &SyntaxRef, depth: usize) -> Statement {
        let kind = node.kind();
        if depth >= self.max_nesting {
            warn!(
                depth,
                %kind,
                context = %get_current_context(),
                "Nesting limit reached, keeping subtree opaque"
            );
            return Statement::Unknown(UnknownStatement::new(kind, node.clone()));
        }

        match kind {
            SyntaxKind::Block => Statement::Composite(self.block(node, depth)),
            SyntaxKind::If => Statement::Composite(self.if_statement(node, depth)),
            SyntaxKind::While => {
                Statement::Composite(self.loop_statement(node, LoopKind::While, depth))
            }
            SyntaxKind::DoWhile => {
                Statement::Composite(self.loop_statement(node, LoopKind::DoWhile, depth))
            }
            SyntaxKind::For => {
                Statement::Composite(self.loop_statement(node, LoopKind::For, depth))
            }
            SyntaxKind::ForEach => {
                Statement::Composite(self.loop_statement(node, LoopKind::ForEach, depth))
            }
            SyntaxKind::Switch => Statement::Composite(self.switch_statement(node, depth)),
            SyntaxKind::Synchronized => {
                Statement::Composite(self.synchronized_statement(node, depth))
            }
            SyntaxKind::Labeled => Statement::Composite(self.labeled_statement(node, depth)),
            SyntaxKind::Try => Statement::Try(self.try_statement(node, depth)),
            kind if kind.is_simple_statement() => Statement::Simple(Self::simple(kind, node)),
            kind => {
                trace!(%kind, text = node.text(), "No statement mapping, keeping opaque leaf");
                Statement::Unknown(UnknownStatement::new(kind, node.clone()))
            }
        }
    }

    fn simple(kind: SyntaxKind, node: &SyntaxRef) -> SimpleStatement {
        let expressions = node
            .children()
            .into_iter()
            .map(AbstractExpression::new)
            .collect();
        SimpleStatement::new(kind, node.clone(), expressions)
    }

    /// A block node becomes a block composite; any other statement is
    /// wrapped in a block of one
    fn block(&self, node: &SyntaxRef, depth: usize) -> CompositeStatement {
        let mut block = CompositeStatement::new(CompositeKind::Block, Some(node.clone()));
        if node.kind() == SyntaxKind::Block {
            for child in node.children() {
                block.add_child(self.statement(&child, depth + 1));
            }
        } else {
            block.add_child(self.statement(node, depth + 1));
        }
        block
    }

    fn block_or_substitute(
        &self,
        node: Option<SyntaxRef>,
        depth: usize,
        slot: &'static str,
    ) -> CompositeStatement {
        match node {
            Some(node) => self.block(&node, depth),
            None => {
                debug!(slot, "Missing required block, substituting an empty one");
                CompositeStatement::empty_block()
            }
        }
    }

    fn child_or_substitute(
        &self,
        node: Option<SyntaxRef>,
        depth: usize,
        slot: &'static str,
    ) -> Statement {
        match node {
            Some(node) => self.statement(&node, depth + 1),
            None => {
                debug!(slot, "Missing required statement, substituting an empty block");
                Statement::Composite(CompositeStatement::empty_block())
            }
        }
    }

    fn if_statement(&self, node: &SyntaxRef, depth: usize) -> CompositeStatement {
        let mut composite = CompositeStatement::new(CompositeKind::If, Some(node.clone()));
        if let Some(condition) = node.condition() {
            composite.set_expression(AbstractExpression::new(condition));
        }
        composite.add_child(self.child_or_substitute(node.then_branch(), depth, "then"));
        if let Some(else_branch) = node.else_branch() {
            composite.add_child(self.statement(&else_branch, depth + 1));
        }
        composite
    }

    fn loop_statement(&self, node: &SyntaxRef, kind: LoopKind, depth: usize) -> CompositeStatement {
        let mut composite = CompositeStatement::new(CompositeKind::Loop(kind), Some(node.clone()));
        let controlling = match kind {
            LoopKind::ForEach => node.iterable(),
            _ => node.condition(),
        };
        if let Some(expression) = controlling {
            composite.set_expression(AbstractExpression::new(expression));
        }

        for initializer in node.initializers() {
            composite.add_child(self.header_part(&initializer, depth));
        }
        composite.add_child(self.child_or_substitute(node.body(), depth, "loop body"));
        for updater in node.updaters() {
            composite.add_child(self.header_part(&updater, depth));
        }
        composite
    }

    /// For-loop initializers and updaters may come as bare expressions or as
    /// declaration statements
    fn header_part(&self, node: &SyntaxRef, depth: usize) -> Statement {
        if node.kind() == SyntaxKind::Expression {
            Statement::Simple(SimpleStatement::new(
                SyntaxKind::ExpressionStatement,
                node.clone(),
                vec![AbstractExpression::new(node.clone())],
            ))
        } else {
            self.statement(node, depth + 1)
        }
    }

    fn switch_statement(&self, node: &SyntaxRef, depth: usize) -> CompositeStatement {
        let mut composite = CompositeStatement::new(CompositeKind::Switch, Some(node.clone()));
        if let Some(selector) = node.selector() {
            composite.set_expression(AbstractExpression::new(selector));
        }
        for child in node.children() {
            composite.add_child(self.statement(&child, depth + 1));
        }
        composite
    }

    fn synchronized_statement(&self, node: &SyntaxRef, depth: usize) -> CompositeStatement {
        let mut composite =
            CompositeStatement::new(CompositeKind::Synchronized, Some(node.clone()));
        match node.lock_expression() {
            Some(lock) => composite.set_expression(AbstractExpression::new(lock)),
            None => debug!("Synchronized block without lock expression"),
        }
        composite.add_child(Statement::Composite(self.block_or_substitute(
            node.body(),
            depth + 1,
            "synchronized body",
        )));
        composite
    }

    fn labeled_statement(&self, node: &SyntaxRef, depth: usize) -> CompositeStatement {
        let label = node.label().unwrap_or_default();
        let mut composite =
            CompositeStatement::new(CompositeKind::Labeled(label), Some(node.clone()));
        composite.add_child(self.child_or_substitute(node.body(), depth, "labeled body"));
        composite
    }

    fn try_statement(&self, node: &SyntaxRef, depth: usize) -> TryStatement {
        let resources = node
            .resources()
            .into_iter()
            .map(AbstractExpression::new)
            .collect();
        let guarded = self.block_or_substitute(node.try_block(), depth + 1, "try block");

        let catch_clauses = node
            .catch_clauses()
            .into_iter()
            .map(|clause| {
                let body = self.block_or_substitute(clause.body(), depth + 1, "catch body");
                CatchClause::new(
                    clause.clone(),
                    clause.caught_types(),
                    clause.catch_parameter(),
                    body,
                )
            })
            .collect();

        let finally = node
            .finally_block()
            .map(|block| self.block(&block, depth + 1));

        TryStatement::new(node.clone(), resources, guarded, catch_clauses, finally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decomposition::syntax::{OwnedNode, SyntaxNode};
    use crate::model::{FieldAccess, MethodEntity, TypeRef};
    use crate::observability::{get_current_context, AnalysisContext, AnalysisPhase};
    use std::sync::{Arc, Mutex};

    fn field_expr(name: &str) -> SyntaxRef {
        OwnedNode::new(SyntaxKind::Expression, format!("this.{name}++"))
            .with_field_access(FieldAccess::new("app.Counter", name, TypeRef::primitive("int")))
            .into_ref()
    }

    fn expr_stmt(name: &str) -> SyntaxRef {
        OwnedNode::new(SyntaxKind::ExpressionStatement, format!("this.{name}++;"))
            .with_child(field_expr(name))
            .into_ref()
    }

    fn block(stmts: Vec<SyntaxRef>) -> SyntaxRef {
        OwnedNode::new(SyntaxKind::Block, "{...}")
            .with_children(stmts)
            .into_ref()
    }

    fn names(accesses: Vec<&FieldAccess>) -> Vec<String> {
        accesses.iter().map(|a| a.name().to_string()).collect()
    }

    #[test]
    fn test_synchronized_attaches_lock_expression() {
        let lock = OwnedNode::new(SyntaxKind::Expression, "this.mutex").into_ref();
        let sync = OwnedNode::new(SyntaxKind::Synchronized, "synchronized (this.mutex) {...}")
            .with_lock_expression(Arc::clone(&lock))
            .with_body(block(vec![expr_stmt("a")]))
            .into_ref();

        let stmt = StatementDecomposer::new().decompose(&sync);
        let composite = stmt.as_composite().expect("synchronized is a composite");

        assert_eq!(composite.kind(), &CompositeKind::Synchronized);
        assert!(composite.expression().unwrap().is_node(&lock));
        assert_eq!(composite.children().len(), 1);
        assert_eq!(names(composite.field_accesses()), vec!["a"]);
    }

    #[test]
    fn test_if_attaches_condition_and_branches() {
        let condition = field_expr("flag");
        let node = OwnedNode::new(SyntaxKind::If, "if (flag) a++; else b++;")
            .with_condition(condition)
            .with_then_branch(expr_stmt("a"))
            .with_else_branch(expr_stmt("b"))
            .into_ref();

        let stmt = StatementDecomposer::new().decompose(&node);
        let composite = stmt.as_composite().unwrap();

        assert_eq!(composite.children().len(), 2);
        assert_eq!(names(composite.field_accesses()), vec!["flag", "a", "b"]);
    }

    #[test]
    fn test_for_loop_header_becomes_children() {
        let node = OwnedNode::new(SyntaxKind::For, "for (i = start; i < end; i++) {...}")
            .with_initializer(field_expr("start"))
            .with_condition(field_expr("end"))
            .with_updater(field_expr("step"))
            .with_body(block(vec![expr_stmt("total")]))
            .into_ref();

        let stmt = StatementDecomposer::new().decompose(&node);
        let composite = stmt.as_composite().unwrap();

        assert_eq!(composite.kind(), &CompositeKind::Loop(LoopKind::For));
        assert_eq!(composite.children().len(), 3);
        assert_eq!(
            names(composite.field_accesses()),
            vec!["end", "start", "total", "step"]
        );
    }

    #[test]
    fn test_try_slots_are_separate() {
        let catch = OwnedNode::new(SyntaxKind::CatchClause, "catch (IOException e) {...}")
            .with_caught_type(TypeRef::named("java.io.IOException"))
            .with_catch_parameter("e")
            .with_body(block(vec![expr_stmt("errors")]))
            .into_ref();
        let node = OwnedNode::new(SyntaxKind::Try, "try {...}")
            .with_try_block(block(vec![expr_stmt("reads")]))
            .with_catch_clause(catch)
            .with_finally_block(block(vec![expr_stmt("closed")]))
            .into_ref();

        let body = StatementDecomposer::new().decompose_method_body(&block(vec![node]));
        let tries = body.try_statements();

        assert_eq!(tries.len(), 1);
        let try_stmt = tries[0];
        assert_eq!(try_stmt.catch_clauses().len(), 1);
        assert_eq!(try_stmt.catch_clauses()[0].parameter(), Some("e"));
        assert!(try_stmt.catch_clauses()[0].catches(&TypeRef::named("java.io.IOException")));
        assert_eq!(names(body.field_accesses()), vec!["reads"]);
        assert_eq!(names(try_stmt.handler_field_accesses()), vec!["errors", "closed"]);
        assert_eq!(names(body.all_field_accesses()), vec!["reads", "errors", "closed"]);
    }

    #[test]
    fn test_try_without_guarded_block_is_substituted() {
        let node = OwnedNode::new(SyntaxKind::Try, "try").into_ref();

        let stmt = StatementDecomposer::new().decompose(&node);
        let try_stmt = stmt.as_try().unwrap();

        assert!(try_stmt.guarded_block().is_substituted());
        assert!(try_stmt.guarded_block().children().is_empty());
        assert!(try_stmt.finally_clause().is_none());
    }

    #[test]
    fn test_unknown_kind_is_opaque_leaf() {
        let odd = OwnedNode::new(SyntaxKind::Other("yield".into()), "yield x;")
            .with_child(field_expr("hidden"))
            .into_ref();
        let body = StatementDecomposer::new().decompose_method_body(&block(vec![
            expr_stmt("a"),
            odd,
            expr_stmt("b"),
        ]));

        assert_eq!(body.statement_count(), 3);
        assert_eq!(body.unknown_statement_count(), 1);
        assert_eq!(names(body.field_accesses()), vec!["a", "b"]);
    }

    #[test]
    fn test_nesting_limit_keeps_subtree_opaque() {
        let mut node = expr_stmt("deep");
        for _ in 0..10 {
            node = block(vec![node]);
        }

        let body = StatementDecomposer::with_max_nesting(4).decompose_method_body(&node);

        assert_eq!(body.unknown_statement_count(), 1);
        assert!(body.field_accesses().is_empty());
    }

    #[test]
    fn test_non_block_body_is_wrapped() {
        let body = StatementDecomposer::new().decompose_method_body(&expr_stmt("x"));
        assert_eq!(body.root().children().len(), 1);
        assert_eq!(names(body.field_accesses()), vec!["x"]);
    }

    /// `n` nested `if (..) if (..) ... this.deepest++;`
    fn nested_ifs(n: usize) -> SyntaxRef {
        let mut node = expr_stmt("deepest");
        for _ in 0..n {
            node = OwnedNode::new(SyntaxKind::If, "if (...) ...")
                .with_then_branch(node)
                .into_ref();
        }
        node
    }

    #[test]
    fn test_default_cap_decomposes_deepest_allowed_body() {
        // innermost statement lands at depth DEFAULT_MAX_NESTING - 1
        let body =
            StatementDecomposer::new().decompose_method_body(&nested_ifs(DEFAULT_MAX_NESTING - 2));

        assert_eq!(body.unknown_statement_count(), 0);
        assert_eq!(names(body.field_accesses()), vec!["deepest"]);
    }

    #[test]
    fn test_default_cap_turns_deeper_body_opaque() {
        let body =
            StatementDecomposer::new().decompose_method_body(&nested_ifs(DEFAULT_MAX_NESTING - 1));
        assert_eq!(body.unknown_statement_count(), 1);
        assert!(body.field_accesses().is_empty());

        let body = StatementDecomposer::new().decompose_method_body(&nested_ifs(300));
        assert_eq!(body.unknown_statement_count(), 1);
    }

    /// Block node that remembers the analysis context it was read under
    #[derive(Debug, Default)]
    struct ContextRecordingBlock {
        seen: Mutex<Option<AnalysisContext>>,
    }

    impl SyntaxNode for ContextRecordingBlock {
        fn kind(&self) -> SyntaxKind {
            SyntaxKind::Block
        }

        fn children(&self) -> Vec<SyntaxRef> {
            if let Ok(mut seen) = self.seen.lock() {
                *seen = Some(get_current_context());
            }
            Vec::new()
        }

        fn text(&self) -> &str {
            "{}"
        }
    }

    #[test]
    fn test_method_body_decomposed_in_decomposition_phase() {
        let node = Arc::new(ContextRecordingBlock::default());
        let body: SyntaxRef = node.clone();

        let method = MethodEntity::builder("app.Counter", "reset")
            .body_from_syntax(&body)
            .build();

        let seen = node.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.phase, Some(AnalysisPhase::Decomposition));
        assert_eq!(seen.current_method.as_deref(), Some("app.Counter#reset"));
        assert!(method.body().is_some());
    }
}
