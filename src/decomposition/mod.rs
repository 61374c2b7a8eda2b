//! Statement/expression decomposition
//!
//! Turns front-end syntax nodes into the uniform composite statement tree
//! held by method entities. See [`StatementDecomposer`].

pub mod decomposer;
pub mod statement;
pub mod syntax;

pub use decomposer::{StatementDecomposer, DEFAULT_MAX_NESTING};
pub use statement::{
    AbstractExpression, CatchClause, CompositeKind, CompositeStatement, LoopKind, MethodBody,
    SimpleStatement, Statement, TryStatement, UnknownStatement,
};
pub use syntax::{same_node, OwnedNode, SyntaxKind, SyntaxNode, SyntaxRef};
