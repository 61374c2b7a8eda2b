//! Entity model
//!
//! Classes, methods, fields and comments as built by a single builder pass
//! over a compilation unit. Entities are immutable once registered in a
//! [`ClassRegistry`].

pub mod class;
pub mod comment;
pub mod field;
pub mod method;
pub mod registry;
pub mod types;

pub use class::{ClassBuilder, ClassEntity, ClassKind};
pub use comment::{CommentEntity, CommentKind, TextSpan};
pub use field::{FieldAccess, FieldEntity};
pub use method::{Annotation, InvocationKind, MethodBuilder, MethodEntity, MethodInvocation};
pub use registry::{ChainWalk, ClassRegistry, RegistryBuilder, DEFAULT_MAX_HIERARCHY_DEPTH};
pub use types::{Access, Signature, TypeRef};
