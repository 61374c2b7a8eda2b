//! Type references and method signatures
//!
//! Types are identified by qualified name only. The front-end decides how far
//! it could resolve a type; anything it could not is [`TypeRef::Unknown`].

use serde::Serialize;
use std::fmt;

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double", "void",
];

/// A reference to a type as seen by the front-end
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TypeRef {
    /// Fully qualified reference type, e.g. `java.lang.String`
    Named(String),
    /// Primitive type, e.g. `int`
    Primitive(String),
    /// Array of the element type with the given number of dimensions
    Array { element: Box<TypeRef>, dimensions: u8 },
    /// Type of the `null` literal
    Null,
    /// The front-end could not determine the type
    Unknown,
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn primitive(name: impl Into<String>) -> Self {
        Self::Primitive(name.into())
    }

    pub fn array_of(element: TypeRef, dimensions: u8) -> Self {
        match element {
            Self::Array {
                element,
                dimensions: inner,
            } => Self::Array {
                element,
                dimensions: inner.saturating_add(dimensions),
            },
            other => Self::Array {
                element: Box::new(other),
                dimensions,
            },
        }
    }

    /// Parse a textual type name such as `int`, `java.util.List` or `byte[][]`.
    ///
    /// Empty input and `?` parse to [`TypeRef::Unknown`].
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == "?" {
            return Self::Unknown;
        }
        if trimmed == "null" {
            return Self::Null;
        }

        let mut base = trimmed;
        let mut dimensions = 0u8;
        while let Some(stripped) = base.strip_suffix("[]") {
            base = stripped.trim_end();
            dimensions = dimensions.saturating_add(1);
        }

        let element = if PRIMITIVES.contains(&base) {
            Self::Primitive(base.to_string())
        } else {
            Self::Named(base.to_string())
        };

        if dimensions == 0 {
            element
        } else {
            Self::array_of(element, dimensions)
        }
    }

    /// Qualified name for named types, `None` for everything else
    pub fn qualified_name(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Self::Named(_) | Self::Array { .. } | Self::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Declared-type match used when pairing a field access with a field.
    ///
    /// Types match when equal, or when either side is unknown.
    pub fn matches(&self, other: &TypeRef) -> bool {
        self.is_unknown() || other.is_unknown() || self == other
    }

    /// Whether an argument of type `self` can be passed to a parameter of
    /// type `parameter`. Beyond [`TypeRef::matches`], `null` is accepted by
    /// any reference parameter.
    pub fn is_compatible_with(&self, parameter: &TypeRef) -> bool {
        if self.matches(parameter) {
            return true;
        }
        matches!(self, Self::Null) && parameter.is_reference()
    }
}

impl From<&str> for TypeRef {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) | Self::Primitive(name) => write!(f, "{}", name),
            Self::Array {
                element,
                dimensions,
            } => {
                write!(f, "{}", element)?;
                for _ in 0..*dimensions {
                    write!(f, "[]")?;
                }
                Ok(())
            }
            Self::Null => write!(f, "null"),
            Self::Unknown => write!(f, "?"),
        }
    }
}

/// Method identity: name plus ordered parameter types
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Signature {
    pub name: String,
    pub parameter_types: Vec<TypeRef>,
}

impl Signature {
    pub fn new(name: impl Into<String>, parameter_types: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            parameter_types,
        }
    }

    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }

    /// Whether a call with the given name and argument types can bind here
    pub fn accepts(&self, name: &str, argument_types: &[TypeRef]) -> bool {
        self.name == name
            && self.parameter_types.len() == argument_types.len()
            && argument_types
                .iter()
                .zip(&self.parameter_types)
                .all(|(arg, param)| arg.is_compatible_with(param))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, param) in self.parameter_types.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")
    }
}

/// Declared access level of a class or member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Access {
    Public,
    Protected,
    #[default]
    Package,
    Private,
}
