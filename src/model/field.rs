use super::types::{Access, TypeRef};
use serde::Serialize;

/// A field declared by a class
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldEntity {
    class_name: String,
    name: String,
    field_type: TypeRef,
    access: Access,
    is_static: bool,
}

impl FieldEntity {
    pub fn new(
        class_name: impl Into<String>,
        name: impl Into<String>,
        field_type: TypeRef,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            name: name.into(),
            field_type,
            access: Access::Private,
            is_static: false,
        }
    }

    pub fn with_access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Qualified name of the declaring class
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &TypeRef {
        &self.field_type
    }

    pub fn access(&self) -> Access {
        self.access
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// `pkg.Class.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.class_name, self.name)
    }

    /// A declaration matches an access when the names are equal and the
    /// declared type matches the type the front-end saw at the access site.
    /// The receiver class is not compared: the caller decides which classes
    /// to search.
    pub fn matches_access(&self, access: &FieldAccess) -> bool {
        self.name == access.name && self.field_type.matches(&access.field_type)
    }
}

/// A read or write of a field found inside a method body
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FieldAccess {
    owner_class: String,
    name: String,
    field_type: TypeRef,
}

impl FieldAccess {
    /// `owner_class` is the statically known receiver type; pass an empty
    /// string when the front-end could not determine it.
    pub fn new(
        owner_class: impl Into<String>,
        name: impl Into<String>,
        field_type: TypeRef,
    ) -> Self {
        Self {
            owner_class: owner_class.into(),
            name: name.into(),
            field_type,
        }
    }

    pub fn owner_class(&self) -> Option<&str> {
        if self.owner_class.is_empty() {
            None
        } else {
            Some(&self.owner_class)
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &TypeRef {
        &self.field_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_uses_name_and_type() {
        let field = FieldEntity::new("a.B", "count", TypeRef::primitive("int"));

        assert!(field.matches_access(&FieldAccess::new("a.B", "count", TypeRef::primitive("int"))));
        assert!(field.matches_access(&FieldAccess::new("a.Sub", "count", TypeRef::Unknown)));
        let long_count = FieldAccess::new("a.B", "count", TypeRef::primitive("long"));
        assert!(!field.matches_access(&long_count));
        let total = FieldAccess::new("a.B", "total", TypeRef::primitive("int"));
        assert!(!field.matches_access(&total));
    }

    #[test]
    fn test_empty_owner_is_none() {
        let access = FieldAccess::new("", "x", TypeRef::Unknown);
        assert_eq!(access.owner_class(), None);
        assert_eq!(
            FieldEntity::new("a.B", "x", TypeRef::Unknown).qualified_name(),
            "a.B.x"
        );
    }
}
