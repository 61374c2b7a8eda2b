//! Superclass-chain lookups and test-case detection over a frozen registry

use cohesionmap::model::ClassRegistry;
use cohesionmap::testkit::helpers::{block, call_stmt, int_field, method_touching};
use cohesionmap::{
    ClassEntity, FieldAccess, MethodEntity, MethodInvocation, ReferenceResolver, RegistryBuilder,
    TypeRef,
};

fn registry_of(classes: Vec<ClassEntity>) -> ClassRegistry {
    let builder = RegistryBuilder::new();
    builder.register_all(classes).unwrap();
    builder.freeze()
}

fn class_extending(name: &str, superclass: &str) -> ClassEntity {
    ClassEntity::builder(name).superclass(superclass).build()
}

fn int_access(owner: &str, name: &str) -> FieldAccess {
    FieldAccess::new(owner, name, TypeRef::primitive("int"))
}

#[test]
fn test_extends_test_case_directly() {
    let registry = registry_of(vec![class_extending("app.FooTest", "junit.framework.TestCase")]);
    let foo = registry.get("app.FooTest").unwrap();

    assert!(foo.extends_test_case(&registry));
    assert!(foo.is_test_related(&registry));
}

#[test]
fn test_extends_test_case_through_registered_base() {
    let registry = registry_of(vec![
        class_extending("app.AbstractSuite", "junit.framework.TestCase"),
        class_extending("app.DbSuite", "app.AbstractSuite"),
        class_extending("app.OrderDbTest", "app.DbSuite"),
    ]);

    let order = registry.get("app.OrderDbTest").unwrap();
    assert!(order.extends_test_case(&registry));
}

#[test]
fn test_unrelated_hierarchy_is_not_a_test_case() {
    let registry = registry_of(vec![
        class_extending("app.Base", "java.lang.Object"),
        class_extending("app.Widget", "app.Base"),
        ClassEntity::builder("app.Plain").build(),
    ]);

    assert!(!registry.get("app.Widget").unwrap().extends_test_case(&registry));
    assert!(!registry.get("app.Plain").unwrap().extends_test_case(&registry));
}

#[test]
fn test_chain_broken_by_unregistered_class() {
    // app.Missing would extend TestCase, but it was never registered
    let registry = registry_of(vec![class_extending("app.OrphanTest", "app.Missing")]);

    assert!(!registry.get("app.OrphanTest").unwrap().extends_test_case(&registry));
}

#[test]
fn test_cyclic_hierarchy_terminates() {
    let registry = registry_of(vec![
        class_extending("app.A", "app.B"),
        class_extending("app.B", "app.A"),
    ]);
    let a = registry.get("app.A").unwrap();

    assert!(!a.extends_test_case(&registry));
    assert!(a.find_field(&int_access("app.A", "nowhere"), &registry).is_none());
}

#[test]
fn test_inherited_field_resolves_to_declaring_class() {
    let base = ClassEntity::builder("app.Shape")
        .with_field(int_field("app.Shape", "area"))
        .build();
    let middle = class_extending("app.Polygon", "app.Shape");
    let square = ClassEntity::builder("app.Square")
        .superclass("app.Polygon")
        .with_field(int_field("app.Square", "side"))
        .build();
    let registry = registry_of(vec![base, middle, square]);
    let square = registry.get("app.Square").unwrap();

    let side = square.find_field(&int_access("app.Square", "side"), &registry).unwrap();
    assert_eq!(side.class_name(), "app.Square");

    let area = square.find_field(&int_access("app.Square", "area"), &registry).unwrap();
    assert_eq!(area.qualified_name(), "app.Shape.area");

    // Same name, different declared type
    let wrong_type = FieldAccess::new("app.Square", "area", TypeRef::named("java.lang.String"));
    assert!(square.find_field(&wrong_type, &registry).is_none());
}

#[test]
fn test_inherited_field_counts_in_accessed_fields() {
    let base = ClassEntity::builder("app.Shape")
        .with_field(int_field("app.Shape", "area"))
        .build();
    let circle = ClassEntity::builder("app.Circle")
        .superclass("app.Shape")
        .with_field(int_field("app.Circle", "radius"))
        .with_method(method_touching("app.Circle", "grow", &["radius", "area"]))
        .build();
    let registry = registry_of(vec![base, circle]);
    let circle = registry.get("app.Circle").unwrap();

    let accessed: Vec<String> = circle
        .fields_accessed_inside_method(&circle.methods()[0], &registry)
        .into_iter()
        .map(|field| field.qualified_name())
        .collect();
    assert_eq!(accessed, vec!["app.Circle.radius", "app.Shape.area"]);
}

#[test]
fn test_method_lookup_prefers_nearest_declaration() {
    let base = ClassEntity::builder("app.Base")
        .with_method(MethodEntity::builder("app.Base", "describe").build())
        .with_method(MethodEntity::builder("app.Base", "reset").build())
        .build();
    let child = ClassEntity::builder("app.Child")
        .superclass("app.Base")
        .with_method(
            MethodEntity::builder("app.Child", "describe")
                .body_from_syntax(&block(vec![call_stmt("app.Base", "reset")]))
                .build(),
        )
        .build();
    let registry = registry_of(vec![base, child]);
    let child = registry.get("app.Child").unwrap();

    let describe = MethodInvocation::new("app.Child", "describe", vec![]);
    assert_eq!(child.find_method(&describe, &registry).unwrap().class_name(), "app.Child");

    let super_describe = MethodInvocation::super_call("app.Base", "describe", vec![]);
    assert_eq!(
        child.get_super_method(&super_describe, &registry).unwrap().class_name(),
        "app.Base"
    );

    let reset = MethodInvocation::new("app.Child", "reset", vec![]);
    assert!(child.get_method(&reset).is_none());
    assert_eq!(child.find_method(&reset, &registry).unwrap().class_name(), "app.Base");
}

#[test]
fn test_resolver_reports_invoked_methods() {
    let base = ClassEntity::builder("app.Base")
        .with_method(MethodEntity::builder("app.Base", "reset").build())
        .build();
    let child = ClassEntity::builder("app.Child")
        .superclass("app.Base")
        .with_method(
            MethodEntity::builder("app.Child", "restart")
                .body_from_syntax(&block(vec![
                    call_stmt("app.Child", "reset"),
                    call_stmt("java.io.PrintStream", "println"),
                ]))
                .build(),
        )
        .build();
    let registry = registry_of(vec![base, child]);
    let child = registry.get("app.Child").unwrap();
    let resolver = ReferenceResolver::new(&registry);

    let invoked = resolver.methods_invoked_inside_method(child, &child.methods()[0]);

    assert_eq!(invoked.len(), 1);
    assert_eq!(invoked[0].qualified_signature(), "app.Base#reset()");
}
