//! Reference resolution
//!
//! Binds field accesses and method invocations found in method bodies to
//! the declarations they refer to. Resolution is a pure function of the
//! frozen [`ClassRegistry`]: it walks superclass chains (and, for inner
//! classes, enclosing scopes) and answers "not found" with `None`.

use crate::model::{
    ClassEntity, ClassRegistry, FieldAccess, FieldEntity, MethodEntity, MethodInvocation,
};
use indexmap::IndexSet;
use std::iter;
use tracing::trace;

/// A field access bound to its declaration
#[derive(Debug, Clone, Copy)]
pub struct ResolvedField<'a> {
    pub declaring_class: &'a ClassEntity,
    pub field: &'a FieldEntity,
}

/// A method invocation bound to its declaration
#[derive(Debug, Clone, Copy)]
pub struct ResolvedMethod<'a> {
    pub declaring_class: &'a ClassEntity,
    pub method: &'a MethodEntity,
}

/// Stateless resolver over a frozen registry
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    registry: &'a ClassRegistry,
    search_enclosing_scopes: bool,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(registry: &'a ClassRegistry) -> Self {
        Self {
            registry,
            search_enclosing_scopes: true,
        }
    }

    /// Whether inner-class lookups continue into the enclosing classes
    pub fn with_enclosing_scopes(mut self, enabled: bool) -> Self {
        self.search_enclosing_scopes = enabled;
        self
    }

    pub fn registry(&self) -> &'a ClassRegistry {
        self.registry
    }

    /// Look for the field in `start`, then up its superclass chain
    pub fn find_field_from(
        &self,
        start: &'a ClassEntity,
        access: &FieldAccess,
    ) -> Option<ResolvedField<'a>> {
        iter::once(start)
            .chain(self.registry.superclass_chain(start))
            .find_map(|class| {
                class.get_field(access).map(|field| ResolvedField {
                    declaring_class: class,
                    field,
                })
            })
    }

    /// Look for the method in `start`, then up its superclass chain
    pub fn find_method_from(
        &self,
        start: &'a ClassEntity,
        invocation: &MethodInvocation,
    ) -> Option<ResolvedMethod<'a>> {
        iter::once(start)
            .chain(self.registry.superclass_chain(start))
            .find_map(|class| {
                class.get_method(invocation).map(|method| ResolvedMethod {
                    declaring_class: class,
                    method,
                })
            })
    }

    /// Resolve against the statically known receiver class
    pub fn resolve_field(&self, access: &FieldAccess) -> Option<ResolvedField<'a>> {
        let receiver = self.registry.get(access.owner_class()?)?;
        self.find_field_from(receiver, access)
    }

    /// Resolve against the statically known receiver class.
    ///
    /// For `super.m()` the receiver is already the superclass, so both kinds
    /// start the walk at the receiver.
    pub fn resolve_method(&self, invocation: &MethodInvocation) -> Option<ResolvedMethod<'a>> {
        let receiver = self.registry.get(invocation.receiver_class()?)?;
        self.find_method_from(receiver, invocation)
    }

    /// `context` followed by its enclosing classes, innermost first
    fn scopes(&self, context: &'a ClassEntity) -> Vec<&'a ClassEntity> {
        let mut scopes = vec![context];
        if self.search_enclosing_scopes {
            scopes.extend(self.registry.enclosing_chain(context));
        }
        scopes
    }

    /// Whether `declaring` is one of the scopes or one of their ancestors
    fn visible_from(&self, declaring: &ClassEntity, scopes: &[&'a ClassEntity]) -> bool {
        scopes.iter().copied().any(|scope| {
            iter::once(scope)
                .chain(self.registry.superclass_chain(scope))
                .any(|class| class.name() == declaring.name())
        })
    }

    /// Whether an access should be searched by name in the scopes: the
    /// receiver is unknown, or it names one of the scopes itself (an inner
    /// class reaching an outer field through an implicit receiver)
    fn scan_scopes_for(owner: Option<&str>, scopes: &[&'a ClassEntity]) -> bool {
        match owner {
            None => true,
            Some(owner) => scopes.iter().any(|scope| scope.name() == owner),
        }
    }

    /// Resolve a field access made from code inside `context`.
    ///
    /// Only declarations visible as members of `context` (its own fields,
    /// inherited fields and, for inner classes, fields of the enclosing
    /// classes) are returned. Accesses through unrelated receivers resolve
    /// to `None`.
    pub fn resolve_field_in(
        &self,
        context: &'a ClassEntity,
        access: &FieldAccess,
    ) -> Option<ResolvedField<'a>> {
        let scopes = self.scopes(context);
        let owner = access.owner_class();

        if owner.is_some_and(|owner| self.registry.contains(owner)) {
            let resolved = self
                .resolve_field(access)
                .filter(|resolved| self.visible_from(resolved.declaring_class, &scopes));
            if resolved.is_some() {
                return resolved;
            }
        }

        if Self::scan_scopes_for(owner, &scopes) {
            return scopes
                .into_iter()
                .find_map(|scope| self.find_field_from(scope, access));
        }

        trace!(field = access.name(), owner = ?owner, "field receiver outside analyzed scopes");
        None
    }

    /// Resolve a method invocation made from code inside `context`
    pub fn resolve_method_in(
        &self,
        context: &'a ClassEntity,
        invocation: &MethodInvocation,
    ) -> Option<ResolvedMethod<'a>> {
        if invocation.is_super() {
            return self
                .registry
                .superclass_chain(context)
                .find_map(|class| {
                    class.get_method(invocation).map(|method| ResolvedMethod {
                        declaring_class: class,
                        method,
                    })
                });
        }

        let scopes = self.scopes(context);
        let receiver = invocation.receiver_class();

        if receiver.is_some_and(|receiver| self.registry.contains(receiver)) {
            let resolved = self
                .resolve_method(invocation)
                .filter(|resolved| self.visible_from(resolved.declaring_class, &scopes));
            if resolved.is_some() {
                return resolved;
            }
        }

        if Self::scan_scopes_for(receiver, &scopes) {
            return scopes
                .into_iter()
                .find_map(|scope| self.find_method_from(scope, invocation));
        }

        trace!(
            method = invocation.name(),
            receiver = ?receiver,
            "call receiver outside analyzed scopes"
        );
        None
    }

    /// Every access `method` makes that is worth resolving: the guarded path
    /// plus the catch clauses and finally block of every try statement
    fn accesses_of<'m>(method: &'m MethodEntity) -> Vec<&'m FieldAccess> {
        let mut accesses: Vec<&FieldAccess> = method.field_accesses().iter().collect();
        if let Some(body) = method.body() {
            for try_stmt in body.try_statements() {
                accesses.extend(try_stmt.handler_field_accesses());
            }
        }
        accesses
    }

    fn invocations_of<'m>(method: &'m MethodEntity) -> Vec<&'m MethodInvocation> {
        let mut invocations: Vec<&MethodInvocation> = method.method_invocations().iter().collect();
        if let Some(body) = method.body() {
            for try_stmt in body.try_statements() {
                invocations.extend(try_stmt.handler_method_invocations());
            }
        }
        invocations
    }

    /// Fields of `class` (inherited and enclosing included) touched by
    /// `method`, in first-access order.
    ///
    /// The traversal covers the method's direct access list and the catch
    /// clause bodies and finally block of every try statement nested in the
    /// body. Unresolvable accesses are dropped.
    pub fn fields_accessed_inside_method(
        &self,
        class: &'a ClassEntity,
        method: &MethodEntity,
    ) -> IndexSet<&'a FieldEntity> {
        Self::accesses_of(method)
            .into_iter()
            .filter_map(|access| self.resolve_field_in(class, access))
            .map(|resolved| resolved.field)
            .collect()
    }

    /// Methods invoked by `method` that resolve to members visible from
    /// `class`, in first-call order
    pub fn methods_invoked_inside_method(
        &self,
        class: &'a ClassEntity,
        method: &MethodEntity,
    ) -> IndexSet<&'a MethodEntity> {
        Self::invocations_of(method)
            .into_iter()
            .filter_map(|invocation| self.resolve_method_in(class, invocation))
            .map(|resolved| resolved.method)
            .collect()
    }
}
