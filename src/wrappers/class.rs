use std::sync::Arc;

use crate::error::ReflectError;
use crate::manager::{ManagerId, ReflectionManager};
use crate::metadata::AnnotationReader;
use crate::types::generics::TypeEnvironment;
use crate::types::members::MemberDescription;
use crate::types::{ClassDescription, ElementRef};
use crate::wrappers::member::{getter_property_name, ExtendedMethod, ExtendedProperty};
use crate::wrappers::package::ExtendedPackage;

/// How properties of a class are discovered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyAccess {
    /// One property per declared field.
    Field,
    /// One property per no-argument `get*`/`is*` accessor method.
    Getter,
}

/// An extended view over a class: the raw class plus the environment that
/// captures what its type parameters resolved to in the wrapping context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedClass {
    inner: Arc<Inner>,
}

#[derive(Debug, PartialEq, Eq)]
struct Inner {
    class: ClassDescription,
    env: TypeEnvironment,
    origin: ManagerId,
}

impl ExtendedClass {
    pub(crate) fn new(class: ClassDescription, env: TypeEnvironment, origin: ManagerId) -> Self {
        Self {
            inner: Arc::new(Inner { class, env, origin }),
        }
    }

    pub fn class(&self) -> ClassDescription {
        self.inner.class
    }

    pub fn environment(&self) -> &TypeEnvironment {
        &self.inner.env
    }

    pub(crate) fn origin(&self) -> ManagerId {
        self.inner.origin
    }

    pub fn name<'m>(&self, manager: &'m ReflectionManager) -> &'m str {
        &manager.index().class_def(self.class()).name
    }

    /// The superclass, resolved under this wrapper's environment so inherited
    /// generic members keep their bindings.
    pub fn superclass(
        &self,
        manager: &ReflectionManager,
    ) -> Result<Option<ExtendedClass>, ReflectError> {
        match &manager.index().class_def(self.class()).superclass {
            Some(superclass) => Ok(Some(
                manager.extended_class_in(superclass, self.environment())?,
            )),
            None => Ok(None),
        }
    }

    pub fn interfaces(
        &self,
        manager: &ReflectionManager,
    ) -> Result<Vec<ExtendedClass>, ReflectError> {
        manager
            .index()
            .class_def(self.class())
            .interfaces
            .iter()
            .map(|i| manager.extended_class_in(i, self.environment()))
            .collect()
    }

    /// Properties declared directly on this class, resolved under its
    /// environment. A member declared as a type variable resolves to whatever
    /// the environment binds that variable to.
    pub fn declared_properties(
        &self,
        access: PropertyAccess,
        manager: &ReflectionManager,
    ) -> Result<Vec<ExtendedProperty>, ReflectError> {
        let index = manager.index();
        match access {
            PropertyAccess::Field => index
                .fields(self.class())
                .map(|f| manager.resolve_property(MemberDescription::Field(f), self.environment()))
                .collect(),
            PropertyAccess::Getter => index
                .methods(self.class())
                .filter(|m| {
                    let def = index.method_def(*m);
                    def.param_types.is_empty() && getter_property_name(&def.name).is_some()
                })
                .map(|m| manager.resolve_property(MemberDescription::Method(m), self.environment()))
                .collect(),
        }
    }

    pub fn declared_methods(
        &self,
        manager: &ReflectionManager,
    ) -> Result<Vec<ExtendedMethod>, ReflectError> {
        manager
            .index()
            .methods(self.class())
            .map(|m| manager.resolve_method(m, self.environment()))
            .collect()
    }

    pub fn package(&self, manager: &ReflectionManager) -> Option<ExtendedPackage> {
        manager
            .index()
            .class_def(self.class())
            .package
            .map(|p| manager.extended_package(p))
    }

    pub fn annotations(&self, manager: &ReflectionManager) -> AnnotationReader {
        manager.annotation_reader(&ElementRef::Class(self.class()))
    }
}
