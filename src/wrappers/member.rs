use std::sync::Arc;

use crate::error::ReflectError;
use crate::manager::{ManagerId, ReflectionManager};
use crate::metadata::AnnotationReader;
use crate::types::generics::TypeEnvironment;
use crate::types::members::{MemberDescription, MethodDescription};
use crate::types::{ElementRef, RawType};
use crate::value::{Instance, Value};
use crate::wrappers::xtype::ExtendedType;

/// Derives a bean property name from an accessor method name: `getFoo` and
/// `isFoo` both yield `foo`. Returns `None` for anything else.
pub(crate) fn getter_property_name(method_name: &str) -> Option<String> {
    let rest = method_name
        .strip_prefix("get")
        .or_else(|| method_name.strip_prefix("is"))?;
    if rest.is_empty() {
        return None;
    }
    Some(decapitalize(rest))
}

/// Bean-convention decapitalization: lowercase the first character, unless
/// the first two are both uppercase (`URL` stays `URL`).
fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first.is_uppercase() && second.is_uppercase() => {
            name.to_string()
        }
        (Some(first), _) => first.to_lowercase().chain(name.chars().skip(1)).collect(),
        (None, _) => String::new(),
    }
}

/// A property: a field or a no-argument accessor method, with its declared
/// type resolved through the owning environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedProperty {
    inner: Arc<PropertyInner>,
}

#[derive(Debug, PartialEq, Eq)]
struct PropertyInner {
    member: MemberDescription,
    resolved: RawType,
    env: TypeEnvironment,
    ty: ExtendedType,
    origin: ManagerId,
}

impl ExtendedProperty {
    pub(crate) fn create(
        member: MemberDescription,
        env: &TypeEnvironment,
        manager: &ReflectionManager,
    ) -> Result<Self, ReflectError> {
        let index = manager.index();
        let declared = match member {
            MemberDescription::Field(f) => index.field_def(f).ty.clone(),
            MemberDescription::Method(m) => index.method_def(m).return_type.clone(),
        };
        let resolved = env.bind(index, &declared);
        let ty = manager.extended_type(env, &resolved)?;
        Ok(Self {
            inner: Arc::new(PropertyInner {
                member,
                resolved,
                env: env.clone(),
                ty,
                origin: manager.id(),
            }),
        })
    }

    pub fn member(&self) -> MemberDescription {
        self.inner.member
    }

    pub fn resolved_type(&self) -> &RawType {
        &self.inner.resolved
    }

    pub fn environment(&self) -> &TypeEnvironment {
        &self.inner.env
    }

    pub fn extended_type(&self) -> &ExtendedType {
        &self.inner.ty
    }

    pub(crate) fn origin(&self) -> ManagerId {
        self.inner.origin
    }

    /// The property name: a field's own name, or the accessor method name
    /// with its `get`/`is` prefix stripped and the remainder decapitalized.
    pub fn name(&self, manager: &ReflectionManager) -> Result<String, ReflectError> {
        let index = manager.index();
        match self.inner.member {
            MemberDescription::Field(f) => Ok(index.field_def(f).name.clone()),
            MemberDescription::Method(m) => {
                let method_name = &index.method_def(m).name;
                getter_property_name(method_name)
                    .ok_or_else(|| ReflectError::NotAPropertyAccessor(method_name.clone()))
            }
        }
    }

    /// Reads this property off a target instance.
    pub fn invoke(
        &self,
        manager: &ReflectionManager,
        target: Option<&Instance>,
    ) -> Result<Value, ReflectError> {
        let name = self.name(manager)?;
        let Some(target) = target else {
            return Err(ReflectError::NullTarget(name));
        };
        read_value(manager, &name, self.inner.member.parent(), target)
    }

    /// Variadic-shaped entry point kept for callers that pass an argument
    /// list; properties take no invocation arguments.
    pub fn invoke_with(
        &self,
        manager: &ReflectionManager,
        target: Option<&Instance>,
        args: &[Value],
    ) -> Result<Value, ReflectError> {
        if !args.is_empty() {
            return Err(ReflectError::UnexpectedArguments(args.len()));
        }
        self.invoke(manager, target)
    }

    pub fn annotations(&self, manager: &ReflectionManager) -> AnnotationReader {
        manager.annotation_reader(&self.inner.member.element_ref())
    }
}

fn read_value(
    manager: &ReflectionManager,
    name: &str,
    parent: crate::types::ClassDescription,
    target: &Instance,
) -> Result<Value, ReflectError> {
    let index = manager.index();
    if !index.is_assignable(target.class(), parent) {
        return Err(ReflectError::Invocation {
            name: name.to_string(),
            source: Box::new(ReflectError::TargetTypeMismatch {
                expected: index.class_def(parent).name.clone(),
                actual: index.class_def(target.class()).name.clone(),
            }),
        });
    }
    match target.get(name) {
        Some(value) => Ok(value.clone()),
        None => Err(ReflectError::Invocation {
            name: name.to_string(),
            source: Box::new(ReflectError::MissingValue {
                member: name.to_string(),
                class: index.class_def(target.class()).name.clone(),
            }),
        }),
    }
}

/// A method with its return type resolved through the owning environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedMethod {
    inner: Arc<MethodInner>,
}

#[derive(Debug, PartialEq, Eq)]
struct MethodInner {
    method: MethodDescription,
    resolved: RawType,
    env: TypeEnvironment,
    ty: ExtendedType,
    origin: ManagerId,
}

impl ExtendedMethod {
    pub(crate) fn create(
        method: MethodDescription,
        env: &TypeEnvironment,
        manager: &ReflectionManager,
    ) -> Result<Self, ReflectError> {
        let index = manager.index();
        let declared = index.method_def(method).return_type.clone();
        let resolved = env.bind(index, &declared);
        let ty = manager.extended_type(env, &resolved)?;
        Ok(Self {
            inner: Arc::new(MethodInner {
                method,
                resolved,
                env: env.clone(),
                ty,
                origin: manager.id(),
            }),
        })
    }

    pub fn method(&self) -> MethodDescription {
        self.inner.method
    }

    pub fn name<'m>(&self, manager: &'m ReflectionManager) -> &'m str {
        &manager.index().method_def(self.inner.method).name
    }

    pub fn resolved_type(&self) -> &RawType {
        &self.inner.resolved
    }

    pub fn environment(&self) -> &TypeEnvironment {
        &self.inner.env
    }

    pub fn extended_type(&self) -> &ExtendedType {
        &self.inner.ty
    }

    pub(crate) fn origin(&self) -> ManagerId {
        self.inner.origin
    }

    /// Calls the method on a target instance. Accessor methods read the
    /// property they derive; other methods read under their own name.
    pub fn invoke(
        &self,
        manager: &ReflectionManager,
        target: Option<&Instance>,
    ) -> Result<Value, ReflectError> {
        let method_name = self.name(manager);
        let key = getter_property_name(method_name).unwrap_or_else(|| method_name.to_string());
        let Some(target) = target else {
            return Err(ReflectError::NullTarget(key));
        };
        read_value(manager, &key, self.inner.method.parent, target)
    }

    pub fn annotations(&self, manager: &ReflectionManager) -> AnnotationReader {
        manager.annotation_reader(&ElementRef::Method(self.inner.method))
    }
}
