use enum_dispatch::enum_dispatch;

use crate::error::ReflectError;
use crate::manager::{ManagerId, ReflectionManager};
use crate::types::generics::TypeEnvironment;
use crate::types::RawType;
use crate::wrappers::class::ExtendedClass;

/// Capabilities shared by every extended-type variant.
#[enum_dispatch]
pub trait TypeView {
    /// The property type as resolved through the owning environment, before
    /// approximation.
    fn resolved(&self) -> &RawType;

    /// The approximated type the classification was made from.
    fn bound(&self) -> &RawType;

    fn environment(&self) -> &TypeEnvironment;
}

/// The closed set of type classifications a resolved property type falls
/// into. Anything else is rejected at construction with
/// [`ReflectError::UnsupportedTypeShape`](crate::error::ReflectError::UnsupportedTypeShape).
#[enum_dispatch(TypeView)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExtendedType {
    ArrayType,
    CollectionType,
    SimpleType,
}

impl ExtendedType {
    pub fn is_array(&self) -> bool {
        matches!(self, ExtendedType::ArrayType(_))
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, ExtendedType::CollectionType(_))
    }

    pub fn is_simple(&self) -> bool {
        matches!(self, ExtendedType::SimpleType(_))
    }

    /// True when approximation left no variable or wildcard in the type.
    pub fn is_fully_resolved(&self) -> bool {
        self.bound().is_fully_resolved()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrayType {
    resolved: RawType,
    bound: RawType,
    env: TypeEnvironment,
    origin: ManagerId,
}

impl ArrayType {
    pub(crate) fn new(
        resolved: RawType,
        bound: RawType,
        env: TypeEnvironment,
        origin: ManagerId,
    ) -> Self {
        Self {
            resolved,
            bound,
            env,
            origin,
        }
    }

    pub fn element(&self) -> &RawType {
        match &self.bound {
            RawType::Array(element) => element,
            // Construction guarantees an array shape.
            other => other,
        }
    }

    /// The element's class view, when the element is class-like.
    pub fn element_class(
        &self,
        manager: &ReflectionManager,
    ) -> Result<Option<ExtendedClass>, ReflectError> {
        match self.element().raw_class() {
            Some(_) => Ok(Some(manager.extended_class_in(self.element(), &self.env)?)),
            None => Ok(None),
        }
    }
}

impl TypeView for ArrayType {
    fn resolved(&self) -> &RawType {
        &self.resolved
    }

    fn bound(&self) -> &RawType {
        &self.bound
    }

    fn environment(&self) -> &TypeEnvironment {
        &self.env
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionType {
    resolved: RawType,
    bound: RawType,
    env: TypeEnvironment,
    origin: ManagerId,
}

impl CollectionType {
    pub(crate) fn new(
        resolved: RawType,
        bound: RawType,
        env: TypeEnvironment,
        origin: ManagerId,
    ) -> Self {
        Self {
            resolved,
            bound,
            env,
            origin,
        }
    }

    pub fn collection_class(&self) -> Option<crate::types::ClassDescription> {
        self.bound.raw_class()
    }

    pub fn type_args(&self) -> &[RawType] {
        match &self.bound {
            RawType::Parameterized { args, .. } => args,
            _ => &[],
        }
    }

    /// The element class: the last type argument, which is the element for
    /// list-likes and the value for map-likes.
    pub fn element_class(
        &self,
        manager: &ReflectionManager,
    ) -> Result<Option<ExtendedClass>, ReflectError> {
        match self.type_args().last() {
            Some(arg) if arg.raw_class().is_some() => {
                Ok(Some(manager.extended_class_in(arg, &self.env)?))
            }
            _ => Ok(None),
        }
    }
}

impl TypeView for CollectionType {
    fn resolved(&self) -> &RawType {
        &self.resolved
    }

    fn bound(&self) -> &RawType {
        &self.bound
    }

    fn environment(&self) -> &TypeEnvironment {
        &self.env
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimpleType {
    resolved: RawType,
    bound: RawType,
    env: TypeEnvironment,
    origin: ManagerId,
}

impl SimpleType {
    pub(crate) fn new(
        resolved: RawType,
        bound: RawType,
        env: TypeEnvironment,
        origin: ManagerId,
    ) -> Self {
        Self {
            resolved,
            bound,
            env,
            origin,
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.bound, RawType::Primitive(_))
    }

    /// The class view of the type, `None` for primitives.
    pub fn class(
        &self,
        manager: &ReflectionManager,
    ) -> Result<Option<ExtendedClass>, ReflectError> {
        match self.bound.raw_class() {
            Some(_) => Ok(Some(manager.extended_class_in(&self.bound, &self.env)?)),
            None => Ok(None),
        }
    }
}

impl TypeView for SimpleType {
    fn resolved(&self) -> &RawType {
        &self.resolved
    }

    fn bound(&self) -> &RawType {
        &self.bound
    }

    fn environment(&self) -> &TypeEnvironment {
        &self.env
    }
}
