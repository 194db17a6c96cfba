//! Descriptions of reflective elements and the raw type-handle shapes.
//!
//! A description is a cheap `Copy` handle into a [`ModelIndex`](crate::model::ModelIndex);
//! it carries no metadata of its own. Equality and hashing are by index identity,
//! which is what the manager's cache keys rely on.

use crate::model::ModelIndex;
use crate::types::members::{FieldDescription, MethodDescription};

pub mod generics;
pub mod members;
pub mod switch;

#[cfg(test)]
mod generics_tests;

/// Handle to a class definition in a model index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassDescription(pub(crate) u32);

/// Handle to a package definition in a model index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PackageDescription(pub(crate) u32);

/// A generic type variable, identified by its declaring class and name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeVariable {
    pub declared_by: ClassDescription,
    pub name: String,
}

impl TypeVariable {
    pub fn new(declared_by: ClassDescription, name: impl Into<String>) -> Self {
        Self {
            declared_by,
            name: name.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Int32,
    Int64,
    Float64,
    Char,
    Void,
}

impl PrimitiveKind {
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "boolean",
            PrimitiveKind::Int32 => "int",
            PrimitiveKind::Int64 => "long",
            PrimitiveKind::Float64 => "double",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Void => "void",
        }
    }
}

/// A raw type handle: the closed set of type shapes the host model can produce.
///
/// This is the domain of the [`TypeSwitch`](switch::TypeSwitch) and of
/// [`TypeEnvironment::bind`](generics::TypeEnvironment::bind).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RawType {
    Class(ClassDescription),
    Parameterized {
        raw: ClassDescription,
        args: Vec<RawType>,
    },
    Variable(TypeVariable),
    Array(Box<RawType>),
    Wildcard {
        upper: Option<Box<RawType>>,
    },
    Primitive(PrimitiveKind),
}

impl RawType {
    pub fn parameterized(raw: ClassDescription, args: Vec<RawType>) -> Self {
        RawType::Parameterized { raw, args }
    }

    pub fn array(element: RawType) -> Self {
        RawType::Array(Box::new(element))
    }

    pub fn variable(declared_by: ClassDescription, name: impl Into<String>) -> Self {
        RawType::Variable(TypeVariable::new(declared_by, name))
    }

    /// The underlying class of a plain or parameterized type.
    pub fn raw_class(&self) -> Option<ClassDescription> {
        match self {
            RawType::Class(c) | RawType::Parameterized { raw: c, .. } => Some(*c),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, RawType::Array(_))
    }

    /// True when no type variable or wildcard occurs anywhere in the shape.
    pub fn is_fully_resolved(&self) -> bool {
        match self {
            RawType::Class(_) | RawType::Primitive(_) => true,
            RawType::Variable(_) | RawType::Wildcard { .. } => false,
            RawType::Parameterized { args, .. } => args.iter().all(RawType::is_fully_resolved),
            RawType::Array(element) => element.is_fully_resolved(),
        }
    }

    pub fn show(&self, index: &ModelIndex) -> String {
        match self {
            RawType::Class(c) => index.class_def(*c).name.clone(),
            RawType::Parameterized { raw, args } => {
                let args = args
                    .iter()
                    .map(|a| a.show(index))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}<{}>", index.class_def(*raw).name, args)
            }
            RawType::Variable(v) => v.name.clone(),
            RawType::Array(element) => format!("{}[]", element.show(index)),
            RawType::Wildcard { upper: Some(b) } => format!("? extends {}", b.show(index)),
            RawType::Wildcard { upper: None } => "?".to_string(),
            RawType::Primitive(p) => p.name().to_string(),
        }
    }
}

/// An annotated element handed to a [`MetadataProvider`](crate::metadata::MetadataProvider).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementRef {
    Class(ClassDescription),
    Field(FieldDescription),
    Method(MethodDescription),
    Package(PackageDescription),
}
