//! The extended wrapper family: immutable, cached, annotation-capable views
//! over reflective elements.
//!
//! Wrappers are value-like: two wrappers are equal iff they view the same
//! element under the same environment and came out of the same manager.
//! Operations that need further resolution take the owning
//! [`ReflectionManager`](crate::manager::ReflectionManager) explicitly.

mod class;
mod member;
mod package;
mod xtype;

#[cfg(test)]
mod member_tests;

pub use class::{ExtendedClass, PropertyAccess};
pub use member::{ExtendedMethod, ExtendedProperty};
pub use package::ExtendedPackage;
pub use xtype::{ArrayType, CollectionType, ExtendedType, SimpleType, TypeView};
