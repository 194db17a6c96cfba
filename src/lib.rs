//! Cache-backed metadata reflection over an explicit class model.
//!
//! A host registers its classes, members, and annotations through
//! [`ModelBuilder`], then asks a [`ReflectionManager`] for extended wrappers:
//! annotation-capable views whose generic type information has been resolved
//! through a [`TypeEnvironment`](types::generics::TypeEnvironment). Wrapper
//! construction is memoized per (element, environment) key, so repeated
//! lookups during metadata processing stay cheap.

pub mod error;
pub mod manager;
pub mod metadata;
pub mod model;
pub mod types;
pub mod value;
pub mod wrappers;

pub use error::ReflectError;
pub use manager::{CacheStats, ReflectionManager};
pub use metadata::{
    Annotation, AnnotationReader, AnnotationValue, MetadataProvider, StandardMetadataProvider,
};
pub use model::{ClassDef, FieldDef, MethodDef, ModelBuilder, ModelIndex, PackageDef, TypeParam};
pub use types::generics::TypeEnvironment;
pub use types::members::{FieldDescription, MemberDescription, MethodDescription};
pub use types::switch::TypeSwitch;
pub use types::{
    ClassDescription, ElementRef, PackageDescription, PrimitiveKind, RawType, TypeVariable,
};
pub use value::{Instance, Value};
pub use wrappers::{
    ArrayType, CollectionType, ExtendedClass, ExtendedMethod, ExtendedPackage, ExtendedProperty,
    ExtendedType, PropertyAccess, SimpleType, TypeView,
};
