//! The modeled introspection surface.
//!
//! Rust has no runtime reflection, so the "reflective elements" this crate
//! wraps are explicit metadata definitions owned by a [`ModelIndex`]. A
//! [`ModelBuilder`] interns class and package handles before their
//! definitions are supplied, so definitions can reference each other freely,
//! including a type parameter bounded by an expression naming itself.
//!
//! The index is the analogue of an assembly loader: immutable once built,
//! shared behind an `Arc`, and consulted by every description handle.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ReflectError;
use crate::metadata::Annotation;
use crate::types::members::{FieldDescription, MethodDescription};
use crate::types::{ClassDescription, PackageDescription, RawType, TypeVariable};

/// A declared generic type parameter. The first bound is the primary one used
/// by approximation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParam {
    pub name: String,
    pub bounds: Vec<RawType>,
}

impl TypeParam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn with_bound(mut self, bound: RawType) -> Self {
        self.bounds.push(bound);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub ty: RawType,
    pub annotations: Vec<Annotation>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: RawType) -> Self {
        Self {
            name: name.into(),
            ty,
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodDef {
    pub name: String,
    pub return_type: RawType,
    pub param_types: Vec<RawType>,
    pub annotations: Vec<Annotation>,
}

impl MethodDef {
    pub fn new(name: impl Into<String>, return_type: RawType) -> Self {
        Self {
            name: name.into(),
            return_type,
            param_types: Vec::new(),
            annotations: Vec::new(),
        }
    }

    pub fn with_param(mut self, ty: RawType) -> Self {
        self.param_types.push(ty);
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassDef {
    pub name: String,
    pub package: Option<PackageDescription>,
    pub type_params: Vec<TypeParam>,
    pub superclass: Option<RawType>,
    pub interfaces: Vec<RawType>,
    pub fields: Vec<FieldDef>,
    pub methods: Vec<MethodDef>,
    pub annotations: Vec<Annotation>,
    /// True when this class is itself a collection contract; collection-
    /// likeness of any other class means assignability to such a contract.
    pub collection_like: bool,
}

impl ClassDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            package: None,
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            annotations: Vec::new(),
            collection_like: false,
        }
    }

    pub fn in_package(mut self, package: PackageDescription) -> Self {
        self.package = Some(package);
        self
    }

    pub fn with_type_param(mut self, param: TypeParam) -> Self {
        self.type_params.push(param);
        self
    }

    pub fn extending(mut self, superclass: RawType) -> Self {
        self.superclass = Some(superclass);
        self
    }

    pub fn implementing(mut self, interface: RawType) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: MethodDef) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn as_collection(mut self) -> Self {
        self.collection_like = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PackageDef {
    pub name: String,
    pub annotations: Vec<Annotation>,
}

impl PackageDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// Builder that mints description handles up front and collects definitions.
#[derive(Default)]
pub struct ModelBuilder {
    classes: Vec<Option<ClassDef>>,
    class_names: Vec<String>,
    by_name: HashMap<String, ClassDescription>,
    packages: Vec<PackageDef>,
    packages_by_name: HashMap<String, PackageDescription>,
    object_class: Option<ClassDescription>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a class handle by name without defining it; idempotent.
    pub fn declare_class(&mut self, name: &str) -> ClassDescription {
        if let Some(existing) = self.by_name.get(name) {
            return *existing;
        }
        let class = ClassDescription(self.classes.len() as u32);
        self.classes.push(None);
        self.class_names.push(name.to_string());
        self.by_name.insert(name.to_string(), class);
        class
    }

    pub fn define_class(&mut self, class: ClassDescription, def: ClassDef) {
        self.classes[class.0 as usize] = Some(def);
    }

    /// Declares and defines in one step, for classes with no forward references.
    pub fn add_class(&mut self, def: ClassDef) -> ClassDescription {
        let class = self.declare_class(&def.name);
        self.define_class(class, def);
        class
    }

    pub fn add_package(&mut self, def: PackageDef) -> PackageDescription {
        if let Some(existing) = self.packages_by_name.get(&def.name) {
            return *existing;
        }
        let package = PackageDescription(self.packages.len() as u32);
        self.packages_by_name.insert(def.name.clone(), package);
        self.packages.push(def);
        package
    }

    /// Designates the root class every unbounded type variable widens to.
    pub fn object_class(&mut self, class: ClassDescription) {
        self.object_class = Some(class);
    }

    pub fn build(self) -> Result<Arc<ModelIndex>, ReflectError> {
        let mut classes = Vec::with_capacity(self.classes.len());
        for (def, name) in self.classes.into_iter().zip(&self.class_names) {
            match def {
                Some(def) => classes.push(def),
                None => return Err(ReflectError::UndefinedClass(name.clone())),
            }
        }
        Ok(Arc::new(ModelIndex {
            classes,
            packages: self.packages,
            by_name: self.by_name,
            object_class: self.object_class,
        }))
    }
}

/// The immutable class graph every description handle points into.
#[derive(Debug)]
pub struct ModelIndex {
    classes: Vec<ClassDef>,
    packages: Vec<PackageDef>,
    by_name: HashMap<String, ClassDescription>,
    object_class: Option<ClassDescription>,
}

impl ModelIndex {
    pub fn class_def(&self, class: ClassDescription) -> &ClassDef {
        &self.classes[class.0 as usize]
    }

    pub fn package_def(&self, package: PackageDescription) -> &PackageDef {
        &self.packages[package.0 as usize]
    }

    pub fn field_def(&self, field: FieldDescription) -> &FieldDef {
        &self.class_def(field.parent).fields[field.index as usize]
    }

    pub fn method_def(&self, method: MethodDescription) -> &MethodDef {
        &self.class_def(method.parent).methods[method.index as usize]
    }

    pub fn class_by_name(&self, name: &str) -> Option<ClassDescription> {
        self.by_name.get(name).copied()
    }

    pub fn object_class(&self) -> Option<ClassDescription> {
        self.object_class
    }

    pub fn fields(&self, class: ClassDescription) -> impl Iterator<Item = FieldDescription> + '_ {
        (0..self.class_def(class).fields.len() as u32)
            .map(move |index| FieldDescription { parent: class, index })
    }

    pub fn methods(&self, class: ClassDescription) -> impl Iterator<Item = MethodDescription> + '_ {
        (0..self.class_def(class).methods.len() as u32)
            .map(move |index| MethodDescription { parent: class, index })
    }

    pub fn type_param(&self, variable: &TypeVariable) -> Option<&TypeParam> {
        self.class_def(variable.declared_by)
            .type_params
            .iter()
            .find(|p| p.name == variable.name)
    }

    /// The primary (first declared) upper bound of a type variable.
    pub fn primary_bound(&self, variable: &TypeVariable) -> Option<&RawType> {
        self.type_param(variable).and_then(|p| p.bounds.first())
    }

    /// All ancestors of a class, superclasses and interfaces, breadth first.
    pub fn ancestors(&self, class: ClassDescription) -> Vec<ClassDescription> {
        let mut seen = vec![class];
        let mut queue = vec![class];
        let mut out = Vec::new();
        while let Some(current) = queue.pop() {
            let def = self.class_def(current);
            let supers = def.superclass.iter().chain(def.interfaces.iter());
            for ancestor in supers.filter_map(RawType::raw_class) {
                if !seen.contains(&ancestor) {
                    seen.push(ancestor);
                    queue.push(ancestor);
                    out.push(ancestor);
                }
            }
        }
        out
    }

    /// True when the class, or any ancestor, is a collection contract.
    pub fn is_collection_like(&self, class: ClassDescription) -> bool {
        self.class_def(class).collection_like
            || self
                .ancestors(class)
                .iter()
                .any(|a| self.class_def(*a).collection_like)
    }

    pub fn is_assignable(&self, from: ClassDescription, to: ClassDescription) -> bool {
        from == to || self.ancestors(from).contains(&to)
    }
}
