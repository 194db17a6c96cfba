//! Annotation metadata and the pluggable provider that supplies it.
//!
//! The manager never reads annotations off the model directly; it asks its
//! [`MetadataProvider`], so a processor can layer overrides (XML mappings,
//! programmatic defaults) over the declared annotations by swapping the
//! provider in, even after first use.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use dashmap::DashMap;

use crate::model::ModelIndex;
use crate::types::{ClassDescription, ElementRef};

#[derive(Clone, Debug, PartialEq)]
pub enum AnnotationValue {
    Bool(bool),
    Int(i64),
    Str(String),
    ClassRef(ClassDescription),
}

impl From<bool> for AnnotationValue {
    fn from(v: bool) -> Self {
        AnnotationValue::Bool(v)
    }
}

impl From<i64> for AnnotationValue {
    fn from(v: i64) -> Self {
        AnnotationValue::Int(v)
    }
}

impl From<&str> for AnnotationValue {
    fn from(v: &str) -> Self {
        AnnotationValue::Str(v.to_string())
    }
}

impl From<ClassDescription> for AnnotationValue {
    fn from(v: ClassDescription) -> Self {
        AnnotationValue::ClassRef(v)
    }
}

/// A single annotation occurrence: a name plus named attribute values.
#[derive(Clone, Debug, PartialEq)]
pub struct Annotation {
    pub name: String,
    values: BTreeMap<String, AnnotationValue>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<AnnotationValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn value(&self, key: &str) -> Option<&AnnotationValue> {
        self.values.get(key)
    }
}

/// Immutable snapshot of the annotations present on one element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnnotationReader {
    annotations: Arc<[Annotation]>,
}

impl AnnotationReader {
    pub fn new(annotations: Vec<Annotation>) -> Self {
        Self {
            annotations: annotations.into(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }

    pub fn is_present(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

/// External collaborator mapping a reflective element to its raw annotation
/// values and process-wide default values.
pub trait MetadataProvider: Send + Sync {
    fn annotation_reader(&self, element: &ElementRef) -> AnnotationReader;

    fn defaults(&self) -> HashMap<String, AnnotationValue>;

    /// Drops any state the provider accumulated; called from
    /// [`ReflectionManager::reset`](crate::manager::ReflectionManager::reset).
    fn reset(&self);
}

/// Default provider: reads annotations straight off the model definitions,
/// memoizing one reader per element until reset.
pub struct StandardMetadataProvider {
    index: Arc<ModelIndex>,
    readers: DashMap<ElementRef, AnnotationReader>,
}

impl StandardMetadataProvider {
    pub fn new(index: Arc<ModelIndex>) -> Self {
        Self {
            index,
            readers: DashMap::new(),
        }
    }
}

impl MetadataProvider for StandardMetadataProvider {
    fn annotation_reader(&self, element: &ElementRef) -> AnnotationReader {
        if let Some(reader) = self.readers.get(element) {
            return reader.clone();
        }
        let annotations = match element {
            ElementRef::Class(c) => self.index.class_def(*c).annotations.clone(),
            ElementRef::Field(f) => self.index.field_def(*f).annotations.clone(),
            ElementRef::Method(m) => self.index.method_def(*m).annotations.clone(),
            ElementRef::Package(p) => self.index.package_def(*p).annotations.clone(),
        };
        let reader = AnnotationReader::new(annotations);
        self.readers.insert(*element, reader.clone());
        reader
    }

    fn defaults(&self) -> HashMap<String, AnnotationValue> {
        HashMap::new()
    }

    fn reset(&self) {
        self.readers.clear();
    }
}
