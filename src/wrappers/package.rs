use std::sync::Arc;

use crate::manager::{ManagerId, ReflectionManager};
use crate::metadata::AnnotationReader;
use crate::types::{ElementRef, PackageDescription};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedPackage {
    inner: Arc<PackageInner>,
}

#[derive(Debug, PartialEq, Eq)]
struct PackageInner {
    package: PackageDescription,
    origin: ManagerId,
}

impl ExtendedPackage {
    pub(crate) fn new(package: PackageDescription, origin: ManagerId) -> Self {
        Self {
            inner: Arc::new(PackageInner { package, origin }),
        }
    }

    pub fn package(&self) -> PackageDescription {
        self.inner.package
    }

    pub fn name<'m>(&self, manager: &'m ReflectionManager) -> &'m str {
        &manager.index().package_def(self.package()).name
    }

    pub fn annotations(&self, manager: &ReflectionManager) -> AnnotationReader {
        manager.annotation_reader(&ElementRef::Package(self.package()))
    }
}
