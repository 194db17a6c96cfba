//! The factory for all extended wrappers, and the caches behind it.
//!
//! Every conversion from a raw handle to an extended wrapper goes through a
//! [`ReflectionManager`], which memoizes the result by a structural
//! (element, environment) key. The tables are concurrent maps with no outer
//! lock around the get-then-construct-then-insert sequence: two threads
//! racing on the same key may both construct, and the later insert wins.
//! The wrappers are value-equal either way, so callers must not rely on
//! reference identity, only on value equality.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use dashmap::DashMap;

use crate::error::ReflectError;
use crate::metadata::{AnnotationReader, AnnotationValue, MetadataProvider, StandardMetadataProvider};
use crate::model::ModelIndex;
use crate::types::generics::{self, TypeEnvironment};
use crate::types::members::{MemberDescription, MethodDescription};
use crate::types::switch::TypeSwitch;
use crate::types::{ClassDescription, ElementRef, PackageDescription, PrimitiveKind, RawType};
use crate::wrappers::{
    ArrayType, CollectionType, ExtendedClass, ExtendedMethod, ExtendedPackage, ExtendedProperty,
    ExtendedType, SimpleType,
};

static CACHE_DIAGNOSTICS: OnceLock<bool> = OnceLock::new();

/// Read once at startup; enables stderr notes on cache emptiness transitions.
/// Purely observational.
fn cache_diagnostics() -> bool {
    *CACHE_DIAGNOSTICS.get_or_init(|| {
        std::env::var("XREFLECT_CACHE_DIAGNOSTICS")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

static NEXT_MANAGER_ID: AtomicU64 = AtomicU64::new(0);

/// Stamp identifying the manager a wrapper came out of. Unwrap operations
/// reject wrappers stamped by a different manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ManagerId(u64);

type TypeKey = (ClassDescription, TypeEnvironment);
type MemberKey = (MemberDescription, TypeEnvironment);

/// The four memoization tables. Entries are never individually evicted; the
/// only mutation besides insert is a full clear from [`ReflectionManager::reset`].
#[derive(Default)]
struct ReflectionCaches {
    classes: DashMap<TypeKey, ExtendedClass>,
    packages: DashMap<PackageDescription, ExtendedPackage>,
    properties: DashMap<MemberKey, ExtendedProperty>,
    methods: DashMap<MemberKey, ExtendedMethod>,
}

/// Sizes of the four cache tables, for diagnostics and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub classes: usize,
    pub packages: usize,
    pub properties: usize,
    pub methods: usize,
}

impl CacheStats {
    pub fn total(&self) -> usize {
        self.classes + self.packages + self.properties + self.methods
    }
}

pub struct ReflectionManager {
    index: Arc<ModelIndex>,
    caches: ReflectionCaches,
    empty: AtomicBool,
    provider: RwLock<Option<Arc<dyn MetadataProvider>>>,
    id: ManagerId,
}

impl ReflectionManager {
    pub fn new(index: Arc<ModelIndex>) -> Self {
        Self {
            index,
            caches: ReflectionCaches::default(),
            empty: AtomicBool::new(true),
            provider: RwLock::new(None),
            id: ManagerId(NEXT_MANAGER_ID.fetch_add(1, Ordering::Relaxed)),
        }
    }

    pub fn index(&self) -> &ModelIndex {
        &self.index
    }

    pub(crate) fn id(&self) -> ManagerId {
        self.id
    }

    /// The current provider, lazily defaulting to [`StandardMetadataProvider`].
    pub fn metadata_provider(&self) -> Arc<dyn MetadataProvider> {
        if let Some(provider) = self
            .provider
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            return provider.clone();
        }
        let mut slot = self.provider.write().unwrap_or_else(PoisonError::into_inner);
        slot.get_or_insert_with(|| Arc::new(StandardMetadataProvider::new(self.index.clone())))
            .clone()
    }

    /// Takes effect immediately, even after wrappers have been handed out.
    pub fn set_metadata_provider(&self, provider: Arc<dyn MetadataProvider>) {
        *self.provider.write().unwrap_or_else(PoisonError::into_inner) = Some(provider);
    }

    /// Wraps a raw class under the identity environment.
    pub fn extended_class(&self, class: ClassDescription) -> Result<ExtendedClass, ReflectError> {
        self.extended_class_in(&RawType::Class(class), &TypeEnvironment::Identity)
    }

    /// Wraps a type handle under the identity environment. Plain and
    /// parameterized class types are accepted; anything else is an
    /// [`UnsupportedTypeShape`](ReflectError::UnsupportedTypeShape) error.
    pub fn extended_class_of(&self, t: &RawType) -> Result<ExtendedClass, ReflectError> {
        self.extended_class_in(t, &TypeEnvironment::Identity)
    }

    /// Wraps a type handle under an environment. Parameterized types are
    /// unwrapped to their raw class under a narrower environment, so the
    /// class table is only ever keyed by (raw class, environment).
    pub(crate) fn extended_class_in(
        &self,
        t: &RawType,
        env: &TypeEnvironment,
    ) -> Result<ExtendedClass, ReflectError> {
        struct WrapSwitch<'a> {
            manager: &'a ReflectionManager,
            env: &'a TypeEnvironment,
        }

        impl TypeSwitch for WrapSwitch<'_> {
            type Output = Result<ExtendedClass, ReflectError>;

            fn case_class(&mut self, class: ClassDescription) -> Self::Output {
                let key = (class, self.env.clone());
                if let Some(hit) = self.manager.caches.classes.get(&key) {
                    return Ok(hit.clone());
                }
                let wrapper = ExtendedClass::new(class, self.env.clone(), self.manager.id);
                self.manager.mark_used();
                self.manager.caches.classes.insert(key, wrapper.clone());
                Ok(wrapper)
            }

            fn case_parameterized(
                &mut self,
                raw: ClassDescription,
                args: &[RawType],
            ) -> Self::Output {
                let narrowed = generics::environment_for(self.manager.index(), raw, args, self.env)?;
                self.manager
                    .extended_class_in(&RawType::Class(raw), &narrowed)
            }

            fn default_case(&mut self, t: &RawType) -> Self::Output {
                Err(ReflectError::UnsupportedTypeShape(
                    t.show(self.manager.index()),
                ))
            }
        }

        let bound = env.bind(&self.index, t);
        WrapSwitch { manager: self, env }.dispatch(&bound)
    }

    /// Packages carry no generic context, so they are memoized by identity.
    pub fn extended_package(&self, package: PackageDescription) -> ExtendedPackage {
        if let Some(hit) = self.caches.packages.get(&package) {
            return hit.clone();
        }
        let wrapper = ExtendedPackage::new(package, self.id);
        self.mark_used();
        self.caches.packages.insert(package, wrapper.clone());
        wrapper
    }

    pub fn resolve_property(
        &self,
        member: MemberDescription,
        env: &TypeEnvironment,
    ) -> Result<ExtendedProperty, ReflectError> {
        let key = (member, env.clone());
        if let Some(hit) = self.caches.properties.get(&key) {
            return Ok(hit.clone());
        }
        let wrapper = ExtendedProperty::create(member, env, self)?;
        self.mark_used();
        self.caches.properties.insert(key, wrapper.clone());
        Ok(wrapper)
    }

    pub fn resolve_method(
        &self,
        method: MethodDescription,
        env: &TypeEnvironment,
    ) -> Result<ExtendedMethod, ReflectError> {
        let key = (MemberDescription::Method(method), env.clone());
        if let Some(hit) = self.caches.methods.get(&key) {
            return Ok(hit.clone());
        }
        let wrapper = ExtendedMethod::create(method, env, self)?;
        self.mark_used();
        self.caches.methods.insert(key, wrapper.clone());
        Ok(wrapper)
    }

    /// Binds `ty` through the approximating variant of `env` and classifies
    /// the result into exactly one of array, collection-like, or simple.
    pub fn extended_type(
        &self,
        env: &TypeEnvironment,
        ty: &RawType,
    ) -> Result<ExtendedType, ReflectError> {
        let bound = generics::approximating(env).bind(&self.index, ty);
        if bound.is_array() {
            return Ok(ArrayType::new(ty.clone(), bound, env.clone(), self.id).into());
        }
        if let Some(class) = bound.raw_class() {
            if self.index.is_collection_like(class) {
                return Ok(CollectionType::new(ty.clone(), bound, env.clone(), self.id).into());
            }
            return Ok(SimpleType::new(ty.clone(), bound, env.clone(), self.id).into());
        }
        if matches!(bound, RawType::Primitive(p) if p != PrimitiveKind::Void) {
            return Ok(SimpleType::new(ty.clone(), bound, env.clone(), self.id).into());
        }
        Err(ReflectError::UnsupportedTypeShape(bound.show(&self.index)))
    }

    /// The environment a type handle carries on its own: bindings for a
    /// parameterized type, identity for everything else.
    pub fn environment_of(&self, t: &RawType) -> Result<TypeEnvironment, ReflectError> {
        struct EnvSwitch<'a> {
            manager: &'a ReflectionManager,
        }

        impl TypeSwitch for EnvSwitch<'_> {
            type Output = Result<TypeEnvironment, ReflectError>;

            fn case_class(&mut self, class: ClassDescription) -> Self::Output {
                Ok(generics::environment_for_class(class))
            }

            fn case_parameterized(
                &mut self,
                raw: ClassDescription,
                args: &[RawType],
            ) -> Self::Output {
                generics::environment_for(self.manager.index(), raw, args, &TypeEnvironment::Identity)
            }

            fn default_case(&mut self, _t: &RawType) -> Self::Output {
                Ok(TypeEnvironment::Identity)
            }
        }

        EnvSwitch { manager: self }.dispatch(t)
    }

    pub fn raw_class(&self, wrapper: &ExtendedClass) -> Result<ClassDescription, ReflectError> {
        if wrapper.origin() != self.id {
            return Err(ReflectError::ForeignWrapper);
        }
        Ok(wrapper.class())
    }

    pub fn raw_method(&self, wrapper: &ExtendedMethod) -> Result<MethodDescription, ReflectError> {
        if wrapper.origin() != self.id {
            return Err(ReflectError::ForeignWrapper);
        }
        Ok(wrapper.method())
    }

    /// Null-safe structural comparison between a wrapper and a raw class.
    pub fn class_eq(
        &self,
        wrapper: Option<&ExtendedClass>,
        class: Option<ClassDescription>,
    ) -> bool {
        match (wrapper, class) {
            (None, class) => class.is_none(),
            (Some(w), Some(c)) => w.class() == c,
            (Some(_), None) => false,
        }
    }

    pub fn annotation_reader(&self, element: &ElementRef) -> AnnotationReader {
        self.metadata_provider().annotation_reader(element)
    }

    pub fn defaults(&self) -> HashMap<String, AnnotationValue> {
        self.metadata_provider().defaults()
    }

    /// Clears all four tables if anything was cached, and resets the provider
    /// if one was ever installed. Safe to call at any time, including before
    /// first use and concurrently with in-flight lookups; a lookup racing the
    /// clear may still observe a pre-reset entry.
    pub fn reset(&self) {
        let was_empty = self.empty.swap(true, Ordering::AcqRel);
        if !was_empty {
            self.caches.classes.clear();
            self.caches.packages.clear();
            self.caches.properties.clear();
            self.caches.methods.clear();
            if cache_diagnostics() {
                eprintln!("xreflect: metadata caches cleared");
            }
        }
        let provider = self
            .provider
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(provider) = provider {
            provider.reset();
        }
    }

    fn mark_used(&self) {
        let was_empty = self.empty.swap(false, Ordering::AcqRel);
        if was_empty && cache_diagnostics() {
            eprintln!("xreflect: metadata caches now in use");
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            classes: self.caches.classes.len(),
            packages: self.caches.packages.len(),
            properties: self.caches.properties.len(),
            methods: self.caches.methods.len(),
        }
    }

    /// True iff nothing has been cached since construction or the last reset.
    pub fn is_empty(&self) -> bool {
        self.empty.load(Ordering::Acquire)
    }

    /// Whether a class wrapper is currently cached under `(class, env)`.
    /// Observational; mainly useful for tests and diagnostics.
    pub fn contains_class_key(
        &self,
        class: ClassDescription,
        env: &TypeEnvironment,
    ) -> bool {
        self.caches.classes.contains_key(&(class, env.clone()))
    }
}
