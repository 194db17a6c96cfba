//! Type environments: immutable bindings from generic type variables to the
//! types they resolve to in a particular wrapping context.
//!
//! An environment is half of every cache key in the
//! [`ReflectionManager`](crate::manager::ReflectionManager), so equality and
//! hashing are structural over the whole binding chain. `Box<String>` and
//! `Box<i64>` reflect the same raw class under two non-equal environments and
//! therefore produce two distinct cache entries.

use std::sync::Arc;

use crate::error::ReflectError;
use crate::model::ModelIndex;
use crate::types::{ClassDescription, RawType, TypeVariable};

/// An immutable substitution from type variables to types.
///
/// `Identity` binds nothing. `Scope` layers the bindings of one parameterized
/// type over an enclosing environment. `Approximating` widens variables that
/// remain unresolved after substitution to their declared upper bounds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum TypeEnvironment {
    #[default]
    Identity,
    Scope(Arc<Scope>),
    Approximating(Arc<TypeEnvironment>),
}

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Scope {
    bindings: Vec<(TypeVariable, RawType)>,
    parent: TypeEnvironment,
}

impl TypeEnvironment {
    pub fn identity() -> Self {
        TypeEnvironment::Identity
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, TypeEnvironment::Identity)
    }

    /// Substitutes type variables in `t` according to this environment.
    ///
    /// A variable bound in a scope is replaced by its binding, re-binding
    /// through that scope's own mapping at most `bindings.len()` times when
    /// the binding is itself a variable defined there. A variable this
    /// environment does not bind is handed to the enclosing environment, and
    /// comes back unchanged from the identity environment. Non-variable
    /// shapes are rebuilt structurally.
    pub fn bind(&self, index: &ModelIndex, t: &RawType) -> RawType {
        match self {
            TypeEnvironment::Identity => t.clone(),
            TypeEnvironment::Scope(scope) => scope.bind(index, t),
            TypeEnvironment::Approximating(inner) => {
                let bound = inner.bind(index, t);
                approximate(index, bound, &mut Vec::new())
            }
        }
    }
}

impl Scope {
    fn lookup(&self, v: &TypeVariable) -> Option<&RawType> {
        self.bindings
            .iter()
            .find(|(var, _)| var == v)
            .map(|(_, t)| t)
    }

    fn bind(&self, index: &ModelIndex, t: &RawType) -> RawType {
        match t {
            RawType::Variable(v) => match self.lookup(v) {
                Some(bound) => {
                    let mut current = bound.clone();
                    // A binding may name another variable of this same scope;
                    // the chain is no longer than the mapping itself.
                    for _ in 0..self.bindings.len() {
                        let next = match &current {
                            RawType::Variable(inner) => self.lookup(inner),
                            _ => None,
                        };
                        match next {
                            Some(n) => current = n.clone(),
                            None => break,
                        }
                    }
                    current
                }
                None => self.parent.bind(index, t),
            },
            RawType::Parameterized { raw, args } => RawType::Parameterized {
                raw: *raw,
                args: args.iter().map(|a| self.bind(index, a)).collect(),
            },
            RawType::Array(element) => RawType::array(self.bind(index, element)),
            RawType::Wildcard { upper } => RawType::Wildcard {
                upper: upper
                    .as_ref()
                    .map(|b| Box::new(self.bind(index, b))),
            },
            RawType::Class(_) | RawType::Primitive(_) => t.clone(),
        }
    }
}

/// The environment of a raw (non-parameterized) class: identity, since a raw
/// class carries no variable bindings of its own.
pub fn environment_for_class(_class: ClassDescription) -> TypeEnvironment {
    TypeEnvironment::Identity
}

/// Builds the environment of a parameterized type, layered over `enclosing`.
///
/// Each declared type-parameter slot of `raw` is bound to the corresponding
/// actual argument, after that argument has itself been resolved through the
/// enclosing environment so that nested generics compose. Lookups for
/// variables this scope does not bind fall back to `enclosing`.
pub fn environment_for(
    index: &ModelIndex,
    raw: ClassDescription,
    args: &[RawType],
    enclosing: &TypeEnvironment,
) -> Result<TypeEnvironment, ReflectError> {
    let def = index.class_def(raw);
    if def.type_params.len() != args.len() {
        return Err(ReflectError::GenericArity {
            class: def.name.clone(),
            expected: def.type_params.len(),
            actual: args.len(),
        });
    }
    let bindings = def
        .type_params
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            (
                TypeVariable::new(raw, param.name.clone()),
                enclosing.bind(index, arg),
            )
        })
        .collect();
    Ok(TypeEnvironment::Scope(Arc::new(Scope {
        bindings,
        parent: enclosing.clone(),
    })))
}

/// Wraps an environment so that variables left unresolved by substitution are
/// widened to their declared upper bounds, for callers that need a concrete
/// enough type to classify (array / collection / simple) and cannot tolerate
/// an unresolved variable.
pub fn approximating(env: &TypeEnvironment) -> TypeEnvironment {
    match env {
        TypeEnvironment::Approximating(_) => env.clone(),
        other => TypeEnvironment::Approximating(Arc::new(other.clone())),
    }
}

/// Widens unresolved variables to their primary (first declared) bound.
///
/// `seen` guards self-referential bounds such as `T: Comparable<T>`: a
/// variable revisited while its own bound is being widened is cut down to the
/// bound's raw class, so substitution depth is capped by the number of
/// distinct variables in play.
fn approximate(index: &ModelIndex, t: RawType, seen: &mut Vec<TypeVariable>) -> RawType {
    match t {
        RawType::Variable(v) => {
            if seen.contains(&v) {
                return erase(index, &v);
            }
            seen.push(v.clone());
            match index.primary_bound(&v) {
                Some(bound) => approximate(index, bound.clone(), seen),
                None => match index.object_class() {
                    Some(root) => RawType::Class(root),
                    None => RawType::Variable(v),
                },
            }
        }
        RawType::Wildcard { upper: Some(bound) } => approximate(index, *bound, seen),
        RawType::Wildcard { upper: None } => match index.object_class() {
            Some(root) => RawType::Class(root),
            None => RawType::Wildcard { upper: None },
        },
        RawType::Parameterized { raw, args } => RawType::Parameterized {
            raw,
            args: args
                .into_iter()
                .map(|a| approximate(index, a, seen))
                .collect(),
        },
        RawType::Array(element) => RawType::array(approximate(index, *element, seen)),
        other => other,
    }
}

fn erase(index: &ModelIndex, v: &TypeVariable) -> RawType {
    match index.primary_bound(v).and_then(RawType::raw_class) {
        Some(class) => RawType::Class(class),
        None => match index.object_class() {
            Some(root) => RawType::Class(root),
            None => RawType::Variable(v.clone()),
        },
    }
}
