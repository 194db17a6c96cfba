use std::sync::Arc;

use pretty_assertions::assert_eq;

use crate::error::ReflectError;
use crate::model::{ClassDef, ModelBuilder, ModelIndex, TypeParam};
use crate::types::generics::{self, TypeEnvironment};
use crate::types::{ClassDescription, RawType};

struct Fixture {
    index: Arc<ModelIndex>,
    object: ClassDescription,
    string: ClassDescription,
    boxed: ClassDescription,
    pair: ClassDescription,
    node: ClassDescription,
}

fn fixture() -> Fixture {
    let mut builder = ModelBuilder::new();
    let object = builder.add_class(ClassDef::new("lang.Object"));
    builder.object_class(object);
    let string = builder.add_class(ClassDef::new("core.String"));
    let boxed = builder.add_class(ClassDef::new("util.Box").with_type_param(TypeParam::new("T")));
    let pair = builder.add_class(
        ClassDef::new("util.Pair")
            .with_type_param(TypeParam::new("K"))
            .with_type_param(TypeParam::new("V")),
    );
    let comparable = builder.declare_class("lang.Comparable");
    builder.define_class(
        comparable,
        ClassDef::new("lang.Comparable").with_type_param(TypeParam::new("T")),
    );
    let node = builder.declare_class("util.Node");
    builder.define_class(
        node,
        ClassDef::new("util.Node").with_type_param(TypeParam::new("T").with_bound(
            RawType::parameterized(comparable, vec![RawType::variable(node, "T")]),
        )),
    );
    let index = builder.build().unwrap();
    Fixture {
        index,
        object,
        string,
        boxed,
        pair,
        node,
    }
}

#[test]
fn identity_binds_nothing() {
    let f = fixture();
    let t = RawType::variable(f.boxed, "T");
    assert_eq!(TypeEnvironment::Identity.bind(&f.index, &t), t);
}

#[test]
fn scope_substitutes_bound_variables() {
    let f = fixture();
    let env = generics::environment_for(
        &f.index,
        f.boxed,
        &[RawType::Class(f.string)],
        &TypeEnvironment::Identity,
    )
    .unwrap();

    let t = RawType::variable(f.boxed, "T");
    assert_eq!(env.bind(&f.index, &t), RawType::Class(f.string));

    // The substitution rebuilds structure around the variable.
    let list_of_t = RawType::array(RawType::variable(f.boxed, "T"));
    assert_eq!(
        env.bind(&f.index, &list_of_t),
        RawType::array(RawType::Class(f.string))
    );
}

#[test]
fn unbound_variables_fall_through_to_the_parent() {
    let f = fixture();
    let outer = generics::environment_for(
        &f.index,
        f.boxed,
        &[RawType::Class(f.string)],
        &TypeEnvironment::Identity,
    )
    .unwrap();
    let inner = generics::environment_for(
        &f.index,
        f.pair,
        &[RawType::Class(f.object), RawType::Class(f.object)],
        &outer,
    )
    .unwrap();

    // Pair binds K and V; Box's T is resolved by the enclosing scope.
    assert_eq!(
        inner.bind(&f.index, &RawType::variable(f.boxed, "T")),
        RawType::Class(f.string)
    );
}

#[test]
fn nested_arguments_compose_through_the_enclosing_environment() {
    let f = fixture();
    let outer = generics::environment_for(
        &f.index,
        f.boxed,
        &[RawType::Class(f.string)],
        &TypeEnvironment::Identity,
    )
    .unwrap();
    // Pair<T, Object> seen from inside Box<String>: K must come out as String.
    let inner = generics::environment_for(
        &f.index,
        f.pair,
        &[RawType::variable(f.boxed, "T"), RawType::Class(f.object)],
        &outer,
    )
    .unwrap();

    assert_eq!(
        inner.bind(&f.index, &RawType::variable(f.pair, "K")),
        RawType::Class(f.string)
    );
}

#[test]
fn environments_are_structurally_equal() {
    let f = fixture();
    let a = generics::environment_for(
        &f.index,
        f.boxed,
        &[RawType::Class(f.string)],
        &TypeEnvironment::Identity,
    )
    .unwrap();
    let b = generics::environment_for(
        &f.index,
        f.boxed,
        &[RawType::Class(f.string)],
        &TypeEnvironment::Identity,
    )
    .unwrap();
    let c = generics::environment_for(
        &f.index,
        f.boxed,
        &[RawType::Class(f.object)],
        &TypeEnvironment::Identity,
    )
    .unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn arity_mismatch_is_rejected() {
    let f = fixture();
    let err = generics::environment_for(
        &f.index,
        f.pair,
        &[RawType::Class(f.string)],
        &TypeEnvironment::Identity,
    )
    .unwrap_err();
    assert_eq!(
        err,
        ReflectError::GenericArity {
            class: "util.Pair".to_string(),
            expected: 2,
            actual: 1,
        }
    );
}

#[test]
fn approximation_widens_unresolved_variables_to_the_root() {
    let f = fixture();
    let env = generics::approximating(&TypeEnvironment::Identity);
    assert_eq!(
        env.bind(&f.index, &RawType::variable(f.boxed, "T")),
        RawType::Class(f.object)
    );
    assert_eq!(
        env.bind(&f.index, &RawType::Wildcard { upper: None }),
        RawType::Class(f.object)
    );
}

#[test]
fn approximation_follows_wildcard_upper_bounds() {
    let f = fixture();
    let env = generics::approximating(&TypeEnvironment::Identity);
    let t = RawType::Wildcard {
        upper: Some(Box::new(RawType::Class(f.string))),
    };
    assert_eq!(env.bind(&f.index, &t), RawType::Class(f.string));
}

#[test]
fn self_referential_bounds_terminate() {
    let f = fixture();
    let env = generics::approximating(&TypeEnvironment::Identity);
    let comparable = f.index.class_by_name("lang.Comparable").unwrap();

    // T: Comparable<T> widens to Comparable<Comparable> instead of recursing.
    let widened = env.bind(&f.index, &RawType::variable(f.node, "T"));
    assert_eq!(
        widened,
        RawType::parameterized(comparable, vec![RawType::Class(comparable)])
    );
}

#[test]
fn approximating_is_idempotent() {
    let f = fixture();
    let env = generics::environment_for(
        &f.index,
        f.boxed,
        &[RawType::Class(f.string)],
        &TypeEnvironment::Identity,
    )
    .unwrap();
    let once = generics::approximating(&env);
    let twice = generics::approximating(&once);
    assert_eq!(once, twice);
}
