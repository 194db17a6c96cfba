use thiserror::Error;

/// Everything that can go wrong while wrapping, resolving, or invoking
/// reflective elements.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ReflectError {
    #[error("wrapper was produced by a different reflection manager")]
    ForeignWrapper,
    #[error("method `{0}` is not a property accessor")]
    NotAPropertyAccessor(String),
    #[error("type `{0}` cannot be classified as an array, collection, or simple type")]
    UnsupportedTypeShape(String),
    #[error("cannot read property `{0}` from a null target")]
    NullTarget(String),
    #[error("property accessor takes no arguments, got {0}")]
    UnexpectedArguments(usize),
    #[error("invoking `{name}` failed")]
    Invocation {
        name: String,
        #[source]
        source: Box<ReflectError>,
    },
    #[error("instance of `{class}` has no value for `{member}`")]
    MissingValue { member: String, class: String },
    #[error("target is an instance of `{actual}`, expected `{expected}`")]
    TargetTypeMismatch { expected: String, actual: String },
    #[error("`{class}` declares {expected} type parameter(s), got {actual} argument(s)")]
    GenericArity {
        class: String,
        expected: usize,
        actual: usize,
    },
    #[error("class `{0}` was declared but never defined")]
    UndefinedClass(String),
}
