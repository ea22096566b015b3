use thiserror::Error;

/// Errors raised while building a model, before any search takes place.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// The requested domain contains no value.
    #[error("a variable cannot be created with an empty domain")]
    EmptyDomain,
    /// The lower bound of the requested domain exceeds its upper bound.
    #[error("the bounds [{0},{1}] do not describe a domain")]
    IncorrectBounds(i32, i32),
    /// A value lies outside of the range supported by the domain representations.
    #[error("the value {0} lies outside of the supported range")]
    ValueOutOfRange(i32),
    /// A view would collapse every value of its source onto the same value.
    #[error("a view cannot have a scale of zero")]
    ZeroScale,
}
