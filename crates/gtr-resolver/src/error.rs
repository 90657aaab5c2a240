//! Resolver errors.
//!
//! Both kinds signal a structural mistake in the caller's hierarchy or in the
//! way the resolver was constructed. Retrying never helps.

use gtr_hierarchy::TypeParamId;
use thiserror::Error;

/// The resolver site is not an anonymous class directly extending
/// `TypeResolver<..>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{class} is not a direct anonymous instance of TypeResolver")]
pub struct InitError {
    /// Name of the offending class.
    pub class: String,
}

/// A type argument could not be traced to a concrete class.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// No enumerated supertype binds the parameter.
    #[error("type {display} couldn't be resolved to a class")]
    UnboundParameter { param: TypeParamId, display: String },

    /// The binding runs through a wildcard or array argument.
    #[error("type argument {display} has an unsupported shape")]
    UnsupportedArgument { display: String },

    /// The resolver site extends the raw `TypeResolver` with no argument.
    #[error("can't resolve parameter of non parameterized type {class}")]
    NotParameterized { class: String },

    /// A symbol's binding chain leads back to the symbol itself.
    #[error("binding of {display} refers back to itself")]
    CyclicBinding { display: String },

    /// The hierarchy or a binding chain is deeper than the configured limit.
    #[error("resolving through {display} exceeded the recursion limit")]
    DepthExceeded { display: String },
}

/// Any failure of [`TypeResolver`](crate::TypeResolver) construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    #[error(transparent)]
    Init(#[from] InitError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

impl ResolverError {
    /// Returns `true` for construction-shape errors.
    pub fn is_init(&self) -> bool {
        matches!(self, Self::Init(_))
    }

    /// The resolution failure, if this is one.
    pub fn as_resolution(&self) -> Option<&ResolutionError> {
        match self {
            Self::Resolution(err) => Some(err),
            Self::Init(_) => None,
        }
    }
}
