//! Type arguments and parameterized supertype references.

use crate::ids::{ClassId, TypeParamId};
use gtr_common::limits::INLINE_TYPE_ARGS;
use smallvec::SmallVec;

/// Argument list of a parameterized reference.
pub type TypeArgs = SmallVec<[TypeArg; INLINE_TYPE_ARGS]>;

/// A type argument supplied at an inheritance point.
///
/// Only the first three shapes can be resolved to a class. Wildcards and
/// arrays are representable so that hierarchies using them can be modeled,
/// but the resolver rejects them when a binding runs through one.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeArg {
    /// A concrete class: `Box<String>`.
    Class(ClassId),
    /// A type-parameter symbol still waiting for a binding: `Box<U>`.
    Param(TypeParamId),
    /// A nested parameterized reference: `Box<List<String>>`.
    Parameterized(Box<SupertypeRef>),
    /// A wildcard: `Box<?>`, `Box<? extends Number>`.
    Wildcard(WildcardBound),
    /// An array: `Box<String[]>`.
    Array(Box<TypeArg>),
}

impl TypeArg {
    /// Shorthand for a nested parameterized argument.
    pub fn parameterized(raw: ClassId, args: impl IntoIterator<Item = TypeArg>) -> Self {
        Self::Parameterized(Box::new(SupertypeRef::new(raw, args)))
    }

    /// Shorthand for an array argument.
    pub fn array(element: TypeArg) -> Self {
        Self::Array(Box::new(element))
    }

    /// Returns the symbol if this argument is an unresolved parameter.
    pub fn as_param(&self) -> Option<TypeParamId> {
        match self {
            Self::Param(param) => Some(*param),
            _ => None,
        }
    }
}

/// Bound of a wildcard argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum WildcardBound {
    /// `?`
    Unbounded,
    /// `? extends X`
    Extends(Box<TypeArg>),
    /// `? super X`
    Super(Box<TypeArg>),
}

/// One parameterized supertype edge: a raw class or interface plus the
/// arguments supplied for its declared parameters, in declaration order.
///
/// An empty argument list is a raw reference. Raw edges are still inheritance
/// edges, but they carry no bindings.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SupertypeRef {
    pub raw: ClassId,
    pub args: TypeArgs,
}

impl SupertypeRef {
    pub fn new(raw: ClassId, args: impl IntoIterator<Item = TypeArg>) -> Self {
        Self {
            raw,
            args: args.into_iter().collect(),
        }
    }

    /// A raw (non-parameterized) reference to `raw`.
    pub fn raw(raw: ClassId) -> Self {
        Self {
            raw,
            args: TypeArgs::new(),
        }
    }

    /// Returns `true` if this reference supplies type arguments.
    #[inline]
    pub fn is_parameterized(&self) -> bool {
        !self.args.is_empty()
    }

    /// The argument at `index`, if supplied.
    #[inline]
    pub fn arg(&self, index: usize) -> Option<&TypeArg> {
        self.args.get(index)
    }
}
