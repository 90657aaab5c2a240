//! Errors raised while building a class table.

use crate::ids::{ClassId, TypeParamId};
use thiserror::Error;

/// A class-table edit that would produce an ill-formed hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("{0} is not registered in this class table")]
    UnknownClass(ClassId),

    #[error("{0} is not a type parameter declared in this class table")]
    UnknownTypeParam(TypeParamId),

    #[error("{raw} declares {expected} type parameter(s) but {found} argument(s) were supplied")]
    ArityMismatch {
        raw: String,
        expected: usize,
        found: usize,
    },

    #[error("{name} is an interface and cannot be used as a superclass")]
    NotAClass { name: String },

    #[error("{name} is a class and cannot be implemented")]
    NotAnInterface { name: String },

    #[error("interface {name} cannot extend a class; use implement for super-interfaces")]
    InterfaceCannotExtend { name: String },

    #[error("making {child} inherit from {parent} would create an inheritance cycle")]
    InheritanceCycle { child: String, parent: String },

    #[error("built-in type {name} cannot be given supertypes")]
    BuiltinImmutable { name: String },

    #[error("{name} already extends {superclass}")]
    SuperclassAlreadySet { name: String, superclass: String },

    #[error("supertypes of {name} are sealed")]
    Sealed { name: String },
}
