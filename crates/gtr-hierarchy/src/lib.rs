//! Class hierarchy model for generic type-parameter resolution.
//!
//! A [`ClassTable`] records classes and interfaces, the type-parameter
//! symbols they declare, and the type arguments each one supplies to its
//! supertypes. It is the read-only input of the resolver in `gtr-resolver`.
//!
//! - **Identity**: [`ClassId`] and [`TypeParamId`] are opaque handles; two
//!   parameters named `T` on different classes never compare equal.
//! - **Validation**: edges are checked for arity, kind and cycles when added.
//! - **Concurrency**: all table operations take `&self` and are thread-safe.

mod error;
mod format;
mod ids;
mod table;
pub mod types;

pub use error::HierarchyError;
pub use format::TypeFormatter;
pub use ids::{ClassId, TypeParamId};
pub use table::{
    ClassDecl, ClassInfo, ClassKind, ClassTable, OBJECT_NAME, RESOLVER_BASE_NAME, TypeParamInfo,
};
pub use types::{SupertypeRef, TypeArg, TypeArgs, WildcardBound};
