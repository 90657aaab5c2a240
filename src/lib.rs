//! Runtime resolution of generic type parameters over an explicit class
//! hierarchy.
//!
//! The workspace is split into three crates, re-exported here:
//!
//! - [`gtr_common`]: recursion limits and tracing setup
//! - [`gtr_hierarchy`]: the [`ClassTable`] holding classes, interfaces and
//!   their parameterized supertype edges
//! - [`gtr_resolver`]: the [`TypeResolver`] and its [`ResolutionCache`]
//!
//! ```ignore
//! use gtr::{ClassDecl, ClassTable, SupertypeRef, TypeArg, TypeResolver};
//!
//! // class Box<T> { ... new TypeResolver<T>(getClass()) {} ... }
//! // class StringBox extends Box<String> {}
//! let table = ClassTable::new();
//! let string = table.declare(ClassDecl::class("String"));
//! let boxed = table.declare(ClassDecl::class("Box").with_type_params(["T"]));
//! let t = table.type_param(boxed, "T").unwrap();
//! let string_box = table.declare(ClassDecl::class("StringBox"));
//! table.extend(string_box, SupertypeRef::new(boxed, [TypeArg::Class(string)]))?;
//!
//! let site = table.resolver_site(TypeArg::Param(t))?;
//! assert_eq!(TypeResolver::new(&table, site, string_box)?.get(), string);
//! ```

pub use gtr_common::limits;
pub use gtr_common::{LogFormat, init_tracing};

pub use gtr_hierarchy::{
    ClassDecl, ClassId, ClassInfo, ClassKind, ClassTable, HierarchyError, OBJECT_NAME,
    RESOLVER_BASE_NAME, SupertypeRef, TypeArg, TypeArgs, TypeFormatter, TypeParamId,
    TypeParamInfo, WildcardBound,
};

pub use gtr_resolver::{
    Bindings, CacheStats, InitError, ResolutionCache, ResolutionError, ResolverConfig,
    ResolverError, TypeResolver, collect_bindings,
};

pub use gtr_resolver::recursion::{RecursionProfile, RecursionResult};

#[cfg(test)]
#[path = "tests/test_fixtures.rs"]
pub mod test_fixtures;

#[cfg(test)]
#[path = "tests/scenario_tests.rs"]
mod scenario_tests;
