//! Generic type-parameter resolver.
//!
//! Given a resolver site (an anonymous `TypeResolver<X>` subclass declared in
//! some generic class) and a provider class, [`TypeResolver`] finds the
//! concrete class bound to `X`:
//!
//! - **Direct**: `X` is already concrete, no search needed.
//! - **Cached**: `X` is a symbol already bound in the [`ResolutionCache`].
//! - **Walked**: the provider's supertypes are enumerated ([`walk`]), symbols
//!   are matched to supertype slots by identity ([`matcher`]), and all
//!   discovered bindings are merged into the cache in one batch.
//!
//! Recursion is bounded by [`recursion::RecursionProfile`] presets.

mod cache;
mod error;
pub mod matcher;
mod query_trace;
pub mod recursion;
mod resolver;
pub mod walk;

pub use cache::{CacheStats, ResolutionCache};
pub use error::{InitError, ResolutionError, ResolverError};
pub use matcher::{Bindings, SymbolMatcher};
pub use recursion::{DepthCounter, RecursionGuard, RecursionProfile, RecursionResult};
pub use resolver::{ResolverConfig, TypeResolver, collect_bindings};
pub use walk::{HierarchyScan, HierarchyWalker};
