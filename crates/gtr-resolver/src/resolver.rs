//! The type-parameter resolver entry point.
//!
//! A resolver is constructed at a *site*: an anonymous class directly
//! extending `TypeResolver<X>`, declared inside some generic class. The site's
//! argument `X` is either already concrete, or a symbol of the enclosing
//! class that must be traced through the *provider*, the runtime class of the
//! object on whose behalf resolution happens.
//!
//! ```ignore
//! // class Box<T> { Class<T> type = new TypeResolver<T>(getClass()) {}.get(); }
//! let site = table.resolver_site(TypeArg::Param(t))?;
//! let resolved = TypeResolver::new(&table, site, string_box)?;
//! assert_eq!(resolved.get(), string);
//! ```
//!
//! Resolution order:
//! 1. validate the site shape (else [`InitError`]);
//! 2. concrete argument: return it (no cache access, no walk);
//! 3. symbol: cache lookup, else seal the provider's ancestry, walk it, merge,
//!    look up again.

use crate::cache::ResolutionCache;
use crate::error::{InitError, ResolutionError, ResolverError};
use crate::matcher::{Bindings, SymbolMatcher};
use crate::query_trace;
use crate::recursion::RecursionProfile;
use crate::walk::HierarchyWalker;
use gtr_hierarchy::{ClassId, ClassTable, SupertypeRef, TypeArg, TypeParamId};
use tracing::debug;

/// Recursion limits used by a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Limits for descending through the provider's supertypes.
    pub walk: RecursionProfile,
    /// Limits for following symbol-to-symbol bindings.
    pub chain: RecursionProfile,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            walk: RecursionProfile::HierarchyWalk,
            chain: RecursionProfile::ParameterChain,
        }
    }
}

/// How a resolution was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolutionPath {
    Direct,
    Cached,
    Walked,
}

impl ResolutionPath {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Cached => "cached",
            Self::Walked => "walked",
        }
    }
}

/// A resolved generic type parameter.
///
/// Immutable once constructed. Equality and hashing use only the resolved
/// class, so resolvers reached through different providers or sites compare
/// equal when they resolved to the same class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeResolver {
    resolved: ClassId,
}

impl TypeResolver {
    /// Resolve through the process-wide cache with default limits.
    pub fn new(table: &ClassTable, site: ClassId, provider: ClassId) -> Result<Self, ResolverError> {
        Self::with_config(
            table,
            ResolutionCache::global(),
            ResolverConfig::default(),
            site,
            provider,
        )
    }

    /// Resolve through an explicit cache with default limits.
    pub fn with_cache(
        table: &ClassTable,
        cache: &ResolutionCache,
        site: ClassId,
        provider: ClassId,
    ) -> Result<Self, ResolverError> {
        Self::with_config(table, cache, ResolverConfig::default(), site, provider)
    }

    /// Resolve through an explicit cache with explicit limits.
    pub fn with_config(
        table: &ClassTable,
        cache: &ResolutionCache,
        config: ResolverConfig,
        site: ClassId,
        provider: ClassId,
    ) -> Result<Self, ResolverError> {
        let query_id = query_trace::enabled().then(|| {
            let id = query_trace::next_query_id();
            query_trace::resolve_start(id, site, provider);
            id
        });

        let result = resolve(table, cache, config, site, provider);

        if let Some(query_id) = query_id {
            match &result {
                Ok((class, path)) => query_trace::resolve_end(query_id, Some(*class), path.as_str()),
                Err(_) => query_trace::resolve_end(query_id, None, "error"),
            }
        }

        let (resolved, path) = result?;
        debug!(
            site = site.0,
            provider = provider.0,
            resolved = resolved.0,
            path = path.as_str(),
            "TypeResolver::resolve"
        );
        Ok(Self { resolved })
    }

    /// The resolved concrete class.
    #[inline]
    pub fn get(&self) -> ClassId {
        self.resolved
    }

    /// Name of the resolved class in `table`.
    pub fn name(&self, table: &ClassTable) -> String {
        table.display_name(self.resolved)
    }
}

/// Run the walk and matching for `provider` without consulting any cache.
///
/// Returns every binding traceable through the provider's hierarchy.
pub fn collect_bindings(
    table: &ClassTable,
    provider: ClassId,
    config: ResolverConfig,
) -> Result<Bindings, ResolutionError> {
    let scan = HierarchyWalker::new(table, config.walk).scan(provider)?;
    SymbolMatcher::new(table, &scan.supertypes, config.chain).match_all(&scan.declared)
}

fn resolve(
    table: &ClassTable,
    cache: &ResolutionCache,
    config: ResolverConfig,
    site: ClassId,
    provider: ClassId,
) -> Result<(ClassId, ResolutionPath), ResolverError> {
    let supertype = site_supertype(table, site)?;
    let Some(arg) = supertype.arg(0) else {
        return Err(ResolutionError::NotParameterized {
            class: table.display_name(site),
        }
        .into());
    };

    match arg {
        TypeArg::Class(class) => Ok((*class, ResolutionPath::Direct)),
        TypeArg::Parameterized(nested) => Ok((nested.raw, ResolutionPath::Direct)),
        TypeArg::Param(param) => Ok(resolve_param(table, cache, config, *param, provider)?),
        TypeArg::Wildcard(_) | TypeArg::Array(_) => Err(ResolutionError::UnsupportedArgument {
            display: table.formatter().arg(arg),
        }
        .into()),
    }
}

/// The site's generic superclass, if the site has the required shape.
fn site_supertype(table: &ClassTable, site: ClassId) -> Result<SupertypeRef, InitError> {
    table
        .generic_superclass(site)
        .filter(|supertype| table.is_anonymous(site) && supertype.raw == table.resolver_base())
        .ok_or_else(|| InitError {
            class: table.display_name(site),
        })
}

fn resolve_param(
    table: &ClassTable,
    cache: &ResolutionCache,
    config: ResolverConfig,
    param: TypeParamId,
    provider: ClassId,
) -> Result<(ClassId, ResolutionPath), ResolutionError> {
    if let Some(class) = cache.get(provider, param) {
        return Ok((class, ResolutionPath::Cached));
    }

    // Cached bindings are only valid while the provider's ancestry is fixed.
    table.seal(provider);
    let bindings = collect_bindings(table, provider, config)?;
    debug!(
        provider = provider.0,
        param = param.0,
        bindings = bindings.len(),
        "TypeResolver::resolve - walked provider hierarchy"
    );
    cache.merge(provider, bindings);

    cache
        .peek(provider, param)
        .map(|class| (class, ResolutionPath::Walked))
        .ok_or_else(|| ResolutionError::UnboundParameter {
            param,
            display: table.formatter().qualified_param(param),
        })
}

#[cfg(test)]
#[path = "../tests/resolver_tests.rs"]
mod tests;
