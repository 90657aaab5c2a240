use super::*;
use crate::cache::CacheStats;
use gtr_hierarchy::{ClassDecl, WildcardBound};
use rayon::prelude::*;
use std::collections::HashSet;

/// ```text
/// class Box<T>                        site_t = new TypeResolver<T>() {}
/// class MediumBox<U> extends Box<U>   site_u = new TypeResolver<U>() {}
/// class StringBox extends MediumBox<String>
/// class IntBox extends Box<Integer>
/// ```
struct Boxes {
    table: ClassTable,
    string: ClassId,
    integer: ClassId,
    list: ClassId,
    boxed: ClassId,
    medium: ClassId,
    string_box: ClassId,
    int_box: ClassId,
    t: TypeParamId,
    site_t: ClassId,
    site_u: ClassId,
}

fn boxes() -> Boxes {
    let table = ClassTable::new();
    let string = table.declare(ClassDecl::class("String"));
    let integer = table.declare(ClassDecl::class("Integer"));
    let list = table.declare(ClassDecl::interface("List").with_type_params(["E"]));
    let boxed = table.declare(ClassDecl::class("Box").with_type_params(["T"]));
    let t = table.type_params(boxed)[0];
    let medium = table.declare(ClassDecl::class("MediumBox").with_type_params(["U"]));
    let u = table.type_params(medium)[0];
    table
        .extend(medium, SupertypeRef::new(boxed, [TypeArg::Param(u)]))
        .expect("MediumBox extends Box<U>");
    let string_box = table.declare(ClassDecl::class("StringBox"));
    table
        .extend(string_box, SupertypeRef::new(medium, [TypeArg::Class(string)]))
        .expect("StringBox extends MediumBox<String>");
    let int_box = table.declare(ClassDecl::class("IntBox"));
    table
        .extend(int_box, SupertypeRef::new(boxed, [TypeArg::Class(integer)]))
        .expect("IntBox extends Box<Integer>");
    let site_t = table.resolver_site(TypeArg::Param(t)).expect("site for T");
    let site_u = table.resolver_site(TypeArg::Param(u)).expect("site for U");
    Boxes {
        table,
        string,
        integer,
        list,
        boxed,
        medium,
        string_box,
        int_box,
        t,
        site_t,
        site_u,
    }
}

fn resolve(b: &Boxes, cache: &ResolutionCache, site: ClassId, provider: ClassId) -> ClassId {
    TypeResolver::with_cache(&b.table, cache, site, provider)
        .expect("resolves")
        .get()
}

fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Direct resolution
// =============================================================================

#[test]
fn test_concrete_site_skips_cache() {
    let b = boxes();
    let cache = ResolutionCache::new();
    let site = b.table.resolver_site(TypeArg::Class(b.string)).expect("site");

    assert_eq!(resolve(&b, &cache, site, b.int_box), b.string);
    assert_eq!(cache.stats(), CacheStats::default());
}

#[test]
fn test_nested_site_argument_resolves_to_raw_class() {
    let b = boxes();
    let cache = ResolutionCache::new();
    let nested = TypeArg::parameterized(b.list, [TypeArg::Class(b.string)]);
    let site = b.table.resolver_site(nested).expect("site");

    assert_eq!(resolve(&b, &cache, site, b.string_box), b.list);
    assert!(cache.is_empty());
}

#[test]
fn test_wildcard_site_argument_is_rejected() {
    let b = boxes();
    let cache = ResolutionCache::new();
    let site = b
        .table
        .resolver_site(TypeArg::Wildcard(WildcardBound::Extends(Box::new(
            TypeArg::Class(b.string),
        ))))
        .expect("site");

    let err = TypeResolver::with_cache(&b.table, &cache, site, b.string_box)
        .expect_err("wildcard site");
    assert_eq!(
        err.as_resolution(),
        Some(&ResolutionError::UnsupportedArgument {
            display: "? extends String".to_string(),
        })
    );
}

// =============================================================================
// Cache-assisted resolution
// =============================================================================

#[test]
fn test_first_resolution_walks_second_hits_cache() {
    init_test_tracing();
    let b = boxes();
    let cache = ResolutionCache::new();

    assert_eq!(resolve(&b, &cache, b.site_t, b.string_box), b.string);
    let after_walk = cache.stats();
    assert_eq!(after_walk.walks, 1);
    assert_eq!(after_walk.misses, 1);
    assert_eq!(after_walk.hits, 0);
    // Both T and U were bound by the walk.
    assert_eq!(after_walk.entries, 2);

    assert_eq!(resolve(&b, &cache, b.site_t, b.string_box), b.string);
    let after_hit = cache.stats();
    assert_eq!(after_hit.walks, 1);
    assert_eq!(after_hit.hits, 1);
}

#[test]
fn test_intermediate_symbol_resolves_from_same_walk() {
    let b = boxes();
    let cache = ResolutionCache::new();
    resolve(&b, &cache, b.site_t, b.string_box);

    assert_eq!(resolve(&b, &cache, b.site_u, b.string_box), b.string);
    assert_eq!(cache.stats().walks, 1);
}

#[test]
fn test_subclasses_of_same_base_do_not_share_bindings() {
    let b = boxes();
    let cache = ResolutionCache::new();
    assert_eq!(resolve(&b, &cache, b.site_t, b.string_box), b.string);
    assert_eq!(resolve(&b, &cache, b.site_t, b.int_box), b.integer);
    assert_eq!(resolve(&b, &cache, b.site_t, b.string_box), b.string);
    assert_eq!(cache.stats().walks, 2);
}

#[test]
fn test_interface_bindings() {
    // class Both implements Supplier<String>, Consumer<Integer>
    let b = boxes();
    let cache = ResolutionCache::new();
    let supplier = b
        .table
        .declare(ClassDecl::interface("Supplier").with_type_params(["S"]));
    let consumer = b
        .table
        .declare(ClassDecl::interface("Consumer").with_type_params(["C"]));
    let s = b.table.type_params(supplier)[0];
    let c = b.table.type_params(consumer)[0];
    let both = b.table.declare(ClassDecl::class("Both"));
    b.table
        .implement(both, SupertypeRef::new(supplier, [TypeArg::Class(b.string)]))
        .expect("implements Supplier<String>");
    b.table
        .implement(both, SupertypeRef::new(consumer, [TypeArg::Class(b.integer)]))
        .expect("implements Consumer<Integer>");

    let site_s = b.table.resolver_site(TypeArg::Param(s)).expect("site");
    let site_c = b.table.resolver_site(TypeArg::Param(c)).expect("site");
    assert_eq!(resolve(&b, &cache, site_s, both), b.string);
    assert_eq!(resolve(&b, &cache, site_c, both), b.integer);
}

#[test]
fn test_nested_binding_resolves_to_raw_class() {
    // class ListBox extends Box<List<String>>
    let b = boxes();
    let cache = ResolutionCache::new();
    let list_box = b.table.declare(ClassDecl::class("ListBox"));
    let nested = TypeArg::parameterized(b.list, [TypeArg::Class(b.string)]);
    b.table
        .extend(list_box, SupertypeRef::new(b.boxed, [nested]))
        .expect("ListBox extends Box<List<String>>");

    assert_eq!(resolve(&b, &cache, b.site_t, list_box), b.list);
}

#[test]
fn test_anonymous_provider() {
    // new Box<String>() {}
    let b = boxes();
    let cache = ResolutionCache::new();
    let provider = b
        .table
        .anonymous_subclass(b.boxed, [TypeArg::Class(b.integer)])
        .expect("anonymous Box<Integer>");
    assert_eq!(resolve(&b, &cache, b.site_t, provider), b.integer);
}

#[test]
fn test_global_cache_is_deterministic() {
    let b = boxes();
    let first = TypeResolver::new(&b.table, b.site_t, b.string_box).expect("resolves");
    let second = TypeResolver::new(&b.table, b.site_t, b.string_box).expect("resolves");
    assert_eq!(first, second);
    assert_eq!(first.name(&b.table), "String");
    assert!(ResolutionCache::global().contains(b.string_box, b.t));
}

#[test]
fn test_concurrent_resolution() {
    let b = boxes();
    let cache = ResolutionCache::new();
    let results: Vec<(ClassId, ClassId)> = (0..64)
        .into_par_iter()
        .map(|i| {
            let provider = if i % 2 == 0 { b.string_box } else { b.int_box };
            (provider, resolve(&b, &cache, b.site_t, provider))
        })
        .collect();

    for (provider, resolved) in results {
        let expected = if provider == b.string_box {
            b.string
        } else {
            b.integer
        };
        assert_eq!(resolved, expected);
    }
    assert_eq!(cache.peek(b.string_box, b.t), Some(b.string));
    assert_eq!(cache.peek(b.int_box, b.t), Some(b.integer));
}

#[test]
fn test_collect_bindings_without_cache() {
    let b = boxes();
    let bindings =
        collect_bindings(&b.table, b.string_box, ResolverConfig::default()).expect("walks");
    assert_eq!(bindings.len(), 2);
    assert_eq!(bindings.get(&b.t), Some(&b.string));
}

// =============================================================================
// Equality
// =============================================================================

#[test]
fn test_equality_uses_resolved_class_only() {
    let b = boxes();
    let cache = ResolutionCache::new();
    let direct_site = b.table.resolver_site(TypeArg::Class(b.string)).expect("site");

    let walked = TypeResolver::with_cache(&b.table, &cache, b.site_t, b.string_box).expect("ok");
    let direct = TypeResolver::with_cache(&b.table, &cache, direct_site, b.int_box).expect("ok");
    let other = TypeResolver::with_cache(&b.table, &cache, b.site_t, b.int_box).expect("ok");

    assert_eq!(walked, direct);
    assert_ne!(walked, other);

    let set: HashSet<TypeResolver> = [walked, direct, other].into_iter().collect();
    assert_eq!(set.len(), 2);
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn test_named_subclass_is_init_error() {
    let b = boxes();
    let cache = ResolutionCache::new();
    let named = b.table.declare(ClassDecl::class("NamedResolver"));
    b.table
        .extend(
            named,
            SupertypeRef::new(b.table.resolver_base(), [TypeArg::Class(b.string)]),
        )
        .expect("NamedResolver extends TypeResolver<String>");

    let err = TypeResolver::with_cache(&b.table, &cache, named, b.string_box)
        .expect_err("named site");
    assert!(err.is_init());
    assert_eq!(
        err.to_string(),
        "NamedResolver is not a direct anonymous instance of TypeResolver"
    );

    // new NamedResolver() {} is anonymous but not a direct subclass.
    let indirect = b.table.anonymous_subclass(named, Vec::<TypeArg>::new()).expect("anonymous");
    let err = TypeResolver::with_cache(&b.table, &cache, indirect, b.string_box)
        .expect_err("indirect site");
    assert!(err.is_init());
    assert!(cache.is_empty());
}

#[test]
fn test_anonymous_non_resolver_is_init_error() {
    let b = boxes();
    let cache = ResolutionCache::new();
    let site = b
        .table
        .anonymous_subclass(b.boxed, [TypeArg::Class(b.string)])
        .expect("anonymous Box<String>");
    let err = TypeResolver::with_cache(&b.table, &cache, site, b.string_box).expect_err("not a site");
    assert!(err.is_init());
}

#[test]
fn test_unknown_site_is_init_error() {
    let b = boxes();
    let cache = ResolutionCache::new();
    let err = TypeResolver::with_cache(&b.table, &cache, ClassId::INVALID, b.string_box)
        .expect_err("unknown site");
    assert!(err.is_init());
    assert_eq!(err.as_resolution(), None);
}

#[test]
fn test_raw_site_is_not_parameterized() {
    let b = boxes();
    let cache = ResolutionCache::new();
    let site = b
        .table
        .anonymous_subclass(b.table.resolver_base(), Vec::<TypeArg>::new())
        .expect("raw anonymous TypeResolver");
    let err = TypeResolver::with_cache(&b.table, &cache, site, b.string_box).expect_err("raw site");
    assert!(matches!(
        err,
        ResolverError::Resolution(ResolutionError::NotParameterized { .. })
    ));
}

#[test]
fn test_unbound_parameter() {
    // new Box<>() with no concrete subclass: nothing binds T.
    let b = boxes();
    let cache = ResolutionCache::new();
    let err = TypeResolver::with_cache(&b.table, &cache, b.site_t, b.boxed).expect_err("unbound");
    assert_eq!(
        err,
        ResolverError::Resolution(ResolutionError::UnboundParameter {
            param: b.t,
            display: "T of Box".to_string(),
        })
    );
    assert_eq!(err.to_string(), "type T of Box couldn't be resolved to a class");
}

#[test]
fn test_unknown_provider_is_unbound() {
    let b = boxes();
    let cache = ResolutionCache::new();
    let err = TypeResolver::with_cache(&b.table, &cache, b.site_t, ClassId::INVALID)
        .expect_err("unknown provider");
    assert!(matches!(
        err.as_resolution(),
        Some(ResolutionError::UnboundParameter { .. })
    ));
}

#[test]
fn test_failed_walk_leaves_cache_untouched() {
    // class WildBox extends Box<?>
    let b = boxes();
    let cache = ResolutionCache::new();
    let wild_box = b.table.declare(ClassDecl::class("WildBox"));
    b.table
        .extend(
            wild_box,
            SupertypeRef::new(b.boxed, [TypeArg::Wildcard(WildcardBound::Unbounded)]),
        )
        .expect("WildBox extends Box<?>");

    let err = TypeResolver::with_cache(&b.table, &cache, b.site_t, wild_box).expect_err("wildcard");
    assert!(matches!(
        err.as_resolution(),
        Some(ResolutionError::UnsupportedArgument { .. })
    ));
    let stats = cache.stats();
    assert_eq!(stats.entries, 0);
    assert_eq!(stats.walks, 0);
}

#[test]
fn test_custom_walk_limit() {
    let b = boxes();
    let cache = ResolutionCache::new();
    let config = ResolverConfig {
        walk: RecursionProfile::Custom {
            max_depth: 1,
            max_iterations: 100,
        },
        ..ResolverConfig::default()
    };
    let err = TypeResolver::with_config(&b.table, &cache, config, b.site_t, b.string_box)
        .expect_err("walk too shallow");
    assert_eq!(
        err.as_resolution(),
        Some(&ResolutionError::DepthExceeded {
            display: "MediumBox".to_string(),
        })
    );
    assert!(cache.is_empty());

    assert_eq!(
        TypeResolver::with_config(&b.table, &cache, ResolverConfig::default(), b.site_t, b.medium)
            .map(|r| r.get())
            .map_err(|e| e.to_string()),
        Err("type U of MediumBox couldn't be resolved to a class".to_string())
    );
}

#[test]
fn test_resolved_provider_keeps_its_ancestry() {
    let b = boxes();
    let cache = ResolutionCache::new();
    assert_eq!(resolve(&b, &cache, b.site_t, b.int_box), b.integer);
    assert!(b.table.is_sealed(b.int_box));
    assert!(b.table.is_sealed(b.boxed));

    let err = b
        .table
        .extend(b.int_box, SupertypeRef::new(b.boxed, [TypeArg::Class(b.string)]))
        .expect_err("IntBox already extends Box<Integer>");
    assert!(matches!(err, gtr_hierarchy::HierarchyError::Sealed { .. }));
    let err = b
        .table
        .implement(b.boxed, SupertypeRef::new(b.list, [TypeArg::Param(b.t)]))
        .expect_err("Box was walked");
    assert!(matches!(err, gtr_hierarchy::HierarchyError::Sealed { .. }));

    // The cached answer still matches a fresh walk.
    let fresh = collect_bindings(&b.table, b.int_box, ResolverConfig::default()).expect("walks");
    assert_eq!(fresh.get(&b.t), Some(&b.integer));
    assert_eq!(resolve(&b, &cache, b.site_t, b.int_box), b.integer);
}

#[test]
fn test_direct_resolution_does_not_seal() {
    let b = boxes();
    let cache = ResolutionCache::new();
    let site = b.table.resolver_site(TypeArg::Class(b.string)).expect("site");
    resolve(&b, &cache, site, b.int_box);
    assert!(!b.table.is_sealed(b.int_box));
}
