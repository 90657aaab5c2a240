//! Centralized limits for hierarchy traversal and type-parameter resolution.
//!
//! The resolver's recursion guards are built from
//! `gtr_resolver::recursion::RecursionProfile`, whose presets read these
//! constants. Keeping the numbers here lets the class table and the resolver
//! agree on what "too deep" means.

// =============================================================================
// Hierarchy Limits
// =============================================================================

/// Maximum inheritance depth followed while walking a provider's supertypes.
///
/// A class table is acyclic by construction, so this only guards against
/// pathologically deep hierarchies overflowing the stack. Exceeding it is a
/// resolution error, never a silent truncation.
///
/// ```text
/// class L0<T> {}
/// class L1<T> extends L0<T> {}
/// ...
/// class L300 extends L299<String> {}   // exceeds the limit
/// ```
pub const MAX_HIERARCHY_DEPTH: u32 = 256;

/// Maximum number of supertype visits in a single walk.
///
/// Interfaces reachable along several paths (diamonds) are visited once per
/// path, so the visit count can exceed the number of distinct types.
pub const MAX_HIERARCHY_VISITS: u32 = 100_000;

// =============================================================================
// Parameter Chain Limits
// =============================================================================

/// Maximum length of a symbol-to-symbol chain.
///
/// `Box<T> <- MediumBox<U> <- StringBox` is a chain of length two
/// (`T -> U -> String`). Each intermediate generic layer adds one link.
pub const MAX_PARAMETER_CHAIN: u32 = 256;

/// Maximum number of chain steps across a whole matching pass.
pub const MAX_PARAMETER_CHAIN_STEPS: u32 = 100_000;

// =============================================================================
// Capacity Hints
// =============================================================================

/// Inline capacity for supertype argument lists.
///
/// Most generic declarations take one or two parameters.
pub const INLINE_TYPE_ARGS: usize = 2;

/// Initial capacity of the supertype record list built by one walk.
pub const WALK_RECORDS_CAPACITY: usize = 16;
