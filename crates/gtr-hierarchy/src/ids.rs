//! Identifiers for classes and type-parameter symbols.
//!
//! Both identifiers are allocated from process-wide counters rather than
//! per-table counters. A resolution cache may outlive and be shared between
//! several [`ClassTable`](crate::ClassTable) instances, and it keys entries by
//! `TypeParamId`, so a symbol id must never be reused by another table.

use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_CLASS_ID: AtomicU32 = AtomicU32::new(ClassId::FIRST_VALID);
static NEXT_TYPE_PARAM_ID: AtomicU32 = AtomicU32::new(TypeParamId::FIRST_VALID);

// =============================================================================
// ClassId
// =============================================================================

/// Identity of a class or interface registered in a class table.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClassId(pub u32);

impl ClassId {
    /// Sentinel value for an invalid `ClassId`.
    pub const INVALID: Self = Self(0);

    /// First valid `ClassId`.
    pub const FIRST_VALID: u32 = 1;

    /// Check if this `ClassId` is valid.
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }

    pub(crate) fn fresh() -> Self {
        Self(NEXT_CLASS_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class#{}", self.0)
    }
}

// =============================================================================
// TypeParamId
// =============================================================================

/// Identity of one declared generic parameter slot, e.g. the `T` in `Box<T>`.
///
/// Two declarations that share a display name (`Box<T>` and `List<T>`) get
/// distinct ids. Matching is always done on the id, never on the name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeParamId(pub u32);

impl TypeParamId {
    /// Sentinel value for an invalid `TypeParamId`.
    pub const INVALID: Self = Self(0);

    /// First valid `TypeParamId`.
    pub const FIRST_VALID: u32 = 1;

    /// Check if this `TypeParamId` is valid.
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }

    pub(crate) fn fresh() -> Self {
        Self(NEXT_TYPE_PARAM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TypeParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "param#{}", self.0)
    }
}
