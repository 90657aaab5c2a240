//! Hierarchy walk: enumerate a provider's parameterized supertypes and the
//! type-parameter symbols declared along the way.
//!
//! Both collections follow the same traversal, stopping at `Object`:
//!
//! ```text
//! visit(C):
//!     records  += C's generic superclass      (if parameterized)
//!     records  += C's generic interfaces      (each, if parameterized)
//!     visit(C's superclass)
//!     visit(each of C's interfaces)
//!
//! declared(C) = C's own params ++ declared(superclass) ++ declared(each interface)
//! ```
//!
//! The walk is read-only. It never touches the resolution cache, so it can be
//! re-run at any time with the same result.

use crate::error::ResolutionError;
use crate::recursion::{DepthCounter, RecursionProfile};
use gtr_common::limits::WALK_RECORDS_CAPACITY;
use gtr_hierarchy::{ClassId, ClassTable, SupertypeRef, TypeParamId};
use tracing::trace;

/// Everything the matcher needs from one walk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HierarchyScan {
    /// Parameterized supertype records, in traversal order.
    pub supertypes: Vec<SupertypeRef>,
    /// Declared type-parameter symbols, in traversal order.
    pub declared: Vec<TypeParamId>,
}

/// Walks a provider's superclass chain and interface graph.
pub struct HierarchyWalker<'a> {
    table: &'a ClassTable,
    depth: DepthCounter,
    visits: u32,
    max_visits: u32,
}

impl<'a> HierarchyWalker<'a> {
    pub fn new(table: &'a ClassTable, profile: RecursionProfile) -> Self {
        Self {
            table,
            depth: DepthCounter::with_profile(profile),
            visits: 0,
            max_visits: profile.max_iterations(),
        }
    }

    /// Collect supertype records and declared symbols for `provider`.
    ///
    /// An unknown provider, or `Object` itself, yields an empty scan.
    pub fn scan(mut self, provider: ClassId) -> Result<HierarchyScan, ResolutionError> {
        let mut scan = HierarchyScan {
            supertypes: Vec::with_capacity(WALK_RECORDS_CAPACITY),
            declared: Vec::new(),
        };
        self.collect_supertypes(provider, &mut scan.supertypes)?;
        self.collect_declared(provider, &mut scan.declared)?;
        trace!(
            provider = provider.0,
            records = scan.supertypes.len(),
            declared = scan.declared.len(),
            visits = self.visits,
            "HierarchyWalker::scan"
        );
        Ok(scan)
    }

    fn is_terminal(&self, class: ClassId) -> bool {
        class == self.table.object() || !self.table.contains(class)
    }

    fn enter(&mut self, class: ClassId) -> Result<(), ResolutionError> {
        self.visits = self.visits.saturating_add(1);
        if self.visits > self.max_visits || !self.depth.enter() {
            return Err(ResolutionError::DepthExceeded {
                display: self.table.display_name(class),
            });
        }
        Ok(())
    }

    fn collect_supertypes(
        &mut self,
        class: ClassId,
        out: &mut Vec<SupertypeRef>,
    ) -> Result<(), ResolutionError> {
        if self.is_terminal(class) {
            return Ok(());
        }
        self.enter(class)?;
        let result = self.collect_supertypes_of(class, out);
        self.depth.leave();
        result
    }

    fn collect_supertypes_of(
        &mut self,
        class: ClassId,
        out: &mut Vec<SupertypeRef>,
    ) -> Result<(), ResolutionError> {
        let superclass = self.table.generic_superclass(class);
        let interfaces = self.table.generic_interfaces(class);

        out.extend(superclass.iter().filter(|s| s.is_parameterized()).cloned());
        out.extend(interfaces.iter().filter(|i| i.is_parameterized()).cloned());

        if let Some(superclass) = &superclass {
            self.collect_supertypes(superclass.raw, out)?;
        }
        for interface in &interfaces {
            self.collect_supertypes(interface.raw, out)?;
        }
        Ok(())
    }

    fn collect_declared(
        &mut self,
        class: ClassId,
        out: &mut Vec<TypeParamId>,
    ) -> Result<(), ResolutionError> {
        if self.is_terminal(class) {
            return Ok(());
        }
        self.enter(class)?;
        let result = self.collect_declared_of(class, out);
        self.depth.leave();
        result
    }

    fn collect_declared_of(
        &mut self,
        class: ClassId,
        out: &mut Vec<TypeParamId>,
    ) -> Result<(), ResolutionError> {
        out.extend(self.table.type_params(class));

        if let Some(superclass) = self.table.superclass(class) {
            self.collect_declared(superclass, out)?;
        }
        for interface in self.table.interfaces(class) {
            self.collect_declared(interface, out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/walk_tests.rs"]
mod tests;
