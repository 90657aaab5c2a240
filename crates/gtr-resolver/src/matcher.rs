//! Symbol matching: correlate declared symbols with supertype slots.
//!
//! For every record `R` and declared symbol `S`, `S` is bound by `R` when it
//! occupies one of the slots of `R`'s raw type. Slot lookup compares symbol
//! identities, never names. The class bound to `S` is derived from the
//! argument `R` supplies at that slot:
//!
//! | Argument | Bound class |
//! |----------|-------------|
//! | `String` | `String` |
//! | `U` | whatever the first record declaring `U` binds it to |
//! | `List<String>` | `List` (one level of erasure) |
//! | `?`, `String[]` | error: unsupported shape |

use crate::error::ResolutionError;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use gtr_hierarchy::{ClassId, ClassTable, SupertypeRef, TypeArg, TypeParamId};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

/// Bindings discovered by one matching pass.
pub type Bindings = FxHashMap<TypeParamId, ClassId>;

/// Matches declared symbols against a fixed set of supertype records.
pub struct SymbolMatcher<'a> {
    table: &'a ClassTable,
    records: &'a [SupertypeRef],
    /// Declared slots of each record's raw type, parallel to `records`.
    slots: Vec<SmallVec<[TypeParamId; 2]>>,
    guard: RecursionGuard<TypeParamId>,
}

impl<'a> SymbolMatcher<'a> {
    pub fn new(
        table: &'a ClassTable,
        records: &'a [SupertypeRef],
        profile: RecursionProfile,
    ) -> Self {
        let slots = records
            .iter()
            .map(|record| table.type_params(record.raw))
            .collect();
        Self {
            table,
            records,
            slots,
            guard: RecursionGuard::with_profile(profile),
        }
    }

    /// Bind every declared symbol that some record supplies an argument for.
    ///
    /// Symbols no record binds are simply absent from the result. Later
    /// records overwrite earlier bindings of the same symbol. Any failure
    /// aborts the whole pass.
    pub fn match_all(mut self, declared: &[TypeParamId]) -> Result<Bindings, ResolutionError> {
        let mut bindings = Bindings::default();
        for record_index in 0..self.records.len() {
            for &symbol in declared {
                let Some(slot) = self.slot_index(record_index, symbol) else {
                    continue;
                };
                let class = self.bound_class(record_index, slot)?;
                trace!(
                    symbol = symbol.0,
                    record = self.records[record_index].raw.0,
                    slot,
                    class = class.0,
                    "SymbolMatcher::match_all - bound"
                );
                bindings.insert(symbol, class);
            }
        }
        Ok(bindings)
    }

    /// Position of `symbol` among the declared slots of the record's raw type.
    fn slot_index(&self, record_index: usize, symbol: TypeParamId) -> Option<usize> {
        self.slots[record_index].iter().position(|&slot| slot == symbol)
    }

    fn bound_class(&mut self, record_index: usize, slot: usize) -> Result<ClassId, ResolutionError> {
        let records = self.records;
        let record = &records[record_index];
        let Some(arg) = record.arg(slot) else {
            return Err(ResolutionError::NotParameterized {
                class: self.table.display_name(record.raw),
            });
        };
        match arg {
            TypeArg::Class(class) => Ok(*class),
            TypeArg::Param(param) => self.resolve_symbol(*param),
            TypeArg::Parameterized(nested) => Ok(nested.raw),
            TypeArg::Wildcard(_) | TypeArg::Array(_) => Err(ResolutionError::UnsupportedArgument {
                display: self.table.formatter().arg(arg),
            }),
        }
    }

    /// Resolve a symbol supplied as an argument by finding the first record
    /// whose raw type declares it.
    fn resolve_symbol(&mut self, symbol: TypeParamId) -> Result<ClassId, ResolutionError> {
        match self.guard.enter(symbol) {
            RecursionResult::Entered => {
                let result = self.follow_symbol(symbol);
                self.guard.leave(symbol);
                result
            }
            RecursionResult::Cycle => Err(ResolutionError::CyclicBinding {
                display: self.table.formatter().qualified_param(symbol),
            }),
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => {
                Err(ResolutionError::DepthExceeded {
                    display: self.table.formatter().qualified_param(symbol),
                })
            }
        }
    }

    fn follow_symbol(&mut self, symbol: TypeParamId) -> Result<ClassId, ResolutionError> {
        for record_index in 0..self.records.len() {
            if let Some(slot) = self.slot_index(record_index, symbol) {
                return self.bound_class(record_index, slot);
            }
        }
        Err(ResolutionError::UnboundParameter {
            param: symbol,
            display: self.table.formatter().qualified_param(symbol),
        })
    }
}

#[cfg(test)]
#[path = "../tests/matcher_tests.rs"]
mod tests;
