//! Human-readable rendering of classes, symbols and type arguments.
//!
//! Used for diagnostics: `Box<String>`, `Map<K, List<V>>`, `? extends Number`,
//! `String[]`.

use crate::ids::{ClassId, TypeParamId};
use crate::table::ClassTable;
use crate::types::{SupertypeRef, TypeArg, WildcardBound};
use std::fmt::Write;

/// Renders ids using the names recorded in a [`ClassTable`].
pub struct TypeFormatter<'a> {
    table: &'a ClassTable,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(table: &'a ClassTable) -> Self {
        Self { table }
    }

    /// `String`, or `class#N` for an id the table does not know.
    pub fn class(&self, id: ClassId) -> String {
        self.table.display_name(id)
    }

    /// The parameter's display name, e.g. `T`.
    pub fn param(&self, param: TypeParamId) -> String {
        self.table
            .type_param_info(param)
            .map(|info| info.name.to_string())
            .unwrap_or_else(|| param.to_string())
    }

    /// The parameter qualified by its declaring type, e.g. `T of Box`.
    pub fn qualified_param(&self, param: TypeParamId) -> String {
        match self.table.type_param_info(param) {
            Some(info) => format!("{} of {}", info.name, self.class(info.owner)),
            None => param.to_string(),
        }
    }

    pub fn supertype(&self, reference: &SupertypeRef) -> String {
        let mut out = self.class(reference.raw);
        if reference.is_parameterized() {
            out.push('<');
            for (i, arg) in reference.args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                self.write_arg(&mut out, arg);
            }
            out.push('>');
        }
        out
    }

    pub fn arg(&self, arg: &TypeArg) -> String {
        let mut out = String::new();
        self.write_arg(&mut out, arg);
        out
    }

    fn write_arg(&self, out: &mut String, arg: &TypeArg) {
        match arg {
            TypeArg::Class(class) => out.push_str(&self.class(*class)),
            TypeArg::Param(param) => out.push_str(&self.param(*param)),
            TypeArg::Parameterized(reference) => out.push_str(&self.supertype(reference)),
            TypeArg::Wildcard(WildcardBound::Unbounded) => out.push('?'),
            TypeArg::Wildcard(WildcardBound::Extends(bound)) => {
                let _ = write!(out, "? extends {}", self.arg(bound));
            }
            TypeArg::Wildcard(WildcardBound::Super(bound)) => {
                let _ = write!(out, "? super {}", self.arg(bound));
            }
            TypeArg::Array(element) => {
                self.write_arg(out, element);
                out.push_str("[]");
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
