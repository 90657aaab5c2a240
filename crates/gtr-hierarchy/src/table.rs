//! Class table: storage for classes, interfaces and their supertype edges.
//!
//! The table plays the role the runtime class metadata plays in a language
//! with erased generics. Every class records:
//!
//! - its declared type-parameter symbols (one `TypeParamId` per slot),
//! - its *generic* superclass, i.e. the superclass together with the type
//!   arguments supplied at the `extends` clause,
//! - its generic interfaces, in declaration order.
//!
//! Two built-ins are registered by [`ClassTable::new`]:
//!
//! | Built-in | Shape | Purpose |
//! |----------|-------|---------|
//! | `Object` | class, no params | root of every superclass chain |
//! | `TypeResolver<T>` | class, one param | base of every resolver site |
//!
//! Edges are validated on insertion, so a table is always acyclic and every
//! parameterized edge has the right number of arguments.

use crate::error::HierarchyError;
use crate::format::TypeFormatter;
use crate::ids::{ClassId, TypeParamId};
use crate::types::{SupertypeRef, TypeArg, WildcardBound};
use dashmap::DashMap;
use rustc_hash::FxHashSet;
use serde::Serialize;
use smallvec::SmallVec;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

/// Global counter for assigning instance IDs to `ClassTable` instances.
static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(1);

/// Name of the root object class.
pub const OBJECT_NAME: &str = "Object";

/// Name of the resolver base class.
pub const RESOLVER_BASE_NAME: &str = "TypeResolver";

// =============================================================================
// Class metadata
// =============================================================================

/// Whether a table entry is a class or an interface.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ClassKind {
    Class,
    Interface,
}

/// Metadata of one declared type parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TypeParamInfo {
    /// Display name (`T`). Not unique.
    pub name: Arc<str>,
    /// Class or interface that declares the parameter.
    pub owner: ClassId,
    /// Slot position in the owner's parameter list.
    pub index: usize,
}

/// Everything the table knows about a class or interface.
#[derive(Clone, Debug)]
pub struct ClassInfo {
    pub kind: ClassKind,
    pub name: Arc<str>,
    pub anonymous: bool,
    pub type_params: SmallVec<[TypeParamId; 2]>,
    /// Generic superclass. `None` for interfaces and for `Object`.
    pub superclass: Option<SupertypeRef>,
    /// Generic interfaces (extended interfaces, for an interface).
    pub interfaces: Vec<SupertypeRef>,
    /// Supertypes are frozen. Set by [`ClassTable::seal`] and for anonymous
    /// classes at creation.
    pub sealed: bool,
}

/// Declaration of a named class or interface.
///
/// ```ignore
/// let table = ClassTable::new();
/// let boxed = table.declare(ClassDecl::class("Box").with_type_params(["T"]));
/// let t = table.type_param(boxed, "T").expect("declared above");
/// ```
#[derive(Clone, Debug)]
pub struct ClassDecl {
    kind: ClassKind,
    name: String,
    type_params: Vec<String>,
}

impl ClassDecl {
    /// Declare a class. Its superclass defaults to `Object`.
    pub fn class(name: impl Into<String>) -> Self {
        Self {
            kind: ClassKind::Class,
            name: name.into(),
            type_params: Vec::new(),
        }
    }

    /// Declare an interface.
    pub fn interface(name: impl Into<String>) -> Self {
        Self {
            kind: ClassKind::Interface,
            name: name.into(),
            type_params: Vec::new(),
        }
    }

    /// Set the declared type parameter names, in slot order.
    pub fn with_type_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_params = names.into_iter().map(Into::into).collect();
        self
    }
}

// =============================================================================
// ClassTable
// =============================================================================

/// Thread-safe storage for classes, interfaces and type parameters.
///
/// Uses `DashMap` so that tables can be populated and queried from several
/// threads; all methods take `&self`.
pub struct ClassTable {
    /// Instance ID for debugging.
    instance_id: u64,
    classes: DashMap<ClassId, ClassInfo>,
    type_params: DashMap<TypeParamId, TypeParamInfo>,
    object: ClassId,
    resolver_base: ClassId,
}

impl Default for ClassTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassTable {
    /// Create a table holding only the built-in `Object` and `TypeResolver<T>`.
    pub fn new() -> Self {
        let instance_id = NEXT_TABLE_ID.fetch_add(1, Ordering::Relaxed);
        let mut table = Self {
            instance_id,
            classes: DashMap::new(),
            type_params: DashMap::new(),
            object: ClassId::INVALID,
            resolver_base: ClassId::INVALID,
        };

        table.object = table.insert(ClassKind::Class, OBJECT_NAME.into(), &[], None);
        let object = SupertypeRef::raw(table.object);
        table.resolver_base = table.insert(
            ClassKind::Class,
            RESOLVER_BASE_NAME.into(),
            &["T".to_string()],
            Some(object),
        );

        trace!(
            instance_id,
            object = table.object.0,
            resolver_base = table.resolver_base.0,
            "ClassTable::new"
        );
        table
    }

    /// The root object class.
    #[inline]
    pub fn object(&self) -> ClassId {
        self.object
    }

    /// The resolver base class `TypeResolver<T>`.
    #[inline]
    pub fn resolver_base(&self) -> ClassId {
        self.resolver_base
    }

    /// Debug identifier of this table instance.
    #[inline]
    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    /// A formatter rendering ids and arguments with this table's names.
    pub fn formatter(&self) -> TypeFormatter<'_> {
        TypeFormatter::new(self)
    }

    // -------------------------------------------------------------------------
    // Declaration
    // -------------------------------------------------------------------------

    /// Register a named class or interface and return its id.
    ///
    /// Classes start with the raw superclass `Object`; interfaces start with
    /// no supertypes. Use [`extend`](Self::extend) and
    /// [`implement`](Self::implement) to add edges.
    pub fn declare(&self, decl: ClassDecl) -> ClassId {
        let superclass = match decl.kind {
            ClassKind::Class => Some(SupertypeRef::raw(self.object)),
            ClassKind::Interface => None,
        };
        self.insert(
            decl.kind,
            decl.name.into(),
            &decl.type_params,
            superclass,
        )
    }

    /// Register an anonymous class directly deriving from `base<args>`.
    ///
    /// Models `new Base<Args>() { ... }`. When `base` is an interface the
    /// anonymous class extends `Object` and implements `base<args>`.
    pub fn anonymous_subclass(
        &self,
        base: ClassId,
        args: impl IntoIterator<Item = TypeArg>,
    ) -> Result<ClassId, HierarchyError> {
        let supertype = SupertypeRef::new(base, args);
        self.validate_ref(&supertype)?;
        let kind = self.kind(base).ok_or(HierarchyError::UnknownClass(base))?;

        let id = ClassId::fresh();
        let name: Arc<str> = format!("<anonymous #{}>", id.0).into();
        let (superclass, interfaces) = match kind {
            ClassKind::Class => (Some(supertype), Vec::new()),
            ClassKind::Interface => (Some(SupertypeRef::raw(self.object)), vec![supertype]),
        };
        trace!(
            instance_id = self.instance_id,
            class_id = id.0,
            base = base.0,
            "ClassTable::anonymous_subclass"
        );
        self.classes.insert(
            id,
            ClassInfo {
                kind: ClassKind::Class,
                name,
                anonymous: true,
                type_params: SmallVec::new(),
                superclass,
                interfaces,
                sealed: true,
            },
        );
        Ok(id)
    }

    /// Register a resolver site: an anonymous subclass of `TypeResolver<arg>`.
    ///
    /// Inside a generic class `Box<T>`, the site for resolving `T` is
    /// `resolver_site(TypeArg::Param(t))`.
    pub fn resolver_site(&self, arg: TypeArg) -> Result<ClassId, HierarchyError> {
        self.anonymous_subclass(self.resolver_base, [arg])
    }

    fn insert(
        &self,
        kind: ClassKind,
        name: Arc<str>,
        param_names: &[String],
        superclass: Option<SupertypeRef>,
    ) -> ClassId {
        let id = ClassId::fresh();
        let type_params = param_names
            .iter()
            .enumerate()
            .map(|(index, param_name)| {
                let param = TypeParamId::fresh();
                self.type_params.insert(
                    param,
                    TypeParamInfo {
                        name: param_name.as_str().into(),
                        owner: id,
                        index,
                    },
                );
                param
            })
            .collect();

        trace!(
            instance_id = self.instance_id,
            class_id = id.0,
            name = %name,
            kind = ?kind,
            "ClassTable::declare"
        );
        self.classes.insert(
            id,
            ClassInfo {
                kind,
                name,
                anonymous: false,
                type_params,
                superclass,
                interfaces: Vec::new(),
                sealed: false,
            },
        );
        id
    }

    // -------------------------------------------------------------------------
    // Edges
    // -------------------------------------------------------------------------

    /// Set the generic superclass of `class`.
    ///
    /// A class has one superclass: this only replaces the default `Object`.
    pub fn extend(&self, class: ClassId, superclass: SupertypeRef) -> Result<(), HierarchyError> {
        let info = self.get(class).ok_or(HierarchyError::UnknownClass(class))?;
        self.check_mutable(class)?;
        self.check_superclass_unset(&info)?;
        if info.kind == ClassKind::Interface {
            return Err(HierarchyError::InterfaceCannotExtend {
                name: info.name.to_string(),
            });
        }
        self.validate_ref(&superclass)?;
        if self.kind(superclass.raw) == Some(ClassKind::Interface) {
            return Err(HierarchyError::NotAClass {
                name: self.display_name(superclass.raw),
            });
        }
        self.check_cycle(class, superclass.raw)?;

        trace!(
            instance_id = self.instance_id,
            class_id = class.0,
            superclass = superclass.raw.0,
            args = superclass.args.len(),
            "ClassTable::extend"
        );
        let mut entry = self
            .classes
            .get_mut(&class)
            .ok_or(HierarchyError::UnknownClass(class))?;
        // Re-checked under the entry lock: a concurrent seal or extend may
        // have won since the checks above. No other entry may be read while
        // the lock is held.
        self.check_unsealed(&entry)?;
        if entry
            .superclass
            .as_ref()
            .is_some_and(|current| current.raw != self.object)
        {
            let current = ClassInfo::clone(&entry);
            drop(entry);
            return self.check_superclass_unset(&current);
        }
        entry.superclass = Some(superclass);
        Ok(())
    }

    /// Append a generic interface to `class`.
    ///
    /// For an interface this adds an extended super-interface.
    pub fn implement(&self, class: ClassId, interface: SupertypeRef) -> Result<(), HierarchyError> {
        if !self.contains(class) {
            return Err(HierarchyError::UnknownClass(class));
        }
        self.check_mutable(class)?;
        self.validate_ref(&interface)?;
        if self.kind(interface.raw) != Some(ClassKind::Interface) {
            return Err(HierarchyError::NotAnInterface {
                name: self.display_name(interface.raw),
            });
        }
        self.check_cycle(class, interface.raw)?;

        trace!(
            instance_id = self.instance_id,
            class_id = class.0,
            interface = interface.raw.0,
            args = interface.args.len(),
            "ClassTable::implement"
        );
        if let Some(mut entry) = self.classes.get_mut(&class) {
            self.check_unsealed(&entry)?;
            entry.interfaces.push(interface);
        }
        Ok(())
    }

    fn check_mutable(&self, class: ClassId) -> Result<(), HierarchyError> {
        if class == self.object || class == self.resolver_base {
            return Err(HierarchyError::BuiltinImmutable {
                name: self.display_name(class),
            });
        }
        match self.classes.get(&class) {
            Some(entry) => self.check_unsealed(&entry),
            None => Err(HierarchyError::UnknownClass(class)),
        }
    }

    fn check_unsealed(&self, info: &ClassInfo) -> Result<(), HierarchyError> {
        if info.sealed {
            return Err(HierarchyError::Sealed {
                name: info.name.to_string(),
            });
        }
        Ok(())
    }

    fn check_superclass_unset(&self, info: &ClassInfo) -> Result<(), HierarchyError> {
        match &info.superclass {
            Some(current) if current.raw != self.object => {
                Err(HierarchyError::SuperclassAlreadySet {
                    name: info.name.to_string(),
                    superclass: self.formatter().supertype(current),
                })
            }
            _ => Ok(()),
        }
    }

    // -------------------------------------------------------------------------
    // Sealing
    // -------------------------------------------------------------------------

    /// Freeze the supertypes of `class` and of every ancestor.
    ///
    /// Once sealed, `extend` and `implement` on these classes fail with
    /// [`HierarchyError::Sealed`]. The resolver seals a provider before
    /// walking it, so bindings cached for the provider stay valid.
    pub fn seal(&self, class: ClassId) {
        let mut pending = vec![class];
        let mut seen = FxHashSet::default();
        while let Some(id) = pending.pop() {
            if !seen.insert(id) {
                continue;
            }
            let Some(mut entry) = self.classes.get_mut(&id) else {
                continue;
            };
            entry.sealed = true;
            pending.extend(entry.superclass.iter().map(|s| s.raw));
            pending.extend(entry.interfaces.iter().map(|i| i.raw));
        }
        trace!(
            instance_id = self.instance_id,
            class_id = class.0,
            sealed = seen.len(),
            "ClassTable::seal"
        );
    }

    /// Whether the supertypes of `id` are frozen.
    pub fn is_sealed(&self, id: ClassId) -> bool {
        self.classes.get(&id).is_some_and(|r| r.sealed)
    }

    fn check_cycle(&self, child: ClassId, parent: ClassId) -> Result<(), HierarchyError> {
        if parent == child || self.is_derived_from(parent, child) {
            return Err(HierarchyError::InheritanceCycle {
                child: self.display_name(child),
                parent: self.display_name(parent),
            });
        }
        Ok(())
    }

    /// Check that `reference` names known types with matching arity, recursively.
    fn validate_ref(&self, reference: &SupertypeRef) -> Result<(), HierarchyError> {
        let info = self
            .get(reference.raw)
            .ok_or(HierarchyError::UnknownClass(reference.raw))?;
        if reference.is_parameterized() && reference.args.len() != info.type_params.len() {
            return Err(HierarchyError::ArityMismatch {
                raw: info.name.to_string(),
                expected: info.type_params.len(),
                found: reference.args.len(),
            });
        }
        reference
            .args
            .iter()
            .try_for_each(|arg| self.validate_arg(arg))
    }

    fn validate_arg(&self, arg: &TypeArg) -> Result<(), HierarchyError> {
        match arg {
            TypeArg::Class(class) => {
                if self.contains(*class) {
                    Ok(())
                } else {
                    Err(HierarchyError::UnknownClass(*class))
                }
            }
            TypeArg::Param(param) => {
                if self.type_params.contains_key(param) {
                    Ok(())
                } else {
                    Err(HierarchyError::UnknownTypeParam(*param))
                }
            }
            TypeArg::Parameterized(reference) => self.validate_ref(reference),
            TypeArg::Wildcard(WildcardBound::Unbounded) => Ok(()),
            TypeArg::Wildcard(WildcardBound::Extends(bound) | WildcardBound::Super(bound)) => {
                self.validate_arg(bound)
            }
            TypeArg::Array(element) => self.validate_arg(element),
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Get class info by id.
    pub fn get(&self, id: ClassId) -> Option<ClassInfo> {
        self.classes.get(&id).map(|r| r.clone())
    }

    /// Check if a class id belongs to this table.
    pub fn contains(&self, id: ClassId) -> bool {
        self.classes.contains_key(&id)
    }

    /// Get the kind of a class.
    pub fn kind(&self, id: ClassId) -> Option<ClassKind> {
        self.classes.get(&id).map(|r| r.kind)
    }

    /// Get the name of a class.
    pub fn name(&self, id: ClassId) -> Option<Arc<str>> {
        self.classes.get(&id).map(|r| r.name.clone())
    }

    /// Name for diagnostics; falls back to the raw id for unknown classes.
    pub fn display_name(&self, id: ClassId) -> String {
        self.name(id)
            .map(|name| name.to_string())
            .unwrap_or_else(|| id.to_string())
    }

    /// Whether the class was registered through [`anonymous_subclass`](Self::anonymous_subclass).
    pub fn is_anonymous(&self, id: ClassId) -> bool {
        self.classes.get(&id).is_some_and(|r| r.anonymous)
    }

    /// Declared type parameters of a class, in slot order.
    pub fn type_params(&self, id: ClassId) -> SmallVec<[TypeParamId; 2]> {
        self.classes
            .get(&id)
            .map(|r| r.type_params.clone())
            .unwrap_or_default()
    }

    /// Look up a declared type parameter of `class` by display name.
    pub fn type_param(&self, class: ClassId, name: &str) -> Option<TypeParamId> {
        self.type_params(class).into_iter().find(|param| {
            self.type_params
                .get(param)
                .is_some_and(|info| &*info.name == name)
        })
    }

    /// Metadata of a type parameter.
    pub fn type_param_info(&self, param: TypeParamId) -> Option<TypeParamInfo> {
        self.type_params.get(&param).map(|r| r.clone())
    }

    /// Raw superclass, if any.
    pub fn superclass(&self, id: ClassId) -> Option<ClassId> {
        self.classes
            .get(&id)
            .and_then(|r| r.superclass.as_ref().map(|s| s.raw))
    }

    /// Generic superclass, including the arguments supplied at `extends`.
    pub fn generic_superclass(&self, id: ClassId) -> Option<SupertypeRef> {
        self.classes.get(&id).and_then(|r| r.superclass.clone())
    }

    /// Generic interfaces, in declaration order.
    pub fn generic_interfaces(&self, id: ClassId) -> Vec<SupertypeRef> {
        self.classes
            .get(&id)
            .map(|r| r.interfaces.clone())
            .unwrap_or_default()
    }

    /// Raw interfaces, in declaration order.
    pub fn interfaces(&self, id: ClassId) -> Vec<ClassId> {
        self.classes
            .get(&id)
            .map(|r| r.interfaces.iter().map(|i| i.raw).collect())
            .unwrap_or_default()
    }

    /// Check if `child` transitively derives from `ancestor` (class or interface).
    ///
    /// A type does not derive from itself.
    pub fn is_derived_from(&self, child: ClassId, ancestor: ClassId) -> bool {
        let mut visited = FxHashSet::default();
        let mut stack: Vec<ClassId> = self.direct_supertypes(child);
        while let Some(current) = stack.pop() {
            if current == ancestor {
                return true;
            }
            if visited.insert(current) {
                stack.extend(self.direct_supertypes(current));
            }
        }
        false
    }

    fn direct_supertypes(&self, id: ClassId) -> Vec<ClassId> {
        self.classes
            .get(&id)
            .map(|r| {
                r.superclass
                    .iter()
                    .chain(r.interfaces.iter())
                    .map(|s| s.raw)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of classes and interfaces, built-ins included.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Always `false`: the built-ins are registered on construction.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/table_tests.rs"]
mod tests;
