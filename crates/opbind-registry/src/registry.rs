//! Namespaced operator registry.
//!
//! `RegistryBuilder` is the only mutable form and exists only during the
//! discovery pass. `freeze` turns it into a `Registry`, which has no mutators
//! and can be shared across threads without locking.
//!
//! Invariants:
//! - `(namespace, function_name)` is unique.
//! - Every declared name maps to exactly one entry.
//! - Two declared names landing on the same slot are accepted only if they are
//!   the same engine operator (same handle and real name); the later one is
//!   recorded as an alias. Anything else is a `FunctionNameCollision`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use opbind_core::hash::{Hash256, SerdeHasher};
use opbind_core::prelude::*;
use opbind_engine::OperatorEngine;

use crate::delegator::{CallArgs, Delegator};

#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub namespace: NamespaceName,
    pub function_name: Ident,
    pub engine_handle: OpHandle,
    pub metadata: Arc<OperatorMetadata>,
    /// Further declared names the engine lists for this same operator.
    pub aliases: Vec<Ident>,
    delegator: Delegator,
}

impl RegistryEntry {
    pub fn delegator(&self) -> &Delegator {
        &self.delegator
    }

    pub fn call(&self, args: CallArgs) -> Result<Value> {
        self.delegator.call(args)
    }

    /// `namespace.function` as shown to users.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.namespace, self.function_name)
    }
}

type Slot = (NamespaceName, Ident);

#[derive(Default)]
struct Tables {
    entries: HashMap<Slot, RegistryEntry>,
    /// Binding order (engine listing order of each entry's first name).
    order: Vec<Slot>,
    by_declared: HashMap<Ident, (Slot, Arc<OperatorMetadata>)>,
}

/// Mutable registry used by the single discovery pass.
pub struct RegistryBuilder {
    engine: Arc<dyn OperatorEngine>,
    tables: Tables,
}

impl RegistryBuilder {
    pub fn new(engine: Arc<dyn OperatorEngine>) -> Self {
        Self {
            engine,
            tables: Tables::default(),
        }
    }

    /// Insert an operator and bind its delegator.
    ///
    /// Fails with `FunctionNameCollision` when the slot already belongs to a
    /// different operator, `DuplicateOperator` when the declared name is
    /// already present, or `MalformedOperatorDescriptor` when no delegator can
    /// be bound. A failed call leaves the builder unchanged.
    pub fn register(
        &mut self,
        namespace: NamespaceName,
        function_name: Ident,
        handle: OpHandle,
        metadata: OperatorMetadata,
    ) -> Result<()> {
        let declared = metadata.declared_name.clone();
        if self.tables.by_declared.contains_key(&declared) {
            return Err(Error::DuplicateOperator(declared));
        }

        let slot = (namespace, function_name.clone());
        let metadata = Arc::new(metadata);

        if let Some(existing) = self.tables.entries.get_mut(&slot) {
            let same_operator = existing.engine_handle == handle
                && existing.metadata.real_name == metadata.real_name;
            if !same_operator {
                return Err(Error::FunctionNameCollision {
                    namespace,
                    function: function_name,
                    existing: existing.metadata.declared_name.clone(),
                    incoming: declared,
                });
            }
            existing.aliases.push(declared.clone());
            self.tables.by_declared.insert(declared, (slot, metadata));
            return Ok(());
        }

        let delegator = Delegator::bind(
            Arc::clone(&self.engine),
            handle,
            Arc::clone(&metadata),
            function_name.clone(),
        )?;
        let entry = RegistryEntry {
            namespace,
            function_name,
            engine_handle: handle,
            metadata: Arc::clone(&metadata),
            aliases: Vec::new(),
            delegator,
        };
        self.tables.entries.insert(slot.clone(), entry);
        self.tables.order.push(slot.clone());
        self.tables.by_declared.insert(declared, (slot, metadata));
        Ok(())
    }

    /// Number of declared names registered so far.
    pub fn len(&self) -> usize {
        self.tables.by_declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.by_declared.is_empty()
    }

    pub fn freeze(self) -> Registry {
        Registry {
            engine: self.engine,
            tables: self.tables,
        }
    }
}

/// Frozen, read-only registry.
pub struct Registry {
    engine: Arc<dyn OperatorEngine>,
    tables: Tables,
}

impl Registry {
    pub fn engine(&self) -> &Arc<dyn OperatorEngine> {
        &self.engine
    }

    /// Metadata by declared name (textual or symbolic).
    pub fn lookup_metadata(&self, declared_name: impl Into<Ident>) -> Result<&OperatorMetadata> {
        let name = declared_name.into();
        self.tables
            .by_declared
            .get(&name)
            .map(|(_, meta)| meta.as_ref())
            .ok_or_else(|| Error::UnknownOperator(name.to_string()))
    }

    /// Metadata by exposed function name within a namespace.
    pub fn lookup(
        &self,
        namespace: NamespaceName,
        name: impl Into<Ident>,
    ) -> Result<&OperatorMetadata> {
        self.entry(namespace, name).map(|e| e.metadata.as_ref())
    }

    pub fn entry(&self, namespace: NamespaceName, name: impl Into<Ident>) -> Result<&RegistryEntry> {
        let slot = (namespace, name.into());
        self.tables
            .entries
            .get(&slot)
            .ok_or_else(|| Error::UnknownOperator(format!("{}.{}", slot.0, slot.1)))
    }

    pub fn delegator(&self, namespace: NamespaceName, name: impl Into<Ident>) -> Result<&Delegator> {
        self.entry(namespace, name).map(RegistryEntry::delegator)
    }

    /// Call `namespace.name` with `args`.
    pub fn call(
        &self,
        namespace: NamespaceName,
        name: impl Into<Ident>,
        args: CallArgs,
    ) -> Result<Value> {
        self.entry(namespace, name)?.call(args)
    }

    /// Every entry, in binding order.
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> + '_ {
        self.tables
            .order
            .iter()
            .filter_map(move |slot| self.tables.entries.get(slot))
    }

    /// Entries of one namespace, in binding order.
    pub fn namespace(&self, namespace: NamespaceName) -> impl Iterator<Item = &RegistryEntry> + '_ {
        self.entries().filter(move |e| e.namespace == namespace)
    }

    /// Namespaces holding at least one operator.
    pub fn namespaces(&self) -> Vec<NamespaceName> {
        NamespaceName::ALL
            .into_iter()
            .filter(|ns| self.namespace(*ns).next().is_some())
            .collect()
    }

    /// Number of bound functions (aliases not counted).
    pub fn len(&self) -> usize {
        self.tables.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.entries.is_empty()
    }

    /// Number of declared names, aliases included.
    pub fn declared_len(&self) -> usize {
        self.tables.by_declared.len()
    }

    /// Digest of every entry's route and metadata, in binding order.
    ///
    /// Handles are left out; they are process-specific.
    pub fn fingerprint(&self) -> Result<Hash256> {
        let mut h = SerdeHasher::new();
        for e in self.entries() {
            h.update(&(e.namespace, &e.function_name, e.metadata.as_ref(), &e.aliases))?;
        }
        Ok(h.finish())
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("functions", &self.len())
            .field("declared", &self.declared_len())
            .field("namespaces", &self.namespaces())
            .finish()
    }
}
