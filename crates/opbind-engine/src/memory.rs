//! In-process engine backed by a table of raw operator descriptors.
//!
//! Used by tests, the CLI and benches in place of a native engine. Operators
//! keep insertion order, so `list_operator_names` is deterministic. Every
//! invocation is recorded so callers can check what actually reached the
//! engine.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use opbind_core::prelude::*;

use crate::api::{Invocation, OperatorEngine};

/// Operator body: receives the resolved call, returns a value or an engine message.
pub type Kernel = Arc<dyn Fn(&Invocation) -> KernelResult + Send + Sync>;

/// Kernel outcome; the error string is reported verbatim as the engine's message.
pub type KernelResult = std::result::Result<Value, String>;

const HANDLE_BASE: u64 = 0x7f00_0000_1000;
const HANDLE_STRIDE: u64 = 0x40;

struct MemoryOp {
    raw: RawOperatorInfo,
    kernel: Option<Kernel>,
    metadata_failure: Option<String>,
}

pub struct MemoryEngine {
    names: Vec<String>,
    handles: HashMap<String, OpHandle>,
    ops: Vec<MemoryOp>,
    unresolvable: HashSet<String>,
    available: bool,
    calls: Mutex<Vec<Invocation>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            handles: HashMap::new(),
            ops: Vec::new(),
            unresolvable: HashSet::new(),
            available: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Builder form of [`MemoryEngine::add_operator`].
    pub fn with_operator(mut self, name: &str, raw: RawOperatorInfo) -> Self {
        self.add_operator(name, raw);
        self
    }

    /// Builder form of [`MemoryEngine::set_kernel`].
    ///
    /// # Panics
    ///
    /// If no operator is registered under `name`.
    pub fn with_kernel<F>(mut self, name: &str, kernel: F) -> Self
    where
        F: Fn(&Invocation) -> KernelResult + Send + Sync + 'static,
    {
        if let Err(e) = self.set_kernel(name, Arc::new(kernel)) {
            panic!("with_kernel: {e}");
        }
        self
    }

    /// Register an operator under `name`. Re-adding a name replaces its descriptor.
    pub fn add_operator(&mut self, name: &str, raw: RawOperatorInfo) -> OpHandle {
        if let Some(&handle) = self.handles.get(name) {
            let idx = self.index_of(handle).unwrap_or_default();
            self.ops[idx].raw = raw;
            return handle;
        }
        let handle = OpHandle::new(HANDLE_BASE + self.ops.len() as u64 * HANDLE_STRIDE);
        self.ops.push(MemoryOp {
            raw,
            kernel: None,
            metadata_failure: None,
        });
        self.names.push(name.to_string());
        self.handles.insert(name.to_string(), handle);
        handle
    }

    /// List `alias` as another name for the operator registered as `target`.
    pub fn add_alias(&mut self, alias: &str, target: &str) -> Result<OpHandle> {
        let handle = *self
            .handles
            .get(target)
            .ok_or_else(|| Error::UnknownOperator(target.to_string()))?;
        if !self.handles.contains_key(alias) {
            self.names.push(alias.to_string());
        }
        self.handles.insert(alias.to_string(), handle);
        Ok(handle)
    }

    pub fn set_kernel(&mut self, name: &str, kernel: Kernel) -> Result<()> {
        let idx = self.op_index(name)?;
        self.ops[idx].kernel = Some(kernel);
        Ok(())
    }

    /// Make `fetch_metadata` fail for `name` with `message`.
    pub fn fail_metadata(&mut self, name: &str, message: &str) -> Result<()> {
        let idx = self.op_index(name)?;
        self.ops[idx].metadata_failure = Some(message.to_string());
        Ok(())
    }

    /// Keep `name` in the listing but refuse to resolve it.
    pub fn make_unresolvable(&mut self, name: &str) {
        self.unresolvable.insert(name.to_string());
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Snapshot of every invocation that reached the engine, oldest first.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn op_index(&self, name: &str) -> Result<usize> {
        self.handles
            .get(name)
            .and_then(|&h| self.index_of(h))
            .ok_or_else(|| Error::UnknownOperator(name.to_string()))
    }

    fn index_of(&self, handle: OpHandle) -> Option<usize> {
        let offset = handle.get().checked_sub(HANDLE_BASE)?;
        if offset % HANDLE_STRIDE != 0 {
            return None;
        }
        let idx = (offset / HANDLE_STRIDE) as usize;
        (idx < self.ops.len()).then_some(idx)
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(Error::EngineUnavailable("engine is not initialized".into()))
        }
    }
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OperatorEngine for MemoryEngine {
    fn list_operator_names(&self) -> Result<Vec<String>> {
        self.ensure_available()?;
        Ok(self.names.clone())
    }

    fn resolve_handle(&self, name: &str) -> Result<OpHandle> {
        self.ensure_available()?;
        if self.unresolvable.contains(name) {
            return Err(Error::UnknownOperator(name.to_string()));
        }
        self.handles
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownOperator(name.to_string()))
    }

    fn fetch_metadata(&self, handle: OpHandle) -> Result<RawOperatorInfo> {
        self.ensure_available()?;
        let op = self
            .index_of(handle)
            .map(|idx| &self.ops[idx])
            .ok_or_else(|| Error::EngineQueryFailed {
                operator: handle.to_string(),
                message: "invalid operator handle".into(),
            })?;
        if let Some(message) = &op.metadata_failure {
            return Err(Error::EngineQueryFailed {
                operator: op.raw.real_name.clone(),
                message: message.clone(),
            });
        }
        Ok(op.raw.clone())
    }

    fn invoke(&self, call: &Invocation) -> Result<Value> {
        self.ensure_available()?;
        let op = self
            .index_of(call.handle)
            .map(|idx| &self.ops[idx])
            .ok_or_else(|| Error::UnknownOperator(call.handle.to_string()))?;

        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call.clone());

        let kernel = op.kernel.as_ref().ok_or_else(|| Error::InvocationFailed {
            operator: op.raw.real_name.clone(),
            message: "no kernel registered".into(),
        })?;
        kernel(call).map_err(|message| Error::InvocationFailed {
            operator: op.raw.real_name.clone(),
            message,
        })
    }
}

/// Kernels selectable by name from a manifest.
///
/// - `echo`: returns the forwarded argument values as a list.
/// - `first`: returns the first forwarded value (or `None`).
/// - `count`: returns the implicit count, or the number of forwarded values.
pub fn builtin_kernel(name: &str) -> Option<Kernel> {
    let kernel: Kernel = match name {
        "echo" => Arc::new(|call: &Invocation| -> KernelResult {
            Ok(Value::List(call.values().into_iter().cloned().collect()))
        }),
        "first" => Arc::new(|call: &Invocation| -> KernelResult {
            Ok(call.values().first().map(|v| (*v).clone()).unwrap_or(Value::None))
        }),
        "count" => Arc::new(|call: &Invocation| -> KernelResult {
            Ok(Value::from(call.implicit_count.unwrap_or(call.args.len())))
        }),
        _ => return None,
    };
    Some(kernel)
}
