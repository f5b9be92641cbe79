//! Engine query adapter.
//!
//! Implemented by `MemoryEngine` here and by native adapters elsewhere. All
//! calls are blocking and may hang if the engine hangs; there is no
//! cancellation.

use serde::{Deserialize, Serialize};

use opbind_core::prelude::*;

/// One argument as it is forwarded to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedArg {
    pub name: Ident,
    pub value: Value,
}

/// A fully resolved call, ready for the engine's generic invoke entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub handle: OpHandle,
    /// Declared name of the operator being called (for diagnostics).
    pub operator: Ident,
    /// Supplied arguments in declared order. Omitted arguments are absent.
    pub args: Vec<ResolvedArg>,
    /// Number of repeated inputs, for operators with a variadic count argument.
    pub implicit_count: Option<usize>,
    /// Explicit output arrays (`out=`), if the caller gave any.
    pub outputs: Option<Vec<Value>>,
}

impl Invocation {
    /// Argument values in forwarding order.
    pub fn values(&self) -> Vec<&Value> {
        self.args.iter().map(|a| &a.value).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.args
            .iter()
            .find(|a| a.name.as_str() == name)
            .map(|a| &a.value)
    }
}

/// The engine as seen by the binding layer.
pub trait OperatorEngine: Send + Sync {
    /// Every operator name the engine exposes, in engine order.
    /// Fails with `EngineUnavailable` if the engine is not reachable.
    fn list_operator_names(&self) -> Result<Vec<String>>;

    /// Look up the handle for a name. Fails with `UnknownOperator`.
    fn resolve_handle(&self, name: &str) -> Result<OpHandle>;

    /// Raw metadata for one operator. Fails with `EngineQueryFailed`, carrying
    /// the engine's message verbatim.
    fn fetch_metadata(&self, handle: OpHandle) -> Result<RawOperatorInfo>;

    /// Execute an operator. The result is passed through to the caller as is.
    fn invoke(&self, call: &Invocation) -> Result<Value>;
}
