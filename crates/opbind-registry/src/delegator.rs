//! Delegators: one callable per registered operator.
//!
//! A delegator matches a caller's positional and named values against the
//! operator's declared arguments, fills in the variadic count, and forwards the
//! resolved call to the engine. Checking is syntactic only; type strings are
//! the engine's business. Every rejection happens before the engine is called.

use std::fmt;
use std::sync::Arc;

use opbind_core::metadata::ArgumentKind;
use opbind_core::prelude::*;
use opbind_engine::{Invocation, OperatorEngine, ResolvedArg};

/// Keyword that receives explicit output arrays unless the operator declares it.
const OUT_KEYWORD: &str = "out";
/// Keyword accepted for symbol naming and dropped unless the operator declares it.
const NAME_KEYWORD: &str = "name";
/// Argument whose value is normalized to a canonical element type name.
const DTYPE_ARGUMENT: &str = "dtype";

/// Values supplied at a call site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    positional: Vec<Value>,
    named: Vec<(Ident, Value)>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    pub fn args<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.positional.extend(values.into_iter().map(Into::into));
        self
    }

    pub fn kwarg(mut self, name: impl Into<Ident>, value: impl Into<Value>) -> Self {
        self.named.push((name.into(), value.into()));
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn named(&self) -> &[(Ident, Value)] {
        &self.named
    }
}

/// Callable bound to one engine handle and its metadata.
#[derive(Clone)]
pub struct Delegator {
    engine: Arc<dyn OperatorEngine>,
    handle: OpHandle,
    metadata: Arc<OperatorMetadata>,
    function_name: Ident,
    /// Index of the argument collecting repeated inputs.
    repeated: Option<usize>,
    /// Index of the variadic count argument.
    count: Option<usize>,
    /// Index of the `dtype` argument.
    dtype: Option<usize>,
}

impl Delegator {
    /// Bind a delegator. Rejects operators declaring more than one repeated-input argument.
    pub fn bind(
        engine: Arc<dyn OperatorEngine>,
        handle: OpHandle,
        metadata: Arc<OperatorMetadata>,
        function_name: Ident,
    ) -> Result<Self> {
        let repeated_args = metadata
            .arguments
            .iter()
            .filter(|a| a.kind() == ArgumentKind::RepeatedInput)
            .count();
        if repeated_args > 1 {
            return Err(Error::malformed(
                metadata.declared_name.as_str(),
                "only one argument may take a variable number of inputs",
            ));
        }

        let count = metadata
            .variadic_count_argument
            .as_ref()
            .and_then(|name| metadata.position(name.as_str()));
        let repeated = metadata.repeated_input().filter(|&idx| Some(idx) != count);
        let dtype = metadata
            .position(DTYPE_ARGUMENT)
            .filter(|&idx| Some(idx) != repeated && Some(idx) != count);

        Ok(Self {
            engine,
            handle,
            metadata,
            function_name,
            repeated,
            count,
            dtype,
        })
    }

    pub fn handle(&self) -> OpHandle {
        self.handle
    }

    pub fn metadata(&self) -> &OperatorMetadata {
        &self.metadata
    }

    pub fn function_name(&self) -> &Ident {
        &self.function_name
    }

    pub fn signature(&self) -> String {
        self.metadata.signature(self.function_name.as_str())
    }

    /// Validate and resolve a call without reaching the engine.
    pub fn resolve(&self, call: CallArgs) -> Result<Invocation> {
        let meta = &*self.metadata;
        let operator = &meta.declared_name;
        let mut slots: Vec<Option<Value>> = vec![None; meta.arguments.len()];
        let mut outputs = None;

        let CallArgs { positional, named } = call;
        match self.repeated {
            Some(idx) => {
                if !positional.is_empty() {
                    slots[idx] = Some(Value::List(positional));
                }
            }
            None => {
                if positional.len() > meta.arguments.len() {
                    return Err(Error::argument_mismatch(
                        operator,
                        format!(
                            "takes at most {} positional arguments but {} were given",
                            meta.arguments.len(),
                            positional.len()
                        ),
                    ));
                }
                for (slot, value) in slots.iter_mut().zip(positional) {
                    if !value.is_none() {
                        *slot = Some(value);
                    }
                }
            }
        }

        for (name, value) in named {
            match meta.position(name.as_str()) {
                Some(idx) => {
                    if value.is_none() {
                        continue;
                    }
                    if slots[idx].is_some() {
                        return Err(Error::argument_mismatch(
                            operator,
                            format!("got multiple values for argument '{name}'"),
                        ));
                    }
                    let value = if Some(idx) == self.repeated {
                        Value::List(value.into_items())
                    } else {
                        value
                    };
                    slots[idx] = Some(value);
                }
                None if name.as_str() == OUT_KEYWORD => {
                    if !value.is_none() {
                        outputs = Some(value.into_items());
                    }
                }
                None if name.as_str() == NAME_KEYWORD => {}
                None => {
                    return Err(Error::argument_mismatch(
                        operator,
                        format!("unexpected keyword argument '{name}'"),
                    ));
                }
            }
        }

        if let Some(idx) = self.dtype {
            if let Some(value) = slots[idx].take() {
                let value = DType::normalize(&value)
                    .map_err(|reason| Error::argument_mismatch(operator, reason))?;
                slots[idx] = Some(value);
            }
        }

        let implicit_count = match self.count {
            Some(count_idx) => {
                let supplied = self
                    .repeated
                    .and_then(|idx| slots[idx].as_ref())
                    .map(|v| match v {
                        Value::List(items) => items.len(),
                        _ => 1,
                    })
                    .unwrap_or(0);
                if let Some(explicit) = &slots[count_idx] {
                    if explicit.as_int() != Some(supplied as i64) {
                        return Err(Error::argument_mismatch(
                            operator,
                            format!(
                                "'{}' is inferred as {supplied} from the inputs but {explicit} was given",
                                meta.arguments[count_idx].name
                            ),
                        ));
                    }
                }
                slots[count_idx] = Some(Value::from(supplied));
                Some(supplied)
            }
            None => None,
        };

        let args = meta
            .arguments
            .iter()
            .zip(slots)
            .filter_map(|(arg, slot)| {
                slot.map(|value| ResolvedArg {
                    name: arg.name.clone(),
                    value,
                })
            })
            .collect();

        Ok(Invocation {
            handle: self.handle,
            operator: operator.clone(),
            args,
            implicit_count,
            outputs,
        })
    }

    /// Resolve the call and forward it to the engine. The engine's result is returned as is.
    pub fn call(&self, call: CallArgs) -> Result<Value> {
        let invocation = self.resolve(call).map_err(|e| {
            tracing::debug!(function = %self.function_name, error = %e, "rejected call");
            e
        })?;
        tracing::debug!(
            function = %self.function_name,
            handle = %self.handle,
            args = invocation.args.len(),
            implicit_count = ?invocation.implicit_count,
            "invoking operator"
        );
        self.engine.invoke(&invocation)
    }
}

impl fmt::Debug for Delegator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegator")
            .field("function_name", &self.function_name)
            .field("handle", &self.handle)
            .field("operator", &self.metadata.declared_name)
            .finish()
    }
}
