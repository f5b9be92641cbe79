//! Convenient re-exports for downstream crates.

pub use crate::config::BindConfig;
pub use crate::dtype::DType;
pub use crate::error::{Error, Result};
pub use crate::ident::{ArrayHandle, Ident, OpHandle};
pub use crate::metadata::{ArgumentKind, OperatorArgument, OperatorMetadata, RawOperatorInfo};
pub use crate::namespace::{route, route_metadata, NamespaceName, Route};
pub use crate::value::Value;
