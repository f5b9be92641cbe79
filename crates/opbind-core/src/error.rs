use thiserror::Error;

use crate::ident::Ident;
use crate::namespace::NamespaceName;

/// Canonical result for opbind.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The engine could not be reached at all. Fatal during initialization.
    #[error("engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    /// A native query failed for one operator. `message` is the engine's text, verbatim.
    #[error("engine query failed for operator '{operator}': {message}")]
    EngineQueryFailed { operator: String, message: String },

    #[error("malformed descriptor for operator '{operator}': {reason}")]
    MalformedOperatorDescriptor { operator: String, reason: String },

    #[error(
        "function name collision in namespace '{namespace}': '{function}' is claimed by both '{existing}' and '{incoming}'"
    )]
    FunctionNameCollision {
        namespace: NamespaceName,
        function: Ident,
        existing: Ident,
        incoming: Ident,
    },

    #[error("operator '{0}' is already registered")]
    DuplicateOperator(Ident),

    #[error("argument mismatch calling '{operator}': {reason}")]
    ArgumentMismatch { operator: Ident, reason: String },

    /// The engine accepted the call but failed executing it. `message` is verbatim.
    #[error("engine failed invoking '{operator}': {message}")]
    InvocationFailed { operator: String, message: String },

    #[error("operator registry is already initialized")]
    AlreadyInitialized,

    #[error("operator registry is not initialized")]
    NotInitialized,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("operator manifest error: {0}")]
    Manifest(String),

    #[error("hashing error: {0}")]
    Hash(String),
}

impl Error {
    pub fn argument_mismatch(operator: &Ident, reason: impl Into<String>) -> Self {
        Error::ArgumentMismatch {
            operator: operator.clone(),
            reason: reason.into(),
        }
    }

    pub fn malformed(operator: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedOperatorDescriptor {
            operator: operator.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Manifest(e.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Manifest(e.to_string())
    }
}
