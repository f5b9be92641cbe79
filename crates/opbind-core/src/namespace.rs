//! Namespace routing by real-name prefix.
//!
//! Rules, first match wins:
//! - `_contrib_X`  → Contrib, `x`
//! - `_linalg_X`   → Linalg, `x`
//! - `_sparse_X`   → Sparse, `x`
//! - `_internal_X` → Internal, `x`
//! - `_X`          → Internal, `_x` (leading underscore kept)
//! - `X`           → Default, `x`
//!
//! A marker with nothing after it does not match its rule, so function names
//! are never empty.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::ident::Ident;
use crate::metadata::OperatorMetadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NamespaceName {
    Default,
    Internal,
    Contrib,
    Linalg,
    Sparse,
}

impl NamespaceName {
    pub const ALL: [NamespaceName; 5] = [
        NamespaceName::Default,
        NamespaceName::Internal,
        NamespaceName::Contrib,
        NamespaceName::Linalg,
        NamespaceName::Sparse,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            NamespaceName::Default => "ops",
            NamespaceName::Internal => "internal",
            NamespaceName::Contrib => "contrib",
            NamespaceName::Linalg => "linalg",
            NamespaceName::Sparse => "sparse",
        }
    }
}

impl fmt::Display for NamespaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for NamespaceName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ops" | "default" => Ok(NamespaceName::Default),
            "internal" => Ok(NamespaceName::Internal),
            "contrib" => Ok(NamespaceName::Contrib),
            "linalg" => Ok(NamespaceName::Linalg),
            "sparse" => Ok(NamespaceName::Sparse),
            other => Err(Error::Config(format!("unknown namespace '{other}'"))),
        }
    }
}

/// Where an operator is exposed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    pub namespace: NamespaceName,
    pub function_name: Ident,
}

const PREFIXES: [(&str, NamespaceName); 4] = [
    ("_contrib_", NamespaceName::Contrib),
    ("_linalg_", NamespaceName::Linalg),
    ("_sparse_", NamespaceName::Sparse),
    ("_internal_", NamespaceName::Internal),
];

/// Route a real operator name. Pure and total.
pub fn route(real_name: &str) -> Route {
    let real_name = real_name.trim();
    for (prefix, namespace) in PREFIXES {
        if let Some(rest) = real_name.strip_prefix(prefix) {
            if !rest.is_empty() {
                return Route {
                    namespace,
                    function_name: Ident::new(&rest.to_lowercase()),
                };
            }
        }
    }

    let namespace = if real_name.starts_with('_') {
        NamespaceName::Internal
    } else {
        NamespaceName::Default
    };
    Route {
        namespace,
        function_name: Ident::new(&real_name.to_lowercase()),
    }
}

pub fn route_metadata(meta: &OperatorMetadata) -> Route {
    route(meta.real_name.as_str())
}
