//! Engine element types, as passed in an operator's `dtype` argument.
//!
//! Callers may give either the numeric type flag or a name; the engine is
//! always handed the canonical name.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    Float32,
    Float64,
    Float16,
    Uint8,
    Int32,
    Int8,
    Int64,
    Bool,
}

impl DType {
    /// Ordered by type flag.
    pub const ALL: [DType; 8] = [
        DType::Float32,
        DType::Float64,
        DType::Float16,
        DType::Uint8,
        DType::Int32,
        DType::Int8,
        DType::Int64,
        DType::Bool,
    ];

    pub fn id(self) -> i64 {
        self as i64
    }

    pub fn from_id(id: i64) -> Option<Self> {
        usize::try_from(id).ok().and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn name(self) -> &'static str {
        match self {
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Float16 => "float16",
            DType::Uint8 => "uint8",
            DType::Int32 => "int32",
            DType::Int8 => "int8",
            DType::Int64 => "int64",
            DType::Bool => "bool",
        }
    }

    /// Canonical name for a caller-supplied `dtype` value (type flag or name).
    pub fn normalize(value: &Value) -> Result<Value, String> {
        let dtype = match value {
            Value::Int(id) => {
                Self::from_id(*id).ok_or_else(|| format!("unknown dtype id {id}"))?
            }
            Value::Str(name) => name.parse::<Self>().map_err(|e| e.to_string())?,
            other => return Err(format!("wrong type of dtype: {other} (expected name or id)")),
        };
        Ok(Value::from(dtype.name()))
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for DType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let name = match name.as_str() {
            "float" => "float32",
            "double" => "float64",
            "half" => "float16",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|d| d.name() == name)
            .ok_or_else(|| Error::Config(format!("unknown dtype '{}'", s.trim())))
    }
}
