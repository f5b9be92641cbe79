//! Identifiers and opaque engine handles.
//!
//! Names coming from the engine or from callers are carried as [`Ident`], which
//! normalizes textual input once so every map in the registry is keyed on the
//! same canonical form. Handles are plain numeric tokens; this layer never
//! dereferences or releases them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Canonical identifier. Cheap to clone.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ident(Arc<str>);

impl Ident {
    /// Normalize textual input into the canonical form (surrounding whitespace trimmed).
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl Borrow<str> for Ident {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Ident {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Ident {
    fn from(s: &str) -> Self {
        Ident::new(s)
    }
}

impl From<String> for Ident {
    fn from(s: String) -> Self {
        Ident::new(&s)
    }
}

impl From<&String> for Ident {
    fn from(s: &String) -> Self {
        Ident::new(s)
    }
}

impl From<&Ident> for Ident {
    fn from(s: &Ident) -> Self {
        s.clone()
    }
}

impl Serialize for Ident {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Ident {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Ident::new(&s))
    }
}

macro_rules! new_handle {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Ord, PartialOrd,
        )]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(v: u64) -> Self {
                Self(v)
            }
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:#x})", stringify!($name), self.0)
            }
        }
    };
}

new_handle!(OpHandle);
new_handle!(ArrayHandle);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn textual_and_symbolic_forms_agree() {
        let sym = Ident::new("foo");
        assert_eq!(Ident::from("  foo\n"), sym);
        assert_eq!(Ident::from(String::from("foo")), sym);

        let mut map = HashMap::new();
        map.insert(sym.clone(), 1);
        assert_eq!(map.get("foo"), Some(&1));
    }

    #[test]
    fn handle_display_is_hex() {
        assert_eq!(OpHandle::new(255).to_string(), "OpHandle(0xff)");
    }
}
