//! Block identifiers.
//!
//! An [`Id`] is a cheaply clonable, immutable string. Every [`Document`]
//! owns its identifiers outright, so documents built on different threads
//! never share any mutable state.
//!
//! [`Document`]: crate::semantic::Document

use std::{borrow::Borrow, fmt, ops::Deref, sync::Arc};

use serde::{Serialize, Serializer};

/// Identifier of a block or an edge.
///
/// # Examples
///
/// ```
/// use tessera_core::identifier::Id;
///
/// let id = Id::new("api");
/// assert_eq!(id, "api");
/// assert_eq!(id.suffixed(2), "api-2");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(Arc<str>);

impl Id {
    /// Creates an `Id` from a string slice.
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    /// The identifier of the implicit top-level composite.
    pub fn root() -> Self {
        Self::new(crate::semantic::ROOT_ID)
    }

    /// Returns a new identifier of the form `<self>-<index>`.
    pub fn suffixed(&self, index: usize) -> Self {
        Self(Arc::from(format!("{}-{index}", self.0)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Id {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Id {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Id {
    fn from(value: String) -> Self {
        Self(Arc::from(value))
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_id_equality() {
        assert_eq!(Id::new("a"), Id::from("a"));
        assert_ne!(Id::new("a"), Id::new("b"));
        assert_eq!(Id::root(), "root");
    }

    #[test]
    fn test_id_borrow_lookup() {
        let mut map = HashMap::new();
        map.insert(Id::new("node"), 1);
        assert_eq!(map.get("node"), Some(&1));
    }

    #[test]
    fn test_id_suffixed() {
        let id = Id::new("b");
        assert_eq!(id.suffixed(0), "b-0");
        assert_eq!(id.suffixed(12).to_string(), "b-12");
    }
}
