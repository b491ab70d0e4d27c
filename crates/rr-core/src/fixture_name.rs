//! Strongly-typed fixture name wrapper.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Unique identifier for a fixture.
///
/// Keeps fixture names from being mixed up with table names or SQL text.
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FixtureName(String);

impl FixtureName {
    /// Create a new `FixtureName`, panicking if the name is empty.
    ///
    /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
    pub fn new(name: impl Into<String>) -> Self {
        let s = name.into();
        assert!(!s.is_empty(), "FixtureName must not be empty");
        Self(s)
    }

    /// Try to create a new `FixtureName`, returning `None` if the name is empty.
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let s = name.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl<'de> Deserialize<'de> for FixtureName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        FixtureName::try_new(s)
            .ok_or_else(|| serde::de::Error::custom("FixtureName must not be empty"))
    }
}

impl fmt::Display for FixtureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FixtureName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for FixtureName {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for FixtureName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FixtureName {
    type Error = &'static str;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::try_new(s).ok_or("FixtureName must not be empty")
    }
}

impl TryFrom<&str> for FixtureName {
    type Error = &'static str;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::try_new(s).ok_or("FixtureName must not be empty")
    }
}

impl PartialEq<str> for FixtureName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FixtureName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<String> for FixtureName {
    fn eq(&self, other: &String) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_name_try_new_rejects_empty() {
        assert!(FixtureName::try_new("").is_none());
        assert_eq!(FixtureName::try_new("int2").unwrap(), "int2");
    }

    #[test]
    fn test_fixture_name_try_from_rejects_empty() {
        assert!(FixtureName::try_from("").is_err());
        assert!(FixtureName::try_from(String::new()).is_err());
        let name = FixtureName::try_from("float8").unwrap();
        assert_eq!(name, "float8".to_string());
    }

    #[test]
    #[should_panic(expected = "FixtureName must not be empty")]
    fn test_fixture_name_new_panics_on_empty() {
        FixtureName::new("");
    }

    #[test]
    fn test_fixture_name_display() {
        let name = FixtureName::new("test_setup");
        assert_eq!(format!("{}", name), "test_setup");
    }

    #[test]
    fn test_fixture_name_borrow_lookup() {
        use std::collections::HashMap;
        let mut map: HashMap<FixtureName, i32> = HashMap::new();
        map.insert(FixtureName::new("int4"), 4);
        assert_eq!(map.get("int4"), Some(&4));
    }

    #[test]
    fn test_fixture_name_deserialize_rejects_empty() {
        let ok: FixtureName = serde_yaml::from_str("int8").unwrap();
        assert_eq!(ok, "int8");
        let err = serde_yaml::from_str::<FixtureName>("''");
        assert!(err.is_err());
    }
}
