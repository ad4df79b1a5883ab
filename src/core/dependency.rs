//! Dependency names - references to pre-built link targets.
//!
//! A target names the libraries it links against; satisfying those names is
//! the Default Builder's (and ultimately the host's) business. The set is
//! forwarded exactly as declared: no defaults are injected and order means
//! nothing.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::feature::EmptyNameError;

/// Name of a library a target links against (e.g. `FBLAS`, `CLIB`).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DependencyName(Arc<str>);

impl DependencyName {
    /// Create a dependency name. Returns `None` for an empty string.
    pub fn new(name: impl AsRef<str>) -> Option<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            None
        } else {
            Some(DependencyName(Arc::from(name)))
        }
    }

    /// Get the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for DependencyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for DependencyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DependencyName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for DependencyName {
    type Err = EmptyNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DependencyName::new(s).ok_or(EmptyNameError("dependency name"))
    }
}

impl Serialize for DependencyName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DependencyName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The set of libraries a target requires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DependencySet(BTreeSet<DependencyName>);

impl DependencySet {
    /// Create an empty dependency set.
    pub fn new() -> Self {
        DependencySet(BTreeSet::new())
    }

    /// Parse whitespace-separated host notation, e.g. `"fitpack CLIB"`.
    pub fn parse(words: &str) -> Self {
        words
            .split_whitespace()
            .filter_map(DependencyName::new)
            .collect()
    }

    /// Add a dependency. Returns `false` if it was already present.
    pub fn insert(&mut self, name: DependencyName) -> bool {
        self.0.insert(name)
    }

    /// Builder-style insertion. Empty names are ignored.
    pub fn with(mut self, name: &str) -> Self {
        if let Some(name) = DependencyName::new(name) {
            self.0.insert(name);
        }
        self
    }

    /// Check whether a dependency is present.
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|d| d.as_str() == name)
    }

    /// Iterate over the names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &DependencyName> + '_ {
        self.0.iter()
    }

    /// Number of distinct dependencies.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<DependencyName> for DependencySet {
    fn from_iter<I: IntoIterator<Item = DependencyName>>(iter: I) -> Self {
        DependencySet(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for DependencySet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().filter_map(DependencyName::new).collect()
    }
}

impl<'a> IntoIterator for &'a DependencySet {
    type Item = &'a DependencyName;
    type IntoIter = std::collections::btree_set::Iter<'a, DependencyName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for DependencySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(DependencyName::as_str).collect();
        f.write_str(&names.join(" "))
    }
}
