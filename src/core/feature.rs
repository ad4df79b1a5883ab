//! Feature tags - toolchain and capability selectors attached to a target.
//!
//! A feature tag is an opaque string. This crate only aggregates and forwards
//! sets of tags; interpreting them is the Default Builder's job. The
//! well-known vocabulary below is what [`StandardBuilder`] understands out of
//! the box, and hosts may extend it.
//!
//! [`StandardBuilder`]: crate::builder::StandardBuilder

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Well-known feature tag strings.
pub mod tags {
    /// Compile C sources.
    pub const COMPILE_C: &str = "compile-C";
    /// Compile C++ sources.
    pub const COMPILE_CXX: &str = "compile-C++";
    /// Compile Fortran sources.
    pub const COMPILE_FORTRAN: &str = "compile-Fortran";
    /// Produce a loadable shared extension module.
    pub const BUILD_SHARED_EXTENSION: &str = "build-shared-extension";
    /// Produce a static library.
    pub const BUILD_STATIC_LIBRARY: &str = "build-static-library";
    /// Generate a native-extension wrapper from Fortran subroutine signatures.
    pub const WRAP_FORTRAN_AS_EXTENSION: &str = "wrap-Fortran-as-extension";

    /// Every well-known tag.
    pub const ALL: &[&str] = &[
        COMPILE_C,
        COMPILE_CXX,
        COMPILE_FORTRAN,
        BUILD_SHARED_EXTENSION,
        BUILD_STATIC_LIBRARY,
        WRAP_FORTRAN_AS_EXTENSION,
    ];
}

/// Broad family a feature tag belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureFamily {
    /// Selects a compiler front end.
    Language,
    /// Selects the output artifact shape.
    Packaging,
    /// Selects an interface-generation pass.
    Wrapping,
    /// Anything the well-known vocabulary doesn't cover.
    Other,
}

impl fmt::Display for FeatureFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FeatureFamily::Language => "language-compile",
            FeatureFamily::Packaging => "packaging",
            FeatureFamily::Wrapping => "wrapping",
            FeatureFamily::Other => "other",
        };
        f.write_str(s)
    }
}

/// An opaque feature tag.
///
/// Cloning is cheap (the string is shared). Any non-empty string is a valid
/// tag; whether it is *recognized* is decided at build-action construction
/// time, not here.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureTag(Arc<str>);

impl FeatureTag {
    /// Create a tag from a string.
    ///
    /// Returns `None` for an empty or whitespace-only string.
    pub fn new(tag: impl AsRef<str>) -> Option<Self> {
        let tag = tag.as_ref().trim();
        if tag.is_empty() {
            None
        } else {
            Some(FeatureTag(Arc::from(tag)))
        }
    }

    /// Get the tag string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Classify this tag against the well-known vocabulary.
    pub fn family(&self) -> FeatureFamily {
        match self.as_str() {
            tags::COMPILE_C | tags::COMPILE_CXX | tags::COMPILE_FORTRAN => FeatureFamily::Language,
            tags::BUILD_SHARED_EXTENSION | tags::BUILD_STATIC_LIBRARY => FeatureFamily::Packaging,
            tags::WRAP_FORTRAN_AS_EXTENSION => FeatureFamily::Wrapping,
            _ => FeatureFamily::Other,
        }
    }

    /// Check if this tag is part of the well-known vocabulary.
    pub fn is_well_known(&self) -> bool {
        tags::ALL.contains(&self.as_str())
    }
}

impl fmt::Debug for FeatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for FeatureTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FeatureTag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for FeatureTag {
    type Err = EmptyNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureTag::new(s).ok_or(EmptyNameError("feature tag"))
    }
}

impl Serialize for FeatureTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for FeatureTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error returned when an empty string is used as a tag or dependency name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyNameError(pub &'static str);

impl fmt::Display for EmptyNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} must not be empty", self.0)
    }
}

impl std::error::Error for EmptyNameError {}

/// A set of feature tags.
///
/// Requesting the same tag twice is the same as requesting it once.
/// Iteration order is sorted and carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(BTreeSet<FeatureTag>);

impl FeatureSet {
    /// Create an empty feature set.
    pub fn new() -> Self {
        FeatureSet(BTreeSet::new())
    }

    /// Parse whitespace-separated host notation, e.g. `"compile-C compile-Fortran"`.
    pub fn parse(words: &str) -> Self {
        words.split_whitespace().filter_map(FeatureTag::new).collect()
    }

    /// Add a tag. Returns `false` if it was already present.
    pub fn insert(&mut self, tag: FeatureTag) -> bool {
        self.0.insert(tag)
    }

    /// Builder-style insertion of a tag given as a string.
    ///
    /// Empty strings are ignored.
    pub fn with(mut self, tag: &str) -> Self {
        if let Some(tag) = FeatureTag::new(tag) {
            self.0.insert(tag);
        }
        self
    }

    /// Check whether a tag is present.
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t.as_str() == tag)
    }

    /// Iterate over the tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &FeatureTag> + '_ {
        self.0.iter()
    }

    /// Iterate over the tags of one family.
    pub fn of_family(&self, family: FeatureFamily) -> impl Iterator<Item = &FeatureTag> + '_ {
        self.0.iter().filter(move |t| t.family() == family)
    }

    /// Number of distinct tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<FeatureTag> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = FeatureTag>>(iter: I) -> Self {
        FeatureSet(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<&'a str> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().filter_map(FeatureTag::new).collect()
    }
}

impl<'a> IntoIterator for &'a FeatureSet {
    type Item = &'a FeatureTag;
    type IntoIter = std::collections::btree_set::Iter<'a, FeatureTag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for tag in &self.0 {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            f.write_str(tag.as_str())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_tags_are_idempotent() {
        let once: FeatureSet = ["compile-C"].into_iter().collect();
        let twice: FeatureSet = ["compile-C", "compile-C"].into_iter().collect();
        assert_eq!(once, twice);
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn test_parse_host_notation() {
        let set = FeatureSet::parse("  compile-C\tcompile-Fortran  compile-C ");
        assert_eq!(set.len(), 2);
        assert!(set.contains(tags::COMPILE_C));
        assert!(set.contains(tags::COMPILE_FORTRAN));
        assert_eq!(set.to_string(), "compile-C compile-Fortran");
    }

    #[test]
    fn test_empty_tag_rejected() {
        assert!(FeatureTag::new("").is_none());
        assert!(FeatureTag::new("   ").is_none());
        assert!("".parse::<FeatureTag>().is_err());
    }

    #[test]
    fn test_families() {
        let tag = |s: &str| FeatureTag::new(s).unwrap();
        assert_eq!(tag(tags::COMPILE_CXX).family(), FeatureFamily::Language);
        assert_eq!(tag(tags::BUILD_STATIC_LIBRARY).family(), FeatureFamily::Packaging);
        assert_eq!(
            tag(tags::WRAP_FORTRAN_AS_EXTENSION).family(),
            FeatureFamily::Wrapping
        );
        assert_eq!(tag("cython").family(), FeatureFamily::Other);
        assert!(!tag("cython").is_well_known());
    }

    #[test]
    fn test_unknown_tags_are_kept() {
        let set = FeatureSet::new().with("compile-C").with("not-a-real-tag");
        assert!(set.contains("not-a-real-tag"));
        assert_eq!(set.of_family(FeatureFamily::Other).count(), 1);
    }

    #[test]
    fn test_serde_transparent() {
        let set = FeatureSet::parse("compile-C build-shared-extension");
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["build-shared-extension","compile-C"]"#);
        let back: FeatureSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
