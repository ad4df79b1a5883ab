//! Core data structures for Stevedore.
//!
//! This module contains the foundational types used throughout Stevedore:
//! - Feature tag and dependency name vocabularies
//! - Languages and wrapping passes derived from features
//! - Targets and the build actions produced for them
//! - Manifests

pub mod action;
pub mod dependency;
pub mod feature;
pub mod language;
pub mod manifest;
pub mod target;

pub use action::BuildAction;
pub use dependency::{DependencyName, DependencySet};
pub use feature::{FeatureFamily, FeatureSet, FeatureTag};
pub use language::{Language, WrapPass};
pub use manifest::{
    find_manifest, find_manifest_upward, Manifest, ManifestError, MANIFEST_ALIAS, MANIFEST_NAME,
};
pub use target::{ArtifactKind, OutputShape, TargetRequest};
