//! The Default Builder contract and the host-side implementation.
//!
//! Registered builders never know how to build anything themselves; they
//! forward their dependency and feature sets to a [`DefaultBuilder`] supplied
//! through the hook context. Calling it only *describes* a build.

use std::collections::BTreeSet;
use std::fmt;

use crate::builder::errors::BuilderError;
use crate::core::action::BuildAction;
use crate::core::dependency::DependencySet;
use crate::core::feature::{tags, FeatureFamily, FeatureSet};
use crate::core::language::{Language, WrapPass};
use crate::core::target::{OutputShape, TargetRequest};

/// Factory translating (target, dependencies, features) into a build action.
///
/// Implementations must not compile anything and must be safe to call from
/// several threads at once.
pub trait DefaultBuilder: Send + Sync + fmt::Debug {
    /// Construct the build action for `target`.
    fn build(
        &self,
        target: &TargetRequest,
        dependencies: &DependencySet,
        features: &FeatureSet,
    ) -> Result<BuildAction, BuilderError>;
}

/// Host-side Default Builder that produces [`BuildAction`] descriptors.
///
/// Unlike the registry, this builder does interpret tags: it rejects tags
/// outside its vocabulary and combinations the host could never build.
#[derive(Debug, Clone)]
pub struct StandardBuilder {
    /// Recognized tags beyond the well-known vocabulary
    extra_features: BTreeSet<String>,

    /// OS used for output file naming
    os: String,
}

impl StandardBuilder {
    /// Create a builder for the host OS with the well-known vocabulary.
    pub fn new() -> Self {
        StandardBuilder {
            extra_features: BTreeSet::new(),
            os: std::env::consts::OS.to_string(),
        }
    }

    /// Recognize additional feature tags.
    pub fn with_extra_features<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_features
            .extend(extra.into_iter().map(Into::into).filter(|s| !s.is_empty()));
        self
    }

    /// Name outputs for a different OS.
    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }

    /// Check whether a tag is part of this builder's vocabulary.
    pub fn recognizes(&self, tag: &str) -> bool {
        tags::ALL.contains(&tag) || self.extra_features.contains(tag)
    }

    fn output_shape(
        &self,
        target: &TargetRequest,
        features: &FeatureSet,
    ) -> Result<OutputShape, BuilderError> {
        let shared = features.contains(tags::BUILD_SHARED_EXTENSION);
        let static_lib = features.contains(tags::BUILD_STATIC_LIBRARY);
        match (shared, static_lib) {
            (true, true) => Err(BuilderError::ConflictingPackaging {
                target: target.name.clone(),
            }),
            (true, false) => Ok(OutputShape::SharedExtension),
            (false, true) => Ok(OutputShape::StaticLibrary),
            (false, false) => Ok(target.kind.default_shape()),
        }
    }
}

impl Default for StandardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultBuilder for StandardBuilder {
    fn build(
        &self,
        target: &TargetRequest,
        dependencies: &DependencySet,
        features: &FeatureSet,
    ) -> Result<BuildAction, BuilderError> {
        if let Some(unknown) = features.iter().find(|t| !self.recognizes(t.as_str())) {
            return Err(BuilderError::UnknownFeature {
                target: target.name.clone(),
                tag: unknown.to_string(),
            });
        }

        if features.of_family(FeatureFamily::Language).next().is_none() {
            return Err(BuilderError::NoLanguage {
                target: target.name.clone(),
            });
        }

        for pass in WrapPass::requested_by(features) {
            let language: Language = pass.required_language();
            if !features.contains(language.compile_tag()) {
                return Err(BuilderError::MissingWrapLanguage {
                    target: target.name.clone(),
                    wrap: pass.tag().to_string(),
                    language_tag: language.compile_tag().to_string(),
                });
            }
        }

        let shape = self.output_shape(target, features)?;
        let action = BuildAction::describe(target, shape, &self.os, dependencies, features);

        tracing::debug!(
            "described {} -> {} [{}]",
            target.label(),
            action.output,
            action.fingerprint
        );

        Ok(action)
    }
}
