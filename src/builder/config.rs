//! Builder functions and the configuration records behind them.
//!
//! A registered builder is usually a [`BuilderConfig`] (the dependency and
//! feature sets chosen for one target) paired with the pass's Default
//! Builder. [`dispatch`] is the one place those sets are handed over.

use std::fmt;
use std::sync::Arc;

use crate::builder::default::DefaultBuilder;
use crate::builder::errors::BuilderError;
use crate::core::action::BuildAction;
use crate::core::dependency::DependencySet;
use crate::core::feature::FeatureSet;
use crate::core::target::TargetRequest;

/// A builder function: turns a target request into a build action.
///
/// Builders are shared between the registry and the host's scheduler, so
/// they must be callable from any thread and must not carry mutable state.
pub trait TargetBuilder: Send + Sync + fmt::Debug {
    /// Construct the build action for `target`.
    fn build(&self, target: &TargetRequest) -> Result<BuildAction, BuilderError>;
}

/// Immutable dependency and feature selection for one target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BuilderConfig {
    /// Libraries to link against
    pub dependencies: DependencySet,

    /// Toolchain features to enable
    pub features: FeatureSet,
}

impl BuilderConfig {
    /// Create a configuration from explicit sets.
    pub fn new(dependencies: DependencySet, features: FeatureSet) -> Self {
        BuilderConfig {
            dependencies,
            features,
        }
    }

    /// Create a configuration from host notation, e.g.
    /// `BuilderConfig::parse("fitpack CLIB", "compile-C compile-Fortran")`.
    pub fn parse(uses: &str, features: &str) -> Self {
        BuilderConfig {
            dependencies: DependencySet::parse(uses),
            features: FeatureSet::parse(features),
        }
    }

    /// Add a dependency.
    pub fn uses(mut self, dependency: &str) -> Self {
        self.dependencies = self.dependencies.with(dependency);
        self
    }

    /// Add a feature tag.
    pub fn with_feature(mut self, tag: &str) -> Self {
        self.features = self.features.with(tag);
        self
    }

    /// Add several feature tags.
    pub fn with_features<'a>(mut self, tags: impl IntoIterator<Item = &'a str>) -> Self {
        for tag in tags {
            self.features = self.features.with(tag);
        }
        self
    }
}

/// Forward a configuration to the Default Builder.
///
/// Calls `default_builder` exactly once with the configuration's sets,
/// unmodified. Errors come back untouched.
pub fn dispatch(
    config: &BuilderConfig,
    default_builder: &dyn DefaultBuilder,
    target: &TargetRequest,
) -> Result<BuildAction, BuilderError> {
    default_builder.build(target, &config.dependencies, &config.features)
}

/// A [`BuilderConfig`] bound to a Default Builder.
#[derive(Debug, Clone)]
pub struct ConfiguredBuilder {
    config: BuilderConfig,
    default_builder: Arc<dyn DefaultBuilder>,
}

impl ConfiguredBuilder {
    /// Bind `config` to `default_builder`.
    pub fn new(config: BuilderConfig, default_builder: Arc<dyn DefaultBuilder>) -> Self {
        ConfiguredBuilder {
            config,
            default_builder,
        }
    }

    /// The captured configuration.
    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }
}

impl TargetBuilder for ConfiguredBuilder {
    fn build(&self, target: &TargetRequest) -> Result<BuildAction, BuilderError> {
        dispatch(&self.config, self.default_builder.as_ref(), target)
    }
}

/// Adapts a closure into a [`TargetBuilder`].
pub struct FnBuilder<F> {
    f: F,
}

impl<F> FnBuilder<F>
where
    F: Fn(&TargetRequest) -> Result<BuildAction, BuilderError> + Send + Sync,
{
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        FnBuilder { f }
    }
}

impl<F> fmt::Debug for FnBuilder<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnBuilder").finish_non_exhaustive()
    }
}

impl<F> TargetBuilder for FnBuilder<F>
where
    F: Fn(&TargetRequest) -> Result<BuildAction, BuilderError> + Send + Sync,
{
    fn build(&self, target: &TargetRequest) -> Result<BuildAction, BuilderError> {
        (self.f)(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::recording::RecordingBuilder;

    #[test]
    fn test_config_builders() {
        let config = BuilderConfig::default()
            .uses("CLIB")
            .uses("CLIB")
            .with_feature("compile-C")
            .with_features(["compile-Fortran", "compile-C"]);

        assert_eq!(config, BuilderConfig::parse("CLIB", "compile-C compile-Fortran"));
    }

    #[test]
    fn test_dispatch_forwards_once() {
        let recorder = RecordingBuilder::new();
        let config = BuilderConfig::parse("FBLAS CLIB", "compile-C compile-Fortran");
        let target = TargetRequest::new("linalg", "_flapack");

        let action = dispatch(&config, &recorder, &target).unwrap();

        let calls = recorder.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].target, "_flapack");
        assert_eq!(calls[0].dependencies, config.dependencies);
        assert_eq!(calls[0].features, config.features);
        assert_eq!(action.dependencies, config.dependencies);
    }

    #[test]
    fn test_fn_builder() {
        let builder = FnBuilder::new(|target: &TargetRequest| {
            Err(BuilderError::Rejected {
                target: target.name.clone(),
                reason: "no toolchain".to_string(),
            })
        });
        let err = builder
            .build(&TargetRequest::new("misc", "x"))
            .unwrap_err();
        assert_eq!(err.target(), "x");
    }
}
