//! Build action descriptors.
//!
//! A [`BuildAction`] is what the Default Builder hands back for a target: a
//! complete, serializable description of what the host should compile and
//! link. Nothing here runs a compiler.

use serde::{Deserialize, Serialize};

use crate::core::dependency::DependencySet;
use crate::core::feature::FeatureSet;
use crate::core::language::{Language, WrapPass};
use crate::core::target::{ArtifactKind, OutputShape, TargetRequest};
use crate::util::hash::Fingerprint;

/// Fully configured description of one target's build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildAction {
    /// Target name
    pub target: String,

    /// Owning subsystem
    pub subsystem: String,

    /// Artifact kind recorded at registration
    pub kind: ArtifactKind,

    /// Output artifact shape
    pub shape: OutputShape,

    /// Output file name for the host platform
    pub output: String,

    /// Link dependencies, exactly as forwarded
    pub dependencies: DependencySet,

    /// Feature tags, exactly as forwarded
    pub features: FeatureSet,

    /// Compiler front ends to run
    pub languages: Vec<Language>,

    /// Interface-generation passes to run before compilation
    pub wrap_passes: Vec<WrapPass>,

    /// Hash over every input above
    pub fingerprint: String,
}

impl BuildAction {
    /// Assemble a descriptor for `target` from the forwarded sets.
    ///
    /// Languages and wrapping passes are derived from the feature set.
    pub fn describe(
        target: &TargetRequest,
        shape: OutputShape,
        os: &str,
        dependencies: &DependencySet,
        features: &FeatureSet,
    ) -> Self {
        let mut action = BuildAction {
            target: target.name.clone(),
            subsystem: target.subsystem.clone(),
            kind: target.kind,
            shape,
            output: shape.output_filename(&target.name, os),
            dependencies: dependencies.clone(),
            features: features.clone(),
            languages: Language::requested_by(features),
            wrap_passes: WrapPass::requested_by(features),
            fingerprint: String::new(),
        };
        action.fingerprint = action.compute_fingerprint();
        action
    }

    /// Recompute the fingerprint from the descriptor's inputs.
    pub fn compute_fingerprint(&self) -> String {
        let mut fp = Fingerprint::new();
        fp.update_str(&self.subsystem)
            .update_str(&self.target)
            .update_str(self.kind.label())
            .update_str(&self.output)
            .update_group("deps", self.dependencies.iter().map(|d| d.as_str()))
            .update_group("features", self.features.iter().map(|t| t.as_str()));
        fp.finish_short()
    }

    /// Check whether this action links against a compiled library target.
    pub fn uses(&self, dependency: &str) -> bool {
        self.dependencies.contains(dependency)
    }

    /// Serialize this action to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> TargetRequest {
        TargetRequest::new("interpolate", "dfitpack")
    }

    #[test]
    fn test_describe_derives_languages() {
        let deps = DependencySet::parse("fitpack CLIB");
        let features = FeatureSet::parse(
            "compile-C compile-Fortran build-shared-extension wrap-Fortran-as-extension",
        );
        let action = BuildAction::describe(
            &request(),
            OutputShape::SharedExtension,
            "linux",
            &deps,
            &features,
        );

        assert_eq!(action.output, "dfitpack.so");
        assert_eq!(action.languages, vec![Language::C, Language::Fortran]);
        assert_eq!(action.wrap_passes, vec![WrapPass::FortranExtension]);
        assert!(action.uses("fitpack"));
        assert_eq!(action.fingerprint, action.compute_fingerprint());
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let deps = DependencySet::parse("CLIB");
        let features = FeatureSet::parse("compile-C");
        let describe = |features: &FeatureSet| {
            BuildAction::describe(
                &request(),
                OutputShape::SharedExtension,
                "linux",
                &deps,
                features,
            )
        };
        let a = describe(&features);
        let b = describe(&features);
        assert_eq!(a, b);

        let c = describe(&FeatureSet::parse("compile-C++"));
        assert_ne!(a.fingerprint, c.fingerprint);
    }

    #[test]
    fn test_json_shape() {
        let action = BuildAction::describe(
            &request(),
            OutputShape::SharedExtension,
            "linux",
            &DependencySet::new(),
            &FeatureSet::parse("compile-C"),
        );
        let json = action.to_json();
        assert!(json.contains("\"target\":\"dfitpack\""));
        assert!(json.contains("\"kind\":\"extension-module\""));
        assert!(json.contains("\"shape\":\"shared-extension\""));
    }
}
