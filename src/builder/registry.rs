//! Builder registry - target name to builder function, write-once per pass.
//!
//! Key principle: a registration never changes once made. There is no
//! update or unregister, and a rejected registration leaves the registry
//! exactly as it was.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::builder::config::TargetBuilder;
use crate::builder::errors::{similar_names, BuildError, RegistryError};
use crate::core::action::BuildAction;
use crate::core::target::{ArtifactKind, TargetRequest};

/// A registered builder together with how the host should treat its output.
#[derive(Debug, Clone)]
pub struct Registration {
    builder: Arc<dyn TargetBuilder>,
    kind: ArtifactKind,
}

impl Registration {
    /// The builder exactly as it was registered.
    pub fn builder(&self) -> &Arc<dyn TargetBuilder> {
        &self.builder
    }

    /// Artifact kind recorded at registration.
    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }
}

/// Registry of builders for one subsystem.
///
/// After the subsystem's pre-build hook completes the registry is only read,
/// so shared references can be handed to any number of threads.
#[derive(Debug)]
pub struct BuilderRegistry {
    subsystem: String,
    builders: BTreeMap<String, Registration>,
}

impl BuilderRegistry {
    /// Create an empty registry for `subsystem`.
    pub fn new(subsystem: impl Into<String>) -> Self {
        BuilderRegistry {
            subsystem: subsystem.into(),
            builders: BTreeMap::new(),
        }
    }

    /// Subsystem that owns this registry.
    pub fn subsystem(&self) -> &str {
        &self.subsystem
    }

    /// Register the builder for an extension module.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        builder: Arc<dyn TargetBuilder>,
    ) -> Result<(), RegistryError> {
        self.insert(name.into(), builder, ArtifactKind::ExtensionModule)
    }

    /// Register the builder for a support library consumed by other targets.
    pub fn register_compiled_library(
        &mut self,
        name: impl Into<String>,
        builder: Arc<dyn TargetBuilder>,
    ) -> Result<(), RegistryError> {
        self.insert(name.into(), builder, ArtifactKind::CompiledLibrary)
    }

    fn insert(
        &mut self,
        name: String,
        builder: Arc<dyn TargetBuilder>,
        kind: ArtifactKind,
    ) -> Result<(), RegistryError> {
        if self.builders.contains_key(&name) {
            return Err(RegistryError::DuplicateRegistration {
                subsystem: self.subsystem.clone(),
                target: name,
            });
        }

        tracing::debug!("registered {}:{} ({})", self.subsystem, name, kind);
        self.builders.insert(name, Registration { builder, kind });
        Ok(())
    }

    /// Look up the registration for `name`.
    pub fn resolve(&self, name: &str) -> Result<&Registration, RegistryError> {
        self.builders
            .get(name)
            .ok_or_else(|| RegistryError::UnresolvedTarget {
                target: name.to_string(),
                suggestions: similar_names(name, self.names()),
            })
    }

    /// The request the host passes to the builder registered for `name`.
    pub fn request(&self, name: &str) -> Result<TargetRequest, RegistryError> {
        let registration = self.resolve(name)?;
        Ok(TargetRequest::new(self.subsystem.clone(), name).with_kind(registration.kind))
    }

    /// Resolve `name` and invoke its builder.
    pub fn build(&self, name: &str) -> Result<BuildAction, BuildError> {
        let registration = self.resolve(name)?;
        let request = TargetRequest::new(self.subsystem.clone(), name).with_kind(registration.kind);
        Ok(registration.builder.build(&request)?)
    }

    /// Check if a target is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    /// Registered target names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.builders.keys().map(String::as_str)
    }

    /// Registered targets with their registrations, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Registration)> + '_ {
        self.builders.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get the number of registered targets.
    pub fn len(&self) -> usize {
        self.builders.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::config::{BuilderConfig, ConfiguredBuilder};
    use crate::builder::recording::RecordingBuilder;

    fn configured(uses: &str, features: &str) -> Arc<dyn TargetBuilder> {
        Arc::new(ConfiguredBuilder::new(
            BuilderConfig::parse(uses, features),
            Arc::new(RecordingBuilder::new()),
        ))
    }

    #[test]
    fn test_resolve_returns_registered_instance() {
        let mut registry = BuilderRegistry::new("interpolate");
        let builder = configured("CLIB", "compile-C");

        registry.register("interpnd", builder.clone()).unwrap();

        let resolved = registry.resolve("interpnd").unwrap();
        assert!(Arc::ptr_eq(resolved.builder(), &builder));
        assert_eq!(resolved.kind(), ArtifactKind::ExtensionModule);
    }

    #[test]
    fn test_duplicate_leaves_registry_unchanged() {
        let mut registry = BuilderRegistry::new("interpolate");
        let first = configured("CLIB", "compile-C");
        let second = configured("FBLAS", "compile-Fortran");

        registry.register("_ppoly", first.clone()).unwrap();
        let err = registry
            .register_compiled_library("_ppoly", second)
            .unwrap_err();

        assert_eq!(
            err,
            RegistryError::DuplicateRegistration {
                subsystem: "interpolate".to_string(),
                target: "_ppoly".to_string(),
            }
        );
        assert_eq!(registry.len(), 1);
        let resolved = registry.resolve("_ppoly").unwrap();
        assert!(Arc::ptr_eq(resolved.builder(), &first));
        assert_eq!(resolved.kind(), ArtifactKind::ExtensionModule);
    }

    #[test]
    fn test_unresolved_never_defaults() {
        let mut registry = BuilderRegistry::new("interpolate");
        registry
            .register("dfitpack", configured("CLIB", "compile-C"))
            .unwrap();

        match registry.resolve("fitpack") {
            Err(RegistryError::UnresolvedTarget {
                target,
                suggestions,
            }) => {
                assert_eq!(target, "fitpack");
                assert_eq!(suggestions, vec!["dfitpack".to_string()]);
            }
            other => panic!("expected UnresolvedTarget, got {:?}", other),
        }
    }

    #[test]
    fn test_compiled_library_flag() {
        let mut registry = BuilderRegistry::new("interpolate");
        registry
            .register_compiled_library("fitpack", configured("", "compile-Fortran"))
            .unwrap();

        let request = registry.request("fitpack").unwrap();
        assert_eq!(request.kind, ArtifactKind::CompiledLibrary);
        assert_eq!(request.subsystem, "interpolate");

        let action = registry.build("fitpack").unwrap();
        assert!(action.kind.is_library());
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = BuilderRegistry::new("interpolate");
        for name in ["interpnd", "_fitpack", "dfitpack"] {
            registry
                .register(name, configured("CLIB", "compile-C"))
                .unwrap();
        }
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["_fitpack", "dfitpack", "interpnd"]);
        assert!(registry.contains("dfitpack"));
        assert!(!registry.is_empty());
    }
}
