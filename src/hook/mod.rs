//! Pre-build hooks.
//!
//! Each subsystem contributes one [`PreBuildHook`]. The host invokes it once
//! per build pass with a [`HookContext`]; the hook's only effect is the set
//! of builders it registers there.
//!
//! ```ignore
//! struct Special;
//!
//! impl PreBuildHook for Special {
//!     fn subsystem(&self) -> &str {
//!         "special"
//!     }
//!
//!     fn pre_build(&self, ctx: &mut HookContext<'_>) -> Result<(), RegistryError> {
//!         ctx.register_builder(
//!             "_ufuncs",
//!             BuilderConfig::parse("npymath CLIB", "compile-C build-shared-extension"),
//!         )
//!     }
//! }
//! ```

pub mod manifest_hook;
pub mod pass;

use std::fmt;
use std::sync::Arc;

use crate::builder::config::{BuilderConfig, ConfiguredBuilder, TargetBuilder};
use crate::builder::default::DefaultBuilder;
use crate::builder::errors::RegistryError;
use crate::builder::registry::BuilderRegistry;

pub use manifest_hook::ManifestHook;
pub use pass::{BuildPass, TargetSummary};

/// Registration state of one subsystem within a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookState {
    /// The hook has not run yet
    Unregistered,
    /// The hook ran and its builders are installed
    Registered,
}

impl fmt::Display for HookState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookState::Unregistered => write!(f, "unregistered"),
            HookState::Registered => write!(f, "registered"),
        }
    }
}

/// A subsystem's pre-build entry point.
pub trait PreBuildHook {
    /// Identity of the subsystem; also the namespace of its targets.
    fn subsystem(&self) -> &str;

    /// Register every target the subsystem owns.
    fn pre_build(&self, ctx: &mut HookContext<'_>) -> Result<(), RegistryError>;
}

/// What the host hands a hook: the Default Builder and the registry to fill.
pub struct HookContext<'a> {
    default_builder: Arc<dyn DefaultBuilder>,
    registry: &'a mut BuilderRegistry,
}

impl<'a> HookContext<'a> {
    /// Create a context over `registry`.
    pub fn new(
        default_builder: Arc<dyn DefaultBuilder>,
        registry: &'a mut BuilderRegistry,
    ) -> Self {
        HookContext {
            default_builder,
            registry,
        }
    }

    /// The Default Builder for this pass.
    pub fn default_builder(&self) -> &Arc<dyn DefaultBuilder> {
        &self.default_builder
    }

    /// Registrations made so far.
    pub fn registry(&self) -> &BuilderRegistry {
        self.registry
    }

    /// Subsystem the registry belongs to.
    pub fn subsystem(&self) -> &str {
        self.registry.subsystem()
    }

    /// Register an extension module built by the Default Builder with `config`.
    pub fn register_builder(
        &mut self,
        name: impl Into<String>,
        config: BuilderConfig,
    ) -> Result<(), RegistryError> {
        let builder = self.bind(config);
        self.registry.register(name, builder)
    }

    /// Register a support library built by the Default Builder with `config`.
    pub fn register_compiled_library_builder(
        &mut self,
        name: impl Into<String>,
        config: BuilderConfig,
    ) -> Result<(), RegistryError> {
        let builder = self.bind(config);
        self.registry.register_compiled_library(name, builder)
    }

    /// Register an arbitrary builder function for an extension module.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        builder: Arc<dyn TargetBuilder>,
    ) -> Result<(), RegistryError> {
        self.registry.register(name, builder)
    }

    /// Register an arbitrary builder function for a support library.
    pub fn register_compiled_library(
        &mut self,
        name: impl Into<String>,
        builder: Arc<dyn TargetBuilder>,
    ) -> Result<(), RegistryError> {
        self.registry.register_compiled_library(name, builder)
    }

    fn bind(&self, config: BuilderConfig) -> Arc<dyn TargetBuilder> {
        Arc::new(ConfiguredBuilder::new(config, self.default_builder.clone()))
    }
}

impl fmt::Debug for HookContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookContext")
            .field("subsystem", &self.registry.subsystem())
            .field("registered", &self.registry.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::recording::RecordingBuilder;
    use crate::core::target::ArtifactKind;

    #[test]
    fn test_context_binds_default_builder() {
        let recorder = Arc::new(RecordingBuilder::new());
        let mut registry = BuilderRegistry::new("interpolate");

        {
            let mut ctx = HookContext::new(recorder.clone(), &mut registry);
            ctx.register_compiled_library_builder(
                "fitpack",
                BuilderConfig::parse("", "compile-Fortran build-static-library"),
            )
            .unwrap();
            ctx.register_builder(
                "_fitpack",
                BuilderConfig::parse("fitpack CLIB", "compile-C compile-Fortran"),
            )
            .unwrap();
            assert_eq!(ctx.subsystem(), "interpolate");
            assert_eq!(ctx.registry().len(), 2);
        }

        // Registration alone never reaches the Default Builder.
        assert_eq!(recorder.call_count(), 0);

        assert_eq!(
            registry.resolve("fitpack").unwrap().kind(),
            ArtifactKind::CompiledLibrary
        );
        registry.build("_fitpack").unwrap();
        assert_eq!(recorder.call_count(), 1);
    }
}
