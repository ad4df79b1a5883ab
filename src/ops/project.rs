//! Loading a project: manifest, configuration and the hooks it declares.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::builder::default::{DefaultBuilder, StandardBuilder};
use crate::builder::errors::RegistryError;
use crate::core::manifest::{find_manifest, Manifest};
use crate::hook::{BuildPass, ManifestHook, PreBuildHook};
use crate::subsystems;
use crate::util::config::Config;
use crate::util::GlobalContext;

/// A loaded Stevedore.toml together with its merged configuration.
#[derive(Debug, Clone)]
pub struct Project {
    manifest_path: PathBuf,
    manifest: Manifest,
    config: Config,
}

impl Project {
    /// Load the project for `manifest_path`, or search upward from the cwd.
    ///
    /// A directory path is searched for a manifest without walking upward.
    pub fn load(ctx: &GlobalContext, manifest_path: Option<&Path>) -> Result<Self> {
        let manifest_path = match manifest_path {
            Some(path) if path.is_dir() => find_manifest(path)?,
            Some(path) => path.to_path_buf(),
            None => ctx.find_manifest()?,
        };

        let manifest = Manifest::load(&manifest_path)?;
        let root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| ctx.cwd().to_path_buf());
        let config = ctx.load_config(&root);

        tracing::debug!("Loaded manifest {}", manifest_path.display());

        Ok(Project {
            manifest_path,
            manifest,
            config,
        })
    }

    /// Build a project from parts already in memory.
    pub fn from_parts(manifest_path: PathBuf, manifest: Manifest, config: Config) -> Self {
        Project {
            manifest_path,
            manifest,
            config,
        }
    }

    /// Path of the manifest file.
    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Directory containing the manifest.
    pub fn root(&self) -> &Path {
        self.manifest_path.parent().unwrap_or(Path::new("."))
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The host's Default Builder, extended with configured feature tags.
    pub fn default_builder(&self) -> StandardBuilder {
        StandardBuilder::new().with_extra_features(self.config.features.extra.iter().cloned())
    }

    /// Hooks in pass order: built-in subsystems first, then declared ones.
    pub fn hooks(&self) -> Vec<Box<dyn PreBuildHook>> {
        let builtin = self
            .manifest
            .builtin
            .iter()
            .filter_map(|name| subsystems::builtin(name));
        let declared = self
            .manifest
            .subsystems
            .iter()
            .map(|decl| Box::new(ManifestHook::new(decl.clone())) as Box<dyn PreBuildHook>);
        builtin.chain(declared).collect()
    }

    /// Run every hook into a fresh pass backed by the host's Default Builder.
    pub fn start_pass(&self) -> Result<BuildPass, RegistryError> {
        self.start_pass_with(Arc::new(self.default_builder()))
    }

    /// Run every hook into a fresh pass backed by `default_builder`.
    pub fn start_pass_with(
        &self,
        default_builder: Arc<dyn DefaultBuilder>,
    ) -> Result<BuildPass, RegistryError> {
        let hooks = self.hooks();
        let mut pass = BuildPass::new(default_builder);
        pass.run_hooks(hooks.iter().map(|hook| hook.as_ref()))?;

        tracing::info!(
            "Registered {} target(s) across {} subsystem(s)",
            pass.target_count(),
            hooks.len()
        );
        Ok(pass)
    }
}
