//! One configuration/build pass.
//!
//! A [`BuildPass`] is created fresh for every build. It runs each
//! subsystem's hook into that subsystem's own registry, then serves target
//! resolution for the rest of the pass. Registries are never merged: the
//! pass only keeps an index of which subsystem owns which target name.

use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::builder::default::DefaultBuilder;
use crate::builder::errors::{similar_names, BuildError, RegistryError};
use crate::builder::registry::{BuilderRegistry, Registration};
use crate::core::action::BuildAction;
use crate::core::target::ArtifactKind;
use crate::hook::{HookContext, HookState, PreBuildHook};

/// A registered target, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetSummary {
    /// Owning subsystem
    pub subsystem: String,
    /// Target name
    pub name: String,
    /// Artifact kind
    pub kind: ArtifactKind,
}

/// Registration and resolution state for a single build pass.
#[derive(Debug)]
pub struct BuildPass {
    default_builder: Arc<dyn DefaultBuilder>,

    /// Installed registries, one per subsystem
    subsystems: BTreeMap<String, BuilderRegistry>,

    /// Target name -> owning subsystem
    owners: BTreeMap<String, String>,
}

impl BuildPass {
    /// Start a pass that hands `default_builder` to every hook.
    pub fn new(default_builder: Arc<dyn DefaultBuilder>) -> Self {
        BuildPass {
            default_builder,
            subsystems: BTreeMap::new(),
            owners: BTreeMap::new(),
        }
    }

    /// The Default Builder shared by every hook in this pass.
    pub fn default_builder(&self) -> &Arc<dyn DefaultBuilder> {
        &self.default_builder
    }

    /// Run one subsystem's hook and install its registry.
    ///
    /// Either every target of the subsystem is installed or none is.
    pub fn run_hook(&mut self, hook: &dyn PreBuildHook) -> Result<(), RegistryError> {
        let subsystem = hook.subsystem().to_string();
        if self.subsystems.contains_key(&subsystem) {
            return Err(RegistryError::HookAlreadyRun { subsystem });
        }

        let mut registry = BuilderRegistry::new(subsystem.clone());
        {
            let mut ctx = HookContext::new(self.default_builder.clone(), &mut registry);
            hook.pre_build(&mut ctx)?;
        }

        if let Some((target, first)) = registry
            .names()
            .find_map(|name| self.owners.get(name).map(|owner| (name, owner)))
        {
            return Err(RegistryError::CrossSubsystemCollision {
                target: target.to_string(),
                first: first.clone(),
                second: subsystem,
            });
        }

        for name in registry.names() {
            self.owners.insert(name.to_string(), subsystem.clone());
        }
        tracing::info!(
            "Registered {} target(s) for subsystem `{}`",
            registry.len(),
            subsystem
        );
        self.subsystems.insert(subsystem, registry);
        Ok(())
    }

    /// Run hooks in order, stopping at the first failure.
    pub fn run_hooks<'h>(
        &mut self,
        hooks: impl IntoIterator<Item = &'h dyn PreBuildHook>,
    ) -> Result<(), RegistryError> {
        for hook in hooks {
            self.run_hook(hook)?;
        }
        Ok(())
    }

    /// Registration state of `subsystem`.
    pub fn state(&self, subsystem: &str) -> HookState {
        if self.subsystems.contains_key(subsystem) {
            HookState::Registered
        } else {
            HookState::Unregistered
        }
    }

    /// Registry installed for `subsystem`, if its hook has run.
    pub fn registry(&self, subsystem: &str) -> Option<&BuilderRegistry> {
        self.subsystems.get(subsystem)
    }

    /// Subsystems whose hooks have run, sorted.
    pub fn subsystems(&self) -> impl Iterator<Item = &str> + '_ {
        self.subsystems.keys().map(String::as_str)
    }

    /// Find the registration for `target` in whichever subsystem owns it.
    pub fn resolve(&self, target: &str) -> Result<(&str, &Registration), RegistryError> {
        let registry = self.owner_registry(target)?;
        Ok((registry.subsystem(), registry.resolve(target)?))
    }

    /// Resolve `target` and invoke its builder.
    pub fn build_target(&self, target: &str) -> Result<BuildAction, BuildError> {
        let registry = self.owner_registry(target)?;
        registry.build(target)
    }

    /// Invoke every registered builder, in parallel.
    ///
    /// `jobs` sizes a pool for this call only; `None` uses rayon's global
    /// pool. Actions come back sorted by subsystem then target. The first
    /// builder error fails the whole call.
    pub fn build_all(&self, jobs: Option<usize>) -> Result<Vec<BuildAction>, BuildError> {
        let work: Vec<(&BuilderRegistry, &str)> = self
            .subsystems
            .values()
            .flat_map(|registry| registry.names().map(move |name| (registry, name)))
            .collect();

        tracing::debug!("Resolving {} target(s)", work.len());

        let results: Vec<Result<BuildAction, BuildError>> = with_jobs(jobs, || {
            work.par_iter()
                .map(|(registry, name)| registry.build(name))
                .collect()
        });

        results.into_iter().collect()
    }

    /// Every registered target, sorted by subsystem then name.
    pub fn targets(&self) -> Vec<TargetSummary> {
        self.subsystems
            .values()
            .flat_map(|registry| {
                registry.iter().map(move |(name, reg)| TargetSummary {
                    subsystem: registry.subsystem().to_string(),
                    name: name.to_string(),
                    kind: reg.kind(),
                })
            })
            .collect()
    }

    /// Total number of registered targets.
    pub fn target_count(&self) -> usize {
        self.owners.len()
    }

    fn owner_registry(&self, target: &str) -> Result<&BuilderRegistry, RegistryError> {
        self.owners
            .get(target)
            .and_then(|subsystem| self.subsystems.get(subsystem))
            .ok_or_else(|| RegistryError::UnresolvedTarget {
                target: target.to_string(),
                suggestions: similar_names(target, self.owners.keys().map(String::as_str)),
            })
    }
}

/// Run `op` on a pool of `jobs` threads, or on the global pool for `None`.
pub(crate) fn with_jobs<R, F>(jobs: Option<usize>, op: F) -> R
where
    R: Send,
    F: FnOnce() -> R + Send,
{
    let Some(j) = jobs else {
        return op();
    };
    match rayon::ThreadPoolBuilder::new().num_threads(j).build() {
        Ok(pool) => pool.install(op),
        Err(e) => {
            tracing::warn!("Could not start {} worker(s), using the global pool: {}", j, e);
            op()
        }
    }
}
