//! Pre-build hook backed by a manifest `[[subsystem]]` declaration.

use crate::builder::errors::RegistryError;
use crate::core::manifest::SubsystemDecl;
use crate::hook::{HookContext, PreBuildHook};

/// Registers the targets of one declared subsystem, in declaration order.
#[derive(Debug, Clone)]
pub struct ManifestHook {
    decl: SubsystemDecl,
}

impl ManifestHook {
    /// Create a hook for `decl`.
    pub fn new(decl: SubsystemDecl) -> Self {
        ManifestHook { decl }
    }

    /// The declaration this hook registers.
    pub fn decl(&self) -> &SubsystemDecl {
        &self.decl
    }
}

impl PreBuildHook for ManifestHook {
    fn subsystem(&self) -> &str {
        &self.decl.name
    }

    fn pre_build(&self, ctx: &mut HookContext<'_>) -> Result<(), RegistryError> {
        for target in &self.decl.targets {
            let config = target.config();
            if target.kind.is_library() {
                ctx.register_compiled_library_builder(target.name.clone(), config)?;
            } else {
                ctx.register_builder(target.name.clone(), config)?;
            }
        }
        Ok(())
    }
}
