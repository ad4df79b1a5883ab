//! Command implementations

pub mod check;
pub mod completions;
pub mod plan;
pub mod targets;

use std::path::Path;

use anyhow::Result;

use stevedore::builder::errors::{BuildError, BuilderError, RegistryError};
use stevedore::core::manifest::ManifestError;
use stevedore::hook::BuildPass;
use stevedore::ops::Project;
use stevedore::util::diagnostic::{emit, Diagnostic};
use stevedore::util::GlobalContext;

/// Diagnostic for errors raised by the library, if `err` is one.
fn to_diagnostic(err: &anyhow::Error) -> Option<Diagnostic> {
    if let Some(e) = err.downcast_ref::<ManifestError>() {
        return Some(e.to_diagnostic());
    }
    if let Some(e) = err.downcast_ref::<RegistryError>() {
        return Some(e.to_diagnostic());
    }
    if let Some(e) = err.downcast_ref::<BuildError>() {
        return Some(e.to_diagnostic());
    }
    err.downcast_ref::<BuilderError>().map(BuilderError::to_diagnostic)
}

/// Print `err` as a diagnostic and replace it with a one-line summary.
///
/// Errors without a diagnostic form are returned untouched.
pub fn report(err: anyhow::Error, ctx: &GlobalContext, command: &str) -> anyhow::Error {
    match to_diagnostic(&err) {
        Some(diag) => {
            emit(&diag, ctx.color());
            anyhow::anyhow!("`stevedore {}` failed", command)
        }
        None => err,
    }
}

/// Load the project and run every hook it declares.
pub fn start_pass(
    ctx: &GlobalContext,
    manifest: Option<&Path>,
    command: &str,
) -> Result<(Project, BuildPass)> {
    let project = Project::load(ctx, manifest).map_err(|e| report(e, ctx, command))?;
    let pass = project
        .start_pass()
        .map_err(|e| report(e.into(), ctx, command))?;
    Ok((project, pass))
}
