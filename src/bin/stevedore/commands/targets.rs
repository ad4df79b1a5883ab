//! `stevedore targets` command

use std::path::Path;

use anyhow::{bail, Result};

use crate::cli::TargetsArgs;
use crate::commands::start_pass;
use stevedore::util::diagnostic::{emit, suggestions, Diagnostic};
use stevedore::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, manifest: Option<&Path>, args: TargetsArgs) -> Result<()> {
    let (project, pass) = start_pass(ctx, manifest, "targets")?;

    if let Some(ref subsystem) = args.subsystem {
        if pass.registry(subsystem).is_none() {
            bail!(
                "unknown subsystem `{}`\n\
                 available subsystems: {}",
                subsystem,
                pass.subsystems().collect::<Vec<_>>().join(", ")
            );
        }
    }

    let targets = pass.targets();
    if targets.is_empty() {
        let diag = Diagnostic::warning("no targets registered")
            .with_location(project.manifest_path())
            .with_suggestion(suggestions::NO_TARGETS);
        emit(&diag, ctx.color());
        return Ok(());
    }

    let mut current: Option<String> = None;
    for summary in targets {
        if args
            .subsystem
            .as_ref()
            .is_some_and(|wanted| *wanted != summary.subsystem)
        {
            continue;
        }
        if current.as_deref() != Some(summary.subsystem.as_str()) {
            println!("{}", summary.subsystem);
            current = Some(summary.subsystem.clone());
        }
        println!("    {:<24} {}", summary.name, summary.kind);
    }

    Ok(())
}
