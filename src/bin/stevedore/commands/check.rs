//! `stevedore check` command

use std::path::Path;

use anyhow::{bail, Result};

use crate::cli::CheckArgs;
use crate::commands::start_pass;
use stevedore::ops::check;
use stevedore::util::diagnostic::{emit, suggestions, Diagnostic};
use stevedore::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, manifest: Option<&Path>, args: CheckArgs) -> Result<()> {
    let (project, pass) = start_pass(ctx, manifest, "check")?;

    let report = check(&pass, args.jobs.or(project.config().build.jobs));

    if report.checked == 0 {
        let diag = Diagnostic::warning("no targets registered")
            .with_location(project.manifest_path())
            .with_suggestion(suggestions::NO_TARGETS);
        emit(&diag, ctx.color());
    }

    for (label, err) in &report.failures {
        let diag = err
            .to_diagnostic()
            .with_context(format!("while checking `{}`", label));
        emit(&diag, ctx.color());
    }

    if !report.is_ok() {
        bail!(
            "{} of {} target(s) failed to configure",
            report.failures.len(),
            report.checked
        );
    }

    eprintln!("    Checked {} target(s), all ok", report.checked);
    Ok(())
}
