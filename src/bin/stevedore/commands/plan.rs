//! `stevedore plan` command

use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use crate::cli::{MessageFormat, PlanArgs};
use crate::commands::{report, start_pass};
use stevedore::builder::events::PassEvent;
use stevedore::core::action::BuildAction;
use stevedore::ops::{plan, PlanOptions};
use stevedore::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, manifest: Option<&Path>, args: PlanArgs) -> Result<()> {
    let started = Instant::now();
    let json = args.message_format == MessageFormat::Json;

    let (project, pass) = start_pass(ctx, manifest, "plan")?;

    if json {
        for summary in pass.targets() {
            println!("{}", PassEvent::registered(&summary).to_json());
        }
    }

    // Jobs: CLI > config > None (auto-detect)
    let opts = PlanOptions {
        targets: args.target,
        jobs: args.jobs.or(project.config().build.jobs),
    };

    let actions = match plan(&pass, &opts) {
        Ok(actions) => actions,
        Err(e) => {
            if json {
                let elapsed = started.elapsed().as_millis() as u64;
                println!("{}", PassEvent::failed(e.to_string(), elapsed).to_json());
            }
            return Err(report(e.into(), ctx, "plan"));
        }
    };

    let elapsed = started.elapsed().as_millis() as u64;
    if json {
        for action in &actions {
            println!("{}", PassEvent::action(action).to_json());
        }
        println!(
            "{}",
            PassEvent::finished(actions.len() as u64, elapsed).to_json()
        );
    } else {
        for action in &actions {
            print_action(action, ctx.is_verbose());
        }
        eprintln!(
            "    Finished planning {} target(s) in {}ms",
            actions.len(),
            elapsed
        );
    }

    Ok(())
}

fn print_action(action: &BuildAction, verbose: bool) {
    println!(
        "{}:{} ({}) -> {}",
        action.subsystem, action.target, action.kind, action.output
    );
    if !action.dependencies.is_empty() {
        println!("    use: {}", action.dependencies);
    }
    println!("    features: {}", action.features);

    let languages: Vec<_> = action.languages.iter().map(|l| l.to_string()).collect();
    println!("    languages: {}", languages.join(", "));

    if !action.wrap_passes.is_empty() {
        let passes: Vec<_> = action.wrap_passes.iter().map(|w| w.tag()).collect();
        println!("    wrap: {}", passes.join(", "));
    }
    if verbose {
        println!("    fingerprint: {}", action.fingerprint);
    }
}
