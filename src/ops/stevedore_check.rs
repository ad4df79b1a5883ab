//! Implementation of `stevedore check`.
//!
//! Unlike `plan`, a check keeps going after a builder fails so every
//! misconfigured target is reported in one run.

use rayon::prelude::*;

use crate::builder::errors::BuildError;
use crate::hook::pass::with_jobs;
use crate::hook::BuildPass;

/// Outcome of checking every target in a pass.
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Number of targets whose builder ran
    pub checked: usize,

    /// Failures, sorted by subsystem then target
    pub failures: Vec<(String, BuildError)>,
}

impl CheckReport {
    /// True when every builder produced an action.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Invoke every registered builder and collect the ones that fail.
///
/// `jobs` sizes a pool for this call only, as in [`BuildPass::build_all`].
pub fn check(pass: &BuildPass, jobs: Option<usize>) -> CheckReport {
    let targets = pass.targets();
    let failures: Vec<(String, BuildError)> = with_jobs(jobs, || {
        targets
            .par_iter()
            .filter_map(|summary| {
                pass.build_target(&summary.name)
                    .err()
                    .map(|e| (format!("{}:{}", summary.subsystem, summary.name), e))
            })
            .collect()
    });

    tracing::debug!(
        "Checked {} target(s), {} failed",
        targets.len(),
        failures.len()
    );

    CheckReport {
        checked: targets.len(),
        failures,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::builder::config::BuilderConfig;
    use crate::builder::default::StandardBuilder;
    use crate::builder::errors::{BuilderError, RegistryError};
    use crate::hook::{HookContext, PreBuildHook};
    use crate::subsystems::InterpolateHook;

    struct Broken;

    impl PreBuildHook for Broken {
        fn subsystem(&self) -> &str {
            "broken"
        }

        fn pre_build(&self, ctx: &mut HookContext<'_>) -> Result<(), RegistryError> {
            ctx.register_builder(
                "no_lang",
                BuilderConfig::parse("CLIB", "build-shared-extension"),
            )?;
            ctx.register_builder(
                "typo",
                BuilderConfig::parse("CLIB", "compile-C compile-Fortrn"),
            )?;
            ctx.register_builder("fine", BuilderConfig::parse("CLIB", "compile-C"))
        }
    }

    #[test]
    fn test_clean_pass() {
        let mut pass = BuildPass::new(Arc::new(StandardBuilder::new()));
        pass.run_hook(&InterpolateHook).unwrap();
        let report = check(&pass, None);
        assert!(report.is_ok());
        assert_eq!(report.checked, 6);
    }

    #[test]
    fn test_reports_every_failure() {
        let mut pass = BuildPass::new(Arc::new(StandardBuilder::new()));
        pass.run_hook(&Broken).unwrap();
        let report = check(&pass, None);

        assert!(!report.is_ok());
        assert_eq!(report.checked, 3);
        let labels: Vec<_> = report.failures.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["broken:no_lang", "broken:typo"]);
        assert!(matches!(
            report.failures[1].1,
            BuildError::Builder(BuilderError::UnknownFeature { ref tag, .. })
                if tag == "compile-Fortrn"
        ));
    }

    #[test]
    fn test_jobs_apply_per_call() {
        let mut pass = BuildPass::new(Arc::new(StandardBuilder::new()));
        pass.run_hook(&Broken).unwrap();

        let first = check(&pass, Some(1));
        let second = check(&pass, Some(3));
        assert_eq!(first.checked, second.checked);
        assert_eq!(first.failures.len(), 2);
        assert_eq!(second.failures.len(), 2);
    }
}
