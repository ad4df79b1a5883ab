//! Implementation of `stevedore plan`.

use std::collections::BTreeSet;

use crate::builder::errors::BuildError;
use crate::core::action::BuildAction;
use crate::hook::BuildPass;

/// Options for the plan command.
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Specific targets to plan (empty = all)
    pub targets: Vec<String>,

    /// Number of parallel jobs
    pub jobs: Option<usize>,
}

/// Produce build actions for the requested targets.
///
/// With no explicit targets every registered builder runs, in parallel, and
/// the actions come back sorted by subsystem then target. Explicit targets
/// are planned in the order given; repeats are planned once.
pub fn plan(pass: &BuildPass, opts: &PlanOptions) -> Result<Vec<BuildAction>, BuildError> {
    if opts.targets.is_empty() {
        return pass.build_all(opts.jobs);
    }

    let mut seen = BTreeSet::new();
    opts.targets
        .iter()
        .filter(|target| seen.insert(target.as_str()))
        .map(|target| {
            tracing::debug!("Planning `{}`", target);
            pass.build_target(target)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::builder::default::StandardBuilder;
    use crate::builder::errors::RegistryError;
    use crate::subsystems::InterpolateHook;

    fn pass() -> BuildPass {
        let mut pass = BuildPass::new(Arc::new(StandardBuilder::new().with_os("linux")));
        pass.run_hook(&InterpolateHook).unwrap();
        pass
    }

    #[test]
    fn test_plan_everything() {
        let actions = plan(&pass(), &PlanOptions::default()).unwrap();
        let names: Vec<_> = actions.iter().map(|a| a.target.as_str()).collect();
        assert_eq!(
            names,
            vec!["_fitpack", "_interpolate", "_ppoly", "dfitpack", "fitpack", "interpnd"]
        );
    }

    #[test]
    fn test_plan_selected_targets_in_order() {
        let opts = PlanOptions {
            targets: vec!["interpnd".into(), "fitpack".into(), "interpnd".into()],
            jobs: None,
        };
        let actions = plan(&pass(), &opts).unwrap();
        let names: Vec<_> = actions.iter().map(|a| a.target.as_str()).collect();
        assert_eq!(names, vec!["interpnd", "fitpack"]);
    }

    #[test]
    fn test_plan_unknown_target_suggests() {
        let opts = PlanOptions {
            targets: vec!["FITPACK".into()],
            jobs: None,
        };
        let err = plan(&pass(), &opts).unwrap_err();
        match err {
            BuildError::Registry(RegistryError::UnresolvedTarget { suggestions, .. }) => {
                assert!(suggestions.contains(&"fitpack".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
