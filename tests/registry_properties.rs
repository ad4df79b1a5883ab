//! Registry and builder behaviour seen from a host.
//!
//! These tests drive the public API only, with a recording Default Builder
//! standing in for the host's real one.

use std::sync::Arc;
use std::thread;

use stevedore::builder::config::BuilderConfig;
use stevedore::builder::errors::{BuildError, RegistryError};
use stevedore::builder::recording::RecordingBuilder;
use stevedore::builder::registry::BuilderRegistry;
use stevedore::core::{DependencySet, FeatureSet};
use stevedore::hook::{BuildPass, HookContext, HookState, PreBuildHook};

const WRAPPED: &str =
    "compile-C compile-Fortran build-shared-extension wrap-Fortran-as-extension";

/// Hook that registers whatever it is given.
struct Declared {
    name: &'static str,
    targets: Vec<(&'static str, &'static str, &'static str)>,
}

impl PreBuildHook for Declared {
    fn subsystem(&self) -> &str {
        self.name
    }

    fn pre_build(&self, ctx: &mut HookContext<'_>) -> Result<(), RegistryError> {
        for (name, uses, features) in &self.targets {
            ctx.register_builder(*name, BuilderConfig::parse(uses, features))?;
        }
        Ok(())
    }
}

#[test]
fn test_builder_forwards_exact_sets_once() {
    let recorder = Arc::new(RecordingBuilder::new());
    let mut registry = BuilderRegistry::new("interpolate");
    {
        let mut ctx = HookContext::new(recorder.clone(), &mut registry);
        ctx.register_builder("_ppoly", BuilderConfig::parse("FBLAS CLIB", WRAPPED))
            .unwrap();
    }

    let action = registry.build("_ppoly").unwrap();

    let calls = recorder.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].target, "_ppoly");
    assert_eq!(calls[0].dependencies, DependencySet::parse("FBLAS CLIB"));
    assert_eq!(calls[0].features, FeatureSet::parse(WRAPPED));
    assert_eq!(calls[0].dependencies.len(), 2);
    assert_eq!(calls[0].features.len(), 4);
    assert_eq!(action.dependencies, calls[0].dependencies);
    assert_eq!(action.features, calls[0].features);
}

#[test]
fn test_resolution_returns_registered_instance() {
    let recorder = Arc::new(RecordingBuilder::new());
    let mut registry = BuilderRegistry::new("special");
    let mut ctx = HookContext::new(recorder, &mut registry);

    let builder: Arc<dyn stevedore::TargetBuilder> = Arc::new(
        stevedore::builder::config::ConfiguredBuilder::new(
            BuilderConfig::parse("CLIB", "compile-C"),
            ctx.default_builder().clone(),
        ),
    );
    ctx.register("_ufuncs", builder.clone()).unwrap();
    ctx.register_compiled_library("cephes", builder.clone())
        .unwrap();

    let ufuncs = registry.resolve("_ufuncs").unwrap();
    let cephes = registry.resolve("cephes").unwrap();
    assert!(Arc::ptr_eq(ufuncs.builder(), &builder));
    assert!(Arc::ptr_eq(cephes.builder(), &builder));
    assert!(cephes.kind().is_library());
}

#[test]
fn test_duplicate_registration_leaves_registry_unchanged() {
    let recorder = Arc::new(RecordingBuilder::new());
    let mut registry = BuilderRegistry::new("special");
    let mut ctx = HookContext::new(recorder.clone(), &mut registry);

    ctx.register_builder("_ufuncs", BuilderConfig::parse("CLIB", "compile-C"))
        .unwrap();
    let err = ctx
        .register_builder("_ufuncs", BuilderConfig::parse("FBLAS", "compile-Fortran"))
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::DuplicateRegistration {
            subsystem: "special".to_string(),
            target: "_ufuncs".to_string(),
        }
    );

    assert_eq!(registry.len(), 1);
    registry.build("_ufuncs").unwrap();
    assert_eq!(recorder.calls()[0].dependencies, DependencySet::parse("CLIB"));
}

#[test]
fn test_unregistered_target_is_an_error() {
    let registry = BuilderRegistry::new("special");
    assert!(matches!(
        registry.resolve("_ufuncs"),
        Err(RegistryError::UnresolvedTarget { .. })
    ));
    assert!(matches!(
        registry.build("_ufuncs"),
        Err(BuildError::Registry(RegistryError::UnresolvedTarget { .. }))
    ));
}

#[test]
fn test_concurrent_builders_stay_independent() {
    let recorder = Arc::new(RecordingBuilder::new());
    let mut pass = BuildPass::new(recorder.clone());
    pass.run_hook(&Declared {
        name: "interpolate",
        targets: vec![
            ("interpnd", "CLIB", "compile-C"),
            ("_ppoly", "FBLAS CLIB", WRAPPED),
        ],
    })
    .unwrap();

    let pass = &pass;
    thread::scope(|scope| {
        for name in ["interpnd", "_ppoly"] {
            scope.spawn(move || {
                for _ in 0..50 {
                    pass.build_target(name).unwrap();
                }
            });
        }
    });

    let interpnd = recorder.calls_for("interpnd");
    let ppoly = recorder.calls_for("_ppoly");
    assert_eq!(interpnd.len(), 50);
    assert_eq!(ppoly.len(), 50);
    assert!(interpnd.iter().all(|c| {
        c.dependencies == DependencySet::parse("CLIB")
            && c.features == FeatureSet::parse("compile-C")
    }));
    assert!(ppoly.iter().all(|c| {
        c.dependencies == DependencySet::parse("FBLAS CLIB")
            && c.features == FeatureSet::parse(WRAPPED)
    }));
}

#[test]
fn test_alpha_beta_scenario() {
    let recorder = Arc::new(RecordingBuilder::new());
    let mut pass = BuildPass::new(recorder.clone());
    assert_eq!(pass.state("demo"), HookState::Unregistered);

    pass.run_hook(&Declared {
        name: "demo",
        targets: vec![
            ("alpha", "CLIB", "compile-C"),
            (
                "beta",
                "FBLAS CLIB",
                "compile-C compile-Fortran wrap-Fortran-as-extension",
            ),
        ],
    })
    .unwrap();
    assert_eq!(pass.state("demo"), HookState::Registered);

    let alpha = pass.build_target("alpha").unwrap();
    let beta = pass.build_target("beta").unwrap();

    assert_eq!(alpha.dependencies, DependencySet::parse("CLIB"));
    assert_eq!(alpha.features, FeatureSet::parse("compile-C"));
    assert!(alpha.wrap_passes.is_empty());

    assert_eq!(beta.dependencies, DependencySet::parse("FBLAS CLIB"));
    assert_eq!(
        beta.features,
        FeatureSet::parse("compile-C compile-Fortran wrap-Fortran-as-extension")
    );
    assert_eq!(beta.wrap_passes.len(), 1);
    assert_ne!(alpha.fingerprint, beta.fingerprint);
    assert_eq!(recorder.call_count(), 2);
}
