//! Registration and build-action construction errors.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// Configuration error raised while registering or resolving builders.
///
/// Every variant is fatal for the current pass.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum RegistryError {
    #[error("target `{target}` is already registered in subsystem `{subsystem}`")]
    #[diagnostic(
        code(stevedore::registry::duplicate),
        help("each target name may be registered once per build pass")
    )]
    DuplicateRegistration { subsystem: String, target: String },

    #[error("target `{target}` is not registered")]
    #[diagnostic(code(stevedore::registry::unresolved))]
    UnresolvedTarget {
        target: String,
        suggestions: Vec<String>,
    },

    #[error("target `{target}` is registered by both `{first}` and `{second}`")]
    #[diagnostic(
        code(stevedore::registry::collision),
        help("subsystems own disjoint target names; rename one of the targets")
    )]
    CrossSubsystemCollision {
        target: String,
        first: String,
        second: String,
    },

    #[error("pre-build hook for `{subsystem}` already ran in this pass")]
    #[diagnostic(code(stevedore::hook::rerun))]
    HookAlreadyRun { subsystem: String },
}

impl RegistryError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            RegistryError::DuplicateRegistration { subsystem, target } => {
                Diagnostic::error(format!("duplicate registration of `{}`", target))
                    .with_context(format!("subsystem `{}` registers it more than once", subsystem))
                    .with_suggestion(format!(
                        "Remove or rename the second declaration of `{}`",
                        target
                    ))
            }

            RegistryError::UnresolvedTarget {
                target,
                suggestions,
            } => {
                let mut diag = Diagnostic::error(format!("no builder registered for `{}`", target));

                if !suggestions.is_empty() {
                    diag = diag.with_context(format!("did you mean: {}?", suggestions.join(", ")));
                }

                diag.with_suggestion(suggestions::TARGET_NOT_FOUND)
            }

            RegistryError::CrossSubsystemCollision {
                target,
                first,
                second,
            } => Diagnostic::error(format!("target name collision for `{}`", target))
                .with_context(format!("`{}` registers `{}`", first, target))
                .with_context(format!("`{}` registers `{}` as well", second, target))
                .with_suggestion("Rename the target in one of the subsystems"),

            RegistryError::HookAlreadyRun { subsystem } => {
                Diagnostic::error(format!("pre-build hook for `{}` ran twice", subsystem))
                    .with_context("each subsystem's hook runs exactly once per pass")
                    .with_suggestion(format!(
                        "Declare subsystem `{}` only once in the manifest",
                        subsystem
                    ))
            }
        }
    }
}

/// The Default Builder refused to construct a build action.
///
/// These are propagated unchanged to the host.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum BuilderError {
    #[error("unknown feature tag `{tag}` on target `{target}`")]
    #[diagnostic(
        code(stevedore::builder::unknown_feature),
        help("add it to `[features] extra` in .stevedore/config.toml if the host supports it")
    )]
    UnknownFeature { target: String, tag: String },

    #[error("target `{target}` requests `{wrap}` but not `{language_tag}`")]
    #[diagnostic(
        code(stevedore::builder::wrap_language),
        help("the generated wrapper has to be compiled with `{language_tag}`")
    )]
    MissingWrapLanguage {
        target: String,
        wrap: String,
        language_tag: String,
    },

    #[error("target `{target}` requests both a shared extension and a static library")]
    #[diagnostic(code(stevedore::builder::packaging))]
    ConflictingPackaging { target: String },

    #[error("target `{target}` requests no language-compile feature")]
    #[diagnostic(
        code(stevedore::builder::no_language),
        help("add one of compile-C, compile-C++ or compile-Fortran")
    )]
    NoLanguage { target: String },

    #[error("builder for `{target}` failed: {reason}")]
    #[diagnostic(code(stevedore::builder::rejected))]
    Rejected { target: String, reason: String },
}

impl BuilderError {
    /// Name of the target the error is about.
    pub fn target(&self) -> &str {
        match self {
            BuilderError::UnknownFeature { target, .. }
            | BuilderError::MissingWrapLanguage { target, .. }
            | BuilderError::ConflictingPackaging { target }
            | BuilderError::NoLanguage { target }
            | BuilderError::Rejected { target, .. } => target,
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            BuilderError::UnknownFeature { tag, .. } => diag
                .with_context(format!("`{}` is not in the recognized feature vocabulary", tag))
                .with_suggestion("Check the tag for typos")
                .with_suggestion(suggestions::UNKNOWN_FEATURE),
            BuilderError::MissingWrapLanguage { language_tag, .. } => diag
                .with_suggestion(format!("Add `{}` to the target's features", language_tag)),
            BuilderError::ConflictingPackaging { .. } => diag.with_suggestion(
                "Keep only one of build-shared-extension and build-static-library",
            ),
            BuilderError::NoLanguage { .. } => diag
                .with_suggestion("Add compile-C, compile-C++ or compile-Fortran to the features"),
            BuilderError::Rejected { .. } => diag,
        }
    }
}

/// Failure while resolving a target and invoking its builder.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum BuildError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Builder(#[from] BuilderError),
}

impl BuildError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            BuildError::Registry(e) => e.to_diagnostic(),
            BuildError::Builder(e) => e.to_diagnostic(),
        }
    }
}

/// Names from `candidates` that look like a misspelling of `wanted`.
pub(crate) fn similar_names<'a>(
    wanted: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let needle = wanted.trim_start_matches('_').to_ascii_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut found: Vec<String> = candidates
        .into_iter()
        .filter(|c| {
            let hay = c.trim_start_matches('_').to_ascii_lowercase();
            hay.contains(&needle) || needle.contains(&hay)
        })
        .map(str::to_string)
        .collect();
    found.sort();
    found.dedup();
    found
}
