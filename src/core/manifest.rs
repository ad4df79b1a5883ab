//! Stevedore.toml manifest parsing and schema.
//!
//! The manifest declares subsystems and their targets for hosts that don't
//! write hooks in code. Supports both `Stevedore.toml` (canonical) and
//! `stevedore.toml` (alias).
//!
//! ```toml
//! builtin = ["interpolate"]
//!
//! [[subsystem]]
//! name = "special"
//!
//! [[subsystem.target]]
//! name = "_ufuncs"
//! use = "npymath CLIB"
//! features = ["compile-C", "build-shared-extension"]
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use miette::Diagnostic as MietteDiagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::builder::config::BuilderConfig;
use crate::core::dependency::DependencySet;
use crate::core::feature::FeatureSet;
use crate::core::target::ArtifactKind;
use crate::subsystems;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Stevedore.toml";

/// Accepted alternative spelling.
pub const MANIFEST_ALIAS: &str = "stevedore.toml";

/// Errors locating or reading a manifest.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum ManifestError {
    #[error("could not find `Stevedore.toml` in `{}` or any parent directory", dir.display())]
    #[diagnostic(
        code(stevedore::manifest::not_found),
        help("create a Stevedore.toml or pass --manifest")
    )]
    NotFound { dir: PathBuf },

    #[error("both `{}` and `{}` exist", primary.display(), alias.display())]
    #[diagnostic(
        code(stevedore::manifest::ambiguous),
        help("keep only one manifest file")
    )]
    AmbiguousManifest { primary: PathBuf, alias: PathBuf },

    #[error("failed to read `{}`", path.display())]
    #[diagnostic(code(stevedore::manifest::io))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse `{}`: {message}", path.display())]
    #[diagnostic(code(stevedore::manifest::parse))]
    Parse { path: PathBuf, message: String },

    #[error("invalid manifest `{}`: {message}", path.display())]
    #[diagnostic(code(stevedore::manifest::invalid))]
    Invalid { path: PathBuf, message: String },
}

impl ManifestError {
    /// Convert to a user-facing diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string());
        match self {
            ManifestError::NotFound { .. } => diag.with_suggestion(suggestions::NO_MANIFEST),
            ManifestError::AmbiguousManifest { alias, .. } => diag
                .with_location(alias.clone())
                .with_suggestion(format!("Remove `{}`", alias.display())),
            ManifestError::Read { path, source } => diag
                .with_location(path.clone())
                .with_context(source.to_string()),
            ManifestError::Parse { path, .. } | ManifestError::Invalid { path, .. } => {
                diag.with_location(path.clone())
            }
        }
    }
}

/// Whitespace-separated host notation or an explicit list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Words {
    /// `"fitpack CLIB"`
    Line(String),
    /// `["fitpack", "CLIB"]`
    List(Vec<String>),
}

impl Default for Words {
    fn default() -> Self {
        Words::List(Vec::new())
    }
}

impl Words {
    /// Individual words, in declaration order.
    pub fn words(&self) -> Vec<&str> {
        match self {
            Words::Line(line) => line.split_whitespace().collect(),
            Words::List(items) => items.iter().map(|s| s.trim()).collect(),
        }
    }

    fn has_empty_item(&self) -> bool {
        match self {
            Words::Line(_) => false,
            Words::List(items) => items.iter().any(|s| s.trim().is_empty()),
        }
    }
}

/// A target declared in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetDecl {
    /// Target name
    pub name: String,

    /// Extension module or compiled library
    #[serde(default)]
    pub kind: ArtifactKind,

    /// Link dependencies
    #[serde(default, rename = "use")]
    pub uses: Words,

    /// Feature tags
    #[serde(default)]
    pub features: Words,
}

impl TargetDecl {
    /// The builder configuration this declaration describes.
    pub fn config(&self) -> BuilderConfig {
        BuilderConfig::new(
            self.uses.words().into_iter().collect::<DependencySet>(),
            self.features.words().into_iter().collect::<FeatureSet>(),
        )
    }
}

/// A subsystem declared in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubsystemDecl {
    /// Subsystem name; also its target namespace
    pub name: String,

    /// Targets in declaration order
    #[serde(default, rename = "target")]
    pub targets: Vec<TargetDecl>,
}

/// Parsed Stevedore.toml.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Built-in subsystems to include
    #[serde(default)]
    pub builtin: Vec<String>,

    /// Declared subsystems
    #[serde(default, rename = "subsystem")]
    pub subsystems: Vec<SubsystemDecl>,
}

impl Manifest {
    /// Load and validate a manifest file.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents, path)
    }

    /// Parse and validate manifest text; `path` is used for messages only.
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ManifestError> {
        let manifest: Manifest = toml::from_str(contents).map_err(|e| ManifestError::Parse {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;
        manifest.validate(path)?;
        Ok(manifest)
    }

    /// Check structural rules.
    ///
    /// Duplicate target names inside a subsystem are left for registration
    /// to reject.
    fn validate(&self, path: &Path) -> Result<(), ManifestError> {
        let invalid = |message: String| ManifestError::Invalid {
            path: path.to_path_buf(),
            message,
        };

        let mut seen = HashSet::new();
        for name in &self.builtin {
            if subsystems::builtin(name).is_none() {
                return Err(invalid(format!(
                    "unknown builtin subsystem `{}` (available: {})",
                    name,
                    subsystems::BUILTIN_NAMES.join(", ")
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(invalid(format!("subsystem `{}` is declared twice", name)));
            }
        }

        for subsystem in &self.subsystems {
            if subsystem.name.trim().is_empty() {
                return Err(invalid("subsystem name must not be empty".to_string()));
            }
            if !seen.insert(subsystem.name.as_str()) {
                return Err(invalid(format!(
                    "subsystem `{}` is declared twice",
                    subsystem.name
                )));
            }
            for target in &subsystem.targets {
                if target.name.trim().is_empty() {
                    return Err(invalid(format!(
                        "subsystem `{}` has a target with an empty name",
                        subsystem.name
                    )));
                }
                if target.uses.has_empty_item() || target.features.has_empty_item() {
                    return Err(invalid(format!(
                        "target `{}` has an empty dependency or feature entry",
                        target.name
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Find the manifest in `dir` (not searching parents).
pub fn find_manifest(dir: &Path) -> Result<PathBuf, ManifestError> {
    let primary = dir.join(MANIFEST_NAME);
    let alias = dir.join(MANIFEST_ALIAS);

    // On case-insensitive filesystems both names resolve to the same file.
    let same_file = match (primary.canonicalize(), alias.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };

    match (primary.is_file(), alias.is_file()) {
        (true, true) if !same_file => Err(ManifestError::AmbiguousManifest { primary, alias }),
        (true, _) => Ok(primary),
        (false, true) => Ok(alias),
        (false, false) => Err(ManifestError::NotFound {
            dir: dir.to_path_buf(),
        }),
    }
}

/// Find the manifest starting at `start` and searching upward.
pub fn find_manifest_upward(start: &Path) -> Result<PathBuf, ManifestError> {
    let mut current = start.to_path_buf();
    loop {
        match find_manifest(&current) {
            Ok(path) => return Ok(path),
            Err(ManifestError::NotFound { .. }) => {
                if !current.pop() {
                    return Err(ManifestError::NotFound {
                        dir: start.to_path_buf(),
                    });
                }
            }
            Err(e) => return Err(e),
        }
    }
}
