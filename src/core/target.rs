//! Target definitions - what gets built.
//!
//! A target is a named extension module or support library owned by one
//! subsystem. Its dependency and feature sets travel with the builder that
//! was registered for it, not with the request.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the host should treat the artifact a target produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// Loadable native extension module (default)
    #[default]
    #[serde(alias = "extension", alias = "ext")]
    ExtensionModule,

    /// Support library consumed by other targets of the same subsystem
    #[serde(alias = "library", alias = "lib")]
    CompiledLibrary,
}

impl ArtifactKind {
    /// Check if this is a library rather than a loadable module.
    pub fn is_library(&self) -> bool {
        matches!(self, ArtifactKind::CompiledLibrary)
    }

    /// Output shape used when the feature set names no packaging tag.
    pub fn default_shape(&self) -> OutputShape {
        match self {
            ArtifactKind::ExtensionModule => OutputShape::SharedExtension,
            ArtifactKind::CompiledLibrary => OutputShape::StaticLibrary,
        }
    }

    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::ExtensionModule => "extension",
            ArtifactKind::CompiledLibrary => "library",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shape of the file a build action produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputShape {
    /// Shared library loadable as an extension module (.so / .pyd / .dylib)
    SharedExtension,
    /// Static archive (.a / .lib)
    StaticLibrary,
}

impl OutputShape {
    /// Get the typical file extension for this shape.
    pub fn extension(&self, os: &str) -> &'static str {
        match self {
            OutputShape::SharedExtension => {
                if os == "windows" {
                    "pyd"
                } else {
                    "so"
                }
            }
            OutputShape::StaticLibrary => {
                if os == "windows" {
                    "lib"
                } else {
                    "a"
                }
            }
        }
    }

    /// Get the typical file prefix for this shape.
    ///
    /// Extension modules are imported by bare name, so they never get `lib`.
    pub fn prefix(&self, os: &str) -> &'static str {
        match self {
            OutputShape::SharedExtension => "",
            OutputShape::StaticLibrary => {
                if os == "windows" {
                    ""
                } else {
                    "lib"
                }
            }
        }
    }

    /// Get the output filename for a target.
    pub fn output_filename(&self, name: &str, os: &str) -> String {
        format!("{}{}.{}", self.prefix(os), name, self.extension(os))
    }
}

/// Request to construct the build action for one target.
///
/// The host builds one of these from a registry entry and passes it to the
/// registered builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetRequest {
    /// Target name, unique within its subsystem
    pub name: String,

    /// Subsystem that registered the target
    pub subsystem: String,

    /// Artifact kind recorded at registration
    pub kind: ArtifactKind,
}

impl TargetRequest {
    /// Create a request for an extension module.
    pub fn new(subsystem: impl Into<String>, name: impl Into<String>) -> Self {
        TargetRequest {
            name: name.into(),
            subsystem: subsystem.into(),
            kind: ArtifactKind::ExtensionModule,
        }
    }

    /// Set the artifact kind.
    pub fn with_kind(mut self, kind: ArtifactKind) -> Self {
        self.kind = kind;
        self
    }

    /// Qualified `subsystem:name` label.
    pub fn label(&self) -> String {
        format!("{}:{}", self.subsystem, self.name)
    }
}
