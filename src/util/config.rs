//! Configuration file support for stevedore.
//!
//! Two configuration file locations are read:
//! - Global: `config.toml` in the platform config directory - user-wide defaults
//! - Project: `.stevedore/config.toml` next to the manifest - project overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// stevedore configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feature vocabulary settings
    pub features: FeaturesConfig,

    /// Build settings
    pub build: BuildConfig,
}

/// Feature vocabulary configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Tags the host supports beyond the well-known vocabulary
    pub extra: Vec<String>,
}

/// Build-related configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Default number of parallel jobs for resolution (None = auto-detect)
    pub jobs: Option<usize>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    ///
    /// Extra feature tags accumulate rather than replace.
    pub fn merge(&mut self, other: Config) {
        for tag in other.features.extra {
            if !self.features.extra.contains(&tag) {
                self.features.extra.push(tag);
            }
        }

        if other.build.jobs.is_some() {
            self.build.jobs = other.build.jobs;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.stevedore/config.toml)
/// 2. Global config
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge(Config::load_or_default(global_path));
    }

    config.merge(Config::load_or_default(project_path));

    config
}

/// Get the project config path (.stevedore/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".stevedore").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_files_give_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(None, &project_config_path(tmp.path()));
        assert!(config.features.extra.is_empty());
        assert!(config.build.jobs.is_none());
    }

    #[test]
    fn test_project_overrides_global() {
        let tmp = TempDir::new().unwrap();
        let global = tmp.path().join("global.toml");
        std::fs::write(
            &global,
            "[features]\nextra = [\"cython\"]\n\n[build]\njobs = 2\n",
        )
        .unwrap();

        let project = project_config_path(tmp.path());
        std::fs::create_dir_all(project.parent().unwrap()).unwrap();
        std::fs::write(
            &project,
            "[features]\nextra = [\"pythran\", \"cython\"]\n\n[build]\njobs = 8\n",
        )
        .unwrap();

        let config = load_config(Some(&global), &project);
        assert_eq!(config.features.extra, vec!["cython", "pythran"]);
        assert_eq!(config.build.jobs, Some(8));
    }

    #[test]
    fn test_broken_file_falls_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, "[build\njobs = ").unwrap();

        assert!(Config::load(&path).is_err());
        let config = Config::load_or_default(&path);
        assert!(config.build.jobs.is_none());
    }
}
