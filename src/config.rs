// src/config.rs

//! Build configuration
//!
//! A [`BuildConfig`] is assembled once (defaults, then an optional TOML file,
//! then command-line overrides) and handed by reference to every pipeline
//! step. Nothing in the pipeline mutates it.
//!
//! ```toml
//! build_root = ".build_deb_lingmo"
//! output_dir = "pkg_out"
//! jobs = 8
//! sign = false
//! default_format = "quilt"
//! ```

use crate::debian::SourceFormat;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default scratch area for staging directories
pub const DEFAULT_BUILD_ROOT: &str = ".build_deb_lingmo";
/// Default artifact output directory
pub const DEFAULT_OUTPUT_DIR: &str = "pkg_out";
/// Default build backend
pub const DEFAULT_BACKEND: &str = "dpkg-buildpackage";

/// Process-wide build parameters
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Parent of every staging directory
    pub build_root: PathBuf,
    /// Flat directory receiving collected artifacts
    pub output_dir: PathBuf,
    /// Parallel jobs forwarded to the backend (>= 1)
    pub jobs: u32,
    /// Sign the resulting packages
    pub sign: bool,
    /// Specific signing key; ignored when `sign` is false
    pub sign_key: Option<String>,
    /// Backend program invoked in the staging directory
    pub backend: String,
    /// Format assumed when `debian/source/format` says nothing usable
    pub default_format: SourceFormat,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            build_root: PathBuf::from(DEFAULT_BUILD_ROOT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            jobs: 1,
            sign: true,
            sign_key: None,
            backend: DEFAULT_BACKEND.to_string(),
            default_format: SourceFormat::Native,
        }
    }
}

impl BuildConfig {
    /// Load configuration from a TOML file; missing keys take defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: BuildConfig =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_build_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.build_root = dir.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_jobs(mut self, jobs: u32) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_signing(mut self, sign: bool) -> Self {
        self.sign = sign;
        self
    }

    pub fn with_sign_key(mut self, key: impl Into<String>) -> Self {
        self.sign_key = Some(key.into());
        self
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = backend.into();
        self
    }

    pub fn with_default_format(mut self, format: SourceFormat) -> Self {
        self.default_format = format;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(Error::Config("jobs must be at least 1".to_string()));
        }
        if self.build_root.as_os_str().is_empty() {
            return Err(Error::Config("build_root must not be empty".to_string()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::Config("output_dir must not be empty".to_string()));
        }
        if self.backend.trim().is_empty() {
            return Err(Error::Config("backend must not be empty".to_string()));
        }
        Ok(())
    }

    /// Staging directory for a package: `build_root/<name>`
    pub fn staging_path(&self, package_name: &str) -> PathBuf {
        self.build_root.join(package_name)
    }

    /// The signing key that will actually be used, if any
    pub fn effective_sign_key(&self) -> Option<&str> {
        if !self.sign {
            return None;
        }
        self.sign_key.as_deref().filter(|k| !k.is_empty())
    }
}
