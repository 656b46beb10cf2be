// src/kitchen/deps.rs

//! Build dependency installation
//!
//! Runs once per batch, before any package is built. Unlike the per-package
//! pipeline this phase is all-or-nothing: the first failure aborts the
//! whole batch.

use super::runner::{ToolInvocation, ToolRunner};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Installs build dependencies for package source trees
///
/// This keeps the batch driver decoupled from the host's package manager.
pub trait DependencyInstaller: Send + Sync {
    /// Fail with [`Error::Privilege`] unless the process may install packages
    fn require_privilege(&self) -> Result<()>;

    /// Refresh the package index
    fn refresh_index(&self) -> Result<()>;

    /// Install the build dependencies declared by `dir/debian/control`
    fn install_build_deps(&self, dir: &Path) -> Result<()>;
}

/// Check that the effective user is root
pub fn ensure_root(operation: &str) -> Result<()> {
    if nix::unistd::geteuid().is_root() {
        Ok(())
    } else {
        Err(Error::Privilege(operation.to_string()))
    }
}

/// apt-based installer: `apt-get update`, then `apt build-dep -y ./<dir>`
pub struct AptInstaller {
    runner: Arc<dyn ToolRunner>,
}

impl AptInstaller {
    pub fn new(runner: Arc<dyn ToolRunner>) -> Self {
        Self { runner }
    }

    /// apt only treats the argument as a local directory if it looks like a path
    fn dir_arg(dir: &Path) -> String {
        if dir.is_absolute() || dir.starts_with(".") {
            dir.display().to_string()
        } else {
            format!("./{}", dir.display())
        }
    }
}

impl DependencyInstaller for AptInstaller {
    fn require_privilege(&self) -> Result<()> {
        ensure_root("installing build dependencies")
    }

    fn refresh_index(&self) -> Result<()> {
        self.runner.run(&ToolInvocation::new("apt-get").arg("update"))
    }

    fn install_build_deps(&self, dir: &Path) -> Result<()> {
        self.runner.run(
            &ToolInvocation::new("apt")
                .args(["build-dep", "-y"])
                .arg(Self::dir_arg(dir)),
        )
    }
}

/// Run the batch-wide dependency phase over `dirs`, stopping at the first error
pub fn install_all(installer: &dyn DependencyInstaller, dirs: &[PathBuf]) -> Result<()> {
    installer.require_privilege()?;

    info!("Checking build dependencies...");
    installer.refresh_index()?;

    for dir in dirs {
        info!("Installing build dependencies for {}", dir.display());
        installer.install_build_deps(dir)?;
    }

    info!("All build dependencies installed");
    Ok(())
}
