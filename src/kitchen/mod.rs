// src/kitchen/mod.rs

//! Kitchen: turns a Debian source tree into binary packages
//!
//! Cooking one package runs these steps in order, stopping at the first
//! failure:
//!
//! 1. **Name**: read the package name from the changelog's first line
//! 2. **Stage**: create `build_root/<name>` and copy the source tree into it
//! 3. **Resolve**: parse changelog, control and format marker into a [`Package`]
//! 4. **Orig**: write `<name>_<upstream>.orig.tar.xz` (quilt only)
//! 5. **Build**: run the backend inside the staging directory
//! 6. **Collect**: copy the files this attempt produced into the output
//!    directory
//!
//! Nothing is collected unless the backend exited successfully. A failed
//! build discards the orig archive it was given.

mod batch;
mod collect;
pub mod deps;
mod invoke;
mod orig;
pub mod runner;
mod staging;

pub use batch::{discover_packages, Batch, BatchReport, PackageOutcome};
pub use collect::{collect_artifacts, BuildRootSnapshot};
pub use deps::{AptInstaller, DependencyInstaller};
pub use invoke::{build_args, build_invocation, run_build};
pub use orig::create_orig_archive;
pub use runner::{SystemRunner, ToolInvocation, ToolRunner};
pub use staging::StagingDir;

use crate::config::BuildConfig;
use crate::debian::{self, DebianDir, Package};
use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of cooking one package successfully
#[derive(Debug)]
pub struct CookReport {
    /// The resolved package
    pub package: Package,
    /// Staging directory the backend ran in
    pub staging_dir: PathBuf,
    /// Orig archive, for quilt packages
    pub orig_archive: Option<PathBuf>,
    /// Files copied into the output directory
    pub artifacts: Vec<PathBuf>,
}

/// The Kitchen: where source trees are cooked
pub struct Kitchen {
    config: BuildConfig,
    runner: Arc<dyn ToolRunner>,
}

impl Kitchen {
    /// Create a Kitchen that runs tools on the host
    pub fn new(config: BuildConfig) -> Self {
        Self::with_runner(config, Arc::new(SystemRunner))
    }

    /// Create a Kitchen with a custom tool runner
    pub fn with_runner(config: BuildConfig, runner: Arc<dyn ToolRunner>) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn runner(&self) -> Arc<dyn ToolRunner> {
        Arc::clone(&self.runner)
    }

    /// Resolve a package's identity from its source tree without building
    pub fn inspect(&self, source_dir: &Path) -> Result<Package> {
        Package::from_source_tree(source_dir, self.config.default_format)
    }

    /// Stage a source tree and resolve the package from the staged copy
    pub fn prepare(&self, source_dir: &Path) -> Result<(Package, StagingDir)> {
        let debian = DebianDir::new(source_dir);
        let name = debian::provisional_name(&debian.changelog())?;

        let staging = StagingDir::create(&self.config, &name)?;
        staging.populate(source_dir)?;

        let package = Package::from_source_tree(staging.path(), self.config.default_format)?;
        Ok((package, staging))
    }

    /// Cook one package from its source tree
    pub fn cook(&self, source_dir: &Path) -> Result<CookReport> {
        let (package, staging) = self.prepare(source_dir)?;
        info!(
            "Cooking {} version {} ({}, {})",
            package.name(),
            package.version(),
            package.architecture(),
            package.format()
        );

        let before = BuildRootSnapshot::capture(staging.parent())?;
        let orig_archive = create_orig_archive(&package, &staging)?;

        if let Err(e) = run_build(self.runner.as_ref(), &self.config, &package, &staging) {
            if let Some(archive) = &orig_archive {
                discard(archive);
            }
            return Err(e);
        }

        let artifacts = collect_artifacts(&staging, &self.config.output_dir, &before)?;

        Ok(CookReport {
            package,
            staging_dir: staging.path().to_path_buf(),
            orig_archive,
            artifacts,
        })
    }
}

/// Best-effort removal of an output left by a failed attempt
fn discard(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("Removed {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove {}: {}", path.display(), e),
    }
}

/// Remove the build root and everything in it
///
/// Returns `false` if there was nothing to remove.
pub fn clean_build_root(config: &BuildConfig) -> Result<bool> {
    match fs::remove_dir_all(&config.build_root) {
        Ok(()) => {
            info!("Removed build directory {}", config.build_root.display());
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::fs("removing build directory", &config.build_root, e)),
    }
}
