// src/commands/build.rs

//! Build command - cook one package or a directory of packages

use crate::cli::ConfigArgs;
use anyhow::{bail, Context, Result};
use lingmo_pkgbuild::kitchen::AptInstaller;
use lingmo_pkgbuild::{clean_build_root, Batch, Kitchen};
use std::path::Path;
use tracing::info;

/// Build every package under `dir`
///
/// Returns `Ok(false)` when at least one package failed; errors are reserved
/// for problems that stop the batch before any package is attempted.
pub fn cmd_build(dir: &Path, args: &ConfigArgs, no_deps: bool, clean: bool) -> Result<bool> {
    if !dir.exists() {
        bail!("Source directory does not exist: {}", dir.display());
    }

    let config = super::load_config(args)?;

    if which::which(&config.backend).is_err() {
        bail!(
            "Build backend '{}' not found in PATH (install dpkg-dev)",
            config.backend
        );
    }

    if clean {
        clean_build_root(&config).context("Failed to clean build directory")?;
    }

    let output_dir = config.output_dir.clone();
    let kitchen = Kitchen::new(config);
    let installer = AptInstaller::new(kitchen.runner());

    let mut batch = Batch::new(&kitchen);
    if !no_deps {
        batch = batch.with_dependency_check(&installer);
    }

    let report = batch
        .run(dir)
        .with_context(|| format!("Build of {} aborted", dir.display()))?;

    if report.attempted() == 0 {
        println!("No package directories (containing debian/) found in {}", dir.display());
    }

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(cooked) => println!(
                "[OK] {} {} ({} artifact(s))",
                cooked.package.name(),
                cooked.package.version(),
                cooked.artifacts.len()
            ),
            Err(e) => eprintln!("[FAILED] \"{}\": {}", outcome.label(), e),
        }
    }

    if !report.success() {
        let failed = report.failed().count();
        eprintln!("{} of {} package(s) failed to build", failed, report.attempted());
        return Ok(false);
    }

    println!("All packages built");
    let shown = output_dir.canonicalize().unwrap_or(output_dir);
    println!("Artifacts are in: {}", shown.display());
    info!("Built {} package(s)", report.attempted());

    if clean {
        clean_build_root(kitchen.config()).context("Failed to clean build directory")?;
    }

    Ok(true)
}
