// src/kitchen/invoke.rs

//! Build backend invocation
//!
//! Flag order matters to `dpkg-buildpackage`: later signing flags would
//! override earlier ones, so the unsigned flags are only emitted when
//! signing is off and a key is only selected when it is on.

use super::runner::{ToolInvocation, ToolRunner};
use super::staging::StagingDir;
use crate::config::BuildConfig;
use crate::debian::Package;
use crate::error::Result;
use tracing::info;

/// Binary-only build
pub const FLAG_BINARY_ONLY: &str = "-b";
/// Disable all signing
pub const FLAGS_UNSIGNED: [&str; 3] = ["-us", "-uc", "--no-sign"];
/// Include the original source in the upload
pub const FLAG_INCLUDE_ORIG: &str = "-sa";

/// Compose the backend arguments for a package
pub fn build_args(config: &BuildConfig, package: &Package) -> Vec<String> {
    let mut args = vec![FLAG_BINARY_ONLY.to_string()];

    if config.jobs > 1 {
        args.push(format!("-j{}", config.jobs));
    }

    if !config.sign {
        args.extend(FLAGS_UNSIGNED.iter().map(|s| s.to_string()));
    } else if let Some(key) = config.effective_sign_key() {
        args.push(format!("-k{}", key));
    }

    if package.format().needs_orig_archive() {
        args.push(FLAG_INCLUDE_ORIG.to_string());
    }

    args
}

/// Full backend command, run inside the staging directory
pub fn build_invocation(
    config: &BuildConfig,
    package: &Package,
    staging: &StagingDir,
) -> ToolInvocation {
    ToolInvocation::new(config.backend.as_str())
        .args(build_args(config, package))
        .current_dir(staging.path())
}

/// Run the backend; blocks until it exits
pub fn run_build(
    runner: &dyn ToolRunner,
    config: &BuildConfig,
    package: &Package,
    staging: &StagingDir,
) -> Result<()> {
    let invocation = build_invocation(config, package, staging);
    info!("Building {} {}: {}", package.name(), package.version(), invocation);
    runner.run(&invocation)
}
