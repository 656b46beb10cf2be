// src/commands/clean.rs

//! Clean command - remove the staging area

use anyhow::{Context, Result};
use lingmo_pkgbuild::{clean_build_root, BuildConfig};
use std::path::Path;

pub fn cmd_clean(build_dir: &Path) -> Result<()> {
    let config = BuildConfig::default().with_build_root(build_dir);
    let removed = clean_build_root(&config)
        .with_context(|| format!("Failed to remove {}", build_dir.display()))?;

    if removed {
        println!("Removed {}", build_dir.display());
    } else {
        println!("Nothing to clean at {}", build_dir.display());
    }
    Ok(())
}
