// src/commands/inspect.rs

//! Inspect command - show what a source tree resolves to

use anyhow::{Context, Result};
use lingmo_pkgbuild::{BuildConfig, Kitchen, SourceFormat};
use std::path::Path;

pub fn cmd_inspect(dir: &Path, format: Option<SourceFormat>) -> Result<()> {
    let mut config = BuildConfig::default();
    if let Some(format) = format {
        config = config.with_default_format(format);
    }

    let package = Kitchen::new(config)
        .inspect(dir)
        .with_context(|| format!("Failed to resolve package in {}", dir.display()))?;

    println!("Package:      {}", package.name());
    println!("Version:      {} (from {:?})", package.version(), package.version_origin());
    println!("Architecture: {}", package.architecture());
    println!("Maintainer:   {}", package.maintainer());
    println!("Description:  {}", package.description());
    println!("Format:       {}", package.format());
    if package.format().needs_orig_archive() {
        println!("Orig archive: {}", package.orig_archive_name());
    }

    Ok(())
}
