// src/commands/mod.rs
//! Command implementations for the lingmo-pkgbuild CLI

mod build;
mod clean;
mod inspect;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use inspect::cmd_inspect;

use crate::cli::ConfigArgs;
use anyhow::{Context, Result};
use lingmo_pkgbuild::BuildConfig;

/// Assemble the build configuration: defaults, then file, then flags
pub fn load_config(args: &ConfigArgs) -> Result<BuildConfig> {
    let mut config = match &args.config {
        Some(path) => BuildConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => BuildConfig::default(),
    };

    if let Some(output) = &args.output {
        config = config.with_output_dir(output);
    }
    if let Some(build_dir) = &args.build_dir {
        config = config.with_build_root(build_dir);
    }
    if let Some(jobs) = args.jobs {
        config = config.with_jobs(jobs);
    }
    if args.no_sign {
        config = config.with_signing(false);
    }
    if let Some(key) = &args.key {
        config = config.with_sign_key(key);
    }
    if let Some(format) = args.format {
        config = config.with_default_format(format);
    }

    config.validate().context("Invalid build configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingmo_pkgbuild::SourceFormat;
    use std::path::PathBuf;

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pkgbuild.toml");
        std::fs::write(&path, "jobs = 4\noutput_dir = \"from-file\"\nsign = true\n").unwrap();

        let args = ConfigArgs {
            config: Some(path),
            jobs: Some(16),
            no_sign: true,
            format: Some(SourceFormat::Quilt),
            ..Default::default()
        };
        let config = load_config(&args).unwrap();
        assert_eq!(config.jobs, 16);
        assert_eq!(config.output_dir, PathBuf::from("from-file"));
        assert!(!config.sign);
        assert_eq!(config.default_format, SourceFormat::Quilt);
    }

    #[test]
    fn test_defaults_without_file() {
        let config = load_config(&ConfigArgs::default()).unwrap();
        assert_eq!(config, BuildConfig::default());
    }
}
