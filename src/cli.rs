// src/cli.rs
//! CLI definitions for lingmo-pkgbuild
//!
//! Argument parsing only; the command implementations live in `commands`.

use clap::{Args, Parser, Subcommand};
use lingmo_pkgbuild::SourceFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lingmo-pkgbuild")]
#[command(author, version)]
#[command(about = "Build Debian binary packages from source trees", long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by commands that need a build configuration
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// TOML configuration file; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output directory for built packages [default: pkg_out]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Scratch directory for staging [default: .build_deb_lingmo]
    #[arg(short, long = "build-dir", value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Parallel jobs passed to the backend
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub jobs: Option<u32>,

    /// Do not sign the packages
    #[arg(long)]
    pub no_sign: bool,

    /// Signing key to use
    #[arg(short, long, value_name = "KEY")]
    pub key: Option<String>,

    /// Source format assumed when debian/source/format is missing or unknown
    #[arg(long, value_name = "native|quilt")]
    pub format: Option<SourceFormat>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build one package, or every package directory under DIR
    Build {
        /// Package source tree, or a directory containing several
        dir: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,

        /// Skip build dependency installation (which requires root)
        #[arg(long)]
        no_deps: bool,

        /// Remove the build directory before and after building
        #[arg(short, long)]
        clean: bool,
    },

    /// Show the package identity resolved from a source tree
    Inspect {
        /// Package source tree (containing debian/)
        dir: PathBuf,

        /// Source format assumed when debian/source/format is missing or unknown
        #[arg(long, value_name = "native|quilt")]
        format: Option<SourceFormat>,
    },

    /// Remove the build directory
    Clean {
        /// Scratch directory to remove
        #[arg(short, long = "build-dir", value_name = "DIR", default_value = ".build_deb_lingmo")]
        build_dir: PathBuf,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
