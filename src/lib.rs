// src/lib.rs

//! lingmo-pkgbuild
//!
//! Builds binary Debian packages from source trees by driving
//! `dpkg-buildpackage`.
//!
//! # Architecture
//!
//! - `debian`: reads changelog, control and format marker into a [`Package`]
//! - `kitchen`: stages the tree, writes the orig archive, runs the backend
//!   and collects artifacts, for one package or a whole directory of them
//! - `config`: the immutable [`BuildConfig`] threaded through every step
//!
//! Each package in a batch is attempted independently; one failure does not
//! stop the others. Only the optional build-dependency phase is fail-fast.

pub mod config;
pub mod debian;
mod error;
pub mod kitchen;

pub use config::BuildConfig;
pub use debian::{Package, PackageMetadata, SourceFormat, VersionOrigin};
pub use error::{Error, ErrorKind, Result};
pub use kitchen::{
    clean_build_root, Batch, BatchReport, CookReport, Kitchen, PackageOutcome, StagingDir,
    SystemRunner, ToolInvocation, ToolRunner,
};
