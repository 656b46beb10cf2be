// src/debian/mod.rs

//! Debian packaging metadata
//!
//! Reads the handful of files under `debian/` that the build pipeline needs
//! to know a package's identity before handing it to the backend:
//!
//! - `debian/changelog` (first line only): name and version
//! - `debian/control`: package, architecture, maintainer, description
//! - `debian/source/format`: native or quilt

pub mod changelog;
pub mod control;
pub mod format;
mod package;

pub use changelog::{provisional_name, ChangelogHeader};
pub use control::{parse_control, ControlField, ControlFields, Diagnostic, DiagnosticKind};
pub use format::{classify, SourceFormat, NATIVE_MARKER, QUILT_MARKER};
pub use package::{
    merge, resolve_metadata, upstream_version, Package, PackageMetadata, VersionOrigin,
    DEFAULT_SOURCE_ARCH, DEFAULT_VERSION,
};

use std::path::{Path, PathBuf};

/// Name of the packaging metadata subdirectory
pub const DEBIAN_DIR: &str = "debian";

/// Paths of the metadata files inside a source tree
#[derive(Debug, Clone)]
pub struct DebianDir {
    root: PathBuf,
}

impl DebianDir {
    /// `tree` is the package source tree, not the `debian/` directory itself
    pub fn new(tree: &Path) -> Self {
        Self {
            root: tree.join(DEBIAN_DIR),
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    pub fn changelog(&self) -> PathBuf {
        self.root.join("changelog")
    }

    pub fn control(&self) -> PathBuf {
        self.root.join("control")
    }

    pub fn format_marker(&self) -> PathBuf {
        self.root.join("source").join("format")
    }
}

/// Whether `dir` looks like a package source tree
pub fn is_package_dir(dir: &Path) -> bool {
    DebianDir::new(dir).exists()
}
