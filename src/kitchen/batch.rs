// src/kitchen/batch.rs

//! Batch builds over a directory of package source trees

use super::deps::{self, DependencyInstaller};
use super::{CookReport, Kitchen};
use crate::debian::{self, is_package_dir, DebianDir};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Result of one package attempt
#[derive(Debug)]
pub struct PackageOutcome {
    /// Source tree that was attempted
    pub dir: PathBuf,
    pub result: Result<CookReport>,
}

impl PackageOutcome {
    pub fn succeeded(&self) -> bool {
        self.result.is_ok()
    }

    /// Directory name, for reporting
    pub fn label(&self) -> String {
        self.dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.dir.display().to_string())
    }
}

/// One outcome per attempted package
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<PackageOutcome>,
}

impl BatchReport {
    /// True iff every attempted package succeeded
    pub fn success(&self) -> bool {
        self.outcomes.iter().all(PackageOutcome::succeeded)
    }

    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failed(&self) -> impl Iterator<Item = &PackageOutcome> {
        self.outcomes.iter().filter(|o| !o.succeeded())
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .flat_map(|r| r.artifacts.iter().map(PathBuf::as_path))
    }
}

/// Find the package source trees under `root`
///
/// If `root` itself has a `debian/` directory it is the only package.
/// Otherwise every immediate subdirectory with a `debian/` directory is
/// returned, sorted by path; everything else is skipped.
pub fn discover_packages(root: &Path) -> Result<Vec<PathBuf>> {
    if is_package_dir(root) {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut dirs = Vec::new();
    for entry in fs::read_dir(root).map_err(|e| Error::fs("reading", root, e))? {
        let entry = entry.map_err(|e| Error::fs("reading", root, e))?;
        let path = entry.path();
        if path.is_dir() && is_package_dir(&path) {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Drives the kitchen over many packages
pub struct Batch<'a> {
    kitchen: &'a Kitchen,
    installer: Option<&'a dyn DependencyInstaller>,
}

impl<'a> Batch<'a> {
    pub fn new(kitchen: &'a Kitchen) -> Self {
        Self {
            kitchen,
            installer: None,
        }
    }

    /// Install build dependencies with `installer` before building
    pub fn with_dependency_check(mut self, installer: &'a dyn DependencyInstaller) -> Self {
        self.installer = Some(installer);
        self
    }

    /// Build every package under `root`
    ///
    /// Returns `Err` only when the batch could not start: the source root is
    /// unreadable or the dependency phase failed. Individual package
    /// failures are recorded in the report and do not stop the batch.
    ///
    /// Package names are unique within a batch: a directory whose changelog
    /// names a package already claimed by an earlier directory fails with a
    /// validation error instead of sharing its staging directory.
    pub fn run(&self, root: &Path) -> Result<BatchReport> {
        let dirs = discover_packages(root)?;
        info!("Found {} package(s) under {}", dirs.len(), root.display());

        if let Some(installer) = self.installer {
            deps::install_all(installer, &dirs)?;
        }

        let mut report = BatchReport::default();
        let mut claimed: HashMap<String, PathBuf> = HashMap::new();
        for dir in dirs {
            info!("Building {}", dir.display());
            let result = claim_name(&mut claimed, &dir).and_then(|()| self.kitchen.cook(&dir));
            if let Err(e) = &result {
                error!("Failed to build {}: {}", dir.display(), e);
            }
            report.outcomes.push(PackageOutcome { dir, result });
        }

        Ok(report)
    }
}

/// Reserve the package name of `dir` for this batch
///
/// Directories whose name cannot be read are let through; cooking them
/// reports the metadata error.
fn claim_name(claimed: &mut HashMap<String, PathBuf>, dir: &Path) -> Result<()> {
    let Ok(name) = debian::provisional_name(&DebianDir::new(dir).changelog()) else {
        return Ok(());
    };
    if let Some(first) = claimed.get(&name) {
        return Err(Error::validation(
            "Package",
            format!("'{}' is already built from {} in this batch", name, first.display()),
        ));
    }
    claimed.insert(name, dir.to_path_buf());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_skips_dirs_without_debian() {
        let temp = TempDir::new().unwrap();
        for name in ["b", "a", "c"] {
            fs::create_dir_all(temp.path().join(name).join("debian")).unwrap();
        }
        fs::create_dir_all(temp.path().join("docs")).unwrap();
        fs::create_dir_all(temp.path().join("tools")).unwrap();
        fs::write(temp.path().join("tools/debian"), "not a directory").unwrap();
        fs::write(temp.path().join("README"), "hi").unwrap();

        let dirs = discover_packages(temp.path()).unwrap();
        let names: Vec<_> = dirs
            .iter()
            .map(|d| d.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_discover_single_package_root() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("debian")).unwrap();
        fs::create_dir_all(temp.path().join("sub/debian")).unwrap();
        assert_eq!(discover_packages(temp.path()).unwrap(), vec![temp.path().to_path_buf()]);
    }

    #[test]
    fn test_discover_missing_root() {
        let err = discover_packages(Path::new("/nonexistent/source/root")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Filesystem);
    }

    #[test]
    fn test_empty_report_is_success() {
        assert!(BatchReport::default().success());
    }

    #[test]
    fn test_claim_name_rejects_duplicates() {
        let temp = TempDir::new().unwrap();
        for dir in ["a", "b"] {
            fs::create_dir_all(temp.path().join(dir).join("debian")).unwrap();
            fs::write(
                temp.path().join(dir).join("debian/changelog"),
                "foo (1.0) unstable; urgency=low\n",
            )
            .unwrap();
        }
        fs::create_dir_all(temp.path().join("c/debian")).unwrap();

        let mut claimed = HashMap::new();
        assert!(claim_name(&mut claimed, &temp.path().join("a")).is_ok());
        let err = claim_name(&mut claimed, &temp.path().join("b")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
        assert_eq!(err.field(), Some("Package"));
        // No changelog: left for the cook step to report
        assert!(claim_name(&mut claimed, &temp.path().join("c")).is_ok());
    }
}
