// src/kitchen/collect.rs

//! Artifact collection
//!
//! The backend writes its outputs (`.deb`, `.changes`, `.buildinfo`, the
//! orig archive) next to the staging directory. Every regular file found
//! there that is new or changed since the attempt started is copied into
//! the output directory. Leftovers from earlier attempts stay behind, and
//! directories are staging state that is never collected.

use super::staging::{move_entries, StagingDir};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info};

/// Files present in the build root before an attempt, with their mtimes
#[derive(Debug, Default)]
pub struct BuildRootSnapshot {
    files: HashMap<OsString, Option<SystemTime>>,
}

impl BuildRootSnapshot {
    /// Record the regular files directly inside `dir`
    ///
    /// A missing directory gives an empty snapshot.
    pub fn capture(dir: &Path) -> Result<Self> {
        let mut files = HashMap::new();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::fs("reading", dir, e)),
        };

        for entry in entries {
            let entry = entry.map_err(|e| Error::fs("reading", dir, e))?;
            let meta = fs::metadata(entry.path())
                .map_err(|e| Error::fs("reading metadata of", &entry.path(), e))?;
            if !meta.is_dir() {
                files.insert(entry.file_name(), meta.modified().ok());
            }
        }
        Ok(Self { files })
    }

    /// Whether `name` was already there, unchanged, when the snapshot was taken
    fn unchanged(&self, name: &OsString, modified: Option<SystemTime>) -> bool {
        match self.files.get(name) {
            Some(before) => before.is_some() && *before == modified,
            None => false,
        }
    }
}

/// Copy the files produced next to the staging directory into `output_dir`
///
/// Files recorded unchanged in `before` are skipped. The rest are first
/// copied into a scratch directory inside `output_dir` and only renamed
/// into place once all copies succeeded. Same-named files in `output_dir`
/// are replaced. Returns the collected paths, sorted.
pub fn collect_artifacts(
    staging: &StagingDir,
    output_dir: &Path,
    before: &BuildRootSnapshot,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .map_err(|e| Error::fs("creating output directory", output_dir, e))?;

    let source_dir = staging.parent();
    let scratch = tempfile::Builder::new()
        .prefix(".collect-")
        .tempdir_in(output_dir)
        .map_err(|e| Error::fs("creating scratch directory in", output_dir, e))?;

    let entries = fs::read_dir(source_dir).map_err(|e| Error::fs("reading", source_dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::fs("reading", source_dir, e))?;
        let path = entry.path();
        let meta = fs::metadata(&path).map_err(|e| Error::fs("reading metadata of", &path, e))?;
        if meta.is_dir() {
            continue;
        }
        let name = entry.file_name();
        if before.unchanged(&name, meta.modified().ok()) {
            debug!("Skipping {} (left over from an earlier attempt)", path.display());
            continue;
        }

        debug!("Collecting {}", path.display());
        let target = scratch.path().join(&name);
        fs::copy(&path, &target).map_err(|e| Error::fs("copying artifact to", &target, e))?;
    }

    let mut collected = move_entries(scratch.path(), output_dir)?;
    collected.sort();

    scratch
        .close()
        .map_err(|e| Error::fs("removing scratch directory in", output_dir, e))?;

    info!("Collected {} artifact(s) into {}", collected.len(), output_dir.display());
    Ok(collected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildConfig;
    use tempfile::TempDir;

    #[test]
    fn test_collects_files_not_directories() {
        let temp = TempDir::new().unwrap();
        let config = BuildConfig::default()
            .with_build_root(temp.path().join("build"))
            .with_output_dir(temp.path().join("out"));
        let staging = StagingDir::create(&config, "foo").unwrap();
        let root = staging.parent();
        fs::write(root.join("foo_1.0-1_amd64.deb"), "deb").unwrap();
        fs::write(root.join("foo_1.0-1_amd64.changes"), "changes").unwrap();
        fs::create_dir_all(root.join("other-pkg")).unwrap();

        let collected =
            collect_artifacts(&staging, &config.output_dir, &BuildRootSnapshot::default())
                .unwrap();
        assert_eq!(
            collected,
            vec![
                config.output_dir.join("foo_1.0-1_amd64.changes"),
                config.output_dir.join("foo_1.0-1_amd64.deb"),
            ]
        );
        assert!(!config.output_dir.join("foo").exists());
        assert!(!config.output_dir.join("other-pkg").exists());
    }

    #[test]
    fn test_overwrites_existing_artifacts() {
        let temp = TempDir::new().unwrap();
        let config = BuildConfig::default()
            .with_build_root(temp.path().join("build"))
            .with_output_dir(temp.path().join("out"));
        let staging = StagingDir::create(&config, "foo").unwrap();
        fs::write(staging.parent().join("foo.deb"), "new").unwrap();
        fs::create_dir_all(&config.output_dir).unwrap();
        fs::write(config.output_dir.join("foo.deb"), "old").unwrap();

        collect_artifacts(&staging, &config.output_dir, &BuildRootSnapshot::default())
            .unwrap();
        assert_eq!(fs::read_to_string(config.output_dir.join("foo.deb")).unwrap(), "new");

        let names: Vec<_> = fs::read_dir(&config.output_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1, "scratch directory should be gone: {:?}", names);
    }

    #[test]
    fn test_creates_output_dir() {
        let temp = TempDir::new().unwrap();
        let config = BuildConfig::default()
            .with_build_root(temp.path().join("build"))
            .with_output_dir(temp.path().join("nested/out"));
        let staging = StagingDir::create(&config, "foo").unwrap();

        let collected =
            collect_artifacts(&staging, &config.output_dir, &BuildRootSnapshot::default())
                .unwrap();
        assert!(collected.is_empty());
        assert!(config.output_dir.is_dir());
    }

    #[test]
    fn test_skips_files_unchanged_since_snapshot() {
        let temp = TempDir::new().unwrap();
        let config = BuildConfig::default()
            .with_build_root(temp.path().join("build"))
            .with_output_dir(temp.path().join("out"));
        let staging = StagingDir::create(&config, "beta").unwrap();
        let root = staging.parent();
        fs::write(root.join("alpha_1.0.orig.tar.xz"), "stale").unwrap();
        fs::write(root.join("beta_1.0_all.deb"), "old").unwrap();

        let before = BuildRootSnapshot::capture(root).unwrap();
        // Rewritten file gets a new mtime, new file is absent from the snapshot
        let rewritten = fs::File::create(root.join("beta_1.0_all.deb")).unwrap();
        rewritten
            .set_modified(SystemTime::now() + std::time::Duration::from_secs(5))
            .unwrap();
        fs::write(root.join("beta_1.0_amd64.changes"), "changes").unwrap();

        let collected = collect_artifacts(&staging, &config.output_dir, &before).unwrap();
        assert_eq!(
            collected,
            vec![
                config.output_dir.join("beta_1.0_all.deb"),
                config.output_dir.join("beta_1.0_amd64.changes"),
            ]
        );
        assert!(!config.output_dir.join("alpha_1.0.orig.tar.xz").exists());
    }

    #[test]
    fn test_snapshot_of_missing_dir_is_empty() {
        let snapshot = BuildRootSnapshot::capture(Path::new("/nonexistent/build/root")).unwrap();
        assert!(snapshot.files.is_empty());
    }
}
