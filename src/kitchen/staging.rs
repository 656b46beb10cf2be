// src/kitchen/staging.rs

//! Staging directories
//!
//! Each package gets `build_root/<name>`, populated with a full copy of its
//! source tree. The copy is assembled in a hidden scratch directory next to
//! the staging directory and only moved into place once every file has been
//! copied, so a failed copy never leaves a half-populated staging tree.

use crate::config::BuildConfig;
use crate::debian::Package;
use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Directory (relative to the staging root) holding the generated control stub
pub const CONTROL_STUB_DIR: &str = "DEBIAN";

/// Scratch build area owned by one package
#[derive(Debug)]
pub struct StagingDir {
    path: PathBuf,
    build_root: PathBuf,
    output_dir: PathBuf,
}

impl StagingDir {
    /// Create `build_root/<name>`; succeeds if it already exists
    pub fn create(config: &BuildConfig, name: &str) -> Result<Self> {
        let path = config.staging_path(name);
        fs::create_dir_all(&path).map_err(|e| Error::fs("creating staging directory", &path, e))?;
        debug!("Staging directory: {}", path.display());

        Ok(Self {
            path,
            build_root: config.build_root.clone(),
            output_dir: config.output_dir.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The build root; artifacts and the orig archive land here
    pub fn parent(&self) -> &Path {
        &self.build_root
    }

    /// Whether `source` already lives directly under the build root
    pub fn is_staged_source(&self, source: &Path) -> bool {
        let Some(parent) = source.parent() else {
            return false;
        };
        if parent == self.build_root {
            return true;
        }
        match (parent.canonicalize(), self.build_root.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }

    /// Copy every entry of `source` into the staging directory
    ///
    /// Same-named entries already in the staging directory are replaced.
    /// Returns `false` without copying when `source` is already under the
    /// build root.
    pub fn populate(&self, source: &Path) -> Result<bool> {
        if self.is_staged_source(source) {
            debug!("{} is already staged, not copying", source.display());
            return Ok(false);
        }

        info!("Staging {} into {}", source.display(), self.path.display());

        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let scratch = tempfile::Builder::new()
            .prefix(&format!(".{}.staging-", name))
            .tempdir_in(&self.build_root)
            .map_err(|e| Error::fs("creating scratch directory in", &self.build_root, e))?;

        let skip = nested_in(source, [&self.build_root, &self.output_dir]);
        for rel in &skip {
            debug!("Not staging {} (inside the source tree)", source.join(rel).display());
        }

        copy_tree(source, scratch.path(), &skip)?;
        move_entries(scratch.path(), &self.path)?;

        scratch
            .close()
            .map_err(|e| Error::fs("removing scratch directory in", &self.build_root, e))?;
        Ok(true)
    }

    /// Copy a single file to `dest` (relative to the staging directory)
    pub fn add_file(&self, source: &Path, dest: &Path) -> Result<PathBuf> {
        let target = self.path.join(dest);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::fs("creating directory", parent, e))?;
        }
        fs::copy(source, &target).map_err(|e| Error::fs("copying file to", &target, e))?;
        Ok(target)
    }

    /// Write a minimal `DEBIAN/control` for the package
    pub fn write_control_stub(&self, package: &Package) -> Result<PathBuf> {
        let dir = self.path.join(CONTROL_STUB_DIR);
        fs::create_dir_all(&dir).map_err(|e| Error::fs("creating directory", &dir, e))?;

        let target = dir.join("control");
        let content = format!(
            "Package: {}\n\
             Version: {}\n\
             Architecture: {}\n\
             Maintainer: {}\n\
             Description: {}\n",
            package.name(),
            package.version(),
            package.architecture(),
            package.maintainer(),
            package.description()
        );
        fs::write(&target, content).map_err(|e| Error::fs("writing", &target, e))?;
        Ok(target)
    }
}

fn walk_error(root: &Path, err: walkdir::Error) -> Error {
    let path = err.path().unwrap_or(root).to_path_buf();
    let io = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
    Error::fs("reading", &path, io)
}

/// Those of `dirs` that live inside `tree`, relative to `tree`
///
/// Directories that do not exist yet cannot be nested and are ignored.
fn nested_in<'a>(tree: &Path, dirs: impl IntoIterator<Item = &'a PathBuf>) -> Vec<PathBuf> {
    let Ok(tree) = tree.canonicalize() else {
        return Vec::new();
    };
    dirs.into_iter()
        .filter_map(|dir| dir.canonicalize().ok())
        .filter_map(|dir| dir.strip_prefix(&tree).ok().map(Path::to_path_buf))
        .filter(|rel| !rel.as_os_str().is_empty())
        .collect()
}

/// Recursively copy the contents of `src` into `dst`
///
/// Symlinks are recreated rather than followed. Entries whose path relative
/// to `src` is listed in `skip` are left out with everything below them.
pub(crate) fn copy_tree(src: &Path, dst: &Path, skip: &[PathBuf]) -> Result<()> {
    let walker = WalkDir::new(src)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| match e.path().strip_prefix(src) {
            Ok(rel) => !skip.iter().any(|s| s == rel),
            Err(_) => true,
        });

    for entry in walker {
        let entry = entry.map_err(|e| walk_error(src, e))?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| Error::fs("resolving", entry.path(), io::Error::other(e)))?;
        let target = dst.join(rel);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| Error::fs("creating directory", &target, e))?;
        } else if file_type.is_symlink() {
            let link = fs::read_link(entry.path())
                .map_err(|e| Error::fs("reading symlink", entry.path(), e))?;
            std::os::unix::fs::symlink(&link, &target)
                .map_err(|e| Error::fs("creating symlink", &target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| Error::fs("copying file to", &target, e))?;
        }
    }
    Ok(())
}

/// Remove whatever is at `path` (file, symlink or directory tree)
pub(crate) fn remove_entry(path: &Path) -> io::Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

/// Move every top-level entry of `from` into `to`, replacing same-named ones
pub(crate) fn move_entries(from: &Path, to: &Path) -> Result<Vec<PathBuf>> {
    let mut moved = Vec::new();
    let entries = fs::read_dir(from).map_err(|e| Error::fs("reading", from, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| Error::fs("reading", from, e))?;
        let target = to.join(entry.file_name());
        remove_entry(&target).map_err(|e| Error::fs("replacing", &target, e))?;
        fs::rename(entry.path(), &target).map_err(|e| Error::fs("moving into place", &target, e))?;
        moved.push(target);
    }
    Ok(moved)
}
