// src/kitchen/orig.rs

//! Upstream (`.orig.tar.xz`) archive creation for quilt-format packages
//!
//! The archive is written next to the staging directory, where the backend
//! looks for it. Its root is the content of the staging directory, minus
//! the top-level `debian/` directory. No intermediate copy of the tree is
//! made; entries are streamed from the staging directory straight into the
//! compressor and the finished archive is renamed into place.

use super::staging::StagingDir;
use crate::debian::{Package, DEBIAN_DIR};
use crate::error::{Error, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tar::Builder as TarBuilder;
use tracing::{debug, info};
use walkdir::WalkDir;
use xz2::write::XzEncoder;

/// xz preset used for orig archives
const XZ_LEVEL: u32 = 6;

/// Create the orig archive if the package's format needs one
///
/// Returns `Ok(None)` for native packages.
pub fn create_orig_archive(package: &Package, staging: &StagingDir) -> Result<Option<PathBuf>> {
    if !package.format().needs_orig_archive() {
        debug!("{} is native, no orig archive needed", package.name());
        return Ok(None);
    }

    let archive_path = staging.parent().join(package.orig_archive_name());
    info!("Creating {}", archive_path.display());

    let tmp = tempfile::Builder::new()
        .prefix(".orig-")
        .tempfile_in(staging.parent())
        .map_err(|e| Error::fs("creating temporary archive in", staging.parent(), e))?;

    let file = tmp
        .reopen()
        .map_err(|e| Error::fs("opening", tmp.path(), e))?;
    write_archive(staging.path(), file).map_err(|e| match e {
        ArchiveError::Walk(err) => err,
        ArchiveError::Io(err) => Error::fs("writing orig archive", &archive_path, err),
    })?;

    tmp.persist(&archive_path)
        .map_err(|e| Error::fs("moving into place", &archive_path, e.error))?;

    Ok(Some(archive_path))
}

enum ArchiveError {
    Walk(Error),
    Io(io::Error),
}

impl From<io::Error> for ArchiveError {
    fn from(err: io::Error) -> Self {
        ArchiveError::Io(err)
    }
}

fn write_archive(root: &Path, file: File) -> std::result::Result<(), ArchiveError> {
    let encoder = XzEncoder::new(file, XZ_LEVEL);
    let mut archive = TarBuilder::new(encoder);
    archive.follow_symlinks(false);

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !(e.depth() == 1 && e.file_name() == DEBIAN_DIR));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            let io = e
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
            ArchiveError::Walk(Error::fs("reading", &path, io))
        })?;
        let rel = entry.path().strip_prefix(root).map_err(io::Error::other)?;

        if entry.file_type().is_dir() {
            archive.append_dir(rel, entry.path())?;
        } else {
            archive.append_path_with_name(entry.path(), rel)?;
        }
    }

    let mut encoder = archive.into_inner()?;
    encoder.flush()?;
    encoder.finish()?;
    Ok(())
}
