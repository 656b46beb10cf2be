// src/debian/package.rs

//! Package identity resolution
//!
//! Combines the changelog header, the control file and the format marker
//! into a [`Package`]. Precedence:
//!
//! - version: changelog, then control `Version:`, then [`DEFAULT_VERSION`]
//! - architecture: control `Architecture:`, then `all` if a `Source:` stanza
//!   was declared, otherwise a validation error

use super::changelog::{self, ChangelogHeader};
use super::control::{self, ControlFields, DiagnosticKind};
use super::format::{self, SourceFormat};
use super::DebianDir;
use crate::error::{Error, Result};
use std::path::Path;
use tracing::{debug, warn};

/// Version used when neither changelog nor control provides one
pub const DEFAULT_VERSION: &str = "0.1.0";
/// Architecture assumed for source-declared packages without one
pub const DEFAULT_SOURCE_ARCH: &str = "all";

/// Where the resolved version came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionOrigin {
    Changelog,
    Control,
    Default,
}

/// Resolved identity of a package, before format classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    pub version_origin: VersionOrigin,
    pub architecture: String,
    pub maintainer: String,
    pub description: String,
}

/// Merge a changelog header with control fields
pub fn merge(
    header: ChangelogHeader,
    fields: ControlFields,
    control_path: &Path,
) -> Result<PackageMetadata> {
    for diagnostic in &fields.diagnostics {
        match diagnostic.kind {
            DiagnosticKind::ContinuationIgnored { .. } => {
                debug!("{}: {}", control_path.display(), diagnostic)
            }
            _ => warn!("{}: {}", control_path.display(), diagnostic),
        }
    }

    if fields.package.as_deref().is_none_or(str::is_empty) {
        return Err(Error::metadata(
            control_path,
            None,
            "Package",
            "no non-empty Package field",
        ));
    }

    let (version, version_origin) = match (header.version, fields.version) {
        (Some(v), _) if !v.is_empty() => (v, VersionOrigin::Changelog),
        (_, Some(v)) if !v.is_empty() => (v, VersionOrigin::Control),
        _ => {
            warn!(
                "No version in changelog or control for {}, using {}",
                header.name, DEFAULT_VERSION
            );
            (DEFAULT_VERSION.to_string(), VersionOrigin::Default)
        }
    };

    let architecture = match fields.architecture {
        Some(arch) if !arch.is_empty() => arch,
        _ if fields.source_declared => {
            debug!("Source package {} defaults to architecture {}", header.name, DEFAULT_SOURCE_ARCH);
            DEFAULT_SOURCE_ARCH.to_string()
        }
        _ => {
            return Err(Error::validation(
                "Architecture",
                format!(
                    "{} has no Architecture field and no Source stanza",
                    control_path.display()
                ),
            ))
        }
    };

    Ok(PackageMetadata {
        name: header.name,
        version,
        version_origin,
        architecture,
        maintainer: fields.maintainer.unwrap_or_default(),
        description: fields.description.unwrap_or_default(),
    })
}

/// Parse and merge a changelog and control file
pub fn resolve_metadata(changelog_path: &Path, control_path: &Path) -> Result<PackageMetadata> {
    let header = changelog::read_header(changelog_path)?;
    if header.version.is_none() {
        warn!("Could not read a version from {}", changelog_path.display());
    }
    let fields = control::read_control(control_path)?;
    merge(header, fields, control_path)
}

/// Identity and format of one buildable unit
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    metadata: PackageMetadata,
    format: SourceFormat,
}

impl Package {
    pub fn new(metadata: PackageMetadata, format: SourceFormat) -> Self {
        Self { metadata, format }
    }

    /// Resolve a package from a tree containing `debian/`
    pub fn from_source_tree(tree: &Path, default_format: SourceFormat) -> Result<Self> {
        let debian = DebianDir::new(tree);
        let metadata = resolve_metadata(&debian.changelog(), &debian.control())?;
        let format = format::classify(&debian.format_marker(), default_format);
        debug!(
            "Resolved {} {} ({}, {} format)",
            metadata.name, metadata.version, metadata.architecture, format
        );
        Ok(Self::new(metadata, format))
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    pub fn version_origin(&self) -> VersionOrigin {
        self.metadata.version_origin
    }

    pub fn architecture(&self) -> &str {
        &self.metadata.architecture
    }

    pub fn maintainer(&self) -> &str {
        &self.metadata.maintainer
    }

    pub fn description(&self) -> &str {
        &self.metadata.description
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    /// Version without the Debian revision
    pub fn upstream_version(&self) -> &str {
        upstream_version(&self.metadata.version)
    }

    /// `<name>_<upstream>.orig.tar.xz`
    pub fn orig_archive_name(&self) -> String {
        format!("{}_{}.orig.tar.xz", self.name(), self.upstream_version())
    }
}

/// Strip the Debian revision: everything from the first `-` on
pub fn upstream_version(version: &str) -> &str {
    match version.find('-') {
        Some(idx) => &version[..idx],
        None => version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::debian::control::parse_control;

    fn header(version: Option<&str>) -> ChangelogHeader {
        ChangelogHeader {
            name: "foo".to_string(),
            version: version.map(str::to_string),
        }
    }

    fn merge_str(version: Option<&str>, control: &str) -> Result<PackageMetadata> {
        merge(header(version), parse_control(control), Path::new("debian/control"))
    }

    #[test]
    fn test_changelog_version_wins() {
        let meta = merge_str(Some("1.0-1"), "Package: foo\nVersion: 2.0\nArchitecture: any\n").unwrap();
        assert_eq!(meta.version, "1.0-1");
        assert_eq!(meta.version_origin, VersionOrigin::Changelog);
    }

    #[test]
    fn test_control_version_used_when_changelog_empty() {
        let meta = merge_str(None, "Package: foo\nVersion: 2.0\nArchitecture: any\n").unwrap();
        assert_eq!(meta.version, "2.0");
        assert_eq!(meta.version_origin, VersionOrigin::Control);

        let meta = merge_str(Some(""), "Package: foo\nVersion: 2.0\nArchitecture: any\n").unwrap();
        assert_eq!(meta.version, "2.0");
    }

    #[test]
    fn test_default_version() {
        let meta = merge_str(None, "Package: foo\nArchitecture: any\n").unwrap();
        assert_eq!(meta.version, "0.1.0");
        assert_eq!(meta.version_origin, VersionOrigin::Default);
    }

    #[test]
    fn test_source_declared_defaults_architecture() {
        let meta = merge_str(Some("1.0"), "Source: foo\nPackage: foo\n").unwrap();
        assert_eq!(meta.architecture, "all");
    }

    #[test]
    fn test_missing_architecture_without_source_fails() {
        let err = merge_str(Some("1.0"), "Package: foo\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.field(), Some("Architecture"));
    }

    #[test]
    fn test_missing_package_field_fails() {
        let err = merge_str(Some("1.0"), "Source: foo\nArchitecture: any\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Metadata);
        assert_eq!(err.field(), Some("Package"));

        let err = merge_str(Some("1.0"), "Package:\nArchitecture: any\n").unwrap_err();
        assert_eq!(err.field(), Some("Package"));
    }

    #[test]
    fn test_maintainer_and_description_may_be_empty() {
        let meta = merge_str(Some("1.0"), "Package: foo\nArchitecture: any\n").unwrap();
        assert_eq!(meta.maintainer, "");
        assert_eq!(meta.description, "");
    }

    #[test]
    fn test_upstream_version() {
        assert_eq!(upstream_version("1.2.3-4ubuntu1"), "1.2.3");
        assert_eq!(upstream_version("2.0"), "2.0");
        assert_eq!(upstream_version("1.0-1-2"), "1.0");
    }

    #[test]
    fn test_orig_archive_name() {
        let meta = merge_str(Some("1.2.3-4ubuntu1"), "Package: foo\nArchitecture: any\n").unwrap();
        let package = Package::new(meta, SourceFormat::Quilt);
        assert_eq!(package.orig_archive_name(), "foo_1.2.3.orig.tar.xz");
    }
}
