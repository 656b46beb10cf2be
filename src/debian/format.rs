// src/debian/format.rs

//! Source package format detection from `debian/source/format`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Marker text for the quilt format
pub const QUILT_MARKER: &str = "3.0 (quilt)";
/// Marker text for the native format
pub const NATIVE_MARKER: &str = "3.0 (native)";

/// Supported source package formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Upstream and packaging changes live together
    Native,
    /// Pristine upstream archive plus a patch overlay
    Quilt,
}

impl SourceFormat {
    /// Whether the build needs a `.orig.tar.xz` next to the staging directory
    pub fn needs_orig_archive(&self) -> bool {
        matches!(self, SourceFormat::Quilt)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Native => "native",
            SourceFormat::Quilt => "quilt",
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "native" => Ok(SourceFormat::Native),
            "quilt" => Ok(SourceFormat::Quilt),
            other => Err(format!("unknown source format '{}' (expected native or quilt)", other)),
        }
    }
}

/// Map marker text to a format; unknown text yields `None`
///
/// Only the line terminator is stripped; other whitespace makes the marker
/// unrecognized.
pub fn parse_marker(line: &str) -> Option<SourceFormat> {
    match line.trim_end_matches(['\r', '\n']) {
        QUILT_MARKER => Some(SourceFormat::Quilt),
        NATIVE_MARKER => Some(SourceFormat::Native),
        _ => None,
    }
}

/// Classify a package from its format marker file
///
/// A missing, unreadable or unrecognized marker leaves `default` unchanged.
pub fn classify(marker: &Path, default: SourceFormat) -> SourceFormat {
    let content = match std::fs::read_to_string(marker) {
        Ok(content) => content,
        Err(e) => {
            debug!("No usable format marker at {}: {}", marker.display(), e);
            return default;
        }
    };

    let first = content.lines().next().unwrap_or("");
    match parse_marker(first) {
        Some(format) => format,
        None => {
            debug!(
                "Unrecognized format marker {:?} in {}, keeping {}",
                first,
                marker.display(),
                default
            );
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn marker_with(content: &str) -> (TempDir, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("format");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_quilt_marker_overrides_default() {
        let (_dir, path) = marker_with("3.0 (quilt)\n");
        assert_eq!(classify(&path, SourceFormat::Native), SourceFormat::Quilt);
        assert_eq!(classify(&path, SourceFormat::Quilt), SourceFormat::Quilt);
    }

    #[test]
    fn test_native_marker_overrides_default() {
        let (_dir, path) = marker_with("3.0 (native)");
        assert_eq!(classify(&path, SourceFormat::Quilt), SourceFormat::Native);
    }

    #[test]
    fn test_missing_marker_keeps_default() {
        let path = Path::new("/nonexistent/debian/source/format");
        assert_eq!(classify(path, SourceFormat::Quilt), SourceFormat::Quilt);
        assert_eq!(classify(path, SourceFormat::Native), SourceFormat::Native);
    }

    #[test]
    fn test_unrecognized_marker_keeps_default() {
        for content in ["1.0\n", "3.0 (git)\n", " 3.0 (quilt)\n", "3.0 (quilt)  \n", ""] {
            let (_dir, path) = marker_with(content);
            assert_eq!(classify(&path, SourceFormat::Native), SourceFormat::Native, "{:?}", content);
            assert_eq!(classify(&path, SourceFormat::Quilt), SourceFormat::Quilt, "{:?}", content);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Quilt".parse::<SourceFormat>().unwrap(), SourceFormat::Quilt);
        assert_eq!("native".parse::<SourceFormat>().unwrap(), SourceFormat::Native);
        assert!("git".parse::<SourceFormat>().is_err());
    }

    #[test]
    fn test_parse_marker_strips_only_line_endings() {
        assert_eq!(parse_marker("3.0 (quilt)\r\n"), Some(SourceFormat::Quilt));
        assert_eq!(parse_marker("3.0 (native)\n"), Some(SourceFormat::Native));
        assert_eq!(parse_marker("3.0 (quilt)  "), None);
        assert_eq!(parse_marker("3.0 (native)\t"), None);
    }
}
