// src/debian/control.rs

//! Line-oriented parser for `debian/control`
//!
//! This is not a full deb822 parser. Each top-level
//! `Field: value` line is looked at on its own:
//!
//! - blank lines and `#` comments are skipped
//! - lines starting with whitespace are continuations and are not merged,
//!   so a multi-line `Description` keeps only its synopsis
//! - the first occurrence of a field wins across all stanzas
//! - `Source:` only records that a source stanza exists
//!
//! Anything unexpected is reported as a [`Diagnostic`] rather than an error.

use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;

/// Fields the resolver cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlField {
    Package,
    Version,
    Architecture,
    Maintainer,
    Description,
    Source,
}

impl ControlField {
    pub const ALL: [ControlField; 6] = [
        ControlField::Package,
        ControlField::Version,
        ControlField::Architecture,
        ControlField::Maintainer,
        ControlField::Description,
        ControlField::Source,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ControlField::Package => "Package",
            ControlField::Version => "Version",
            ControlField::Architecture => "Architecture",
            ControlField::Maintainer => "Maintainer",
            ControlField::Description => "Description",
            ControlField::Source => "Source",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == key)
    }
}

impl fmt::Display for ControlField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a line was not used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Indented line; not merged into the previous field
    ContinuationIgnored { field: Option<ControlField> },
    /// A recognized field seen again; the first value is kept
    DuplicateField(ControlField),
    /// Top-level line with no `:` separator
    MissingSeparator,
    /// Recognized field with an empty value
    EmptyValue(ControlField),
}

/// Something in the control file worth telling the user about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number
    pub line: usize,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::ContinuationIgnored { field: Some(field) } => write!(
                f,
                "line {}: continuation of {} ignored (only the first line is used)",
                self.line, field
            ),
            DiagnosticKind::ContinuationIgnored { field: None } => {
                write!(f, "line {}: continuation line ignored", self.line)
            }
            DiagnosticKind::DuplicateField(field) => write!(
                f,
                "line {}: duplicate {} ignored (first occurrence wins)",
                self.line, field
            ),
            DiagnosticKind::MissingSeparator => {
                write!(f, "line {}: expected 'Field: value'", self.line)
            }
            DiagnosticKind::EmptyValue(field) => {
                write!(f, "line {}: {} has an empty value", self.line, field)
            }
        }
    }
}

/// Result of parsing a control file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlFields {
    pub package: Option<String>,
    pub version: Option<String>,
    pub architecture: Option<String>,
    pub maintainer: Option<String>,
    pub description: Option<String>,
    /// A `Source:` line was present
    pub source_declared: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl ControlFields {
    fn slot(&mut self, field: ControlField) -> Option<&mut Option<String>> {
        match field {
            ControlField::Package => Some(&mut self.package),
            ControlField::Version => Some(&mut self.version),
            ControlField::Architecture => Some(&mut self.architecture),
            ControlField::Maintainer => Some(&mut self.maintainer),
            ControlField::Description => Some(&mut self.description),
            ControlField::Source => None,
        }
    }

    /// Value of a field, if it was set
    pub fn get(&self, field: ControlField) -> Option<&str> {
        match field {
            ControlField::Package => self.package.as_deref(),
            ControlField::Version => self.version.as_deref(),
            ControlField::Architecture => self.architecture.as_deref(),
            ControlField::Maintainer => self.maintainer.as_deref(),
            ControlField::Description => self.description.as_deref(),
            ControlField::Source => None,
        }
    }
}

/// Parse control file text
pub fn parse_control(content: &str) -> ControlFields {
    let mut fields = ControlFields::default();
    let mut last_field: Option<ControlField> = None;

    for (idx, line) in content.lines().enumerate() {
        let lineno = idx + 1;

        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with(char::is_whitespace) {
            fields.diagnostics.push(Diagnostic {
                line: lineno,
                kind: DiagnosticKind::ContinuationIgnored { field: last_field },
            });
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            fields.diagnostics.push(Diagnostic {
                line: lineno,
                kind: DiagnosticKind::MissingSeparator,
            });
            last_field = None;
            continue;
        };

        let Some(field) = ControlField::from_key(key) else {
            last_field = None;
            continue;
        };
        last_field = Some(field);

        if field == ControlField::Source {
            fields.source_declared = true;
            continue;
        }

        if fields.get(field).is_some() {
            fields.diagnostics.push(Diagnostic {
                line: lineno,
                kind: DiagnosticKind::DuplicateField(field),
            });
            continue;
        }

        let value = value.trim();
        if let Some(slot) = fields.slot(field) {
            *slot = Some(value.to_string());
        }

        if value.is_empty() {
            fields.diagnostics.push(Diagnostic {
                line: lineno,
                kind: DiagnosticKind::EmptyValue(field),
            });
        }
    }

    fields
}

/// Read and parse a control file
pub fn read_control(path: &Path) -> Result<ControlFields> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::metadata(path, None, "control", format!("cannot read: {}", e)))?;
    Ok(parse_control(&content))
}
