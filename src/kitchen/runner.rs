// src/kitchen/runner.rs

//! External command execution
//!
//! Every external program the pipeline touches (the build backend, apt)
//! goes through a [`ToolRunner`] so tests can substitute a recorder.

use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// One external command: program, arguments and working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

impl ToolInvocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs external commands to completion
///
/// Success is a zero exit status; anything else is an
/// [`Error::ExternalTool`].
pub trait ToolRunner: Send + Sync {
    fn run(&self, invocation: &ToolInvocation) -> Result<()>;
}

/// Runs commands on the host, inheriting stdio
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<()> {
        debug!("Running: {}", invocation);

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(cwd) = &invocation.cwd {
            command.current_dir(cwd);
        }

        let status = command.status().map_err(|e| Error::ExternalTool {
            tool: invocation.program.clone(),
            status: None,
            message: format!("failed to start: {}", e),
        })?;

        if !status.success() {
            return Err(Error::tool_status(&invocation.program, status));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_invocation_display() {
        let inv = ToolInvocation::new("dpkg-buildpackage").args(["-b", "-j4"]);
        assert_eq!(inv.to_string(), "dpkg-buildpackage -b -j4");
    }

    #[test]
    fn test_system_runner_success() {
        assert!(SystemRunner.run(&ToolInvocation::new("true")).is_ok());
    }

    #[test]
    fn test_system_runner_nonzero_exit() {
        let err = SystemRunner
            .run(&ToolInvocation::new("sh").args(["-c", "exit 3"]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExternalTool);
        match err {
            Error::ExternalTool { status, .. } => assert_eq!(status, Some(3)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_system_runner_missing_program() {
        let err = SystemRunner
            .run(&ToolInvocation::new("definitely_not_a_real_command_12345"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExternalTool);
    }

    #[test]
    fn test_system_runner_uses_cwd() {
        let dir = tempfile::tempdir().unwrap();
        SystemRunner
            .run(
                &ToolInvocation::new("sh")
                    .args(["-c", "touch marker"])
                    .current_dir(dir.path()),
            )
            .unwrap();
        assert!(dir.path().join("marker").exists());
    }
}
