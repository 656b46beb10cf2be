// tests/common/mod.rs

//! Shared test utilities: source tree fixtures and a fake build backend.

#![allow(dead_code)]

use lingmo_pkgbuild::{BuildConfig, Error, Result, ToolInvocation, ToolRunner};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

pub const CONTROL_FOO: &str =
    "Source: foo\nPackage: foo\nArchitecture: amd64\nMaintainer: A <a@b.c>\nDescription: test";

/// Write a package source tree at `dir`
pub fn write_package(dir: &Path, changelog: &str, control: &str, format: Option<&str>) {
    fs::create_dir_all(dir.join("debian")).unwrap();
    fs::write(dir.join("debian/changelog"), changelog).unwrap();
    fs::write(dir.join("debian/control"), control).unwrap();
    if let Some(format) = format {
        fs::create_dir_all(dir.join("debian/source")).unwrap();
        fs::write(dir.join("debian/source/format"), format).unwrap();
    }
    fs::write(dir.join("Makefile"), "all:\n\ttrue\n").unwrap();
    fs::create_dir_all(dir.join("src")).unwrap();
    fs::write(dir.join("src/main.c"), "int main(void) { return 0; }\n").unwrap();
}

/// A simple, well-formed package named `name`
pub fn write_simple_package(dir: &Path, name: &str, version: &str) {
    write_package(
        dir,
        &format!("{} ({}) unstable; urgency=low\n", name, version),
        &format!("Source: {name}\nPackage: {name}\nArchitecture: any\n"),
        None,
    );
}

/// Temp workspace with a config pointing its build root and output inside it
pub fn workspace() -> (TempDir, BuildConfig) {
    let temp = tempfile::tempdir().unwrap();
    let config = BuildConfig::default()
        .with_build_root(temp.path().join("build"))
        .with_output_dir(temp.path().join("out"));
    (temp, config)
}

/// Fake `dpkg-buildpackage`
///
/// Records every invocation. For a successful build it drops
/// `<staging>_fake_all.deb` and a `.changes` file next to the staging
/// directory, like the real backend. Staging directories listed in
/// `failing` make the build exit with status 2.
pub struct FakeBackend {
    pub calls: Mutex<Vec<ToolInvocation>>,
    failing: Vec<String>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::failing(&[])
    }

    pub fn failing(names: &[&str]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.lock().unwrap().clone()
    }

    pub fn build_calls(&self) -> Vec<ToolInvocation> {
        self.calls()
            .into_iter()
            .filter(|c| c.program == "dpkg-buildpackage")
            .collect()
    }
}

impl ToolRunner for FakeBackend {
    fn run(&self, invocation: &ToolInvocation) -> Result<()> {
        self.calls.lock().unwrap().push(invocation.clone());

        let Some(cwd) = &invocation.cwd else {
            return Ok(());
        };
        let name = cwd.file_name().unwrap().to_string_lossy().into_owned();
        if self.failing.contains(&name) {
            return Err(Error::ExternalTool {
                tool: invocation.program.clone(),
                status: Some(2),
                message: "exited with status 2".to_string(),
            });
        }

        let parent = cwd.parent().unwrap();
        fs::write(parent.join(format!("{}_fake_all.deb", name)), b"!<arch>\n").unwrap();
        fs::write(parent.join(format!("{}_fake_amd64.changes", name)), "Format: 1.8\n").unwrap();
        Ok(())
    }
}

/// Sorted file names in a directory
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub fn path_in(dir: &Path, name: &str) -> PathBuf {
    dir.join(name)
}
