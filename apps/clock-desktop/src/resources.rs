//! Locating bundled assets relative to the executable.
//!
//! The clock ships as an application bundle: the binary lives in
//! `Contents/MacOS` and its assets in `Contents/Resources`.

use std::path::{Component, Path, PathBuf};

use anyhow::Context;

/// Resources directory, relative to the directory holding the executable.
pub const RESOURCES_RELATIVE: &str = "../Resources";

/// The bundle's resources directory.
#[derive(Debug, Clone)]
pub struct Resources {
    dir: PathBuf,
}

impl Resources {
    /// Finds the resources directory next to the running executable.
    pub fn locate() -> anyhow::Result<Self> {
        let exe = std::env::current_exe().context("cannot resolve executable path")?;
        Ok(Self::beside(&exe, RESOURCES_RELATIVE))
    }

    /// Resolves `relative` against the directory containing `exe`.
    pub fn beside(exe: &Path, relative: &str) -> Self {
        let mut dir = exe.parent().map(Path::to_path_buf).unwrap_or_default();
        for component in Path::new(relative).components() {
            match component {
                Component::ParentDir => {
                    if !dir.pop() {
                        dir.push("..");
                    }
                }
                Component::CurDir => {}
                other => dir.push(other.as_os_str()),
            }
        }
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a named asset.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Reads a named asset into memory.
    pub fn read(&self, name: &str) -> anyhow::Result<Vec<u8>> {
        let path = self.path(name);
        std::fs::read(&path).with_context(|| format!("cannot read {}", path.display()))
    }
}
