/*! Temporary artifacts of a bootstrap run.

A [Workspace] owns a base directory for the whole run and hands out one [IterationArea] per iteration.
Both are removed when dropped, whatever the outcome of the run: an iteration that fails halfway
through still leaves nothing behind.

Removal failures are logged and otherwise ignored.
!*/
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::Error;

#[derive(Debug)]
pub struct Workspace {
    base: PathBuf,
}

impl Workspace {
    /// Ensure `base` exists and take ownership of it.
    ///
    /// `base` and everything it contains is deleted on drop.
    pub fn create(base: &Path) -> Result<Self, Error> {
        std::fs::create_dir_all(base)?;
        debug!("workspace created at {:?}", base);
        Ok(Self {
            base: base.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.base
    }

    /// Create the working area of iteration `k`.
    pub fn iteration(&self, k: usize) -> Result<IterationArea, Error> {
        let dir = self.base.join(format!("iter_{k}"));
        std::fs::create_dir_all(&dir)?;
        Ok(IterationArea { dir })
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        remove_dir(&self.base);
    }
}

/// Files of a single bootstrap iteration.
#[derive(Debug)]
pub struct IterationArea {
    dir: PathBuf,
}

impl IterationArea {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn src(&self) -> PathBuf {
        self.dir.join("src.txt")
    }

    pub fn reference(&self) -> PathBuf {
        self.dir.join("ref.txt")
    }

    pub fn baseline_out(&self) -> PathBuf {
        self.dir.join("base_out.txt")
    }

    pub fn experimental_out(&self) -> PathBuf {
        self.dir.join("exp_out.txt")
    }
}

impl Drop for IterationArea {
    fn drop(&mut self) {
        remove_dir(&self.dir);
    }
}

fn remove_dir(dir: &Path) {
    if !dir.exists() {
        return;
    }
    if let Err(e) = std::fs::remove_dir_all(dir) {
        warn!("could not remove temporary directory {:?}: {}", dir, e);
    }
}
