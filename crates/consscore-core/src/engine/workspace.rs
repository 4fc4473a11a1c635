use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The working directory of one pipeline run.
///
/// Acquiring a workspace creates the directory if needed. The owner must call
/// [`Workspace::close`] on every exit path; nothing is removed on drop.
#[derive(Debug)]
pub struct Workspace {
    dir: PathBuf,
}

impl Workspace {
    pub fn acquire(dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        debug!(dir = %dir.display(), "Acquired working directory.");
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    pub fn file(&self, name: &str, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", name, extension))
    }

    /// Releases the directory. Unless `keep` is set, an empty directory is removed.
    ///
    /// Returns whether the directory was removed.
    pub fn close(self, keep: bool) -> io::Result<bool> {
        if keep || !self.dir.is_dir() {
            return Ok(false);
        }
        if fs::read_dir(&self.dir)?.next().is_some() {
            return Ok(false);
        }
        fs::remove_dir(&self.dir)?;
        debug!(dir = %self.dir.display(), "Removed empty working directory.");
        Ok(true)
    }
}
