use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

const SCRATCH_PREFIX: &str = "dwi2mask-tmp-";
const SUFFIX_LEN: usize = 6;

/// Working directory holding every intermediate file of one run.
/// External commands execute with this as their current directory.
///
/// Dropping it without calling [`finish`](Self::finish) or
/// [`retain`](Self::retain) deletes the directory.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Creates a fresh `dwi2mask-tmp-XXXXXX` directory under `parent`.
    pub fn create<P: AsRef<Path>>(parent: P) -> Result<Self> {
        let parent = parent.as_ref();
        fs::create_dir_all(parent)?;

        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .rand_bytes(SUFFIX_LEN)
            .tempdir_in(parent)?;
        info!(path = %dir.path().display(), "Generated scratch directory");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn to_scratch(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Deletes the directory when `cleanup` is set; otherwise hands its
    /// location back so it can be reported.
    pub fn finish(self, cleanup: bool) -> Result<Option<PathBuf>> {
        if cleanup {
            debug!(path = %self.path().display(), "Deleting scratch directory");
            self.dir.close()?;
            Ok(None)
        } else {
            Ok(Some(self.retain()))
        }
    }

    /// Gives up ownership without deleting anything.
    pub fn retain(self) -> PathBuf {
        self.dir.keep()
    }
}
