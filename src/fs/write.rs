use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{IoResultExt, Result};

/// write `content` to `dest` atomically
///
/// the bytes land in a uniquely named file under `tmp_dir` first, which is then
/// renamed over `dest`. `tmp_dir` must be on the same filesystem as `dest`.
pub fn write_atomic(tmp_dir: &Path, dest: &Path, content: &[u8], fsync: bool) -> Result<()> {
    let tmp = TempPath::new(tmp_dir.join(uuid::Uuid::new_v4().to_string()));
    {
        let mut tmp_file = File::create(&tmp.path).with_path(&tmp.path)?;
        tmp_file.write_all(content).with_path(&tmp.path)?;
        if fsync {
            tmp_file.sync_all().with_path(&tmp.path)?;
        }
    }

    fs::rename(&tmp.path, dest).with_path(dest)?;
    tmp.persist();

    if fsync {
        if let Some(parent) = dest.parent() {
            fsync_dir(parent)?;
        }
    }

    Ok(())
}

/// temp file that is removed on drop unless persisted
struct TempPath {
    path: PathBuf,
    persisted: bool,
}

impl TempPath {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            persisted: false,
        }
    }

    /// the file has been renamed into place
    fn persist(mut self) {
        self.persisted = true;
    }
}

impl Drop for TempPath {
    fn drop(&mut self) {
        if !self.persisted {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// sync a directory to disk
pub fn fsync_dir(path: &Path) -> Result<()> {
    let dir = File::open(path).with_path(path)?;
    dir.sync_all().with_path(path)?;
    Ok(())
}
