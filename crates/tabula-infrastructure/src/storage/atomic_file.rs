//! Atomic single-slot file operations.
//!
//! Provides a thin layer for safely replacing the one on-disk file backing
//! the dataset slot: temp file + fsync + atomic rename, with an advisory
//! lock so a concurrent reader never observes a half-written slot.

use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::{Path, PathBuf};
use tabula_core::error::{Result, TabulaError};

/// A handle to a single-slot file with atomic replacement semantics.
///
/// - **Atomicity**: writes are all-or-nothing via tmp file + atomic rename
/// - **Durability**: explicit fsync before rename
/// - **Isolation**: an advisory file lock brackets each operation
pub struct AtomicSlotFile {
    path: PathBuf,
}

impl AtomicSlotFile {
    /// Creates a new slot handle for `path`. The file itself is created on
    /// the first write.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The slot's location on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the slot's current contents.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(bytes))`: the slot's occupant
    /// - `Ok(None)`: the slot file does not exist or is empty
    /// - `Err(_)`: the file exists but could not be read
    pub fn read(&self) -> Result<Option<Vec<u8>>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let _lock = FileLock::acquire(&self.path)?;
        let bytes = fs::read(&self.path)?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(bytes))
    }

    /// Replaces the slot's contents atomically, creating parent directories
    /// as needed.
    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let _lock = FileLock::acquire(&self.path)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(bytes)?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| TabulaError::io("slot path has no parent directory"))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| TabulaError::io("slot path has no file name"))?;
        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(parent.join(tmp_name))
    }
}

/// An advisory lock guard; the lock is released when the handle closes.
///
/// The lock file is never removed: deleting it would let a new locker
/// create a fresh inode while an existing holder still locks the old one,
/// so two processes could hold the "exclusive" lock at once.
struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| TabulaError::io(format!("failed to acquire slot lock: {e}")))?;
        }

        Ok(FileLock { file })
    }
}
