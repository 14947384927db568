// Atomic file writes for exports; locked ones for the config file we own.
use anyhow::{Context, Result};
use fs2::FileExt;
use std::fs;
use std::path::{Path, PathBuf};

pub struct LocalStorage;

impl LocalStorage {
    fn get_lock_path(file_path: &Path) -> PathBuf {
        let mut lock_path = file_path.to_path_buf();
        if let Some(ext) = lock_path.extension() {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".lock");
            lock_path.set_extension(new_ext);
        } else {
            lock_path.set_extension("lock");
        }
        lock_path
    }

    // Full file name plus `.tmp`, so `a.csv` and `a.json` never share one
    fn get_tmp_path(file_path: &Path) -> PathBuf {
        let mut name = file_path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        file_path.with_file_name(name)
    }

    fn ensure_parent(file_path: &Path) -> Result<()> {
        if let Some(parent) = file_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
        Ok(())
    }

    /// Runs `f` while holding an exclusive advisory lock next to `file_path`.
    pub fn with_lock<F, T>(file_path: &Path, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        Self::ensure_parent(file_path)?;

        let lock_path = Self::get_lock_path(file_path);
        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {:?}", lock_path))?;

        file.lock_exclusive()?;
        let result = f();
        file.unlock()?;
        result
    }

    /// Atomic write: Write to .tmp file then rename
    pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        Self::ensure_parent(path)?;
        let tmp_path = Self::get_tmp_path(path);
        fs::write(&tmp_path, contents)
            .with_context(|| format!("Failed to write {:?}", tmp_path))?;
        fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to move {:?} into place", path))?;
        Ok(())
    }

    /// Locked atomic write for files the application owns. Leaves a
    /// `.lock` sibling behind, so use [`LocalStorage::atomic_write`] for
    /// user-chosen destinations.
    pub fn save<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
        let path = path.as_ref();
        Self::with_lock(path, || Self::atomic_write(path, contents))?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}
