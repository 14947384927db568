// File: ./src/context.rs
/*! Application context abstraction for filesystem paths.

`AppContext` decides where configuration, exported data and log files live.
`StandardContext` uses `directories::ProjectDirs` unless an override root is
given (`--root`); `TestContext` owns a temporary directory that is removed
when dropped.

Nothing here reads environment variables; callers pass a context explicitly.
*/

use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub trait AppContext: Send + Sync + std::fmt::Debug {
    fn get_data_dir(&self) -> Result<PathBuf>;
    fn get_config_dir(&self) -> Result<PathBuf>;
    fn get_log_dir(&self) -> Result<PathBuf>;

    fn get_config_file_path(&self) -> Result<PathBuf> {
        Ok(self.get_config_dir()?.join("config.toml"))
    }

    fn get_log_file_path(&self) -> Result<PathBuf> {
        Ok(self.get_log_dir()?.join("shelflife.log"))
    }
}

fn ensure_exists(path: PathBuf) -> Result<PathBuf> {
    if !path.exists() {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create directory: {:?}", path))?;
    }
    Ok(path)
}

// --- Production Implementation ---

#[derive(Clone, Debug)]
pub struct StandardContext {
    override_root: Option<PathBuf>,
}

impl StandardContext {
    /// When `override_root` is `Some(path)`, everything lives under that root
    /// in `data`, `config` and `logs` subdirectories.
    pub fn new(override_root: Option<PathBuf>) -> Self {
        Self { override_root }
    }

    fn get_proj_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("org", "shelflife", "shelflife")
            .ok_or_else(|| anyhow::anyhow!("No home directory"))
    }

    fn resolve(&self, subdir: &str) -> Result<PathBuf> {
        if let Some(root) = &self.override_root {
            return ensure_exists(root.join(subdir));
        }
        let proj = Self::get_proj_dirs()?;
        let dir = match subdir {
            "data" => proj.data_dir().to_path_buf(),
            "config" => proj.config_dir().to_path_buf(),
            // Logs are disposable, so they go with the cache
            _ => proj.cache_dir().join(subdir),
        };
        ensure_exists(dir)
    }
}

impl AppContext for StandardContext {
    fn get_data_dir(&self) -> Result<PathBuf> {
        self.resolve("data")
    }

    fn get_config_dir(&self) -> Result<PathBuf> {
        self.resolve("config")
    }

    fn get_log_dir(&self) -> Result<PathBuf> {
        self.resolve("logs")
    }
}

// --- Test Implementation ---

#[derive(Clone, Debug)]
pub struct TestContext {
    pub root: PathBuf,
}

impl TestContext {
    /// Creates a new TestContext backed by a unique temporary directory.
    pub fn new() -> Self {
        let uuid = uuid::Uuid::new_v4();
        let root = std::env::temp_dir().join(format!("shelflife_test_{}", uuid));
        std::fs::create_dir_all(&root).expect("failed to create TestContext temp dir");
        Self { root }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AppContext for TestContext {
    fn get_data_dir(&self) -> Result<PathBuf> {
        ensure_exists(self.root.join("data"))
    }

    fn get_config_dir(&self) -> Result<PathBuf> {
        ensure_exists(self.root.join("config"))
    }

    fn get_log_dir(&self) -> Result<PathBuf> {
        ensure_exists(self.root.join("logs"))
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        // Best-effort cleanup; ignore errors.
        let _ = std::fs::remove_dir_all(&self.root);
    }
}
