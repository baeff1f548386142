//! Filesystem adapters for AgentForge.
//!
//! Data directory resolution and export of generated projects to disk.

use std::path::{Component, Path, PathBuf};

use agentforge_types::project::GeneratedFile;

/// Local filesystem writer for generated projects.
///
/// All operations go through `tokio::fs` for async I/O.
pub struct LocalFileSystem;

impl LocalFileSystem {
    /// Create a new LocalFileSystem adapter.
    pub fn new() -> Self {
        Self
    }

    /// Path of the agent database inside the data directory.
    pub fn database_path(data_dir: &Path) -> PathBuf {
        data_dir.join("agentforge.db")
    }

    /// Path of the global config file inside the data directory.
    pub fn config_path(data_dir: &Path) -> PathBuf {
        data_dir.join("config.toml")
    }

    /// Write every generated file under `out_dir`, creating directories as
    /// needed. Returns the written paths in project order.
    ///
    /// Filenames that are absolute or climb out of `out_dir` are rejected
    /// before anything is written.
    pub async fn export_project(
        &self,
        out_dir: &Path,
        files: &[GeneratedFile],
    ) -> Result<Vec<PathBuf>, std::io::Error> {
        let targets = files
            .iter()
            .map(|file| Ok((safe_join(out_dir, &file.filename)?, file)))
            .collect::<Result<Vec<_>, std::io::Error>>()?;

        let mut written = Vec::with_capacity(targets.len());
        for (path, file) in targets {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(&path, &file.content).await?;
            tracing::debug!(path = %path.display(), bytes = file.content.len(), "exported file");
            written.push(path);
        }
        Ok(written)
    }
}

impl Default for LocalFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn safe_join(root: &Path, filename: &str) -> Result<PathBuf, std::io::Error> {
    let relative = Path::new(filename);
    let escapes = filename.is_empty()
        || relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("refusing to write outside the export directory: '{filename}'"),
        ));
    }
    Ok(root.join(relative))
}

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `AGENTFORGE_DATA_DIR` environment variable
/// 2. `~/.agentforge`
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("AGENTFORGE_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".agentforge");
    }

    // Last resort: current directory
    PathBuf::from(".agentforge")
}
