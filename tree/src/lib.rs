use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;
use walkdir::WalkDir;

mod category;
pub use category::Category;

/// A regular file found under the archive root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    pub path: PathBuf,
    /// `/`-separated, relative to the walk root, no leading slash
    pub rel_path: String,
    pub size: u64,
}

impl ArchiveFile {
    fn new(root: &Path, path: PathBuf, size: u64) -> Self {
        let rel = path.strip_prefix(root).unwrap_or(&path);
        let rel_path = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        ArchiveFile {
            path,
            rel_path,
            size,
        }
    }

    pub fn file_name(&self) -> &str {
        self.rel_path
            .rsplit_once('/')
            .map_or(self.rel_path.as_str(), |(_, name)| name)
    }

    /// file name without its final extension
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => name,
        }
    }

    /// lowercase extension without the `.`, empty if there is none
    pub fn extension(&self) -> String {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
            _ => String::new(),
        }
    }

    pub fn category(&self) -> Category {
        Category::from_extension(&self.extension())
    }

    pub fn subdir(&self) -> &str {
        subdir(&self.rel_path)
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>> {
        std::fs::read(&self.path).with_context(|| format!("failed to read {}", self.path.display()))
    }

    /// whole file as UTF-8, invalid sequences replaced
    pub fn read_text(&self) -> Result<String> {
        let bytes = self.read_bytes()?;
        Ok(match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }
}

/// first component of a relative path, or `(root)` for top level files
///
/// ```
/// assert_eq!(tree::subdir("Results/96marin.htm"), "Results");
/// assert_eq!(tree::subdir("w8lift.htm"), "(root)");
/// ```
pub fn subdir(rel_path: &str) -> &str {
    match rel_path.split_once('/') {
        Some((first, _)) => first,
        None => "(root)",
    }
}

/// every regular file under `root`, sorted by path component
pub fn walk(root: &Path) -> Result<Vec<ArchiveFile>> {
    if !root.is_dir() {
        anyhow::bail!("archive root {} is not a directory", root.display());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry: {e}");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let size = match entry.metadata() {
            Ok(m) => m.len(),
            Err(e) => {
                warn!("skipping {}: {e}", entry.path().display());
                continue;
            }
        };
        files.push(ArchiveFile::new(root, entry.into_path(), size));
    }
    Ok(files)
}

/// regular files directly inside `dir`, sorted by name
pub fn list_files(dir: &Path) -> Result<Vec<ArchiveFile>> {
    let rd = std::fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in rd {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        let meta = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                warn!("skipping {}: {e}", entry.path().display());
                continue;
            }
        };
        if !meta.is_file() {
            continue;
        }
        files.push(ArchiveFile::new(dir, entry.path(), meta.len()));
    }
    files.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
    Ok(files)
}
