//! which files count as result files

use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;
use tree::ArchiveFile;

use crate::config::{ArchiveDef, RootPool};

/// Extensions of result files kept in the results directory.
pub const RESULTS_EXTENSIONS: [&str; 5] = ["htm", "html", "pdf", "xls", "xlsx"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Pool {
    #[serde(rename = "root")]
    Root,
    #[serde(rename = "Results")]
    Results,
}

impl Pool {
    pub const fn as_str(self) -> &'static str {
        match self {
            Pool::Root => "root",
            Pool::Results => "Results",
        }
    }
}

impl std::fmt::Display for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // pad so `{:8}` lines up in listings
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct PoolEntry {
    pub file: ArchiveFile,
    pub pool: Pool,
    /// lowercase, relative to the archive root, as a nav reference normalizes
    pub key: String,
}

impl RootPool {
    /// whether a file directly in the archive root looks like a result page
    pub fn is_result(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        let Some((stem, ext)) = lower.rsplit_once('.') else {
            return false;
        };
        if !self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
            return false;
        }
        if self.skip_exact.iter().any(|s| s.to_lowercase() == lower) {
            return false;
        }
        if self
            .skip_prefixes
            .iter()
            .any(|p| stem.starts_with(&p.to_lowercase()))
        {
            return false;
        }
        !self
            .skip_substrings
            .iter()
            .any(|s| stem.contains(&s.to_lowercase()))
    }
}

/// root pool first, then the results pool, each sorted by name
pub fn collect(def: &ArchiveDef) -> Result<Vec<PoolEntry>> {
    let mut entries = Vec::new();

    let root = tree::list_files(&def.archive_root)
        .with_context(|| format!("failed to read archive root {}", def.archive_root.display()))?;
    for file in root {
        if !def.root_pool.is_result(file.file_name()) {
            debug!("not a result page: {}", file.rel_path);
            continue;
        }
        let key = file.file_name().to_lowercase();
        entries.push(PoolEntry {
            file,
            pool: Pool::Root,
            key,
        });
    }

    let results_dir = def.results_path();
    let prefix = def.results_dir.to_lowercase();
    for file in results_pool_files(&results_dir)? {
        let key = format!("{prefix}/{}", file.file_name().to_lowercase());
        entries.push(PoolEntry {
            file,
            pool: Pool::Results,
            key,
        });
    }
    Ok(entries)
}

fn results_pool_files(dir: &Path) -> Result<Vec<ArchiveFile>> {
    let files = tree::list_files(dir)
        .with_context(|| format!("failed to read results directory {}", dir.display()))?;
    Ok(files
        .into_iter()
        .filter(|f| RESULTS_EXTENSIONS.contains(&f.extension().as_str()))
        .collect())
}
