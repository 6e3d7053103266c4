use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Deserialize;

mod pattern;
pub use pattern::Pattern;

pub const DEFAULT_CONFIG_FILE: &str = "arcdex.toml";

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "kebab-case")]
pub struct ArchiveDef {
    #[serde(skip)]
    pub file: Option<PathBuf>,

    #[serde(default = "dft_archive_root")]
    pub archive_root: PathBuf,
    #[serde(default = "dft_nav_page")]
    pub nav_page: String,
    #[serde(default = "dft_results_dir")]
    pub results_dir: String,
    #[serde(default = "dft_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub root_pool: RootPool,
    #[serde(default = "dft_sources")]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub assets: Assets,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "kebab-case")]
pub struct RootPool {
    #[serde(default = "dft_root_extensions")]
    pub extensions: Vec<String>,
    #[serde(default = "dft_skip_exact")]
    pub skip_exact: Vec<String>,
    #[serde(default = "dft_skip_prefixes")]
    pub skip_prefixes: Vec<String>,
    #[serde(default = "dft_skip_substrings")]
    pub skip_substrings: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "kebab-case")]
pub struct Source {
    pub pattern: Pattern,
    pub label: String,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
#[serde(rename_all = "kebab-case")]
pub struct Assets {
    #[serde(default = "dft_quiet_subdirs")]
    pub quiet_subdirs: Vec<String>,
}

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| (*s).to_owned()).collect()
}

fn dft_archive_root() -> PathBuf {
    PathBuf::from("public/LiftTilYaDie")
}

fn dft_nav_page() -> String {
    "w8lift.htm".into()
}

fn dft_results_dir() -> String {
    "Results".into()
}

fn dft_output_dir() -> PathBuf {
    PathBuf::from("scripts/output")
}

fn dft_root_extensions() -> Vec<String> {
    strings(&["htm"])
}

fn dft_skip_exact() -> Vec<String> {
    // listing placeholder, entry forms and admin pages
    strings(&["results.htm", "wsthsent.htm", "99lstacha.htm", "99lstcha.htm"])
}

fn dft_skip_prefixes() -> Vec<String> {
    strings(&["w8lift", "w8lift2", "Page2", "PAGE_2", "index"])
}

fn dft_skip_substrings() -> Vec<String> {
    strings(&[
        "Schedl",
        "Entr",
        "EntryFrm",
        "alladvantage",
        "WTT",
        "BadMother",
        "BdMoEntr",
        "CAStEnt",
        "FirstWorld",
        "WorldTeamTrials",
        "pwa",
    ])
}

fn dft_quiet_subdirs() -> Vec<String> {
    strings(&["Results", "PWA"])
}

fn dft_sources() -> Vec<Source> {
    [
        (r"Denis\s+Reno", "Denis Reno's Newsletter"),
        (r"Weightlifting\s+USA", "Weightlifting USA"),
        (r"Bob\s+Hise|Hise\s+report", "Hise Report"),
        (r"Jim\s+Schmitz", "Jim Schmitz"),
    ]
    .into_iter()
    .map(|(pattern, label)| Source {
        pattern: pattern.try_into().unwrap(),
        label: label.into(),
    })
    .collect()
}

impl Default for RootPool {
    fn default() -> Self {
        RootPool {
            extensions: dft_root_extensions(),
            skip_exact: dft_skip_exact(),
            skip_prefixes: dft_skip_prefixes(),
            skip_substrings: dft_skip_substrings(),
        }
    }
}

impl Default for Assets {
    fn default() -> Self {
        Assets {
            quiet_subdirs: dft_quiet_subdirs(),
        }
    }
}

impl Default for ArchiveDef {
    fn default() -> Self {
        ArchiveDef {
            file: None,
            archive_root: dft_archive_root(),
            nav_page: dft_nav_page(),
            results_dir: dft_results_dir(),
            output_dir: dft_output_dir(),
            root_pool: RootPool::default(),
            sources: dft_sources(),
            assets: Assets::default(),
        }
    }
}

#[derive(Debug)]
pub struct ArchiveDefValidationError {
    field: &'static str,
    reason: &'static str,
}

impl std::fmt::Display for ArchiveDefValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "config field `{}` {}", self.field, self.reason)
    }
}

impl std::error::Error for ArchiveDefValidationError {}

impl ArchiveDef {
    /// `explicit` must exist; otherwise [`DEFAULT_CONFIG_FILE`] is used if present
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !p.is_file() {
                    debug!("no {DEFAULT_CONFIG_FILE}, using built-in defaults");
                    return Ok(ArchiveDef::default());
                }
                p
            }
        };
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut def = Self::from_toml(&s)
            .with_context(|| format!("invalid config {}", path.display()))?;
        def.file = Some(path);
        Ok(def)
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        let def: ArchiveDef = toml::from_str(s)?;
        def.validate()?;
        Ok(def)
    }

    pub fn validate(&self) -> Result<(), ArchiveDefValidationError> {
        if self.nav_page.trim().is_empty() {
            return Err(ArchiveDefValidationError {
                field: "nav-page",
                reason: "must not be empty",
            });
        }
        if self.results_dir.contains(['/', '\\']) {
            return Err(ArchiveDefValidationError {
                field: "results-dir",
                reason: "must be a single directory name",
            });
        }
        let mut w = false;
        if self.root_pool.extensions.is_empty() {
            warn!("config field `root-pool.extensions` is empty, the root pool will be skipped");
            w = true;
        }
        for src in &self.sources {
            if src.label.trim().is_empty() {
                warn!("source pattern `{}` has an empty label", src.pattern);
                w = true;
            }
        }
        if w {
            match &self.file {
                Some(file) => warn!("config file `{}` has warnings", file.display()),
                None => warn!("archive definition has warnings"),
            }
        }
        Ok(())
    }

    pub fn nav_page_path(&self) -> PathBuf {
        self.archive_root.join(&self.nav_page)
    }

    pub fn results_path(&self) -> PathBuf {
        self.archive_root.join(&self.results_dir)
    }

    pub fn results_csv(&self) -> PathBuf {
        self.output_dir.join("results_index.csv")
    }

    pub fn results_json(&self) -> PathBuf {
        self.output_dir.join("results_index.json")
    }

    pub fn assets_csv(&self) -> PathBuf {
        self.output_dir.join("assets_index.csv")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        let def = ArchiveDef::from_toml("").unwrap();
        assert_eq!(def, ArchiveDef::default());
        assert_eq!(def.nav_page_path(), Path::new("public/LiftTilYaDie/w8lift.htm"));
        assert_eq!(def.results_path(), Path::new("public/LiftTilYaDie/Results"));
        assert_eq!(def.sources.len(), 4);
        assert_eq!(def.assets.quiet_subdirs, ["Results", "PWA"]);
    }

    #[test]
    fn partial_tables_keep_defaults() {
        let s = r#"
        archive-root = "site"
        nav-page = "index.html"

        [root-pool]
        skip-prefixes = ["index"]

        [[sources]]
        pattern = 'Iron\s+Game'
        label = "Iron Game History"
        "#;
        let def = ArchiveDef::from_toml(s).unwrap();
        assert_eq!(def.archive_root, Path::new("site"));
        assert_eq!(def.nav_page, "index.html");
        assert_eq!(def.results_dir, "Results");
        assert_eq!(def.root_pool.skip_prefixes, ["index"]);
        assert_eq!(def.root_pool.extensions, ["htm"]);
        assert_eq!(def.root_pool.skip_exact.len(), 4);
        assert_eq!(def.sources.len(), 1);
        assert!(def.sources[0].pattern.is_match("IRON GAME"));
        assert_eq!(def.results_csv(), Path::new("scripts/output/results_index.csv"));
    }

    #[test]
    fn rejects_unknown_and_invalid() {
        assert!(ArchiveDef::from_toml("archive = 'x'").is_err());
        assert!(ArchiveDef::from_toml("[root-pool]\nskip = []").is_err());
        let bad_regex = "[[sources]]\npattern = 'Reno('\nlabel = 'x'";
        let e = ArchiveDef::from_toml(bad_regex).unwrap_err();
        assert!(format!("{e:#}").contains("Reno("), "{e:#}");
        assert!(ArchiveDef::from_toml("nav-page = ' '").is_err());
        assert!(ArchiveDef::from_toml("results-dir = 'a/b'").is_err());
    }
}
