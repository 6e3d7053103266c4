//! inventory of every file under the archive root

use std::path::Path;

use ahash::{HashMap, HashMapExt, HashSet};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use report::{Row, Summary, Tally};
use scraper::Html;
use serde::Serialize;
use tree::ArchiveFile;

use crate::{
    config::ArchiveDef,
    refs::{kinds_label, RefExtractor, References, KINDS_SEP},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetRecord {
    pub filename: String,
    pub rel_path: String,
    pub subdir: String,
    pub category: &'static str,
    pub file_size_bytes: u64,
    pub referenced_from_nav: bool,
    /// `; `-joined kinds of reference, in scan order
    pub reference_type: String,
    pub in_results_index: bool,
    pub notes: String,
}

impl Row for AssetRecord {
    const COLUMNS: &'static [&'static str] = &[
        "filename",
        "rel_path",
        "subdir",
        "category",
        "file_size_bytes",
        "referenced_from_nav",
        "reference_type",
        "in_results_index",
        "notes",
    ];
}

/// every local reference made by the navigation page
pub fn nav_references(def: &ArchiveDef) -> Result<References> {
    let path = def.nav_page_path();
    let bytes = std::fs::read(&path)
        .with_context(|| format!("failed to read navigation page {}", path.display()))?;
    let html = Html::parse_document(&String::from_utf8_lossy(&bytes));
    let refs = RefExtractor::new().references(&html);
    if refs.is_empty() {
        warn!("{} has no local references", def.nav_page);
    } else {
        info!("{} unique local references found in {}", refs.len(), def.nav_page);
    }
    Ok(refs)
}

/// lowercase `filename` column of an existing results index; empty if there is none
pub fn results_filenames(csv: &Path) -> Result<HashSet<String>> {
    match report::read_column(csv, "filename")? {
        Some(names) => {
            info!("{} filenames loaded from {}", names.len(), csv.display());
            Ok(names.into_iter().map(|n| n.to_lowercase()).collect())
        }
        None => {
            warn!(
                "{} not found, in_results_index will be false everywhere",
                csv.display()
            );
            Ok(HashSet::default())
        }
    }
}

/// `None` for the first of each group of byte-identical files, else the index
/// of that first file
fn identical_twins(files: &[ArchiveFile]) -> Vec<Option<usize>> {
    let mut by_size: HashMap<u64, Vec<usize>> = HashMap::new();
    for (i, f) in files.iter().enumerate() {
        if f.size > 0 {
            by_size.entry(f.size).or_default().push(i);
        }
    }

    let mut twins = vec![None; files.len()];
    for group in by_size.values().filter(|g| g.len() > 1) {
        let mut firsts: Vec<(usize, Vec<u8>)> = Vec::new();
        for &i in group {
            let bytes = match files[i].read_bytes() {
                Ok(b) => b,
                Err(e) => {
                    warn!("{e:#}");
                    continue;
                }
            };
            match firsts.iter().find(|(_, b)| *b == bytes) {
                Some(&(first, _)) => twins[i] = Some(first),
                None => firsts.push((i, bytes)),
            }
        }
    }
    twins
}

pub fn build(
    def: &ArchiveDef,
    refs: &References,
    results_names: &HashSet<String>,
) -> Result<Vec<AssetRecord>> {
    let files = tree::walk(&def.archive_root)?;
    info!("{} files found under {}", files.len(), def.archive_root.display());
    Ok(inventory(&files, refs, results_names))
}

pub fn inventory(
    files: &[ArchiveFile],
    refs: &References,
    results_names: &HashSet<String>,
) -> Vec<AssetRecord> {
    let twins = identical_twins(files);
    files
        .iter()
        .zip(&twins)
        .map(|(f, twin)| {
            let kinds = refs.get(&f.rel_path.to_lowercase());
            let in_results = results_names.contains(&f.file_name().to_lowercase());

            let mut notes = Vec::new();
            if in_results {
                notes.push("in_results_index".to_owned());
            }
            if f.size == 0 {
                notes.push("empty_file".to_owned());
            }
            if f.file_name().contains('%') {
                notes.push("percent_encoded_name".to_owned());
            }
            if let Some(first) = twin {
                notes.push(format!("identical_to:{}", files[*first].rel_path));
            }
            let notes = notes.join("; ");
            if !notes.is_empty() {
                debug!("{}: {notes}", f.rel_path);
            }

            AssetRecord {
                filename: f.file_name().to_owned(),
                rel_path: f.rel_path.clone(),
                subdir: f.subdir().to_owned(),
                category: f.category().as_str(),
                file_size_bytes: f.size,
                referenced_from_nav: !kinds.is_empty(),
                reference_type: kinds_label(kinds),
                in_results_index: in_results,
                notes,
            }
        })
        .collect()
}

pub fn write(def: &ArchiveDef, records: &[AssetRecord]) -> Result<()> {
    report::ensure_dir(&def.output_dir)?;
    report::write_csv(&def.assets_csv(), records)
}

pub fn summary(def: &ArchiveDef, records: &[AssetRecord]) -> Summary {
    let referenced = records.iter().filter(|r| r.referenced_from_nav).count();
    let categories: Tally = records.iter().map(|r| r.category).collect();
    let ref_types: Tally = records
        .iter()
        .flat_map(|r| r.reference_type.split(KINDS_SEP))
        .filter(|t| !t.is_empty())
        .collect();
    let subdirs: Tally = records.iter().map(|r| r.subdir.as_str()).collect();

    let quiet = &def.assets.quiet_subdirs;
    let unreferenced = records.iter().filter(|r| {
        !r.referenced_from_nav && !r.in_results_index && !quiet.iter().any(|q| *q == r.subdir)
    });

    let mut s = Summary::new("SUMMARY", 60);
    s.field("Total files", records.len())
        .field("Referenced in nav page", referenced)
        .field("NOT referenced", records.len() - referenced)
        .breakdown("By category", 15, &categories)
        .breakdown("Reference types (files can have multiple)", 15, &ref_types)
        .breakdown("By subdirectory", 25, &subdirs)
        .list(
            format!(
                "UNREFERENCED files (not in results index, not under {})",
                quiet.join("/")
            ),
            unreferenced
                .map(|r| format!("[{:12}] [{:10}] {}", r.subdir, r.category, r.rel_path)),
        );
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refs::RefKind;

    #[test]
    fn summary_lists_unreferenced_outside_quiet_dirs() {
        let def = ArchiveDef::default();
        let rec = |rel: &str, subdir: &str, kinds: &str, in_results: bool| AssetRecord {
            filename: rel.rsplit('/').next().unwrap_or(rel).to_owned(),
            rel_path: rel.to_owned(),
            subdir: subdir.to_owned(),
            category: "html",
            file_size_bytes: 10,
            referenced_from_nav: !kinds.is_empty(),
            reference_type: kinds.to_owned(),
            in_results_index: in_results,
            notes: String::new(),
        };
        let records = [
            rec("96Marin.htm", "(root)", "href", true),
            rec("Results/13University.htm", "Results", "", true),
            rec("Results/old.htm", "Results", "", false),
            rec("PWA/pwa1.htm", "PWA", "", false),
            rec("logo.gif", "(root)", "href; img_src", false),
            rec("junk/left.htm", "junk", "", false),
        ];
        let s = summary(&def, &records).to_string();
        assert!(s.contains("  Total files            : 6\n"), "{s}");
        assert!(s.contains("  Referenced in nav page : 2\n"), "{s}");
        assert!(s.contains("    href            2\n    img_src         1\n"), "{s}");
        let tail = "UNREFERENCED files (not in results index, not under Results/PWA):\n\
                    \x20 [junk        ] [html      ] junk/left.htm\n";
        assert!(s.ends_with(tail), "{s}");
    }

    fn file(rel: &str, size: u64) -> ArchiveFile {
        ArchiveFile {
            path: std::path::PathBuf::from("/nonexistent").join(rel),
            rel_path: rel.to_owned(),
            size,
        }
    }

    #[test]
    fn inventory_labels_and_notes() {
        let _log = crate::util::test_log_level(log::LevelFilter::Debug);
        let mut refs = References::new();
        refs.add("shoe2.gif", RefKind::Href);
        refs.add("./Shoe2.GIF", RefKind::ImgSrc);
        refs.add("Results/96Marin.htm#A", RefKind::Href);

        let files = [
            file("shoe2.gif", 40),
            file("Results/96Marin.htm", 900),
            file("w8lift.htm%5D", 12),
            file("blank.htm", 0),
        ];
        let results: HashSet<String> = ["96marin.htm".to_owned()].into_iter().collect();
        let inv = inventory(&files, &refs, &results);

        assert_eq!(inv[0].reference_type, "href; img_src");
        assert_eq!(inv[0].category, "image");
        assert!(inv[0].referenced_from_nav);
        assert_eq!(inv[1].reference_type, "href");
        assert_eq!(inv[1].subdir, "Results");
        assert_eq!(inv[1].notes, "in_results_index");
        assert_eq!(inv[2].notes, "percent_encoded_name");
        assert_eq!(inv[3].notes, "empty_file");
        assert!(!inv[3].referenced_from_nav);
        assert_eq!(inv[3].reference_type, "");
    }
}
