//! per-result-file index

use ahash::{HashSet, HashSetExt};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use report::{Row, Summary};
use scraper::Html;
use serde::Serialize;
use tree::ArchiveFile;

use crate::{
    config::ArchiveDef,
    meta::{year_from_filename, MeetDate, MetaRules, PageMeta},
    pool::{self, Pool, PoolEntry},
    refs::RefExtractor,
};

/// files below this many bytes are flagged as stubs
pub const STUB_BYTES: u64 = 1000;
/// files above this many bytes may hold several meets
pub const LARGE_BYTES: u64 = 150_000;
/// body characters searched for record notations
pub const RECORD_SCAN_CHARS: usize = 5000;

const PROGRESS_EVERY: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRecord {
    pub filename: String,
    pub pool: Pool,
    pub file_path: String,
    pub linked_from_root: bool,
    pub meet_name: String,
    pub date_raw: String,
    pub date_start: String,
    pub date_end: String,
    pub location: String,
    pub source: String,
    pub file_size_bytes: u64,
    pub notes: String,
}

impl Row for ResultRecord {
    const COLUMNS: &'static [&'static str] = &[
        "filename",
        "pool",
        "file_path",
        "linked_from_root",
        "meet_name",
        "date_raw",
        "date_start",
        "date_end",
        "location",
        "source",
        "file_size_bytes",
        "notes",
    ];
}

impl ResultRecord {
    fn new(entry: &PoolEntry, linked: bool) -> Self {
        ResultRecord {
            filename: entry.file.file_name().to_owned(),
            pool: entry.pool,
            file_path: entry.file.path.to_string_lossy().replace('\\', "/"),
            linked_from_root: linked,
            meet_name: String::new(),
            date_raw: String::new(),
            date_start: String::new(),
            date_end: String::new(),
            location: String::new(),
            source: String::new(),
            file_size_bytes: entry.file.size,
            notes: String::new(),
        }
    }

    fn set_date(&mut self, date: MeetDate) {
        self.date_raw = date.raw;
        self.date_start = date.start;
        self.date_end = date.end;
    }

    fn set_meta(&mut self, meta: PageMeta) {
        self.meet_name = meta.meet_name;
        self.set_date(meta.date);
        self.location = meta.location;
        self.source = meta.source;
    }
}

/// Lowercase file names per pool, for spotting the same file in both.
pub struct PoolNames {
    root: HashSet<String>,
    results: HashSet<String>,
}

impl PoolNames {
    pub fn new(entries: &[PoolEntry]) -> Self {
        let mut names = PoolNames {
            root: HashSet::new(),
            results: HashSet::new(),
        };
        for e in entries {
            let name = e.file.file_name().to_lowercase();
            match e.pool {
                Pool::Root => names.root.insert(name),
                Pool::Results => names.results.insert(name),
            };
        }
        names
    }

    /// the duplicate note for a file of `pool`, if the other pool has it too
    fn duplicate_note(&self, pool: Pool, file_name: &str) -> Option<&'static str> {
        let lower = file_name.to_lowercase();
        match pool {
            Pool::Results if self.root.contains(&lower) => Some("duplicate_exists_in_root"),
            Pool::Root if self.results.contains(&lower) => Some("duplicate_exists_in_Results"),
            _ => None,
        }
    }
}

pub struct Indexer<'a> {
    def: &'a ArchiveDef,
    meta: MetaRules,
    refs: RefExtractor,
}

impl<'a> Indexer<'a> {
    pub fn new(def: &'a ArchiveDef) -> Self {
        Indexer {
            def,
            meta: MetaRules::new(&def.sources),
            refs: RefExtractor::new(),
        }
    }

    /// normalized anchor targets of the navigation page
    pub fn nav_links(&self) -> Result<HashSet<String>> {
        let path = self.def.nav_page_path();
        let text = std::fs::read(&path)
            .with_context(|| format!("failed to read navigation page {}", path.display()))?;
        let html = Html::parse_document(&String::from_utf8_lossy(&text));
        Ok(self.refs.nav_links(&html))
    }

    pub fn build(&self) -> Result<Vec<ResultRecord>> {
        info!("reading {}", self.def.nav_page);
        let links = self.nav_links()?;
        info!("{} linked hrefs found in {}", links.len(), self.def.nav_page);

        let entries = pool::collect(self.def)?;
        let names = PoolNames::new(&entries);
        let root_count = entries.iter().filter(|e| e.pool == Pool::Root).count();
        info!(
            "{} files to index ({} root, {} {})",
            entries.len(),
            root_count,
            entries.len() - root_count,
            self.def.results_dir
        );

        let mut records = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if (i + 1) % PROGRESS_EVERY == 0 {
                info!(target: "progress", "processing file {}/{}", i + 1, entries.len());
            }
            records.push(self.process(entry, &links, &names));
        }
        Ok(records)
    }

    pub fn process(
        &self,
        entry: &PoolEntry,
        links: &HashSet<String>,
        names: &PoolNames,
    ) -> ResultRecord {
        let file = &entry.file;
        let mut rec = ResultRecord::new(entry, links.contains(&entry.key));

        let ext = file.extension();
        match ext.as_str() {
            "xls" | "xlsx" | "pdf" => {
                if let Some(y) = year_from_filename(file.file_name()) {
                    rec.set_date(MeetDate::year_only(y));
                }
                rec.notes = if ext == "pdf" { "pdf_file" } else { "xls_file" }.to_owned();
                return rec;
            }
            _ => (),
        }

        let text = match file.read_text() {
            Ok(t) => t,
            Err(e) => {
                warn!("could not read {}: {e:#}", file.path.display());
                rec.notes = format!("parse_error: {e:#}");
                return rec;
            }
        };
        let html = Html::parse_document(&text);
        drop(text);

        rec.set_meta(self.meta.extract(&html, file.file_name()));
        let notes = html_notes(file, entry.pool, names, || {
            self.meta.text().body_text(&html, RECORD_SCAN_CHARS)
        });
        rec.notes = notes.join("; ");
        debug!("{}: {}", rec.filename, rec.notes);
        rec
    }
}

/// notes for a parsed page; `body` is only asked for when it matters
fn html_notes(
    file: &ArchiveFile,
    pool: Pool,
    names: &PoolNames,
    body: impl FnOnce() -> String,
) -> Vec<String> {
    let stem = file.stem().to_lowercase();
    if stem.contains("_viewer") {
        return vec!["pdf_viewer_stub".to_owned()];
    }
    let mut notes = Vec::new();
    if file.size < STUB_BYTES {
        notes.push(format!("stub_file_{}b", file.size));
    }
    if stem.contains("temp") {
        notes.push("possible_draft_or_temp".to_owned());
    }
    if let Some(dup) = names.duplicate_note(pool, file.file_name()) {
        notes.push(dup.to_owned());
    }
    if body().contains("RECORD") {
        notes.push("has_record_notations".to_owned());
    }
    if file.size > LARGE_BYTES {
        notes.push("large_file_possibly_multi_meet".to_owned());
    }
    notes
}

pub fn write(def: &ArchiveDef, records: &[ResultRecord]) -> Result<()> {
    report::ensure_dir(&def.output_dir)?;
    report::write_csv(&def.results_csv(), records)?;
    report::write_json(&def.results_json(), records)?;
    Ok(())
}

pub fn summary(def: &ArchiveDef, records: &[ResultRecord]) -> Summary {
    let count = |pred: fn(&ResultRecord) -> bool| records.iter().filter(|r| pred(r)).count();
    let linked = count(|r| r.linked_from_root);
    let mut s = Summary::new("SUMMARY", 50);
    s.field("Total files indexed", records.len())
        .field(format!("Linked from {}", def.nav_page), linked)
        .field("Orphans", records.len() - linked)
        .field("Missing date", count(|r| r.date_start.is_empty()))
        .field("Missing meet name", count(|r| r.meet_name.is_empty()))
        .list(
            "ORPHANED FILES",
            records
                .iter()
                .filter(|r| !r.linked_from_root)
                .map(|r| format!("[{:8}] {}", r.pool, r.filename)),
        );
    s
}
