use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;

/// A flat record written as one CSV line.
///
/// `COLUMNS` is the header row and must list the serialized fields in order.
pub trait Row: Serialize {
    const COLUMNS: &'static [&'static str];
}

/// creates `dir` and its parents if missing
pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))
}

/// header is written even when `rows` is empty
pub fn write_csv<R: Row>(path: &Path, rows: &[R]) -> Result<()> {
    let mut w = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    w.write_record(R::COLUMNS)?;
    for row in rows {
        w.serialize(row)
            .with_context(|| format!("failed to write row to {}", path.display()))?;
    }
    w.flush()?;
    debug!("wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// array of objects, two space indent
pub fn write_json<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let f = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, rows)
        .with_context(|| format!("failed to write {}", path.display()))?;
    w.write_all(b"\n")?;
    w.flush()?;
    debug!("wrote {} records to {}", rows.len(), path.display());
    Ok(())
}

/// every value of `column` in the CSV at `path`, `None` if the file does not exist
pub fn read_column(path: &Path, column: &str) -> Result<Option<Vec<String>>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut r = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    let idx = r
        .headers()?
        .iter()
        .position(|h| h == column)
        .with_context(|| format!("{} has no `{column}` column", path.display()))?;
    let mut values = Vec::new();
    for record in r.records() {
        let record = record.with_context(|| format!("malformed row in {}", path.display()))?;
        if let Some(v) = record.get(idx) {
            values.push(v.to_owned());
        }
    }
    Ok(Some(values))
}
