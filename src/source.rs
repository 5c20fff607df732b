//! Reading raw history exports from disk. Only the binary touches this; the
//! normalizer and aggregator work on in-memory records.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::model::raw_record::RawRecord;

pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecord>> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let records = match ext.as_str() {
        "json" => parse_json(&content),
        "csv" | "tsv" | "txt" => parse_csv(&content),
        other => bail!(
            "unsupported data file '{}': extension '{}' is not one of json/csv/tsv/txt",
            path.display(),
            other
        ),
    }
    .with_context(|| format!("failed to parse {}", path.display()))?;

    tracing::debug!(path = %path.display(), records = records.len(), "Loaded raw records");
    Ok(records)
}

/// A JSON array of records, as produced by CSV-to-JSON converters.
pub fn parse_json(content: &str) -> Result<Vec<RawRecord>> {
    serde_json::from_str(content).context("expected a JSON array of records")
}

/// A headered CSV export. Tab-delimited when the header line contains a tab.
pub fn parse_csv(content: &str) -> Result<Vec<RawRecord>> {
    let header = content.lines().next().unwrap_or_default();
    let delimiter = if header.contains('\t') { b'\t' } else { b',' };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    reader
        .deserialize::<RawRecord>()
        .enumerate()
        .map(|(i, row)| row.with_context(|| format!("bad CSV row {}", i + 1)))
        .collect()
}
