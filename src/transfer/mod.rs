//! Import/export core: CSV tokenizer, row mapper, serializer, JSON codec and
//! the merge engine.
//!
//! Everything here works on in-memory values. Reading files and saving the
//! result is left to the caller (see `cli::import` and `cli::export`).

mod error;
pub mod json;
pub mod mapper;
pub mod merge;
pub mod serializer;
pub mod tokenizer;

use std::path::Path;

use chrono::{DateTime, Utc};

use crate::models::Dossier;

pub use error::{Result, TransferError};
pub use mapper::records_from_rows;
pub use merge::{merge, merge_at, MergeSummary};
pub use serializer::to_csv;
pub use tokenizer::{parse_rows, Row};

/// Column names of the CSV interchange file, in output order.
pub const HEADER: [&str; 15] = [
    "id",
    "full_name",
    "dob",
    "parents",
    "history",
    "traumas",
    "habits",
    "communication_style",
    "friendliness_level",
    "relation",
    "last_contact_date",
    "photoDataUrl",
    "tags",
    "created_at",
    "updated_at",
];

pub const TAG_SEPARATOR: &str = "|";

const BOM: char = '\u{feff}';

/// Supported interchange formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Csv,
    Json,
}

impl Format {
    /// `.csv` (any case) is CSV, everything else is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// What an import does with the records already in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ImportMode {
    /// Reconcile by id; incoming non-empty fields win
    #[default]
    Merge,
    /// Discard the current collection
    Replace,
}

pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BOM).unwrap_or(text)
}

/// Decode a CSV document into dossiers.
pub fn csv_to_dossiers(text: &str, now: DateTime<Utc>) -> Vec<Dossier> {
    records_from_rows(parse_rows(strip_bom(text)), now)
}

/// Decode `text` in the given format.
pub fn decode(text: &str, format: Format, now: DateTime<Utc>) -> Result<Vec<Dossier>> {
    match format {
        Format::Csv => Ok(csv_to_dossiers(text, now)),
        Format::Json => json::from_json(strip_bom(text), now),
    }
}

/// Encode dossiers in the given format. `bom` only applies to CSV.
pub fn encode(dossiers: &[Dossier], format: Format, bom: bool) -> Result<String> {
    match format {
        Format::Csv if bom => Ok(format!("{}{}", BOM, to_csv(dossiers))),
        Format::Csv => Ok(to_csv(dossiers)),
        Format::Json => json::to_json(dossiers),
    }
}

/// Combine `incoming` with `current` according to `mode`.
pub fn apply_import(
    current: Vec<Dossier>,
    incoming: Vec<Dossier>,
    mode: ImportMode,
    now: DateTime<Utc>,
) -> (Vec<Dossier>, MergeSummary) {
    match mode {
        ImportMode::Merge => merge_at(current, incoming, now),
        ImportMode::Replace => {
            let summary = MergeSummary {
                updated: 0,
                inserted: incoming.len(),
                retained: 0,
            };
            (incoming, summary)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("dossiers.csv")), Format::Csv);
        assert_eq!(Format::from_path(Path::new("DOSSIERS.CSV")), Format::Csv);
        assert_eq!(Format::from_path(Path::new("dossiers.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("dossiers")), Format::Json);
    }

    #[test]
    fn test_bom_is_ignored_on_import() {
        let text = format!("{}{}\n1,Ann", BOM, "id,full_name");
        let dossiers = csv_to_dossiers(&text, fixed_now());
        assert_eq!(dossiers.len(), 1);
        assert_eq!(dossiers[0].id, "1");
        assert_eq!(dossiers[0].full_name, "Ann");
    }

    #[test]
    fn test_encode_csv_with_bom() {
        let text = encode(&[], Format::Csv, true).unwrap();
        assert!(text.starts_with(BOM));
        assert_eq!(strip_bom(&text), HEADER.join(","));
    }

    #[test]
    fn test_csv_round_trip_is_stable() {
        let now = fixed_now();
        let mut a = Dossier::with_id("1", "A", now);
        a.friendliness_level = Some(5);
        a.tags = vec!["x".to_string(), "y".to_string()];
        a.history = Some("Said \"hi\", then left\nfor good".to_string());
        let mut b = Dossier::with_id("2", "B", now);
        b.friendliness_level = Some(2);
        b.photo = Some("data:image/jpeg;base64,AAAA".to_string());

        let first = to_csv(&[a.clone(), b.clone()]);
        let decoded = csv_to_dossiers(&first, now);
        assert_eq!(decoded, vec![a, b]);
        assert_eq!(to_csv(&decoded), first);
    }

    #[test]
    fn test_header_only_file_imports_nothing() {
        let dossiers = decode(&HEADER.join(","), Format::Csv, fixed_now()).unwrap();
        assert!(dossiers.is_empty());
    }

    #[test]
    fn test_replace_mode_discards_current() {
        let now = fixed_now();
        let current = vec![Dossier::with_id("1", "A", now)];
        let incoming = vec![Dossier::with_id("2", "B", now)];
        let (out, summary) = apply_import(current, incoming, ImportMode::Replace, now);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "2");
        assert_eq!(summary.inserted, 1);
    }

    #[test]
    fn test_merge_mode_keeps_current() {
        let now = fixed_now();
        let current = vec![Dossier::with_id("1", "A", now)];
        let incoming = vec![Dossier::with_id("2", "B", now)];
        let (out, summary) = apply_import(current, incoming, ImportMode::Merge, now);
        assert_eq!(out.len(), 2);
        assert_eq!(summary.retained, 1);
        assert_eq!(summary.inserted, 1);
    }
}
