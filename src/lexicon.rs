use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::constants::DISALLOWED_COLUMN;
use crate::error::{CleanseError, Result};
use crate::metrics;
use crate::tabular::decode_text;

/// Informal ("alay") token to canonical token. Keys are lowercase.
pub type InformalTermMap = HashMap<String, String>;

/// Tokens removed outright. Matched exactly as stored.
pub type DisallowedTermSet = HashSet<String>;

/// The two reference tables the pipeline is driven by.
///
/// Built once at startup and shared behind an `Arc`; nothing mutates it
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    informal: InformalTermMap,
    disallowed: DisallowedTermSet,
}

impl Lexicon {
    pub fn new(informal: InformalTermMap, disallowed: DisallowedTermSet) -> Self {
        let informal = informal
            .into_iter()
            .map(|(k, v)| (k.to_lowercase(), v))
            .collect();
        Self { informal, disallowed }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Load both tables from disk.
    pub fn load(informal_path: impl AsRef<Path>, disallowed_path: impl AsRef<Path>) -> Result<Self> {
        let informal_path = informal_path.as_ref();
        let disallowed_path = disallowed_path.as_ref();

        let informal_bytes = fs::read(informal_path)
            .map_err(|e| CleanseError::load(informal_path.display().to_string(), e))?;
        let disallowed_bytes = fs::read(disallowed_path)
            .map_err(|e| CleanseError::load(disallowed_path.display().to_string(), e))?;

        let informal = parse_informal_terms(&informal_path.display().to_string(), &informal_bytes)?;
        let disallowed =
            parse_disallowed_terms(&disallowed_path.display().to_string(), &disallowed_bytes)?;

        info!(
            informal_terms = informal.len(),
            disallowed_terms = disallowed.len(),
            "Loaded lookup tables"
        );
        metrics::lexicon_loaded(informal.len(), disallowed.len());
        Ok(Self { informal, disallowed })
    }

    pub fn informal(&self) -> &InformalTermMap {
        &self.informal
    }

    pub fn disallowed(&self) -> &DisallowedTermSet {
        &self.disallowed
    }
}

/// Parse a headerless two-column table: informal term, canonical term.
pub fn parse_informal_terms(source_name: &str, bytes: &[u8]) -> Result<InformalTermMap> {
    let text = decode_text(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut map = InformalTermMap::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| CleanseError::load(source_name, e))?;
        let (Some(informal), Some(canonical)) = (record.get(0), record.get(1)) else {
            return Err(CleanseError::load(
                source_name,
                format!("row {} has {} column(s), expected 2", line + 1, record.len()),
            ));
        };
        if informal.is_empty() {
            continue;
        }
        // Later rows win on duplicate keys
        map.insert(informal.to_lowercase(), canonical.to_string());
    }

    debug!(source = source_name, terms = map.len(), "Parsed informal terms");
    Ok(map)
}

/// Parse a table with a header row, reading the `ABUSIVE` column.
pub fn parse_disallowed_terms(source_name: &str, bytes: &[u8]) -> Result<DisallowedTermSet> {
    let text = decode_text(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| CleanseError::load(source_name, e))?
        .clone();
    let column = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(DISALLOWED_COLUMN))
        .ok_or_else(|| {
            CleanseError::load(source_name, format!("missing '{}' column", DISALLOWED_COLUMN))
        })?;

    let mut set = DisallowedTermSet::new();
    for record in reader.records() {
        let record = record.map_err(|e| CleanseError::load(source_name, e))?;
        match record.get(column) {
            Some(term) if !term.is_empty() => {
                set.insert(term.to_string());
            }
            _ => {}
        }
    }

    debug!(source = source_name, terms = set.len(), "Parsed disallowed terms");
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_informal_terms() {
        let map = parse_informal_terms("alay", b"gw,saya\nGue,saya\nbgt,banget\n").unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("gw").map(String::as_str), Some("saya"));
        // Keys are case-normalized
        assert_eq!(map.get("gue").map(String::as_str), Some("saya"));
    }

    #[test]
    fn test_duplicate_informal_key_keeps_last() {
        let map = parse_informal_terms("alay", b"gw,aku\ngw,saya\n").unwrap();
        assert_eq!(map.get("gw").map(String::as_str), Some("saya"));
    }

    #[test]
    fn test_informal_row_missing_column_is_load_error() {
        let err = parse_informal_terms("alay", b"gw,saya\nbgt\n").unwrap_err();
        assert!(matches!(err, CleanseError::Load { .. }));
    }

    #[test]
    fn test_parse_disallowed_terms() {
        let set = parse_disallowed_terms("abusive", b"ABUSIVE\nalay\nbangsat\n\n").unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains("bangsat"));
    }

    #[test]
    fn test_disallowed_header_is_case_insensitive() {
        let set = parse_disallowed_terms("abusive", b"id,abusive\n1,kampret\n").unwrap();
        assert!(set.contains("kampret"));
    }

    #[test]
    fn test_disallowed_missing_column_is_load_error() {
        let err = parse_disallowed_terms("abusive", b"WORD\nkampret\n").unwrap_err();
        assert!(matches!(err, CleanseError::Load { .. }));
    }

    #[test]
    fn test_latin1_table_is_decoded() {
        // "caf\xe9" is "café" in ISO-8859-1
        let map = parse_informal_terms("alay", b"kafe,caf\xe9\n").unwrap();
        assert_eq!(map.get("kafe").map(String::as_str), Some("café"));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let informal_path = dir.path().join("alay.csv");
        let disallowed_path = dir.path().join("abusive.csv");
        fs::File::create(&informal_path)
            .unwrap()
            .write_all(b"gw,saya\n")
            .unwrap();
        fs::File::create(&disallowed_path)
            .unwrap()
            .write_all(b"ABUSIVE\nbego\n")
            .unwrap();

        let lexicon = Lexicon::load(&informal_path, &disallowed_path).unwrap();
        assert_eq!(lexicon.informal().len(), 1);
        assert!(lexicon.disallowed().contains("bego"));
    }

    #[test]
    fn test_load_missing_file_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Lexicon::load(dir.path().join("nope.csv"), dir.path().join("nada.csv")).unwrap_err();
        assert!(matches!(err, CleanseError::Load { .. }));
    }
}
