//! CSV/TSV loaders for the curated ticker list and the sentiment lexicon.

use crate::domain::error::GatewayError;
use crate::domain::ticker::{CuratedList, TickerMatch};
use std::fs;
use std::path::Path;

fn read_file(path: &Path, section: &str, key: &str) -> Result<String, GatewayError> {
    fs::read_to_string(path).map_err(|e| GatewayError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("failed to read {}: {}", path.display(), e),
    })
}

/// Load a `symbol,name` CSV (with header) into a curated list, in file order.
pub fn load_curated_list(path: &Path) -> Result<CuratedList, GatewayError> {
    let content = read_file(path, "tickers", "curated_path")?;
    parse_curated_list(&content)
}

pub fn parse_curated_list(content: &str) -> Result<CuratedList, GatewayError> {
    let invalid = |reason: String| GatewayError::ConfigInvalid {
        section: "tickers".to_string(),
        key: "curated_path".to_string(),
        reason,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let mut entries = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| invalid(format!("CSV parse error: {}", e)))?;
        let symbol = record
            .get(0)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| invalid(format!("row {}: missing symbol column", line + 1)))?;
        let name = record
            .get(1)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| invalid(format!("row {}: missing name column", line + 1)))?;
        entries.push(TickerMatch::new(symbol, name));
    }

    if entries.is_empty() {
        return Err(invalid("curated ticker file has no rows".to_string()));
    }
    Ok(CuratedList::new(entries))
}

/// Load a tab-separated lexicon: `token<TAB>valence[<TAB>...]`, no header.
pub fn load_lexicon(path: &Path) -> Result<Vec<(String, f64)>, GatewayError> {
    let content = read_file(path, "sentiment", "lexicon_path")?;
    parse_lexicon(&content)
}

pub fn parse_lexicon(content: &str) -> Result<Vec<(String, f64)>, GatewayError> {
    let invalid = |reason: String| GatewayError::ConfigInvalid {
        section: "sentiment".to_string(),
        key: "lexicon_path".to_string(),
        reason,
    };

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(content.as_bytes());
    let mut entries = Vec::new();

    for (line, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| invalid(format!("TSV parse error: {}", e)))?;
        let token = match record.get(0).map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => continue,
        };
        let valence: f64 = record
            .get(1)
            .ok_or_else(|| invalid(format!("line {}: missing valence for '{}'", line + 1, token)))?
            .trim()
            .parse()
            .map_err(|e| invalid(format!("line {}: invalid valence: {}", line + 1, e)))?;
        entries.push((token.to_string(), valence));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_curated_csv_in_order() {
        let list = parse_curated_list("symbol,name\nshop, Shopify Inc.\nSQ,Block Inc.\n").unwrap();
        assert_eq!(list.len(), 2);
        let found = list.matches("S");
        assert_eq!(found[0].symbol, "SHOP");
        assert_eq!(found[0].display_name, "Shopify Inc.");
        assert_eq!(found[1].symbol, "SQ");
    }

    #[test]
    fn curated_csv_missing_name_rejected() {
        let err = parse_curated_list("symbol,name\nAAPL,\n").unwrap_err();
        assert!(matches!(err, GatewayError::ConfigInvalid { ref key, .. } if key == "curated_path"));
    }

    #[test]
    fn empty_curated_csv_rejected() {
        assert!(parse_curated_list("symbol,name\n").is_err());
    }

    #[test]
    fn loads_curated_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "symbol,name\nAAPL,Apple Inc.\n").unwrap();
        let list = load_curated_list(file.path()).unwrap();
        assert_eq!(list.matches("AAPL")[0].display_name, "Apple Inc.");
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = load_curated_list(Path::new("/nonexistent/tickers.csv")).unwrap_err();
        assert!(matches!(err, GatewayError::ConfigInvalid { ref section, .. } if section == "tickers"));
    }

    #[test]
    fn parses_vader_style_lexicon() {
        let content = "good\t1.9\t0.9434\t[2, 1, 2]\n\":(\"\t-1.9\t1.1\t[-2, -1]\nhodl\t0.5\n";
        let entries = parse_lexicon(content).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], ("good".to_string(), 1.9));
        assert_eq!(entries[1].0, "\":(\"");
        assert_eq!(entries[2], ("hodl".to_string(), 0.5));
    }

    #[test]
    fn lexicon_bad_valence_rejected() {
        let err = parse_lexicon("good\tvery\n").unwrap_err();
        assert!(matches!(err, GatewayError::ConfigInvalid { ref key, .. } if key == "lexicon_path"));
    }
}
