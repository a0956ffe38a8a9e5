// Origin CSV decoding and parsing

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use skumap_engine::OriginRow;

use crate::error::LoadError;

/// Parsed origin export: header names in file order plus one row per record.
#[derive(Debug, Clone, Default)]
pub struct OriginTable {
    pub headers: Vec<String>,
    pub rows: Vec<OriginRow>,
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> Result<String, LoadError> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| LoadError::Io(format!("{}: {e}", path.display())))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| LoadError::Io(format!("{}: {e}", path.display())))?;
    Ok(decode_bytes(bytes))
}

/// UTF-8 first; on failure fall back to Windows-1252 (common for Excel-exported CSVs).
pub fn decode_bytes(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            decoded.into_owned()
        }
    }
}

/// Detect the most likely field delimiter by checking consistency across the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line. The delimiter
/// that produces the most consistent field count (>1 field) wins.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return crate::DEFAULT_DELIMITER;
    }

    let mut best = crate::DEFAULT_DELIMITER;
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        // Higher field count breaks ties
        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Make header names unique: repeats get `.1`, `.2`, ... suffixes, skipping
/// any name already taken (including literal headers such as `note.1`).
fn dedupe_headers(raw: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut repeats: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(raw.len());

    for h in raw {
        let name = if used.contains(&h) {
            let n = repeats.entry(h.clone()).or_insert(0);
            loop {
                *n += 1;
                let candidate = format!("{h}.{n}");
                if !used.contains(&candidate) {
                    break candidate;
                }
            }
        } else {
            h
        };
        used.insert(name.clone());
        out.push(name);
    }
    out
}

/// Parse delimited origin text. Every header becomes a key in every row;
/// missing cells are blank-filled, extra cells dropped.
pub fn parse_origin(content: &str, delimiter: u8) -> Result<OriginTable, LoadError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    if content.trim().is_empty() {
        return Err(LoadError::MissingHeader);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let raw_headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::Parse(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if raw_headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::MissingHeader);
    }
    let headers = dedupe_headers(raw_headers);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| LoadError::Parse(e.to_string()))?;
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(OriginRow::new(fields));
    }

    Ok(OriginTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: &str = "\
sku;parent_sku;post_title;categoria;regular_price;meta:attribute_pa_finitura;dimensione;\"per vetro\";materiale;um
PARENT1;;Titolo Parent 1;Categoria A;1234,56;Finitura base;L;Si;Acciaio;PZ
VAR1;PARENT1;Variante 1;Categoria A;1234,56;Finitura 1;L;Si;Acciaio;PZ
VAR2;PARENT1;\"Variante; 2\";Categoria A;1.234,56;Finitura 2;L;Si;Acciaio;PZ
";

    #[test]
    fn parses_semicolon_origin() {
        let table = parse_origin(SAMPLE, b';').unwrap();
        assert_eq!(table.headers.len(), 10);
        assert_eq!(table.headers[7], "per vetro");
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].get("parent_sku"), Some(""));
        assert_eq!(table.rows[2].get("post_title"), Some("Variante; 2"));
        assert_eq!(table.rows[2].get("regular_price"), Some("1.234,56"));
    }

    #[test]
    fn short_records_are_blank_filled() {
        let table = parse_origin("sku;parent;titolo\nA1\nA2;A1;T;extra\n", b';').unwrap();
        assert_eq!(table.rows[0].get("titolo"), Some(""));
        assert_eq!(table.rows[1].get("titolo"), Some("T"));
        assert_eq!(table.rows[1].fields.len(), 3);
    }

    #[test]
    fn bom_and_duplicate_headers() {
        let table = parse_origin("\u{feff}sku;note;note\nA1;x;y\n", b';').unwrap();
        assert_eq!(table.headers, vec!["sku", "note", "note.1"]);
        assert_eq!(table.rows[0].get("note.1"), Some("y"));
    }

    #[test]
    fn generated_suffix_skips_literal_header() {
        let table = parse_origin("sku;note;note;note.1
A1;x;y;z
", b';').unwrap();
        assert_eq!(table.headers, vec!["sku", "note", "note.1", "note.1.1"]);
        let row = &table.rows[0];
        assert_eq!(row.fields.len(), 4);
        assert_eq!(row.get("note"), Some("x"));
        assert_eq!(row.get("note.1"), Some("y"));
        assert_eq!(row.get("note.1.1"), Some("z"));

        let table = parse_origin("sku;note.1;note;note
A1;a;b;c
", b';').unwrap();
        assert_eq!(table.headers, vec!["sku", "note.1", "note", "note.2"]);
        assert_eq!(table.rows[0].get("note.2"), Some("c"));
    }

    #[test]
    fn empty_input_has_no_header() {
        assert!(matches!(parse_origin("", b';'), Err(LoadError::MissingHeader)));
        assert!(matches!(parse_origin("\n\n", b';'), Err(LoadError::MissingHeader)));
    }

    #[test]
    fn test_sniff_semicolon_delimiter() {
        assert_eq!(sniff_delimiter(SAMPLE), b';');
    }

    #[test]
    fn test_sniff_comma_delimiter() {
        let content = "sku,parent,titolo\nA1,,T\nA2,A1,T\n";
        assert_eq!(sniff_delimiter(content), b',');
    }

    #[test]
    fn test_sniff_semicolon_with_commas_in_values() {
        let content = "sku;regular_price;titolo\nA1;\"1,50\";\"Pinza, vetro\"\nA2;2;T\n";
        assert_eq!(sniff_delimiter(content), b';');
    }

    #[test]
    fn windows_1252_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("origin.csv");
        // "Cerniera 90°" with 0xB0 (degree sign in Windows-1252)
        let mut bytes = b"sku;titolo\nA1;Cerniera 90".to_vec();
        bytes.push(0xB0);
        bytes.push(b'\n');
        fs::write(&path, bytes).unwrap();

        let text = read_file_as_utf8(&path).unwrap();
        assert!(text.contains("Cerniera 90°"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let err = read_file_as_utf8(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
