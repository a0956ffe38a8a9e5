// Output table export

use skumap_engine::{OutputRow, Session, SCHEMA};

use crate::error::ExportError;

/// Serialize rows under the fixed schema header, one line per row.
///
/// Fields holding the delimiter, quotes or line breaks are quoted.
pub fn write_table(rows: &[OutputRow], delimiter: u8) -> Result<String, String> {
    let mut writer = ::csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(::csv::QuoteStyle::Necessary)
        .terminator(::csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(SCHEMA).map_err(|e| e.to_string())?;
    for row in rows {
        writer.write_record(row.values()).map_err(|e| e.to_string())?;
    }

    let bytes = writer.into_inner().map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

/// Export the session table; an empty table is rejected.
pub fn export_session(session: &Session, delimiter: u8) -> Result<String, ExportError> {
    let rows = session.export_rows().map_err(ExportError::Table)?;
    write_table(rows, delimiter).map_err(ExportError::Write)
}

/// Header line only, for filling in by hand. No line terminator follows it.
pub fn empty_template(delimiter: u8) -> String {
    let sep = (delimiter as char).to_string();
    SCHEMA.join(&sep)
}

/// Parse exported text back into rows. The header must be the schema.
pub fn read_table(content: &str, delimiter: u8) -> Result<Vec<OutputRow>, String> {
    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(|e| e.to_string())?;
    if !headers.iter().eq(SCHEMA.iter().copied()) {
        return Err("header does not match the output schema".to_string());
    }

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| e.to_string())?;
        let values: Vec<String> = record.iter().map(str::to_string).collect();
        let row = OutputRow::from_values(values)
            .ok_or_else(|| format!("line {}: expected {} fields", i + 2, SCHEMA.len()))?;
        rows.push(row);
    }
    Ok(rows)
}
