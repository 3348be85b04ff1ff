//! Reading uploaded tables.
//!
//! Uploads are delimited text with a header row. Only the first column is
//! cleaned; every other column is ignored.

use std::borrow::Cow;

use tracing::debug;

use crate::error::{CleanseError, Result};

/// Decode bytes as UTF-8, falling back to ISO-8859-1 when they are not valid
/// UTF-8. Latin-1 maps every byte to the code point of the same value, so the
/// fallback never fails.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

/// Return the first cell of every data row, in file order.
///
/// The whole table is parsed before anything is returned, so a structurally
/// invalid row anywhere rejects the upload as `MalformedInput` and no row is
/// cleaned or stored.
pub fn read_first_column(bytes: &[u8]) -> Result<Vec<String>> {
    let text = decode_text(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let header_len = reader.headers()?.len();
    if header_len == 0 {
        return Err(CleanseError::MalformedInput("table has no columns".to_string()));
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let cell = record.get(0).ok_or_else(|| {
            CleanseError::MalformedInput(format!("row {} has no cells", idx + 1))
        })?;
        rows.push(cell.to_string());
    }

    debug!(rows = rows.len(), columns = header_len, "Read uploaded table");
    Ok(rows)
}
