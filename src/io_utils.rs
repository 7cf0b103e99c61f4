//! I/O helpers for delimited sources and CSV output.
//!
//! - **Delimiter resolution**: extension-based (`.csv` → comma, `.tsv` → tab)
//!   with manual override.
//! - **Encoding**: input decoding via `encoding_rs`, defaulting to UTF-8.
//! - **Readers/writers**: flexible CSV readers (rows may be longer or shorter
//!   than the header) and writers targeting a file, stdout or a buffer.
//! - **stdin/stdout**: the `-` path convention routes through standard streams.

use std::{
    fs::File,
    io::{BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

/// Delimiter for a delimited source, or `None` when `path` names a workbook.
pub fn delimiter_for_path(path: &Path, provided: Option<u8>) -> Option<u8> {
    if provided.is_some() {
        return provided;
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => Some(DEFAULT_TSV_DELIMITER),
        Some(ext) if ext.eq_ignore_ascii_case("csv") => Some(DEFAULT_CSV_DELIMITER),
        _ => None,
    }
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(false)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        Err(anyhow!(
            "Failed to decode text with encoding {}",
            encoding.name()
        ))
    } else {
        Ok(text.into_owned())
    }
}

pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Result<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

pub fn csv_writer<W: Write>(writer: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(DEFAULT_CSV_DELIMITER)
        .double_quote(true)
        .from_writer(writer)
}

/// Writes `bytes` to `path`, or to stdout when `path` is absent or `-`.
pub fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    let mut sink: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        )),
        _ => Box::new(std::io::stdout().lock()),
    };
    sink.write_all(bytes)?;
    sink.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_follows_extension_unless_overridden() {
        assert_eq!(delimiter_for_path(Path::new("a.CSV"), None), Some(b','));
        assert_eq!(delimiter_for_path(Path::new("a.tsv"), None), Some(b'\t'));
        assert_eq!(delimiter_for_path(Path::new("a.xlsx"), None), None);
        assert_eq!(delimiter_for_path(Path::new("a.xlsx"), Some(b';')), Some(b';'));
    }

    #[test]
    fn decode_strips_utf8_bom() {
        let bytes = b"\xEF\xBB\xBFArea";
        assert_eq!(decode_bytes(bytes, UTF_8).unwrap(), "Area");
    }

    #[test]
    fn resolve_encoding_rejects_unknown_labels() {
        assert_eq!(resolve_encoding(Some("latin1")).unwrap().name(), "windows-1252");
        assert!(resolve_encoding(Some("klingon")).is_err());
    }
}
